//! CLI argument parsing and validation
//!
//! Every option has a short and a long form (`-e`/`--extensions`). Values
//! follow as the next token or are attached with `=` (`--pages=2`).
//! Single-letter options also accept an attached value (`-p2`).
//!
//! # Examples
//!
//! ```
//! use banshee_core::args::BansheeArgs;
//!
//! let args = BansheeArgs::from_iter_safe(["banshee", "-u", "example.com", "-e", "pdf,doc"]).unwrap();
//! assert_eq!(args.target.as_deref(), Some("example.com"));
//! assert!(args.validate().is_ok());
//! ```

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Parsed command-line arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BansheeArgs {
    // ===== TARGETS =====
    /// Domain or IP address (-u, --url)
    pub target: Option<String>,
    /// File with one domain per line (-f, --file)
    pub domains_file: Option<PathBuf>,

    // ===== MODES =====
    /// Extensions, comma-separated or file (-e, --extensions)
    pub extensions: Option<String>,
    /// Dictionary words or paths, comma-separated or file (-w, --word)
    pub dictionary: Option<String>,
    /// Content terms, comma-separated or file (-c, --contents)
    pub contents: Option<String>,
    /// Raw query appended to the site scope (-q, --query)
    pub query: Option<String>,
    /// List subdomains of the target (-s, --subdomains)
    pub subdomains: bool,

    // ===== SCOPE & PACING =====
    /// Include every subdomain level in scopes (-a, --recursive)
    pub recursive: bool,
    /// Sites to exclude, comma-separated or file (-x, --exclusions)
    pub exclusions: Option<String>,
    /// Pages per intent (-p, --pages)
    pub pages: Option<u32>,
    /// Fixed delay in seconds between requests (-d, --delay)
    pub delay: Option<f64>,

    // ===== I/O =====
    /// Append results to this file (-o, --output)
    pub output: Option<PathBuf>,
    /// Proxy as [protocol://]host[:port] (-r, --proxy)
    pub proxy: Option<String>,
    /// Keys file overriding ~/.config/banshee/keys.txt (-k, --keys)
    pub keys_file: Option<PathBuf>,

    // ===== MISC =====
    /// Verbose output (-v, --verbose)
    pub verbose: bool,
    /// Print help (-h, --help)
    pub help: bool,
    /// Print version (-V, --version)
    pub version: bool,
}

impl BansheeArgs {
    /// Parse arguments from a command-line iterator
    ///
    /// The first item is the program name and is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown options, missing values and values
    /// that do not parse
    pub fn from_iter_safe<I, S>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = iter.into_iter().map(|s| s.as_ref().to_string()).collect();
        if args.is_empty() {
            return Ok(Self::default());
        }
        Self::parse_args(&args[1..])
    }

    fn parse_args(tokens: &[String]) -> Result<Self> {
        let mut args = BansheeArgs::default();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];

            if token.starts_with('-') && token != "-" {
                let cleaned = token.trim_start_matches('-');

                // --key=value
                if let Some((key, value)) = cleaned.split_once('=') {
                    if !Self::is_valid_arg(key) {
                        return Err(Error::InvalidInput(format!("Unknown argument: {}", key)));
                    }
                    Self::set_arg_value(&mut args, key, Some(value.to_string()))?;
                    i += 1;
                    continue;
                }

                if Self::is_valid_arg(cleaned) {
                    Self::parse_single_arg(&mut args, cleaned, tokens, &mut i)?;
                    i += 1;
                    continue;
                }

                // -p2, -d0.5
                if let Some(first) = cleaned.chars().next() {
                    let (flag, value) = cleaned.split_at(first.len_utf8());
                    if !value.is_empty() && Self::arg_needs_value(flag) {
                        Self::set_arg_value(&mut args, flag, Some(value.to_string()))?;
                        i += 1;
                        continue;
                    }
                }

                return Err(Error::InvalidInput(format!("Unknown argument: {}", cleaned)));
            }

            // A bare positional argument is taken as the target
            if args.target.is_none() {
                args.target = Some(token.clone());
            } else {
                return Err(Error::InvalidInput(format!("Unexpected argument: {}", token)));
            }
            i += 1;
        }

        Ok(args)
    }

    fn parse_single_arg(
        args: &mut BansheeArgs,
        arg: &str,
        tokens: &[String],
        i: &mut usize,
    ) -> Result<()> {
        if !Self::arg_needs_value(arg) {
            return Self::set_arg_value(args, arg, None);
        }

        match tokens.get(*i + 1) {
            Some(next)
                if !next.starts_with('-')
                    || Self::is_numeric(next)
                    || Self::arg_accepts_dash_value(arg) =>
            {
                *i += 1;
                Self::set_arg_value(args, arg, Some(next.clone()))
            }
            _ => Err(Error::InvalidInput(format!(
                "Argument -{} requires a value",
                arg
            ))),
        }
    }

    /// Query and term options whose values may start with `-` (`-inurl:www`)
    fn arg_accepts_dash_value(arg: &str) -> bool {
        matches!(
            arg,
            "q" | "query" | "x" | "exclusions" | "c" | "contents" | "w" | "word"
        )
    }

    /// Lets negative numbers through as values so validation can reject them
    fn is_numeric(token: &str) -> bool {
        token.parse::<f64>().is_ok()
    }

    fn arg_needs_value(arg: &str) -> bool {
        matches!(
            arg,
            "u" | "url"
                | "f"
                | "file"
                | "e"
                | "extensions"
                | "w"
                | "word"
                | "c"
                | "contents"
                | "q"
                | "query"
                | "x"
                | "exclusions"
                | "p"
                | "pages"
                | "d"
                | "delay"
                | "o"
                | "output"
                | "r"
                | "proxy"
                | "k"
                | "keys"
        )
    }

    fn is_valid_arg(arg: &str) -> bool {
        Self::arg_needs_value(arg)
            || matches!(
                arg,
                "s" | "subdomains"
                    | "a"
                    | "recursive"
                    | "v"
                    | "verbose"
                    | "h"
                    | "help"
                    | "V"
                    | "version"
            )
    }

    fn set_arg_value(args: &mut BansheeArgs, name: &str, value: Option<String>) -> Result<()> {
        match name {
            "u" | "url" => args.target = value,
            "f" | "file" => args.domains_file = value.map(PathBuf::from),
            "e" | "extensions" => args.extensions = value,
            "w" | "word" => args.dictionary = value,
            "c" | "contents" => args.contents = value,
            "q" | "query" => args.query = value,
            "x" | "exclusions" => args.exclusions = value,
            "p" | "pages" => {
                if let Some(v) = value {
                    args.pages = Some(v.trim().parse().map_err(|_| {
                        Error::InvalidInput(format!("Invalid pages value: {}", v))
                    })?);
                }
            }
            "d" | "delay" => {
                if let Some(v) = value {
                    args.delay = Some(v.trim().parse().map_err(|_| {
                        Error::InvalidInput(format!("Invalid delay value: {}", v))
                    })?);
                }
            }
            "o" | "output" => args.output = value.map(PathBuf::from),
            "r" | "proxy" => args.proxy = value,
            "k" | "keys" => args.keys_file = value.map(PathBuf::from),
            "s" | "subdomains" => args.subdomains = true,
            "a" | "recursive" => args.recursive = true,
            "v" | "verbose" => args.verbose = true,
            "h" | "help" => args.help = true,
            "V" | "version" => args.version = true,
            _ => {
                return Err(Error::InvalidInput(format!("Unknown argument: {}", name)));
            }
        }
        Ok(())
    }

    /// True when at least one search mode was requested
    pub fn has_mode(&self) -> bool {
        self.extensions.is_some()
            || self.dictionary.is_some()
            || self.contents.is_some()
            || self.query.is_some()
            || self.subdomains
    }

    /// Validates the parsed arguments
    ///
    /// # Errors
    ///
    /// Returns an error if no target or mode is given, or a numeric value
    /// is out of range
    ///
    /// # Examples
    ///
    /// ```
    /// use banshee_core::args::BansheeArgs;
    ///
    /// let args = BansheeArgs::from_iter_safe(["banshee", "-u", "example.com"]).unwrap();
    /// assert!(args.validate().is_err()); // no mode
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.help || self.version {
            return Ok(());
        }

        let has_target = self.target.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_target && self.domains_file.is_none() {
            return Err(Error::InvalidInput("No target specified".to_string()));
        }

        if !self.has_mode() {
            return Err(Error::InvalidInput(
                "No search mode specified (use -e, -w, -c, -q or -s)".to_string(),
            ));
        }

        if let Some(delay) = self.delay {
            if !delay.is_finite() || delay < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "delay must be a non-negative number of seconds, got {}",
                    delay
                )));
            }
        }

        for (name, value) in [
            ("extensions", &self.extensions),
            ("word", &self.dictionary),
            ("contents", &self.contents),
            ("query", &self.query),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(Error::InvalidInput(format!("--{} requires a value", name)));
            }
        }

        Ok(())
    }

    /// Fixed delay override; zero means adaptive pacing
    pub fn fixed_delay(&self) -> Option<f64> {
        self.delay.filter(|d| *d > 0.0)
    }
}
