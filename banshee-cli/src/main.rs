//! Banshee - Search Reconnaissance CLI
//!
//! A command-line interface for the banshee search engine.
//! Uses the Google Custom Search JSON API to find indexed files, paths,
//! content and subdomains of a target.

use banshee_core::{
    args::BansheeArgs,
    config::{keys_path, plan_target, resolve_targets, SearchConfig},
    engine::{run_job, EngineState},
    google::CustomSearchClient,
    keys::KeyPool,
    output::ResultSink,
    types::{IntentReport, ResultSet},
};
use std::env;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Exit status after an interrupt
const EXIT_CANCELLED: i32 = 130;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() {
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if INTERRUPTED.swap(true, Ordering::SeqCst) {
            eprintln!("\nForce exiting...");
            process::exit(EXIT_CANCELLED);
        } else {
            eprintln!("\nCaught interrupt signal, finishing current request...");
            handler_token.cancel();
        }
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", e);
        process::exit(1);
    }

    match run(cancel).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Main application logic, returning the exit status
async fn run(cancel: CancellationToken) -> anyhow::Result<i32> {
    let args = match BansheeArgs::from_iter_safe(env::args()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Try 'banshee --help' for more information.");
            return Ok(1);
        }
    };

    if args.help {
        print_help();
        return Ok(0);
    }

    if args.version {
        println!("Banshee {}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    init_logging(args.verbose);
    args.validate()?;

    let config = SearchConfig::from_args(&args)?;
    let targets = resolve_targets(&args)?;

    let keys_file = keys_path(&args)
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory; use -k <file>"))?;
    let keys = KeyPool::from_file(&keys_file)?;
    debug!("Loaded {} API key(s) from {}", keys.len(), keys_file.display());

    let client = CustomSearchClient::with_proxy(args.proxy.as_deref())?;
    let sink = match args.output {
        Some(ref path) => ResultSink::file(path),
        None => ResultSink::stdout(),
    };

    let start_time = SystemTime::now();
    info!(
        "Starting Banshee {} at {} against {} target(s)",
        env!("CARGO_PKG_VERSION"),
        format_time(start_time),
        targets.len()
    );

    let mut state = EngineState::new(keys);
    let mut cancelled = false;

    'targets: for target in &targets {
        info!("Target: {}", target);

        for job in plan_target(&config, target) {
            debug!("Running {} search on {}", job.label, target);
            let report = run_job(&client, &mut state, &job.intents, &cancel).await;
            flush(&sink, &report);

            if report.is_cancelled() {
                cancelled = true;
                break 'targets;
            }
        }
    }

    info!(
        "Banshee done at {} ({} of {} key(s) still available)",
        format_time(SystemTime::now()),
        state.keys.available(),
        state.keys.len()
    );

    if cancelled || cancel.is_cancelled() {
        return Ok(EXIT_CANCELLED);
    }
    Ok(0)
}

/// Installs the stderr subscriber; RUST_LOG wins over -v
fn init_logging(verbose: bool) {
    let default = if verbose {
        "banshee=debug,banshee_core=debug,warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Writes a job's results, falling back to stdout when the file fails
fn flush(sink: &ResultSink, report: &IntentReport) {
    if report.is_empty() {
        if !report.is_cancelled() {
            eprintln!("No results found");
        }
        return;
    }

    write_results(sink, &report.results);
}

fn write_results(sink: &ResultSink, results: &ResultSet) {
    match sink.write(results) {
        Ok(written) => debug!("Wrote {} new result(s)", written),
        Err(e) => {
            let destination = sink
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stdout".to_string());
            error!("Cannot write to {}: {}", destination, e);
            if sink.path().is_some() {
                warn!("Printing results to stdout instead");
                if let Err(e) = ResultSink::stdout().write(results) {
                    error!("Cannot write to stdout: {}", e);
                }
            }
        }
    }
}

/// Format system time for display
fn format_time(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// Print help message
fn print_help() {
    println!(
        r#"Banshee - Search Reconnaissance v{}

USAGE:
    banshee -u <target> [MODES] [OPTIONS]
    banshee -f <targets file> [MODES] [OPTIONS]

TARGETS:
    -u, --url <domain>          Target domain or IP address
    -f, --file <file>           File with one target per line

MODES (at least one):
    -e, --extensions <list>     File extensions to find (e.g. pdf,doc,bak)
    -w, --word <list>           Words or paths in URLs (e.g. admin,login)
    -c, --contents <list>       Text to find in page contents
    -q, --query <dork>          Raw query appended to the site scope
    -s, --subdomains            List subdomains of the target

OPTIONS:
    -a, --recursive             Include every subdomain level in the search
    -x, --exclusions <list>     Sites to exclude from results
    -p, --pages <n>             Result pages per search (default 10)
    -d, --delay <seconds>       Fixed delay between requests (default adaptive)
    -o, --output <file>         Append new results to file
    -r, --proxy <url>           Proxy as [protocol://]host[:port]
    -k, --keys <file>           API keys file (default ~/.config/banshee/keys.txt)
    -v, --verbose               Verbose output on stderr
    -h, --help                  Print this help
    -V, --version               Print version

List values are comma-separated or the path of a file with one entry per line.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
