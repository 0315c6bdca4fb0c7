//! Integration tests for result output

use banshee_core::output::{existing_lines, ResultSink};
use banshee_core::types::ResultSet;
use std::fs;
use tempfile::tempdir;

/// Create a sample result set for testing
fn sample_results(links: &[&str]) -> ResultSet {
    links.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_second_write_adds_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let sink = ResultSink::file(&path);
    let results = sample_results(&[
        "https://example.com/b.pdf",
        "https://example.com/a.pdf",
        "https://dev.example.com/c.pdf",
    ]);

    assert_eq!(sink.write(&results).unwrap(), 3);
    let first = fs::read_to_string(&path).unwrap();

    assert_eq!(sink.write(&results).unwrap(), 0);
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        "https://dev.example.com/c.pdf\nhttps://example.com/a.pdf\nhttps://example.com/b.pdf\n"
    );
}

#[test]
fn test_appends_across_runs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");
    fs::write(&path, "https://example.com/old\n").unwrap();

    let sink = ResultSink::file(&path);
    let written = sink
        .write(&sample_results(&["https://example.com/new", "https://example.com/old"]))
        .unwrap();
    assert_eq!(written, 1);

    let lines = existing_lines(&path).unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines.contains("https://example.com/new"));
    // earlier content stays first
    assert!(fs::read_to_string(&path)
        .unwrap()
        .starts_with("https://example.com/old\n"));
}

#[test]
fn test_appends_after_unterminated_last_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");
    fs::write(&path, "https://example.com/old").unwrap();

    let sink = ResultSink::file(&path);
    let results = sample_results(&["https://example.com/new", "https://example.com/old"]);
    assert_eq!(sink.write(&results).unwrap(), 1);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "https://example.com/old\nhttps://example.com/new\n"
    );

    // both lines are recognised on the next run
    assert_eq!(sink.write(&results).unwrap(), 0);
}

#[test]
fn test_empty_results_create_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    assert_eq!(ResultSink::file(&path).write(&ResultSet::new()).unwrap(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}
