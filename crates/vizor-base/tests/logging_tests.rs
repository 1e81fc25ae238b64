use log::Log;
use std::fs;
use vizor_base::logging::{init_file_logger, init_stdout_logger, FileLogger, StdoutLogger};

fn record_at(level: log::Level, line: u32, f: impl FnOnce(&log::Record)) {
    f(&log::RecordBuilder::new()
        .level(level)
        .target("test")
        .file(Some("test.rs"))
        .line(Some(line))
        .args(format_args!("inference took 12 ms"))
        .build());
}

#[test]
fn test_stdout_logger_accepts_records() {
    let logger = StdoutLogger;
    let metadata = log::MetadataBuilder::new()
        .level(log::Level::Debug)
        .target("test")
        .build();
    assert!(logger.enabled(&metadata));

    record_at(log::Level::Info, 42, |record| logger.log(record));
    logger.flush();
}

#[test]
fn test_file_logger_writes_formatted_line() {
    let test_dir = std::env::temp_dir().join(format!("vizor-log-test-{}-write", std::process::id()));
    let _ = fs::remove_dir_all(&test_dir);

    let logger = FileLogger::new(&test_dir).expect("Failed to create FileLogger");
    record_at(log::Level::Warn, 100, |record| logger.log(record));
    logger.flush();

    let entries: Vec<_> = fs::read_dir(&test_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(entries.len(), 1, "Should have exactly one log file");

    let content = fs::read_to_string(entries[0].path()).unwrap();
    assert!(content.contains("[WARN]"));
    assert!(content.contains("thread:"));
    assert!(content.contains("test.rs:100"));
    assert!(content.contains("inference took 12 ms"));
    assert!(content.ends_with('\n'));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn test_init_stdout_logger_sets_global_logger() {
    init_stdout_logger();
    assert!(log::logger().enabled(
        &log::MetadataBuilder::new()
            .level(log::Level::Info)
            .target("test")
            .build()
    ));
    log::info!("global logger ready");
}

#[test]
fn test_init_file_logger_invalid_dir_returns_error() {
    assert!(init_file_logger("/proc/nonexistent/path").is_err());
}
