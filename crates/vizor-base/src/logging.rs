use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A logger that writes to stdout using println!
pub struct StdoutLogger;

/// A logger that writes to date-named files with automatic day rollover
pub struct FileLogger {
    state: Mutex<FileLoggerState>,
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

impl FileLogger {
    /// Create a new FileLogger that writes to `<dir>/<YYYY-MM-DD>.log`
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let current_date = format_today();
        let file = open_day_file(&dir, &current_date)?;

        Ok(FileLogger {
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }
}

fn open_day_file(dir: &std::path::Path, date: &str) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{}.log", date)))
}

/// Render one record as `TIMESTAMP [LEVEL] [thread:ID] file:line - message`
fn format_record(record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {}:{} - {}",
        format_timestamp(),
        record.level(),
        std::thread::current().id(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{}", format_record(record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let today = format_today();
        if today != state.current_date {
            match open_day_file(&state.dir, &today) {
                Ok(new_file) => {
                    state.file = new_file;
                    state.current_date = today;
                }
                Err(e) => {
                    // keep writing to the previous day's file
                    eprintln!("Failed to open new log file for {}: {}", today, e);
                }
            }
        }

        let log_line = format!("{}\n", format_record(record));
        if let Err(e) = state.file.write_all(log_line.as_bytes()) {
            eprintln!("Failed to write to log file: {}", e);
            eprintln!("{}", log_line.trim_end());
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Format current time as YYYY-MM-DDTHH:MM:SS (UTC)
pub fn format_timestamp() -> String {
    let secs = unix_seconds();
    let time_of_day = secs % 86400;
    let (year, month, day) = civil_from_days((secs / 86400) as i64);

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

/// Format current date as YYYY-MM-DD (UTC)
pub fn format_today() -> String {
    let (year, month, day) = civil_from_days((unix_seconds() / 86400) as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Convert days since Unix epoch to civil date (year, month, day)
/// Uses Howard Hinnant's algorithm (public domain)
/// http://howardhinnant.github.io/date_algorithms.html
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

/// Debug in debug builds, Info in release builds.
pub fn default_max_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize the global logger with StdoutLogger
///
/// This can only be called once per process. Subsequent calls are silently ignored.
pub fn init_stdout_logger() {
    static LOGGER: StdoutLogger = StdoutLogger;

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(default_max_level());
    }
}

/// Initialize the global logger with FileLogger
///
/// This can only be called once per process. Subsequent calls are silently ignored.
///
/// Returns an error if the FileLogger cannot be created (e.g., invalid directory).
pub fn init_file_logger(dir: impl Into<PathBuf>) -> std::io::Result<()> {
    let logger = FileLogger::new(dir)?;

    // set_logger needs a &'static; the leak happens once per process
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(default_max_level());
    }

    Ok(())
}

/// Log a fatal error and exit the process
///
/// Logs at Error level (the log crate has no Fatal level),
/// flushes stdout, and calls std::process::exit(1).
#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
        $crate::log::logger().flush();
        {
            use std::io::Write;
            let _ = std::io::stdout().flush();
        }
        std::process::exit(1);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn test_civil_from_days_leap_year() {
        // 2000-02-29
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
    }

    #[test]
    fn test_format_timestamp_structure() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[16..17], ":");
    }

    #[test]
    fn test_file_logger_day_rollover() {
        let test_dir = std::env::temp_dir()
            .join(format!("vizor-log-test-{}-rollover", std::process::id()));
        let _ = fs::remove_dir_all(&test_dir);

        let logger = FileLogger::new(&test_dir).expect("Failed to create FileLogger");

        // pretend the logger was opened on an old date
        let stale_path = test_dir.join("1999-01-01.log");
        {
            let mut state = logger.state.lock().unwrap();
            state.current_date = "1999-01-01".to_string();
            state.file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&stale_path)
                .unwrap();
        }

        let record = log::RecordBuilder::new()
            .level(log::Level::Info)
            .target("test")
            .file(Some("test.rs"))
            .line(Some(1))
            .args(format_args!("after rollover"))
            .build();
        logger.log(&record);

        let today = format_today();
        let today_file = test_dir.join(format!("{}.log", today));
        assert!(stale_path.exists());
        let content = fs::read_to_string(&today_file).expect("today's file should exist");
        assert!(content.contains("after rollover"));
        assert_eq!(logger.state.lock().unwrap().current_date, today);

        fs::remove_dir_all(&test_dir).ok();
    }
}
