use std::fs::{File, OpenOptions};
use std::path::Path;

use simplelog::{
    ColorChoice, LevelFilter, TermLogger, TerminalMode, ThreadLogMode, WriteLogger,
};

use crate::error::ProbeError;

/// Logs go to stderr, or are appended to `log_file`. Stdout is reserved for
/// response bodies.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), ProbeError> {
    match log_file {
        Some(path) => init_file_logger(level, path),
        None => init_term_logger(level),
    }
}

fn prepare_logger_config() -> simplelog::Config {
    let mut builder = simplelog::ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Names)
        .set_target_level(LevelFilter::Off);
    // Stays on UTC when the local offset cannot be determined.
    let builder = match builder.set_time_offset_to_local() {
        Ok(b) | Err(b) => b,
    };
    builder.build()
}

fn init_term_logger(level: LevelFilter) -> Result<(), ProbeError> {
    TermLogger::init(
        level,
        prepare_logger_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| ProbeError::Logger(e.to_string()))
}

/// Earlier runs' lines are kept; new lines go after them.
fn open_log_file(path: &Path) -> Result<File, ProbeError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ProbeError::Logger(format!("{}: {}", path.display(), e)))
}

fn init_file_logger(level: LevelFilter, path: &Path) -> Result<(), ProbeError> {
    let file = open_log_file(path)?;
    WriteLogger::init(level, prepare_logger_config(), file)
        .map_err(|e| ProbeError::Logger(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;
    use std::thread;

    use log::{Level, Log, Record};
    use probe_core::{triple_cart, CommunicationClient, HttpRequest, HttpResponse};
    use uuid::Uuid;

    use crate::batch::ConcurrentRequestBatch;
    use crate::error::TransportError;
    use crate::output::OutputSink;
    use crate::transport::Transport;

    fn temp_log(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("probe-{tag}-{}.log", Uuid::new_v4()))
    }

    struct AlwaysTrue;

    impl Transport for AlwaysTrue {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"true".to_vec(),
            })
        }
    }

    #[test]
    fn lines_carry_the_thread_name() {
        let path = temp_log("thread-name");
        let logger = WriteLogger::new(
            LevelFilter::Debug,
            prepare_logger_config(),
            open_log_file(&path).unwrap(),
        );

        thread::Builder::new()
            .name("probe-unit-3".to_string())
            .spawn(move || {
                logger.log(
                    &Record::builder()
                        .args(format_args!("unit 3 sending"))
                        .level(Level::Info)
                        .target("probe::batch")
                        .build(),
                );
                logger.flush();
            })
            .unwrap()
            .join()
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(written.contains("probe-unit-3"), "{written}");
        assert!(written.contains("unit 3 sending"), "{written}");
    }

    #[test]
    fn log_file_is_appended_not_truncated() {
        let path = temp_log("append");
        {
            let mut first = open_log_file(&path).unwrap();
            writeln!(first, "first run").unwrap();
        }
        {
            let mut second = open_log_file(&path).unwrap();
            writeln!(second, "second run").unwrap();
        }

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(written, "first run\nsecond run\n");
    }

    #[test]
    fn open_log_file_reports_bad_path() {
        let err = open_log_file(Path::new("/nonexistent/dir/probe.log")).unwrap_err();
        assert!(matches!(err, ProbeError::Logger(ref msg) if msg.contains("/nonexistent/dir")));
    }

    // The only test in this crate that installs the global logger.
    #[test]
    fn batch_lines_carry_unit_names_and_batch_id() {
        let path = temp_log("batch");
        init_file_logger(LevelFilter::Debug, &path).unwrap();

        let request = CommunicationClient::default()
            .build_process_purchase(&triple_cart())
            .unwrap();
        let sink = OutputSink::new(std::io::sink());
        let report = ConcurrentRequestBatch::new(request, 2)
            .unwrap()
            .run(&AlwaysTrue, &sink);
        log::logger().flush();

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        let tag = format!("batch={}", report.id);
        assert!(written.contains("probe-unit-0"), "{written}");
        assert!(written.contains("probe-unit-1"), "{written}");
        assert!(
            written.lines().filter(|l| l.contains(&tag)).count() >= 4,
            "{written}"
        );
    }
}
