use ent_logger::{LevelFilter, LogFormat, Logger};

#[test]
fn json_console_logger_has_no_file_sink() {
    let logger = Logger::builder("integration-console-only")
        .format(LogFormat::Json)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    tracing::info!(org_id = "4384938490324", "console only");
    assert!(!logger.has_file_sink(), "console-only logger should not create a file guard");
}
