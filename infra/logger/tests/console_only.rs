use lodestar_logger::{LevelFilter, Logger};

#[test]
fn console_logging_initializes() {
    let logger = Logger::builder()
        .name("console-test")
        .level(LevelFilter::DEBUG)
        .env_filter("lodestar_logger=trace")
        .init()
        .expect("first initialization succeeds");

    assert_eq!(logger.name(), "console-test");

    tracing::info!("visible at the default level");
    tracing::debug!("visible at the configured level");
}
