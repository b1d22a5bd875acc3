// Logging initialization tests

use memekit::logging::{init_subscriber, init_subscriber_with_format, LogFormat};

#[test]
fn test_can_initialize_subscriber_repeatedly() {
    // The first call installs the global subscriber; later calls are no-ops
    init_subscriber().expect("first initialization failed");
    init_subscriber().expect("second initialization failed");
    init_subscriber_with_format(LogFormat::Json).expect("format switch failed");

    tracing::info!(width = 700, height = 350, "subscriber ready");
}

#[test]
fn test_default_format_is_pretty() {
    assert_eq!(LogFormat::default(), LogFormat::Pretty);
}
