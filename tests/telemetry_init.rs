//! Subscriber installation is process-global, so it gets its own test binary.

use agent_tools::{init_tracing, LoggingConfig};

#[test]
fn second_init_is_tolerated() {
    let config = LoggingConfig {
        level: "not a level[".into(),
        json: true,
    };
    let _ = init_tracing(&config);
    assert!(!init_tracing(&LoggingConfig::default()));
}
