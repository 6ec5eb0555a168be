use serial_test::serial;

use super::*;

fn clear_attest_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("ATTEST_") {
            // SAFETY: tests in this module are serialized and no other
            // thread reads the environment concurrently.
            unsafe { std::env::remove_var(&key) };
        }
    }
}

#[test]
#[serial]
fn defaults_apply_without_env() {
    clear_attest_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.qdrant_url, DEFAULT_QDRANT_URL);
    assert_eq!(config.chunk_size, 500);
    assert_eq!(config.chunk_overlap, 100);
    assert_eq!(config.top_k, 5);
    assert_eq!(config.similarity_threshold, 0.5);
    assert_eq!(config.confidence_threshold, 0.7);
    assert!(config.moderation_enabled);
    assert!(config.rerank_endpoint.is_none());
    config.validate().unwrap();
}

#[test]
#[serial]
fn env_overrides_are_applied() {
    clear_attest_env();
    // SAFETY: serialized test, see above.
    unsafe {
        std::env::set_var("ATTEST_PORT", "9000");
        std::env::set_var("ATTEST_CHUNK_SIZE", "800");
        std::env::set_var("ATTEST_CHUNK_OVERLAP", "200");
        std::env::set_var("ATTEST_TOP_K", "10");
        std::env::set_var("ATTEST_RERANK_ENDPOINT", "http://localhost:8087/rerank");
        std::env::set_var("ATTEST_MODERATION_ENABLED", "false");
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 9000);
    assert_eq!(config.chunk_size, 800);
    assert_eq!(config.chunk_overlap, 200);
    assert_eq!(config.top_k, 10);
    assert_eq!(
        config.rerank_endpoint.as_deref(),
        Some("http://localhost:8087/rerank")
    );
    assert!(!config.moderation_enabled);

    clear_attest_env();
}

#[test]
#[serial]
fn invalid_port_is_rejected() {
    clear_attest_env();
    // SAFETY: serialized test, see above.
    unsafe { std::env::set_var("ATTEST_PORT", "not-a-port") };

    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::PortParseError { .. })
    ));

    clear_attest_env();
}

#[test]
#[serial]
fn zero_port_is_rejected() {
    clear_attest_env();
    // SAFETY: serialized test, see above.
    unsafe { std::env::set_var("ATTEST_PORT", "0") };

    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::InvalidPort { .. })
    ));

    clear_attest_env();
}

#[test]
#[serial]
fn invalid_bind_addr_is_rejected() {
    clear_attest_env();
    // SAFETY: serialized test, see above.
    unsafe { std::env::set_var("ATTEST_BIND_ADDR", "nowhere") };

    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::InvalidBindAddr { .. })
    ));

    clear_attest_env();
}

#[test]
#[serial]
fn unparseable_tunable_falls_back_to_default() {
    clear_attest_env();
    // SAFETY: serialized test, see above.
    unsafe { std::env::set_var("ATTEST_TOP_K", "lots") };

    let config = Config::from_env().unwrap();
    assert_eq!(config.top_k, 5);

    clear_attest_env();
}

#[test]
#[serial]
fn validate_rejects_bad_chunking_combination() {
    clear_attest_env();
    // SAFETY: serialized test, see above.
    unsafe {
        std::env::set_var("ATTEST_CHUNK_SIZE", "100");
        std::env::set_var("ATTEST_CHUNK_OVERLAP", "100");
    }

    let config = Config::from_env().unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { .. })
    ));

    clear_attest_env();
}

#[test]
#[serial]
fn validate_rejects_bad_weights() {
    clear_attest_env();
    // SAFETY: serialized test, see above.
    unsafe { std::env::set_var("ATTEST_WEIGHT_GROUNDING", "0.9") };

    let config = Config::from_env().unwrap();
    assert!(config.validate().is_err());

    clear_attest_env();
}

#[test]
#[serial]
fn socket_addr_formats_bind_and_port() {
    clear_attest_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");
}
