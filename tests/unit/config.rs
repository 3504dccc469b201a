use netcrawl::config::CrawlConfig;
use pretty_assertions::assert_eq;
use serial_test::serial;

#[test]
fn defaults_match_documented_values() {
    let config = CrawlConfig::default();
    assert_eq!(config.log, "info");
    assert_eq!(config.connection.retry_attempts, 3);
    assert_eq!(config.connection.retry_delay, 5);
    assert_eq!(config.connection.timeout, 10);
    assert_eq!(config.threading.max_workers, 4);
    assert_eq!(config.threading.queue_timeout, 2);
    assert_eq!(config.database.path, "netcrawl.db");
    assert_eq!(config.output.directory, "output");
    assert_eq!(config.output.inventory_file, "inventory.csv");
    assert!(config.filtering.exclude_platforms.is_empty());
    assert!(config.filtering.include_platforms.is_empty());
}

#[test]
fn apply_overrides_only_touches_named_keys() {
    let mut config = CrawlConfig::default();
    let overrides: serde_yaml::Value = serde_yaml::from_str(
        r#"
        threading:
          max_workers: 16
        filtering:
          exclude_platforms: ["Catalyst WS", "ASA"]
        "#,
    )
    .unwrap();

    config.apply_overrides(&overrides).unwrap();

    assert_eq!(config.threading.max_workers, 16);
    assert_eq!(config.threading.queue_timeout, 2); // untouched
    assert_eq!(config.filtering.exclude_platforms, vec!["Catalyst WS", "ASA"]);
    assert_eq!(config.connection.retry_attempts, 3); // untouched
}

#[test]
fn apply_overrides_on_empty_document_is_a_no_op() {
    let mut config = CrawlConfig::default();
    let before = config.clone();
    let overrides: serde_yaml::Value = serde_yaml::from_str("{}").unwrap();
    config.apply_overrides(&overrides).unwrap();
    assert_eq!(config.database.path, before.database.path);
    assert_eq!(config.threading.max_workers, before.threading.max_workers);
}

#[test]
#[serial(netcrawl_env)]
fn env_overrides_take_precedence_over_file_values() {
    let mut config = CrawlConfig::default();
    unsafe {
        std::env::set_var("NETCRAWL_MAX_WORKERS", "9");
        std::env::set_var("NETCRAWL_DB_PATH", "/tmp/override.db");
    }
    config.apply_env_overrides();
    unsafe {
        std::env::remove_var("NETCRAWL_MAX_WORKERS");
        std::env::remove_var("NETCRAWL_DB_PATH");
    }

    assert_eq!(config.threading.max_workers, 9);
    assert_eq!(config.database.path, "/tmp/override.db");
}

#[test]
#[serial(netcrawl_env)]
fn malformed_env_worker_count_is_ignored() {
    let mut config = CrawlConfig::default();
    unsafe {
        std::env::set_var("NETCRAWL_MAX_WORKERS", "not-a-number");
    }
    config.apply_env_overrides();
    unsafe {
        std::env::remove_var("NETCRAWL_MAX_WORKERS");
    }
    assert_eq!(config.threading.max_workers, 4); // default retained
}
