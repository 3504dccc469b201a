//! Engine behavior against scripted transports: worker concurrency, neighbor
//! admission, and graceful shutdown.

use netcrawl::config::{ConnectionConfig, FilteringConfig, ThreadingConfig};
use netcrawl::engine::Engine;
use netcrawl::frontier::Frontier;
use netcrawl::transport::MockTransport;

use crate::common::{test_store, ScriptedNetwork};

fn fast_connection() -> ConnectionConfig {
    ConnectionConfig {
        retry_attempts: 1,
        retry_delay: 0,
        timeout: 1,
    }
}

#[tokio::test]
async fn a_single_seed_with_no_neighbors_gets_stored_and_queue_drains() {
    let store = test_store().await;
    let frontier = Frontier::new();
    let network = ScriptedNetwork::new();
    network.script(
        "rtr-a",
        MockTransport::new()
            .with_response("show version", "Cisco IOS Software, C3750, Version 15.0(2)SE,\nSystem serial number             : FOC1111X\n")
            .with_response("show inventory", "")
            .with_response("show cdp neighbors detail", ""),
    );

    store.admit_if_absent("rtr-a", "10.0.0.1").await.unwrap();
    frontier.push("rtr-a".into(), "10.0.0.1".into());

    let mut engine = Engine::new(
        "admin".into(),
        "admin".into(),
        fast_connection(),
        FilteringConfig::default(),
        &ThreadingConfig { max_workers: 2, queue_timeout: 1 },
        store.clone(),
        frontier,
    )
    .with_transport_factory(network.factory());

    engine.start(2);
    engine.wait_for_completion().await;
    engine.stop().await;

    let devices = store.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].hostname, "rtr-a");
    assert!(store.unprocessed_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_discovered_neighbor_is_admitted_and_crawled_in_turn() {
    let store = test_store().await;
    let frontier = Frontier::new();
    let network = ScriptedNetwork::new();
    network.script(
        "rtr-a",
        MockTransport::new()
            .with_response("show version", "Cisco IOS Software, C3750, Version 15.0(2)SE,\nSystem serial number             : FOC1111X\n")
            .with_response("show inventory", "")
            .with_response(
                "show cdp neighbors detail",
                "-------------------------\nDevice ID: rtr-b\nPlatform: cisco IOS Software WS-C3750, Capabilities: Switch\nInterface: Gi0/1,  Port ID (outgoing port): Gi0/2\n  IP address: 10.0.0.2\n",
            ),
    );
    network.script(
        "rtr-b",
        MockTransport::new()
            .with_response("show version", "Cisco IOS Software, C3750, Version 15.0(2)SE,\nSystem serial number             : FOC2222X\n")
            .with_response("show inventory", "")
            .with_response("show cdp neighbors detail", ""),
    );

    store.admit_if_absent("rtr-a", "10.0.0.1").await.unwrap();
    frontier.push("rtr-a".into(), "10.0.0.1".into());

    let mut engine = Engine::new(
        "admin".into(),
        "admin".into(),
        fast_connection(),
        FilteringConfig::default(),
        &ThreadingConfig { max_workers: 3, queue_timeout: 1 },
        store.clone(),
        frontier,
    )
    .with_transport_factory(network.factory());

    engine.start(3);
    engine.wait_for_completion().await;
    engine.stop().await;

    let mut hostnames: Vec<String> = store.list_devices().await.unwrap().into_iter().map(|d| d.hostname).collect();
    hostnames.sort();
    assert_eq!(hostnames, vec!["rtr-a".to_string(), "rtr-b".to_string()]);
}

#[tokio::test]
async fn stop_is_idempotent_and_can_be_called_before_completion() {
    let store = test_store().await;
    let frontier = Frontier::new();
    let mut engine = Engine::new(
        "admin".into(),
        "admin".into(),
        fast_connection(),
        FilteringConfig::default(),
        &ThreadingConfig { max_workers: 2, queue_timeout: 1 },
        store,
        frontier,
    );
    engine.start(2);
    engine.stop().await;
    engine.stop().await;
}
