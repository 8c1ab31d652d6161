mod common;

use std::sync::Arc;
use std::time::Duration;

use portfolio_sync::content::Field;
use portfolio_sync::storage::MemoryStore;
use portfolio_sync::sync::ConnectionState;
use portfolio_sync::SyncClient;

use common::{sync_config, wait_until, MockBackend};

const WAIT: Duration = Duration::from_secs(5);

async fn connected_client(backend: &MockBackend) -> SyncClient {
    let config = sync_config(&backend.base_url());
    let client = SyncClient::new(&config, Arc::new(MemoryStore::new())).unwrap();
    client.open().await.unwrap();
    assert!(wait_until(WAIT, || backend.open_sockets() == 1).await);
    assert!(
        wait_until(WAIT, || {
            client.socket_status().map(|s| s.state) == Some(ConnectionState::Connected)
        })
        .await
    );
    client
}

#[tokio::test]
async fn test_server_push_triggers_refetch() {
    let backend = MockBackend::start().await;
    let client = connected_client(&backend).await;

    backend.set_title("about", "Pushed Title");
    backend.push_config_updated();

    assert!(wait_until(WAIT, || client.text("about", Field::Title) == "Pushed Title").await);
    client.close().await;
}

#[tokio::test]
async fn test_malformed_frames_are_dropped_without_disconnecting() {
    let backend = MockBackend::start().await;
    let client = connected_client(&backend).await;
    let before = backend.section_fetches();

    backend.push("this is not json");
    backend.push("{}");
    backend.push(r#"{"type":"ping"}"#);
    backend.push_config_updated();

    assert!(wait_until(WAIT, || backend.section_fetches() == before + 1).await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.section_fetches(), before + 1);

    let status = client.socket_status().unwrap();
    assert_eq!(status.state, ConnectionState::Connected);
    assert_eq!(backend.socket_connects(), 1);
    client.close().await;
}

#[tokio::test]
async fn test_test_push_does_not_refetch() {
    let backend = MockBackend::start().await;
    let client = connected_client(&backend).await;
    let before = backend.section_fetches();

    let response = client.trigger_test_push().await.unwrap();
    assert_eq!(response["message"], "Test message broadcasted");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.section_fetches(), before);
    client.close().await;
}

#[tokio::test]
async fn test_abnormal_drop_reconnects_and_resets_counter() {
    let backend = MockBackend::start().await;
    let client = connected_client(&backend).await;

    backend.drop_sockets();

    assert!(wait_until(WAIT, || backend.socket_connects() == 2).await);
    assert!(
        wait_until(WAIT, || {
            client
                .socket_status()
                .map(|s| s.state == ConnectionState::Connected && s.reconnect_attempts == 0)
                .unwrap_or(false)
        })
        .await
    );
    client.close().await;
}

#[tokio::test]
async fn test_clean_server_close_does_not_reconnect() {
    let backend = MockBackend::start().await;
    let client = connected_client(&backend).await;

    backend.close_sockets_cleanly();

    assert!(
        wait_until(WAIT, || {
            client.socket_status().map(|s| s.state) == Some(ConnectionState::Disconnected)
        })
        .await
    );
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.socket_connects(), 1);
    assert!(!client.socket_status().unwrap().realtime_disabled);
    client.close().await;
}

#[tokio::test]
async fn test_intentional_close_is_final() {
    let backend = MockBackend::start().await;
    let client = connected_client(&backend).await;

    client.close().await;

    assert!(wait_until(WAIT, || backend.open_sockets() == 0).await);
    assert!(client.socket_status().is_none());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.socket_connects(), 1);
}

#[tokio::test]
async fn test_unreachable_socket_disables_realtime_but_not_local_sync() {
    let backend = MockBackend::start().await;
    let mut config = sync_config(&backend.base_url());
    config.realtime.socket_path = "/no-socket-here".into();
    let store = MemoryStore::new();
    let a = SyncClient::new(&config, Arc::new(store.handle())).unwrap();
    let b = SyncClient::new(&config, Arc::new(store.handle())).unwrap();
    a.open().await.unwrap();
    b.open().await.unwrap();

    assert!(
        wait_until(WAIT, || {
            a.socket_status().map(|s| s.realtime_disabled).unwrap_or(false)
        })
        .await
    );
    let status = a.socket_status().unwrap();
    assert_eq!(status.reconnect_attempts, 3);
    assert_eq!(status.state, ConnectionState::Disconnected);

    backend.set_title("about", "Still Syncing");
    a.publish().unwrap();
    assert!(wait_until(WAIT, || b.text("about", Field::Title) == "Still Syncing").await);

    a.close().await;
    b.close().await;
}
