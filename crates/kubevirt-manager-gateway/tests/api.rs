//! End-to-end tests of the HTTP surface against an in-memory orchestrator.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use kubevirt_manager_control::{ControlConfig, VmManagerService};
use kubevirt_manager_gateway::{create_router, GatewayConfig, GatewayState};
use kubevirt_manager_orchestrator::{MockVirtClient, VmiPhase};

fn setup() -> (TestServer, Arc<MockVirtClient>) {
    setup_with(GatewayConfig::default())
}

fn setup_with(config: GatewayConfig) -> (TestServer, Arc<MockVirtClient>) {
    let client = Arc::new(MockVirtClient::new());
    let manager = VmManagerService::new(Arc::clone(&client), ControlConfig::default());
    let app = create_router(GatewayState::new(Arc::new(manager), config));

    (TestServer::new(app).unwrap(), client)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn health_check() {
    let (server, _client) = setup();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn list_empty_namespace() {
    let (server, _client) = setup();

    let response = server.get("/vms").await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "vms": [] }));
}

#[tokio::test]
async fn list_uses_default_namespace() {
    let (server, client) = setup();
    client.add_instance("default", "vm-b", VmiPhase::Running);
    client.add_instance("default", "vm-a", VmiPhase::Pending);
    client.add_instance("tenant", "vm-t", VmiPhase::Running);

    let body: Value = server.get("/vms").await.json();

    let vms = body["vms"].as_array().unwrap();
    assert_eq!(vms.len(), 2);
    assert_eq!(vms[0]["name"], "vm-b");
    assert_eq!(vms[0]["running"], true);
    assert_eq!(vms[1]["name"], "vm-a");
    assert_eq!(vms[1]["running"], false);
    assert_eq!(vms[0]["memory"], "0");
    assert!(vms[0]["cpu"].is_object());
    assert!(vms[0]["disks"].as_array().unwrap().is_empty());
    assert!(vms[0].get("creationTimestamp").is_some());
}

#[tokio::test]
async fn list_honours_namespace_query() {
    let (server, client) = setup();
    client.add_instance("default", "vm-d", VmiPhase::Running);
    client.add_instance("tenant", "vm-t", VmiPhase::Running);

    let body: Value = server
        .get("/vms")
        .add_query_param("namespace", "tenant")
        .await
        .json();

    let vms = body["vms"].as_array().unwrap();
    assert_eq!(vms.len(), 1);
    assert_eq!(vms[0]["name"], "vm-t");
    assert_eq!(vms[0]["namespace"], "tenant");
}

#[tokio::test]
async fn list_uses_configured_default_namespace() {
    let (server, client) = setup_with(GatewayConfig {
        default_namespace: "vms".to_string(),
        ..Default::default()
    });
    client.add_instance("vms", "vm-1", VmiPhase::Running);

    let body: Value = server.get("/vms").await.json();

    assert_eq!(body["vms"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_orchestrator_failure_is_server_error() {
    let (server, client) = setup();
    client.set_unavailable(true);

    let response = server.get("/vms").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "orchestrator_unavailable");
}

#[tokio::test]
async fn create_vm_returns_created() {
    let (server, client) = setup();

    let response = server.post("/vms").await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VirtualMachine");
    assert_eq!(body["metadata"]["name"], "jevenvm");
    assert_eq!(body["metadata"]["namespace"], "default");
    assert_eq!(body["spec"]["running"], true);
    assert_eq!(client.vm_count(), 1);
}

#[tokio::test]
async fn create_vm_duplicate_is_server_error() {
    let (server, _client) = setup();
    server.post("/vms").await.assert_status(StatusCode::CREATED);

    let response = server.post("/vms").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "conflict");
}

#[tokio::test]
async fn start_action() {
    let (server, client) = setup();
    client.add_instance("default", "vm1", VmiPhase::Scheduled);

    let response = server
        .post("/vms/vm1")
        .add_query_param("action", "start")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<String>(), "start");
    assert!(client.instance("default", "vm1").unwrap().is_running());
}

#[tokio::test]
async fn start_action_in_namespace() {
    let (server, client) = setup();
    client.add_instance("tenant", "vm1", VmiPhase::Pending);

    server
        .post("/vms/vm1")
        .add_query_param("action", "start")
        .add_query_param("namespace", "tenant")
        .await
        .assert_status_ok();

    assert!(client.instance("tenant", "vm1").unwrap().is_running());
}

#[tokio::test]
async fn unsupported_action_is_bad_request() {
    let (server, client) = setup();
    client.add_instance("default", "vm1", VmiPhase::Scheduled);

    let response = server
        .post("/vms/vm1")
        .add_query_param("action", "stop")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "bad_request");
    assert_eq!(client.update_calls(), 0);
    assert!(!client.instance("default", "vm1").unwrap().is_running());
}

#[tokio::test]
async fn missing_action_is_bad_request() {
    let (server, client) = setup();
    client.add_instance("default", "vm1", VmiPhase::Scheduled);

    let response = server.post("/vms/vm1").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(client.update_calls(), 0);
}

#[tokio::test]
async fn start_missing_vm_is_server_error() {
    let (server, _client) = setup();

    let response = server
        .post("/vms/missingname")
        .add_query_param("action", "start")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(error_code(&body), "not_found");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("missingname"));
}

#[tokio::test]
async fn start_survives_transient_conflict() {
    let (server, client) = setup();
    client.add_instance("default", "vm1", VmiPhase::Pending);
    client.fail_next_updates(1);

    server
        .post("/vms/vm1")
        .add_query_param("action", "start")
        .await
        .assert_status_ok();

    assert_eq!(client.update_calls(), 2);
    assert!(client.instance("default", "vm1").unwrap().is_running());
}
