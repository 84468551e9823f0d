//! Tests for the Kubernetes REST directory against a mock API server

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use super::common::with_timeout;
use crate::error::MonkeyError;
use crate::services::{ClusterConfig, KubernetesDirectory};
use crate::traits::Directory;

fn pod_list(names: &[&str]) -> serde_json::Value {
    json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "1" },
        "items": names
            .iter()
            .map(|name| json!({ "metadata": { "name": name, "namespace": "workloads" } }))
            .collect::<Vec<_>>()
    })
}

fn status(code: u16, reason: &str, message: &str) -> serde_json::Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}

fn directory(server: &MockServer, namespace: &str) -> KubernetesDirectory {
    let cluster = ClusterConfig::from_api_server(&server.uri()).unwrap();
    KubernetesDirectory::new(&cluster, namespace).unwrap()
}

#[tokio::test]
async fn test_list_passes_namespace_and_selector() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/workloads/pods"))
        .and(query_param("labelSelector", "app=nginx,env=dev"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pod_list(&["nginx-1", "nginx-2", "nginx-3"])))
        .expect(1)
        .mount(&server)
        .await;

    let pods = directory(&server, "workloads")
        .list(&CancellationToken::new(), "app=nginx,env=dev")
        .await
        .unwrap();

    assert_eq!(pods, vec!["nginx-1", "nginx-2", "nginx-3"]);
}

#[tokio::test]
async fn test_list_without_selector_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/workloads/pods"))
        .and(|request: &Request| request.url.query().is_none())
        .respond_with(ResponseTemplate::new(200).set_body_json(pod_list(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let pods = directory(&server, "workloads")
        .list(&CancellationToken::new(), "")
        .await
        .unwrap();

    assert!(pods.is_empty());
}

#[tokio::test]
async fn test_list_returns_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(status(500, "InternalError", "etcd unavailable")))
        .mount(&server)
        .await;

    let err = directory(&server, "workloads")
        .list(&CancellationToken::new(), "app=nginx")
        .await
        .unwrap_err();

    match err {
        MonkeyError::Directory { operation, message } => {
            assert_eq!(operation, "list");
            assert!(message.contains("500"), "message: {message}");
            assert!(message.contains("etcd unavailable"), "message: {message}");
        }
        other => panic!("expected Directory error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pod_list(&["pod1"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut cluster = ClusterConfig::from_api_server(&server.uri()).unwrap();
    cluster.token = Some("secret-token".to_string());
    let directory = KubernetesDirectory::new(&cluster, "workloads").unwrap();

    let pods = directory.list(&CancellationToken::new(), "").await.unwrap();
    assert_eq!(pods, vec!["pod1"]);
}

#[tokio::test]
async fn test_delete_passes_namespace_and_pod_name() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/namespaces/namespace/pods/pod-name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "Pod" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = directory(&server, "namespace")
        .remove(&CancellationToken::new(), "pod-name")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_missing_pod_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(status(404, "NotFound", "pods \"gone\" not found")))
        .mount(&server)
        .await;

    let err = directory(&server, "workloads")
        .remove(&CancellationToken::new(), "gone")
        .await
        .unwrap_err();

    assert!(matches!(err, MonkeyError::NotFound { ref name } if name == "gone"));
}

#[tokio::test]
async fn test_delete_returns_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403).set_body_json(status(
            403,
            "Forbidden",
            "pods \"pod-name\" is forbidden: User cannot delete resource",
        )))
        .mount(&server)
        .await;

    let err = directory(&server, "workloads")
        .remove(&CancellationToken::new(), "pod-name")
        .await
        .unwrap_err();

    match err {
        MonkeyError::Directory { operation, message } => {
            assert_eq!(operation, "delete");
            assert!(message.contains("forbidden"), "message: {message}");
        }
        other => panic!("expected Directory error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_in_flight_list_aborts_on_cancellation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(pod_list(&["pod1"]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let directory = directory(&server, "workloads");
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = with_timeout(directory.list(&cancel, "app=nginx"))
        .await
        .expect("list should abort well before the mock responds");

    assert!(matches!(result, Err(MonkeyError::Cancelled)));
}

#[tokio::test]
async fn test_in_flight_delete_aborts_on_cancellation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/namespaces/workloads/pods/pod1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let directory = directory(&server, "workloads");
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = with_timeout(directory.remove(&cancel, "pod1"))
        .await
        .expect("delete should abort well before the mock responds");

    assert!(matches!(result, Err(MonkeyError::Cancelled)));
}

#[test]
fn test_empty_namespace_is_rejected() {
    let cluster = ClusterConfig::from_api_server("http://127.0.0.1:8001").unwrap();
    let err = KubernetesDirectory::new(&cluster, "").unwrap_err();
    assert!(matches!(err, MonkeyError::ClusterConfig { .. }));
}
