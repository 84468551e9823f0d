//! Production directory backed by the Kubernetes core/v1 pods API
//!
//! Talks plain REST through `reqwest`: pods are listed with a label selector
//! and deleted by name, both scoped to a single namespace.

use std::future::Future;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use shared::{agent_debug, AgentId};
use tokio_util::sync::CancellationToken;

use crate::error::{MonkeyError, MonkeyResult};
use crate::services::cluster::ClusterConfig;
use crate::traits::Directory;

/// Pod directory for one namespace of a Kubernetes cluster
#[derive(Debug, Clone)]
pub struct KubernetesDirectory {
    client: reqwest::Client,
    server: String,
    token: Option<String>,
    namespace: String,
}

#[derive(Debug, Deserialize)]
struct PodList {
    #[serde(default)]
    items: Vec<Pod>,
}

#[derive(Debug, Deserialize)]
struct Pod {
    metadata: ObjectMeta,
}

#[derive(Debug, Deserialize)]
struct ObjectMeta {
    name: String,
}

/// Body of a failed API call (`kind: Status`)
#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl KubernetesDirectory {
    /// Create a directory for `namespace` on the configured cluster
    pub fn new(cluster: &ClusterConfig, namespace: impl Into<String>) -> MonkeyResult<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(MonkeyError::config("namespace must not be empty"));
        }

        Ok(Self {
            client: cluster.build_client()?,
            server: cluster.server.clone(),
            token: cluster.token.clone(),
            namespace,
        })
    }

    fn pods_url(&self) -> String {
        format!("{}/api/v1/namespaces/{}/pods", self.server, self.namespace)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn a non-success response into a directory error
    async fn failure(operation: &str, response: reqwest::Response) -> MonkeyError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Status>(&body)
            .ok()
            .and_then(|s| s.message.or(s.reason))
            .unwrap_or(body);

        MonkeyError::directory(operation, format!("HTTP {status}: {detail}"))
    }
}

/// Race a request against cancellation
async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> MonkeyResult<T>
where
    F: Future<Output = MonkeyResult<T>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(MonkeyError::Cancelled),
        result = call => result,
    }
}

#[async_trait]
impl Directory for KubernetesDirectory {
    async fn list(&self, cancel: &CancellationToken, selector: &str) -> MonkeyResult<Vec<String>> {
        let mut request = self.request(Method::GET, self.pods_url());
        if !selector.is_empty() {
            request = request.query(&[("labelSelector", selector)]);
        }

        cancellable(cancel, async move {
            let response = request
                .send()
                .await
                .map_err(|e| MonkeyError::directory("list", e.to_string()))?;
            if !response.status().is_success() {
                return Err(Self::failure("list", response).await);
            }

            let pods: PodList = response
                .json()
                .await
                .map_err(|e| MonkeyError::directory("list", e.to_string()))?;
            let names: Vec<String> = pods.items.into_iter().map(|pod| pod.metadata.name).collect();

            agent_debug!(AgentId::current(), "📋 Listed {} pods in {}", names.len(), self.namespace);
            Ok(names)
        })
        .await
    }

    async fn remove(&self, cancel: &CancellationToken, name: &str) -> MonkeyResult<()> {
        let request = self.request(Method::DELETE, format!("{}/{}", self.pods_url(), name));

        cancellable(cancel, async move {
            let response = request
                .send()
                .await
                .map_err(|e| MonkeyError::directory("delete", e.to_string()))?;

            match response.status() {
                status if status.is_success() => Ok(()),
                StatusCode::NOT_FOUND => Err(MonkeyError::NotFound {
                    name: name.to_string(),
                }),
                _ => Err(Self::failure("delete", response).await),
            }
        })
        .await
    }
}
