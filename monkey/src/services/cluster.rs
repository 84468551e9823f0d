//! Kubernetes API connection settings
//!
//! Resolves where the API server lives and how to authenticate against it.
//! Three sources are supported:
//!
//! 1. The in-cluster service account (`KUBERNETES_SERVICE_HOST`/`_PORT` plus
//!    the token and CA mounted under [`SERVICE_ACCOUNT_DIR`])
//! 2. A local kubeconfig file, following its `current-context`
//! 3. A bare API server URL such as a `kubectl proxy` endpoint
//!
//! Kubeconfig users that authenticate with client certificates or exec
//! plugins are not supported; point `--api-server` at `kubectl proxy` instead.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine;
use serde::Deserialize;

use crate::error::{MonkeyError, MonkeyResult};

/// Where Kubernetes mounts the pod's service account credentials
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Connection settings for one Kubernetes API server
#[derive(Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Base URL of the API server, without trailing slash
    pub server: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// PEM-encoded CA bundle used to verify the server
    pub root_certificate: Option<Vec<u8>>,
    /// Skip TLS verification entirely
    pub accept_invalid_certs: bool,
}

impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("server", &self.server)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("root_certificate", &self.root_certificate.as_ref().map(Vec::len))
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ClusterConfig {
    /// Unauthenticated access to an API server, e.g. `kubectl proxy`
    pub fn from_api_server(url: &str) -> MonkeyResult<Self> {
        let server = url.trim().trim_end_matches('/');
        if !(server.starts_with("http://") || server.starts_with("https://")) {
            return Err(MonkeyError::config(format!(
                "API server URL must start with http:// or https://, got '{url}'"
            )));
        }

        Ok(Self {
            server: server.to_string(),
            token: None,
            root_certificate: None,
            accept_invalid_certs: false,
        })
    }

    /// Configuration of the pod this process runs in
    pub fn in_cluster() -> MonkeyResult<Self> {
        let host = std::env::var("KUBERNETES_SERVICE_HOST").map_err(|_| {
            MonkeyError::config("cannot fetch cluster config: KUBERNETES_SERVICE_HOST is not set")
        })?;
        let port = std::env::var("KUBERNETES_SERVICE_PORT").map_err(|_| {
            MonkeyError::config("cannot fetch cluster config: KUBERNETES_SERVICE_PORT is not set")
        })?;

        Self::in_cluster_from(Path::new(SERVICE_ACCOUNT_DIR), &host, &port)
    }

    /// In-cluster configuration read from an explicit service account directory
    pub fn in_cluster_from(service_account_dir: &Path, host: &str, port: &str) -> MonkeyResult<Self> {
        let token = std::fs::read_to_string(service_account_dir.join("token")).map_err(|e| {
            MonkeyError::config(format!("cannot read service account token: {e}"))
        })?;
        let root_certificate = std::fs::read(service_account_dir.join("ca.crt"))
            .map_err(|e| MonkeyError::config(format!("cannot read service account CA: {e}")))?;

        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };

        Ok(Self {
            server: format!("https://{host}:{port}"),
            token: Some(token.trim().to_string()),
            root_certificate: Some(root_certificate),
            accept_invalid_certs: false,
        })
    }

    /// Configuration from a kubeconfig file, following its current context
    pub fn from_kubeconfig(path: &Path) -> MonkeyResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MonkeyError::config(format!("cannot fetch local cluster config {}: {e}", path.display()))
        })?;
        let kubeconfig: Kubeconfig = serde_yaml::from_str(&raw)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        kubeconfig.resolve(base_dir)
    }

    /// Build the HTTP client that talks to this server.
    ///
    /// No request timeout is set; callers bound calls through cancellation.
    pub fn build_client(&self) -> MonkeyResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder();

        if let Some(pem) = &self.root_certificate {
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(pem)?);
        }
        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder.build()?)
    }
}

/// Locate the kubeconfig: explicit path, then `$KUBECONFIG`, then `~/.kube/config`
pub fn resolve_kubeconfig_path(explicit: Option<&Path>) -> MonkeyResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(paths) = std::env::var_os("KUBECONFIG") {
        if let Some(first) = std::env::split_paths(&paths).find(|p| !p.as_os_str().is_empty()) {
            return Ok(first);
        }
    }

    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".kube").join("config"))
        .ok_or_else(|| MonkeyError::config("cannot locate kubeconfig: neither KUBECONFIG nor HOME is set"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Kubeconfig {
    #[serde(default)]
    clusters: Vec<NamedCluster>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
    #[serde(default)]
    users: Vec<NamedUser>,
    #[serde(default)]
    current_context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedCluster {
    name: String,
    cluster: ClusterEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ClusterEntry {
    server: String,
    #[serde(default)]
    certificate_authority: Option<PathBuf>,
    #[serde(default)]
    certificate_authority_data: Option<String>,
    #[serde(default)]
    insecure_skip_tls_verify: bool,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    name: String,
    context: ContextEntry,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    cluster: String,
    #[serde(default)]
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedUser {
    name: String,
    #[serde(default)]
    user: UserEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct UserEntry {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "tokenFile")]
    token_file: Option<PathBuf>,
    #[serde(default)]
    client_certificate: Option<String>,
    #[serde(default)]
    client_certificate_data: Option<String>,
    #[serde(default)]
    exec: Option<serde_yaml::Value>,
    #[serde(default)]
    auth_provider: Option<serde_yaml::Value>,
}

impl Kubeconfig {
    fn resolve(self, base_dir: &Path) -> MonkeyResult<ClusterConfig> {
        let context_name = self
            .current_context
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| MonkeyError::config("kubeconfig has no current-context"))?;

        let context = self
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .map(|c| &c.context)
            .ok_or_else(|| MonkeyError::config(format!("kubeconfig context '{context_name}' not found")))?;

        let cluster = self
            .clusters
            .iter()
            .find(|c| c.name == context.cluster)
            .map(|c| &c.cluster)
            .ok_or_else(|| {
                MonkeyError::config(format!("kubeconfig cluster '{}' not found", context.cluster))
            })?;

        let user = match context.user.as_deref() {
            Some(name) => Some(
                self.users
                    .iter()
                    .find(|u| u.name == name)
                    .map(|u| &u.user)
                    .ok_or_else(|| MonkeyError::config(format!("kubeconfig user '{name}' not found")))?,
            ),
            None => None,
        };

        let root_certificate = match (&cluster.certificate_authority_data, &cluster.certificate_authority) {
            (Some(data), _) => Some(
                base64::engine::general_purpose::STANDARD
                    .decode(data.trim())
                    .map_err(|e| MonkeyError::config(format!("invalid certificate-authority-data: {e}")))?,
            ),
            (None, Some(path)) => Some(std::fs::read(base_dir.join(path)).map_err(|e| {
                MonkeyError::config(format!("cannot read certificate-authority {}: {e}", path.display()))
            })?),
            (None, None) => None,
        };

        let token = match user {
            Some(user) => user.bearer_token(base_dir)?,
            None => None,
        };

        Ok(ClusterConfig {
            server: cluster.server.trim_end_matches('/').to_string(),
            token,
            root_certificate,
            accept_invalid_certs: cluster.insecure_skip_tls_verify,
        })
    }
}

impl UserEntry {
    fn bearer_token(&self, base_dir: &Path) -> MonkeyResult<Option<String>> {
        if let Some(token) = &self.token {
            return Ok(Some(token.clone()));
        }
        if let Some(path) = &self.token_file {
            let token = std::fs::read_to_string(base_dir.join(path)).map_err(|e| {
                MonkeyError::config(format!("cannot read tokenFile {}: {e}", path.display()))
            })?;
            return Ok(Some(token.trim().to_string()));
        }
        if self.client_certificate.is_some()
            || self.client_certificate_data.is_some()
            || self.exec.is_some()
            || self.auth_provider.is_some()
        {
            return Err(MonkeyError::config(
                "kubeconfig user authenticates with client certificates or a plugin; \
                 run `kubectl proxy` and pass --api-server http://127.0.0.1:8001",
            ));
        }
        Ok(None)
    }
}
