//! In-cluster credential discovery.
//!
//! A pod talks to its own API server with ambient identity material: the
//! service host and port arrive as environment variables, and the
//! orchestrator mounts a service-account token plus the cluster CA into
//! every container. Nothing here is configurable; either the pod carries
//! the material or the cluster query reports that it cannot run.

use std::env::VarError;
use std::fs;
use std::path::Path;

use crate::error::{PreflightError, Result};

const SERVICE_HOST_VAR: &str = "KUBERNETES_SERVICE_HOST";
const SERVICE_PORT_VAR: &str = "KUBERNETES_SERVICE_PORT";

/// Directory the orchestrator mounts service-account material into.
const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Ambient identity material for talking to the API server.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Base URL of the API server, `https://<host>:<port>`.
    pub server: String,
    /// Bearer token of the pod's service account.
    pub token: String,
    /// PEM bundle for the API server's certificate authority.
    pub ca_bundle: Vec<u8>,
}

impl ClusterConfig {
    /// Load the pod's in-cluster credentials.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key), Path::new(SERVICE_ACCOUNT_DIR))
    }

    /// Load with an injectable environment lookup and mount directory.
    pub fn load_with<F>(env_fn: F, mount_dir: &Path) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let host = require_var(&env_fn, SERVICE_HOST_VAR)?;
        let port = require_var(&env_fn, SERVICE_PORT_VAR)?;

        let token_path = mount_dir.join("token");
        let token = fs::read_to_string(&token_path).map_err(|e| PreflightError::Credentials {
            message: format!(
                "cannot read service account token at {}: {}",
                token_path.display(),
                e
            ),
        })?;

        let ca_path = mount_dir.join("ca.crt");
        let ca_bundle = fs::read(&ca_path).map_err(|e| PreflightError::Credentials {
            message: format!("cannot read CA bundle at {}: {}", ca_path.display(), e),
        })?;

        Ok(Self {
            server: format!("https://{}:{}", host, port),
            token: token.trim().to_string(),
            ca_bundle,
        })
    }
}

fn require_var<F>(env_fn: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    match env_fn(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PreflightError::Credentials {
            message: format!("{} is not set", key),
        }),
    }
}
