//! Control-plane version query.
//!
//! One read-only HTTPS request to the API server's `/version` endpoint,
//! authenticated with the pod's service-account token and verified
//! against the mounted cluster CA. Every failure on this path is folded
//! into [`ClusterVersionOutcome`] so the report always gets printed.

use anyhow::Context;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::cluster::ClusterConfig;
use crate::error::{PreflightError, Result};

/// Payload of the API server's `/version` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub minor: String,
    /// Full version tag, e.g. `v1.28.3-gke.1200`.
    pub git_version: String,
    #[serde(default)]
    pub git_commit: String,
    #[serde(default)]
    pub git_tree_state: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub go_version: String,
    #[serde(default)]
    pub compiler: String,
    #[serde(default)]
    pub platform: String,
}

/// Outcome of the control-plane version probe.
///
/// The report layer only asks [`ClusterVersionOutcome::git_version`]; the
/// failure arms exist so each kind gets logged with the right guidance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterVersionOutcome {
    /// The endpoint answered with a version payload.
    Detected(VersionInfo),
    /// In-cluster credentials could not be loaded.
    CredentialsUnavailable { message: String },
    /// The request was sent but failed, by transport error or status.
    RequestFailed { message: String },
    /// Anything else on the query path.
    Unexpected { message: String },
}

impl ClusterVersionOutcome {
    /// Version identifier when the probe succeeded.
    pub fn git_version(&self) -> Option<&str> {
        match self {
            Self::Detected(info) => Some(&info.git_version),
            _ => None,
        }
    }
}

/// Query the control plane, folding every failure into the outcome.
pub fn detect() -> ClusterVersionOutcome {
    let result = ClusterConfig::load().and_then(|config| fetch_version(&config));
    let outcome = outcome_from(result);

    match &outcome {
        ClusterVersionOutcome::Detected(_) => {}
        ClusterVersionOutcome::CredentialsUnavailable { message } => {
            tracing::error!(
                "Could not configure the Kubernetes client ({}). This tool must run \
                 inside a cluster pod with access to the API server.",
                message
            );
        }
        ClusterVersionOutcome::RequestFailed { message } => {
            tracing::error!(
                "Error querying the Kubernetes API version endpoint: {}",
                message
            );
        }
        ClusterVersionOutcome::Unexpected { message } => {
            tracing::error!("Unexpected error detecting the cluster version: {}", message);
        }
    }

    outcome
}

/// Classify a query result into the tagged outcome.
pub fn outcome_from(result: Result<VersionInfo>) -> ClusterVersionOutcome {
    match result {
        Ok(info) => ClusterVersionOutcome::Detected(info),
        Err(PreflightError::Credentials { message }) => {
            ClusterVersionOutcome::CredentialsUnavailable { message }
        }
        Err(PreflightError::ApiRequest { message }) => {
            ClusterVersionOutcome::RequestFailed { message }
        }
        Err(e) => ClusterVersionOutcome::Unexpected {
            message: e.to_string(),
        },
    }
}

const PEM_CERT_HEADER: &[u8] = b"-----BEGIN CERTIFICATE-----";

/// Issue the single `/version` request described by `config`.
pub fn fetch_version(config: &ClusterConfig) -> Result<VersionInfo> {
    // rustls accepts a PEM bundle containing zero certificates, so an
    // unreadable mount has to be rejected here rather than surfacing
    // later as a connection failure.
    if !config
        .ca_bundle
        .windows(PEM_CERT_HEADER.len())
        .any(|window| window == PEM_CERT_HEADER)
    {
        return Err(anyhow::anyhow!("Mounted CA bundle contains no certificates").into());
    }
    let certificate = reqwest::Certificate::from_pem(&config.ca_bundle)
        .context("Failed to parse the mounted CA bundle")?;
    let client = Client::builder()
        .user_agent("preflight")
        .add_root_certificate(certificate)
        .build()
        .context("Failed to build the HTTP client")?;

    let url = format!("{}/version", config.server);
    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", config.token))
        .send()
        .map_err(|e| PreflightError::ApiRequest {
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(PreflightError::ApiRequest {
            message: format!("HTTP {} from {}", response.status(), url),
        });
    }

    let info = response
        .json()
        .context("Failed to decode the version payload")?;
    Ok(info)
}
