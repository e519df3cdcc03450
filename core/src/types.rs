//! JSON documents returned by the daemon.
//!
//! # Design
//! Only the fields the client reads are declared; unknown fields are
//! ignored so newer daemons keep decoding. These types are defined
//! independently from the mock-server crate; integration tests catch drift.

use serde::{Deserialize, Serialize};

/// Body of `GET /version`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SystemVersion {
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub components: Vec<ComponentVersion>,
    pub version: String,
    pub api_version: String,
    #[serde(rename = "MinAPIVersion", default)]
    pub min_api_version: Option<String>,
    #[serde(default)]
    pub git_commit: Option<String>,
    #[serde(default)]
    pub go_version: Option<String>,
    pub os: String,
    pub arch: String,
    #[serde(default)]
    pub kernel_version: Option<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub build_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Platform {
    pub name: String,
}

/// One entry of `SystemVersion::components`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ComponentVersion {
    pub name: String,
    pub version: String,
}

/// One entry of `GET /containers/json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    pub id: String,
    #[serde(default)]
    pub names: Vec<String>,
    pub image: String,
    pub state: String,
    #[serde(default)]
    pub status: String,
}

/// Error body the daemon sends with non-2xx statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_version_from_daemon_json() {
        let raw = r#"{
            "Platform": {"Name": "Docker Engine - Community"},
            "Components": [{"Name": "Engine", "Version": "27.3.1", "Details": {"Os": "linux"}}],
            "Version": "27.3.1",
            "ApiVersion": "1.47",
            "MinAPIVersion": "1.24",
            "GitCommit": "41ca978",
            "GoVersion": "go1.22.7",
            "Os": "linux",
            "Arch": "amd64",
            "KernelVersion": "6.8.0",
            "BuildTime": "2024-09-20T11:41:11.000000000+00:00"
        }"#;
        let version: SystemVersion = serde_json::from_str(raw).unwrap();
        assert_eq!(version.api_version, "1.47");
        assert_eq!(version.min_api_version.as_deref(), Some("1.24"));
        assert_eq!(version.components[0].name, "Engine");
        assert!(!version.experimental);
    }

    #[test]
    fn system_version_minimal() {
        let raw = r#"{"Version":"1.0","ApiVersion":"1.46","Os":"linux","Arch":"arm64"}"#;
        let version: SystemVersion = serde_json::from_str(raw).unwrap();
        assert!(version.platform.is_none());
        assert!(version.components.is_empty());
    }

    #[test]
    fn system_version_requires_core_fields() {
        let result: Result<SystemVersion, _> = serde_json::from_str(r#"{"Version":"1.0"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn container_summary_from_daemon_json() {
        let raw = r#"[{"Id":"8dfafdbc3a40","Names":["/boring_feynman"],"Image":"ubuntu:latest","State":"running","Status":"Up 2 hours","Ports":[]}]"#;
        let containers: Vec<ContainerSummary> = serde_json::from_str(raw).unwrap();
        assert_eq!(containers[0].names, ["/boring_feynman"]);
        assert_eq!(containers[0].state, "running");
    }

    #[test]
    fn error_message_from_daemon_json() {
        let err: ErrorMessage = serde_json::from_str(r#"{"message":"No such container: x"}"#).unwrap();
        assert_eq!(err.message, "No such container: x");
    }
}
