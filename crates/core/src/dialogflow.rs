//! Offline helpers for addressing the conversational-AI platform's session
//! context. Nothing here talks to the network; the webhook only needs a
//! project id (read from a service-account credentials file) and the session
//! path format to reference the session in logs.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("could not read credentials file `{path}`: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("could not parse credentials file `{path}`: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("credentials file `{path}` has no `project_id` field")]
    MissingProjectId { path: String },
}

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    #[serde(default)]
    project_id: Option<String>,
}

/// Extract the `project_id` from a Google service-account key file.
pub fn project_id_from_credentials(path: &Path) -> Result<String, CredentialsError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path)
        .map_err(|source| CredentialsError::Read { path: display.clone(), source })?;
    let key: ServiceAccountKey = serde_json::from_str(&raw)
        .map_err(|source| CredentialsError::Parse { path: display.clone(), source })?;

    key.project_id
        .filter(|project_id| !project_id.trim().is_empty())
        .ok_or(CredentialsError::MissingProjectId { path: display })
}

/// Full session resource path the platform uses to identify a conversation.
pub fn session_path(project_id: &str, session: &str) -> String {
    // Callers sometimes forward the full resource path as the session id;
    // leave those untouched.
    if session.starts_with("projects/") {
        return session.to_string();
    }
    format!("projects/{project_id}/agent/sessions/{session}")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{project_id_from_credentials, session_path, CredentialsError};

    #[test]
    fn session_path_is_formatted_from_parts() {
        assert_eq!(
            session_path("relief-agent", "abc-123"),
            "projects/relief-agent/agent/sessions/abc-123"
        );
    }

    #[test]
    fn full_resource_paths_pass_through() {
        let full = "projects/relief-agent/agent/sessions/abc-123";
        assert_eq!(session_path("other-project", full), full);
    }

    #[test]
    fn project_id_is_read_from_key_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{ "type": "service_account", "project_id": "relief-agent" }"#)
            .expect("write key file");

        let project_id = project_id_from_credentials(&path).expect("project id should parse");
        assert_eq!(project_id, "relief-agent");
    }

    #[test]
    fn key_file_without_project_id_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{ "type": "service_account" }"#).expect("write key file");

        let error = project_id_from_credentials(&path).expect_err("missing project id");
        assert!(matches!(error, CredentialsError::MissingProjectId { .. }));
    }
}
