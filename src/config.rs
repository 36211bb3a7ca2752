//! Platform configuration.
//!
//! All operations that need to know the project, location, endpoint, or
//! credentials receive an explicit [`PlatformConfig`] value. There is no
//! process-wide configuration state anywhere in the crate: whatever context a
//! call needs, it is handed at construction time and never mutated after.

use secrecy::{ExposeSecret, SecretString};

/// Immutable configuration for one platform connection.
///
/// Cloning is cheap and gives an identical, independent value; many models
/// and sessions may share clones of the same configuration concurrently.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    project: String,
    location: String,
    api_endpoint: String,
    publisher: String,
    credentials: Option<SecretString>,
}

impl PlatformConfig {
    /// Creates a configuration for a project/location pair against the given
    /// regional API endpoint (e.g. `https://us-central1-aiplatform.example.com`).
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        api_endpoint: impl Into<String>,
    ) -> Self {
        let api_endpoint = api_endpoint.into();
        Self {
            project: project.into(),
            location: location.into(),
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            publisher: "google".to_string(),
            credentials: None,
        }
    }

    /// Attach an opaque bearer credential.
    ///
    /// Credential minting (service accounts, token refresh) is the concern of
    /// whoever constructs the configuration; this crate only carries the
    /// resulting token and never logs it.
    pub fn with_credentials(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(SecretString::from(token.into()));
        self
    }

    /// Override the publisher segment used when resolving short model ids.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }

    /// Project id.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Location (region) id.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Base URL of the regional API endpoint, without a trailing slash.
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// The bearer credential, if one was attached.
    pub(crate) fn bearer_token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.expose_secret())
    }

    /// Resolves a model id to its full resource path.
    ///
    /// Ids that already contain a `/` are treated as full resource names and
    /// passed through unchanged; short ids (e.g. `text-bison@001`) are
    /// expanded under this configuration's project, location, and publisher.
    pub fn model_path(&self, model_id: &str) -> String {
        if model_id.contains('/') {
            return model_id.to_string();
        }
        format!(
            "projects/{}/locations/{}/publishers/{}/models/{}",
            self.project, self.location, self.publisher, model_id
        )
    }
}
