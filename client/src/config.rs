use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const API_URL_VAR: &str = "PDF_QA_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `PDF_QA_API_URL`, falling back to the local development backend.
    pub fn from_env() -> Self {
        match env::var(API_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new(DEFAULT_API_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_ignored() {
        let config = ClientConfig::new("http://example.test/api/");
        assert_eq!(config.base_url(), "http://example.test/api");
        assert_eq!(config.endpoint("upload"), "http://example.test/api/upload");
        assert_eq!(config.endpoint("/question"), "http://example.test/api/question");
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(
            ClientConfig::default().endpoint("upload"),
            "http://localhost:8000/api/upload"
        );
    }
}
