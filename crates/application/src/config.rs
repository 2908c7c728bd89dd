//! Session layer configuration

/// Configuration of the session layer.
///
/// The defaults reproduce the conventional layout: one JSON record per
/// persistence tier at a fixed key, `/auth/*` endpoints, and the "Bearer"
/// scheme label.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key under which the credential pair is stored in either tier.
    pub storage_key: String,
    /// Path of the renewal endpoint.
    pub refresh_path: String,
    /// Path of the logout endpoint.
    pub logout_path: String,
    /// Scheme label attached to authorized calls unless overridden per call.
    pub default_token_type: String,
    /// Whether a successful renewal emits the refreshed notification.
    pub refresh_notice: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "nimbus.auth.credentials".to_string(),
            refresh_path: "/auth/refresh".to_string(),
            logout_path: "/auth/logout".to_string(),
            default_token_type: "Bearer".to_string(),
            refresh_notice: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.storage_key, "nimbus.auth.credentials");
        assert_eq!(config.refresh_path, "/auth/refresh");
        assert_eq!(config.default_token_type, "Bearer");
        assert!(config.refresh_notice);
    }
}
