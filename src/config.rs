/// Request code reserved for authentication flow results unless configured otherwise.
pub const DEFAULT_REQUEST_CODE: i32 = 50000;

/// Settings for a [`PaymentAuthController`](crate::application::controller::PaymentAuthController).
///
/// The request code is the correlation token the host routes flow results
/// with. Two controllers sharing a host channel must use different codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub request_code: i32,
    /// Fallback return URL for redirects whose payload carries none.
    pub return_url: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            request_code: DEFAULT_REQUEST_CODE,
            return_url: None,
        }
    }
}

impl AuthConfig {
    pub fn with_request_code(mut self, request_code: i32) -> Self {
        self.request_code = request_code;
        self
    }

    pub fn with_return_url(mut self, return_url: impl Into<String>) -> Self {
        self.return_url = Some(return_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = AuthConfig::default()
            .with_request_code(7)
            .with_return_url("app://return");
        assert_eq!(config.request_code, 7);
        assert_eq!(config.return_url.as_deref(), Some("app://return"));
        assert_eq!(AuthConfig::default().request_code, DEFAULT_REQUEST_CODE);
    }
}
