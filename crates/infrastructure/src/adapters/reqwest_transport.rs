//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port using the reqwest
//! library. It moves one fully assembled request and reports the raw
//! status and body; retry and authorization policy stay in the
//! application layer.

use async_trait::async_trait;
use nimbus_application::{HttpMethod, HttpTransport, RawResponse, TransportError, TransportRequest};
use reqwest::{Client, Method};
use url::Url;

/// `HttpTransport` implementation over `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a transport rooted at `base_url`.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "Nimbus/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new(base_url: Url) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("Nimbus/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::InvalidRequest {
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Resolves a request path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| TransportError::InvalidRequest {
            message: format!("invalid request path {path}: {e}"),
        })
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the transport error taxonomy.
    fn map_error(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout;
        }
        if error.is_connect() {
            let message = error.to_string();
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();
            if message.to_lowercase().contains("dns") || message.to_lowercase().contains("resolve")
            {
                return TransportError::DnsFailure { host };
            }
            return TransportError::ConnectionFailed { message };
        }
        TransportError::InvalidRequest {
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> Result<RawResponse, TransportError> {
        let url = self.endpoint(&request.path)?;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .header("Content-Type", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(authorization) = &request.authorization {
            builder = builder.header("Authorization", authorization);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| Self::map_error(&e))?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let t = transport("https://example.com/api");
        assert_eq!(
            t.endpoint("/auth/refresh").unwrap().as_str(),
            "https://example.com/api/auth/refresh"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash_on_base() {
        let t = transport("https://example.com/api/");
        assert_eq!(
            t.endpoint("/users/me").unwrap().as_str(),
            "https://example.com/api/users/me"
        );
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
    }
}
