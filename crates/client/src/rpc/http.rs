//! HTTP implementation of the RPC bridge transport.
//!
//! Posts each call to `{bridge_url}/api/rpc/{method}` with the arguments as
//! a JSON array body and returns the raw envelope text. Timeouts and
//! non-success statuses surface as transport errors.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;

use super::{BoxFuture, RpcTransport, TransportError};

/// `reqwest`-backed bridge transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    bridge_url: Url,
    token: Option<SecretString>,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            bridge_url: config.bridge_url.clone(),
            token: config.bridge_token.clone(),
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, TransportError> {
        let mut url = self.bridge_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::Unavailable("bridge URL cannot be a base".to_string()))?
            .extend(["api", "rpc", method]);
        Ok(url)
    }
}

impl RpcTransport for HttpTransport {
    fn invoke<'a>(
        &'a self,
        method: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, Result<String, TransportError>> {
        Box::pin(async move {
            let url = self.method_url(method)?;

            let mut request = self
                .client
                .post(url)
                .header("X-Request-Id", Uuid::new_v4().to_string())
                .json(args);

            if let Some(token) = &self.token {
                request = request.bearer_auth(token.expose_secret());
            }

            let response = request.send().await?.error_for_status()?;
            Ok(response.text().await?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(url: &str) -> ClientConfig {
        ClientConfig {
            bridge_url: Url::parse(url).expect("url"),
            bridge_token: None,
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_method_url_joins_segments() {
        let transport = HttpTransport::new(&config("http://127.0.0.1:5000")).expect("transport");
        let url = transport.method_url("get_cart").expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/rpc/get_cart");
    }

    #[test]
    fn test_method_url_respects_base_path() {
        let transport =
            HttpTransport::new(&config("http://127.0.0.1:5000/bridge")).expect("transport");
        let url = transport.method_url("login").expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/bridge/api/rpc/login");
    }
}
