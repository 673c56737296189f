//! Backend transport.

use crate::config::ServerConfig;
use crate::error::{DubshError, Result};
use crate::stream::Reply;
use crate::submit::request::SubmitRequest;
use reqwest::Url;
use std::time::Duration;

/// Sends a submission and hands back the reply unread.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn send(&self, request: SubmitRequest) -> Result<Reply>;
}

/// The processing endpoint over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
}

/// `User-Agent` sent with every request, e.g. `dubsh/0.1.0+abc1234`.
pub fn user_agent() -> String {
    format!("dubsh/{}", crate::version_string())
}

impl HttpBackend {
    pub fn new(server: &ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent())
            .connect_timeout(Duration::from_secs(server.connect_timeout_secs))
            .build()
            .map_err(|e| DubshError::Transport {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: server.process_url()?,
        })
    }

    #[cfg(test)]
    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn send(&self, request: SubmitRequest) -> Result<Reply> {
        let form = request.into_form()?;
        log::debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(
                reqwest::header::ACCEPT,
                "application/x-ndjson, application/json",
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| DubshError::Transport {
                message: e.to_string(),
            })?;
        Ok(Reply::from_response(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let server = ServerConfig {
            url: "http://dub.local:9000".to_string(),
            process_path: "/api/process".to_string(),
            ..ServerConfig::default()
        };
        let backend = HttpBackend::new(&server).unwrap();
        assert_eq!(
            backend.endpoint().as_str(),
            "http://dub.local:9000/api/process"
        );
    }

    #[test]
    fn test_user_agent_names_crate_and_version() {
        let agent = user_agent();
        assert_eq!(agent, format!("dubsh/{}", crate::version_string()));
        assert!(agent.starts_with(concat!("dubsh/", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let server = ServerConfig {
            url: "::not a url".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            HttpBackend::new(&server),
            Err(DubshError::ConfigInvalidValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is essentially never listening.
        let server = ServerConfig {
            url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 2,
            ..ServerConfig::default()
        };
        let backend = HttpBackend::new(&server).unwrap();
        let request = SubmitRequest::new(
            crate::submit::Upload::new("a.txt", b"x".to_vec()),
            Default::default(),
            Default::default(),
        );
        let err = backend.send(request).await.unwrap_err();
        assert!(matches!(err, DubshError::Transport { .. }), "got {err:?}");
    }
}
