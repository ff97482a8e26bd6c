use log::{debug, error, info};
use reqwest::header::ACCEPT;
use std::time::Instant;

use crate::happy::ServerUrlError;

/// Greeting every compatible server returns from its root URL.
pub const SERVER_MARKER: &str = "Welcome to Happy Server!";

/// Checks that a URL points at a compatible server with one GET request.
///
/// There is no retry and no timeout beyond the transport default; a failed
/// probe is reported as-is and the user decides whether to try again.
#[derive(Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self::with_client(reqwest::Client::builder().build()?))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn probe(&self, url: &str) -> Result<(), ServerUrlError> {
        debug!("Probing server at {}", url);
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/plain")
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach {}: {}", url, e);
                ServerUrlError::ConnectionFailed(e)
            })?;

        let status = response.status();
        debug!("Probe of {} answered {} in {:?}", url, status, started.elapsed());

        if !status.is_success() {
            error!("Server at {} returned error status {}", url, status);
            return Err(ServerUrlError::ServerError(status));
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", url, e);
            ServerUrlError::ConnectionFailed(e)
        })?;
        debug!("Probe response body is {} bytes", body.len());

        if !body.contains(SERVER_MARKER) {
            error!(
                "Server at {} is not compatible, body starts with {:?}",
                url,
                body.chars().take(100).collect::<String>()
            );
            return Err(ServerUrlError::NotACompatibleServer);
        }

        info!("Server at {} is compatible", url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::happy::ErrorKind;

    async fn probe(url: &str) -> Result<(), ServerUrlError> {
        Prober::new().unwrap().probe(url).await
    }

    #[tokio::test]
    async fn compatible_server_passes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("accept", "text/plain")
            .with_status(200)
            .with_body("Welcome to Happy Server! v1.2")
            .create_async()
            .await;

        assert!(probe(&server.url()).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn probes_the_exact_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/happy")
            .with_status(200)
            .with_body("<p>Welcome to Happy Server!</p>")
            .create_async()
            .await;

        assert!(probe(&format!("{}/happy", server.url())).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(500)
            .with_body("Welcome to Happy Server!")
            .create_async()
            .await;

        let err = probe(&server.url()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(matches!(err, ServerUrlError::ServerError(status) if status.as_u16() == 500));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_marker_is_not_compatible() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("hello")
            .create_async()
            .await;

        let err = probe(&server.url()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotACompatibleServer);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn probe_is_sent_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        assert!(probe(&server.url()).await.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn refused_connection_is_connection_failed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = probe(&format!("http://127.0.0.1:{}", port)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionFailed);
    }
}
