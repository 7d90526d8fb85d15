use crate::types::{AppError, Result};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// HTTP GET with a fixed user agent and timeout, following redirects
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url`. Non-2xx responses are errors; timeouts map to
    /// [`AppError::Timeout`].
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        tracing::debug!("Attempting to fetch: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(format!(
                    "Timeout fetching {} after {} seconds",
                    url,
                    self.timeout.as_secs()
                ))
            } else {
                AppError::Http(format!("Request error fetching {}: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Http(format!(
                "HTTP {} fetching {}",
                status.as_u16(),
                url
            )));
        }

        let body = response.text().await?;
        tracing::info!(
            "Successfully fetched {} (Status: {}, Size: {} bytes)",
            url,
            status.as_u16(),
            body.len()
        );

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", "agentlab-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new("agentlab-test", Duration::from_secs(5)).unwrap();
        let page = fetcher
            .fetch(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(DEFAULT_USER_AGENT, Duration::from_millis(50)).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let page = fetcher
            .fetch(&format!("{}/old", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.body, "moved");
    }
}
