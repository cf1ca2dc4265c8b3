use std::time::Duration;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::header::CONTENT_TYPE;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (compatible; goodscrape/0.1)".to_string(),
        }
    }
}

/// Fixed inter-request pacing. Not incidental: skipping the delays raises the
/// rate of interstitial pop-ups and half-rendered pages on the remote host.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// Delay after every network-facing step.
    pub request_delay: Duration,
    /// Longer delay after a sort or language-filter change.
    pub settle_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(2),
            settle_delay: Duration::from_secs(4),
        }
    }
}

impl Pacing {
    /// No delays; for tests against local mock servers.
    pub fn zero() -> Self {
        Self {
            request_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
        }
    }

    pub fn with_request_delay(delay: Duration) -> Self {
        Self {
            request_delay: delay,
            ..Self::default()
        }
    }

    pub async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    pub async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::InvalidUrl => write!(f, "invalid url"),
            FetchFailure::HttpStatus(code) => write!(f, "http status {code}"),
            FetchFailure::Timeout => write!(f, "timeout"),
            FetchFailure::Network => write!(f, "network error"),
            FetchFailure::Decode => write!(f, "decode error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchFailure,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FetchFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A 404 is the pagination end marker; anything else network-shaped is a
    /// possible truncation. See the list crawler.
    pub fn is_http_not_found(&self) -> bool {
        self.kind == FetchFailure::HttpStatus(404)
    }
}

/// Retrieves one rendered document over plain HTTP.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent)
            .build()
            .map_err(|err| FetchError::new(FetchFailure::Network, err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FetchFailure::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FetchFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        decode_body(&bytes, content_type.as_deref())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FetchFailure::Timeout, err.to_string());
    }
    FetchError::new(FetchFailure::Network, err.to_string())
}

/// Decode order: BOM, then Content-Type charset, then chardetng detection.
fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<String, FetchError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }
    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        part.strip_prefix("charset=")
            .or_else(|| part.strip_prefix("Charset="))
            .or_else(|| part.strip_prefix("CHARSET="))
            .map(|value| value.trim_matches(['"', '\'', ' ']).to_string())
    })
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<String, FetchError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(FetchError::new(
            FetchFailure::Decode,
            format!("failed to decode body as {}", encoding.name()),
        ));
    }
    Ok(text.into_owned())
}
