/// Client for the external analysis service
use crate::video_id::VideoId;
use futures::future::try_join;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Service responded with status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Sentiment,
    WordCloud,
    Blog,
    Question,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Sentiment => "/sentiment",
            Endpoint::WordCloud => "/word-cloud",
            Endpoint::Blog => "/blog",
            Endpoint::Question => "/question",
        }
    }
}

pub fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint.path())
}

/// Tone of a generated blog post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    Informative,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Formal, Tone::Casual, Tone::Informative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Informative => "informative",
        }
    }
}

/// Length of a generated blog post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogLength {
    Short,
    Medium,
    Long,
}

impl BlogLength {
    pub const ALL: [BlogLength; 3] = [BlogLength::Short, BlogLength::Medium, BlogLength::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlogLength::Short => "short",
            BlogLength::Medium => "medium",
            BlogLength::Long => "long",
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == s)
            .ok_or_else(|| format!("Unknown tone: {}", s))
    }
}

impl FromStr for BlogLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlogLength::ALL
            .into_iter()
            .find(|length| length.as_str() == s)
            .ok_or_else(|| format!("Unknown length: {}", s))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BlogLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Request bodies

#[derive(Debug, Serialize)]
pub struct VideoRequest<'a> {
    pub video_id: &'a VideoId,
}

#[derive(Debug, Serialize)]
pub struct BlogRequest<'a> {
    pub video_id: &'a VideoId,
    pub tone: Tone,
    pub length: BlogLength,
}

#[derive(Debug, Serialize)]
pub struct QuestionRequest<'a> {
    pub video_id: &'a VideoId,
    pub question: &'a str,
}

// Response bodies

#[derive(Debug, Deserialize)]
pub struct SentimentResponse {
    pub sentiment: String,
}

#[derive(Debug, Deserialize)]
pub struct WordCloudResponse {
    pub word_cloud: String,
}

#[derive(Debug, Deserialize)]
pub struct BlogResponse {
    pub blog_post: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionResponse {
    pub answer: String,
}

/// Base64-encoded PNG of a word cloud
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloud(pub String);

impl WordCloud {
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.0)
    }
}

/// Sentiment text together with its word cloud
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReport {
    pub sentiment: String,
    pub word_cloud: WordCloud,
}

/// Moves one JSON body to a URL and back.
/// Any non-2xx answer must come back as `ApiError::Status`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&self, url: &str, body: serde_json::Value) -> Result<serde_json::Value, ApiError>;
}

/// `reqwest`-backed transport; runs on fetch in the browser
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: serde_json::Value) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> AnalysisClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        AnalysisClient {
            base_url: base_url.into(),
            transport,
        }
    }

    async fn call<Req, Resp>(&self, endpoint: Endpoint, request: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Encode(e.to_string()))?;
        let url = endpoint_url(&self.base_url, endpoint);
        log::debug!("POST {}", url);

        let value = self.transport.post_json(&url, body).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", endpoint.path(), e)))
    }

    pub async fn sentiment(&self, video_id: &VideoId) -> Result<String, ApiError> {
        let response: SentimentResponse = self.call(Endpoint::Sentiment, &VideoRequest { video_id }).await?;
        Ok(response.sentiment)
    }

    pub async fn word_cloud(&self, video_id: &VideoId) -> Result<WordCloud, ApiError> {
        let response: WordCloudResponse = self.call(Endpoint::WordCloud, &VideoRequest { video_id }).await?;
        Ok(WordCloud(response.word_cloud))
    }

    /// Both requests go out together; either failing fails the pair
    pub async fn sentiment_with_word_cloud(&self, video_id: &VideoId) -> Result<SentimentReport, ApiError> {
        let (sentiment, word_cloud) = try_join(self.sentiment(video_id), self.word_cloud(video_id)).await?;
        Ok(SentimentReport { sentiment, word_cloud })
    }

    pub async fn blog_post(&self, video_id: &VideoId, tone: Tone, length: BlogLength) -> Result<String, ApiError> {
        let request = BlogRequest { video_id, tone, length };
        let response: BlogResponse = self.call(Endpoint::Blog, &request).await?;
        Ok(response.blog_post)
    }

    pub async fn answer(&self, video_id: &VideoId, question: &str) -> Result<String, ApiError> {
        let request = QuestionRequest { video_id, question };
        let response: QuestionResponse = self.call(Endpoint::Question, &request).await?;
        Ok(response.answer)
    }
}
