//! Blocking HTTP implementation of the remote-call envelope.

use serde_json::Value;

use super::{Method, Transport};
use crate::error::{Error, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version header value sent with every request.
pub const API_VERSION: &str = "2022-06-28";

/// Bearer-token transport over a blocking HTTP client.
///
/// No retries and no timeouts beyond the client defaults; callers that
/// need either wrap the transport themselves.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
    version: String,
}

impl HttpTransport {
    /// Create a transport authenticating with the given integration token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            version: API_VERSION.to_string(),
        }
    }

    /// Build a transport from the `NOTION_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("NOTION_TOKEN")
            .map_err(|_| Error::Api("NOTION_TOKEN must be set".to_string()))?;
        Ok(Self::new(token))
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the API version header.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

impl Transport for HttpTransport {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        log::debug!("{} {}", method.as_str(), url);

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        }
        .bearer_auth(&self.token)
        .header("Notion-Version", &self.version);

        if let Some(body) = body {
            if method == Method::Get {
                request = request.query(&query_pairs(body));
            } else {
                request = request.json(body);
            }
        }

        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(Error::Api(format!(
                "{} {} returned {}: {}",
                method.as_str(),
                path,
                status,
                text.trim()
            )));
        }

        if text.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}

/// Flatten a JSON object into query pairs; array values repeat the key.
fn query_pairs(body: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(map) = body.as_object() {
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    for item in items {
                        pairs.push((key.clone(), scalar(item)));
                    }
                }
                other => pairs.push((key.clone(), scalar(other))),
            }
        }
    }
    pairs
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
