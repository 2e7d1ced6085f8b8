use anyhow::{anyhow, Context, Result};
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::alert::AlertRecord;

/// Result of a completed POST, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
    pub status_line: String,
    /// Response body, only read for non-2xx responses.
    pub body: Option<String>,
}

impl Delivery {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn error_message(&self) -> Option<String> {
        (!self.is_success())
            .then(|| format!("Promsaint responded with non 2xx error: {}", self.status_line))
    }
}

pub struct PromsaintClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl PromsaintClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let endpoint = json_endpoint(base_url)?;
        Ok(PromsaintClient {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts the alert once. Transport failures are returned as errors; any
    /// HTTP response, including non-2xx, is a `Delivery`.
    pub async fn forward(&self, alert: &AlertRecord) -> Result<Delivery> {
        let body = alert.to_json()?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to post alert to {}", self.endpoint))?;

        let status = response.status();
        debug!("Status: {}", status.as_u16());

        let body = if status.is_success() {
            None
        } else {
            response.text().await.ok()
        };

        Ok(Delivery {
            status: status.as_u16(),
            status_line: status.to_string(),
            body,
        })
    }
}

/// Appends the `json` segment to whatever path the base url carries.
fn json_endpoint(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .with_context(|| format!("Invalid Promsaint url {:?}", base_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Promsaint url {:?} cannot have a path", base_url))?
        .pop_if_empty()
        .push("json");
    Ok(url)
}
