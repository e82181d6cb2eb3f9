use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ActivityReport, ReportSink};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/log-activity";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts reports as JSON to a fixed endpoint. There is no retry, a failed request is simply
/// returned as an error.
pub struct HttpReportSink {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpReportSink {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = reqwest::Url::parse(endpoint)
            .with_context(|| format!("Invalid report endpoint {endpoint}"))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn submit(&self, report: &ActivityReport) -> Result<Value> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(report)
            .send()
            .await
            .context("Failed to send activity report")?;

        let status = response.status();
        if !status.is_success() {
            // The body still drives the confirmation log as long as it is JSON.
            warn!("Report endpoint answered with {status}");
        }

        let body = response
            .json::<Value>()
            .await
            .context("Report response is not valid JSON")?;
        debug!("Report acknowledged {body}");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpReportSink, DEFAULT_ENDPOINT};

    #[test]
    fn accepts_default_endpoint() {
        let sink = HttpReportSink::new(DEFAULT_ENDPOINT).unwrap();
        assert_eq!(sink.endpoint().path(), "/api/log-activity");
    }

    #[test]
    fn rejects_malformed_endpoint() {
        assert!(HttpReportSink::new("not a url").is_err());
    }
}
