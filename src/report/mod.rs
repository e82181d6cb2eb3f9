//! Delivery of per-interval activity reports. [ReportSink] is the boundary to the server,
//! [http::HttpReportSink] is the production realization.

pub mod http;
pub mod log;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a single report. Field names are part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub employee_id: Arc<str>,
    pub mouse_activity: u64,
    pub keyboard_activity: u64,
    /// Idle seconds of this interval only. Either 0 or the full interval.
    pub idle_time: u64,
    pub active_window_title: Arc<str>,
}

/// Receiver of activity reports. A successful result carries the parsed response body, which is
/// only used for the local confirmation log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn submit(&self, report: &ActivityReport) -> Result<Value>;
}

/// Result of a detached report dispatch, handed back to the tracker loop.
#[derive(Debug)]
pub struct ReportOutcome {
    pub report: ActivityReport,
    pub response: Result<Value>,
}
