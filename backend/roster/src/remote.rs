//! # Remote
//!
//! Client for the spreadsheet processing service.
//!
//! The service is a deployed script sitting next to the enrolment
//! spreadsheet. Given a field mapping it reads the sheet and answers with a
//! fresh JSON array of records in the canonical schema.
//!
//! ## Contract
//! - `POST {url}?action=processData`
//! - Body: `{"mapping": {"Student ID": "<column>", ...}}`
//! - 2xx with a record array is success, anything else is an [`UpstreamError`]
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::{
    error::UpstreamError,
    records::{Dataset, FieldMapping},
};

pub const PROCESS_ACTION: &str = "processData";

/// Anything that can produce a freshly computed dataset from the spreadsheet.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, mapping: &FieldMapping) -> Result<Dataset, UpstreamError>;
}

pub struct AppsScriptSource {
    client: Client,
    url: String,
}

#[derive(Serialize)]
struct ProcessRequest<'a> {
    mapping: &'a FieldMapping,
}

impl AppsScriptSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordSource for AppsScriptSource {
    async fn fetch(&self, mapping: &FieldMapping) -> Result<Dataset, UpstreamError> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("action", PROCESS_ACTION)])
            .json(&ProcessRequest { mapping })
            .send()
            .await?;

        let status = response.status();
        debug!("Processing service status: {status}");

        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(UpstreamError::Malformed)
    }
}
