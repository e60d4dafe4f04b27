//! Submission persistence boundary
//!
//! Handlers only see the [`SubmissionStore`] trait. The in-memory store is
//! a stand-in for a real datastore and loses everything on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dynform_core::Submission;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Submission store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A stored submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// 1-based position in the store
    pub id: u64,
    pub form_id: Option<String>,
    pub data: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

/// Selection criteria for [`SubmissionStore::query`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionFilter {
    pub form_id: Option<String>,
}

impl SubmissionFilter {
    pub fn form(form_id: impl Into<String>) -> Self {
        Self {
            form_id: Some(form_id.into()),
        }
    }

    pub fn matches(&self, record: &SubmissionRecord) -> bool {
        match &self.form_id {
            Some(id) => record.form_id.as_deref() == Some(id.as_str()),
            None => true,
        }
    }
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store an accepted submission and return its id
    async fn append(&self, submission: Submission) -> Result<u64>;

    /// Records matching `filter`, oldest first
    async fn query(&self, filter: &SubmissionFilter) -> Result<Vec<SubmissionRecord>>;

    async fn count(&self) -> Result<usize>;
}

#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    records: RwLock<Vec<SubmissionRecord>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn append(&self, submission: Submission) -> Result<u64> {
        let mut records = self.records.write().await;
        let id = records.len() as u64 + 1;
        records.push(SubmissionRecord {
            id,
            form_id: submission.form_id,
            data: submission.data,
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    async fn query(&self, filter: &SubmissionFilter) -> Result<Vec<SubmissionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+$";

/// Compiled email pattern; `None` if it failed to compile, in which case no
/// address passes the format check
fn email_format() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::error!(pattern = EMAIL_PATTERN, error = %err, "Email pattern failed to compile");
                None
            }
        })
        .as_ref()
}

/// Outcome of an email availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCheck {
    pub valid: bool,
    pub message: String,
}

impl EmailCheck {
    fn new(valid: bool, message: &str) -> Self {
        Self {
            valid,
            message: message.to_string(),
        }
    }
}

/// Registered email addresses, compared case-insensitively
#[derive(Debug)]
pub struct EmailRegistry {
    emails: RwLock<HashSet<String>>,
}

impl EmailRegistry {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: RwLock::new(
                emails
                    .into_iter()
                    .map(|e| e.as_ref().to_lowercase())
                    .collect(),
            ),
        }
    }

    /// Format check then uniqueness check
    pub async fn check(&self, email: &str) -> EmailCheck {
        if !email_format().is_some_and(|re| re.is_match(email)) {
            return EmailCheck::new(false, "Invalid email format");
        }
        if self.is_registered(email).await {
            return EmailCheck::new(false, "This email is already registered");
        }
        EmailCheck::new(true, "Email is available")
    }

    pub async fn is_registered(&self, email: &str) -> bool {
        self.emails.read().await.contains(&email.to_lowercase())
    }

    /// Returns false if the address was already present
    pub async fn register(&self, email: &str) -> bool {
        self.emails.write().await.insert(email.to_lowercase())
    }

    pub async fn len(&self) -> usize {
        self.emails.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.emails.read().await.is_empty()
    }
}

impl Default for EmailRegistry {
    fn default() -> Self {
        Self::new(["test@example.com", "admin@example.com"])
    }
}
