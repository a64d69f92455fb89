//! Docket Extraction Service Layer
//!
//! Pluggable implementations of the `ExtractionService` trait from `docket-domain`.
//!
//! # Services
//!
//! - `MockService`: Deterministic, scriptable service for tests and dry runs
//! - `OllamaService`: Local Ollama API integration
//!
//! Both services share the same response parser, so a scripted mock reply and
//! a real model reply are normalized identically: every requested field is
//! present in the returned record, with `Null` for anything not found.
//!
//! # Examples
//!
//! ```
//! use docket_domain::{Document, ExtractionService, FieldSet};
//! use docket_llm::MockService;
//!
//! # async fn example() {
//! let service = MockService::new(r#"{"Customer": "Acme"}"#);
//! let fields = FieldSet::from_names(["Customer", "Grand Total"]);
//! let record = service
//!     .extract(&Document::new("a.txt", "invoice"), &fields)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(record.text("Customer").as_deref(), Some("Acme"));
//! assert!(record.get("Grand Total").unwrap().is_null());
//! # }
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod parser;
pub mod prompt;

use async_trait::async_trait;
use docket_domain::{Document, ExtractionService, FieldSet, Record};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use ollama::OllamaService;
pub use parser::parse_record;
pub use prompt::PromptBuilder;

/// Errors that can occur during extraction calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response could not be turned into a record
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Document has no readable text
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    /// Generic error
    #[error("Extraction error: {0}")]
    Other(String),
}

/// Scripted outcome for one file name
#[derive(Debug, Clone)]
enum MockReply {
    Response(String),
    Failure(String),
    Panic,
}

/// Mock extraction service for deterministic testing
///
/// Replies are looked up by document file name; anything unscripted gets the
/// default response. Replies are run through [`parse_record`], so they are
/// written as the raw JSON a model would return.
///
/// # Examples
///
/// ```
/// use docket_llm::MockService;
///
/// let mut service = MockService::new("{}");
/// service.add_response("a.pdf", r#"{"Customer": "Acme"}"#);
/// service.add_failure("b.pdf", "rate limited");
/// assert_eq!(service.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockService {
    default_response: String,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    calls: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockService {
    /// Create a new MockService with a fixed response for all documents
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            replies: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Sleep for `delay` inside every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given file name
    pub fn add_response(&mut self, file_name: impl Into<String>, response: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(file_name.into(), MockReply::Response(response.into()));
    }

    /// Configure a failure for a specific file name
    pub fn add_failure(&mut self, file_name: impl Into<String>, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(file_name.into(), MockReply::Failure(message.into()));
    }

    /// Configure a panic for a specific file name
    pub fn add_panic(&mut self, file_name: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(file_name.into(), MockReply::Panic);
    }

    /// Get the number of times extract was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// File names in the order they were requested
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of calls observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn reply_for(&self, file_name: &str) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| MockReply::Response(self.default_response.clone()))
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new("{}")
    }
}

/// Decrements the in-flight counter even if the call panics
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ExtractionService for MockService {
    type Error = LlmError;

    async fn extract(&self, document: &Document, fields: &FieldSet) -> Result<Record, Self::Error> {
        self.calls.lock().unwrap().push(document.file_name.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.reply_for(&document.file_name) {
            MockReply::Response(response) => parse_record(&response, fields),
            MockReply::Failure(message) => Err(LlmError::Other(message)),
            MockReply::Panic => panic!("mock extraction panicked for {}", document.file_name),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
