use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::base::Provider;
use crate::conversation::Message;

/// A mock provider that returns pre-configured replies for testing, and
/// counts how often it was invoked.
pub struct MockProvider {
    replies: Arc<Mutex<Vec<String>>>,
    error: Option<String>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of replies.
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                replies.into_iter().map(str::to_string).collect(),
            )),
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock provider whose every call fails with the message.
    pub fn failing(message: &str) -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            error: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.error {
            return Err(anyhow!("{}", message));
        }

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Return an empty reply once the canned ones run out
            Ok(String::new())
        } else {
            Ok(replies.remove(0))
        }
    }
}
