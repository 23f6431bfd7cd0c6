//! In-memory `ContentSource` for tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::source::{ContentSource, FetchError};

type Call = (String, Vec<(String, String)>);

/// Canned responses keyed by request path; unknown paths fail with `default`
pub struct MockSource {
    responses: HashMap<String, Result<Value, FetchError>>,
    default: Result<Value, FetchError>,
    calls: Mutex<Vec<Call>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::failing(FetchError::Transport("no canned response".to_string()))
    }

    /// Every request fails with `error`
    pub fn failing(error: FetchError) -> Self {
        Self {
            responses: HashMap::new(),
            default: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every unmatched request succeeds with `body`
    pub fn answering(body: Value) -> Self {
        Self {
            responses: HashMap::new(),
            default: Ok(body),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, path: &str, response: Result<Value, FetchError>) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch(&self, path: &str, params: &[(String, String)]) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push((path.to_string(), params.to_vec()));
        self.responses.get(path).cloned().unwrap_or_else(|| self.default.clone())
    }
}
