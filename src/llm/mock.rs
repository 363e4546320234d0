//! Scripted analysis client for tests
//!
//! Serves canned responses in order and counts invocations. Lives in the
//! library (not behind `cfg(test)`) so integration tests can drive the
//! whole pipeline without a network.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use super::{AnalysisClient, AnalysisRequest, ClientError};

/// Analysis client that replays a fixed script of responses.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: RefCell<VecDeque<String>>,
    calls: Cell<usize>,
}

impl MockClient {
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: Cell::new(0),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl AnalysisClient for MockClient {
    fn invoke(&self, _request: &AnalysisRequest) -> Result<String, ClientError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or(ClientError::ScriptExhausted)
    }
}
