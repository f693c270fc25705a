use shared::{domain::RequestId, error::SubmitRejected};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending { request_id: RequestId },
}

/// Guards submissions so at most one request is in flight, and owns the
/// loading flag.
pub struct RequestStateController {
    state: RequestState,
    next_id: u64,
    loading: watch::Sender<bool>,
}

impl Default for RequestStateController {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStateController {
    pub fn new() -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            state: RequestState::Idle,
            next_id: 1,
            loading,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Pending { .. })
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Idle -> Pending. Only an empty string counts as empty input.
    pub fn try_begin(&mut self, input: &str) -> Result<RequestId, SubmitRejected> {
        if input.is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }
        if let RequestState::Pending { .. } = self.state {
            return Err(SubmitRejected::RequestPending);
        }

        let request_id = RequestId(self.next_id);
        self.next_id += 1;
        self.state = RequestState::Pending { request_id };
        self.loading.send_replace(true);
        Ok(request_id)
    }

    /// Pending -> Idle, whatever the outcome. Returns false when `request_id`
    /// was not the request in flight.
    pub fn settle(&mut self, request_id: RequestId) -> bool {
        let matched = self.state == RequestState::Pending { request_id };
        self.state = RequestState::Idle;
        self.loading.send_replace(false);
        matched
    }
}

#[cfg(test)]
#[path = "tests/request_state_tests.rs"]
mod tests;
