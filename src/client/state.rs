use std::fmt::Display;
use std::future::Future;

/// Identifies one invocation tracked by a [`RequestState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// `{data, loading, error}` for one logical request slot.
///
/// Each [`begin`](Self::begin) hands out a newer ticket. Only the newest
/// ticket may complete the slot; results for older tickets are dropped, so a
/// slow early response cannot overwrite a faster later one.
#[derive(Debug, Clone)]
pub struct RequestState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    latest: u64,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            latest: 0,
        }
    }
}

impl<T> RequestState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        Ticket(self.latest)
    }

    /// Record the outcome for `ticket`. Returns `false` if the ticket was stale.
    pub fn finish<E: Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "discarding stale response");
            return false;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                self.data = None;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Drive one request through a fresh ticket and return its outcome.
    ///
    /// The error is handed back untouched so callers can still inspect it;
    /// the slot keeps only its message.
    pub async fn run<F, E>(&mut self, request: F) -> Result<&T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ticket = self.begin();
        match request.await {
            Ok(data) => {
                self.loading = false;
                self.error = None;
                Ok(self.data.insert(data))
            }
            Err(e) => {
                self.finish(ticket, Err::<T, _>(&e));
                Err(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.data = None;
        self.error = None;
        self.loading = false;
        // outstanding tickets become stale
        self.latest += 1;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_loading_and_result() {
        let mut state: RequestState<u32> = RequestState::new();
        assert!(!state.loading());

        let ticket = state.begin();
        assert!(state.loading());
        assert!(state.finish::<String>(ticket, Ok(7)));
        assert!(!state.loading());
        assert_eq!(state.data(), Some(&7));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state: RequestState<&str> = RequestState::new();
        let first = state.begin();
        let second = state.begin();

        assert!(state.finish::<String>(second, Ok("page 2")));
        assert!(!state.finish::<String>(first, Ok("page 1")));
        assert_eq!(state.data(), Some(&"page 2"));
    }

    #[test]
    fn stale_error_does_not_clobber_newer_data() {
        let mut state: RequestState<u32> = RequestState::new();
        let first = state.begin();
        let second = state.begin();

        assert!(state.finish::<String>(second, Ok(2)));
        assert!(!state.finish(first, Err("Invalid pagination parameters")));
        assert_eq!(state.error(), None);
        assert_eq!(state.data(), Some(&2));
    }

    #[test]
    fn error_clears_data() {
        let mut state: RequestState<u32> = RequestState::new();
        let ticket = state.begin();
        state.finish::<String>(ticket, Ok(1));

        let ticket = state.begin();
        state.finish(ticket, Err("Unauthorized"));
        assert_eq!(state.data(), None);
        assert_eq!(state.error(), Some("Unauthorized"));
    }

    #[tokio::test]
    async fn run_records_success_and_failure() {
        let mut state: RequestState<u32> = RequestState::new();

        let value = state.run(async { Ok::<_, String>(5) }).await.unwrap();
        assert_eq!(*value, 5);
        assert!(!state.loading());

        let err = state.run(async { Err::<u32, _>("Lead not found".to_string()) }).await.unwrap_err();
        assert_eq!(err, "Lead not found");
        assert_eq!(state.error(), Some("Lead not found"));
        assert_eq!(state.data(), None);
    }

    #[test]
    fn reset_invalidates_in_flight_requests() {
        let mut state: RequestState<u32> = RequestState::new();
        let ticket = state.begin();
        state.reset();
        assert!(!state.finish::<String>(ticket, Ok(9)));
        assert_eq!(state.data(), None);
        assert!(!state.loading());
    }
}
