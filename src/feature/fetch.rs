use crate::error::WizardResult;

/// Handle for one in-flight fetch. Only the most recently issued ticket may
/// complete its fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Loading flag, error string and generation counter for one feature feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    generation: u64,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl FetchState {
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.is_loading = true;
        FetchTicket(self.generation)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Settle a fetch. Stale tickets are ignored and leave the state as is.
    /// Returns the value only when the ticket is current and the fetch
    /// succeeded.
    pub fn finish<T>(
        &mut self,
        feed: &str,
        ticket: FetchTicket,
        result: WizardResult<T>,
    ) -> Option<T> {
        if !self.is_current(ticket) {
            tracing::debug!(
                feed,
                stale = ticket.0,
                current = self.generation,
                "ignoring stale fetch result"
            );
            return None;
        }

        self.is_loading = false;
        match result {
            Ok(value) => {
                self.error = None;
                Some(value)
            }
            Err(e) => {
                tracing::warn!(feed, error = %e, "fetch failed");
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WizardError;

    #[test]
    fn newer_fetch_wins_over_slow_stale_one() {
        let mut state = FetchState::default();
        let slow = state.begin();
        let fast = state.begin();

        assert_eq!(state.finish("feed", fast, Ok(2)), Some(2));
        assert!(!state.is_loading);

        assert_eq!(state.finish("feed", slow, Ok(1)), None);
        assert!(state.error.is_none());
    }

    #[test]
    fn failure_records_error_and_clears_loading() {
        let mut state = FetchState::default();
        let ticket = state.begin();
        let result: Option<()> =
            state.finish("entry types", ticket, Err(WizardError::fetch("entry types", "boom")));
        assert!(result.is_none());
        assert!(!state.is_loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to load entry types: boom")
        );
    }

    #[test]
    fn success_clears_previous_error() {
        let mut state = FetchState::default();
        let t = state.begin();
        let _: Option<()> = state.finish("f", t, Err(WizardError::fetch("f", "x")));
        let t = state.begin();
        assert_eq!(state.finish("f", t, Ok("ok")), Some("ok"));
        assert!(state.error.is_none());
    }
}
