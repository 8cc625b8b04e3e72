/// Page the wizard opens on.
pub const START_PAGE: &str = "migration-start";

/// Which page the wizard is showing.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    current: String,
}

impl Navigation {
    pub fn new(start: &str) -> Self {
        Self {
            current: start.to_string(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn go_to(&mut self, page_id: &str) {
        tracing::debug!(from = %self.current, to = page_id, "navigating");
        self.current = page_id.to_string();
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(START_PAGE)
    }
}
