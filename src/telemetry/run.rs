use std::fmt;

use tracing::Span;
use uuid::Uuid;

/// Identifies one fetch-then-sync invocation in the logs.
#[derive(Clone, Copy, Debug)]
pub struct RunId(Uuid);

impl Default for RunId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn run_span(id: RunId) -> Span {
    tracing::info_span!("run", run_id = %id)
}
