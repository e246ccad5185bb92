//! Route-bound page controllers. Each page owns an explicit state enum and
//! commits a response only if no newer request was started in the meantime.

pub mod detail;
pub mod history;
pub mod submission;

pub use detail::{DetailPage, DetailState};
pub use history::{HistoryPage, HistoryState};
pub use submission::{SubmissionEvent, SubmissionPage, SubmissionState, ANALYZE_FALLBACK_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug, Default)]
pub(crate) struct RequestGeneration {
    current: u64,
}

impl RequestGeneration {
    pub(crate) fn next(&mut self) -> RequestTicket {
        self.current += 1;
        RequestTicket(self.current)
    }

    pub(crate) fn is_current(&self, ticket: RequestTicket) -> bool {
        self.current == ticket.0
    }
}

#[cfg(test)]
#[path = "../tests/pages_tests.rs"]
mod tests;
