//! Last-write-wins ordering for completion lookups.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::client::{CompletionClient, CompletionOptions, Suggestion};

/// Minimum trimmed term length, in characters, that triggers a lookup.
pub const MIN_TERM_LEN: usize = 3;

/// Sequence-number watermark shared by every completion input.
///
/// Each lookup takes a number from [`issue`](Self::issue) before it starts.
/// When it finishes, [`try_apply`](Self::try_apply) accepts the result only if
/// no newer lookup has been applied in the meantime.
#[derive(Debug, Default)]
pub struct CompletionSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl CompletionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence number; strictly increasing, starting at 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Advance the watermark to `seq` unless a newer result was applied.
    pub fn try_apply(&self, seq: u64) -> bool {
        self.applied
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (seq >= current).then_some(seq)
            })
            .is_ok()
    }

    /// Highest sequence number handed out so far.
    pub fn last_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Highest sequence number applied so far.
    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}

/// What a new input value requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDecision {
    /// Same term as last time; nothing to do.
    Unchanged,
    /// Term too short; suggestions were cleared.
    Cleared,
    /// Look up `term` and report back with `seq`.
    Lookup { seq: u64, term: String },
}

/// Suggestion state for one input field.
#[derive(Debug)]
pub struct CompletionFeed {
    sequencer: Arc<CompletionSequencer>,
    last_term: String,
    suggestions: Vec<Suggestion>,
}

impl CompletionFeed {
    pub fn new(sequencer: Arc<CompletionSequencer>) -> Self {
        Self {
            sequencer,
            last_term: String::new(),
            suggestions: Vec::new(),
        }
    }

    /// Currently displayed suggestions.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Register a new input value.
    ///
    /// Clearing also claims a sequence number and applies it, so a lookup
    /// still in flight for an older term cannot repopulate the list.
    pub fn begin(&mut self, raw: &str) -> InputDecision {
        let term = raw.trim();
        if term == self.last_term {
            return InputDecision::Unchanged;
        }
        self.last_term = term.to_string();

        if term.chars().count() < MIN_TERM_LEN {
            self.suggestions.clear();
            let seq = self.sequencer.issue();
            self.sequencer.try_apply(seq);
            return InputDecision::Cleared;
        }

        InputDecision::Lookup {
            seq: self.sequencer.issue(),
            term: term.to_string(),
        }
    }

    /// Deliver the result of lookup `seq`. Returns false if it was stale.
    pub fn finish(&mut self, seq: u64, results: Vec<Suggestion>) -> bool {
        if !self.sequencer.try_apply(seq) {
            return false;
        }
        self.suggestions = results;
        true
    }

    /// Handle one input change end to end.
    pub async fn on_input(
        &mut self,
        raw: &str,
        client: &CompletionClient,
        options: &CompletionOptions,
    ) -> InputDecision {
        let decision = self.begin(raw);
        if let InputDecision::Lookup { seq, term } = &decision {
            let results = client.fetch_completions(term, options).await;
            self.finish(*seq, results);
        }
        decision
    }
}
