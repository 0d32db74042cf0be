//! Stop-name completion.
//!
//! Completion backs an autocomplete popup, so it never reports errors:
//! every failure yields an empty suggestion list. Responses to superseded
//! keystrokes are discarded with a sequence-number watermark rather than by
//! cancelling requests.

mod client;
mod sequencer;

pub use client::{CompletionClient, CompletionOptions, Suggestion};
pub use sequencer::{CompletionFeed, CompletionSequencer, InputDecision, MIN_TERM_LEN};
