//! Itinerary leg types.
//!
//! A `Leg` is one scheduled segment of a connection: a ride on one vehicle,
//! or a walk. Its arrival point is an `Exit`.

use chrono::NaiveDateTime;

use super::emoji;
use super::time::round_minutes;

/// Mode code the API uses for walking segments.
const WALK_KIND: &str = "walk";

/// The arrival stop of a leg.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exit {
    /// Stop name
    pub name: String,
    /// Arrival time at this stop, if known
    pub arrival: Option<NaiveDateTime>,
}

impl Exit {
    /// Creates an exit.
    pub fn new(name: impl Into<String>, arrival: Option<NaiveDateTime>) -> Self {
        Self {
            name: name.into(),
            arrival,
        }
    }
}

/// One segment of a connection, in itinerary order.
///
/// A leg without an [`Exit`] is incomplete and is ignored by every summary.
/// A leg with no line, no mode name, no running time and no departure is a
/// "dummy" leg (the API emits one as an arrival marker at the end of most
/// connections) and is likewise excluded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Leg {
    /// Origin stop of this leg
    pub name: String,
    /// Departure time from the origin stop
    pub departure: Option<NaiveDateTime>,
    /// Line identifier, e.g. "S2"
    pub line: Option<String>,
    /// Short mode code, e.g. "walk", "train", "bus"
    pub kind: String,
    /// Human-readable mode name, e.g. "S-Bahn"
    pub type_name: String,
    /// Running time in whole seconds
    pub running_secs: i64,
    /// Arrival stop
    pub exit: Option<Exit>,
}

impl Leg {
    /// Returns true if this is a walking segment.
    pub fn is_walk(&self) -> bool {
        self.kind == WALK_KIND
    }

    /// Returns true if this leg carries no usable line or time data.
    pub fn is_dummy(&self) -> bool {
        self.line.is_none()
            && self.type_name.is_empty()
            && self.running_secs == 0
            && self.departure.is_none()
    }

    /// Returns the exit if this leg takes part in summaries.
    pub(crate) fn summary_exit(&self) -> Option<&Exit> {
        self.exit.as_ref().filter(|_| !self.is_dummy())
    }

    /// Running time rounded to whole minutes.
    pub fn running_minutes(&self) -> i64 {
        round_minutes(self.running_secs)
    }

    /// Mode glyph for this leg, or `""` if the mode is not recognised.
    pub fn mode_glyph(&self) -> &'static str {
        emoji::mode_glyph(&self.kind, &self.type_name)
    }

    /// Glyph and line joined by a space, e.g. `"🚆 S2"`; either may be absent.
    pub fn mode_label(&self) -> String {
        match self.line.as_deref() {
            Some(line) => format!("{} {}", self.mode_glyph(), line)
                .trim()
                .to_string(),
            None => self.mode_glyph().to_string(),
        }
    }
}
