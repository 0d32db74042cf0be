//! Connection type and its derived display views.
//!
//! A `Connection` is one itinerary alternative between origin and
//! destination. Besides the raw data it exposes the read-only views the
//! taskpane shows: transfer count, via-stations, and two emoji summaries.

use std::fmt::Write;

use chrono::{Duration, NaiveDateTime};

use super::emoji::{self, ARRIVES, DEPARTS};
use super::leg::Leg;
use super::time::format_time_of_day;

/// Via-string for a connection without intermediate stops.
pub const DIRECT: &str = "direkt";

/// Separator between segments of the emoji summary.
const SUMMARY_SEPARATOR: &str = " · ";

/// One itinerary between origin and destination.
///
/// # Invariants
///
/// - `legs` are in chronological order
/// - the last leg's exit, if present, is the final arrival
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Connection {
    /// Origin stop name
    pub from: String,
    /// Departure from the origin
    pub departure: Option<NaiveDateTime>,
    /// Destination stop name
    pub to: String,
    /// Arrival at the destination
    pub arrival: Option<NaiveDateTime>,
    /// Legs in itinerary order
    pub legs: Vec<Leg>,
    duration_secs: i64,
}

impl Connection {
    /// Creates a connection with a zero duration.
    pub fn new(
        from: impl Into<String>,
        departure: Option<NaiveDateTime>,
        to: impl Into<String>,
        arrival: Option<NaiveDateTime>,
        legs: Vec<Leg>,
    ) -> Self {
        Self {
            from: from.into(),
            departure,
            to: to.into(),
            arrival,
            legs,
            duration_secs: 0,
        }
    }

    /// Duration as reported by the API, in seconds.
    pub fn duration(&self) -> i64 {
        self.duration_secs
    }

    /// Set the duration in seconds. Non-finite values become 0.
    pub fn set_duration(&mut self, secs: f64) {
        self.duration_secs = if secs.is_finite() {
            secs.round() as i64
        } else {
            0
        };
    }

    /// Time between departure and arrival, if both are known.
    pub fn travel_time(&self) -> Option<Duration> {
        Some(self.arrival?.signed_duration_since(self.departure?))
    }

    /// Number of changes between vehicles.
    ///
    /// Counts non-walk legs that have an exit, minus one. A direct ride is 0;
    /// a connection with no riding legs at all yields -1. See
    /// [`Connection::display_transfers`] for the user-facing value.
    pub fn transfers(&self) -> i32 {
        let rides = self
            .legs
            .iter()
            .filter(|leg| !leg.is_walk() && leg.exit.is_some())
            .count();
        rides as i32 - 1
    }

    /// Transfer count for display; `None` when there is no ride to count from.
    pub fn display_transfers(&self) -> Option<u32> {
        u32::try_from(self.transfers()).ok()
    }

    /// Intermediate stations with their times, e.g.
    /// `"via Bern (08:32/08:36)-Olten (09:05"`.
    ///
    /// A connection of exactly two legs (one ride plus the arrival marker) is
    /// [`DIRECT`]. When a leg starts at the station the previous leg arrived
    /// at, the parenthesis is closed with that leg's departure time, giving an
    /// arrival/departure pair for the change. The last entry is left open.
    pub fn via_string(&self) -> String {
        if self.legs.len() == 2 {
            return DIRECT.to_string();
        }

        let mut vias = String::from("via ");
        let mut station = "";

        for leg in &self.legs {
            let Some(exit) = &leg.exit else {
                continue;
            };

            if !station.is_empty() && leg.name == station {
                vias.push('/');
                vias.push_str(&format_time_of_day(leg.departure));
                vias.push(')');
            }

            station = &exit.name;
            if station != self.to {
                if leg.name != self.from {
                    vias.push('-');
                }
                vias.push_str(station);
                vias.push_str(" (");
                vias.push_str(&format_time_of_day(exit.arrival));
            }
        }

        vias
    }

    /// Single-line itinerary with stop names, times and mode glyphs, e.g.
    ///
    /// `Neuenegg, Tennis · (🚶‍➡️10′) · Neuenegg (↗️14:15, 🚆 S2) → Bern (↘️14:40)`
    ///
    /// The origin name leads only when the connection starts on foot. Walks
    /// with no running time are dropped; the final walk also names its
    /// destination.
    pub fn to_emoji_summary(&self) -> String {
        let Some(first) = self.legs.first() else {
            return String::new();
        };

        let mut segments = Vec::new();
        if first.is_walk() && !first.name.is_empty() {
            segments.push(first.name.clone());
        }

        let last_idx = self.legs.len() - 1;
        for (i, leg) in self.legs.iter().enumerate() {
            let Some(exit) = leg.summary_exit() else {
                continue;
            };

            if leg.is_walk() {
                if leg.running_secs <= 0 {
                    continue;
                }
                segments.push(format!("({})", emoji::leg_walk_token(leg.running_minutes())));
                if i == last_idx && !exit.name.is_empty() {
                    segments.push(exit.name.clone());
                }
                continue;
            }

            let departure = format_time_of_day(leg.departure);
            let arrival = format_time_of_day(exit.arrival);

            let mut annotations = Vec::with_capacity(2);
            if !departure.is_empty() {
                annotations.push(format!("{DEPARTS}{departure}"));
            }
            let mode = leg.mode_label();
            if !mode.is_empty() {
                annotations.push(mode);
            }

            let mut segment = leg.name.clone();
            if !annotations.is_empty() {
                let _ = write!(segment, " ({})", annotations.join(", "));
            }
            let _ = write!(segment, " → {}", exit.name);
            if !arrival.is_empty() {
                let _ = write!(segment, " ({ARRIVES}{arrival})");
            }
            segments.push(segment);
        }

        segments.join(SUMMARY_SEPARATOR)
    }

    /// Compact route chain without stop names, e.g. `"🚍130🚶‍➡️2′🚆S1🚶‍➡️6′🚍104"`.
    pub fn to_emoji_route_chain(&self) -> String {
        let mut chain = String::new();

        for leg in &self.legs {
            if leg.summary_exit().is_none() {
                continue;
            }

            if leg.is_walk() {
                if leg.running_secs > 0 {
                    chain.push_str(&emoji::leg_walk_token(leg.running_minutes()));
                }
            } else {
                chain.push_str(leg.mode_glyph());
                if let Some(line) = &leg.line {
                    chain.push_str(line);
                }
            }
        }

        chain
    }

    /// One-line debugging form: `"From (HH:mm)-[legs]-To (HH:mm) (secs)"`.
    pub fn short_string(&self) -> String {
        format!(
            "{} ({})-[{}]-{} ({}) ({})",
            self.from,
            format_time_of_day(self.departure),
            self.legs.len(),
            self.to,
            format_time_of_day(self.arrival),
            self.duration_secs
        )
    }
}
