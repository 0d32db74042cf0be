//! Alias-probing access to route-query JSON.
//!
//! The route endpoint answers in lower-camel/snake case (`type_name`), while
//! connections posted back by the taskpane use upper-camel case (`TypeName`).
//! Every field is therefore read through an ordered alias list, and the value
//! is normalised into one canonical Rust shape right here.

use serde_json::{Map, Value};

pub(super) const FROM: &[&str] = &["from", "From"];
pub(super) const TO: &[&str] = &["to", "To"];
pub(super) const DEPARTURE: &[&str] = &["departure", "Departure"];
pub(super) const ARRIVAL: &[&str] = &["arrival", "Arrival"];
pub(super) const DURATION: &[&str] = &["duration", "Duration"];
pub(super) const LEGS: &[&str] = &["legs", "Legs"];
pub(super) const COUNT: &[&str] = &["count", "Count"];
pub(super) const CONNECTIONS: &[&str] = &["connections", "Connections"];
pub(super) const NAME: &[&str] = &["name", "Name"];
pub(super) const LINE: &[&str] = &["line", "Line"];
pub(super) const TYPE: &[&str] = &["type", "Type"];
pub(super) const TYPE_NAME: &[&str] = &["type_name", "TypeName", "typeName"];
pub(super) const RUNNING_TIME: &[&str] = &["runningtime", "Runningtime", "RunningTime"];
pub(super) const EXIT: &[&str] = &["exit", "Exit"];

/// Read-only view over one JSON object.
#[derive(Debug, Clone, Copy)]
pub(super) struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    /// Wraps a value if it is a JSON object.
    pub(super) fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self)
    }

    /// First alias whose value is present and not null.
    fn first(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// First non-empty text value. Numbers are rendered as text, so a numeric
    /// line such as `12` reads as `"12"`.
    pub(super) fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// First present numeric value. Numeric strings are accepted.
    pub(super) fn number(&self, aliases: &[&str]) -> Option<f64> {
        match self.first(aliases)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// First alias holding a JSON object.
    pub(super) fn object(&self, aliases: &[&str]) -> Option<Fields<'a>> {
        self.first(aliases).and_then(Fields::of)
    }

    /// First alias holding a JSON array, or an empty slice.
    pub(super) fn array(&self, aliases: &[&str]) -> &'a [Value] {
        self.first(aliases)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
