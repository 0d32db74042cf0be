//! Glyphs used in compact itinerary summaries.
//!
//! The upstream API mixes terse mode codes (`"train"`, `"bus"`) with free-text
//! mode names that vary by locale (`"S-Bahn"`, `"Postauto"`, `"Schiff"`).
//! Mode classification is therefore a best-effort heuristic: an ordered list
//! of rules evaluated top to bottom, first match wins. It is not a closed
//! enumeration and unknown modes simply get no glyph.

/// Train, including suburban rail.
pub const TRAIN: &str = "\u{1F686}";
/// Bus, including post buses.
pub const BUS: &str = "\u{1F68D}";
/// Tram.
pub const TRAM: &str = "\u{1F68A}";
/// Ship or ferry.
pub const SHIP: &str = "\u{26F4}\u{FE0F}";
/// Person walking to the right.
pub const WALK: &str = "\u{1F6B6}\u{200D}\u{27A1}\u{FE0F}";
/// Marks a departure time.
pub const DEPARTS: &str = "\u{2197}\u{FE0F}";
/// Marks an arrival time.
pub const ARRIVES: &str = "\u{2198}\u{FE0F}";
/// Suffix for a count of minutes.
pub const MINUTES: &str = "\u{2019}";
/// Suffix for the running time of a walking leg (prime).
pub const LEG_MINUTES: &str = "\u{2032}";

/// One classification rule: matches if the lowercased mode code is one of
/// `codes`, or the lowercased mode name contains one of `name_fragments`.
struct ModeRule {
    codes: &'static [&'static str],
    name_fragments: &'static [&'static str],
    glyph: &'static str,
}

impl ModeRule {
    fn matches(&self, code: &str, name: &str) -> bool {
        self.codes.iter().any(|c| *c == code)
            || self.name_fragments.iter().any(|f| name.contains(f))
    }
}

/// Evaluated in order; the train rule must come first because many German
/// mode names contain "bahn".
const MODE_RULES: &[ModeRule] = &[
    ModeRule {
        codes: &["train", "strain"],
        name_fragments: &["s-bahn", "bahn", "zug"],
        glyph: TRAIN,
    },
    ModeRule {
        codes: &["bus", "post"],
        name_fragments: &["bus", "postauto"],
        glyph: BUS,
    },
    ModeRule {
        codes: &["tram"],
        name_fragments: &["tram"],
        glyph: TRAM,
    },
    ModeRule {
        codes: &["ship", "boat"],
        name_fragments: &["schiff", "boot"],
        glyph: SHIP,
    },
];

/// Classify a leg's mode into a glyph, or `""` if nothing matches.
///
/// # Examples
///
/// ```
/// use transfer_server::domain::emoji::{self, mode_glyph};
///
/// assert_eq!(mode_glyph("strain", ""), emoji::TRAIN);
/// assert_eq!(mode_glyph("", "Postauto"), emoji::BUS);
/// assert_eq!(mode_glyph("walk", ""), "");
/// ```
pub fn mode_glyph(code: &str, name: &str) -> &'static str {
    let code = code.to_lowercase();
    let name = name.to_lowercase();

    MODE_RULES
        .iter()
        .find(|rule| rule.matches(&code, &name))
        .map_or("", |rule| rule.glyph)
}

/// Walking glyph followed by the minute count, e.g. `"🚶‍➡️10’"`.
///
/// A zero minute count renders as the bare glyph.
pub fn walk_token(minutes: i64) -> String {
    walk_with_suffix(minutes, MINUTES)
}

/// Token for a walking leg inside a connection, e.g. `"🚶‍➡️10′"`.
pub fn leg_walk_token(minutes: i64) -> String {
    walk_with_suffix(minutes, LEG_MINUTES)
}

fn walk_with_suffix(minutes: i64, suffix: &str) -> String {
    if minutes == 0 {
        WALK.to_string()
    } else {
        format!("{WALK}{minutes}{suffix}")
    }
}
