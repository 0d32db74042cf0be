//! Localised appointment text.

use serde::{Deserialize, Serialize};

/// UI locales the taskpane ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-CH")]
    DeCh,
    #[serde(rename = "fr-CH")]
    FrCh,
    #[serde(rename = "it-CH")]
    ItCh,
    #[serde(rename = "rm-CH")]
    RmCh,
}

impl Locale {
    /// Pick a locale from a host display language such as `"de-DE"`.
    ///
    /// Only the language prefix matters; anything unrecognised is English.
    pub fn detect(display_language: &str) -> Self {
        let lang = display_language.trim().to_lowercase();
        if lang.starts_with("de") {
            Locale::DeCh
        } else if lang.starts_with("fr") {
            Locale::FrCh
        } else if lang.starts_with("it") {
            Locale::ItCh
        } else if lang.starts_with("rm") {
            Locale::RmCh
        } else {
            Locale::EnGb
        }
    }

    /// BCP 47 tag, e.g. `"de-CH"`.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::EnGb => "en-GB",
            Locale::DeCh => "de-CH",
            Locale::FrCh => "fr-CH",
            Locale::ItCh => "it-CH",
            Locale::RmCh => "rm-CH",
        }
    }

    pub fn labels(self) -> Labels {
        match self {
            Locale::EnGb => Labels {
                transfer_prefix: "Transfer",
                public_transport: "Public transport",
            },
            Locale::DeCh => Labels {
                transfer_prefix: "Transfer",
                public_transport: "Öffentlicher Verkehr",
            },
            Locale::FrCh => Labels {
                transfer_prefix: "Transfert",
                public_transport: "Transports publics",
            },
            Locale::ItCh => Labels {
                transfer_prefix: "Transfer",
                public_transport: "Trasporti pubblici",
            },
            Locale::RmCh => Labels {
                transfer_prefix: "Transfer",
                public_transport: "Traffic public",
            },
        }
    }
}

/// Words the appointment translator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    /// Leads the subject line
    pub transfer_prefix: &'static str,
    /// Location when there is no route chain to show
    pub public_transport: &'static str,
}

impl Default for Labels {
    fn default() -> Self {
        Locale::default().labels()
    }
}
