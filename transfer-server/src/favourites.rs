//! Favourite stops with their walking times.
//!
//! Stored as a small versioned JSON file:
//!
//! ```json
//! {"version":1,"stops":[{"name":"Bern","walkMinutes":4}]}
//! ```
//!
//! A bare array of stops (the unversioned layout) is accepted on load and
//! rewritten in the versioned form on the next save.

use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current file schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from reading or writing the favourites file.
#[derive(Debug, thiserror::Error)]
pub enum FavouritesError {
    #[error("favourites I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("favourites JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported favourites schema version {0}")]
    UnsupportedVersion(u32),
}

/// A stop the user travels from or to often.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteStop {
    pub name: String,
    /// Walk between the stop and the user's door
    pub walk_minutes: u32,
}

impl FavouriteStop {
    pub fn new(name: impl Into<String>, walk_minutes: u32) -> Self {
        Self {
            name: name.into(),
            walk_minutes,
        }
    }

    /// Sanitise one raw entry. Entries without a usable name are dropped.
    fn from_value(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?.trim();
        if name.is_empty() {
            return None;
        }

        let minutes = match value.get("walkMinutes") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|m| m.is_finite() && *m >= 0.0)
        .map_or(0, |m| m.round().min(f64::from(u32::MAX)) as u32);

        Some(Self::new(name, minutes))
    }
}

#[derive(Serialize)]
struct StoredFavourites<'a> {
    version: u32,
    stops: &'a [FavouriteStop],
}

/// An ordered list of favourite stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavouriteStops {
    stops: Vec<FavouriteStop>,
}

impl FavouriteStops {
    /// Build a list, trimming names and dropping entries with empty names.
    pub fn new(stops: impl IntoIterator<Item = FavouriteStop>) -> Self {
        let stops = stops
            .into_iter()
            .filter_map(|stop| {
                let name = stop.name.trim();
                (!name.is_empty()).then(|| FavouriteStop::new(name, stop.walk_minutes))
            })
            .collect();
        Self { stops }
    }

    /// Parse either the versioned or the bare-array layout.
    pub fn from_json(text: &str) -> Result<Self, FavouritesError> {
        let value: Value = serde_json::from_str(text)?;

        let entries = match &value {
            Value::Array(entries) => entries,
            Value::Object(map) => {
                let version = map
                    .get("version")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| serde_json::Error::custom("missing schema version"))?;
                if version != u64::from(SCHEMA_VERSION) {
                    return Err(FavouritesError::UnsupportedVersion(
                        u32::try_from(version).unwrap_or(u32::MAX),
                    ));
                }
                map.get("stops")
                    .and_then(Value::as_array)
                    .ok_or_else(|| serde_json::Error::custom("missing stops array"))?
            }
            _ => {
                return Err(serde_json::Error::custom("expected an object or array").into());
            }
        };

        Ok(Self {
            stops: entries.iter().filter_map(FavouriteStop::from_value).collect(),
        })
    }

    /// Serialise in the versioned layout.
    pub fn to_json(&self) -> Result<String, FavouritesError> {
        Ok(serde_json::to_string(&StoredFavourites {
            version: SCHEMA_VERSION,
            stops: &self.stops,
        })?)
    }

    pub fn stops(&self) -> &[FavouriteStop] {
        &self.stops
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Walking time for a stop, matched by name ignoring case.
    pub fn walk_minutes_for(&self, name: &str) -> Option<u32> {
        let name = name.trim().to_lowercase();
        self.stops
            .iter()
            .find(|stop| stop.name.to_lowercase() == name)
            .map(|stop| stop.walk_minutes)
    }
}

/// File-backed favourites.
#[derive(Debug, Clone)]
pub struct FavouritesStore {
    path: PathBuf,
}

impl FavouritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the favourites. A missing file is an empty list.
    pub fn load(&self) -> Result<FavouriteStops, FavouritesError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => FavouriteStops::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FavouriteStops::default()),
            Err(source) => Err(FavouritesError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Save the favourites.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, stops: &FavouriteStops) -> Result<(), FavouritesError> {
        let io_err = |source| FavouritesError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        std::fs::write(&self.path, stops.to_json()?).map_err(io_err)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
