//! Application state for the web layer.

use std::sync::Arc;

use crate::appointment::{CalendarIntegration, Locale};
use crate::cache::CachedTimetableClient;
use crate::favourites::FavouriteStops;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached timetable and completion client
    pub timetable: Arc<CachedTimetableClient>,

    /// Favourite stops, for default walking times
    pub favourites: Arc<FavouriteStops>,

    /// Where new appointments go; `None` leaves them to the taskpane
    pub calendar: Option<Arc<dyn CalendarIntegration>>,

    /// Locale used when a request names none
    pub locale: Locale,
}

impl AppState {
    /// Create a new app state.
    pub fn new(timetable: CachedTimetableClient, favourites: FavouriteStops) -> Self {
        Self {
            timetable: Arc::new(timetable),
            favourites: Arc::new(favourites),
            calendar: None,
            locale: Locale::default(),
        }
    }

    /// Hand every new appointment to `calendar`.
    pub fn with_calendar(mut self, calendar: impl CalendarIntegration + 'static) -> Self {
        self.calendar = Some(Arc::new(calendar));
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
