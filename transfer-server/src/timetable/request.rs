//! Route-query construction.

use chrono::{Local, NaiveDateTime};
use reqwest::Url;

use crate::domain::{format_date_for_query, format_time_of_day};

use super::error::TimetableError;

/// Number of connections requested when no limit is given.
pub const DEFAULT_LIMIT: u32 = 4;

/// A route query: where from, where to, when, and how many results.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use transfer_server::timetable::ConnectionsRequest;
///
/// let at = NaiveDate::from_ymd_opt(2025, 1, 3)
///     .unwrap()
///     .and_hms_opt(8, 5, 0)
///     .unwrap();
/// let request = ConnectionsRequest::new("Zürich HB", "Bern")
///     .unwrap()
///     .at(at)
///     .with_arrival_time(true)
///     .with_limit(5);
///
/// let endpoint = "https://search.ch/fahrplan/api/route.json".parse().unwrap();
/// let url = request.url(&endpoint).to_string();
/// assert!(url.contains("date=03.01.2025"));
/// assert!(url.contains("time_type=arrival&num=1&pre=5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionsRequest {
    from: String,
    to: String,
    via: Vec<String>,
    date_time: NaiveDateTime,
    is_arrival_time: bool,
    limit: u32,
}

impl ConnectionsRequest {
    /// Create a departure-time query for now.
    ///
    /// Fails with [`TimetableError::InvalidArgument`] if either stop name is
    /// empty after trimming.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self, TimetableError> {
        let from = from.into();
        let to = to.into();

        if from.trim().is_empty() {
            return Err(TimetableError::InvalidArgument("from is required"));
        }
        if to.trim().is_empty() {
            return Err(TimetableError::InvalidArgument("to is required"));
        }

        Ok(Self {
            from,
            to,
            via: Vec::new(),
            date_time: Local::now().naive_local(),
            is_arrival_time: false,
            limit: DEFAULT_LIMIT,
        })
    }

    /// Set intermediate stops, in order. Blank names are ignored.
    pub fn with_via<I, S>(mut self, via: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.via = via.into_iter().map(Into::into).collect();
        self
    }

    /// Set the anchor date and time.
    pub fn at(mut self, date_time: NaiveDateTime) -> Self {
        self.date_time = date_time;
        self
    }

    /// Treat the anchor as the desired arrival (`true`) or departure time.
    pub fn with_arrival_time(mut self, is_arrival_time: bool) -> Self {
        self.is_arrival_time = is_arrival_time;
        self
    }

    /// Set the number of connections to request.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn origin(&self) -> &str {
        &self.from
    }

    pub fn destination(&self) -> &str {
        &self.to
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    pub fn is_arrival_time(&self) -> bool {
        self.is_arrival_time
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Build the full query URL against the given route endpoint.
    ///
    /// Arrival queries ask for one connection after the anchor and `limit`
    /// before it; departure queries the other way round.
    pub fn url(&self, endpoint: &Url) -> Url {
        let (time_type, num, pre) = if self.is_arrival_time {
            ("arrival", 1, self.limit)
        } else {
            ("depart", self.limit, 1)
        };

        let mut url = endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("from", self.from.trim())
                .append_pair("to", self.to.trim())
                .append_pair("date", &format_date_for_query(self.date_time))
                .append_pair("time", &format_time_of_day(self.date_time))
                .append_pair("time_type", time_type)
                .append_pair("num", &num.to_string())
                .append_pair("pre", &pre.to_string());

            for stop in self.via.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
                query.append_pair("via[]", stop);
            }
        }
        url
    }
}
