//! Trip direction, meeting details and the search each trip needs.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::timetable::{ConnectionsRequest, TimetableError};

/// Number of connections requested for a transfer search.
pub const TRANSFER_SEARCH_LIMIT: u32 = 5;

/// Which way the trip goes relative to the meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// From the user's origin to the meeting
    #[default]
    Inbound,
    /// From the meeting to the user's destination
    Outbound,
}

/// The calendar item the transfer is planned around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInfo {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub location: String,
    pub start: NaiveDateTime,
    /// Defaults to `start` when absent
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
}

impl MeetingInfo {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            subject: String::new(),
            location: String::new(),
            start,
            end: None,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end.unwrap_or(self.start)
    }
}

/// Everything the translator needs besides the connection itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferContext {
    pub subject: String,
    pub location: String,
    /// Trip origin, used when the connection has none
    pub from: String,
    /// Trip destination, used when the connection has none
    pub to: String,
    /// Walk between the meeting stop and the meeting itself
    pub meeting_walk_minutes: i64,
    /// Walk at the user's own end of the trip
    pub endpoint_walk_minutes: i64,
    pub direction: Direction,
}

impl TransferContext {
    /// Walking minutes before departure and after arrival, never negative.
    ///
    /// Inbound trips start with the endpoint walk and end with the meeting
    /// walk; outbound trips the other way round.
    pub fn walk_minutes(&self) -> (i64, i64) {
        let meeting = self.meeting_walk_minutes.max(0);
        let endpoint = self.endpoint_walk_minutes.max(0);
        match self.direction {
            Direction::Inbound => (endpoint, meeting),
            Direction::Outbound => (meeting, endpoint),
        }
    }
}

/// One trip to or from a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub direction: Direction,
    pub meeting: MeetingInfo,
    /// Stop nearest the meeting
    pub meeting_stop: String,
    /// The user's origin (inbound) or destination (outbound)
    pub endpoint_stop: String,
    meeting_walk_minutes: i64,
    endpoint_walk_minutes: i64,
}

impl TransferPlan {
    /// Trip from `origin_stop` to the meeting.
    pub fn inbound(
        meeting: MeetingInfo,
        origin_stop: impl Into<String>,
        meeting_stop: impl Into<String>,
    ) -> Self {
        Self::new(Direction::Inbound, meeting, meeting_stop, origin_stop)
    }

    /// Trip from the meeting to `destination_stop`.
    pub fn outbound(
        meeting: MeetingInfo,
        meeting_stop: impl Into<String>,
        destination_stop: impl Into<String>,
    ) -> Self {
        Self::new(Direction::Outbound, meeting, meeting_stop, destination_stop)
    }

    pub fn new(
        direction: Direction,
        meeting: MeetingInfo,
        meeting_stop: impl Into<String>,
        endpoint_stop: impl Into<String>,
    ) -> Self {
        Self {
            direction,
            meeting,
            meeting_stop: meeting_stop.into().trim().to_string(),
            endpoint_stop: endpoint_stop.into().trim().to_string(),
            meeting_walk_minutes: 0,
            endpoint_walk_minutes: 0,
        }
    }

    /// Set the walk at the meeting end. Negative values become 0.
    pub fn with_meeting_walk(mut self, minutes: i64) -> Self {
        self.meeting_walk_minutes = minutes.max(0);
        self
    }

    /// Set the walk at the user's end. Negative values become 0.
    pub fn with_endpoint_walk(mut self, minutes: i64) -> Self {
        self.endpoint_walk_minutes = minutes.max(0);
        self
    }

    pub fn meeting_walk_minutes(&self) -> i64 {
        self.meeting_walk_minutes
    }

    pub fn endpoint_walk_minutes(&self) -> i64 {
        self.endpoint_walk_minutes
    }

    /// Where the trip starts.
    pub fn origin(&self) -> &str {
        match self.direction {
            Direction::Inbound => &self.endpoint_stop,
            Direction::Outbound => &self.meeting_stop,
        }
    }

    /// Where the trip ends.
    pub fn destination(&self) -> &str {
        match self.direction {
            Direction::Inbound => &self.meeting_stop,
            Direction::Outbound => &self.endpoint_stop,
        }
    }

    /// Anchor time for the search: arrive before the meeting starts, leave
    /// after it ends, with the meeting walk on top.
    ///
    /// `None` when the walk pushes the time out of the representable range.
    pub fn target_time(&self) -> Option<NaiveDateTime> {
        let walk = Duration::try_minutes(self.meeting_walk_minutes)?;
        match self.direction {
            Direction::Inbound => self.meeting.start.checked_sub_signed(walk),
            Direction::Outbound => self.meeting.end().checked_add_signed(walk),
        }
    }

    /// The timetable query for this trip.
    pub fn request(&self) -> Result<ConnectionsRequest, TimetableError> {
        let request = ConnectionsRequest::new(self.origin(), self.destination())?;
        let at = self
            .target_time()
            .ok_or(TimetableError::InvalidArgument("meeting walk is out of range"))?;
        Ok(request
            .at(at)
            .with_arrival_time(self.direction == Direction::Inbound)
            .with_limit(TRANSFER_SEARCH_LIMIT))
    }

    /// Translator context for connections found by [`request`](Self::request).
    pub fn context(&self) -> TransferContext {
        TransferContext {
            subject: self.meeting.subject.clone(),
            location: self.meeting.location.clone(),
            from: self.origin().to_string(),
            to: self.destination().to_string(),
            meeting_walk_minutes: self.meeting_walk_minutes,
            endpoint_walk_minutes: self.endpoint_walk_minutes,
            direction: self.direction,
        }
    }

    /// Connection to preselect among `count` results.
    ///
    /// Inbound picks the last one (arriving closest to the meeting), outbound
    /// the first (leaving soonest after it).
    pub fn default_selection(&self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        match self.direction {
            Direction::Inbound => Some(count - 1),
            Direction::Outbound => Some(0),
        }
    }
}
