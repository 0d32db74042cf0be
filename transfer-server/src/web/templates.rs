//! Askama templates for the taskpane's HTML fragments.

use askama::Template;

use crate::domain::{Connection, format_duration, format_time_of_day};

/// Connection table fragment (search results).
#[derive(Template)]
#[template(path = "connections.html")]
pub struct ConnectionListTemplate {
    pub connections: Vec<ConnectionView>,
}

impl ConnectionListTemplate {
    /// Build the table, marking `selected` as the preselected row.
    pub fn new(connections: &[Connection], selected: Option<usize>) -> Self {
        Self {
            connections: connections
                .iter()
                .enumerate()
                .map(|(i, c)| ConnectionView::from_connection(i, c, selected == Some(i)))
                .collect(),
        }
    }
}

/// One table row.
#[derive(Debug, Clone)]
pub struct ConnectionView {
    pub index: usize,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    /// Empty when the connection has no ride
    pub transfers: String,
    pub via: String,
    pub summary: String,
    pub is_selected: bool,
}

impl ConnectionView {
    pub fn from_connection(index: usize, connection: &Connection, is_selected: bool) -> Self {
        Self {
            index,
            departure_time: format_time_of_day(connection.departure),
            arrival_time: format_time_of_day(connection.arrival),
            duration: format_duration(connection.departure, connection.arrival),
            transfers: connection
                .display_transfers()
                .map(|n| n.to_string())
                .unwrap_or_default(),
            via: connection.via_string(),
            summary: connection.to_emoji_summary(),
            is_selected,
        }
    }
}
