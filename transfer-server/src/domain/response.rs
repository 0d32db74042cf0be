//! Result of one route query.

use super::connection::Connection;

/// Connections returned by a route query, in the order the API gave them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionsResponse {
    /// Count reported by the API (not necessarily `connections.len()`)
    pub count: i64,
    /// Itinerary alternatives, possibly empty
    pub connections: Vec<Connection>,
}

impl ConnectionsResponse {
    /// Returns true if the query found no connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
