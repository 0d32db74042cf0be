//! Handing drafts to a calendar.
//!
//! The taskpane can open a pre-filled appointment form itself; a server-side
//! [`CalendarIntegration`] is optional. [`IcsOutbox`] drops each draft as an
//! iCalendar file into a directory that a mail client or sync job picks up.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::info;

use crate::domain::Connection;

use super::context::TransferContext;
use super::error::AppointmentError;
use super::labels::Labels;
use super::translate::{AppointmentDraft, translate};

/// Maximum content line length in octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

const PRODUCT_ID: &str = "-//transfer-server//Transfer Planner//EN";

/// Something that can open a new appointment from a draft.
pub trait CalendarIntegration: Send + Sync {
    /// Open or store the draft. Failures are reported, never retried.
    fn open_new_appointment(&self, draft: &AppointmentDraft) -> Result<(), AppointmentError>;
}

/// Translate a connection and hand the draft to `calendar`, if any.
///
/// Nothing reaches the calendar when translation fails. The draft is
/// returned either way so the caller can open it in the host.
pub fn create_transfer_appointment(
    connection: &Connection,
    context: &TransferContext,
    labels: &Labels,
    calendar: Option<&dyn CalendarIntegration>,
) -> Result<AppointmentDraft, AppointmentError> {
    let draft = translate(connection, context, labels)?;

    if let Some(calendar) = calendar {
        calendar.open_new_appointment(&draft)?;
        info!(subject = %draft.subject, start = %draft.start, "appointment handed to calendar");
    }

    Ok(draft)
}

/// Writes each draft as a single-event `.ics` file.
#[derive(Debug)]
pub struct IcsOutbox {
    dir: PathBuf,
    written: AtomicU64,
}

impl IcsOutbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the draft and return the file path.
    pub fn write(&self, draft: &AppointmentDraft) -> Result<PathBuf, AppointmentError> {
        let now = Utc::now();
        let n = self.written.fetch_add(1, Ordering::SeqCst);
        let stem = format!("transfer-{}-{n}", now.timestamp_millis());
        let uid = format!("{stem}@transfer-server");

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            AppointmentError::IntegrationUnavailable(format!(
                "failed to create outbox {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.dir.join(format!("{stem}.ics"));
        std::fs::write(&path, render_event(draft, &uid, now)).map_err(|e| {
            AppointmentError::IntegrationUnavailable(format!(
                "failed to write {}: {e}",
                path.display()
            ))
        })?;

        Ok(path)
    }
}

impl CalendarIntegration for IcsOutbox {
    fn open_new_appointment(&self, draft: &AppointmentDraft) -> Result<(), AppointmentError> {
        let path = self.write(draft)?;
        info!(path = %path.display(), "wrote calendar draft");
        Ok(())
    }
}

/// Render a draft as an iCalendar object with one `VEVENT`.
///
/// Start and end are floating local times, matching the wall-clock times
/// the timetable reports.
pub fn render_event(draft: &AppointmentDraft, uid: &str, stamp: DateTime<Utc>) -> String {
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODUCT_ID}"),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", escape_text(uid)),
        format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")),
        format!("DTSTART:{}", floating(draft.start)),
        format!("DTEND:{}", floating(draft.end)),
        format!("SUMMARY:{}", escape_text(&draft.subject)),
        format!("LOCATION:{}", escape_text(&draft.location)),
        format!("DESCRIPTION:{}", escape_text(&draft.body)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    out
}

fn floating(at: NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M%S").to_string()
}

/// Escape a TEXT value (RFC 5545 §3.3.11).
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Fold a content line at 75 octets without splitting a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}
