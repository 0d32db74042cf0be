//! Public-transport transfer planner for calendar appointments.
//!
//! Given a meeting in the user's calendar, this crate finds timetable
//! connections to and from the meeting's stop and turns a chosen connection
//! into a pre-filled "transfer" appointment.

pub mod appointment;
pub mod cache;
pub mod completion;
pub mod domain;
pub mod favourites;
pub mod timetable;
pub mod web;
