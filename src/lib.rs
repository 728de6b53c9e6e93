//! Competition badge generator.
//!
//! Reads a competition export (persons, schedule, assignments) and turns each
//! accepted participant's assignments into a day-by-day personal agenda,
//! printed on the back of their badge, plus attendee and guest lists.

pub mod badge;
pub mod config;
pub mod country;
pub mod display;
pub mod error;
pub mod lists;
pub mod render;
pub mod schedule;
pub mod wcif;
pub mod web;
