//! University course timetabling for the U-Engine ecosystem.
//!
//! Provides the ITC 2019 data model, the mutable assignment state of candidate
//! timetables, and the evaluation of distribution constraints over them.
//! Searching for timetables is left to a higher layer; this crate scores
//! whatever candidates it is given.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Bits`, `Time`, `Room`, `Class`, `Course`,
//!   `Student`, `TravelTime`, `Event`, `Timetable`
//! - **`distribution`**: The 19 distribution rules, the shared evaluator and
//!   hard/soft wrapping
//! - **`problem`**: Instance registry tying rooms, courses, students, travel
//!   times and requirements together
//! - **`validation`**: Load-time integrity checks (duplicate IDs, parents,
//!   references, term shape)
//! - **`evaluation`**: Feasibility and penalty breakdown of a timetable
//! - **`config`**: Term shape and objective weights, loadable from TOML
//!
//! # References
//!
//! - Müller, Rudová, Müllerová (2018), "University course timetabling and
//!   International Timetabling Competition 2019"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod config;
pub mod distribution;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod problem;
pub mod validation;

pub use error::{AssignmentKind, Result, TimetableError};
