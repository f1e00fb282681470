//! Journey board server.
//!
//! Shows upcoming train journeys for a small, fixed set of route pairs.
//! One route pair is selected at a time; advancing the selection fetches
//! that pair's journeys from a background worker, and only the result for
//! the pair still selected when it arrives is rendered.

pub mod board;
pub mod config;
pub mod domain;
pub mod navitia;
pub mod selection;
pub mod session;
pub mod web;
pub mod worker;
