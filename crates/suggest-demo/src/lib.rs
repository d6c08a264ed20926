#![forbid(unsafe_code)]

//! Terminal demo of the suggest search field.
//!
//! Two modes mirror the two ways hosts feed candidates: a fixed list
//! filtered locally, and a simulated remote lookup fired when typing stops.

pub mod app;
pub mod cli;
pub mod data;
pub mod draw;
