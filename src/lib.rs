//! todoport library
//!
//! Converts Microsoft To Do JSON exports into Super Productivity backup
//! files. This module exports the core components for testing and
//! integration.

pub mod backup;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod ids;
pub mod model;
pub mod report;
pub mod source;
pub mod time;
