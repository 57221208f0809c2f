//! smart2mapeo: SMART Configurable Model to Mapeo presets
//!
//! Layers, inner to outer:
//! - `domain`: model projection, preset/field/defaults derivation (no I/O)
//! - `application`: transformation facade and conversion services
//! - `infrastructure`: filesystem, XML parsing, zip extraction, DI container
//! - `cli`: argument parsing and command handlers

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
