//! # pushframe-core
//!
//! Shared plumbing for the pushframe crates:
//!
//! - **Logging**: [`logging::init_subscriber`] installs the stderr `tracing`
//!   subscriber, [`logging::capture_logs`] captures events in tests
//! - **Text**: [`text::truncate_str`] for UTF-8-safe prefixes (used to log
//!   device tokens without leaking them in full)
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other pushframe crates.

#![deny(unsafe_code)]

pub mod logging;
pub mod text;
