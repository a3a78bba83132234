//! Core library for readtime.
//!
//! Estimates how long an article takes to read and injects a formatted
//! estimate before or after the article body.
//!
//! # Modules
//!
//! - [`estimate`] - Word counting and reading time computation
//! - [`markup`] - HTML stripping before counting
//! - [`present`] - Eligibility, formatting and placement of the estimate
//! - [`shortcode`] - The `[reading_time]` manual insertion marker
//! - [`pipeline`] - Named extension points and the reading time filters
//! - [`settings`] - Settings snapshot and the admin round trip
//! - [`options`] - Key/value option stores
//! - [`config`] - Process configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use readtime_core::{RenderContext, Settings, compute_duration, render};
//!
//! let article = "word ".repeat(150);
//! let duration = compute_duration(&article, 200);
//! assert_eq!((duration.minutes, duration.seconds), (0, 45));
//!
//! let out = render(&article, &RenderContext::single("post"), &Settings::default());
//! assert!(out.starts_with("<p><strong>Reading Time:</strong> 0 min, 45 sec</p>"));
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod estimate;
pub mod markup;
pub mod options;
pub mod pipeline;
pub mod present;
pub mod settings;
pub mod shortcode;

pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use error::{
    ConfigError, ConfigResult, SettingsError, SettingsResult, StoreError, StoreResult,
};
pub use estimate::{DEFAULT_READING_SPEED, Duration, compute_duration};
pub use options::{JsonFileStore, MemoryOptionStore, OptionStore};
pub use pipeline::{ContentPipeline, THE_CONTENT, register_reading_time};
pub use present::{RenderContext, manual_invocation, render};
pub use settings::{Placement, Settings, SettingsField};
