#![forbid(unsafe_code)]

//! Core domain model and business logic for the SPMC dosing tracker.
//!
//! This crate provides:
//! - Domain types (sachet count, schedule input, computed schedule)
//! - Form validation and 12-hour time normalization
//! - The backward-chained dose calculator
//! - Shareable link encoding
//! - Timeline, share text and bilingual instruction documents
//! - Explicit view state for front ends

pub mod types;
pub mod error;
pub mod validation;
pub mod clock;
pub mod schedule;
pub mod codec;
pub mod text;
pub mod timeline;
pub mod document;
pub mod view;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{DecodeError, Error, RenderError, Result};
pub use types::*;
pub use validation::{validate, Field, FieldError, RawScheduleInput, ValidationErrors};
pub use clock::{time_options, to_12_hour, to_24_hour};
pub use schedule::calculate_schedule;
pub use codec::{decode, encode, share_link, token_from_query, ShareableState};
pub use text::Language;
pub use timeline::{share_text, timeline, TimelineEntry, TimelineKind};
pub use document::{render_all, DocumentRenderer, RenderedDocument, TextDocumentRenderer};
pub use view::ViewState;
pub use config::Config;
