//! The conference program: session records loaded once at startup and the
//! read-only queries the chat tools run against them.
//!
//! Records are read from the JSON export of the conference website. Dates
//! arrive as `dd/MM/yyyy HH:mm:ss` in UTC and are exposed in the venue's
//! `+01:00` offset; abstracts arrive as HTML and are converted to markdown
//! during deserialization.

pub mod analyzer;
pub mod dates;
pub mod markdown;
pub mod model;
pub mod reader;

pub use analyzer::Catalog;
pub use markdown::html_to_markdown;
pub use model::{
    ConferenceSession, Expert, ExpertSummary, PrimaryTrack, SessionSummary, SessionType, Track,
};
pub use reader::{read_catalog, CatalogError};
