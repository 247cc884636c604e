//! Presentation formatting for server-rendered views.
//!
//! - [`limit`]: word and character truncation that keeps HTML tags intact
//! - [`unique`]: collision-free slugs and names probed against a store
//! - [`format`]: money, phone numbers, postal codes, plurals, slugs and dates
//! - [`storage`]: an SQLite-backed existence check for [`unique`]
//! - [`config`]: shared defaults loaded from TOML

pub mod config;
pub mod format;
pub mod limit;
pub mod storage;
pub mod unique;
pub mod util;
