//! Utility functions shared by the formatters.
//!
//! This module provides reusable utilities for:
//!
//! - **HTML helpers**: entity encoding, paragraph splitting, mailto links
//! - **Text processing**: character-based counting and cutting
//!
//! # Examples
//!
//! ```
//! use textfmt::util::{entities, take_chars};
//!
//! assert_eq!(entities("Fish & Chips"), "Fish &amp; Chips");
//! assert_eq!(take_chars("Long article title", 4), "Long");
//! ```

mod html;
mod text;

pub use html::{email_link, entities, nl2p};
pub use text::{char_count, take_chars, trim_end_cow};
