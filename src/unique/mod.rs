//! Collision-free strings against an external store.
//!
//! [`make_unique`] probes a candidate, then `candidate-2`, `candidate-3`, ...
//! against an [`ExistenceCheck`] until one is free. The check is the only
//! side effect; the resolver keeps nothing between calls but its local suffix
//! counter.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashSet;
//! use textfmt::unique::{make_unique, UniqueConfig};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let taken: HashSet<String> = ["post", "post-2"].iter().map(|s| s.to_string()).collect();
//! let slug = make_unique("post", &taken, &UniqueConfig::default()).await.unwrap();
//! assert_eq!(slug, "post-3");
//! # });
//! ```

mod conditions;

use std::collections::HashSet;
use std::convert::Infallible;
use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::format::slug;
use crate::util::{char_count, take_chars};

pub use conditions::{is_identifier, Condition, ConditionError, Matcher, Operator};

/// Default retry ceiling: the largest 4-digit suffix.
pub const DEFAULT_MAX_SUFFIX: u32 = 9999;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum UniqueError<E: std::error::Error + 'static> {
    /// Every suffix up to the ceiling collided.
    #[error("No unique value found for {base:?} up to suffix {max_suffix}")]
    Exhausted { base: String, max_suffix: u32 },

    /// The character limit is too small to fit any suffix.
    #[error("Character limit {limit} leaves no room for a suffix on {base:?}")]
    NoRoomForSuffix { base: String, limit: usize },

    /// The existence check itself failed; passed through untouched.
    #[error("Existence check failed: {0}")]
    Check(#[source] E),
}

// ============================================================================
// Configuration
// ============================================================================

/// Options for [`make_unique`], also handed to the [`ExistenceCheck`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UniqueConfig {
    /// Column the candidate is compared against.
    pub field: String,
    /// Row id excluded from the check (the record being updated).
    pub ignore_id: Option<i64>,
    /// Keep the file extension last: `name-2.ext`.
    pub filename: bool,
    /// Maximum length of the result in characters.
    pub char_limit: Option<usize>,
    /// Ignore soft-deleted rows.
    pub soft_delete: bool,
    /// Extra filters the colliding row must also satisfy.
    #[serde(skip)]
    pub matching_values: Vec<Condition>,
    /// Highest suffix tried before giving up. `None` never gives up.
    pub max_suffix: Option<u32>,
}

impl Default for UniqueConfig {
    fn default() -> Self {
        Self {
            field: "name".to_string(),
            ignore_id: None,
            filename: false,
            char_limit: None,
            soft_delete: false,
            matching_values: Vec::new(),
            max_suffix: Some(DEFAULT_MAX_SUFFIX),
        }
    }
}

impl UniqueConfig {
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn with_ignore_id(mut self, id: i64) -> Self {
        self.ignore_id = Some(id);
        self
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    pub fn with_filename(mut self, filename: bool) -> Self {
        self.filename = filename;
        self
    }

    pub fn with_soft_delete(mut self, soft_delete: bool) -> Self {
        self.soft_delete = soft_delete;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.matching_values.push(condition);
        self
    }

    pub fn with_max_suffix(mut self, max_suffix: Option<u32>) -> Self {
        self.max_suffix = max_suffix;
        self
    }
}

// ============================================================================
// Existence Check
// ============================================================================

/// Answers whether a candidate already occupies a slot in the backing store.
///
/// Implementations should match rows where `config.field` equals `candidate`,
/// excluding `config.ignore_id`, skipping soft-deleted rows when
/// `config.soft_delete` is set, and applying every `config.matching_values`
/// filter. Timeouts and cancellation are the implementation's concern.
pub trait ExistenceCheck {
    type Error: std::error::Error + Send + Sync + 'static;

    fn exists(
        &self,
        candidate: &str,
        config: &UniqueConfig,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// A plain set of taken values. Filters in the config are ignored.
impl ExistenceCheck for HashSet<String> {
    type Error = Infallible;

    fn exists(
        &self,
        candidate: &str,
        _config: &UniqueConfig,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        std::future::ready(Ok(self.contains(candidate)))
    }
}

/// Adapts a synchronous predicate into an [`ExistenceCheck`].
pub struct CheckFn<F>(pub F);

impl<F> ExistenceCheck for CheckFn<F>
where
    F: Fn(&str, &UniqueConfig) -> bool + Sync,
{
    type Error = Infallible;

    fn exists(
        &self,
        candidate: &str,
        config: &UniqueConfig,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        std::future::ready(Ok((self.0)(candidate, config)))
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Returns `candidate`, or the first of `candidate-2`, `candidate-3`, ... that
/// `check` reports as free.
///
/// With `config.char_limit` set, the base is cut so that base plus suffix (and
/// extension, in filename mode) stays within the limit; the bare candidate is
/// cut to the limit as well. In filename mode the suffix goes in front of the
/// extension.
///
/// Probes run one after another. This is check-then-act: two callers racing
/// for the same base can both see it as free. Callers that need a hard
/// guarantee must back it with a unique constraint in the store.
///
/// # Errors
///
/// - [`UniqueError::Check`] as soon as `check` fails; no retry is attempted.
/// - [`UniqueError::Exhausted`] when every suffix up to `config.max_suffix` collides.
/// - [`UniqueError::NoRoomForSuffix`] when the limit cannot fit base and suffix,
///   or in filename mode cannot fit one stem character plus the extension.
pub async fn make_unique<C>(
    candidate: &str,
    check: &C,
    config: &UniqueConfig,
) -> Result<String, UniqueError<C::Error>>
where
    C: ExistenceCheck + ?Sized,
{
    let (stem, extension) = if config.filename {
        split_extension(candidate)
    } else {
        (candidate, None)
    };

    if let Some(limit) = config.char_limit {
        if !fits_bare(stem, extension, limit) {
            return Err(UniqueError::NoRoomForSuffix {
                base: candidate.to_string(),
                limit,
            });
        }
    }

    let bare = assemble(stem, None, extension, config.char_limit);
    if !probe(check, &bare, config).await? {
        return Ok(bare);
    }

    let mut suffix: u32 = 2;
    loop {
        if config.max_suffix.is_some_and(|max| suffix > max) {
            return Err(exhausted(candidate, config.max_suffix.unwrap_or(suffix)));
        }

        let attempt = assemble(stem, Some(suffix), extension, config.char_limit);
        if let Some(limit) = config.char_limit {
            if !fits_suffix(&attempt, suffix, extension, limit) {
                return Err(UniqueError::NoRoomForSuffix {
                    base: candidate.to_string(),
                    limit,
                });
            }
        }

        if !probe(check, &attempt, config).await? {
            tracing::debug!(candidate = %attempt, suffix, "Found unique value");
            return Ok(attempt);
        }

        suffix = match suffix.checked_add(1) {
            Some(next) => next,
            None => return Err(exhausted(candidate, suffix)),
        };
    }
}

/// Slugs `input` (cut to `config.char_limit`) and makes the slug unique.
pub async fn unique_slug<C>(
    input: &str,
    check: &C,
    config: &UniqueConfig,
) -> Result<String, UniqueError<C::Error>>
where
    C: ExistenceCheck + ?Sized,
{
    let base = slug(input, config.char_limit);
    make_unique(&base, check, config).await
}

async fn probe<C>(
    check: &C,
    candidate: &str,
    config: &UniqueConfig,
) -> Result<bool, UniqueError<C::Error>>
where
    C: ExistenceCheck + ?Sized,
{
    let taken = check
        .exists(candidate, config)
        .await
        .map_err(UniqueError::Check)?;
    tracing::trace!(candidate = %candidate, taken, "Probed unique candidate");
    Ok(taken)
}

fn exhausted<E: std::error::Error + 'static>(base: &str, max_suffix: u32) -> UniqueError<E> {
    UniqueError::Exhausted {
        base: base.to_string(),
        max_suffix,
    }
}

/// Splits `name.ext` into `("name", Some("ext"))`.
///
/// Leading-dot names (`.env`) and names ending in a dot have no extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Joins stem, suffix and extension, cutting the stem to fit `char_limit`.
///
/// The reservation is the suffix width: `-2` takes 2 characters, `-10` takes
/// 3, `-100` takes 4.
fn assemble(
    stem: &str,
    suffix: Option<u32>,
    extension: Option<&str>,
    char_limit: Option<usize>,
) -> String {
    let suffix_text = suffix.map(|s| format!("-{}", s)).unwrap_or_default();
    let extension_text = extension.map(|e| format!(".{}", e)).unwrap_or_default();

    let stem = match char_limit {
        Some(limit) => {
            let reserved = char_count(&suffix_text) + char_count(&extension_text);
            let cut = take_chars(stem, limit.saturating_sub(reserved));
            // A cut base should not end in a separator before the suffix.
            if suffix.is_some() && cut.len() < stem.len() {
                cut.trim_end_matches('-')
            } else {
                cut
            }
        }
        None => stem,
    };

    format!("{}{}{}", stem, suffix_text, extension_text)
}

/// Whether `limit` holds at least one stem character plus the extension.
fn fits_bare(stem: &str, extension: Option<&str>, limit: usize) -> bool {
    let reserved = extension.map_or(0, |e| char_count(e) + 1);
    stem.is_empty() || limit > reserved
}

/// Whether an assembled attempt kept at least one character of its base.
fn fits_suffix(attempt: &str, suffix: u32, extension: Option<&str>, limit: usize) -> bool {
    let reserved = 1 + suffix.to_string().len() + extension.map_or(0, |e| char_count(e) + 1);
    limit > reserved && char_count(attempt) > reserved
}
