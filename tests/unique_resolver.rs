//! Integration tests for the unique-string resolver with custom async checks.

use std::collections::HashSet;
use std::convert::Infallible;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use textfmt::unique::{make_unique, unique_slug, ExistenceCheck, UniqueConfig, UniqueError};

/// Records every probe and yields to the runtime before answering.
struct Registry {
    taken: HashSet<String>,
    probes: Mutex<Vec<String>>,
}

impl Registry {
    fn new(taken: &[&str]) -> Self {
        Self {
            taken: taken.iter().map(|s| s.to_string()).collect(),
            probes: Mutex::new(Vec::new()),
        }
    }

    fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }
}

impl ExistenceCheck for Registry {
    type Error = Infallible;

    fn exists(
        &self,
        candidate: &str,
        _config: &UniqueConfig,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        async move {
            tokio::task::yield_now().await;
            self.probes.lock().unwrap().push(candidate.to_string());
            Ok(self.taken.contains(candidate))
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("registry offline")]
struct Offline;

/// Reports the first `healthy` probes as taken, then fails.
struct Flaky {
    healthy: usize,
    calls: AtomicUsize,
}

impl ExistenceCheck for Flaky {
    type Error = Offline;

    fn exists(
        &self,
        _candidate: &str,
        _config: &UniqueConfig,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let healthy = self.healthy;
        async move {
            if call < healthy {
                Ok(true)
            } else {
                Err(Offline)
            }
        }
    }
}

// ============================================================================
// Probing
// ============================================================================

#[tokio::test]
async fn test_probes_run_in_order() {
    let registry = Registry::new(&["report", "report-2", "report-3"]);
    let result = make_unique("report", &registry, &UniqueConfig::default())
        .await
        .unwrap();

    assert_eq!(result, "report-4");
    assert_eq!(
        registry.probes(),
        vec!["report", "report-2", "report-3", "report-4"]
    );
}

#[tokio::test]
async fn test_free_candidate_probed_once() {
    let registry = Registry::new(&[]);
    make_unique("fresh", &registry, &UniqueConfig::default())
        .await
        .unwrap();
    assert_eq!(registry.probes(), vec!["fresh"]);
}

#[tokio::test]
async fn test_probes_respect_char_limit() {
    let registry = Registry::new(&["quarterly", "quarter-2"]);
    let config = UniqueConfig::default().with_char_limit(9);
    let result = make_unique("quarterly", &registry, &config).await.unwrap();

    assert_eq!(result, "quarter-3");
    assert!(registry.probes().iter().all(|p| p.chars().count() <= 9));
}

#[tokio::test]
async fn test_filename_mode_through_registry() {
    let registry = Registry::new(&["notes.txt", "notes-2.txt"]);
    let config = UniqueConfig::default().with_filename(true);
    let result = make_unique("notes.txt", &registry, &config).await.unwrap();
    assert_eq!(result, "notes-3.txt");
}

#[tokio::test]
async fn test_unique_slug_with_limit() {
    let registry = Registry::new(&["a-very-long"]);
    let config = UniqueConfig::default().with_char_limit(11);
    let result = unique_slug("A very long title indeed", &registry, &config)
        .await
        .unwrap();
    assert_eq!(result, "a-very-lo-2");
}

#[tokio::test]
async fn test_concurrent_callers_can_collide() {
    // Check-then-act: both callers see post-2 as free.
    let registry = Registry::new(&["post"]);
    let config = UniqueConfig::default();
    let (a, b) = tokio::join!(
        make_unique("post", &registry, &config),
        make_unique("post", &registry, &config)
    );
    assert_eq!(a.unwrap(), "post-2");
    assert_eq!(b.unwrap(), "post-2");
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_check_error_stops_probing() {
    let flaky = Flaky {
        healthy: 2,
        calls: AtomicUsize::new(0),
    };
    let err = make_unique("post", &flaky, &UniqueConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UniqueError::Check(Offline)));
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains("Existence check failed"));
}

#[tokio::test]
async fn test_exhausted_reports_ceiling() {
    let flaky = Flaky {
        healthy: usize::MAX,
        calls: AtomicUsize::new(0),
    };
    let config = UniqueConfig::default().with_max_suffix(Some(20));
    let err = make_unique("post", &flaky, &config).await.unwrap_err();

    assert!(matches!(err, UniqueError::Exhausted { max_suffix: 20, .. }));
    // The bare candidate plus suffixes 2..=20.
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 20);
}
