//! Location search: the compiled-in registry and a remote geocoder queried
//! side by side, merged, deduplicated and truncated.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tracing::{debug, warn};

use crate::{geocoder::Geocoder, model::Location, registry};

/// Queries shorter than this return nothing.
pub const MIN_QUERY_LEN: usize = 2;
/// Upper bound on merged results.
pub const MAX_RESULTS: usize = 10;
/// Candidates requested from the remote geocoder.
pub const REMOTE_LIMIT: usize = 5;
/// Same-name candidates closer than this on both axes are duplicates.
pub const DEDUP_DEGREES: f64 = 0.1;

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct LocationResolver {
    geocoder: Box<dyn Geocoder>,
    remote_timeout: Duration,
}

impl LocationResolver {
    pub fn new(geocoder: Box<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, remote_timeout: Duration) -> Self {
        self.remote_timeout = remote_timeout;
        self
    }

    /// Ranked candidates for `query`, at most [`MAX_RESULTS`].
    ///
    /// A failing or slow geocoder degrades to registry-only results; the
    /// registry is always available, so this never errors.
    pub async fn search(&self, query: &str) -> Vec<Location> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let local = async { registry::search(query, MAX_RESULTS) };
        let remote = async {
            match tokio::time::timeout(
                self.remote_timeout,
                self.geocoder.geocode(query, REMOTE_LIMIT),
            )
            .await
            {
                Ok(Ok(found)) => found,
                Ok(Err(e)) => {
                    warn!(query, error = %e, "geocoder failed, using registry results only");
                    Vec::new()
                }
                Err(_) => {
                    warn!(
                        query,
                        timeout_ms = self.remote_timeout.as_millis() as u64,
                        "geocoder timed out, using registry results only"
                    );
                    Vec::new()
                }
            }
        };

        let (local, remote) = tokio::join!(local, remote);
        debug!(query, local = local.len(), remote = remote.len(), "search candidates");

        merge_candidates(local, remote)
    }

    /// Like [`search`](Self::search) but returns `None` when a newer search
    /// was started on `session` before this one finished.
    pub async fn search_latest(
        &self,
        session: &SearchSession,
        query: &str,
    ) -> Option<Vec<Location>> {
        let ticket = session.begin();
        let results = self.search(query).await;

        if session.is_current(ticket) {
            Some(results)
        } else {
            debug!(query, ticket, "discarding superseded search");
            None
        }
    }
}

/// Local candidates first, then remote; drops later same-name candidates
/// within [`DEDUP_DEGREES`] of an earlier one and keeps the first
/// [`MAX_RESULTS`].
pub fn merge_candidates(local: Vec<Location>, remote: Vec<Location>) -> Vec<Location> {
    let mut merged: Vec<Location> = Vec::with_capacity(MAX_RESULTS);

    for candidate in local.into_iter().chain(remote) {
        let duplicate = merged.iter().any(|kept| {
            kept.name == candidate.name
                && kept.coordinates.is_near(&candidate.coordinates, DEDUP_DEGREES)
        });
        if !duplicate {
            merged.push(candidate);
        }
        if merged.len() == MAX_RESULTS {
            break;
        }
    }

    merged
}

/// Monotonic request counter used to discard results of superseded searches.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    latest: Arc<AtomicU64>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; invalidates every earlier ticket.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}
