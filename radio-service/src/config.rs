//! Configuration types for the TracksService.

/// Default number of read-compute-write attempts for a single tally change.
pub const DEFAULT_MAX_TALLY_ATTEMPTS: usize = 5;

/// Default number of tracks scanned by a search.
pub const DEFAULT_SEARCH_SCAN_LIMIT: usize = 100;

/// Default number of tracks returned by the trending listing.
pub const DEFAULT_TRENDING_LIMIT: usize = 20;

/// Configuration for the TracksService.
#[derive(Debug, Clone)]
pub struct TracksServiceConfig {
    /// How many times a tally change is retried when another writer updated
    /// the track between our read and our conditional write. Always at least 1.
    pub max_tally_attempts: usize,

    /// Maximum number of tracks a search looks at before filtering.
    pub search_scan_limit: usize,

    /// Number of tracks returned by the trending listing when no limit is given.
    pub trending_limit: usize,
}

impl Default for TracksServiceConfig {
    fn default() -> Self {
        Self {
            max_tally_attempts: DEFAULT_MAX_TALLY_ATTEMPTS,
            search_scan_limit: DEFAULT_SEARCH_SCAN_LIMIT,
            trending_limit: DEFAULT_TRENDING_LIMIT,
        }
    }
}

impl TracksServiceConfig {
    /// Returns the config with a custom tally attempt budget (minimum 1).
    pub fn with_max_tally_attempts(mut self, attempts: usize) -> Self {
        self.max_tally_attempts = attempts.max(1);
        self
    }

    pub fn with_search_scan_limit(mut self, limit: usize) -> Self {
        self.search_scan_limit = limit;
        self
    }

    pub fn with_trending_limit(mut self, limit: usize) -> Self {
        self.trending_limit = limit;
        self
    }
}
