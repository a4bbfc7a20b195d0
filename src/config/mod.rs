//! Configuration for reference building and HCC resolution.

/// Environment variable overriding the default shard count
pub const SHARDS_ENV_VAR: &str = "HCC_SHARDS";

/// Helper function to get the shard count from environment
#[must_use]
pub fn get_shard_count() -> Option<usize> {
    std::env::var(SHARDS_ENV_VAR)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

/// Configuration for the `ReferenceBuilder`
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Append the documented supplemental ICD-9 mappings to crosswalk tables
    pub include_supplemental: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            include_supplemental: true,
        }
    }
}

impl BuildConfig {
    /// Create a new build configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable supplemental ICD-9 mappings
    #[must_use]
    pub const fn with_supplemental(mut self, include: bool) -> Self {
        self.include_supplemental = include;
        self
    }
}

/// Configuration for the `HccResolver`
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Whether to shard presence construction and the cascade with rayon
    pub parallel: bool,
    /// Number of recipient shards for presence construction
    pub shard_count: usize,
    /// Minimum number of diagnosis records before work is parallelised
    pub parallel_threshold: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            shard_count: get_shard_count().unwrap_or_else(num_cpus::get),
            parallel_threshold: 50_000,
        }
    }
}

impl ResolverConfig {
    /// Create a new resolver configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run everything on the calling thread
    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the number of recipient shards (at least one)
    #[must_use]
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count.max(1);
        self
    }

    /// Set the record count from which work is parallelised
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether an input of `records` diagnosis records should run in parallel
    #[must_use]
    pub const fn runs_parallel(&self, records: usize) -> bool {
        self.parallel && records >= self.parallel_threshold
    }
}
