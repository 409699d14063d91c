use serde::Deserialize;
use std::time::Duration;

/// Request timeout applied when nothing else is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!("wordcrawl/", env!("CARGO_PKG_VERSION"));

/// Runtime configuration for one crawl
///
/// Built once at the program boundary and shared read-only with every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Number of workers draining the work queue
    pub parallelism: usize,

    /// Deepest link level that is still fetched (0 = seed page only)
    pub max_depth: u32,

    /// Pause each worker takes before processing an item
    pub inter_request_delay: Duration,

    /// Verbose logging and extended report
    pub verbose: bool,

    /// Upper bound for a single GET including the body read
    pub request_timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            parallelism: 1,
            max_depth: 0,
            inter_request_delay: Duration::ZERO,
            verbose: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    /// Returns true if items queued at `depth` must not be fetched
    pub fn exceeds_max_depth(&self, depth: u32) -> bool {
        depth > self.max_depth
    }

    /// Overlays the values present in a parsed config file
    pub fn apply_file(&mut self, file: &ConfigFile) {
        let section = &file.crawler;
        if let Some(depth) = section.max_depth {
            self.max_depth = depth;
        }
        if let Some(parallelism) = section.parallelism {
            self.parallelism = parallelism;
        }
        if let Some(delay) = section.request_delay_ms {
            self.inter_request_delay = Duration::from_millis(delay);
        }
        if let Some(timeout) = section.request_timeout_ms {
            self.request_timeout = Duration::from_millis(timeout);
        }
        if let Some(verbose) = section.verbose {
            self.verbose = verbose;
        }
        if let Some(user_agent) = &section.user_agent {
            self.user_agent = user_agent.clone();
        }
    }
}

/// On-disk configuration file layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub crawler: CrawlerSection,
}

/// `[crawler]` table; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlerSection {
    /// Maximum depth to crawl from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Number of parallel workers
    pub parallelism: Option<usize>,

    /// Per-worker pause before each request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: Option<u64>,

    /// Request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: Option<u64>,

    pub verbose: Option<bool>,

    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}
