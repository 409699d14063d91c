//! Command-line surface
//!
//! Turns the process arguments into either a usage request or a validated
//! [`CrawlRequest`]. The configuration is resolved in layers: built-in
//! defaults, then the optional TOML file, then the flags given on the command
//! line.
//!
//! Single-dash long flags (`-limit 100`, `-limit=100`) and `-p=10` are accepted
//! alongside the usual `--limit 100` forms.

use crate::config::{load_config_file, validate, CrawlConfig};
use crate::url::{parse_seed, with_default_scheme};
use crate::ConfigError;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// Flags that may be written with a single dash
const LONG_FLAGS: &[&str] = &["depth", "parallel", "verbose", "limit", "timeout", "config"];

/// Flags that take no value
const SWITCHES: &[&str] = &["v", "verbose"];

/// Wordcrawl: a bounded, single-host word counter
///
/// Crawls every page reachable from the seed URL on the same host, up to the
/// given depth, and prints the number of words and numbers found on each page.
#[derive(Parser, Debug)]
#[command(name = "wordcrawl")]
#[command(version)]
#[command(about = "Counts words and numbers on every page of a site", long_about = None)]
pub struct Cli {
    /// Seed URL (https:// is assumed when no scheme is given), or `help`
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Maximum link depth to follow from the seed (0 = seed page only)
    #[arg(short = 'd', long = "depth", value_name = "DEPTH")]
    pub depth: Option<u32>,

    /// Number of parallel workers
    #[arg(short = 'p', long = "parallel", value_name = "WORKERS")]
    pub parallel: Option<usize>,

    /// Verbose logging and summary lines
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Pause each worker takes before every request, in milliseconds
    #[arg(long = "limit", value_name = "MS")]
    pub limit: Option<u64>,

    /// Request timeout in milliseconds
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// What the binary should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage and exit without crawling
    Help,

    /// Crawl from a seed URL
    Crawl(CrawlRequest),
}

/// A validated crawl to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Seed URL as given, with `https://` prepended when it had no scheme
    pub seed: String,

    pub config: CrawlConfig,
}

impl Cli {
    /// Parses the process arguments, exiting on clap errors
    pub fn parse_args() -> Self {
        Self::parse_from(rewrite_go_style_flags(std::env::args_os()))
    }

    /// Parses an explicit argument list (first item is the program name)
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(rewrite_go_style_flags(args))
    }

    /// Resolves the arguments into an [`Invocation`]
    ///
    /// # Returns
    ///
    /// * `Ok(Invocation::Help)` - The seed argument was `help`
    /// * `Ok(Invocation::Crawl(..))` - Seed parsed and configuration validated
    /// * `Err(ConfigError)` - Missing or invalid URL, unreadable config file,
    ///   or invalid settings
    pub fn into_invocation(self) -> Result<Invocation, ConfigError> {
        let raw = self.url.as_deref().ok_or(ConfigError::MissingUrl)?;
        if raw == "help" {
            return Ok(Invocation::Help);
        }

        let seed = with_default_scheme(raw);
        parse_seed(&seed).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        let mut config = CrawlConfig::default();
        if let Some(path) = &self.config {
            config.apply_file(&load_config_file(path)?);
        }
        self.apply_flags(&mut config);
        validate(&config)?;

        Ok(Invocation::Crawl(CrawlRequest { seed, config }))
    }

    /// Overlays the flags that were given on the command line
    fn apply_flags(&self, config: &mut CrawlConfig) {
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(parallel) = self.parallel {
            config.parallelism = parallel;
        }
        if self.verbose {
            config.verbose = true;
        }
        if let Some(limit) = self.limit {
            config.inter_request_delay = Duration::from_millis(limit);
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout = Duration::from_millis(timeout);
        }
    }
}

/// Usage lines printed for `wordcrawl help`
pub fn usage() -> &'static str {
    "use -d to indicate how many times the crawler needs to recurse\n\
     use -p to indicate the amount of parallel threads\n\
     use -v to run the crawler in verbose mode\n\
     use -limit to specify the time interval to wait between requests"
}

/// Rewrites single-dash long flags and `-x=value` into forms clap understands
///
/// `-limit 5` becomes `--limit 5`, `-limit=5` becomes `--limit=5` and `-p=10`
/// becomes `-p 10`. Switches accept `-v=true` (kept as `-v`) and `-v=false`
/// (dropped). Everything after a literal `--` is left alone.
pub fn rewrite_go_style_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut rewritten = Vec::new();
    let mut passthrough = false;

    for arg in args.into_iter().map(Into::into) {
        let text = match arg.to_str() {
            Some(text) if !passthrough => text.to_string(),
            _ => {
                rewritten.push(arg);
                continue;
            }
        };

        if text == "--" {
            passthrough = true;
            rewritten.push(arg);
            continue;
        }

        let Some(flag) = text.strip_prefix('-').filter(|f| !f.starts_with('-')) else {
            rewritten.push(arg);
            continue;
        };

        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        if SWITCHES.contains(&name) {
            let dash = if name.len() == 1 { "-" } else { "--" };
            match value {
                None | Some("true") | Some("1") => {
                    rewritten.push(OsString::from(format!("{}{}", dash, name)))
                }
                Some("false") | Some("0") => {}
                Some(_) => rewritten.push(arg),
            }
        } else if LONG_FLAGS.contains(&name) {
            rewritten.push(OsString::from(format!("-{}", text)));
        } else if let (1, Some(value)) = (name.len(), value) {
            rewritten.push(OsString::from(format!("-{}", name)));
            rewritten.push(OsString::from(value));
        } else {
            rewritten.push(arg);
        }
    }

    rewritten
}
