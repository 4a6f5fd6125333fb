//! Run configuration
//!
//! Settings come from command-line flags first, then environment variables
//! (which may be sourced from a dotenv file), then defaults. AWS credentials
//! and region are left to the AWS provider chain.

use crate::throttle::Throttle;
use crate::transform::DEFAULT_KEY_FIELD;

use clap::Args;
use eyre::{Context, Result, bail};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const ENV_TABLE: &str = "SEQUIN_TABLE";
pub const ENV_KEY_FIELD: &str = "SEQUIN_KEY_FIELD";
pub const ENV_PAUSE_MS: &str = "SEQUIN_PAUSE_MS";
pub const ENV_MIN_WRITE_INTERVAL_MS: &str = "SEQUIN_MIN_WRITE_INTERVAL_MS";
pub const ENV_ENDPOINT_URL: &str = "SEQUIN_ENDPOINT_URL";

/// Flags that select the target table
#[derive(Args, Clone, Debug, Default)]
pub struct StoreArgs {
    /// DynamoDB table to write to [env: SEQUIN_TABLE]
    #[arg(short, long)]
    pub table: Option<String>,

    /// AWS region, overriding AWS_REGION and profile settings
    #[arg(long)]
    pub region: Option<String>,

    /// Endpoint override, e.g. http://localhost:8000 for DynamoDB Local [env: SEQUIN_ENDPOINT_URL]
    #[arg(long)]
    pub endpoint_url: Option<String>,
}

/// Flags for a load run
#[derive(Args, Clone, Debug, Default)]
pub struct LoadArgs {
    /// Delimited files with a header row, loaded in the given order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Field that receives the row identifier [env: SEQUIN_KEY_FIELD] [default: SNO]
    #[arg(short, long)]
    pub key_field: Option<String>,

    /// Field delimiter: one ASCII character, or "tab" [default: ,]
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Pause between files, in milliseconds [env: SEQUIN_PAUSE_MS] [default: 1000]
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Minimum spacing between writes, in milliseconds [env: SEQUIN_MIN_WRITE_INTERVAL_MS]
    #[arg(long)]
    pub min_write_interval_ms: Option<u64>,

    /// Write items to this NDJSON file instead of DynamoDB
    #[arg(long, value_name = "FILE")]
    pub dry_run: Option<PathBuf>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Flags for a table check
#[derive(Args, Clone, Debug, Default)]
pub struct CheckArgs {
    /// Field the rows will be keyed by [env: SEQUIN_KEY_FIELD] [default: SNO]
    #[arg(short, long)]
    pub key_field: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Where items go
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub table: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<Url>,
}

impl StoreConfig {
    pub fn resolve(args: &StoreArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoint_url = args
            .endpoint_url
            .clone()
            .or_else(|| env(ENV_ENDPOINT_URL))
            .map(|url| Url::parse(&url).with_context(|| format!("Invalid endpoint URL: {}", url)))
            .transpose()?;

        Ok(Self {
            table: args.table.clone().or_else(|| env(ENV_TABLE)),
            region: args.region.clone(),
            endpoint_url,
        })
    }

    /// The table name, which every store operation needs
    pub fn table(&self) -> Result<&str> {
        match self.table.as_deref() {
            Some(table) => Ok(table),
            None => bail!("No table configured; pass --table or set {}", ENV_TABLE),
        }
    }
}

/// Everything a load run needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    pub files: Vec<PathBuf>,
    pub key_field: String,
    pub delimiter: u8,
    pub throttle: Throttle,
    pub store: StoreConfig,
    pub dry_run: Option<PathBuf>,
}

impl LoadConfig {
    /// Resolve flags against the process environment
    pub fn from_env(args: &LoadArgs) -> Result<Self> {
        Self::resolve(args, env_var)
    }

    /// Resolve flags against an arbitrary variable lookup
    pub fn resolve(args: &LoadArgs, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if args.files.is_empty() {
            bail!("No input files given");
        }

        let pause_ms = match args.pause_ms {
            Some(ms) => Some(ms),
            None => parse_millis(&env, ENV_PAUSE_MS)?,
        };
        let min_write_interval_ms = match args.min_write_interval_ms {
            Some(ms) => Some(ms),
            None => parse_millis(&env, ENV_MIN_WRITE_INTERVAL_MS)?,
        };

        let mut throttle = match pause_ms {
            Some(ms) => Throttle::new(Duration::from_millis(ms)),
            None => Throttle::default(),
        };
        if let Some(ms) = min_write_interval_ms {
            throttle = throttle.with_min_write_interval(Duration::from_millis(ms));
        }

        let delimiter = match &args.delimiter {
            Some(delimiter) => parse_delimiter(delimiter)?,
            None => b',',
        };

        Ok(Self {
            files: args.files.clone(),
            key_field: resolve_key_field(args.key_field.as_deref(), &env),
            delimiter,
            throttle,
            store: StoreConfig::resolve(&args.store, &env)?,
            dry_run: args.dry_run.clone(),
        })
    }
}

/// Key field from a flag, then the environment, then the default
pub fn resolve_key_field(flag: Option<&str>, env: impl Fn(&str) -> Option<String>) -> String {
    flag.map(str::to_string)
        .or_else(|| env(ENV_KEY_FIELD))
        .unwrap_or_else(|| DEFAULT_KEY_FIELD.to_string())
}

/// Read a non-blank environment variable
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a delimiter flag into a single byte
///
/// # Example
/// ```
/// use sequin::config::parse_delimiter;
///
/// assert_eq!(parse_delimiter(";").unwrap(), b';');
/// assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
/// assert!(parse_delimiter("::").is_err());
/// ```
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => bail!("Delimiter must be a single ASCII character, got {:?}", value),
    }
}

fn parse_millis(env: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    env(key)
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of milliseconds, got {:?}", key, v))
        })
        .transpose()
}
