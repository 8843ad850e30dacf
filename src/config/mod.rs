//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::types::NodeId;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "static-publish-queue";
const ENV_PREFIX: &str = "STATIC_PUBLISH";
const DEFAULT_MAX_URLS_PER_JOB: usize = 0;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 4;
const DEFAULT_JOB_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_JOB_PRIORITY: i32 = 0;

/// Command-line arguments for the `static-publish-queue` binary.
#[derive(Debug, Parser)]
#[command(
    name = "static-publish-queue",
    version,
    about = "Queue static cache jobs for content lifecycle events"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "STATIC_PUBLISH_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Queue jobs for a node that was just published (or moved).
    Publish(PublishArgs),
    /// Queue jobs for a node that is being unpublished.
    Unpublish(UnpublishArgs),
}

impl Command {
    pub fn event(&self) -> &EventArgs {
        match self {
            Command::Publish(args) => &args.event,
            Command::Unpublish(args) => &args.event,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct EventArgs {
    /// Site manifest describing the content tree.
    #[arg(long, value_name = "PATH")]
    pub manifest: PathBuf,

    /// Node the event applies to.
    #[arg(long, value_name = "ID")]
    pub node: NodeId,

    /// Print the queued jobs as JSON instead of pushing them to the database.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub dry_run: bool,

    #[command(flatten)]
    pub overrides: RunOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct PublishArgs {
    #[command(flatten)]
    pub event: EventArgs,

    /// Parent the node had before this publish (`root` for the top level).
    #[arg(long = "previous-parent", value_name = "ID|root")]
    pub previous_parent: Option<ParentRef>,

    /// URL segment the node had before this publish.
    #[arg(long = "previous-segment", value_name = "SEGMENT")]
    pub previous_segment: Option<String>,
}

impl PublishArgs {
    /// True when the previous address differs from the manifest in any way.
    pub fn has_previous_address(&self) -> bool {
        self.previous_parent.is_some() || self.previous_segment.is_some()
    }
}

#[derive(Debug, Args, Clone)]
pub struct UnpublishArgs {
    #[command(flatten)]
    pub event: EventArgs,
}

/// Parent reference accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Node(NodeId),
}

impl ParentRef {
    pub fn node_id(self) -> Option<NodeId> {
        match self {
            ParentRef::Root => None,
            ParentRef::Node(id) => Some(id),
        }
    }
}

impl FromStr for ParentRef {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("root") {
            return Ok(ParentRef::Root);
        }
        value
            .parse::<NodeId>()
            .map(ParentRef::Node)
            .map_err(|err| format!("expected a node id or `root`: {err}"))
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct RunOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the maximum number of URLs per update job (0 = unbounded).
    #[arg(long = "max-urls-per-job", value_name = "COUNT")]
    pub max_urls_per_job: Option<usize>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub publishing: PublishingSettings,
    pub database: DatabaseSettings,
    pub jobs: JobsSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct PublishingSettings {
    pub enabled: bool,
    pub max_urls_per_job: usize,
    pub collect_memory_limit_bytes: Option<u64>,
    pub collect_time_limit: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct JobsSettings {
    pub max_attempts: i32,
    pub priority: i32,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_run_overrides(&cli.command.event().overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    publishing: RawPublishingSettings,
    database: RawDatabaseSettings,
    jobs: RawJobsSettings,
}

impl RawSettings {
    fn apply_run_overrides(&mut self, overrides: &RunOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(limit) = overrides.max_urls_per_job {
            self.publishing.max_urls_per_job = Some(limit);
        }
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            logging: build_logging_settings(raw.logging)?,
            publishing: build_publishing_settings(raw.publishing)?,
            database: build_database_settings(raw.database)?,
            jobs: build_jobs_settings(raw.jobs)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_publishing_settings(
    publishing: RawPublishingSettings,
) -> Result<PublishingSettings, LoadError> {
    let collect_memory_limit_bytes = match publishing.collect_memory_limit_bytes {
        Some(0) => {
            return Err(LoadError::invalid(
                "publishing.collect_memory_limit_bytes",
                "must be greater than zero",
            ));
        }
        other => other,
    };

    let collect_time_limit = match publishing.collect_time_limit_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "publishing.collect_time_limit_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(PublishingSettings {
        enabled: publishing.enabled.unwrap_or(true),
        max_urls_per_job: publishing
            .max_urls_per_job
            .unwrap_or(DEFAULT_MAX_URLS_PER_JOB),
        collect_memory_limit_bytes,
        collect_time_limit,
    })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let max_connections = non_zero_u32(
        database
            .max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS.into()),
        "database.max_connections",
    )?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_jobs_settings(jobs: RawJobsSettings) -> Result<JobsSettings, LoadError> {
    let attempts = non_zero_u32(
        jobs.max_attempts
            .unwrap_or(DEFAULT_JOB_MAX_ATTEMPTS.into()),
        "jobs.max_attempts",
    )?;
    let max_attempts = i32::try_from(attempts.get())
        .map_err(|_| LoadError::invalid("jobs.max_attempts", "value exceeds supported range"))?;

    Ok(JobsSettings {
        max_attempts,
        priority: jobs.priority.unwrap_or(DEFAULT_JOB_PRIORITY),
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPublishingSettings {
    enabled: Option<bool>,
    max_urls_per_job: Option<usize>,
    collect_memory_limit_bytes: Option<u64>,
    collect_time_limit_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawJobsSettings {
    max_attempts: Option<u64>,
    priority: Option<i32>,
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

#[cfg(test)]
mod tests;
