use super::*;

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(args).expect("arguments should parse")
}

#[test]
fn defaults_resolve_without_sources() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert!(settings.publishing.enabled);
    assert_eq!(settings.publishing.max_urls_per_job, DEFAULT_MAX_URLS_PER_JOB);
    assert!(settings.publishing.collect_time_limit.is_none());
    assert!(settings.database.url.is_none());
    assert_eq!(
        settings.database.max_connections.get(),
        DEFAULT_DB_MAX_CONNECTIONS
    );
    assert_eq!(settings.jobs.max_attempts, 5);
    assert_eq!(settings.jobs.priority, 0);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.publishing.max_urls_per_job = Some(50);
    raw.logging.level = Some("info".to_string());

    let overrides = RunOverrides {
        max_urls_per_job: Some(10),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_run_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.publishing.max_urls_per_job, 10);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = RunOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_run_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn zero_time_limit_is_rejected() {
    let mut raw = RawSettings::default();
    raw.publishing.collect_time_limit_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero limit");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "publishing.collect_time_limit_seconds",
            ..
        }
    ));
}

#[test]
fn time_limit_converts_to_duration() {
    let mut raw = RawSettings::default();
    raw.publishing.collect_time_limit_seconds = Some(90);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.publishing.collect_time_limit,
        Some(Duration::from_secs(90))
    );
}

#[test]
fn blank_database_url_is_ignored() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn zero_max_attempts_is_rejected() {
    let mut raw = RawSettings::default();
    raw.jobs.max_attempts = Some(0);

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn parse_publish_arguments() {
    let args = parse(&[
        "static-publish-queue",
        "publish",
        "--manifest",
        "site.toml",
        "--node",
        "7",
        "--previous-parent",
        "root",
        "--previous-segment",
        "old-name",
        "--max-urls-per-job",
        "20",
        "--dry-run",
    ]);

    match args.command {
        Command::Publish(publish) => {
            assert_eq!(publish.event.manifest, PathBuf::from("site.toml"));
            assert_eq!(publish.event.node, NodeId(7));
            assert!(publish.event.dry_run);
            assert_eq!(publish.event.overrides.max_urls_per_job, Some(20));
            assert_eq!(publish.previous_parent, Some(ParentRef::Root));
            assert_eq!(publish.previous_segment.as_deref(), Some("old-name"));
            assert!(publish.has_previous_address());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_unpublish_arguments() {
    let args = parse(&[
        "static-publish-queue",
        "unpublish",
        "--manifest",
        "site.toml",
        "--node",
        "3",
        "--database-url",
        "postgres://example",
    ]);

    let event = args.command.event();
    assert!(matches!(args.command, Command::Unpublish(_)));
    assert_eq!(event.node, NodeId(3));
    assert!(!event.dry_run);
    assert_eq!(
        event.overrides.database_url.as_deref(),
        Some("postgres://example")
    );
}

#[test]
fn parent_ref_parses_ids_and_root() {
    assert_eq!("root".parse::<ParentRef>(), Ok(ParentRef::Root));
    assert_eq!("12".parse::<ParentRef>(), Ok(ParentRef::Node(NodeId(12))));
    assert!("up".parse::<ParentRef>().is_err());
    assert_eq!(ParentRef::Root.node_id(), None);
}

#[test]
fn node_argument_must_be_numeric() {
    let result = CliArgs::try_parse_from([
        "static-publish-queue",
        "publish",
        "--manifest",
        "site.toml",
        "--node",
        "home",
    ]);
    assert!(result.is_err());
}

#[test]
fn config_file_publishing_section_reaches_engine_config() {
    use std::io::Write;

    use crate::publish::PublishConfig;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp file");
    file.write_all(
        b"[publishing]\nmax_urls_per_job = 20\ncollect_time_limit_seconds = 300\n",
    )
    .expect("write config");
    let path = file.path().to_str().expect("utf-8 path");

    let cli = parse(&[
        "static-publish-queue",
        "--config-file",
        path,
        "publish",
        "--manifest",
        "site.toml",
        "--node",
        "1",
    ]);
    let settings = load(&cli).expect("settings load");
    let config = PublishConfig::from(&settings.publishing);

    assert_eq!(config.max_urls_per_job, 20);
    assert_eq!(config.collect_time_limit, Some(Duration::from_secs(300)));
}
