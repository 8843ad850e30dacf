//! Replays a lifecycle event from the command line against a site manifest.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::{
    config::{CliArgs, Command, Settings},
    content::ContentTree,
    infra::db::{self, PostgresJobQueue},
    publish::{ContentNode, FlushReport, PublishConfig, PublishEngine},
};

use super::{
    error::AppError,
    jobs::{InMemoryJobQueue, JobHandle},
};

#[derive(Debug, Serialize)]
struct QueuedSummary<'a> {
    update_jobs: usize,
    delete_jobs: usize,
    handles: &'a [JobHandle],
}

/// Run the requested command and return what should be printed to stdout.
///
/// Dry runs print the payloads recorded by an in-memory queue; real runs push
/// to Postgres and print the assigned job ids.
pub async fn execute(args: &CliArgs, settings: &Settings) -> Result<String, AppError> {
    let event = args.command.event();
    let tree = ContentTree::load(&event.manifest).await?;
    let config = PublishConfig::from(&settings.publishing);

    if event.dry_run {
        let queue = Arc::new(InMemoryJobQueue::new());
        let engine = PublishEngine::with_queue(config, queue.clone());
        run_event(&args.command, &tree, &engine).await?;
        return Ok(serde_json::to_string_pretty(&queue.payloads())?);
    }

    let pool = db::connect(&settings.database).await?;
    let queue = Arc::new(PostgresJobQueue::new(pool, &settings.jobs));
    let engine = PublishEngine::with_queue(config, queue);
    let report = run_event(&args.command, &tree, &engine).await?;

    Ok(serde_json::to_string_pretty(&QueuedSummary {
        update_jobs: report.update_jobs,
        delete_jobs: report.delete_jobs,
        handles: &report.handles,
    })?)
}

/// Drive the lifecycle hooks for `command` against `tree`.
pub async fn run_event(
    command: &Command,
    tree: &ContentTree,
    engine: &PublishEngine,
) -> Result<FlushReport, AppError> {
    let report = match command {
        Command::Publish(args) => {
            let node = tree.node(args.event.node)?;
            if args.has_previous_address() {
                let parent = match args.previous_parent {
                    Some(parent) => parent.node_id(),
                    None => node.parent_id(),
                };
                let previous = tree.relocated(
                    node.id(),
                    parent,
                    args.previous_segment.as_deref(),
                )?;
                let original = previous.node(node.id())?;
                engine
                    .handler_for(&node)
                    .on_after_publish(Some(&original))
                    .await?
            } else {
                engine.handler_for(&node).on_after_publish(None).await?
            }
        }
        Command::Unpublish(args) => {
            let node = tree.node(args.event.node)?;
            let mut handler = engine.handler_for(&node);
            handler.on_before_unpublish().await?;
            handler.on_after_unpublish().await?
        }
    };

    info!(
        target = "application::runner",
        node = %command.event().node,
        jobs = report.job_count(),
        "lifecycle event processed"
    );

    Ok(report)
}
