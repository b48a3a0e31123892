//! Usage analytics views

use crate::cli::AnalyticsCommand;
use crate::context::AppContext;
use crate::render;
use anyhow::Context;
use task_client::{TaskClient, TaskFilter, TaskSummary};

pub async fn run(ctx: &AppContext, command: AnalyticsCommand) -> anyhow::Result<String> {
    match command {
        AnalyticsCommand::Summary => {
            let tasks = ctx
                .client
                .fetch_tasks(&TaskFilter::default())
                .await
                .context("Failed to load tasks for the summary")?;
            let recorder = ctx.recorder();
            Ok(render::summary(
                &TaskSummary::from_tasks(&tasks),
                &recorder.theme_preference(),
                &recorder.event_stats(),
            ))
        }
        AnalyticsCommand::Events => Ok(render::event_list(&ctx.recorder().events())),
        AnalyticsCommand::Clear => {
            ctx.recorder().clear_events();
            Ok("Cleared recorded events.".to_string())
        }
    }
}
