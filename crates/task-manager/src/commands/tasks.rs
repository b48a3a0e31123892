//! Task list and task mutations

use crate::cli::{CreateArgs, EditArgs, ListArgs, TaskCommand};
use crate::context::AppContext;
use crate::render;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use task_client::{TaskClient, TaskDraft, TaskFilter, TaskPatch};

pub async fn run(ctx: &AppContext, command: TaskCommand) -> anyhow::Result<String> {
    match command {
        TaskCommand::List(args) => list(ctx, args).await,
        TaskCommand::Create(args) => create(ctx, args).await,
        TaskCommand::Edit(args) => edit(ctx, args).await,
        TaskCommand::Toggle { id } => toggle(ctx, id).await,
        TaskCommand::Delete { id } => {
            ctx.client.delete_task(id).await?;
            Ok(format!("Deleted task #{}.", id))
        }
        TaskCommand::Stats => Ok(render::statistics(&ctx.client.fetch_statistics().await?)),
    }
}

async fn list(ctx: &AppContext, args: ListArgs) -> anyhow::Result<String> {
    let filter = TaskFilter {
        status: args.status,
        priority: args.priority,
        tag: args.tag.trim().to_string(),
        search: args.search.trim().to_string(),
    };
    let tasks = ctx.client.fetch_tasks(&filter).await?;
    Ok(render::task_list(&tasks))
}

async fn create(ctx: &AppContext, args: CreateArgs) -> anyhow::Result<String> {
    let mut draft = TaskDraft::new(args.title, args.due);
    draft.description = args.description;
    draft.priority = args.priority;
    for tag in &args.tags {
        draft.add_tag(tag);
    }

    let task = ctx.client.create_task(&draft).await?;
    Ok(format!("Created {}", render::task_line(&task)))
}

/// Build the partial update for `edit`; only given fields are changed
fn edit_patch(args: EditArgs) -> anyhow::Result<TaskPatch> {
    if let Some(due) = &args.due {
        NaiveDate::parse_from_str(due, "%Y-%m-%d")
            .with_context(|| format!("due date '{}' is not a YYYY-MM-DD date", due))?;
    }
    if args.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        bail!("title cannot be empty");
    }

    let tags = if args.clear_tags {
        Some(Vec::new())
    } else if args.tags.is_empty() {
        None
    } else {
        // Same tag rules as the create form
        let mut draft = TaskDraft::default();
        for tag in &args.tags {
            draft.add_tag(tag);
        }
        Some(draft.tags)
    };

    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        due_date: args.due,
        priority: args.priority,
        completed: None,
        tags,
    };
    if patch.is_empty() {
        bail!("nothing to change, pass at least one field to update");
    }
    Ok(patch)
}

async fn edit(ctx: &AppContext, args: EditArgs) -> anyhow::Result<String> {
    let id = args.id;
    let patch = edit_patch(args)?;
    let task = ctx.client.update_task(id, &patch).await?;
    Ok(format!("Updated {}", render::task_line(&task)))
}

async fn toggle(ctx: &AppContext, id: u64) -> anyhow::Result<String> {
    let tasks = ctx.client.fetch_tasks(&TaskFilter::default()).await?;
    let Some(task) = tasks.iter().find(|t| t.id == id) else {
        bail!("task #{} not found", id);
    };

    let updated = ctx.client.update_task(id, &TaskPatch::toggle(task)).await?;
    let verb = if updated.completed {
        "Completed"
    } else {
        "Reopened"
    };
    Ok(format!("{} {}", verb, render::task_line(&updated)))
}
