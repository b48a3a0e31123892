//! Command-line interface definition

use clap::{Args, Parser, Subcommand};
use task_client::{Priority, StatusFilter};
use task_config::Theme;

/// Manage your tasks from the terminal
#[derive(Debug, Parser)]
#[command(name = "task-manager", version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API base URL (overrides config file and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TASK_MANAGER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Password confirmation
        #[arg(long)]
        password2: String,
    },

    /// Forget the stored session
    Logout,

    /// Work with tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },

    /// Inspect locally recorded usage
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List tasks, optionally filtered
    List(ListArgs),

    /// Create a task
    Create(CreateArgs),

    /// Change fields of a task
    Edit(EditArgs),

    /// Flip the completion state of a task
    Toggle { id: u64 },

    Delete { id: u64 },

    /// Server-side statistics
    Stats,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// all, pending or completed
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// Only tasks of this priority
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Only tasks carrying this tag
    #[arg(long, default_value = "")]
    pub tag: String,

    /// Free-text search in title and description
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: String,

    #[arg(long, default_value = "medium")]
    pub priority: Priority,

    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: u64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub priority: Option<Priority>,

    /// Replace the tags (repeatable)
    #[arg(long = "tag", conflicts_with = "clear_tags")]
    pub tags: Vec<String>,

    /// Remove all tags
    #[arg(long)]
    pub clear_tags: bool,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    Show,
    /// Switch between dark and light
    Toggle,
    Set { theme: Theme },
}

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// Task and usage summary
    Summary,
    /// Recorded events, oldest first
    Events,
    /// Delete all recorded events
    Clear,
}
