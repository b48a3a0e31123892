//! Command handlers
//!
//! Each handler performs one user action against the [`AppContext`] and
//! returns the text to print.

mod analytics;
mod auth;
mod tasks;
mod theme;

use crate::cli::Command;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Login { email, password } => auth::login(ctx, email, password).await,
        Command::Register {
            email,
            username,
            password,
            password2,
        } => auth::register(ctx, email, username, password, password2).await,
        Command::Logout => Ok(auth::logout(ctx)),
        Command::Tasks { command } => tasks::run(ctx, command).await,
        Command::Theme { command } => Ok(theme::run(ctx, command)),
        Command::Analytics { command } => analytics::run(ctx, command).await,
    }
}
