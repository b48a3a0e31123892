use clap::Parser;
use std::process::ExitCode;
use task_client::SessionEvent;
use task_config::AppConfig;

mod cli;
mod commands;
mod context;
mod logger;
mod render;

use cli::{Cli, Command};
use context::AppContext;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so env-backed arguments see it
    dotenvy::dotenv().ok();

    match logger::init() {
        Ok(path) => log::info!("Starting task-manager, logging to {:?}", path),
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let ctx = match AppContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", render::error_message(&e));
            return ExitCode::FAILURE;
        }
    };
    let mut session = ctx.gateway.subscribe();
    // A rejected login is not an expired session
    let signing_in = matches!(cli.command, Command::Login { .. } | Command::Register { .. });

    let result = commands::run(&ctx, cli.command).await;

    let code = match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Command failed: {:#}", e);
            eprintln!("Error: {}", render::error_message(&e));

            let session_ended = !signing_in
                && session.has_changed().unwrap_or(false)
                && *session.borrow_and_update() == SessionEvent::LoginRequired;
            if session_ended {
                eprintln!("Your session has ended. Run `task-manager login` to sign in again.");
            }
            ExitCode::FAILURE
        }
    };

    log::info!("Exiting task-manager");
    code
}
