//! Login, registration and logout

use crate::context::AppContext;
use anyhow::Context;
use task_client::{Credentials, Registration, TaskClient};

pub async fn login(ctx: &AppContext, email: String, password: String) -> anyhow::Result<String> {
    let credentials = Credentials { email, password };
    ctx.client
        .login(&credentials)
        .await
        .context("Login failed")?;
    Ok(format!("Logged in as {}.", credentials.email))
}

pub async fn register(
    ctx: &AppContext,
    email: String,
    username: String,
    password: String,
    password2: String,
) -> anyhow::Result<String> {
    let registration = Registration {
        email,
        username,
        password,
        password2,
    };
    ctx.client
        .register(&registration)
        .await
        .context("Registration failed")?;
    log::info!("Registered account {}", registration.username);
    Ok("Account created. Run `task-manager login` to sign in.".to_string())
}

pub fn logout(ctx: &AppContext) -> String {
    ctx.gateway.end_session();
    "Logged out.".to_string()
}
