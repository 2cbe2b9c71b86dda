use dialoguer::Password;
use serde_json::json;

use crate::cli::config::{self, Session};
use crate::cli::utils::{output_success, output_value};
use crate::cli::CliContext;

pub async fn login(ctx: &CliContext, email: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = resolve_password(password, prompt_password)?;

    let mut client = ctx.client()?;
    let response = client.login(email, &password).await?;

    let session = Session::new(
        client.base_url().as_str().trim_end_matches('/').to_string(),
        response.token,
        response.user,
    );
    config::save_session(&session)?;
    tracing::debug!(base_url = %session.base_url, "session saved");

    output_success(
        &ctx.output,
        &format!("Logged in as {} <{}>", session.user.full_name, session.user.email),
        Some(json!({ "user": session.user, "base_url": session.base_url })),
    )
}

pub fn logout(ctx: &CliContext) -> anyhow::Result<()> {
    let message = if config::clear_session()? {
        "Logged out"
    } else {
        "No saved session"
    };
    output_success(&ctx.output, message, None)
}

pub async fn whoami(ctx: &CliContext) -> anyhow::Result<()> {
    let user = ctx.authed_client()?.whoami().await?;
    output_value(&ctx.output, &user, |u| {
        format!("{} <{}> (id {})", u.full_name, u.email, u.id)
    })
}

pub async fn health(ctx: &CliContext) -> anyhow::Result<()> {
    let health = ctx.client()?.health().await?;
    output_value(&ctx.output, &health, |h| {
        format!(
            "status: {}\ndatabase: {}\ntimestamp: {}",
            h.status,
            h.database.as_deref().unwrap_or("unknown"),
            h.timestamp
        )
    })
}

/// Use the `--password` value when given, otherwise ask interactively.
fn resolve_password(
    supplied: Option<String>,
    prompt: impl FnOnce() -> anyhow::Result<String>,
) -> anyhow::Result<String> {
    let password = match supplied.filter(|p| !p.is_empty()) {
        Some(p) => p,
        None => prompt()?,
    };
    if password.is_empty() {
        anyhow::bail!("password is required");
    }
    Ok(password)
}

/// Hidden-input prompt on the terminal; nothing is echoed.
fn prompt_password() -> anyhow::Result<String> {
    let password: String = Password::new().with_prompt("Password").interact()?;
    Ok(password)
}
