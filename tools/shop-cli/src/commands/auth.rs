//! Sign-in commands.

use anyhow::{Context as _, Result};
use dialoguer::Password;
use serde_json::json;
use shop_auth::SessionLookup;

use super::{LoginArgs, WhoamiArgs};
use crate::context::Context;

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let spinner = ctx.output.spinner("Signing in...");
    let result = ctx.api()?.login(&args.email, &password).await;
    spinner.finish_and_clear();

    let session = result?;
    ctx.save_session(&session)?;

    if ctx.output.is_json() {
        ctx.output.json(&session.user);
    } else {
        ctx.output.success(&format!(
            "Signed in as {}",
            session.user.display_name()
        ));
    }
    Ok(())
}

/// Run the logout command.
pub async fn logout(ctx: &Context) -> Result<()> {
    ctx.clear_session()?;
    ctx.output.success("Signed out");
    Ok(())
}

/// Run the whoami command.
pub async fn whoami(args: WhoamiArgs, ctx: &Context) -> Result<()> {
    let Some(session) = ctx.session()? else {
        if ctx.output.is_json() {
            ctx.output.json(&json!({ "signedIn": false }));
        } else {
            ctx.output.info("Not signed in");
        }
        return Ok(());
    };

    let accepted = if args.check {
        let api = ctx.api()?;
        let current = api
            .current_session()
            .await
            .context("Failed to reach the backend")?;
        Some(current.is_some())
    } else {
        None
    };

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "signedIn": true,
            "user": session.user,
            "expiresAt": session.expires_at,
            "accepted": accepted,
        }));
        return Ok(());
    }

    ctx.output.header("Signed In");
    ctx.output.kv("name", session.user.display_name());
    ctx.output.kv("email", &session.user.email);
    ctx.output.kv("role", session.user.role().as_str());
    ctx.output.kv(
        "expires",
        &session.expires_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    match accepted {
        Some(true) => ctx.output.success("Backend accepts the session"),
        Some(false) => ctx
            .output
            .warn("Backend no longer accepts the session; sign in again"),
        None => {}
    }
    Ok(())
}
