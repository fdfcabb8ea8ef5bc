//! Bot commands.
//!
//! # Responsibilities
//! - Define the restart command on both the prefix and slash surfaces
//! - Turn permission rejections into a visible reply instead of silence
//!
//! # Design Decisions
//! - Restart does not exec a new process; it drains the gateway and exits
//!   with the restart status so the supervisor relaunches a clean process
//! - Slash rejections are ephemeral; prefix rejections fall back to a
//!   plain reply

use crate::discord::{Context, Data, Error};

/// Restart the bot. Requires administrator permissions.
#[poise::command(prefix_command, slash_command, required_permissions = "ADMINISTRATOR")]
pub async fn restart(ctx: Context<'_>) -> Result<(), Error> {
    tracing::info!(invoked_by = %ctx.author().name, "Restart command invoked");

    if let Err(e) = ctx.say("Restarting... 🔄").await {
        tracing::warn!(error = %e, "Could not acknowledge restart command");
    }

    // The gateway's shutdown watcher picks this up and drains the shards.
    ctx.data().shutdown.trigger_restart();

    Ok(())
}

/// Framework-level error handler.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::MissingUserPermissions {
            ctx,
            missing_permissions,
            ..
        } => {
            tracing::debug!(
                user = %ctx.author().name,
                command = %ctx.command().name,
                ?missing_permissions,
                "Command rejected: missing permissions"
            );
            let reply = poise::CreateReply::default()
                .content("❌ Administrator permissions are required.")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                tracing::warn!(error = %e, "Could not deliver permission rejection");
            }
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().name,
                error = %error,
                "Command failed"
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!(error = %e, "Error while handling command error");
            }
        }
    }
}
