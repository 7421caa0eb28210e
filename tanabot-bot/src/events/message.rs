use serenity::all::{Context, Message};
use tracing::{debug, error, info};

use tanabot_core::Data;
use tanabot_dispatch::{CommandError, DefinedError, Registry, invoke, parse_message};

use crate::events::{error_report, tanabata};
use crate::snapshot;

/// Entry point for every inbound message. The tanabata workflow and the
/// command pipeline run in sequence and fail independently.
pub async fn handle_message(
    ctx: &Context,
    data: &Data,
    registry: &Registry<Context>,
    message: &Message,
) {
    if message.author.bot {
        return;
    }

    if let Err(err) = tanabata::handle_submission(ctx, data, message).await {
        match err.downcast::<DefinedError>() {
            Ok(defined) => {
                let rejection = CommandError::Defined(defined);
                error_report::report(ctx, data, message.channel_id, &rejection).await;
            }
            Err(other) => {
                // Unexpected workflow failures are surfaced loudly, with no
                // reply, and abort handling of this message.
                error!(?other, "tanabata workflow failed");
                return;
            }
        }
    }

    let Some(parsed) = parse_message(&message.content, &data.config.prefix) else {
        return;
    };

    // No registered command carries this alias; stay silent, the user most
    // likely typed something that just looks like a command.
    let Some(command) = registry.resolve(&parsed.name) else {
        debug!(name = %parsed.name, "no command matched");
        return;
    };

    let invocation = snapshot::build_invocation(ctx, message, parsed.name);
    info!(command = command.name(), "invoking command");

    if let Err(err) = invoke(
        ctx,
        data,
        &invocation,
        command,
        parsed.args,
        &parsed.flags,
    )
    .await
    {
        error_report::report(ctx, data, invocation.channel_id, &err).await;
    }
}
