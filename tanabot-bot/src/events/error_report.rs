use serenity::all::{
    ChannelId, Context, CreateEmbed, CreateEmbedFooter, CreateMessage,
};
use tracing::{debug, error};

use tanabot_core::Data;
use tanabot_dispatch::{CommandError, ParameterType};
use tanabot_utils::embed::footer_embed;
use tanabot_utils::permissions::permission_names;

/// Discord caps embed descriptions at 2000 characters; leave room for the
/// code fence.
const TRACE_LIMIT: usize = 1950;

const SUPPORT_FOOTER: &str = "Please contact pandaxtc#7777 for support.";

/// Render a typed command failure as a user-facing reply.
///
/// Invoke failures get a titled report embed carrying the cause's debug
/// chain; everything else gets the warning footer embed.
pub async fn report(ctx: &Context, data: &Data, channel_id: ChannelId, err: &CommandError) {
    if let CommandError::PermissionDenied { required, actual } = err {
        let missing = permission_names(*required & !*actual);
        debug!(?missing, "permission check failed");
    }

    let reply = match err {
        CommandError::Invoke { command, source } => {
            error!(%command, ?source, "command handler failed");

            let trace = format!("```\n{}\n```", truncate(&format!("{source:?}"), TRACE_LIMIT));
            let embed = CreateEmbed::new()
                .title("Something's gone wrong!")
                .description(trace)
                .footer(
                    CreateEmbedFooter::new(SUPPORT_FOOTER)
                        .icon_url(&data.config.warning_icon),
                );
            CreateMessage::new().embed(embed)
        }
        other => {
            let embed = footer_embed(&data.config.warning_icon, error_text(other));
            CreateMessage::new().embed(embed)
        }
    };

    if let Err(send_err) = channel_id.send_message(&ctx.http, reply).await {
        error!(?send_err, "failed to deliver error reply");
    }
}

/// The user-facing message for every condition except `Invoke`.
fn error_text(err: &CommandError) -> String {
    match err {
        CommandError::Defined(defined) => defined.0.clone(),
        CommandError::ArgumentType { parameter, .. } => format!(
            "Parameter {} should be type {}!",
            parameter.name,
            or_join(parameter.types)
        ),
        CommandError::MissingArgument { parameter, .. } => format!(
            "Parameter {} <{}> is missing!",
            parameter.name,
            comma_join(parameter.types)
        ),
        CommandError::IncompleteArgumentSet { parameter, .. } => format!(
            "Repeated parameter {} <{}> is missing",
            parameter.name,
            comma_join(parameter.types)
        ),
        CommandError::NotFound { name } => format!("Command {name} not found!"),
        CommandError::NotAllowedInDms { name } => {
            format!("Command {name} cannot be used in DMs!")
        }
        CommandError::PermissionDenied { .. } => "Permission denied.".to_owned(),
        CommandError::Invoke { .. } => "Something's gone wrong!".to_owned(),
    }
}

/// `a`, `a or b`, `a, b or c`.
fn or_join(types: &[ParameterType]) -> String {
    let names: Vec<String> = types.iter().map(ToString::to_string).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn comma_join(types: &[ParameterType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
