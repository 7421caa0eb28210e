use serenity::all::{Context as SerenityContext, CreateMessage, Permissions};

use tanabot_core::Data;
use tanabot_dispatch::{
    Args, Command, HandlerFuture, Invocation, Parameter, ParameterType, Value,
};
use tanabot_utils::embed::author_embed;

const PARAMS: &[Parameter] = &[Parameter::required("on/off", &[ParameterType::Boolean])];

/// Set the workflow toggle to the bound boolean, then report the new state.
fn tanabata<'a>(
    ctx: &'a SerenityContext,
    data: &'a Data,
    invocation: &'a Invocation,
    args: Args,
) -> HandlerFuture<'a> {
    Box::pin(async move {
        let enabled = args
            .positional(0)
            .and_then(Value::as_bool)
            .ok_or_else(|| anyhow::anyhow!("boolean argument missing after binding"))?;
        data.tanabata_enabled.set(enabled);
        send_status(ctx, data, invocation).await
    })
}

fn status<'a>(
    ctx: &'a SerenityContext,
    data: &'a Data,
    invocation: &'a Invocation,
    _args: Args,
) -> HandlerFuture<'a> {
    Box::pin(async move { send_status(ctx, data, invocation).await })
}

async fn send_status(
    ctx: &SerenityContext,
    data: &Data,
    invocation: &Invocation,
) -> anyhow::Result<()> {
    let (icon, text) = if data.tanabata_enabled.get() {
        (&data.config.check_icon, "Tanabata posting enabled!")
    } else {
        (&data.config.x_icon, "Tanabata posting disabled!")
    };

    invocation
        .channel_id
        .send_message(&ctx.http, CreateMessage::new().embed(author_embed(icon, text)))
        .await?;
    Ok(())
}

pub fn command() -> Command<SerenityContext> {
    let status_command = Command::new(
        &["status", "info"],
        "Checks if tanabata posting is enabled or disabled.",
        "Fun",
        status,
    );

    Command {
        subcommands: vec![status_command],
        params: PARAMS,
        required_permissions: Some(Permissions::ADMINISTRATOR),
        ..Command::new(
            &["tanabata", "tb"],
            "Enables/disables tanabata posting.",
            "Fun",
            tanabata,
        )
    }
}
