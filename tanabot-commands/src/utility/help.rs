use serenity::all::{Context as SerenityContext, CreateMessage};

use tanabot_core::Data;
use tanabot_dispatch::{Args, Command, HandlerFuture, Invocation};
use tanabot_utils::embed::author_embed;

const GREETING: &str = "Hi, I'm TanaBot! DM me to hang up your wishes.";

fn help<'a>(
    ctx: &'a SerenityContext,
    data: &'a Data,
    invocation: &'a Invocation,
    _args: Args,
) -> HandlerFuture<'a> {
    Box::pin(async move {
        let embed = author_embed(&data.config.wave_icon, GREETING);
        invocation
            .channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    })
}

pub fn command() -> Command<SerenityContext> {
    Command::new(&["help"], "Provides help!", "Utilities", help)
}
