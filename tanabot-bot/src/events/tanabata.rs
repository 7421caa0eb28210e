use std::path::Path;

use rand::seq::SliceRandom;
use serenity::all::{
    Context, CreateAttachment, CreateEmbed, CreateMessage, Message, ReactionType,
    Timestamp,
};
use tracing::info;

use tanabot_core::Data;
use tanabot_dispatch::DefinedError;
use tanabot_utils::embed::{AUTHOR_EMBED_COLOR, author_embed_with_color};

const CONFIRM: &str = "✅";
const CANCEL: &str = "⛔";

const PREVIEW_PROMPT: &str =
    "This is a preview of your message! React with ✅ to send it, or ⛔ to cancel.";
const DONE_TEXT: &str = "Done! If you'd like to send another wish, send another message.";

/// Run the submission workflow for one direct message.
///
/// Received -> logged internally -> preview sent -> awaiting vote ->
/// forwarded, cancelled, or timed out. Rejections the sender should read
/// come back as [`DefinedError`]; anything else is an unexpected failure.
pub async fn handle_submission(
    ctx: &Context,
    data: &Data,
    message: &Message,
) -> anyhow::Result<()> {
    // DMs only; bot authors are filtered at the router.
    if message.guild_id.is_some() {
        return Ok(());
    }

    if !data.tanabata_enabled.get() {
        return Err(
            DefinedError::new("Tanabata posting is not enabled. Try again later!").into(),
        );
    }

    info!(author = %message.author.id, "new tanabata wish");

    let log_embed = CreateEmbed::new()
        .description(format!(
            "**New tanabata wish from <@{}>**\n{}",
            message.author.id, message.content
        ))
        .color(AUTHOR_EMBED_COLOR)
        .timestamp(Timestamp::now());
    data.config
        .tanabata_log_channel
        .send_message(&ctx.http, CreateMessage::new().embed(log_embed))
        .await?;

    let file_name = pick_attachment(&data.config.tanabata_dir).await?;
    let file_path = data.config.tanabata_dir.join(&file_name);
    let embed = author_embed_with_color(
        &format!("attachment://{file_name}"),
        &message.content,
        color_from_file_name(&file_name),
    );

    let preview = CreateMessage::new()
        .content(PREVIEW_PROMPT)
        .embed(embed.clone())
        .add_file(CreateAttachment::path(&file_path).await?);
    let confirmation = message.channel_id.send_message(&ctx.http, preview).await?;

    confirmation
        .react(&ctx.http, ReactionType::Unicode(CONFIRM.to_owned()))
        .await?;
    confirmation
        .react(&ctx.http, ReactionType::Unicode(CANCEL.to_owned()))
        .await?;

    let bot_id = ctx.cache.current_user().id;
    let reaction = confirmation
        .await_reaction(&ctx.shard)
        .timeout(data.config.reaction_timeout)
        .filter(move |reaction| {
            let qualifying = matches!(
                &reaction.emoji,
                ReactionType::Unicode(name) if name == CONFIRM || name == CANCEL
            );
            qualifying && reaction.user_id != Some(bot_id)
        })
        .await;

    let Some(reaction) = reaction else {
        return Err(DefinedError::new("Timed out! Please try again.").into());
    };

    if matches!(&reaction.emoji, ReactionType::Unicode(name) if name == CANCEL) {
        return Err(DefinedError::new("Cancelled.").into());
    }

    // Forward the identical embed to the public channel.
    let forward = CreateMessage::new()
        .embed(embed)
        .add_file(CreateAttachment::path(&file_path).await?);
    data.config
        .tanabata_channel
        .send_message(&ctx.http, forward)
        .await?;

    message.channel_id.say(&ctx.http, DONE_TEXT).await?;
    Ok(())
}

/// Pick one file uniformly at random from the attachment directory.
async fn pick_attachment(dir: &Path) -> anyhow::Result<String> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("tanabata attachment directory is empty"))
}

/// Embed color from the file name's leading hex digits (attachments are
/// named after their dominant color, e.g. `96c731.png`).
fn color_from_file_name(name: &str) -> u32 {
    let hex: String = name
        .chars()
        .take_while(|ch| ch.is_ascii_hexdigit())
        .collect();
    u32::from_str_radix(&hex, 16).unwrap_or(AUTHOR_EMBED_COLOR)
}
