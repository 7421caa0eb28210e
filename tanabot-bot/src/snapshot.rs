use serenity::all::{ChannelType, Context, Message, Permissions};

use tanabot_dispatch::{
    ChannelEntry, EmojiEntry, GuildDirectory, Invocation, MemberEntry, RoleEntry,
};
use tanabot_utils::permissions::resolve_member_permissions;

/// Build the per-dispatch invocation context from an inbound message.
///
/// For guild messages this snapshots the cached directory (members with
/// resolved permissions, text channels, roles, emojis) inside a single cache
/// borrow, so nothing holds a cache guard across an await point. Direct
/// messages yield no directory and no invoker.
pub fn build_invocation(ctx: &Context, message: &Message, invoking_name: String) -> Invocation {
    let mut directory = None;
    let mut invoker = None;

    if let Some(guild_id) = message.guild_id
        && let Some(guild) = guild_id.to_guild_cached(&ctx.cache)
    {
        let members = guild
            .members
            .values()
            .map(|member| MemberEntry {
                user_id: member.user.id,
                username: member.user.name.clone(),
                nickname: member.nick.clone(),
                permissions: resolve_member_permissions(&guild, member.user.id)
                    .unwrap_or(Permissions::empty()),
            })
            .collect();

        let channels = guild
            .channels
            .values()
            .filter(|channel| channel.kind == ChannelType::Text)
            .map(|channel| ChannelEntry {
                channel_id: channel.id,
                name: channel.name.clone(),
            })
            .collect();

        let roles = guild
            .roles
            .values()
            .map(|role| RoleEntry {
                role_id: role.id,
                name: role.name.clone(),
            })
            .collect();

        let emojis = guild
            .emojis
            .values()
            .map(|emoji| EmojiEntry {
                emoji_id: emoji.id,
                name: emoji.name.clone(),
            })
            .collect();

        let snapshot = GuildDirectory {
            guild_id,
            members,
            channels,
            roles,
            emojis,
        };
        invoker = snapshot.member_by_id(message.author.id).cloned();
        directory = Some(snapshot);
    }

    Invocation {
        message_id: message.id,
        author_id: message.author.id,
        channel_id: message.channel_id,
        invoking_name,
        guild: directory,
        invoker,
    }
}
