use serenity::all::{ChannelId, EmojiId, GuildId, MessageId, Permissions, RoleId, UserId};

/// A guild member as seen in the cache, with effective permissions resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberEntry {
    pub user_id: UserId,
    pub username: String,
    pub nickname: Option<String>,
    pub permissions: Permissions,
}

/// A cached text channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelEntry {
    pub channel_id: ChannelId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoleEntry {
    pub role_id: RoleId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmojiEntry {
    pub emoji_id: EmojiId,
    pub name: String,
}

/// Snapshot of the guild's cached directory taken when a message arrives.
///
/// Argument coercion resolves member/channel/role/emoji tokens against this
/// snapshot rather than the live cache, so the pipeline stays pure and
/// testable without a gateway connection.
#[derive(Clone, Debug, PartialEq)]
pub struct GuildDirectory {
    pub guild_id: GuildId,
    pub members: Vec<MemberEntry>,
    pub channels: Vec<ChannelEntry>,
    pub roles: Vec<RoleEntry>,
    pub emojis: Vec<EmojiEntry>,
}

impl GuildDirectory {
    /// An empty directory for the given guild.
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            members: Vec::new(),
            channels: Vec::new(),
            roles: Vec::new(),
            emojis: Vec::new(),
        }
    }

    pub fn member_by_id(&self, user_id: UserId) -> Option<&MemberEntry> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Prefix match against username or nickname, first hit wins.
    pub fn member_by_name_prefix(&self, prefix: &str) -> Option<&MemberEntry> {
        self.members.iter().find(|m| {
            m.username.starts_with(prefix)
                || m.nickname
                    .as_deref()
                    .is_some_and(|nick| nick.starts_with(prefix))
        })
    }

    pub fn channel_by_id(&self, channel_id: ChannelId) -> Option<&ChannelEntry> {
        self.channels.iter().find(|c| c.channel_id == channel_id)
    }

    /// Exact name match; the snapshot only holds text channels.
    pub fn channel_by_name(&self, name: &str) -> Option<&ChannelEntry> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn role_by_id(&self, role_id: RoleId) -> Option<&RoleEntry> {
        self.roles.iter().find(|r| r.role_id == role_id)
    }

    pub fn role_by_name_prefix(&self, prefix: &str) -> Option<&RoleEntry> {
        self.roles.iter().find(|r| r.name.starts_with(prefix))
    }

    pub fn emoji_by_id(&self, emoji_id: EmojiId) -> Option<&EmojiEntry> {
        self.emojis.iter().find(|e| e.emoji_id == emoji_id)
    }
}

/// Per-invocation context: constructed once per dispatch, read-only after.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub message_id: MessageId,
    pub author_id: UserId,
    /// Channel the reply goes to.
    pub channel_id: ChannelId,
    /// The alias text the command was invoked by.
    pub invoking_name: String,
    /// `None` for direct messages.
    pub guild: Option<GuildDirectory>,
    /// The invoking member, when the message came from a guild.
    pub invoker: Option<MemberEntry>,
}

impl Invocation {
    pub fn in_guild(&self) -> bool {
        self.guild.is_some()
    }
}
