use serenity::all::{ChannelId, EmojiId, RoleId, UserId};

use crate::command::ParameterType;
use crate::context::{ChannelEntry, EmojiEntry, GuildDirectory, MemberEntry, RoleEntry};

const TRUTHY: [&str; 4] = ["yes", "true", "on", "enable"];
const FALSY: [&str; 4] = ["no", "false", "off", "disable"];

/// A coerced argument value as handed to a command handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An optional parameter that received no argument.
    Absent,
    Bool(bool),
    Number(f64),
    Str(String),
    Member(MemberEntry),
    Channel(ChannelEntry),
    Role(RoleEntry),
    Emoji(EmojiEntry),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_member(&self) -> Option<&MemberEntry> {
        match self {
            Value::Member(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&ChannelEntry> {
        match self {
            Value::Channel(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<&RoleEntry> {
        match self {
            Value::Role(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_emoji(&self) -> Option<&EmojiEntry> {
        match self {
            Value::Emoji(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Match a trimmed token against the fixed truthy/falsy sets. Case-sensitive.
pub fn parse_boolean(text: &str) -> Option<bool> {
    let text = text.trim();
    if TRUTHY.contains(&text) {
        return Some(true);
    }
    if FALSY.contains(&text) {
        return Some(false);
    }
    None
}

/// Strip a mention wrapper like `<@123>`, `<@!123>`, `<#123>`, or `<@&123>`
/// and parse the inner id.
fn mention_id(token: &str, open: &str) -> Option<u64> {
    let inner = token.strip_prefix(open)?.strip_suffix('>')?;
    let inner = inner.strip_prefix('!').unwrap_or(inner);
    inner.parse::<u64>().ok()
}

/// Parse the id out of custom emoji syntax `<:name:123>`.
fn emoji_mention_id(token: &str) -> Option<u64> {
    let inner = token.strip_prefix("<:")?.strip_suffix('>')?;
    let (_name, id) = inner.rsplit_once(':')?;
    id.parse::<u64>().ok()
}

fn convert_member(token: &str, guild: &GuildDirectory) -> Option<MemberEntry> {
    if let Some(id) = mention_id(token, "<@") {
        return guild.member_by_id(UserId::new(id)).cloned();
    }
    guild.member_by_name_prefix(token).cloned()
}

fn convert_channel(token: &str, guild: &GuildDirectory) -> Option<ChannelEntry> {
    if let Some(id) = mention_id(token, "<#") {
        return guild.channel_by_id(ChannelId::new(id)).cloned();
    }
    guild.channel_by_name(token).cloned()
}

fn convert_role(token: &str, guild: &GuildDirectory) -> Option<RoleEntry> {
    if let Some(id) = mention_id(token, "<@&") {
        return guild.role_by_id(RoleId::new(id)).cloned();
    }
    guild.role_by_name_prefix(token).cloned()
}

fn convert_emoji(token: &str, guild: &GuildDirectory) -> Option<EmojiEntry> {
    let id = emoji_mention_id(token).or_else(|| token.parse::<u64>().ok())?;
    guild.emoji_by_id(EmojiId::new(id)).cloned()
}

/// Try to coerce a raw token into one semantic type.
///
/// Entity lookups need a guild directory; without one they are "not found".
/// Booleans are always resolved when the token matches either set, `false`
/// included. A numeric token that parses to NaN is "not found", but zero is
/// a valid number. Strings always accept.
pub fn convert_token(
    token: &str,
    ty: ParameterType,
    guild: Option<&GuildDirectory>,
) -> Option<Value> {
    match ty {
        ParameterType::Member => guild
            .filter(|_| !token.is_empty())
            .and_then(|g| convert_member(token, g))
            .map(Value::Member),
        ParameterType::TextChannel => guild
            .filter(|_| !token.is_empty())
            .and_then(|g| convert_channel(token, g))
            .map(Value::Channel),
        ParameterType::Role => guild
            .filter(|_| !token.is_empty())
            .and_then(|g| convert_role(token, g))
            .map(Value::Role),
        ParameterType::Emoji => guild
            .filter(|_| !token.is_empty())
            .and_then(|g| convert_emoji(token, g))
            .map(Value::Emoji),
        ParameterType::Number => token
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .map(Value::Number),
        ParameterType::Boolean => parse_boolean(token).map(Value::Bool),
        ParameterType::String => Some(Value::Str(token.to_owned())),
    }
}
