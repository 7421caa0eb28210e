//! Prefix-command parsing and dispatch.
//!
//! The pipeline runs: tokenize ([`parse::parse_message`]) -> resolve against
//! the alias [`registry::Registry`] -> bind and coerce arguments -> invoke the
//! handler ([`invoke::invoke`]). Failures normalize into
//! [`error::CommandError`] for the reporter at the router boundary.

/// Command and parameter descriptors plus the handler signature.
pub mod command;
/// Per-invocation context and the cached guild directory snapshot.
pub mod context;
/// Token-to-value coercion.
pub mod convert;
/// The dispatch error taxonomy.
pub mod error;
/// Argument binding and handler invocation.
pub mod invoke;
/// Message tokenization into command name, positionals, and flags.
pub mod parse;
/// Alias-to-command registry, validated at load.
pub mod registry;

pub use command::{Command, FlagParameter, Handler, HandlerFuture, Parameter, ParameterType};
pub use context::{
    ChannelEntry, EmojiEntry, GuildDirectory, Invocation, MemberEntry, RoleEntry,
};
pub use convert::Value;
pub use error::{CommandError, DefinedError, RegistryError};
pub use invoke::{Args, invoke};
pub use parse::{ParsedCommand, parse_message};
pub use registry::Registry;
