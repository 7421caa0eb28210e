use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serenity::all::Permissions;

use tanabot_core::Data;

use crate::context::Invocation;
use crate::invoke::Args;

/// Semantic types a raw argument token can be coerced into.
///
/// Listed on a [`Parameter`] in priority order; the first type that yields a
/// confident conversion wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Member,
    TextChannel,
    Role,
    Emoji,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Member => "member",
            ParameterType::TextChannel => "text channel",
            ParameterType::Role => "role",
            ParameterType::Emoji => "emoji",
        };
        f.write_str(label)
    }
}

/// A declared positional parameter.
///
/// Optional parameters must come after all required ones; the registry
/// rejects descriptors that violate this at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub types: &'static [ParameterType],
    pub optional: bool,
}

impl Parameter {
    pub const fn required(name: &'static str, types: &'static [ParameterType]) -> Self {
        Self {
            name,
            types,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str, types: &'static [ParameterType]) -> Self {
        Self {
            name,
            types,
            optional: true,
        }
    }
}

/// A parameter bound by flag key (`-f value`) instead of position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagParameter {
    pub flag: &'static str,
    pub parameter: Parameter,
}

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Command handler entry point.
///
/// `H` is the platform handle handed through to the handler body (the
/// serenity context in production, a unit type in tests).
pub type Handler<H> = for<'a> fn(&'a H, &'a Data, &'a Invocation, Args) -> HandlerFuture<'a>;

/// Immutable command descriptor, registered once at startup.
#[derive(Debug)]
pub struct Command<H> {
    /// Interchangeable invocation names; the first is the display name.
    pub names: &'static [&'static str],
    pub description: &'static str,
    pub category: &'static str,
    pub handler: Handler<H>,
    pub subcommands: Vec<Command<H>>,
    pub params: &'static [Parameter],
    pub flag_params: &'static [FlagParameter],
    /// A single repeated group consuming remaining positionals in chunks.
    pub repeat_params: &'static [Parameter],
    pub allowed_in_dms: bool,
    pub required_permissions: Option<Permissions>,
}

impl<H> Command<H> {
    /// A descriptor with no parameters, guild-only, no permission gate.
    /// Extend with struct update syntax.
    pub fn new(
        names: &'static [&'static str],
        description: &'static str,
        category: &'static str,
        handler: Handler<H>,
    ) -> Self {
        Self {
            names,
            description,
            category,
            handler,
            subcommands: Vec::new(),
            params: &[],
            flag_params: &[],
            repeat_params: &[],
            allowed_in_dms: false,
            required_permissions: None,
        }
    }

    /// The command's display name (its first alias).
    pub fn name(&self) -> &'static str {
        self.names.first().copied().unwrap_or("<unnamed>")
    }
}
