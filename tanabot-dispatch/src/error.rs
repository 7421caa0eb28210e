use serenity::all::Permissions;
use thiserror::Error;

use crate::command::Parameter;

/// An error whose message is meant for the end user verbatim.
///
/// Handlers and workflow code raise this for expected business-rule
/// rejections ("workflow disabled", "cancelled"); the dispatcher lets it
/// through unwrapped instead of burying it in an invoke report.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DefinedError(pub String);

impl DefinedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Everything the command pipeline can fail with, matched exhaustively by
/// the error reporter.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No registered command carries the attempted alias.
    #[error("command `{name}` not found")]
    NotFound { name: String },

    /// Guild-only command invoked from a direct message.
    #[error("command `{name}` cannot be used in DMs")]
    NotAllowedInDms { name: String },

    /// The invoker's permission bitmask is not a superset of the required one.
    #[error("permission denied")]
    PermissionDenied {
        required: Permissions,
        actual: Permissions,
    },

    /// A required positional parameter had no argument left to bind.
    #[error("parameter `{}` of `{command}` is missing", .parameter.name)]
    MissingArgument {
        command: String,
        parameter: Parameter,
    },

    /// The trailing repeated group could not be filled completely.
    #[error("repeated parameter `{}` of `{command}` is missing", .parameter.name)]
    IncompleteArgumentSet {
        command: String,
        parameter: Parameter,
    },

    /// None of the parameter's declared types accepted the token.
    #[error("argument for parameter `{}` of `{command}` has the wrong type", .parameter.name)]
    ArgumentType {
        command: String,
        parameter: Parameter,
    },

    /// Developer-authored message, shown to the user as-is.
    #[error("{0}")]
    Defined(#[from] DefinedError),

    /// The handler itself failed with something that is not a pipeline
    /// condition; carries the opaque cause.
    #[error("command `{command}` failed")]
    Invoke {
        command: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Load-time validation failures for the command registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate command alias `{alias}`")]
    DuplicateAlias { alias: String },

    #[error("command `{command}` declares a duplicate subcommand alias `{alias}`")]
    DuplicateSubcommandAlias { command: String, alias: String },

    #[error("command `{command}` declares required parameter `{parameter}` after an optional one")]
    RequiredAfterOptional {
        command: String,
        parameter: &'static str,
    },

    #[error("a command declares no aliases")]
    MissingAlias,
}
