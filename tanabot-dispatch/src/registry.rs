use std::collections::{HashMap, HashSet};

use crate::command::Command;
use crate::error::RegistryError;

/// Alias-to-command mapping, built once at startup and never mutated.
///
/// Every alias maps explicitly to its command; collisions are rejected at
/// construction rather than resolved by registration order.
#[derive(Debug)]
pub struct Registry<H> {
    commands: Vec<Command<H>>,
    aliases: HashMap<&'static str, usize>,
}

impl<H> Registry<H> {
    pub fn new(commands: Vec<Command<H>>) -> Result<Self, RegistryError> {
        let mut aliases: HashMap<&'static str, usize> = HashMap::new();

        for (index, command) in commands.iter().enumerate() {
            validate(command)?;
            for alias in command.names {
                if aliases.insert(alias, index).is_some() {
                    return Err(RegistryError::DuplicateAlias {
                        alias: (*alias).to_owned(),
                    });
                }
            }
        }

        Ok(Self { commands, aliases })
    }

    /// Case-sensitive exact alias lookup.
    pub fn resolve(&self, name: &str) -> Option<&Command<H>> {
        self.aliases
            .get(name)
            .and_then(|index| self.commands.get(*index))
    }

    pub fn commands(&self) -> &[Command<H>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Check the structural invariants of one command descriptor and its
/// subcommands: non-empty alias set, no required positional after an optional
/// one, no duplicate subcommand aliases within a parent.
fn validate<H>(command: &Command<H>) -> Result<(), RegistryError> {
    if command.names.is_empty() {
        return Err(RegistryError::MissingAlias);
    }

    let mut seen_optional = false;
    for param in command.params {
        if param.optional {
            seen_optional = true;
        } else if seen_optional {
            return Err(RegistryError::RequiredAfterOptional {
                command: command.name().to_owned(),
                parameter: param.name,
            });
        }
    }

    let mut sub_aliases: HashSet<&'static str> = HashSet::new();
    for subcommand in &command.subcommands {
        validate(subcommand)?;
        for alias in subcommand.names {
            if !sub_aliases.insert(alias) {
                return Err(RegistryError::DuplicateSubcommandAlias {
                    command: command.name().to_owned(),
                    alias: (*alias).to_owned(),
                });
            }
        }
    }

    Ok(())
}
