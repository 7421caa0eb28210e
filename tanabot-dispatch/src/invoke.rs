use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use tanabot_core::Data;

use crate::command::{Command, Parameter};
use crate::context::{GuildDirectory, Invocation};
use crate::convert::{Value, convert_token};
use crate::error::{CommandError, DefinedError};

/// Converted argument values handed to a handler, grouped the way they were
/// declared: positionals, then flags, then the repeated tail.
#[derive(Debug, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub flags: Vec<Value>,
    pub repeated: Vec<Value>,
}

impl Args {
    /// The value bound to the nth declared positional parameter.
    pub fn positional(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// The value bound to the nth declared flag parameter.
    pub fn flag(&self, index: usize) -> Option<&Value> {
        self.flags.get(index)
    }

    pub fn repeated(&self) -> &[Value] {
        &self.repeated
    }
}

/// Coerce one bound token through the parameter's declared types in order.
fn coerce<H>(
    command: &Command<H>,
    param: &Parameter,
    raw: Option<&str>,
    guild: Option<&GuildDirectory>,
) -> Result<Value, CommandError> {
    let Some(raw) = raw else {
        return Ok(Value::Absent);
    };

    for ty in param.types {
        if let Some(value) = convert_token(raw, *ty, guild) {
            return Ok(value);
        }
    }

    if param.optional {
        Ok(Value::Absent)
    } else {
        Err(CommandError::ArgumentType {
            command: command.name().to_owned(),
            parameter: *param,
        })
    }
}

/// Dispatch a resolved command: gate, resolve subcommands, bind and coerce
/// arguments, and invoke the handler.
///
/// Recurses when the first unconsumed positional names a subcommand, passing
/// the remaining arguments through unchanged. Silent abandonment (a plain
/// `Ok`) covers guild-only commands invoked from DMs and permission-gated
/// commands with no guild member behind them.
pub fn invoke<'a, H>(
    platform: &'a H,
    data: &'a Data,
    invocation: &'a Invocation,
    command: &'a Command<H>,
    args: Vec<String>,
    flags: &'a HashMap<String, String>,
) -> Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send + 'a>>
where
    H: Sync,
{
    Box::pin(async move {
        if invocation.guild.is_none() && !command.allowed_in_dms {
            debug!(command = command.name(), "guild-only command invoked from DM");
            return Ok(());
        }

        if let Some(required) = command.required_permissions {
            let Some(invoker) = &invocation.invoker else {
                return Ok(());
            };
            if invoker.permissions & required != required {
                return Err(CommandError::PermissionDenied {
                    required,
                    actual: invoker.permissions,
                });
            }
        }

        if let Some(first) = args.first()
            && let Some(subcommand) = command
                .subcommands
                .iter()
                .find(|sc| sc.names.contains(&first.as_str()))
        {
            debug!(
                command = command.name(),
                subcommand = subcommand.name(),
                "descending into subcommand"
            );
            let rest = args[1..].to_vec();
            return invoke(platform, data, invocation, subcommand, rest, flags).await;
        }

        let guild = invocation.guild.as_ref();

        // Bind positionals left to right with an explicit cursor. Extra
        // arguments beyond the declared list are ignored unless a repeated
        // group claims them below.
        let mut cursor = 0;
        let mut positional = Vec::with_capacity(command.params.len());
        for param in command.params {
            let raw = match args.get(cursor) {
                Some(arg) => {
                    cursor += 1;
                    Some(arg.as_str())
                }
                None if param.optional => None,
                None => {
                    return Err(CommandError::MissingArgument {
                        command: command.name().to_owned(),
                        parameter: *param,
                    });
                }
            };
            positional.push(coerce(command, param, raw, guild)?);
        }

        // Flags bind by key and are always effectively optional.
        let mut flag_values = Vec::with_capacity(command.flag_params.len());
        for flag_param in command.flag_params {
            let raw = flags.get(flag_param.flag).map(|v| v.trim().to_owned());
            flag_values.push(coerce(
                command,
                &flag_param.parameter,
                raw.as_deref(),
                guild,
            )?);
        }

        // The repeated group consumes the rest in group-sized chunks.
        let mut repeated = Vec::new();
        if !command.repeat_params.is_empty() {
            while cursor < args.len() {
                for param in command.repeat_params {
                    let Some(arg) = args.get(cursor) else {
                        return Err(CommandError::IncompleteArgumentSet {
                            command: command.name().to_owned(),
                            parameter: *param,
                        });
                    };
                    cursor += 1;
                    repeated.push(coerce(command, param, Some(arg.as_str()), guild)?);
                }
            }
        }

        let bound = Args {
            positional,
            flags: flag_values,
            repeated,
        };

        match (command.handler)(platform, data, invocation, bound).await {
            Ok(()) => Ok(()),
            Err(err) => match err.downcast::<DefinedError>() {
                Ok(defined) => Err(CommandError::Defined(defined)),
                Err(other) => Err(CommandError::Invoke {
                    command: command.name().to_owned(),
                    source: other,
                }),
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use serenity::all::{
        ChannelId, GuildId, MessageId, Permissions, UserId,
    };

    use tanabot_core::{Config, Data};

    use super::{Args, invoke};
    use crate::command::{
        Command, FlagParameter, HandlerFuture, Parameter, ParameterType,
    };
    use crate::context::{GuildDirectory, Invocation, MemberEntry};
    use crate::error::{CommandError, DefinedError};

    const BOOL_PARAM: &[Parameter] =
        &[Parameter::required("on/off", &[ParameterType::Boolean])];
    const TWO_REQUIRED: &[Parameter] = &[
        Parameter::required("on/off", &[ParameterType::Boolean]),
        Parameter::required("reason", &[ParameterType::String]),
    ];
    const OPTIONAL_EXTRA: &[Parameter] =
        &[Parameter::optional("extra", &[ParameterType::String])];
    const NUM_OR_STR: &[Parameter] = &[Parameter::required(
        "value",
        &[ParameterType::Number, ParameterType::String],
    )];
    const KV_REPEAT: &[Parameter] = &[
        Parameter::required("key", &[ParameterType::String]),
        Parameter::required("value", &[ParameterType::String]),
    ];
    const ENTRY_REPEAT: &[Parameter] =
        &[Parameter::required("entry", &[ParameterType::String])];
    const FLAG_PARAMS: &[FlagParameter] = &[
        FlagParameter {
            flag: "r",
            parameter: Parameter::required("reason", &[ParameterType::String]),
        },
        FlagParameter {
            flag: "n",
            parameter: Parameter::required("count", &[ParameterType::Number]),
        },
    ];

    fn test_data() -> Data {
        Data::new(Config {
            token: String::new(),
            prefix: "?".to_owned(),
            warning_icon: String::new(),
            wave_icon: String::new(),
            check_icon: String::new(),
            x_icon: String::new(),
            tanabata_log_channel: ChannelId::new(1),
            tanabata_channel: ChannelId::new(2),
            tanabata_dir: PathBuf::from("."),
            reaction_timeout: Duration::from_secs(30),
        })
    }

    fn guild_invocation(permissions: Permissions) -> Invocation {
        let invoker = MemberEntry {
            user_id: UserId::new(5),
            username: "tester".to_owned(),
            nickname: None,
            permissions,
        };
        let mut guild = GuildDirectory::new(GuildId::new(10));
        guild.members.push(invoker.clone());
        Invocation {
            message_id: MessageId::new(1),
            author_id: UserId::new(5),
            channel_id: ChannelId::new(7),
            invoking_name: "test".to_owned(),
            guild: Some(guild),
            invoker: Some(invoker),
        }
    }

    fn dm_invocation() -> Invocation {
        Invocation {
            message_id: MessageId::new(1),
            author_id: UserId::new(5),
            channel_id: ChannelId::new(7),
            invoking_name: "test".to_owned(),
            guild: None,
            invoker: None,
        }
    }

    fn ok_handler<'a>(
        _: &'a (),
        _: &'a Data,
        _: &'a Invocation,
        _: Args,
    ) -> HandlerFuture<'a> {
        Box::pin(async { Ok(()) })
    }

    fn fail_handler<'a>(
        _: &'a (),
        _: &'a Data,
        _: &'a Invocation,
        _: Args,
    ) -> HandlerFuture<'a> {
        Box::pin(async { Err(anyhow::anyhow!("boom")) })
    }

    fn defined_handler<'a>(
        _: &'a (),
        _: &'a Data,
        _: &'a Invocation,
        _: Args,
    ) -> HandlerFuture<'a> {
        Box::pin(async { Err(DefinedError::new("Cancelled.").into()) })
    }

    /// Reports the bound arguments back through the error channel so tests
    /// can assert on what the handler received.
    fn probe_handler<'a>(
        _: &'a (),
        _: &'a Data,
        _: &'a Invocation,
        args: Args,
    ) -> HandlerFuture<'a> {
        Box::pin(async move {
            Err(anyhow::anyhow!(
                "positional={:?} flags={:?} repeated={:?}",
                args.positional,
                args.flags,
                args.repeated
            ))
        })
    }

    /// Flips the shared toggle to the bound boolean, like the real
    /// `tanabata` command does.
    fn toggle_handler<'a>(
        _: &'a (),
        data: &'a Data,
        _: &'a Invocation,
        args: Args,
    ) -> HandlerFuture<'a> {
        Box::pin(async move {
            let enabled = args
                .positional(0)
                .and_then(|v| v.as_bool())
                .ok_or_else(|| anyhow::anyhow!("expected a boolean"))?;
            data.tanabata_enabled.set(enabled);
            Ok(())
        })
    }

    fn command(handler: crate::command::Handler<()>) -> Command<()> {
        Command::new(&["test", "t"], "", "test", handler)
    }

    fn probe_message(result: Result<(), CommandError>) -> String {
        match result {
            Err(CommandError::Invoke { source, .. }) => source.to_string(),
            other => panic!("expected invoke error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_required_argument_names_first_parameter() {
        let cmd = Command {
            params: TWO_REQUIRED,
            ..command(ok_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let err = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new())
            .await
            .unwrap_err();
        match err {
            CommandError::MissingArgument { parameter, .. } => {
                assert_eq!(parameter.name, "on/off");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn optional_parameter_binds_absent() {
        let cmd = Command {
            params: OPTIONAL_EXTRA,
            ..command(probe_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let message = probe_message(
            invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new()).await,
        );
        assert!(message.contains("positional=[Absent]"), "{message}");
    }

    #[tokio::test]
    async fn unparseable_boolean_is_a_type_error() {
        let cmd = Command {
            params: BOOL_PARAM,
            ..command(ok_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let err = invoke(
            &(),
            &data,
            &invocation,
            &cmd,
            vec!["maybe".to_owned()],
            &HashMap::new(),
        )
        .await
        .unwrap_err();
        match err {
            CommandError::ArgumentType { parameter, .. } => {
                assert_eq!(parameter.name, "on/off");
                assert_eq!(parameter.types, &[ParameterType::Boolean]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn coercion_falls_through_declared_types_in_order() {
        let cmd = Command {
            params: NUM_OR_STR,
            ..command(probe_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());

        let message = probe_message(
            invoke(
                &(),
                &data,
                &invocation,
                &cmd,
                vec!["0".to_owned()],
                &HashMap::new(),
            )
            .await,
        );
        // Zero is a valid number, not "not found".
        assert!(message.contains("Number(0.0)"), "{message}");

        let message = probe_message(
            invoke(
                &(),
                &data,
                &invocation,
                &cmd,
                vec!["abc".to_owned()],
                &HashMap::new(),
            )
            .await,
        );
        assert!(message.contains(r#"Str("abc")"#), "{message}");
    }

    #[tokio::test]
    async fn repeated_group_consumes_remainder_in_chunks() {
        let cmd = Command {
            repeat_params: KV_REPEAT,
            ..command(probe_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let args = ["a", "1", "b", "2"].map(str::to_owned).to_vec();
        let message = probe_message(
            invoke(&(), &data, &invocation, &cmd, args, &HashMap::new()).await,
        );
        assert!(
            message.contains(r#"repeated=[Str("a"), Str("1"), Str("b"), Str("2")]"#),
            "{message}"
        );
    }

    #[tokio::test]
    async fn partial_repeated_group_is_incomplete() {
        let cmd = Command {
            repeat_params: KV_REPEAT,
            ..command(ok_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let args = ["a", "1", "b"].map(str::to_owned).to_vec();
        let err = invoke(&(), &data, &invocation, &cmd, args, &HashMap::new())
            .await
            .unwrap_err();
        match err {
            CommandError::IncompleteArgumentSet { parameter, .. } => {
                assert_eq!(parameter.name, "value");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_remaining_arguments_means_zero_groups() {
        let cmd = Command {
            repeat_params: ENTRY_REPEAT,
            ..command(ok_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let result = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn flags_bind_by_key_and_absent_flags_are_absent() {
        let cmd = Command {
            flag_params: FLAG_PARAMS,
            ..command(probe_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let mut flags = HashMap::new();
        flags.insert("r".to_owned(), " spam ".to_owned());
        let message =
            probe_message(invoke(&(), &data, &invocation, &cmd, vec![], &flags).await);
        // Flag values are trimmed; the undeclared flag stays absent even
        // though its parameter is nominally required.
        assert!(
            message.contains(r#"flags=[Str("spam"), Absent]"#),
            "{message}"
        );
    }

    #[tokio::test]
    async fn guild_only_command_is_silently_abandoned_in_dms() {
        let cmd = Command {
            params: BOOL_PARAM,
            ..command(toggle_handler)
        };
        let data = test_data();
        let invocation = dm_invocation();
        let result = invoke(
            &(),
            &data,
            &invocation,
            &cmd,
            vec!["off".to_owned()],
            &HashMap::new(),
        )
        .await;
        assert!(result.is_ok());
        // The handler never ran.
        assert!(data.tanabata_enabled.get());
    }

    #[tokio::test]
    async fn dm_allowed_command_runs_without_a_guild() {
        let cmd = Command {
            allowed_in_dms: true,
            ..command(defined_handler)
        };
        let data = test_data();
        let invocation = dm_invocation();
        let err = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Defined(_)));
    }

    #[tokio::test]
    async fn permission_gate_rejects_missing_bits() {
        let cmd = Command {
            required_permissions: Some(Permissions::ADMINISTRATOR),
            ..command(ok_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::KICK_MEMBERS);
        let err = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new())
            .await
            .unwrap_err();
        match err {
            CommandError::PermissionDenied { required, actual } => {
                assert_eq!(required, Permissions::ADMINISTRATOR);
                assert_eq!(actual, Permissions::KICK_MEMBERS);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn permission_gate_accepts_a_strict_superset() {
        let cmd = Command {
            required_permissions: Some(Permissions::KICK_MEMBERS),
            ..command(ok_handler)
        };
        let data = test_data();
        let invocation =
            guild_invocation(Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS);
        let result = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn permission_gate_without_a_member_is_silent() {
        let cmd = Command {
            allowed_in_dms: true,
            required_permissions: Some(Permissions::ADMINISTRATOR),
            ..command(fail_handler)
        };
        let data = test_data();
        let invocation = dm_invocation();
        let result = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn subcommand_alias_consumes_the_first_argument() {
        let sub = Command {
            params: BOOL_PARAM,
            ..Command::new(&["status", "info"], "", "test", toggle_handler)
        };
        let parent = Command {
            subcommands: vec![sub],
            params: BOOL_PARAM,
            ..command(ok_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let args = ["info", "off"].map(str::to_owned).to_vec();
        let result = invoke(&(), &data, &invocation, &parent, args, &HashMap::new()).await;
        assert!(result.is_ok());
        // The subcommand's handler consumed the remaining argument.
        assert!(!data.tanabata_enabled.get());
    }

    #[tokio::test]
    async fn unmatched_first_argument_falls_through_to_parent() {
        let parent = Command {
            subcommands: vec![Command::new(&["status"], "", "test", fail_handler)],
            params: BOOL_PARAM,
            ..command(toggle_handler)
        };
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let result = invoke(
            &(),
            &data,
            &invocation,
            &parent,
            vec!["off".to_owned()],
            &HashMap::new(),
        )
        .await;
        assert!(result.is_ok());
        assert!(!data.tanabata_enabled.get());
    }

    #[tokio::test]
    async fn full_pipeline_parses_resolves_and_invokes() {
        let toggle_cmd = Command {
            params: BOOL_PARAM,
            required_permissions: Some(Permissions::ADMINISTRATOR),
            ..Command::new(&["tanabata", "tb"], "", "test", toggle_handler)
        };
        let registry = crate::registry::Registry::new(vec![toggle_cmd]).unwrap();

        let parsed = crate::parse::parse_message("?tb off", "?").unwrap();
        let command = registry.resolve(&parsed.name).expect("tb resolves");

        let data = test_data();
        let invocation = guild_invocation(Permissions::ADMINISTRATOR);
        invoke(&(), &data, &invocation, command, parsed.args, &parsed.flags)
            .await
            .unwrap();
        assert!(!data.tanabata_enabled.get());
    }

    #[tokio::test]
    async fn defined_errors_pass_through_verbatim() {
        let cmd = command(defined_handler);
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let err = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new())
            .await
            .unwrap_err();
        match err {
            CommandError::Defined(defined) => assert_eq!(defined.0, "Cancelled."),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn handler_failures_are_wrapped_with_the_command_identity() {
        let cmd = command(fail_handler);
        let data = test_data();
        let invocation = guild_invocation(Permissions::empty());
        let err = invoke(&(), &data, &invocation, &cmd, vec![], &HashMap::new())
            .await
            .unwrap_err();
        match err {
            CommandError::Invoke { command, source } => {
                assert_eq!(command, "test");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
