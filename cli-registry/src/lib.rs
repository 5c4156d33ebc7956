//! Declarative command registry shared by the workspace's command-line tools.
//!
//! A tool describes its surface as an ordered list of [`CommandSpec`]s, each
//! naming a handler, a help line and the [`ArgSpec`]s it accepts. The
//! [`Registry`] turns that table into a `clap` parser and routes the matched
//! subcommand to its handler with keyword-style access to the arguments.

use clap::parser::MatchesError;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("No command was given")]
    MissingCommand,
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("Missing required argument '{0}'")]
    MissingArgument(String),
    #[error("Cannot read argument '{name}'")]
    InvalidArgument {
        name: String,
        #[source]
        source: MatchesError,
    },
}

/// How an argument appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// `<name>`
    Positional,
    /// `--name <value>`
    Option,
    /// `--name`, stored as a boolean
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    /// Signed so that range checks are left to the handler.
    Integer,
}

/// Specification of a single argument of a command.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    name: &'static str,
    help: String,
    kind: ArgKind,
    value_type: ValueType,
    default: Option<&'static str>,
}

impl ArgSpec {
    /// A required positional argument.
    pub fn positional(name: &'static str, help: impl Into<String>) -> Self {
        Self::new(name, help, ArgKind::Positional)
    }

    /// A `--name <value>` option. Options are never required.
    pub fn option(name: &'static str, help: impl Into<String>) -> Self {
        Self::new(name, help, ArgKind::Option)
    }

    /// A boolean `--name` switch.
    pub fn flag(name: &'static str, help: impl Into<String>) -> Self {
        Self::new(name, help, ArgKind::Flag)
    }

    fn new(name: &'static str, help: impl Into<String>, kind: ArgKind) -> Self {
        Self {
            name,
            help: help.into(),
            kind,
            value_type: ValueType::String,
            default: None,
        }
    }

    pub fn integer(mut self) -> Self {
        self.value_type = ValueType::Integer;
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name).help(self.help.clone());
        let arg = match self.kind {
            ArgKind::Positional => arg.required(true).action(ArgAction::Set),
            ArgKind::Option => arg.long(self.name).action(ArgAction::Set),
            ArgKind::Flag => return arg.long(self.name).action(ArgAction::SetTrue),
        };
        let arg = match self.value_type {
            ValueType::String => arg.value_parser(clap::value_parser!(String)),
            ValueType::Integer => arg
                .value_parser(clap::value_parser!(i64))
                .allow_negative_numbers(true),
        };
        match self.default {
            Some(default) => arg.default_value(default),
            None => arg,
        }
    }
}

/// Handler invoked when its command is matched.
pub type Handler<C> = fn(&mut C, &ParsedArgs<'_>) -> anyhow::Result<()>;

/// One row of a registry: a subcommand, its help, its arguments and its handler.
pub struct CommandSpec<C> {
    name: &'static str,
    help: &'static str,
    args: Vec<ArgSpec>,
    handler: Handler<C>,
}

impl<C> CommandSpec<C> {
    pub fn new(name: &'static str, help: &'static str, handler: Handler<C>) -> Self {
        Self {
            name,
            help,
            args: Vec::new(),
            handler,
        }
    }

    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    pub fn args(mut self, specs: impl IntoIterator<Item = ArgSpec>) -> Self {
        self.args.extend(specs);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arg_specs(&self) -> &[ArgSpec] {
        &self.args
    }

    fn to_command(&self) -> Command {
        Command::new(self.name)
            .about(self.help)
            .args(self.args.iter().map(ArgSpec::to_arg))
    }
}

/// The ordered command table of one tool.
pub struct Registry<C> {
    program: &'static str,
    about: &'static str,
    commands: Vec<CommandSpec<C>>,
}

impl<C> Registry<C> {
    pub fn new(program: &'static str, about: &'static str, commands: Vec<CommandSpec<C>>) -> Self {
        Self {
            program,
            about,
            commands,
        }
    }

    pub fn commands(&self) -> &[CommandSpec<C>] {
        &self.commands
    }

    /// Builds the `clap` parser for the whole table. Exactly one subcommand is required.
    pub fn build_parser(&self) -> Command {
        Command::new(self.program)
            .about(self.about)
            .subcommand_required(true)
            .subcommands(self.commands.iter().map(CommandSpec::to_command))
    }

    /// Parses the command line, `args` including the program name.
    ///
    /// Usage errors (a missing subcommand, a missing required positional, an
    /// unparsable value) come back as `clap` errors so the caller can print
    /// them and exit before any handler runs.
    pub fn parse<I, T>(&self, args: I) -> Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.build_parser().try_get_matches_from(args)
    }

    /// Runs the handler of the matched subcommand.
    pub fn dispatch(&self, context: &mut C, matches: &ArgMatches) -> anyhow::Result<()> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or(RegistryError::MissingCommand)?;
        let command = self
            .commands
            .iter()
            .find(|command| command.name == name)
            .ok_or_else(|| RegistryError::UnknownCommand(name.to_string()))?;
        debug!(command = name, "Dispatching command");
        (command.handler)(context, &ParsedArgs::new(sub_matches))
    }
}

/// Keyword-style view over the arguments of the matched subcommand.
pub struct ParsedArgs<'a> {
    matches: &'a ArgMatches,
}

impl<'a> ParsedArgs<'a> {
    pub fn new(matches: &'a ArgMatches) -> Self {
        Self { matches }
    }

    pub fn string(&self, name: &str) -> Result<Option<String>, RegistryError> {
        self.matches
            .try_get_one::<String>(name)
            .map(Option::<&String>::cloned)
            .map_err(|source| invalid(name, source))
    }

    pub fn required_string(&self, name: &str) -> Result<String, RegistryError> {
        self.string(name)?
            .ok_or_else(|| RegistryError::MissingArgument(name.to_string()))
    }

    pub fn integer(&self, name: &str) -> Result<Option<i64>, RegistryError> {
        self.matches
            .try_get_one::<i64>(name)
            .map(Option::<&i64>::copied)
            .map_err(|source| invalid(name, source))
    }

    pub fn flag(&self, name: &str) -> Result<bool, RegistryError> {
        let value = self
            .matches
            .try_get_one::<bool>(name)
            .map_err(|source| invalid(name, source))?;
        Ok(value.copied().unwrap_or(false))
    }
}

fn invalid(name: &str, source: MatchesError) -> RegistryError {
    RegistryError::InvalidArgument {
        name: name.to_string(),
        source,
    }
}
