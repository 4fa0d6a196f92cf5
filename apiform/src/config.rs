use std::path::{Path, PathBuf};

use apiform_core::config::{ConfigFile, Provider, ResolvedConfig};
use clap::{
    CommandFactory, FromArgMatches,
    error::{ErrorKind as ClapErrorKind, Result as ClapResult},
};

const DEFAULT_CONFIG: &str = "apiform.toml";

#[derive(Debug)]
pub struct Main {
    /// How many times `-v` was passed.
    pub verbose: u8,
    pub command: Command,
}

impl Main {
    pub fn parse() -> ClapResult<Main> {
        let mut cmd = MainArgs::command();
        let mut matches = cmd
            .try_get_matches_from_mut(std::env::args_os())
            .map_err(|err| err.format(&mut cmd))?;
        let args =
            MainArgs::from_arg_matches_mut(&mut matches).map_err(|err| err.format(&mut cmd))?;

        let (kind, source) = match args.command {
            CommandArgs::Generate(source) => (CommandKind::Generate, source),
            CommandArgs::Check(source) => (CommandKind::Check, source),
        };

        let contents = std::fs::read_to_string(&source.config).map_err(|err| {
            cmd.error(
                ClapErrorKind::Io,
                format!("Failed to read `{}`: {err}", source.config.display()),
            )
        })?;
        let mut file = ConfigFile::from_toml(&contents).map_err(|err| {
            cmd.error(
                ClapErrorKind::ValueValidation,
                format!("Failed to parse `{}`: {err}", source.config.display()),
            )
        })?;
        if let Some(provider) = source.provider {
            file.provider = Some(provider.into());
        }

        // Paths in the file are relative to the file, but
        // `--output` is relative to where we're running.
        let base_dir = source
            .config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut config = file.resolve(&base_dir).map_err(|err| {
            cmd.error(
                ClapErrorKind::ValueValidation,
                format!("Invalid configuration in `{}`: {err}", source.config.display()),
            )
        })?;
        if let Some(output) = source.output {
            config.output = output;
        }

        let command = match kind {
            CommandKind::Generate => Command::Generate(config),
            CommandKind::Check => Command::Check(config),
        };

        Ok(Main {
            verbose: args.verbose,
            command,
        })
    }
}

#[derive(Debug)]
pub enum Command {
    /// Write every enabled artifact to the output directory.
    Generate(ResolvedConfig),
    /// Render every enabled artifact, and compare it with what's
    /// in the output directory.
    Check(ResolvedConfig),
}

#[derive(Clone, Copy, Debug)]
enum CommandKind {
    Generate,
    Check,
}

#[derive(Debug, clap::Parser)]
#[command(version, about, long_about = None)]
struct MainArgs {
    /// Log more details. Pass twice for even more.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CommandArgs,
}

#[derive(Debug, clap::Subcommand)]
enum CommandArgs {
    /// Generate the client, hooks, and server wrappers from the
    /// endpoint registry.
    Generate(SourceArgs),
    /// Check that the generated code is up to date, without
    /// writing anything.
    Check(SourceArgs),
}

#[derive(Debug, clap::Args)]
struct SourceArgs {
    /// The path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Overrides the output directory in the configuration file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overrides the provider in the configuration file.
    #[arg(short, long, value_enum)]
    provider: Option<ProviderArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ProviderArg {
    Nextjs,
    Vite,
}

impl From<ProviderArg> for Provider {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Nextjs => Provider::Nextjs,
            ProviderArg::Vite => Provider::Vite,
        }
    }
}
