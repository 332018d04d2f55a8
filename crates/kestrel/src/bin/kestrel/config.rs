//! Node configuration: command-line flags merged over an optional YAML file
//! merged over defaults, in that order of precedence.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kestrel_common::Chain;

const DEFAULT_RPC_PORT: u16 = 6060;

#[derive(Parser)]
#[command(name = "Kestrel")]
#[command(about = "A Starknet full node", version)]
struct Cli {
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        long_help = "Verbosity of the node logs"
    )]
    log_level: Option<LogLevel>,

    #[arg(
        long = "rpc-port",
        value_name = "PORT",
        long_help = "The port on which the JSON-RPC server listens"
    )]
    rpc_port: Option<u16>,

    #[arg(
        long = "db-path",
        value_name = "DIR",
        value_hint = clap::ValueHint::DirPath,
        long_help = "Directory where the node stores its database. Defaults to the OS data directory joined with the network name"
    )]
    db_path: Option<PathBuf>,

    #[arg(
        long = "network",
        value_name = "NETWORK",
        long_help = "The Starknet network to follow: mainnet, goerli, goerli2 or integration"
    )]
    network: Option<Chain>,

    #[arg(long = "pprof", long_help = "Serve profiling data on port 9080")]
    pprof: bool,

    #[arg(
        long = "config",
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath,
        value_parser = |s: &str| -> Result<PathBuf, std::convert::Infallible> { Ok(PathBuf::from(s)) },
        long_help = "Path to a YAML configuration file. Flags take precedence over file values"
    )]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        })
    }
}

/// The YAML side of the configuration; every key is optional.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileConfig {
    log_level: Option<LogLevel>,
    rpc_port: Option<u16>,
    db_path: Option<PathBuf>,
    network: Option<Chain>,
    pprof: Option<bool>,
}

/// The merged node configuration.
///
/// An empty `database_path` stands for "unset" and is resolved to the OS
/// data directory at startup, after the network is known.
#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub log_level: LogLevel,
    pub rpc_port: u16,
    pub database_path: PathBuf,
    pub network: Chain,
    pub pprof: bool,
}

impl Config {
    /// Parses the command line, loading the configuration file if one was
    /// given. Terminates the process on command-line syntax errors, the clap
    /// convention.
    pub fn parse() -> anyhow::Result<Config> {
        Self::from_cli(Cli::parse())
    }

    fn from_cli(cli: Cli) -> anyhow::Result<Config> {
        let file = match cli.config.as_deref() {
            // An empty path means no configuration file at all.
            None => FileConfig::default(),
            Some(path) if path.as_os_str().is_empty() => FileConfig::default(),
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Reading configuration file {}", path.display()))?;
                // An empty document parses as `None`.
                serde_yaml::from_str::<Option<FileConfig>>(&contents)
                    .with_context(|| format!("Parsing configuration file {}", path.display()))?
                    .unwrap_or_default()
            }
        };

        Ok(Config {
            log_level: cli.log_level.or(file.log_level).unwrap_or(LogLevel::Info),
            rpc_port: cli.rpc_port.or(file.rpc_port).unwrap_or(DEFAULT_RPC_PORT),
            database_path: cli.db_path.or(file.db_path).unwrap_or_default(),
            network: cli.network.or(file.network).unwrap_or(Chain::Mainnet),
            // A boolean flag can only be raised, so either source may turn
            // profiling on.
            pprof: cli.pprof || file.pprof.unwrap_or(false),
        })
    }
}
