//! dsc: command line client for the Deep Security Manager web service.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use deepsecurity::{
    cli::{self, Entity, ListOptions, ListQuery},
    config::{self, AppConfig},
    mapping::SchemaRegistry,
    output::{write_output, OutputTarget},
    reports::ReportFormat,
    scraping::DpiRuleAssignment,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dsc")]
#[command(version)]
#[command(about = "Query a Deep Security Manager and export the results as CSV", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Host details of every computer
    dsc -m dsm.example.com -p secret host_detail list > hosts.csv

    # Chosen fields, following links between objects
    dsc -m dsm.example.com -p secret host list --fields name,host_group.name

    # Fields available for an entity
    dsc host_detail schema")]
struct Cli {
    /// Deep Security Manager host
    #[arg(short, long, global = true, value_name = "hostname")]
    manager: Option<String>,

    /// Webservice port
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Tenant name
    #[arg(short, long, global = true)]
    tenant: Option<String>,

    /// Username
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Password
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Output filename (`--` for stdout)
    #[arg(short, long, global = true, default_value = "--", allow_hyphen_values = true)]
    outfile: String,

    /// Show progress bar
    #[arg(short = 'P', long = "progress_bar", global = true)]
    progress_bar: bool,

    /// Enable client debug output (one of debug, info, warn, error, fatal)
    #[arg(
        short,
        long,
        global = true,
        value_name = "debug_level",
        value_parser = ["debug", "info", "warn", "error", "fatal"]
    )]
    debug: Option<String>,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// `--fields` and `--format` of every listing
#[derive(Args)]
struct ListArgs {
    /// Comma separated fields to display, or a file containing them
    /// (default: the entity's usual columns; see `schema`)
    #[arg(long)]
    fields: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: ReportFormat,

    /// strftime pattern for date/time values
    #[arg(long = "time_format")]
    time_format: Option<String>,
}

#[derive(Subcommand)]
enum EntityAction {
    /// List all entries
    List(ListArgs),
    /// Show the fields of the entity
    Schema,
}

#[derive(Subcommand)]
enum HostDetailAction {
    /// List host details of all hosts
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Extent of data returned (low, medium, high)
        #[arg(long = "detail_level", default_value = "low")]
        detail_level: String,
    },
    /// Show the fields of host details
    Schema,
}

#[derive(Subcommand)]
enum SystemEventAction {
    /// List system events
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Time interval (last_hour, last_24_hours, last_7_days, last_day)
        #[arg(long = "time_filter", default_value = "last_day")]
        time_filter: String,
        /// Include events not related to a host
        #[arg(long = "include_non_host_events")]
        include_non_host_events: bool,
    },
    /// Show the fields of system events
    Schema,
}

#[derive(Subcommand)]
enum DpiRuleAction {
    /// List DPI rules, optionally those of one host
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only rules of this host (read from the web console)
        #[arg(long = "host_id")]
        host_id: Option<i64>,
        /// Assignment state for --host_id
        #[arg(long, value_parser = parse_assignment, default_value = "assigned")]
        assignment: DpiRuleAssignment,
    },
    /// Show the fields of DPI rules
    Schema,
}

#[derive(Subcommand)]
enum Commands {
    /// Display API version
    #[command(name = "api_version")]
    ApiVersion,

    /// Display manager time
    #[command(name = "manager_time")]
    ManagerTime,

    /// Access host details
    #[command(name = "host_detail")]
    HostDetail {
        #[command(subcommand)]
        action: HostDetailAction,
    },

    /// Access hosts
    Host {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Access host groups
    #[command(name = "host_group")]
    HostGroup {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Access security profiles
    #[command(name = "security_profile")]
    SecurityProfile {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Access DPI rules
    #[command(name = "dpi_rule")]
    DpiRule {
        #[command(subcommand)]
        action: DpiRuleAction,
    },

    /// Access application types
    #[command(name = "application_type")]
    ApplicationType {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Access system events
    #[command(name = "system_event")]
    SystemEvent {
        #[command(subcommand)]
        action: SystemEventAction,
    },

    /// Show or generate configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (defaults + file + environment + flags)
    Show,
    /// Print a commented example config file
    Example,
    /// Print the JSON schema of the config file format
    Schema,
}

fn parse_assignment(name: &str) -> Result<DpiRuleAssignment, String> {
    DpiRuleAssignment::from_name(name).ok_or_else(|| {
        let valid: Vec<_> = DpiRuleAssignment::ALL.iter().map(|a| a.name()).collect();
        format!("one of {}", valid.join(", "))
    })
}

/// Log filter for a `--debug` level; `fatal` maps to `error`.
fn log_level(debug: Option<&str>) -> &'static str {
    match debug {
        None => "warn",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") | Some("fatal") => "error",
        Some(_) => "debug",
    }
}

/// Layer flags over the config file and environment.
fn effective_config(cli: &Cli) -> AppConfig {
    let (mut config, loaded_from) = config::load_or_default(cli.config.as_deref());
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    config.apply_env();

    let connection = &mut config.connection;
    if let Some(manager) = &cli.manager {
        connection.manager = Some(manager.clone());
    }
    if let Some(port) = cli.port {
        connection.port = port;
    }
    if let Some(tenant) = &cli.tenant {
        connection.tenant.clone_from(tenant);
    }
    if let Some(username) = &cli.username {
        connection.username.clone_from(username);
    }
    if let Some(password) = &cli.password {
        connection.password = Some(password.clone());
    }
    if cli.progress_bar {
        config.output.progress_bar = true;
    }
    config
}

fn list_options(
    registry: &SchemaRegistry,
    entity: Entity,
    args: &ListArgs,
    config: &AppConfig,
) -> Result<ListOptions> {
    let fields = args
        .fields
        .clone()
        .unwrap_or_else(|| entity.default_fields_string());
    Ok(ListOptions {
        fields: cli::parse_fields(registry, entity.class(), &fields)?,
        format: args.format,
        time_format: args
            .time_format
            .clone()
            .unwrap_or_else(|| config.output.time_format.clone()),
        progress_bar: config.output.progress_bar,
    })
}

/// Run a listing in an authenticated session; `None` when authentication failed.
fn list(
    config: &AppConfig,
    entity: Entity,
    query: ListQuery,
    args: &ListArgs,
) -> Result<Option<String>> {
    let options = list_options(SchemaRegistry::global(), entity, args, config)?;
    cli::with_session(config, |manager| {
        cli::run_list(manager, entity, &query, &options)
    })
}

fn entity_command(config: &AppConfig, entity: Entity, action: &EntityAction) -> Result<Option<String>> {
    match action {
        EntityAction::List(args) => list(config, entity, ListQuery::All, args),
        EntityAction::Schema => Ok(Some(cli::run_schema(SchemaRegistry::global(), entity.class())?)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so stdout stays clean CSV
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| log_level(cli.debug.as_deref()).to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let config = effective_config(&cli);
    let target = OutputTarget::from_arg(Some(&cli.outfile));

    let output = match &cli.command {
        Commands::ApiVersion => Some(cli::run_api_version(&cli::connect(&config)?)?),
        Commands::ManagerTime => Some(cli::run_manager_time(
            &cli::connect(&config)?,
            &config.output.time_format,
        )?),

        Commands::HostDetail { action } => match action {
            HostDetailAction::List { list: args, detail_level } => {
                let detail_level = cli::parse_detail_level(detail_level)?;
                list(
                    &config,
                    Entity::HostDetail,
                    ListQuery::HostDetails { detail_level },
                    args,
                )?
            }
            HostDetailAction::Schema => Some(cli::run_schema(
                SchemaRegistry::global(),
                Entity::HostDetail.class(),
            )?),
        },

        Commands::SystemEvent { action } => match action {
            SystemEventAction::List {
                list: args,
                time_filter,
                include_non_host_events,
            } => {
                let time_filter = cli::parse_time_filter(time_filter)?;
                list(
                    &config,
                    Entity::SystemEvent,
                    ListQuery::SystemEvents {
                        time_filter,
                        include_non_host_events: *include_non_host_events,
                    },
                    args,
                )?
            }
            SystemEventAction::Schema => Some(cli::run_schema(
                SchemaRegistry::global(),
                Entity::SystemEvent.class(),
            )?),
        },

        Commands::DpiRule { action } => match action {
            DpiRuleAction::List {
                list: args,
                host_id,
                assignment,
            } => {
                let query = match host_id {
                    Some(host_id) => ListQuery::DpiRulesForHost {
                        host_id: *host_id,
                        assignment: *assignment,
                    },
                    None => ListQuery::All,
                };
                list(&config, Entity::DpiRule, query, args)?
            }
            DpiRuleAction::Schema => Some(cli::run_schema(
                SchemaRegistry::global(),
                Entity::DpiRule.class(),
            )?),
        },

        Commands::Host { action } => entity_command(&config, Entity::Host, action)?,
        Commands::HostGroup { action } => entity_command(&config, Entity::HostGroup, action)?,
        Commands::SecurityProfile { action } => {
            entity_command(&config, Entity::SecurityProfile, action)?
        }
        Commands::ApplicationType { action } => {
            entity_command(&config, Entity::ApplicationType, action)?
        }

        Commands::Config { action } => Some(match action {
            ConfigAction::Show => cli::run_config_show(&config)?,
            ConfigAction::Example => config::generate_example_config(),
            ConfigAction::Schema => {
                let mut schema = config::generate_json_schema()?;
                schema.push('\n');
                schema
            }
        }),

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "dsc", &mut io::stdout());
            None
        }
    };

    if let Some(output) = output {
        write_output(&output, &target).context("Failed to write command output")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(None), "warn");
        assert_eq!(log_level(Some("debug")), "debug");
        assert_eq!(log_level(Some("info")), "info");
        assert_eq!(log_level(Some("fatal")), "error");
    }

    #[test]
    fn test_debug_flag_takes_a_level() {
        let cli = Cli::try_parse_from(["dsc", "-d", "info", "host_detail", "list"]).unwrap();
        assert_eq!(cli.debug.as_deref(), Some("info"));
        assert!(matches!(
            cli.command,
            Commands::HostDetail {
                action: HostDetailAction::List { .. }
            }
        ));

        // The subcommand is never taken as the level.
        assert!(Cli::try_parse_from(["dsc", "-d", "host_detail", "list"]).is_err());
        assert!(Cli::try_parse_from(["dsc", "-d", "chatty", "api_version"]).is_err());

        let cli = Cli::try_parse_from(["dsc", "api_version"]).unwrap();
        assert_eq!(cli.debug, None);
    }

    #[test]
    fn test_cli_parses_snake_case_commands() {
        let cli = Cli::try_parse_from([
            "dsc",
            "-m",
            "dsm",
            "host_detail",
            "list",
            "--detail_level",
            "high",
            "--fields",
            "name",
        ])
        .unwrap();
        assert_eq!(cli.manager.as_deref(), Some("dsm"));
        assert!(matches!(
            cli.command,
            Commands::HostDetail {
                action: HostDetailAction::List { .. }
            }
        ));
    }

    #[test]
    fn test_cli_verifies() {
        Cli::command().debug_assert();
    }
}
