//! AppLand CLI
//!
//! Summarizes recorded AppMaps, uploads them to AppLand and manages the
//! server contexts the client talks to.

use anyhow::{Context, Result};
use appland_cli::api::ApplandClient;
use appland_cli::commands::{
    context as context_cmd, execute_login, execute_logout, execute_stats, execute_upload,
    recording, Credentials, StatsOptions, UploadArgs,
};
use appland_cli::context::ContextStore;
use appland_cli::utils::config::{CONFIG_PATH_ENV, DEFAULT_STATS_LIMIT};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::io;
use std::path::PathBuf;

/// AppLand - manage AppLand resources
#[derive(Parser, Debug)]
#[command(name = "appland")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Path to the context store
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show statistics for AppMap files
    Stats {
        /// AppMap files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Be verbose while processing
        #[arg(short, long)]
        verbose: bool,

        /// Show statistics for each file
        #[arg(short, long)]
        files: bool,

        /// Show distinct parameters for each method
        #[arg(short, long)]
        params: bool,

        /// Limit the number of methods displayed (0 for no limit)
        #[arg(short, long, default_value_t = DEFAULT_STATS_LIMIT)]
        limit: usize,

        /// Format results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Upload AppMap files to AppLand
    Upload {
        /// AppMap files or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Application that owns the AppMaps
        #[arg(short, long)]
        app: Option<String>,

        /// Override the branch recorded in the AppMaps
        #[arg(short, long)]
        branch: Option<String>,

        /// Environment the AppMaps were recorded in
        #[arg(short, long)]
        environment: Option<String>,

        /// Application version
        #[arg(long = "version")]
        app_version: Option<String>,
    },

    /// Manage AppLand contexts
    #[command(subcommand)]
    Context(ContextCommand),

    /// Login to AppLand
    Login {
        /// Use an existing API key
        #[arg(long, conflicts_with = "user", required_unless_present = "user")]
        api_key: Option<String>,

        /// Login name; the password is read from stdin
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Log out of AppLand
    Logout,

    /// Manage AppMap recordings
    #[command(subcommand)]
    Record(RecordCommand),

    /// Display version information
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextCommand {
    /// Add a new AppLand context
    Add { name: String, url: String },

    /// Show the current AppLand context
    Current,

    /// Set the value of a context variable (url, api_key, name)
    Set {
        variable: String,
        value: String,

        /// Name of a context (defaults to the current one)
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Change the current AppLand context
    Use { name: String },

    /// List all AppLand contexts
    List,
}

#[derive(Subcommand, Debug)]
enum RecordCommand {
    /// Start a new AppMap recording session
    Start { url: String },

    /// Check the current AppMap recording status
    Check { url: String },

    /// Stop the active recording session and save the AppMap
    Stop {
        url: String,

        /// Write the AppMap to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let mut store = ContextStore::locate(cli.config.as_deref());
    debug!("Using context '{}'", store.current_name());

    // Execute command
    match cli.command {
        Commands::Stats {
            paths,
            verbose,
            files,
            params,
            limit,
            json,
        } => {
            let options = StatsOptions {
                verbose,
                files,
                params,
                limit,
                json,
            };
            execute_stats(&paths, &options)?;
        }

        Commands::Upload {
            paths,
            app,
            branch,
            environment,
            app_version,
        } => {
            let context = store.current()?;
            let client = ApplandClient::new(context.url(), context.api_key())?;
            let args = UploadArgs {
                paths,
                app,
                branch,
                environment,
                version: app_version,
            };

            let report = execute_upload(&client, &args)?;
            println!("uploaded {} scenarios", report.scenarios);
            println!("view the mapset: {}", report.url);
        }

        Commands::Context(command) => run_context_command(&mut store, command)?,

        Commands::Login { api_key, user } => {
            let credentials = match (api_key, user) {
                (Some(key), _) => Credentials::ApiKey(key),
                (None, Some(user)) => Credentials::User(user),
                (None, None) => anyhow::bail!("either --api-key or --user is required"),
            };
            let message = execute_login(&mut store, credentials, io::stdin().lock())?;
            println!("{}", message);
        }

        Commands::Logout => {
            println!("{}", execute_logout(&mut store)?);
        }

        Commands::Record(RecordCommand::Start { url }) => {
            println!("{}", recording::start_recording(&url)?);
        }

        Commands::Record(RecordCommand::Check { url }) => {
            println!("{}", recording::check_recording(&url)?);
        }

        Commands::Record(RecordCommand::Stop { url, output }) => {
            if !recording::stop_recording(&url, output.as_deref(), io::stdout().lock())? {
                println!("No active recording session to stop");
            }
        }

        Commands::Version => {
            display_version();
        }
    }

    store.save().context("Failed to write config")?;

    Ok(())
}

fn run_context_command(store: &mut ContextStore, command: ContextCommand) -> Result<()> {
    match command {
        ContextCommand::Add { name, url } => {
            println!("{}", context_cmd::add_context(store, &name, &url)?);
        }
        ContextCommand::Current => {
            println!("{}", context_cmd::current_context(store)?);
        }
        ContextCommand::Set {
            variable,
            value,
            context,
        } => {
            let message = context_cmd::set_variable(store, context.as_deref(), &variable, &value)?;
            println!("{}", message);
        }
        ContextCommand::Use { name } => {
            println!("{}", context_cmd::use_context(store, &name)?);
        }
        ContextCommand::List => {
            for line in context_cmd::list_contexts(store) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("AppLand CLI v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Trace statistics, scenario uploads and context management for AppLand.");
}
