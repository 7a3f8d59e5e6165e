use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use ddev_core::sequelpro::{SequelproCommand, SequelproConfig};

mod commands;

/// ddev - manage local development environments
#[derive(Parser)]
#[command(name = "ddev")]
#[command(about = "Manage local development environments")]
#[command(version)]
struct Cli {
    /// Directory holding all ddev projects (defaults to ~/ddev-projects)
    #[arg(long, global = true)]
    projects_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List applications
    List {
        /// Emit the raw project descriptors as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // The capability probe runs exactly once, at command registration time.
    let sequelpro_config = SequelproConfig::from_env();
    let variant = SequelproCommand::resolve(sequelpro_config.detect(), std::env::consts::OS);

    let command = register_sequelpro(Cli::command(), variant);
    let matches = command.get_matches();

    if matches.subcommand_name() == Some("sequelpro") {
        let projects_root = resolve_projects_root(matches.get_one::<PathBuf>("projects_root").cloned());
        return commands::sequelpro::execute(variant, &projects_root).await;
    }

    let cli = Cli::from_arg_matches(&matches)?;
    let projects_root = resolve_projects_root(cli.projects_root);

    match cli.command {
        Commands::List { json } => commands::list::execute(&projects_root, json).await,
    }
}

/// Attach the sequelpro subcommand variant chosen at startup. An absent
/// variant registers nothing, so invoking it gets clap's usual
/// unknown-command error.
fn register_sequelpro(command: Command, variant: SequelproCommand) -> Command {
    match variant {
        SequelproCommand::Functional => command.subcommand(
            Command::new("sequelpro")
                .about("Connect sequelpro to a project database")
                .long_about(
                    "A helper command for using Sequel Pro (macOS database browser) with a running ddev project's database.",
                ),
        ),
        SequelproCommand::Stub => command.subcommand(
            Command::new("sequelpro")
                .about("This command is not available since Sequel Pro.app is not installed")
                .arg(
                    Arg::new("ignored")
                        .num_args(0..)
                        .allow_hyphen_values(true)
                        .trailing_var_arg(true)
                        .hide(true),
                ),
        ),
        SequelproCommand::Absent => command,
    }
}

fn resolve_projects_root(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("DDEV_PROJECTS_ROOT").map(PathBuf::from))
        .or_else(|| dirs::home_dir().map(|home| home.join("ddev-projects")))
        .unwrap_or_else(|| PathBuf::from("."))
}
