//! devport CLI - Manage port forwarding rules
//!
//! A command-line tool for adding, removing and listing the port
//! forwarding rules stored in a development config.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use devport_core::{AddPortRequest, ConfigStore, RemovePortRequest};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "devport")]
#[command(author, version, about = "Manage port forwarding rules in a dev config")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ~/.devport/config.json)
    #[arg(long, global = true, env = "DEVPORT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add something to the config
    Add {
        #[command(subcommand)]
        action: AddAction,
    },

    /// Remove something from the config
    #[command(alias = "rm")]
    Remove {
        #[command(subcommand)]
        action: RemoveAction,
    },

    /// List configured entries
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        action: ListAction,
    },
}

#[derive(Subcommand)]
enum AddAction {
    /// Forward local ports to pods or a service (e.g. 8080:80,443)
    Port {
        /// Port mappings as local:remote, comma separated
        mappings: String,

        /// Namespace of the target pods
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Label selector of the target pods (key=value,...)
        #[arg(short = 'l', long, default_value = "")]
        label_selector: String,

        /// Name of a configured dev selector to forward to
        #[arg(short, long, default_value = "")]
        service: String,
    },
}

#[derive(Subcommand)]
enum RemoveAction {
    /// Remove forwarded ports
    Port {
        /// Ports to remove, comma separated
        ports: Option<String>,

        /// Remove all port forwarding rules
        #[arg(long)]
        all: bool,

        /// Label selector of the rules to remove
        #[arg(short = 'l', long, default_value = "")]
        label_selector: String,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// List forwarded ports
    Ports {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let env = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let store = match cli.config {
        Some(path) => ConfigStore::with_path(path),
        None => ConfigStore::new()?,
    };

    match cli.command {
        Commands::Add { action } => match action {
            AddAction::Port {
                mappings,
                namespace,
                label_selector,
                service,
            } => {
                let request = AddPortRequest {
                    namespace,
                    label_selector,
                    service,
                    port_mappings: mappings,
                };
                commands::port::add(store, request).await?
            }
        },
        Commands::Remove { action } => match action {
            RemoveAction::Port {
                ports,
                all,
                label_selector,
            } => {
                let request = RemovePortRequest {
                    all,
                    label_selector,
                    ports,
                };
                commands::port::remove(store, request).await?
            }
        },
        Commands::List { action } => match action {
            ListAction::Ports { json } => commands::list::ports(store, json).await?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_only_on_list() {
        let cli = Cli::try_parse_from(["devport", "list", "ports", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                action: ListAction::Ports { json: true }
            }
        ));

        assert!(Cli::try_parse_from(["devport", "add", "port", "80", "--json"]).is_err());
        assert!(Cli::try_parse_from(["devport", "remove", "port", "80", "--json"]).is_err());
    }

    #[test]
    fn test_add_port_args() {
        let cli = Cli::try_parse_from(["devport", "add", "port", "8080:80", "-l", "app=web"]).unwrap();
        let Commands::Add {
            action: AddAction::Port {
                mappings,
                label_selector,
                service,
                ..
            },
        } = cli.command
        else {
            panic!("expected add port");
        };
        assert_eq!(mappings, "8080:80");
        assert_eq!(label_selector, "app=web");
        assert!(service.is_empty());
    }
}
