//! Cockpit CLI — guided blog article wizard and image studio.
//!
//! Reuses the same core domain logic (cockpit-core) and server bootstrap
//! (cockpit-server) that back the web UI.

mod commands;

use clap::{Parser, Subcommand};

use cockpit_core::config::CockpitConfig;

/// Content Cockpit CLI — AI-assisted blog articles and images
#[derive(Parser)]
#[command(name = "cockpit", version, about = "Content Cockpit CLI — AI-assisted blog articles and images")]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(long, env = "COCKPIT_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Cockpit HTTP backend server
    Server {
        /// Host to bind to (defaults to the config's server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (defaults to the config's server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a blog article step by step in the terminal
    Wizard {
        /// Start right away with this topic
        #[arg(long)]
        topic: Option<String>,
        /// Use a running cockpit server instead of calling Gemini directly
        /// (e.g. "http://127.0.0.1:3210/api")
        #[arg(long)]
        remote: Option<String>,
    },

    /// Generate a single image
    Image {
        /// Image prompt
        #[arg(long)]
        prompt: String,
        /// Style filter to append (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Reference image file
        #[arg(long)]
        reference: Option<String>,
        /// Output file (defaults to a name derived from the prompt)
        #[arg(long, short = 'o')]
        output: Option<String>,
        /// Use a running cockpit server instead of calling Gemini directly
        #[arg(long)]
        remote: Option<String>,
    },

    /// List the available image style filters
    Filters,

    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (API key masked)
    Show,
    /// Print the configured internal links
    Links,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cockpit_core=warn,cockpit_server=info,cockpit_cli=info".into()),
        )
        .init();

    let result = match CockpitConfig::load(cli.config.as_deref()) {
        Err(e) => Err(e),
        Ok(config) => match cli.command {
            Some(Commands::Server { host, port }) => {
                commands::server::run(config, host, port).await
            }

            Some(Commands::Wizard { topic, remote }) => {
                let gateway = commands::gateway(&config, remote.as_deref());
                commands::wizard::run(&config, gateway, topic).await
            }

            Some(Commands::Image {
                prompt,
                filters,
                reference,
                output,
                remote,
            }) => {
                let gateway = commands::gateway(&config, remote.as_deref());
                commands::image::run(
                    gateway,
                    &prompt,
                    &filters,
                    reference.as_deref(),
                    output.as_deref(),
                )
                .await
            }

            Some(Commands::Filters) => commands::image::list_filters(),

            Some(Commands::Config { action }) => match action {
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Links => commands::config::links(&config),
            },

            None => {
                // No subcommand — show help
                use clap::CommandFactory;
                Cli::command().print_help().ok();
                println!();
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
