use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "nsconf",
    about = "nsconf: Kubernetes namespace provisioning",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Config file (default: ./nsconf.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a fresh default namespace record
    New {
        /// Output format: json or summary
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Validate a record file. Legacy records are upgraded first.
    Validate {
        file: PathBuf,
    },
    /// Print the current-schema form of a (possibly legacy) record file
    Migrate {
        file: PathBuf,
    },
    /// List namespaces from the configured data source
    List,
    /// Print one namespace from the configured data source
    Show {
        id: String,
    },
    /// Edit a namespace and submit it.
    ///
    /// Edits are `path=value` pairs, e.g. `kubernetesQuotas.pods=40` or
    /// `techArchReview.approved=yes`. List fields take JSON.
    Edit {
        /// Namespace id to edit
        #[arg(required_unless_present = "new")]
        id: Option<String>,
        /// Start from a new default record instead
        #[arg(long, conflicts_with = "id")]
        new: bool,
        /// Field edit as path=value (repeatable)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        sets: Vec<String>,
        /// Replace the egress list with these domain[:port] entries (repeatable)
        #[arg(long, value_name = "DOMAIN[:PORT]")]
        egress: Vec<String>,
        /// Identity claims document ({"profile": {...}})
        #[arg(long)]
        claims: Option<PathBuf>,
    },
    /// Show the access decision for an identity
    Auth {
        /// Identity claims document ({"profile": {...}})
        #[arg(long)]
        claims: Option<PathBuf>,
    },
    /// Show or toggle the theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Write an nsconf.toml scaffold
    InitConfig {
        #[arg(short, long, default_value = "nsconf.toml")]
        path: PathBuf,
        /// Use a JSON data file as the namespace source
        #[arg(long)]
        data_file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between dark and light
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nsconf=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::InitConfig { path, data_file, force } = &cli.command {
        return commands::config::init(path, data_file.as_deref(), *force);
    }

    let config = commands::config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::New { format } => commands::record::new(&format),
        Commands::Validate { file } => commands::record::validate(&file),
        Commands::Migrate { file } => commands::record::migrate(&file),
        Commands::List => commands::catalog::list(&config).await,
        Commands::Show { id } => commands::catalog::show(&config, &id).await,
        Commands::Edit {
            id,
            new,
            sets,
            egress,
            claims,
        } => {
            let target = match id {
                Some(id) if !new => commands::edit::Target::Existing(id),
                _ => commands::edit::Target::New,
            };
            commands::edit::edit(&config, target, &sets, &egress, claims.as_deref()).await
        }
        Commands::Auth { claims } => commands::auth::auth(&config, claims.as_deref()).await,
        Commands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => commands::theme::show(&config),
            ThemeAction::Toggle => commands::theme::toggle(&config),
        },
        Commands::InitConfig { .. } => Ok(()),
    }
}
