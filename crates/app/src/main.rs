use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "fardaria-admin", version, about = "Portfolio admin for the Fardaria site")]
struct Cli {
    /// Override the data directory (defaults to the platform app-data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import portfolio records from a CSV file, with a preview step.
    Import {
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Export every record to portfolio_YYYY-MM-DD.csv.
    Export {
        /// Directory to write into (defaults to the configured export dir).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List portfolio records.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a single record.
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        project_link: Option<String>,
        #[arg(long)]
        project_date: Option<String>,
        #[arg(long, default_value_t = 0)]
        order: i64,
        /// Create the record hidden from the public site.
        #[arg(long)]
        hidden: bool,
    },
    /// Delete a record.
    Remove {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Make a record visible on the public site.
    Show { id: i64 },
    /// Hide a record from the public site.
    Hide { id: i64 },
    /// Validate an image, copy it into the images dir, and attach it.
    AttachImage { id: i64, file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = config::AdminConfig::load(cli.data_dir)?;

    std::fs::create_dir_all(&config.data_dir)?;
    tracing::debug!("Using data dir {}", config.data_dir.display());
    let db = fardaria_storage::create_db(&config.data_dir.join("portfolio.db")).await?;

    match cli.command {
        Command::Import { file, yes } => commands::import(&db, &file, yes).await,
        Command::Export { out } => {
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            commands::export(&db, &dir).await
        }
        Command::List { json } => commands::list(&db, json).await,
        Command::Add {
            title,
            description,
            client,
            category,
            image_url,
            project_link,
            project_date,
            order,
            hidden,
        } => {
            let record = fardaria_core::PortfolioRecord {
                title,
                description,
                client,
                category,
                image_url,
                project_link,
                project_date,
                order,
                visible: !hidden,
            };
            commands::add(&db, record).await
        }
        Command::Remove { id, yes } => commands::remove(&db, id, yes).await,
        Command::Show { id } => commands::set_visibility(&db, id, true).await,
        Command::Hide { id } => commands::set_visibility(&db, id, false).await,
        Command::AttachImage { id, file } => {
            commands::attach_image(&db, &config.images_dir, id, &file).await
        }
    }
}
