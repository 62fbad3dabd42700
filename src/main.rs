use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use school_climate_survey::{config::Config, db, server};

#[derive(Parser)]
#[command(name = "school-climate-survey")]
#[command(about = "School environment survey collection service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the survey API and the questionnaire bundle
    Serve,
    /// Create the submission tables if they do not exist
    InitDb,
    /// Load a starter set of school names into the directory
    Seed,
    /// Import school names from a CSV file with a `school_name` column
    ImportSchools {
        #[arg(long)]
        csv: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve => {
            server::start_server(&config).await?;
        }
        Commands::InitDb => {
            let pool = db::connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = db::connect(&config).await?;
            let inserted = db::seed(&pool).await?;
            println!("Inserted {inserted} school names.");
        }
        Commands::ImportSchools { csv } => {
            let pool = db::connect(&config).await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} school names from {}.", csv.display());
        }
    }

    Ok(())
}
