//! Entry point: parse CLI and dispatch to command handlers or the server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oarlock::commands::{
    handle_boat_classes, handle_calculate, handle_head_to_head, handle_rankings,
};
use oarlock::speed::DistanceOverTime;
use oarlock::{server, TeamId};

#[derive(Parser)]
#[command(name = "oarlock", version, about = "Race-result aggregation and team speed rankings")]
struct Oarlock {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Database file (default: OARLOCK_DB env var, else the platform
        /// data directory).
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// List boat classes with recorded own-team results.
    BoatClasses {
        #[arg(long)]
        team: i64,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Build the speed leaderboard for one boat class.
    Rankings {
        #[arg(long)]
        team: i64,
        #[arg(long)]
        boat_class: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Race history against one named opponent.
    HeadToHead {
        #[arg(long)]
        team: i64,
        #[arg(long)]
        opponent: String,
        #[arg(long)]
        boat_class: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Recompute and store the cached speed estimate for one scope.
    Calculate {
        #[arg(long)]
        team: i64,
        #[arg(long)]
        boat_class: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = Oarlock::parse();

    match app.command {
        Commands::Serve { host, port, db } => {
            server::run(
                &host,
                port,
                db.as_deref(),
                Arc::new(DistanceOverTime::default()),
            )
            .await?;
        }
        Commands::BoatClasses { team, season, db } => {
            handle_boat_classes(db.as_ref(), TeamId::new(team), season.as_deref())?
        }
        Commands::Rankings {
            team,
            boat_class,
            season,
            db,
        } => handle_rankings(
            db.as_ref(),
            TeamId::new(team),
            &boat_class,
            season.as_deref(),
        )?,
        Commands::HeadToHead {
            team,
            opponent,
            boat_class,
            season,
            db,
        } => handle_head_to_head(
            db.as_ref(),
            TeamId::new(team),
            &opponent,
            &boat_class,
            season.as_deref(),
        )?,
        Commands::Calculate {
            team,
            boat_class,
            season,
            db,
        } => handle_calculate(
            db.as_ref(),
            TeamId::new(team),
            &boat_class,
            season.as_deref(),
        )?,
    }

    Ok(())
}
