use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "itinera_admin")]
#[command(about = "Admin utilities for Itinera (users, trip recovery, budget upkeep)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./itinera.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Trip(Trip),
    Budget(Budget),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a user and print its bearer token.
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: Option<String>,
}

#[derive(Args, Debug)]
struct Trip {
    #[command(subcommand)]
    command: TripCommand,
}

#[derive(Subcommand, Debug)]
enum TripCommand {
    /// Bring back a deleted trip with its cities and activities.
    Restore(TripRestoreArgs),
}

#[derive(Args, Debug)]
struct TripRestoreArgs {
    /// Owner username.
    #[arg(long)]
    user: String,
    #[arg(long)]
    trip: Uuid,
}

#[derive(Args, Debug)]
struct Budget {
    #[command(subcommand)]
    command: BudgetCommand,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Recompute the stored budget aggregates of every trip.
    Recompute,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => match engine.create_user(&args.username, args.email.as_deref()).await {
            Ok((user_id, token)) => {
                println!("created user: {} ({user_id})", args.username);
                println!("access token: {token}");
            }
            Err(EngineError::Validation(err)) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },
        Command::Trip(Trip {
            command: TripCommand::Restore(args),
        }) => {
            let owner = match engine.user_by_username(&args.user).await {
                Ok(owner) => owner,
                Err(EngineError::KeyNotFound(_)) => {
                    eprintln!("user not found: {}", args.user);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };
            match engine.restore_trip(owner.id, args.trip).await {
                Ok(trip) => println!("restored trip: {} ({})", trip.name, trip.id),
                Err(EngineError::KeyNotFound(_)) => {
                    eprintln!("no deleted trip {} owned by {}", args.trip, args.user);
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Budget(Budget {
            command: BudgetCommand::Recompute,
        }) => {
            let rewritten = engine.recompute_all_budgets().await?;
            println!("recomputed budgets, {rewritten} trip(s) were stale");
        }
    }
    Ok(())
}
