use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use configuration::{LoggingSettings, ServerOverrides, Settings};
use core_types::validation::{validate_registration, RegistrationInput, UniquenessCheck};
use database::{connect, run_migrations, DbRepository, NewUser};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, FmtSubscriber};

/// The main entry point for the FitGym catalog application.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = configuration::load_settings(cli.config.as_deref())
        .context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(overrides) => {
            settings.apply_overrides(&overrides);
            settings.validate()?;
            web_server::run_server(settings).await?;
        }
        Commands::Migrate => handle_migrate(&settings).await?,
        Commands::CreateUser(args) => handle_create_user(args, &settings).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A gym catalog of workouts and exercises, served over HTTP.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to `fitgym.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and start the web server.
    Serve(ServerOverrides),
    /// Apply pending database migrations and exit.
    Migrate,
    /// Create an account without going through the registration form.
    CreateUser(CreateUserArgs),
}

#[derive(Parser)]
struct CreateUserArgs {
    #[arg(long)]
    username: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    password: String,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Installs the global subscriber. `RUST_LOG` wins over `logging.filter`.
///
/// With `logging.directory` set, events also go to a daily rolling file; the
/// returned guard must outlive the program's logging.
fn init_tracing(logging: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .context("Invalid logging filter")?;

    match &logging.directory {
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            Ok(None)
        }
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "fitgym.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()?;
            Ok(Some(guard))
        }
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_migrate(settings: &Settings) -> Result<()> {
    let pool = connect(&settings.database).await?;
    run_migrations(&pool).await?;
    tracing::info!(url = %settings.database.url, "Database is up to date.");
    Ok(())
}

/// Runs the same checks as the registration form, then stores the account.
async fn handle_create_user(args: CreateUserArgs, settings: &Settings) -> Result<()> {
    let pool = connect(&settings.database).await?;
    run_migrations(&pool).await?;
    let repo = DbRepository::new(pool);

    let input = RegistrationInput {
        username: args.username,
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password1: args.password.clone(),
        password2: args.password,
    };
    let existing = UniquenessCheck {
        username_taken: repo.username_exists(input.username.trim()).await?,
        email_taken: repo.email_exists(input.email.trim()).await?,
    };

    let valid = match validate_registration(&input, existing) {
        Ok(valid) => valid,
        Err(errors) => {
            for error in errors.iter() {
                eprintln!(
                    "{}: {}",
                    error.field.as_deref().unwrap_or("form"),
                    error.message
                );
            }
            bail!("The account was not created.");
        }
    };

    let password_hash = web_server::auth::hash_password(&valid.password)?;
    let user = repo
        .create_user(&NewUser {
            username: valid.username,
            email: valid.email,
            first_name: valid.first_name,
            last_name: valid.last_name,
            password_hash,
        })
        .await?;

    println!("Created user '{}' (id {}).", user.username, user.id);
    Ok(())
}
