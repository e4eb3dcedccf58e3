use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::BackendKind;
use core_types::{Client, Reservation};
use database::{MemoryBackend, MongoBackend, PostgresBackend, connect, run_migrations};
use presenter::{BookingPresenter, BookingView};
use service::{BookingService, TransactionalBookingService};
use std::sync::Arc;
use transaction::{TransactionBackend, TransactionManager};

/// The main entry point for the booking application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(&cli.config)?;
    if let Some(backend) = cli.backend {
        config.database.backend = backend;
    }
    configuration::validate(&config)?;

    // Keep the guard alive so buffered log lines reach the file on exit.
    let _log_guard = configuration::init_tracing(&config.logger)?;
    tracing::debug!(backend = ?config.database.backend, "Configuration loaded.");

    match config.database.backend {
        BackendKind::Postgres => {
            let settings = &config.database.postgres;
            let pool = connect(settings).await?;
            run_migrations(&pool).await?;
            execute(
                PostgresBackend::new(pool, settings.isolation_level),
                cli.command,
            )
            .await
        }
        BackendKind::Mongo => {
            let backend = MongoBackend::connect(&config.database.mongo).await?;
            execute(backend, cli.command).await
        }
        BackendKind::Memory => {
            tracing::warn!("Using the in-memory backend; nothing outlives this process.");
            execute(MemoryBackend::new(), cli.command).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Manage clients and their reservations.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Overrides `database.backend` from the configuration file.
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all clients.
    Clients,
    /// List all reservations.
    Reservations,
    /// Register a new client.
    AddClient(NameArgs),
    /// Book a day for an existing client.
    AddReservation {
        #[command(flatten)]
        client: NameArgs,
        /// The day to book (format: YYYY-MM-DD).
        #[arg(long)]
        date: String,
    },
    /// Give an existing client a new name.
    RenameClient {
        #[command(flatten)]
        client: NameArgs,
        #[arg(long)]
        new_first_name: String,
        #[arg(long)]
        new_last_name: String,
    },
    /// Move a reservation to another day.
    Reschedule {
        /// The currently booked day (format: YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// The new day (format: YYYY-MM-DD).
        #[arg(long)]
        new_date: String,
    },
    /// Delete a client together with its reservations.
    DeleteClient(NameArgs),
    /// Delete the reservation booked on a day.
    DeleteReservation {
        /// The booked day (format: YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
    },
    /// Prepare the configured store (tables or indexes) and exit.
    Migrate,
}

#[derive(clap::Args)]
struct NameArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Runs one command against `backend` through the presenter.
async fn execute<B: TransactionBackend>(backend: B, command: Commands) -> anyhow::Result<()> {
    let service = Arc::new(TransactionalBookingService::new(TransactionManager::new(
        backend,
    )));
    let presenter = BookingPresenter::new(Arc::clone(&service), Arc::new(ConsoleView));

    match command {
        Commands::Clients => presenter.all_clients().await,
        Commands::Reservations => presenter.all_reservations().await,
        Commands::AddClient(name) => {
            presenter
                .add_client(&name.first_name, &name.last_name)
                .await
        }
        Commands::AddReservation { client, date } => {
            let client = lookup_client(service.as_ref(), &client).await?;
            presenter.add_reservation(&client, &date).await;
        }
        Commands::RenameClient {
            client,
            new_first_name,
            new_last_name,
        } => {
            let client = lookup_client(service.as_ref(), &client).await?;
            presenter
                .rename_client(&client, &new_first_name, &new_last_name)
                .await;
        }
        Commands::Reschedule { date, new_date } => {
            let reservation = lookup_reservation(service.as_ref(), date).await?;
            presenter
                .reschedule_reservation(&reservation, &new_date)
                .await;
        }
        Commands::DeleteClient(name) => {
            let client = lookup_client(service.as_ref(), &name).await?;
            presenter.delete_client(&client).await;
        }
        Commands::DeleteReservation { date } => {
            let reservation = lookup_reservation(service.as_ref(), date).await?;
            presenter.delete_reservation(&reservation).await;
        }
        Commands::Migrate => println!("The booking schema is up to date."),
    }
    Ok(())
}

/// The stored client a command refers to; a miss ends the run with an error.
async fn lookup_client(service: &impl BookingService, name: &NameArgs) -> anyhow::Result<Client> {
    let client = service
        .find_client_named(&name.first_name, &name.last_name)
        .await
        .with_context(|| format!("cannot look up {} {}", name.first_name, name.last_name))?;
    Ok(client)
}

async fn lookup_reservation(
    service: &impl BookingService,
    date: NaiveDate,
) -> anyhow::Result<Reservation> {
    let reservation = service
        .find_reservation_on(date)
        .await
        .with_context(|| format!("cannot look up the reservation on {date}"))?;
    Ok(reservation)
}

// ==============================================================================
// Console View
// ==============================================================================

/// Prints presenter callbacks to the terminal.
struct ConsoleView;

fn display_id(id: Option<uuid::Uuid>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

impl BookingView for ConsoleView {
    fn show_all_clients(&self, clients: &[Client]) {
        let mut table = Table::new();
        table.set_header(vec!["Id", "First name", "Last name"]);
        for client in clients {
            table.add_row(vec![
                display_id(client.id()),
                client.first_name().to_string(),
                client.last_name().to_string(),
            ]);
        }
        println!("{table}");
    }

    fn show_all_reservations(&self, reservations: &[Reservation]) {
        let mut table = Table::new();
        table.set_header(vec!["Id", "Date", "Client id"]);
        for reservation in reservations {
            table.add_row(vec![
                display_id(reservation.id()),
                reservation.date().to_string(),
                reservation.client_id().to_string(),
            ]);
        }
        println!("{table}");
    }

    fn client_added(&self, client: &Client) {
        println!("Added {client} ({}).", display_id(client.id()));
    }

    fn reservation_added(&self, reservation: &Reservation) {
        println!("Added {reservation} ({}).", display_id(reservation.id()));
    }

    fn client_removed(&self, client: &Client) {
        println!("Deleted {client}.");
    }

    fn reservation_removed(&self, reservation: &Reservation) {
        println!("Deleted {reservation}.");
    }

    fn client_renamed(&self, old: &Client, renamed: &Client) {
        println!("Renamed {old} to {renamed}.");
    }

    fn reservation_rescheduled(&self, old: &Reservation, rescheduled: &Reservation) {
        println!("Moved {old} to {}.", rescheduled.date());
    }

    fn show_operation_error(&self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn show_form_error(&self, message: &str) {
        eprintln!("Invalid input: {message}");
    }
}
