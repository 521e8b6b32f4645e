//! Court Booking: club administration CLI
//!
//! Opens (or seeds) the club snapshot and runs one administrative command
//! against it as the seed admin.
//!
//! ```sh
//! # Default config (~/.config/court-booking/config.toml)
//! court-booking courts
//!
//! # Slot status for every court, one slot or the whole day
//! court-booking availability --date 2024-01-10 --time 10:00
//! court-booking availability --date 2024-01-10
//!
//! # Maintenance
//! court-booking block --court c2 --date 2024-01-10 --time 10:00 --reason "Net repair"
//! court-booking unblock --id blk_...
//!
//! # Validate config without touching the snapshot
//! court-booking --check
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use court_booking::config::AppConfig;
use court_booking::domain::court::slot_times;
use court_booking::domain::reservation::parse_date_iso;
use court_booking::domain::NewBlock;
use court_booking::infrastructure::{DniParitySocioVerifier, JsonFileSnapshotStore, SimulatedGateway};
use court_booking::{ClubService, DomainError, ServiceSettings};

/// Court Booking: tennis club reservations, maintenance and audit.
#[derive(Parser, Debug)]
#[command(
    name = "court-booking",
    version,
    about = "Tennis club court booking administration",
    long_about = "Court Booking: reservations, payments and maintenance blocks \
                  for a tennis club, kept in a single JSON snapshot.\n\n\
                  Default config: ~/.config/court-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "COURT_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit.
    #[arg(long)]
    check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List courts and whether they are active.
    Courts,
    /// Show the newest audit entries.
    Audit {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show every court's status for one slot, or for the whole day.
    Availability {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:00; every slot of the day when omitted
        #[arg(long)]
        time: Option<String>,
    },
    /// Activate or deactivate a court.
    SetCourt {
        #[arg(long)]
        id: String,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Block a slot for maintenance.
    Block {
        #[arg(long)]
        court: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Remove a maintenance block.
    Unblock {
        #[arg(long)]
        id: String,
    },
}

fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(court_booking::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    if let Some(e) = load_error {
        error!("Failed to load config from {}: {}", config_path.display(), e);
        if cli.check {
            return Err(e.into());
        }
        error!("Using default configuration.");
    } else {
        info!("Configuration loaded from {}", config_path.display());
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Snapshot    : {}", config.storage.snapshot_path.display());
        println!("   Channels    : {}", config.notifications.channels.join(", "));
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Open the club ──────────────────────────────────────────
    let store = Arc::new(JsonFileSnapshotStore::new(&config.storage.snapshot_path));
    let service = ClubService::builder(store)
        .socio_verifier(Arc::new(DniParitySocioVerifier::new(
            config.simulation.socio_latency(),
        )))
        .payment_gateway(Arc::new(SimulatedGateway::new(
            config.simulation.gateway_latency(),
        )))
        .settings(ServiceSettings::from(&config))
        .open()
        .await?;

    let admin_id = service
        .snapshot()
        .user_by_email(&config.seed.admin_email)
        .filter(|u| u.is_admin())
        .map(|u| u.id.clone())
        .ok_or_else(|| DomainError::not_found("User", "email", &config.seed.admin_email))?;

    match cli.command.unwrap_or(Command::Courts) {
        Command::Courts => {
            for court in service.courts() {
                let status = if court.is_active { "active" } else { "inactive" };
                println!("{:<4} {:<10} {}", court.id, court.name, status);
            }
        }
        Command::Audit { limit } => {
            for entry in service.audit_entries(Some(limit)) {
                println!(
                    "{}  {:<12} {:<38} {}",
                    entry.at.format("%Y-%m-%d %H:%M:%S"),
                    entry.action,
                    entry.by,
                    entry.detail
                );
            }
        }
        Command::Availability { date, time } => {
            let date = parse_date_iso(&date)?;
            let times = time.map(|t| vec![t]).unwrap_or_else(slot_times);
            for time in times {
                for slot in service.availability(date, &time) {
                    println!(
                        "{}  {:<4} {:<10} {}",
                        time, slot.court_id, slot.name, slot.availability
                    );
                }
            }
        }
        Command::SetCourt { id, active } => {
            service.set_court_active(&admin_id, &id, active).await?;
        }
        Command::Block {
            court,
            date,
            time,
            reason,
        } => {
            let date = parse_date_iso(&date)?;
            let block_id = service
                .add_block(&admin_id, NewBlock::new(court, date, time, reason))
                .await?;
            println!("{}", block_id);
        }
        Command::Unblock { id } => {
            service.remove_block(&admin_id, &id).await?;
        }
    }

    Ok(())
}
