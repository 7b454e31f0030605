//! HealthConnect demo binary - composition root.
//!
//! Ties the crates together into a terminal booking assistant:
//! 1. Load configuration from TOML
//! 2. Initialize the document store (SQLite file or in-memory)
//! 3. Seed the demo specialty/doctor directory if the store is empty
//! 4. Run a line-oriented chat loop against the booking controller
//!
//! Commands inside the loop: `/appointments` lists the signed-in patient's
//! bookings, `/quit` exits. Everything else goes to the assistant.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use healthconnect_booking::{
    sort_appointments, AnonymousProvider, AppointmentService, FixedIdentityProvider,
    IdentityProvider,
};
use healthconnect_chat::{BookingController, BookingSession, BotReply};
use healthconnect_core::config::HealthConnectConfig;
use healthconnect_core::error::Result;
use healthconnect_store::{seed, DocumentStore, MemoryStore, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "healthconnect", about = "HealthConnect booking assistant")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Use an in-memory store instead of the SQLite file.
    #[arg(long)]
    memory: bool,

    /// Display name of the signed-in demo patient.
    #[arg(long, default_value = "Alex Morgan")]
    name: String,

    /// Run with nobody signed in.
    #[arg(long)]
    anonymous: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => HealthConnectConfig::load_or_default(path),
        None => HealthConnectConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.general.log_level.clone())),
        )
        .init();

    let store = open_store(&args, &config)?;
    seed::seed_demo_data(store.as_ref()).await?;

    let identity: Arc<dyn IdentityProvider> = if args.anonymous {
        Arc::new(AnonymousProvider)
    } else {
        Arc::new(FixedIdentityProvider::patient("demo-patient", &args.name))
    };

    let service = Arc::new(AppointmentService::new(Arc::clone(&store), identity));
    let controller = BookingController::new(Arc::clone(&service), &config.chat);

    run_chat_loop(&controller, &service, &config).await
}

fn open_store(args: &Args, config: &HealthConnectConfig) -> Result<Arc<dyn DocumentStore>> {
    if args.memory {
        tracing::info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| expand_home(&config.general.data_dir));
    let path = data_dir.join(&config.storage.database_file);
    Ok(Arc::new(SqliteStore::open(&path)?))
}

/// Expand a leading `~/` against `$HOME`; otherwise use the path as-is.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

async fn run_chat_loop(
    controller: &BookingController,
    service: &AppointmentService,
    config: &HealthConnectConfig,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut session = BookingSession::new();

    print_reply(
        &mut stdout,
        &BotReply::text(
            "Hello! How can I help with your healthcare needs today? \
             (Try \"book an appointment\", /appointments, or /quit.)",
        ),
    )
    .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/appointments" => {
                print_appointments(&mut stdout, service).await?;
                continue;
            }
            _ => {}
        }

        let was_active = session.active;
        match controller.handle_message(&mut session, input).await {
            Ok(replies) => {
                for reply in &replies {
                    print_reply(&mut stdout, reply).await?;
                }
            }
            Err(e) => {
                print_reply(&mut stdout, &BotReply::text(format!("({})", e))).await?;
            }
        }

        // Visible pause before accepting input into the fresh session.
        if was_active && !session.active {
            tokio::time::sleep(tokio::time::Duration::from_millis(config.chat.reset_delay_ms))
                .await;
        }
    }

    stdout.write_all(b"Goodbye!\n").await?;
    Ok(())
}

async fn print_reply(stdout: &mut io::Stdout, reply: &BotReply) -> Result<()> {
    stdout
        .write_all(format!("assistant: {}\n", reply.text).as_bytes())
        .await?;
    for (i, option) in reply.options.iter().enumerate() {
        stdout
            .write_all(format!("  {}. {}\n", i + 1, option).as_bytes())
            .await?;
    }
    Ok(())
}

async fn print_appointments(
    stdout: &mut io::Stdout,
    service: &AppointmentService,
) -> Result<()> {
    match service.list_my_appointments().await {
        Ok(mut appointments) => {
            if appointments.is_empty() {
                stdout.write_all(b"No appointments yet.\n").await?;
                return Ok(());
            }
            sort_appointments(&mut appointments);
            for a in &appointments {
                stdout
                    .write_all(
                        format!(
                            "{}  {} {}  {} ({})  [{}]\n",
                            a.id, a.date, a.time, a.doctor_name, a.specialty, a.status
                        )
                        .as_bytes(),
                    )
                    .await?;
            }
        }
        Err(e) => {
            stdout.write_all(format!("{}\n", e).as_bytes()).await?;
        }
    }
    Ok(())
}
