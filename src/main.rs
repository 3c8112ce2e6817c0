//! Binary entrypoint for the Ratoncito CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `health` - probe the backend
//! - `start --lat <lat> --lng <lng>` - start an adventure at a position
//! - `route --categories museos,parques` - build a route from categories
//! - `nearby-route --lat <lat> --lng <lng>` - backend route near a position
//! - `challenge --place <name>` - generate a challenge for a place
//! - `validate --place <name> --challenge <text> --answer <text>` - grade an answer
//! - `walk --categories ...` - build a route and complete it stop by stop
//! - `chat --place <name> <message>` - one exchange with the Ratoncito
//! - `themes` - list the thematic routes
//!
//! `--stats` prints backend vs fallback counters after any command.
//!
//! See the library crate docs for module-level details: `ratoncito::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;

use ratoncito::adventure::chat::ChatSession;
use ratoncito::adventure::family::FamilyId;
use ratoncito::adventure::AdventureClient;
use ratoncito::api::HttpBackend;
use ratoncito::config::Config;
use ratoncito::content::{self, catalog};
use ratoncito::metrics;
use ratoncito::model::Coordinates;
use ratoncito::tracker::RouteTracker;
use ratoncito::validation::{parse_ages, validate_ages, validate_coordinates};

#[derive(Parser)]
#[command(name = "ratoncito")]
#[command(about = "Adventure, route and challenge client for the Ratoncito Pérez Madrid scavenger hunt")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print backend/fallback counters when the command finishes
    #[arg(long, global = true)]
    stats: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Check whether the backend answers
    Health,
    /// Start an adventure at a position
    Start {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Children's ages, comma separated (e.g. 6,8)
        #[arg(long)]
        ages: Option<String>,
    },
    /// Generate a route from thematic categories
    Route {
        /// Comma separated categories (museos, parques, teatros, historia, gastronomia)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        #[arg(long)]
        ages: Option<String>,
    },
    /// Ask the backend for a route near a position
    NearbyRoute {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        ages: Option<String>,
    },
    /// Generate a challenge for a place
    Challenge {
        #[arg(long)]
        place: String,
        #[arg(long)]
        ages: Option<String>,
        /// Print the story-mode mission for the place instead of asking the backend
        #[arg(long)]
        narrative: bool,
    },
    /// Validate an answer to a challenge
    Validate {
        #[arg(long)]
        place: String,
        #[arg(long)]
        challenge: String,
        #[arg(long)]
        answer: String,
        /// Family id to record the visit and completion for
        #[arg(long)]
        family: Option<String>,
    },
    /// Generate a route and complete every stop in order
    Walk {
        #[arg(long, value_delimiter = ',')]
        categories: Vec<String>,
        #[arg(long)]
        ages: Option<String>,
    },
    /// Send one message to the Ratoncito chatbot
    Chat {
        #[arg(long, default_value = "Plaza Mayor")]
        place: String,
        message: String,
        #[arg(long)]
        ages: Option<String>,
    },
    /// List the thematic routes
    Themes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let loaded = Config::load(&cli.config).await;
    init_logging(&loaded.as_ref().ok().cloned(), cli.verbose);
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("{} (using defaults)", e);
            Config::default()
        }
    };
    config.apply_env_overrides();
    info!("Using backend at {}", config.api.base_url);

    let default_ages = config.adventure.default_children_ages.clone();
    let ages_or_default = |ages: &Option<String>| -> Result<Vec<u8>> {
        match ages {
            Some(text) => Ok(parse_ages(text)?),
            None => {
                validate_ages(&default_ages)?;
                Ok(default_ages.clone())
            }
        }
    };
    let default_location = config.adventure.default_location();
    let client = AdventureClient::new(
        HttpBackend::new(config.api.clone()),
        config.adventure.clone(),
    );

    match &cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Health => {
            let health = client.check_health().await;
            print_json(&health)?;
            if !health.reachable {
                std::process::exit(1);
            }
        }
        Commands::Start { lat, lng, ages } => {
            let location = validate_coordinates(Coordinates::new(*lat, *lng))?;
            let adventure = client
                .start_adventure(location, &ages_or_default(ages)?)
                .await;
            print_json(&adventure)?;
        }
        Commands::Route {
            categories,
            lat,
            lng,
            ages,
        } => {
            let location = match (lat, lng) {
                (Some(lat), Some(lng)) => validate_coordinates(Coordinates::new(*lat, *lng))?,
                _ => default_location,
            };
            let route = client
                .generate_route(categories, location, &ages_or_default(ages)?)
                .await;
            print_json(&route)?;
        }
        Commands::NearbyRoute { lat, lng, ages } => {
            let location = validate_coordinates(Coordinates::new(*lat, *lng))?;
            let route = client
                .generate_nearby_route(location, &ages_or_default(ages)?)
                .await;
            print_json(&route)?;
        }
        Commands::Challenge {
            place,
            narrative: true,
            ..
        } => {
            println!("{}", content::narrative_challenge_for(place));
        }
        Commands::Challenge { place, ages, .. } => {
            let challenge = client
                .generate_challenge(place, &ages_or_default(ages)?, None)
                .await;
            print_json(&challenge)?;
        }
        Commands::Validate {
            place,
            challenge,
            answer,
            family,
        } => {
            let family = family.as_deref().and_then(FamilyId::parse);
            let result = client
                .validate_answer(place, challenge, answer, family.as_ref())
                .await;
            print_json(&result)?;
        }
        Commands::Walk { categories, ages } => {
            let ages = ages_or_default(ages)?;
            let route = client
                .generate_route(categories, default_location, &ages)
                .await;
            println!("{} ({} lugares, {:?})", route.name, route.len(), route.source);
            let path: Vec<String> = route
                .polyline()
                .iter()
                .map(|c| format!("({:.4}, {:.4})", c.latitude, c.longitude))
                .collect();
            println!("   {}", path.join(" → "));
            let mut tracker = RouteTracker::new();
            tracker.select_route(route);
            while let Some(place) = tracker.current_place().cloned() {
                let challenge = client
                    .generate_challenge(&place.name, &ages, Some(&place))
                    .await;
                let index = tracker.current_index();
                tracker.complete_place(index);
                println!(
                    "[{:>3}%] {} - {}",
                    tracker.progress_percent(),
                    place.name,
                    challenge.challenge
                );
                if tracker.is_complete() {
                    break;
                }
            }
        }
        Commands::Chat {
            place,
            message,
            ages,
        } => {
            let mut session = ChatSession::new(place.clone(), ages_or_default(ages)?);
            let reply = client.send_message(&mut session, message).await;
            print_json(&reply)?;
        }
        Commands::Themes => {
            for theme in catalog::thematic_routes() {
                println!("{} {} [{}]", theme.icon, theme.name, theme.key);
                println!("   {}", theme.description);
                println!("   {}", theme.places.join(" → "));
            }
            println!();
            println!("Paseos entre paradas de la ruta clásica:");
            for stop in catalog::madrid_itinerary() {
                let next = catalog::neighbours(stop.name);
                if !next.is_empty() {
                    println!("   {} → {}", stop.name, next.join(", "));
                }
            }
        }
    }

    if cli.stats {
        print_stats();
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_stats() {
    let snapshot = metrics::snapshot();
    println!(
        "requests: {} sent, {} failed, {} timed out, avg {} ms",
        snapshot.requests_sent,
        snapshot.requests_failed,
        snapshot.request_timeouts,
        snapshot
            .latency_avg_ms
            .map(|ms| ms.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    let mut counters: Vec<_> = metrics::operation_counters_snapshot().into_iter().collect();
    counters.sort_by(|a, b| a.0.cmp(&b.0));
    for (operation, counter) in counters {
        println!(
            "{:<16} backend {:>3}  fallback {:>3}",
            operation, counter.backend, counter.fallback
        );
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(Config::log_level)
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|cfg| cfg.logging.file.clone());
    let opened = log_file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    if let Some(f) = opened {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Echo to the console only when someone is watching it
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
