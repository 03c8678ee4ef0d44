//! WDPRO Facilities CLI
//!
//! Command-line interface for looking up facility-service entities.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use wdpro_facilities::{
    normalize_name, ApiClient, ChildCollection, ClientOptions, Entity, EntityKind,
    FacilityCache, FacilityService, MemoryCache, SqliteCache, DEFAULT_BASE_URL,
};

#[derive(Parser)]
#[command(name = "wdpro-facilities")]
#[command(about = "Look up theme-park entities and their ancestors")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// API host
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Local sync database (cache-dependent fields are null without it)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Extra request header as NAME:VALUE (repeatable)
    #[arg(long = "header", short = 'H', global = true, value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one entity and print its descriptor
    Show {
        /// Entity kind (e.g. character, attractions, theme-park)
        kind: EntityKind,

        /// Entity id
        id: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the ids the service knows for a kind
    Ids {
        /// Entity kind
        kind: EntityKind,
    },

    /// Print an entity's related locations
    Related {
        kind: EntityKind,
        id: String,

        /// Resolve each location instead of printing id and type
        #[arg(long)]
        resolve: bool,
    },

    /// Print an entity's associated entertainment events
    Events {
        kind: EntityKind,
        id: String,

        /// Resolve each event instead of printing its id
        #[arg(long)]
        resolve: bool,
    },

    /// Resolve a destination's theme parks, water parks, entertainments or attractions
    Children {
        /// Destination id
        id: String,

        /// Collection: theme-parks, water-parks, entertainments, attractions
        collection: ChildCollection,
    },

    /// Normalize a display name (no network access)
    Normalize {
        text: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(&cli.global, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got '{}'", s))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

type Service = FacilityService<Box<dyn FacilityCache>>;

fn build_service(global: &GlobalArgs) -> Result<Service, u8> {
    let cache: Box<dyn FacilityCache> = match &global.cache {
        Some(path) => Box::new(SqliteCache::open(path).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?),
        None => Box::new(MemoryCache::new()),
    };

    let options = global.headers.iter().fold(
        ClientOptions::new()
            .base_url(global.base_url.as_str())
            .timeout(Duration::from_secs(global.timeout)),
        |options, (name, value)| options.header(name.as_str(), value.as_str()),
    );

    let client = ApiClient::new(options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    Ok(FacilityService::new(client, cache))
}

fn run(global: &GlobalArgs, command: Commands) -> Result<(), u8> {
    let service = || build_service(global);

    match command {
        Commands::Show { kind, id, pretty } => {
            let entity = load(&service()?, kind, &id)?;
            print_json(&entity, pretty)
        }
        Commands::Ids { kind } => {
            let ids = service()?.possible_ids(kind).map_err(|e| {
                eprintln!("Error: {}", e);
                e.exit_code() as u8
            })?;
            for id in ids {
                println!("{}", id);
            }
            Ok(())
        }
        Commands::Related { kind, id, resolve } => {
            let service = service()?;
            let entity = load(&service, kind, &id)?;
            if resolve {
                print_json(&service.related_locations(&entity), false)
            } else {
                for location in entity.related_location_ids() {
                    println!("{}\t{}", location.id, location.type_tag);
                }
                Ok(())
            }
        }
        Commands::Events { kind, id, resolve } => {
            let service = service()?;
            let entity = load(&service, kind, &id)?;
            if resolve {
                print_json(&service.associated_events(&entity), false)
            } else {
                for event_id in entity.associated_event_ids() {
                    println!("{}", event_id);
                }
                Ok(())
            }
        }
        Commands::Children { id, collection } => {
            let service = service()?;
            let destination = load(&service, EntityKind::Destination, &id)?;
            let children = service.children(&destination, collection).map_err(|e| {
                eprintln!("Error: {}", e);
                e.exit_code() as u8
            })?;
            print_json(&children, false)
        }
        Commands::Normalize { text } => {
            println!("{}", normalize_name(&text));
            Ok(())
        }
    }
}

fn load(service: &Service, kind: EntityKind, id: &str) -> Result<Entity, u8> {
    service.load(kind, id).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), u8> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    println!("{}", output);
    Ok(())
}
