//! iploc: resolve IPv4 addresses to countries and cities from a local
//! GeoLite2 snapshot.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use iploc::{ingest, DatabaseManager, Edition, GeoSession, Resolution, Settings};

#[derive(Parser)]
#[command(name = "iploc")]
#[command(version)]
#[command(about = "IPv4 geolocation lookup from local GeoLite2 databases", long_about = None)]
struct Cli {
    /// Cache directory for downloaded databases
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Directory with bundled database archives (keyless operation)
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more addresses and exit
    Lookup {
        /// IPv4 addresses to resolve
        #[arg(required = true)]
        addrs: Vec<String>,

        /// Print machine-readable JSON instead of labeled lines
        #[arg(long)]
        json: bool,
    },

    /// Force a database refresh
    Update,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(dir) = cli.cache_dir {
        settings.cache_dir = dir;
    }
    if let Some(dir) = cli.assets_dir {
        settings.assets_dir = dir;
    }

    let result = match cli.command {
        Some(Commands::Lookup { addrs, json }) => lookup(&settings, &addrs, json),
        Some(Commands::Update) => update(&settings),
        None => interactive(&settings),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Build the lookup session: both editions made available, ingested,
/// and handed over as one immutable value.
fn build_session(settings: &Settings) -> iploc::Result<GeoSession> {
    let manager = DatabaseManager::new(settings);

    let (country_index, country_names) =
        ingest::load_edition(&manager.ensure(Edition::Country)?, Edition::Country)?;
    let (city_index, city_names) =
        ingest::load_edition(&manager.ensure(Edition::City)?, Edition::City)?;

    Ok(GeoSession::new(
        country_index,
        country_names,
        city_index,
        city_names,
    ))
}

fn lookup(settings: &Settings, addrs: &[String], json: bool) -> iploc::Result<()> {
    let session = build_session(settings)?;

    for addr in addrs {
        match session.resolve_str(addr) {
            Ok(resolution) if json => print_json(addr, &resolution),
            Ok(resolution) => println!("{}", resolution),
            Err(e) => eprintln!("{}: {}", addr, e),
        }
    }
    Ok(())
}

fn print_json(addr: &str, resolution: &Resolution) {
    let value = serde_json::json!({
        "ip": addr,
        "country": resolution.country,
        "city": resolution.city,
    });
    println!("{}", value);
}

fn update(settings: &Settings) -> iploc::Result<()> {
    let manager = DatabaseManager::new(settings);

    for edition in Edition::ALL {
        if manager.refresh(edition)? {
            println!("{} updated", edition);
        } else {
            println!("{} already up to date", edition);
        }
    }
    Ok(())
}

fn interactive(settings: &Settings) -> iploc::Result<()> {
    let session = build_session(settings)?;

    println!("Welcome! Type an IPv4 address to see its location, 'q' or 'quit' to quit");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("insert IP => ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "q" || input == "quit" {
            break;
        }

        // A bad query never ends the session.
        match session.resolve_str(input) {
            Ok(resolution) => println!("{}", resolution),
            Err(_) => println!("Please type a valid IPv4 address!"),
        }
    }
    Ok(())
}
