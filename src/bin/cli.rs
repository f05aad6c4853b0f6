//! mqttstore CLI
//!
//! Offline inspection of an inflight message database.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Parser, Subcommand};
use mqttstore::logging::init_logging;
use mqttstore::protocol::{parse_key, Direction};
use mqttstore::{Config, PersistentStore, RawCodec, Result, StoreError};

/// mqttstore CLI
#[derive(Parser, Debug)]
#[command(name = "mqttstore-cli")]
#[command(about = "Inspect and edit an MQTT inflight message store")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long)]
    db: PathBuf,

    /// JSON config file (defaults to $MQTTSTORE_CONF, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bucket name, overrides the config
    #[arg(short, long)]
    bucket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every stored key
    Keys,

    /// Print the stored packet as hex
    Get {
        /// The key to get
        key: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Delete every stored message
    Reset,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(bucket) = args.bucket {
        config.bucket_name = bucket;
    }

    init_logging(&config.logger)?;
    tracing::debug!("mqttstore-cli v{}", mqttstore::VERSION);

    // Opening creates the file, so a mistyped path would yield an empty store
    ensure_exists(&args.db)?;

    let store = PersistentStore::with_config(&args.db, RawCodec, config);
    store.open()?;

    let outcome = execute(&store, args.command);
    store.close()?;
    outcome
}

fn execute(store: &PersistentStore<RawCodec>, command: Commands) -> Result<()> {
    match command {
        Commands::Keys => {
            for key in store.all()? {
                match parse_key(&key) {
                    Some((Direction::Inbound, id)) => println!("{}\tinbound\t{}", key, id),
                    Some((Direction::Outbound, id)) => println!("{}\toutbound\t{}", key, id),
                    None => println!("{}", key),
                }
            }
        }
        Commands::Get { key } => match store.get(&key)? {
            Some(packet) => println!("{}", hex(&packet)),
            None => println!("(not found)"),
        },
        Commands::Del { key } => {
            store.del(&key)?;
            println!("deleted {}", key);
        }
        Commands::Reset => {
            store.reset()?;
            println!("store wiped");
        }
    }
    Ok(())
}

/// Every subcommand inspects or edits an existing database
fn ensure_exists(db: &Path) -> Result<()> {
    if db.is_file() {
        Ok(())
    } else {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("database {} does not exist", db.display()),
        )))
    }
}

fn hex(packet: &Bytes) -> String {
    packet
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
