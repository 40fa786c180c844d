use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "justdoc",
    about = "JustDoc: store and serve JSON documents by channel",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// List channels with document counts
    Channels(StoreArgs),
    /// List the documents of a channel
    Ls(LsArgs),
    /// Print a stored document
    Get(GetArgs),
    /// Store a document from a file or stdin
    Put(PutArgs),
}

#[derive(Args)]
pub struct StoreArgs {
    /// Path of the store file
    #[arg(long, env = "DB_PATH", default_value = "justdoc.db")]
    pub db: PathBuf,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Address to listen on (overrides --port)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Port to listen on, on all interfaces
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
    /// Path of the store file
    #[arg(long, env = "DB_PATH")]
    pub db: Option<PathBuf>,
    /// Maximum request body size in bytes
    #[arg(long)]
    pub max_body_size: Option<usize>,
}

#[derive(Args)]
pub struct LsArgs {
    pub channel: String,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct GetArgs {
    pub channel: String,
    pub document: String,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct PutArgs {
    pub channel: String,
    pub document: String,
    /// JSON file to store; reads stdin when omitted or `-`
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub store: StoreArgs,
}
