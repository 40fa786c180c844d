use std::io::{Read, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;

use justdoc_server::{JustDocServer, ServerConfig};
use justdoc_store::{DocumentStore, RedbDocumentStore};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Channels(args) => cmd_channels(args, &cli.format),
        Command::Ls(args) => cmd_ls(args, &cli.format),
        Command::Get(args) => cmd_get(args),
        Command::Put(args) => cmd_put(args, &cli.format),
    }
}

/// Merge the config file (if any) with command-line and environment overrides.
pub fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    } else if let Some(port) = args.port {
        config.bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
    }
    if let Some(db) = &args.db {
        config.db_path = db.clone();
    }
    if let Some(max) = args.max_body_size {
        config.max_body_size = max;
    }
    Ok(config)
}

fn open_store(path: &Path) -> anyhow::Result<RedbDocumentStore> {
    RedbDocumentStore::open(path)
        .with_context(|| format!("failed to open store {}", path.display()))
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let store = Arc::new(open_store(&config.db_path)?);
    let server = JustDocServer::new(config, store);

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_channels(args: StoreArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(&args.db)?;
    let channels = store.list_channels()?;
    store.close()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&channels)?),
        OutputFormat::Text if channels.is_empty() => println!("No channels."),
        OutputFormat::Text => {
            for channel in &channels {
                let count = format!("{} documents", channel.document_count);
                println!("{}  {}", channel.name.bold(), count.dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_ls(args: LsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(&args.store.db)?;
    let names = store
        .list_documents(&args.channel)
        .with_context(|| format!("channel {}", args.channel))?;
    store.close()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text => {
            for name in &names {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn cmd_get(args: GetArgs) -> anyhow::Result<()> {
    let store = open_store(&args.store.db)?;
    let data = store
        .get_document(&args.channel, &args.document)
        .with_context(|| format!("document {}/{}", args.channel, args.document))?;
    store.close()?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&data)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn cmd_put(args: PutArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let data = match args.file.as_deref() {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    serde_json::from_slice::<serde::de::IgnoredAny>(&data).context("input is not valid JSON")?;

    let store = open_store(&args.store.db)?;
    let created = store.put_document(&args.channel, &args.document, &data)?;
    store.close()?;
    tracing::debug!(channel = %args.channel, document = %args.document, created, "document stored");

    let status = if created { "created" } else { "updated" };
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "status": status,
                "channel": args.channel,
                "document": args.document,
            });
            println!("{body}");
        }
        OutputFormat::Text => println!(
            "{} {} {}/{}",
            "✓".green().bold(),
            status,
            args.channel.bold(),
            args.document.yellow()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn serve_args(argv: &[&str]) -> ServeArgs {
        let mut full = vec!["justdoc", "serve"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Serve(args) => args,
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn port_binds_all_interfaces() {
        let config = resolve_config(&serve_args(&["--port", "9090"])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9090".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bind_wins_over_port() {
        let config =
            resolve_config(&serve_args(&["--port", "9090", "--bind", "127.0.0.1:7000"])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("justdoc.toml");
        std::fs::write(&path, "db_path = \"file.db\"\nmax_body_size = 100\n").unwrap();
        let path_str = path.to_str().unwrap();

        let config =
            resolve_config(&serve_args(&["--config", path_str, "--db", "flag.db"])).unwrap();
        assert_eq!(config.db_path, Path::new("flag.db"));
        assert_eq!(config.max_body_size, 100);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(resolve_config(&serve_args(&["--config", "/nonexistent/justdoc.toml"])).is_err());
    }

    #[test]
    fn put_then_list_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db");
        let doc = dir.path().join("doc.json");
        std::fs::write(&doc, br#"{"theme":"dark"}"#).unwrap();

        cmd_put(
            PutArgs {
                channel: "myapp".into(),
                document: "settings".into(),
                file: Some(doc),
                store: StoreArgs { db: db.clone() },
            },
            &OutputFormat::Text,
        )
        .unwrap();

        let store = RedbDocumentStore::open(&db).unwrap();
        assert_eq!(store.get_document("myapp", "settings").unwrap(), br#"{"theme":"dark"}"#);
    }

    #[test]
    fn put_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("bad.json");
        std::fs::write(&doc, b"{not json").unwrap();
        let result = cmd_put(
            PutArgs {
                channel: "c".into(),
                document: "d".into(),
                file: Some(doc),
                store: StoreArgs { db: dir.path().join("cli.db") },
            },
            &OutputFormat::Json,
        );
        assert!(result.is_err());
        // Rejected before the store file is created.
        assert!(!dir.path().join("cli.db").exists());
    }
}
