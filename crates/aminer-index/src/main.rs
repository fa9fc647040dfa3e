//! AMiner Index - Entry Point
//!
//! Ingests the AMiner dumps into Redis and serves ranked queries over them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use aminer_index::formatters::{render_author, render_subject};
use aminer_index::models::ResponseFormat;
use aminer_index::store::RedisStore;
use aminer_index::{Config, IndexStore, Ingestor, QueryService, SourceFiles};

#[derive(Parser, Debug)]
#[command(name = "aminer-index")]
#[command(about = "Coauthor, author and subject indexes over the AMiner dataset")]
#[command(version)]
struct Cli {
    /// Redis connection URL
    #[arg(long, env = "AMINER_REDIS_URL")]
    redis_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the indexes from the AMiner source files
    Ingest {
        /// AMiner coauthor edge list
        #[arg(long)]
        coauthors: PathBuf,

        /// AMiner author profile file
        #[arg(long)]
        authors: PathBuf,

        /// Expected MD5 of the coauthor file
        #[arg(long)]
        coauthors_md5: Option<String>,

        /// Expected MD5 of the author file
        #[arg(long)]
        authors_md5: Option<String>,

        /// Write the ingested subject names to this file, one per line
        #[arg(long)]
        subjects_out: Option<PathBuf>,
    },

    /// Serve queries over HTTP
    Serve {
        /// HTTP server port
        #[arg(long, default_value = "8000", env = "PORT")]
        port: u16,
    },

    /// Rank the authors of a subject
    Subject {
        /// Subject name, matched exactly
        name: String,

        /// Maximum authors to show
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: ResponseFormat,
    },

    /// Show an author's profile and coauthors
    Author {
        /// Author index
        id: u64,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: ResponseFormat,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(url) = cli.redis_url {
        config.redis_url = url;
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting AMiner index");

    let redis = RedisStore::connect(&config.redis_url)
        .await
        .context("failed to connect to Redis")?;
    let store = IndexStore::new(Arc::new(redis));

    match cli.command {
        Command::Ingest {
            coauthors,
            authors,
            coauthors_md5,
            authors_md5,
            subjects_out,
        } => {
            let sources = SourceFiles::new(coauthors, authors)
                .with_checksums(coauthors_md5, authors_md5);
            let report = Ingestor::new(store.clone(), &config).run(&sources).await?;

            println!(
                "Ingested {} edges, {} authors, {} subjects ({} malformed records skipped)",
                report.coauthors.records,
                report.authors.entries,
                report.subjects,
                report.warning_count()
            );

            if let Some(path) = subjects_out {
                let subjects = store.get_subject_list().await?.unwrap_or_default();
                let mut contents = subjects.join("\n");
                contents.push('\n');
                tokio::fs::write(&path, contents)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(
                    path = %path.display(),
                    subjects = subjects.len(),
                    "Subject list written"
                );
            }
        }
        Command::Serve { port } => {
            let service = QueryService::new(store, &config);
            let sync_interval = config.cache_sync_interval;
            aminer_index::server::run_http(service, port, sync_interval).await?;
        }
        Command::Subject {
            name,
            limit,
            format,
        } => {
            let service = QueryService::new(store, &config);
            match service.search_subject(&name, limit).await {
                Ok(hits) => println!("{}", render_subject(&name, &hits, format)),
                Err(e) => anyhow::bail!(e.to_user_message()),
            }
        }
        Command::Author { id, format } => {
            let service = QueryService::new(store, &config);
            match service.get_author_detail(id).await {
                Ok(detail) => println!("{}", render_author(&detail, format)),
                Err(e) => anyhow::bail!(e.to_user_message()),
            }
        }
    }

    Ok(())
}
