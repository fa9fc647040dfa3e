//! AMiner Index
//!
//! Builds three indexes over the AMiner author and coauthor dumps and serves
//! ranked lookups over them:
//!
//! - **Coauthor adjacency**: author id → coauthor id → collaboration count
//! - **Author profiles**: author id → profile (name, affiliation, citation metrics)
//! - **Subjects**: research interest → author id → h-index
//!
//! Indexes live in a key-value store behind the [`store::KeyValueStore`] trait
//! (Redis in production, in-memory for tests). The store handle is always passed
//! in explicitly.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use aminer_index::{Config, IndexStore, QueryService, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = IndexStore::new(Arc::new(MemoryStore::new()));
//!     let service = QueryService::new(store, &config);
//!
//!     let ranked = service.rank_authors_by_subject("data mining").await?;
//!     println!("{} authors", ranked.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatters;
pub mod index;
pub mod ingest;
pub mod models;
pub mod parser;
pub mod query;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{IndexError, IngestError, MalformedRecord, QueryError, StoreError};
pub use index::{AuthorIndex, CoauthorIndex};
pub use ingest::{IngestManifest, IngestReport, IngestState, Ingestor, SourceFiles};
pub use query::QueryService;
pub use store::IndexStore;
