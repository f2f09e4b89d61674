pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod presenter;
pub mod publish;
pub mod server;
pub mod sources;
pub mod utils;

pub use adapters::LocalStorage;
pub use app::pipelines::PublicationPipeline;
pub use app::runner::{run_once, run_with_source, RunSummary};
pub use config::AppConfig;
pub use core::etl::{EtlEngine, RunReport};
pub use domain::model::{Authors, FetchOutcome, Publication, RawEntry, Year};
pub use utils::error::{Result, SyncError};
