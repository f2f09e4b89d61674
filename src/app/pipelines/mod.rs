pub mod publication_pipeline;

pub use publication_pipeline::PublicationPipeline;
