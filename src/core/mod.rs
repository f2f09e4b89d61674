pub mod etl;
pub mod normalizer;
pub mod serializer;

pub use crate::domain::model::{FetchOutcome, Publication, RawEntry, TransformResult};
pub use crate::domain::ports::{Pipeline, ProfileSource, Storage};
pub use crate::utils::error::Result;
