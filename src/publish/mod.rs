pub mod git;

pub use git::{GitPublisher, PublishOutcome};
