pub mod pipelines;
pub mod runner;
pub mod schedule;
