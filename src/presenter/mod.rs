//! Presenter: loads `publications.json` at view time and renders the profile page.

pub mod loader;
pub mod render;
pub mod state;

pub use loader::{load_publications, AssetLocation};
pub use render::render_page;
pub use state::{LoadFailure, Presenter, ViewState};
