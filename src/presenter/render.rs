use crate::config::toml_config::SiteConfig;
use crate::domain::model::Publication;
use crate::presenter::state::{Presenter, ViewState};
use crate::utils::error::Result;
use askama::Template;

pub const LOADING_MESSAGE: &str = "Loading publications...";
pub const EMPTY_MESSAGE: &str = "No publications found.";
pub const FAILED_MESSAGE: &str = "Failed to load publications.";

/// One list entry; null fields render as empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub href: String,
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub year: String,
}

impl From<&Publication> for ItemView {
    fn from(publication: &Publication) -> Self {
        Self {
            href: publication.url.clone().unwrap_or_else(|| "#".to_string()),
            title: publication.title.clone().unwrap_or_default(),
            authors: publication
                .authors
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            venue: publication.venue.clone().unwrap_or_default(),
            year: publication
                .year
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct PageTemplate<'a> {
    pub site: &'a SiteConfig,
    pub scholar_url: &'a str,
    pub state_name: &'static str,
    pub notice: Option<&'static str>,
    pub items: Vec<ItemView>,
}

pub fn render_page(site: &SiteConfig, scholar_url: &str, presenter: &Presenter) -> Result<String> {
    let state = presenter.state();
    let (notice, items) = match state {
        ViewState::Loading => (Some(LOADING_MESSAGE), Vec::new()),
        ViewState::LoadedEmpty => (Some(EMPTY_MESSAGE), Vec::new()),
        ViewState::Failed(_) => (Some(FAILED_MESSAGE), Vec::new()),
        ViewState::Loaded(publications) => (None, publications.iter().map(ItemView::from).collect()),
    };

    let page = PageTemplate {
        site,
        scholar_url,
        state_name: state.name(),
        notice,
        items,
    };
    Ok(page.render()?)
}
