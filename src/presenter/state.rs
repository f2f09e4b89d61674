use crate::domain::model::Publication;
use thiserror::Error;

/// Why the publications asset could not be shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    #[error("could not read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{location} is not a publications document: {message}")]
    Invalid { location: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    LoadedEmpty,
    Loaded(Vec<Publication>),
    Failed(LoadFailure),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::LoadedEmpty => "loaded-empty",
            ViewState::Loaded(_) => "loaded",
            ViewState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ViewState::Loading)
    }
}

/// Page view state. Starts in `Loading` and resolves exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presenter {
    state: ViewState,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Moves out of `Loading`. Returns `false` and keeps the current state
    /// when already resolved.
    pub fn resolve(&mut self, result: Result<Vec<Publication>, LoadFailure>) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        self.state = match result {
            Ok(publications) if publications.is_empty() => ViewState::LoadedEmpty,
            Ok(publications) => ViewState::Loaded(publications),
            Err(failure) => {
                tracing::error!("Failed to load publications: {}", failure);
                ViewState::Failed(failure)
            }
        };
        true
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one() -> Vec<Publication> {
        vec![Publication {
            title: Some("T".to_string()),
            ..Publication::default()
        }]
    }

    #[test]
    fn test_initial_state_is_loading() {
        let presenter = Presenter::new();
        assert_eq!(presenter.state(), &ViewState::Loading);
        assert!(!presenter.state().is_terminal());
    }

    #[test]
    fn test_resolves_to_each_terminal_state() {
        let mut empty = Presenter::new();
        assert!(empty.resolve(Ok(vec![])));
        assert_eq!(empty.state(), &ViewState::LoadedEmpty);

        let mut loaded = Presenter::new();
        assert!(loaded.resolve(Ok(one())));
        assert_eq!(loaded.state(), &ViewState::Loaded(one()));

        let mut failed = Presenter::new();
        let failure = LoadFailure::Status {
            url: "http://site/publications.json".to_string(),
            status: 404,
        };
        assert!(failed.resolve(Err(failure.clone())));
        assert_eq!(failed.state(), &ViewState::Failed(failure));
    }

    #[test]
    fn test_terminal_state_never_changes() {
        let mut presenter = Presenter::new();
        presenter.resolve(Ok(vec![]));

        assert!(!presenter.resolve(Ok(one())));
        assert_eq!(presenter.state().name(), "loaded-empty");
    }
}
