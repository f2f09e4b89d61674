use crate::adapters::LocalStorage;
use crate::core::serializer::from_json_document;
use crate::domain::model::Publication;
use crate::domain::ports::Storage;
use crate::presenter::state::{LoadFailure, Presenter};
use reqwest::Client;
use std::path::{Path, PathBuf};

/// Where the page finds `publications.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    File(PathBuf),
    Url(String),
}

impl AssetLocation {
    /// Absolute http(s) URLs stay remote; anything else is relative to `static_dir`.
    pub fn resolve(static_dir: &Path, publications_path: &str) -> Self {
        if publications_path.starts_with("http://") || publications_path.starts_with("https://") {
            AssetLocation::Url(publications_path.to_string())
        } else {
            AssetLocation::File(static_dir.join(publications_path.trim_start_matches('/')))
        }
    }

    fn describe(&self) -> String {
        match self {
            AssetLocation::File(path) => path.display().to_string(),
            AssetLocation::Url(url) => url.clone(),
        }
    }
}

/// One load attempt, no retry.
pub async fn load_publications(
    location: &AssetLocation,
    client: &Client,
) -> Result<Vec<Publication>, LoadFailure> {
    let bytes = match location {
        AssetLocation::File(path) => {
            let unreadable = |message: String| LoadFailure::Unreadable {
                path: path.display().to_string(),
                message,
            };
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| unreadable("not a file path".to_string()))?;
            let dir = path.parent().unwrap_or_else(|| Path::new(""));

            LocalStorage::new(dir.to_string_lossy().to_string())
                .read_file(file_name)
                .await
                .map_err(|e| unreadable(e.to_string()))?
        }
        AssetLocation::Url(url) => {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| LoadFailure::Network {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
            if !response.status().is_success() {
                return Err(LoadFailure::Status {
                    url: url.clone(),
                    status: response.status().as_u16(),
                });
            }
            response
                .bytes()
                .await
                .map_err(|e| LoadFailure::Network {
                    url: url.clone(),
                    message: e.to_string(),
                })?
                .to_vec()
        }
    };

    let invalid = |message: String| LoadFailure::Invalid {
        location: location.describe(),
        message,
    };
    let document = std::str::from_utf8(&bytes).map_err(|e| invalid(e.to_string()))?;
    from_json_document(document).map_err(|e| invalid(e.to_string()))
}

impl Presenter {
    /// Fresh presenter resolved with one load of `location`.
    pub async fn load(location: &AssetLocation, client: &Client) -> Self {
        let mut presenter = Presenter::new();
        presenter.resolve(load_publications(location, client).await);
        presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::state::ViewState;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_location() {
        let dir = Path::new("public");
        assert_eq!(
            AssetLocation::resolve(dir, "publications.json"),
            AssetLocation::File(Path::new("public").join("publications.json"))
        );
        assert_eq!(
            AssetLocation::resolve(dir, "/publications.json"),
            AssetLocation::File(Path::new("public").join("publications.json"))
        );
        assert_eq!(
            AssetLocation::resolve(dir, "https://cdn.example.com/p.json"),
            AssetLocation::Url("https://cdn.example.com/p.json".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let location = AssetLocation::File(dir.path().join("publications.json"));

        let presenter = Presenter::load(&location, &Client::new()).await;
        assert!(matches!(
            presenter.state(),
            ViewState::Failed(LoadFailure::Unreadable { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_asset_loads_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("publications.json");
        std::fs::write(
            &path,
            "[\n  {\n    \"title\": \"T\",\n    \"authors\": null,\n    \"venue\": \"V\",\n    \"year\": 2020,\n    \"url\": null\n  }\n]\n",
        )
        .unwrap();

        let presenter = Presenter::load(&AssetLocation::File(path), &Client::new()).await;
        match presenter.state() {
            ViewState::Loaded(publications) => {
                assert_eq!(publications[0].title.as_deref(), Some("T"));
                assert_eq!(publications[0].authors, None);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_array_document_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("publications.json");
        std::fs::write(&path, "{\"title\": \"T\"}").unwrap();

        let presenter = Presenter::load(&AssetLocation::File(path), &Client::new()).await;
        assert!(matches!(
            presenter.state(),
            ViewState::Failed(LoadFailure::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_remote_asset() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/publications.json");
            then.status(200).body(
                r#"[{"title":"T","authors":"A","venue":"V","year":2020,"url":"http://x"}]"#,
            );
        });
        server.mock(|when, then| {
            when.method(GET).path("/gone.json");
            then.status(404);
        });

        let ok = Presenter::load(
            &AssetLocation::Url(server.url("/publications.json")),
            &Client::new(),
        )
        .await;
        match ok.state() {
            ViewState::Loaded(publications) => {
                assert_eq!(publications.len(), 1);
                assert_eq!(publications[0].url.as_deref(), Some("http://x"));
            }
            other => panic!("unexpected state {:?}", other),
        }

        let gone = Presenter::load(&AssetLocation::Url(server.url("/gone.json")), &Client::new())
            .await;
        assert!(matches!(
            gone.state(),
            ViewState::Failed(LoadFailure::Status { status: 404, .. })
        ));
    }
}
