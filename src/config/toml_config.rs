use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_path, validate_range, validate_url,
    Validate,
};
use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub profile: ProfileConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Scholar user id, the `user=` value of the profile URL.
    pub author_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Scholar,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetailFailurePolicy {
    #[default]
    Abort,
    UseSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub base_url: String,
    /// JSON feed endpoint, `{author_id}` is substituted.
    pub endpoint: Option<String>,
    pub language: String,
    pub page_size: usize,
    pub fetch_details: bool,
    pub on_detail_failure: DetailFailurePolicy,
    pub user_agent: String,
    /// 不設定則沿用 reqwest 預設（無逾時）
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Scholar,
            base_url: "https://scholar.google.com".to_string(),
            endpoint: None,
            language: "en".to_string(),
            page_size: 100,
            fetch_details: true,
            on_detail_failure: DetailFailurePolicy::Abort,
            user_agent: concat!("scholar-sync/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: None,
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the pipeline writes into before publishing.
    pub path: String,
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            file_name: "publications.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub enabled: bool,
    pub repository: String,
    /// Served static-asset directory, relative to `repository`.
    pub static_dir: String,
    pub commit_message: String,
    pub author_name: String,
    pub author_email: String,
    pub push: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repository: ".".to_string(),
            static_dir: "public".to_string(),
            commit_message: "Update publications.json from Google Scholar".to_string(),
            author_name: "github-actions[bot]".to_string(),
            author_email: "41898282+github-actions[bot]@users.noreply.github.com".to_string(),
            push: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub weekday: String,
    pub hour: u32,
    pub minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            weekday: "Mon".to_string(),
            hour: 6,
            minute: 0,
        }
    }
}

impl ScheduleConfig {
    pub fn weekday(&self) -> Result<Weekday> {
        self.weekday
            .parse::<Weekday>()
            .map_err(|_| SyncError::InvalidConfigValueError {
                field: "schedule.weekday".to_string(),
                value: self.weekday.clone(),
                reason: "Expected a weekday such as Mon or Monday".to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub owner: String,
    pub position: String,
    pub bio: String,
    pub avatar: String,
    pub contact_email: String,
    /// Asset path relative to the static dir, or an absolute http(s) URL.
    pub publications_path: String,
    pub bind: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner: "Dr. Firstname Lastname".to_string(),
            position: "Lecturer, Department • University".to_string(),
            bio: "Short bio. Research interests: machine learning, human-centred AI, etc."
                .to_string(),
            avatar: "avatar.jpg".to_string(),
            contact_email: "you@university.edu".to_string(),
            publications_path: "publications.json".to_string(),
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SCHOLAR_AUTHOR_ID})，未設定者保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Where the pipeline writes the serialized file.
    pub fn output_file(&self) -> PathBuf {
        Path::new(&self.output.path).join(&self.output.file_name)
    }

    /// Where the published file lives inside the repository.
    pub fn published_file(&self) -> PathBuf {
        Path::new(&self.publish.repository)
            .join(&self.publish.static_dir)
            .join(&self.output.file_name)
    }

    pub fn static_dir(&self) -> PathBuf {
        Path::new(&self.publish.repository).join(&self.publish.static_dir)
    }

    pub fn scholar_profile_url(&self) -> String {
        format!(
            "{}/citations?user={}",
            self.source.base_url.trim_end_matches('/'),
            self.profile.author_id
        )
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("profile.author_id", &self.profile.author_id)?;
        if self.profile.author_id.contains("${") {
            return Err(SyncError::MissingConfigError {
                field: "profile.author_id".to_string(),
            });
        }

        match self.source.kind {
            SourceKind::Scholar => validate_url("source.base_url", &self.source.base_url)?,
            SourceKind::Json => {
                let endpoint = crate::utils::validation::validate_required_field(
                    "source.endpoint",
                    &self.source.endpoint,
                )?;
                validate_url("source.endpoint", &endpoint.replace("{author_id}", "x"))?;
            }
        }
        validate_range("source.page_size", self.source.page_size, 1, 100)?;
        validate_non_empty_string("source.language", &self.source.language)?;

        validate_path("output.path", &self.output.path)?;
        validate_file_name("output.file_name", &self.output.file_name)?;

        if self.publish.enabled {
            validate_path("publish.repository", &self.publish.repository)?;
            validate_path("publish.static_dir", &self.publish.static_dir)?;
            validate_non_empty_string("publish.commit_message", &self.publish.commit_message)?;
            validate_non_empty_string("publish.author_name", &self.publish.author_name)?;
            validate_non_empty_string("publish.author_email", &self.publish.author_email)?;
        }

        self.schedule.weekday()?;
        validate_range("schedule.hour", self.schedule.hour, 0, 23)?;
        validate_range("schedule.minute", self.schedule.minute, 0, 59)?;

        validate_non_empty_string("site.publications_path", &self.site.publications_path)?;
        if self.site.publications_path.starts_with("http://")
            || self.site.publications_path.starts_with("https://")
        {
            validate_url("site.publications_path", &self.site.publications_path)?;
        }

        Ok(())
    }
}
