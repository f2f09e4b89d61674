use crate::domain::model::RawEntry;
use crate::domain::ports::ProfileSource;
use crate::sources::html::{attr, text};
use crate::sources::{get_text, SourceError};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;
use url::Url;

/// 防止分頁無限迴圈
const MAX_PAGES: usize = 50;

static ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<tr class="gsc_a_tr"[^>]*>(.*?)</tr>"#).expect("row regex")
});
static ROW_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(<a[^>]*class="gsc_a_at"[^>]*>)(.*?)</a>"#).expect("row title regex")
});
static GRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="gs_gray">(.*?)</div>"#).expect("gray regex")
});
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span class="gs_oph">.*?</span>"#).expect("oph regex")
});
static ROW_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="gsc_a_h[^"]*"[^>]*>\s*(\d{4})\s*</span>"#).expect("row year regex")
});
static CITATION_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"citation_for_view=([^&#]+)").expect("citation id regex")
});
static EPRINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="gsc_oci_title_ggi">\s*(<a[^>]*>)"#).expect("eprint regex")
});
static DETAIL_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(<a[^>]*class="gsc_oci_title_link"[^>]*>)(.*?)</a>"#)
        .expect("detail title regex")
});
static DETAIL_TITLE_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div id="gsc_oci_title"[^>]*>(.*?)</div>"#).expect("plain title regex")
});
static DETAIL_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="gsc_oci_field">(.*?)</div>\s*<div class="gsc_oci_value"[^>]*>(.*?)</div>"#)
        .expect("detail field regex")
});
static CAPTCHA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:id|class)="[^"]*\bgs_captcha_[a-z]+"#).expect("captcha regex")
});
static LEADING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{4})").expect("leading year regex"));

/// Google Scholar citations profile scraper.
pub struct ScholarSource {
    client: Client,
    base_url: Url,
    language: String,
    page_size: usize,
}

impl ScholarSource {
    pub fn new(client: Client, base_url: &str, language: &str, page_size: usize) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| SyncError::InvalidConfigValueError {
            field: "source.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        Ok(Self {
            client,
            base_url,
            language: language.to_string(),
            page_size: page_size.max(1),
        })
    }

    fn citations_url(&self, params: &[(&str, &str)]) -> String {
        let mut url = self.base_url.clone();
        // 保留代理用的路徑前綴
        let path = format!("{}/citations", self.base_url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut().clear().extend_pairs(params);
        url.to_string()
    }

    pub fn profile_url(&self, author_id: &str, start: usize) -> String {
        let start = start.to_string();
        let page_size = self.page_size.to_string();
        self.citations_url(&[
            ("user", author_id),
            ("hl", &self.language),
            ("cstart", &start),
            ("pagesize", &page_size),
        ])
    }

    pub fn detail_url(&self, author_pub_id: &str) -> String {
        self.citations_url(&[
            ("view_op", "view_citation"),
            ("hl", &self.language),
            ("citation_for_view", author_pub_id),
        ])
    }
}

#[async_trait]
impl ProfileSource for ScholarSource {
    fn name(&self) -> &str {
        "google-scholar"
    }

    async fn fetch_profile(&self, author_id: &str) -> std::result::Result<Vec<RawEntry>, SourceError> {
        let mut entries = Vec::new();

        for page in 0..MAX_PAGES {
            let url = self.profile_url(author_id, page * self.page_size);
            let body = get_text(&self.client, &url).await.map_err(|e| match e {
                SourceError::UnexpectedStatus { status: 404, .. } => SourceError::ProfileNotFound {
                    author_id: author_id.to_string(),
                },
                other => other,
            })?;

            check_blocked(&url, &body)?;
            if !body.contains(r#"id="gsc_prf_in""#) {
                return Err(SourceError::ProfileNotFound {
                    author_id: author_id.to_string(),
                });
            }

            let rows = parse_profile_rows(&body);
            let row_count = rows.len();
            tracing::debug!("Profile page {} has {} rows", page + 1, row_count);
            entries.extend(rows);

            if row_count < self.page_size {
                break;
            }
        }

        Ok(entries)
    }

    async fn fill_publication(&self, mut entry: RawEntry) -> std::result::Result<RawEntry, SourceError> {
        let Some(pub_id) = entry
            .field("author_pub_id")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            return Ok(entry);
        };

        let url = self.detail_url(&pub_id);
        let body = get_text(&self.client, &url).await?;
        check_blocked(&url, &body)?;

        let detail = parse_detail(&body);
        if detail.is_empty() {
            return Err(SourceError::Malformed {
                url,
                message: "publication page has no title or fields".to_string(),
            });
        }

        for (key, value) in detail {
            if key == "eprint_url" {
                entry.data.insert(key, value);
            } else {
                entry.bib_mut().insert(key, value);
            }
        }
        Ok(entry)
    }
}

/// Captcha markup anywhere, or the "unusual traffic" notice on a page that
/// carries neither a profile nor a publication table.
fn check_blocked(url: &str, body: &str) -> std::result::Result<(), SourceError> {
    if CAPTCHA.is_match(body) {
        return Err(SourceError::Blocked {
            url: url.to_string(),
            reason: "captcha challenge".to_string(),
        });
    }

    let has_content =
        body.contains(r#"id="gsc_prf_in""#) || body.contains(r#"id="gsc_oci_table""#);
    if !has_content && body.to_ascii_lowercase().contains("unusual traffic") {
        return Err(SourceError::Blocked {
            url: url.to_string(),
            reason: "unusual traffic notice".to_string(),
        });
    }
    Ok(())
}

/// Rows of a profile page as raw entries with `bib` and `author_pub_id`.
pub fn parse_profile_rows(body: &str) -> Vec<RawEntry> {
    ROW.captures_iter(body)
        .filter_map(|row| {
            let row = row.get(1)?.as_str();
            let mut bib = Map::new();
            let mut entry = Map::new();

            if let Some(caps) = ROW_TITLE.captures(row) {
                insert_text(&mut bib, "title", text(&caps[2]));
                if let Some(href) = attr(&caps[1], "href") {
                    if let Some(id) = CITATION_ID.captures(&href) {
                        entry.insert("author_pub_id".to_string(), json!(id[1].to_string()));
                    }
                }
            }

            let mut gray = GRAY.captures_iter(row).map(|c| c[1].to_string());
            if let Some(authors) = gray.next() {
                insert_text(&mut bib, "author", text(&authors));
            }
            if let Some(citation) = gray.next() {
                insert_text(&mut bib, "citation", text(&citation));
                let venue = TRAILING_YEAR.replace_all(&citation, "");
                insert_text(&mut bib, "venue", text(&venue));
            }

            if let Some(year) = ROW_YEAR.captures(row).and_then(|c| c[1].parse::<i64>().ok()) {
                bib.insert("pub_year".to_string(), json!(year));
            }

            if bib.is_empty() {
                return None;
            }
            entry.insert("bib".to_string(), Value::Object(bib));
            Some(RawEntry::new(entry))
        })
        .collect()
}

/// Fields of a publication detail page. `eprint_url` is top-level, the rest belong in `bib`.
pub fn parse_detail(body: &str) -> Map<String, Value> {
    let mut detail = Map::new();

    if let Some(caps) = EPRINT.captures(body) {
        if let Some(href) = attr(&caps[1], "href") {
            insert_text(&mut detail, "eprint_url", href);
        }
    }

    if let Some(caps) = DETAIL_TITLE.captures(body) {
        insert_text(&mut detail, "title", text(&caps[2]));
        if let Some(href) = attr(&caps[1], "href") {
            insert_text(&mut detail, "url", href);
        }
    } else if let Some(caps) = DETAIL_TITLE_PLAIN.captures(body) {
        insert_text(&mut detail, "title", text(&caps[1]));
    }

    for caps in DETAIL_FIELD.captures_iter(body) {
        let field = text(&caps[1]);
        let value = text(&caps[2]);
        match field.as_str() {
            "Authors" | "Inventors" => insert_text(&mut detail, "author", value),
            "Publication date" => {
                if let Some(year) = LEADING_YEAR
                    .captures(&value)
                    .and_then(|c| c[1].parse::<i64>().ok())
                {
                    detail.insert("pub_year".to_string(), json!(year));
                }
            }
            "Journal" | "Conference" | "Book" | "Source" => {
                insert_text(&mut detail, &field.to_ascii_lowercase(), value.clone());
                insert_text(&mut detail, "venue", value);
            }
            "Publisher" => insert_text(&mut detail, "publisher", value),
            "Volume" => insert_text(&mut detail, "volume", value),
            "Issue" => insert_text(&mut detail, "number", value),
            "Pages" => insert_text(&mut detail, "pages", value),
            _ => {}
        }
    }

    detail
}

fn insert_text(map: &mut Map<String, Value>, key: &str, value: String) {
    if !value.is_empty() {
        map.insert(key.to_string(), Value::String(value));
    }
}
