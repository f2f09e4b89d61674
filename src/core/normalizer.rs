use crate::domain::model::{Authors, Publication, RawEntry, TransformResult, Year};
use serde_json::Value;

/// `first or second`: 只有備援鏈使用，首選值為空字串、0、false、null 或空集合時改用次選
fn or_fallback<'a>(first: Option<&'a Value>, second: Option<&'a Value>) -> Option<&'a Value> {
    match first {
        Some(value) if is_truthy(value) => Some(value),
        _ => second,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn as_text(value: Option<&Value>) -> Option<String> {
    value?.as_str().map(str::to_string)
}

fn as_authors(value: Option<&Value>) -> Option<Authors> {
    match value? {
        Value::String(text) => Some(Authors::Text(text.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Authors::List),
        _ => None,
    }
}

fn as_year(value: Option<&Value>) -> Option<Year> {
    match value? {
        Value::Number(n) => Some(
            n.as_i64()
                .map(Year::Number)
                .unwrap_or_else(|| Year::Text(n.to_string())),
        ),
        Value::String(text) => Some(Year::Text(text.clone())),
        _ => None,
    }
}

/// Maps one raw entry to the fixed record shape. Missing fields become `None`;
/// present values, empty strings included, are kept as-is.
///
/// * `year`: `bib.pub_year`, then `bib.year`
/// * `url`: `eprint_url`, then `bib.url`
pub fn normalize(entry: &RawEntry) -> Publication {
    Publication {
        title: as_text(entry.bib_field("title")),
        authors: as_authors(entry.bib_field("author")),
        venue: as_text(entry.bib_field("venue")),
        year: as_year(or_fallback(
            entry.bib_field("pub_year"),
            entry.bib_field("year"),
        )),
        url: as_text(or_fallback(entry.field("eprint_url"), entry.bib_field("url"))),
    }
}

/// Normalizes every entry, keeping source order. No dedup, no sorting.
pub fn normalize_all(entries: Vec<RawEntry>) -> TransformResult {
    let publications: Vec<Publication> = entries.iter().map(normalize).collect();
    let missing_fields = publications.iter().map(missing_field_count).sum();

    TransformResult {
        publications,
        missing_fields,
    }
}

fn missing_field_count(publication: &Publication) -> usize {
    [
        publication.title.is_none(),
        publication.authors.is_none(),
        publication.venue.is_none(),
        publication.year.is_none(),
        publication.url.is_none(),
    ]
    .into_iter()
    .filter(|missing| *missing)
    .count()
}
