use crate::domain::model::Publication;
use crate::utils::error::Result;

/// Pretty JSON array, two-space indent, keys in `title, authors, venue, year, url`
/// order, nulls kept, non-ASCII written as-is. Ends with a newline.
pub fn to_json_document(publications: &[Publication]) -> Result<String> {
    let mut document = serde_json::to_string_pretty(publications)?;
    document.push('\n');
    Ok(document)
}

pub fn from_json_document(document: &str) -> Result<Vec<Publication>> {
    Ok(serde_json::from_str(document)?)
}
