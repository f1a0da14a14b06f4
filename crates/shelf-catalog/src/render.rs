use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use shelf_types::CatalogEntry;

use crate::error::{CatalogError, CatalogResult};

/// Indentation of each key inside a rendered entry.
pub const ENTRY_INDENT: &str = "      ";

/// Render an entry as an object literal.
///
/// The output is JSON (valid JavaScript), keys in `name`, `shelfNumber`,
/// `image` order, each key on its own line indented by [`ENTRY_INDENT`], and
/// the braces in column zero.
pub fn render_entry(entry: &CatalogEntry) -> CatalogResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(ENTRY_INDENT.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entry
        .serialize(&mut ser)
        .map_err(|e| CatalogError::Render(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| CatalogError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_layout() {
        let entry = CatalogEntry::new("Sony-500", "A1", "/photos/Sony-500_A1.jpg");
        assert_eq!(
            render_entry(&entry).unwrap(),
            "{\n      \"name\": \"Sony-500\",\n      \"shelfNumber\": \"A1\",\n      \"image\": \"/photos/Sony-500_A1.jpg\"\n}"
        );
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        let entry = CatalogEntry::new(r#"The "Big" \ One"#, "A1", "/photos/x.jpg");
        let rendered = render_entry(&entry).unwrap();
        assert!(rendered.contains(r#""name": "The \"Big\" \\ One""#));
        let back: CatalogEntry = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, entry);
    }
}
