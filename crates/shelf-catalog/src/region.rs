use serde::{Deserialize, Serialize};

use shelf_types::CatalogEntry;

use crate::error::{CatalogError, CatalogResult};
use crate::patch::insert_entry;
use crate::scan::find_closing_bracket;

/// Byte span of an array literal's contents inside a catalog artifact.
///
/// `start` is the offset just past the opening `[`; `end` is the offset of
/// the closing `]`. The span between them is opaque entry text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayRegion {
    pub variable_name: String,
    pub start: usize,
    pub end: usize,
}

impl ArrayRegion {
    /// The region's text within `raw`, or `""` if the region does not fit.
    pub fn text<'t>(&self, raw: &'t str) -> &'t str {
        raw.get(self.start..self.end).unwrap_or("")
    }

    /// True when the region holds nothing but whitespace.
    pub fn is_blank(&self, raw: &str) -> bool {
        self.text(raw).trim().is_empty()
    }
}

/// A fetched catalog module together with its located array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogArtifact {
    raw_text: String,
    region: ArrayRegion,
}

impl CatalogArtifact {
    /// Locate `variable`'s array in `raw_text`.
    pub fn parse(raw_text: impl Into<String>, variable: &str) -> CatalogResult<Self> {
        let raw_text = raw_text.into();
        let region = locate_array(&raw_text, variable)?;
        Ok(Self { raw_text, region })
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn region(&self) -> &ArrayRegion {
        &self.region
    }

    pub fn region_text(&self) -> &str {
        self.region.text(&self.raw_text)
    }

    /// New module text with `entry` appended to the array.
    pub fn with_entry(&self, entry: &CatalogEntry) -> CatalogResult<String> {
        insert_entry(&self.raw_text, &self.region, entry)
    }
}

/// Find the contents of `const <variable> = [ ... ];` in `raw`.
///
/// Exact-match precondition: the declaration must be spelled exactly
/// `const <variable> = [`, starting at a token boundary, and its matching
/// `]` must be immediately followed by `;`. The declaration must occur once.
/// Nothing inside the brackets is parsed beyond bracket matching.
pub fn locate_array(raw: &str, variable: &str) -> CatalogResult<ArrayRegion> {
    validate_variable(variable)?;
    let anchor = format!("const {variable} = [");

    let Some(decl) = anchor_offsets(raw, &anchor).next() else {
        return Err(CatalogError::DeclarationNotFound {
            variable: variable.to_string(),
        });
    };
    let start = decl + anchor.len();

    let end = find_closing_bracket(raw, start).ok_or_else(|| CatalogError::Unterminated {
        variable: variable.to_string(),
    })?;
    if !raw[end + 1..].starts_with(';') {
        return Err(CatalogError::MissingSemicolon {
            variable: variable.to_string(),
            offset: end,
        });
    }

    if let Some(offset) = anchor_offsets(raw, &anchor).find(|&o| o > end) {
        return Err(CatalogError::DuplicateDeclaration {
            variable: variable.to_string(),
            offset,
        });
    }

    tracing::trace!(variable, start, end, "located catalog array");
    Ok(ArrayRegion {
        variable_name: variable.to_string(),
        start,
        end,
    })
}

fn anchor_offsets<'a>(raw: &'a str, anchor: &'a str) -> impl Iterator<Item = usize> + 'a {
    raw.match_indices(anchor)
        .map(|(i, _)| i)
        .filter(move |&i| starts_token(raw, i))
}

/// `const` must not be the tail of a longer identifier or a member access.
fn starts_token(raw: &str, at: usize) -> bool {
    match raw[..at].chars().next_back() {
        None => true,
        Some(c) => !(is_ident_char(c) || c == '.'),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn validate_variable(variable: &str) -> CatalogResult<()> {
    let mut chars = variable.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_' || first == '$') && chars.all(is_ident_char)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CatalogError::InvalidVariable(variable.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MODULE: &str = r#"import { createContext } from "react";

// Product list consumed by the storefront.
const data = [
{
      "name": "Samsung-100",
      "shelfNumber": "B2",
      "image": "/photos/Samsung-100_B2.jpg"
}];

export const ProductContext = createContext(data);
"#;

    #[test]
    fn locates_region() {
        let region = locate_array(MODULE, "data").unwrap();
        assert_eq!(region.variable_name, "data");
        assert_eq!(&MODULE[region.start - 1..region.start], "[");
        assert_eq!(&MODULE[region.end..region.end + 2], "];");
        assert!(region.text(MODULE).contains("Samsung-100"));
        assert!(!region.is_blank(MODULE));
    }

    #[test]
    fn empty_array() {
        let text = "const acData = [];\n";
        let region = locate_array(text, "acData").unwrap();
        assert_eq!(region.start, region.end);
        assert!(region.is_blank(text));
    }

    #[test]
    fn missing_declaration() {
        let err = locate_array(MODULE, "acData").unwrap_err();
        assert_eq!(err, CatalogError::DeclarationNotFound { variable: "acData".into() });
        assert!(err.is_malformed_artifact());
    }

    #[test]
    fn let_or_spacing_variants_are_not_matched() {
        for text in [
            "let data = [];",
            "const data=[];",
            "const data = {};",
            "const  data = [];",
            "export const database = [];",
        ] {
            assert!(
                matches!(locate_array(text, "data"), Err(CatalogError::DeclarationNotFound { .. })),
                "{text:?} should not match"
            );
        }
    }

    #[test]
    fn anchor_must_start_a_token() {
        let text = "myconst data = [];";
        assert!(matches!(
            locate_array(text, "data"),
            Err(CatalogError::DeclarationNotFound { .. })
        ));
        let text = "export const data = [];";
        assert!(locate_array(text, "data").is_ok());
    }

    #[test]
    fn brackets_inside_strings_do_not_close() {
        let text = r#"const data = [{"name": "Weird ]; name"}];"#;
        let region = locate_array(text, "data").unwrap();
        assert_eq!(region.end, text.len() - 2);
    }

    #[test]
    fn unterminated() {
        let err = locate_array("const data = [ {\"a\": 1},", "data").unwrap_err();
        assert!(matches!(err, CatalogError::Unterminated { .. }));
    }

    #[test]
    fn missing_semicolon() {
        let err = locate_array("const data = [1, 2]\nexport default data;", "data").unwrap_err();
        assert!(matches!(err, CatalogError::MissingSemicolon { offset: 18, .. }));
    }

    #[test]
    fn duplicate_declaration() {
        let text = "const data = [];\nconst data = [];";
        let err = locate_array(text, "data").unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateDeclaration { variable: "data".into(), offset: 17 }
        );
    }

    #[test]
    fn anchor_text_inside_region_is_not_a_duplicate() {
        let text = r#"const data = [{"name": "const data = ["}];"#;
        assert!(locate_array(text, "data").is_ok());
    }

    #[test]
    fn invalid_variable_names() {
        for bad in ["", "1data", "da ta", "data-x"] {
            assert_eq!(
                locate_array("const data = [];", bad).unwrap_err(),
                CatalogError::InvalidVariable(bad.into())
            );
        }
    }

    #[test]
    fn artifact_parse_and_patch() {
        let artifact = CatalogArtifact::parse(MODULE, "data").unwrap();
        assert_eq!(artifact.raw_text(), MODULE);
        assert!(artifact.region_text().contains("Samsung-100"));

        let entry = CatalogEntry::new("LG 42", "C1", "/photos/LG-42_C1.jpg");
        let patched = artifact.with_entry(&entry).unwrap();
        assert!(patched.contains("\"name\": \"LG 42\""));
        assert!(patched.starts_with("import { createContext }"));
        assert!(patched.ends_with("export const ProductContext = createContext(data);\n"));
    }

    proptest! {
        #[test]
        fn absent_declaration_is_not_found(text in "\\PC{0,200}") {
            prop_assume!(!text.contains("const data = ["));
            prop_assert_eq!(
                locate_array(&text, "data"),
                Err(CatalogError::DeclarationNotFound { variable: "data".into() })
            );
        }
    }
}
