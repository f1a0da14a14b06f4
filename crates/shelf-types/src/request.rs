use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::product::ProductType;

/// Extension used when the upload carries none, or one we don't recognize.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Longest extension accepted, excluding the dot.
const MAX_EXTENSION_LEN: usize = 8;

/// A transport-neutral upload as received from the form or the webcam path.
///
/// Fields are raw strings; [`UploadRequest::validate`] turns this into a
/// [`ValidUpload`] or reports what is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub product_type: String,
    pub name: String,
    pub shelf: String,
    #[serde(skip)]
    pub image: Vec<u8>,
    /// File extension of the photo (`.png`, `png`), if the transport knows it.
    pub extension: Option<String>,
}

/// An upload that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidUpload {
    pub product: ProductType,
    pub name: String,
    pub shelf: String,
    pub image: Vec<u8>,
    /// Normalized extension, always starting with `.`.
    pub extension: String,
}

impl UploadRequest {
    /// Check required fields and normalize them.
    ///
    /// Text fields are checked before the image, so a form with nothing
    /// filled in reports the missing fields first.
    pub fn validate(self) -> TypeResult<ValidUpload> {
        let product_type = self.product_type.trim();
        if product_type.is_empty() {
            return Err(TypeError::MissingField("productType"));
        }
        let name = required("name", &self.name, true)?;
        let shelf = required("shelf", &self.shelf, false)?;
        let product: ProductType = product_type.parse()?;

        if self.image.is_empty() {
            return Err(TypeError::MissingImage);
        }

        Ok(ValidUpload {
            product,
            name,
            shelf,
            image: self.image,
            extension: normalize_extension(self.extension.as_deref()),
        })
    }
}

impl ValidUpload {
    /// File name of the stored photo: `<name-with-hyphens>_<shelf><ext>`.
    pub fn file_name(&self) -> String {
        format!("{}_{}{}", hyphenate_name(&self.name), self.shelf, self.extension)
    }
}

/// Trim `value` and reject anything that could escape its path segment.
///
/// Inner whitespace is allowed only where it is later hyphenated
/// (`allow_whitespace`); other control characters never are.
fn required(field: &'static str, value: &str, allow_whitespace: bool) -> TypeResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TypeError::MissingField(field));
    }
    let forbidden = |c: char| {
        matches!(c, '/' | '\\') || (c.is_control() && !(allow_whitespace && c.is_whitespace()))
    };
    if let Some(ch) = value.chars().find(|&c| forbidden(c)) {
        return Err(TypeError::InvalidField {
            field,
            reason: format!("must not contain {ch:?}"),
        });
    }
    if value.contains("..") {
        return Err(TypeError::InvalidField {
            field,
            reason: "must not contain \"..\"".into(),
        });
    }
    Ok(value.to_string())
}

/// Replace every run of whitespace with a single `-`.
///
/// ```
/// use shelf_types::hyphenate_name;
///
/// assert_eq!(hyphenate_name("Sony  Bravia 500"), "Sony-Bravia-500");
/// assert_eq!(hyphenate_name("plain"), "plain");
/// ```
pub fn hyphenate_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Normalize a file extension to `.ext` form.
///
/// Missing, empty, or unrecognized extensions (non-alphanumeric, or longer
/// than eight characters) fall back to [`DEFAULT_EXTENSION`].
pub fn normalize_extension(ext: Option<&str>) -> String {
    let Some(ext) = ext.map(str::trim) else {
        return DEFAULT_EXTENSION.to_string();
    };
    let bare = ext.strip_prefix('.').unwrap_or(ext);
    let valid = !bare.is_empty()
        && bare.len() <= MAX_EXTENSION_LEN
        && bare.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        format!(".{bare}")
    } else {
        DEFAULT_EXTENSION.to_string()
    }
}
