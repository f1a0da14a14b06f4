use serde::{Deserialize, Serialize};

/// One record of the storefront product list.
///
/// Field order is significant: it is the key order of the rendered object
/// literal (`name`, `shelfNumber`, `image`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    name: String,
    #[serde(rename = "shelfNumber")]
    shelf_number: String,
    image: String,
}

impl CatalogEntry {
    pub fn new(
        name: impl Into<String>,
        shelf_number: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            shelf_number: shelf_number.into(),
            image: image.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shelf_number(&self) -> &str {
        &self.shelf_number
    }

    /// Site-relative image path, e.g. `/photos/Sony-500_A1.jpg`.
    pub fn image(&self) -> &str {
        &self.image
    }
}
