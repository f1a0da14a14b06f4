//! Placement of blobs and catalog artifacts inside the content store.
//!
//! Each [`ProductType`] owns a blob folder, a site-relative image folder, and
//! exactly one catalog artifact holding one array declaration. The defaults
//! match the storefront repository the service was built for.

use serde::{Deserialize, Serialize};

use crate::entry::CatalogEntry;
use crate::product::ProductType;
use crate::request::ValidUpload;

/// Store paths for one product type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLayout {
    /// Store folder that receives uploaded photos (e.g. `public/photos`).
    pub blob_root: String,
    /// Site-relative folder the storefront serves those photos from (e.g. `photos`).
    pub image_root: String,
    /// Store path of the catalog artifact.
    pub catalog_path: String,
    /// Name of the array variable declared in the catalog artifact.
    pub variable_name: String,
}

/// Store layout for all product types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub tv: ProductLayout,
    pub ac: ProductLayout,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            tv: ProductLayout {
                blob_root: "public/photos".into(),
                image_root: "photos".into(),
                catalog_path: "src/context/ProductContext.jsx".into(),
                variable_name: "data".into(),
            },
            ac: ProductLayout {
                blob_root: "public/acphoto".into(),
                image_root: "acphoto".into(),
                catalog_path: "src/context/ACProductContext.jsx".into(),
                variable_name: "acData".into(),
            },
        }
    }
}

impl Layout {
    pub fn for_product(&self, product: ProductType) -> &ProductLayout {
        match product {
            ProductType::Tv => &self.tv,
            ProductType::Ac => &self.ac,
        }
    }

    /// Store path the upload's photo is written to.
    ///
    /// A pure function of product type, name, shelf, and extension.
    pub fn blob_path(&self, upload: &ValidUpload) -> String {
        let root = self.for_product(upload.product).blob_root.trim_matches('/');
        let file = upload.file_name();
        if root.is_empty() {
            file
        } else {
            format!("{root}/{file}")
        }
    }

    /// Site-relative URL of the upload's photo, as recorded in the catalog.
    pub fn image_url(&self, upload: &ValidUpload) -> String {
        let root = self.for_product(upload.product).image_root.trim_matches('/');
        if root.is_empty() {
            format!("/{}", upload.file_name())
        } else {
            format!("/{root}/{}", upload.file_name())
        }
    }

    /// Store path of the catalog artifact for a product type.
    pub fn catalog_path(&self, product: ProductType) -> &str {
        &self.for_product(product).catalog_path
    }

    /// Array variable name for a product type.
    pub fn variable_name(&self, product: ProductType) -> &str {
        &self.for_product(product).variable_name
    }

    /// Catalog record describing the upload.
    pub fn catalog_entry(&self, upload: &ValidUpload) -> CatalogEntry {
        CatalogEntry::new(&upload.name, &upload.shelf, self.image_url(upload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::UploadRequest;
    use proptest::prelude::*;

    fn upload(product: &str, name: &str, shelf: &str, ext: Option<&str>) -> ValidUpload {
        UploadRequest {
            product_type: product.into(),
            name: name.into(),
            shelf: shelf.into(),
            image: vec![0xff, 0xd8, 0xff],
            extension: ext.map(str::to_string),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn tv_paths() {
        let layout = Layout::default();
        let up = upload("TV", "Sony-500", "A1", Some(".jpg"));
        assert_eq!(layout.blob_path(&up), "public/photos/Sony-500_A1.jpg");
        assert_eq!(layout.image_url(&up), "/photos/Sony-500_A1.jpg");
        assert_eq!(layout.catalog_path(ProductType::Tv), "src/context/ProductContext.jsx");
        assert_eq!(layout.variable_name(ProductType::Tv), "data");
    }

    #[test]
    fn ac_paths() {
        let layout = Layout::default();
        let up = upload("AC", "Daikin  Split", "C2", Some("png"));
        assert_eq!(layout.blob_path(&up), "public/acphoto/Daikin-Split_C2.png");
        assert_eq!(layout.image_url(&up), "/acphoto/Daikin-Split_C2.png");
        assert_eq!(layout.catalog_path(ProductType::Ac), "src/context/ACProductContext.jsx");
        assert_eq!(layout.variable_name(ProductType::Ac), "acData");
    }

    #[test]
    fn empty_roots_collapse() {
        let mut layout = Layout::default();
        layout.tv.blob_root = "/".into();
        layout.tv.image_root = String::new();
        let up = upload("TV", "X", "1", None);
        assert_eq!(layout.blob_path(&up), "X_1.jpg");
        assert_eq!(layout.image_url(&up), "/X_1.jpg");
    }

    #[test]
    fn catalog_entry_uses_original_name() {
        let layout = Layout::default();
        let up = upload("TV", "Sony Bravia", "A1", None);
        let entry = layout.catalog_entry(&up);
        assert_eq!(entry.name(), "Sony Bravia");
        assert_eq!(entry.shelf_number(), "A1");
        assert_eq!(entry.image(), "/photos/Sony-Bravia_A1.jpg");
    }

    #[test]
    fn layout_deserializes_partially() {
        let json = r#"{"tv":{"blob_root":"img/tv","image_root":"tv","catalog_path":"tv.js","variable_name":"tvs"}}"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.tv.variable_name, "tvs");
        assert_eq!(layout.ac, Layout::default().ac);
    }

    proptest! {
        #[test]
        fn blob_path_is_deterministic(
            product in prop_oneof![Just("TV"), Just("AC")],
            name in "[A-Za-z0-9][A-Za-z0-9 ]{0,20}",
            shelf in "[A-Z][0-9]{1,3}",
            ext in prop_oneof![Just(None), Just(Some("png")), Just(Some(".jpeg")), Just(Some("??"))],
        ) {
            let layout = Layout::default();
            let a = upload(product, &name, &shelf, ext);
            let b = upload(product, &name, &shelf, ext);
            prop_assert_eq!(layout.blob_path(&a), layout.blob_path(&b));
            let path = layout.blob_path(&a);
            prop_assert!(!path.contains(' '));
            prop_assert!(path.starts_with(&layout.for_product(a.product).blob_root));
        }
    }
}
