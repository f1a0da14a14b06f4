//! Catalog patching for Remote Shelf.
//!
//! The storefront's product list is a source module that declares one array
//! literal per product type:
//!
//! ```text
//! const data = [
//! {
//!       "name": "Sony-500",
//!       "shelfNumber": "A1",
//!       "image": "/photos/Sony-500_A1.jpg"
//! }];
//! ```
//!
//! Patching is text surgery, not a parse of the module. [`locate_array`]
//! finds the byte span between the brackets of `const <name> = [ ... ];`, and
//! [`insert_entry`] splices one rendered entry into that span. Every byte
//! outside the span is left untouched, so hand edits, comments, and
//! formatting elsewhere in the module survive.
//!
//! The declaration must match the anchor exactly. Anything else is reported
//! as a [`CatalogError`] rather than guessed at.

pub mod error;
pub mod patch;
pub mod region;
pub mod render;
mod scan;

pub use error::{CatalogError, CatalogResult};
pub use patch::insert_entry;
pub use region::{locate_array, ArrayRegion, CatalogArtifact};
pub use render::{render_entry, ENTRY_INDENT};
