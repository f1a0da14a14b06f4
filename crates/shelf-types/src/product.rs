use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of appliance a remote control belongs to.
///
/// Each product type has its own blob folder and its own catalog artifact,
/// so uploads of different types never contend on the same catalog file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "TV")]
    Tv,
    #[serde(rename = "AC")]
    Ac,
}

impl ProductType {
    /// All known product types.
    pub const ALL: [ProductType; 2] = [ProductType::Tv, ProductType::Ac];

    /// Wire name, as sent by the upload form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tv => "TV",
            Self::Ac => "AC",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TV" => Ok(Self::Tv),
            "AC" => Ok(Self::Ac),
            other => Err(TypeError::UnknownProductType(other.to_string())),
        }
    }
}
