//! Product categories offered by the shop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sublimation product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// Shirts, tote bags and other fabric goods.
    #[default]
    Textil,
    /// Mugs and ceramic tiles.
    #[serde(rename = "Cerámica")]
    Ceramica,
    /// Aluminium plates and bottles.
    Aluminio,
    /// Caps.
    Gorras,
    /// Direct-to-film transfers.
    #[serde(rename = "DTF")]
    Dtf,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Textil,
        Self::Ceramica,
        Self::Aluminio,
        Self::Gorras,
        Self::Dtf,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Textil => "Textil",
            Self::Ceramica => "Cerámica",
            Self::Aluminio => "Aluminio",
            Self::Gorras => "Gorras",
            Self::Dtf => "DTF",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid category: {0}")]
pub struct CategoryParseError(pub String);

impl std::str::FromStr for Category {
    type Err = CategoryParseError;

    /// Case-insensitive; accepts `ceramica` without the accent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "textil" => Ok(Self::Textil),
            "cerámica" | "ceramica" => Ok(Self::Ceramica),
            "aluminio" => Ok(Self::Aluminio),
            "gorras" => Ok(Self::Gorras),
            "dtf" => Ok(Self::Dtf),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}
