//! Decoration catalog: the fixed set of covers a record can receive.
//!
//! Every entry maps deterministically to a cover URL and a human-readable
//! description. The catalog is a `static` table, so there is nothing to
//! initialize at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base URL of the cover images hosted by Notion.
pub const COVER_BASE_URL: &str = "https://www.notion.so/images/page-cover";

/// Icon applied to every decorated record unless configured otherwise.
pub const DEFAULT_ICON: &str = "🚀";

/// Solid cover colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolidColor {
    Red,
    Blue,
    Yellow,
}

impl SolidColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
        }
    }
}

/// One cover from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DecorationSpec {
    Solid { color: SolidColor },
    Gradient { index: u8 },
}

/// The catalog, in the order the selector indexes it.
pub static CATALOG: [DecorationSpec; 10] = [
    DecorationSpec::Solid {
        color: SolidColor::Red,
    },
    DecorationSpec::Solid {
        color: SolidColor::Blue,
    },
    DecorationSpec::Solid {
        color: SolidColor::Yellow,
    },
    DecorationSpec::Gradient { index: 8 },
    DecorationSpec::Gradient { index: 4 },
    DecorationSpec::Gradient { index: 2 },
    DecorationSpec::Gradient { index: 11 },
    DecorationSpec::Gradient { index: 10 },
    DecorationSpec::Gradient { index: 5 },
    DecorationSpec::Gradient { index: 3 },
];

impl DecorationSpec {
    pub fn cover_url(&self) -> String {
        match self {
            Self::Solid { color } => format!("{COVER_BASE_URL}/solid_{}.png", color.as_str()),
            Self::Gradient { index } => format!("{COVER_BASE_URL}/gradients_{index}.png"),
        }
    }

    /// e.g. `solid red`, `gradient 8`
    pub fn description(&self) -> String {
        match self {
            Self::Solid { color } => format!("solid {}", color.as_str()),
            Self::Gradient { index } => format!("gradient {index}"),
        }
    }
}

impl fmt::Display for DecorationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// The full update sent for one record: icon marker plus the chosen cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub icon: String,
    pub cover: DecorationSpec,
}

impl Decoration {
    pub fn new(icon: impl Into<String>, cover: DecorationSpec) -> Self {
        Self {
            icon: icon.into(),
            cover,
        }
    }

    pub fn cover_url(&self) -> String {
        self.cover.cover_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_three_solids_and_seven_gradients() {
        let solids = CATALOG
            .iter()
            .filter(|d| matches!(d, DecorationSpec::Solid { .. }))
            .count();
        let mut gradients: Vec<u8> = CATALOG
            .iter()
            .filter_map(|d| match d {
                DecorationSpec::Gradient { index } => Some(*index),
                _ => None,
            })
            .collect();
        gradients.sort_unstable();

        assert_eq!(solids, 3);
        assert_eq!(gradients, vec![2, 3, 4, 5, 8, 10, 11]);
        assert_eq!(CATALOG.iter().collect::<HashSet<_>>().len(), 10);
    }

    #[rstest]
    #[case::red(
        DecorationSpec::Solid { color: SolidColor::Red },
        "https://www.notion.so/images/page-cover/solid_red.png",
        "solid red"
    )]
    #[case::yellow(
        DecorationSpec::Solid { color: SolidColor::Yellow },
        "https://www.notion.so/images/page-cover/solid_yellow.png",
        "solid yellow"
    )]
    #[case::gradient_8(
        DecorationSpec::Gradient { index: 8 },
        "https://www.notion.so/images/page-cover/gradients_8.png",
        "gradient 8"
    )]
    #[case::gradient_11(
        DecorationSpec::Gradient { index: 11 },
        "https://www.notion.so/images/page-cover/gradients_11.png",
        "gradient 11"
    )]
    fn url_and_description(
        #[case] spec: DecorationSpec,
        #[case] url: &str,
        #[case] description: &str,
    ) {
        assert_eq!(spec.cover_url(), url);
        assert_eq!(spec.description(), description);
        assert_eq!(spec.to_string(), description);
    }

    #[test]
    fn spec_is_tagged_by_type() {
        let v = serde_json::to_value(DecorationSpec::Solid {
            color: SolidColor::Blue,
        })
        .unwrap();
        assert_eq!(v["type"], "solid");
        assert_eq!(v["color"], "blue");

        let v = serde_json::to_value(DecorationSpec::Gradient { index: 3 }).unwrap();
        assert_eq!(v["type"], "gradient");
        assert_eq!(v["index"], 3);
    }
}
