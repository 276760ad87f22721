//! Static tables that drive outfit building: which categories fill each
//! slot, which tags suit an occasion, which colors make up a theme, and the
//! price envelope of each budget tier.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookSlot {
    Topwear,
    Bottomwear,
    Footwear,
    Accessory,
}

impl LookSlot {
    /// Slots in the order an outfit is assembled and presented.
    pub const ALL: [LookSlot; 4] =
        [LookSlot::Topwear, LookSlot::Bottomwear, LookSlot::Footwear, LookSlot::Accessory];

    pub fn as_str(&self) -> &'static str {
        match self {
            LookSlot::Topwear => "topwear",
            LookSlot::Bottomwear => "bottomwear",
            LookSlot::Footwear => "footwear",
            LookSlot::Accessory => "accessory",
        }
    }
}

impl fmt::Display for LookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookSlot {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "topwear" => Ok(Self::Topwear),
            "bottomwear" => Ok(Self::Bottomwear),
            "footwear" => Ok(Self::Footwear),
            "accessory" | "accessories" => Ok(Self::Accessory),
            other => Err(DomainError::UnknownSlot(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotCategories {
    pub slot: LookSlot,
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Occasion {
    pub id: String,
    pub label: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub id: String,
    pub label: String,
    pub colors: Vec<String>,
}

/// Whole-outfit spending envelope; either bound may be open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetTier {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

#[derive(Debug, Error)]
pub enum LookbookError {
    #[error("could not read lookbook file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse lookbook file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("lookbook has no categories for slot `{0}`")]
    MissingSlot(LookSlot),
    #[error("budget tier `{0}` has min above max")]
    InvertedBudget(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lookbook {
    pub slots: Vec<SlotCategories>,
    pub occasions: Vec<Occasion>,
    pub color_themes: Vec<ColorTheme>,
    pub budget_tiers: Vec<BudgetTier>,
}

impl Lookbook {
    pub fn load_toml(path: &Path) -> Result<Self, LookbookError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| LookbookError::ReadFile { path: path.to_path_buf(), source })?;
        let lookbook: Lookbook = toml::from_str(&raw)
            .map_err(|source| LookbookError::ParseFile { path: path.to_path_buf(), source })?;
        lookbook.validate()?;
        Ok(lookbook)
    }

    pub fn validate(&self) -> Result<(), LookbookError> {
        for slot in LookSlot::ALL {
            if self.slot_categories(slot).is_empty() {
                return Err(LookbookError::MissingSlot(slot));
            }
        }
        for tier in &self.budget_tiers {
            if let (Some(min), Some(max)) = (tier.min, tier.max) {
                if min > max {
                    return Err(LookbookError::InvertedBudget(tier.id.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn slot_categories(&self, slot: LookSlot) -> &[String] {
        self.slots
            .iter()
            .find(|entry| entry.slot == slot)
            .map(|entry| entry.categories.as_slice())
            .unwrap_or(&[])
    }

    pub fn occasion(&self, id: &str) -> Result<&Occasion, DomainError> {
        self.occasions
            .iter()
            .find(|occasion| occasion.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| DomainError::UnknownOccasion(id.to_owned()))
    }

    pub fn color_theme(&self, id: &str) -> Result<&ColorTheme, DomainError> {
        self.color_themes
            .iter()
            .find(|theme| theme.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| DomainError::UnknownColorTheme(id.to_owned()))
    }

    pub fn budget_tier(&self, id: &str) -> Result<&BudgetTier, DomainError> {
        self.budget_tiers
            .iter()
            .find(|tier| tier.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| DomainError::UnknownBudgetTier(id.to_owned()))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

impl Default for Lookbook {
    fn default() -> Self {
        Self {
            slots: vec![
                SlotCategories {
                    slot: LookSlot::Topwear,
                    categories: strings(&[
                        "Shirts",
                        "T-Shirts",
                        "Hoodies",
                        "Sweatshirts",
                        "Blazers",
                        "Jackets",
                        "Traditional",
                    ]),
                },
                SlotCategories {
                    slot: LookSlot::Bottomwear,
                    categories: strings(&["Jeans", "Trousers", "Joggers", "Shorts", "Track Pants"]),
                },
                SlotCategories { slot: LookSlot::Footwear, categories: strings(&["Footwear"]) },
                SlotCategories { slot: LookSlot::Accessory, categories: strings(&["Accessories"]) },
            ],
            occasions: vec![
                occasion("office", "Office", &["formal", "office", "classic"]),
                occasion("casual", "Casual", &["casual", "comfortable", "versatile"]),
                occasion("party", "Party", &["party", "evening", "statement"]),
                occasion("wedding", "Wedding", &["festive", "wedding", "traditional"]),
                occasion("date", "Date Night", &["premium", "classic", "trendy"]),
                occasion("festival", "Festival", &["festive", "traditional", "ethnic"]),
            ],
            color_themes: vec![
                theme("dark", "Dark & Bold", &["Black", "Navy", "Charcoal", "Dark Blue"]),
                theme("light", "Light & Fresh", &["White", "Light Blue", "Sky Blue", "Beige"]),
                theme("earth", "Earth Tones", &["Olive", "Khaki", "Brown", "Sand"]),
                theme("neutral", "Neutrals", &["Grey", "White", "Black", "Charcoal"]),
            ],
            budget_tiers: vec![
                tier("budget", "Under ₹3,000", None, Some(3_000)),
                tier("mid", "₹3,000 - ₹8,000", Some(3_000), Some(8_000)),
                tier("premium", "₹8,000 - ₹15,000", Some(8_000), Some(15_000)),
                tier("luxury", "₹15,000+", Some(15_000), None),
            ],
        }
    }
}

fn occasion(id: &str, label: &str, tags: &[&str]) -> Occasion {
    Occasion { id: id.to_owned(), label: label.to_owned(), tags: strings(tags) }
}

fn theme(id: &str, label: &str, colors: &[&str]) -> ColorTheme {
    ColorTheme { id: id.to_owned(), label: label.to_owned(), colors: strings(colors) }
}

fn tier(id: &str, label: &str, min: Option<i64>, max: Option<i64>) -> BudgetTier {
    BudgetTier {
        id: id.to_owned(),
        label: label.to_owned(),
        min: min.map(|value| Decimal::new(value, 0)),
        max: max.map(|value| Decimal::new(value, 0)),
    }
}
