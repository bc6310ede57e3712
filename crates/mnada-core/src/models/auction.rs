use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item categories offered by the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Motor Vehicles")]
    MotorVehicles,
    Electronics,
    #[serde(rename = "Land & Real Estate")]
    LandRealEstate,
    Furniture,
    #[serde(rename = "Art & Collectibles")]
    ArtCollectibles,
    #[serde(rename = "Jewelry & Watches")]
    JewelryWatches,
    Antiques,
    Machinery,
    Others,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::MotorVehicles,
        Category::Electronics,
        Category::LandRealEstate,
        Category::Furniture,
        Category::ArtCollectibles,
        Category::JewelryWatches,
        Category::Antiques,
        Category::Machinery,
        Category::Others,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::MotorVehicles => "Motor Vehicles",
            Category::Electronics => "Electronics",
            Category::LandRealEstate => "Land & Real Estate",
            Category::Furniture => "Furniture",
            Category::ArtCollectibles => "Art & Collectibles",
            Category::JewelryWatches => "Jewelry & Watches",
            Category::Antiques => "Antiques",
            Category::Machinery => "Machinery",
            Category::Others => "Others",
        }
    }

    /// Next category in picker order; `None` starts at the first one.
    pub fn cycle(current: Option<Category>) -> Category {
        match current {
            None => Category::ALL[0],
            Some(category) => {
                let index = Category::ALL
                    .iter()
                    .position(|c| *c == category)
                    .unwrap_or(0);
                Category::ALL[(index + 1) % Category::ALL.len()]
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "pending"),
            ItemStatus::Approved => write!(f, "approved"),
            ItemStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// An auction listed in the public catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Auction {
    pub id: i64,
    pub item: String,
    #[serde(rename = "startingPrice")]
    pub starting_price: f64,
    #[serde(rename = "endTime", default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of a new item submission. Built only through `forms::ItemDraft::validate`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemSubmission {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    #[serde(rename = "startingBid")]
    pub starting_bid: f64,
    pub category: Category,
    #[serde(rename = "startDate")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<Utc>,
}

/// An item as stored by the catalog, pending or past admin review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuctionItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "startingBid")]
    pub starting_bid: f64,
    pub category: Category,
    #[serde(rename = "startDate")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_uses_display_names() {
        assert_eq!(
            serde_json::to_string(&Category::LandRealEstate).unwrap(),
            "\"Land & Real Estate\""
        );
        let parsed: Category = serde_json::from_str("\"Jewelry & Watches\"").unwrap();
        assert_eq!(parsed, Category::JewelryWatches);
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.display_name()));
        }
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(Category::cycle(None), Category::MotorVehicles);
        assert_eq!(Category::cycle(Some(Category::MotorVehicles)), Category::Electronics);
        assert_eq!(Category::cycle(Some(Category::Others)), Category::MotorVehicles);
    }

    #[test]
    fn test_auction_parses_optional_fields() {
        let auction: Auction =
            serde_json::from_str(r#"{"id":1,"item":"Laptop","startingPrice":500}"#).unwrap();
        assert_eq!(auction.item, "Laptop");
        assert_eq!(auction.starting_price, 500.0);
        assert!(auction.end_time.is_none());
    }

    #[test]
    fn test_item_status_defaults_to_pending() {
        let item: AuctionItem = serde_json::from_str(
            r#"{"id":7,"name":"Vase","startingBid":100.0,"category":"Antiques",
                "startDate":"2026-01-01T10:00:00Z","endDate":"2026-01-03T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(item.status, ItemStatus::Pending);
        assert!(item.images.is_empty());
    }
}
