//! XPath locators for the map listing surface.
//!
//! Class names here are the surface's generated ones and churn with its
//! releases; they are isolated in this module so an update touches one file.

pub const SEARCH_BOX: &str = r#"//input[@id="searchboxinput"]"#;

/// Anchor of one result in the scrollable feed.
pub const LISTING_LINK: &str = r#"//a[contains(@href, "https://www.google.com/maps/place")]"#;
/// The clickable card wrapping the anchor.
pub const LISTING_CARD: &str = r#"//a[contains(@href, "https://www.google.com/maps/place")]/.."#;

// Detail pane of the currently opened place.
pub const PLACE_NAME: &str = r#"//h1[contains(@class, "DUwDvf")]"#;
pub const PLACE_CATEGORY: &str = r#"//button[contains(@class, "DkEaL ")]"#;
pub const PLACE_PRICE: &str = r#"(//span[contains(@class, "mgr77e")]//span//span)[4]"#;
pub const PLACE_ADDRESS: &str =
    r#"//button[@data-item-id="address"]//div[contains(@class, "fontBodyMedium")]"#;
pub const PLACE_WEBSITE: &str =
    r#"//a[@data-item-id="authority"]//div[contains(@class, "fontBodyMedium")]"#;
pub const PLACE_PHONE: &str =
    r#"//button[contains(@data-item-id, "phone:tel:")]//div[contains(@class, "fontBodyMedium")]"#;
pub const PLACE_REVIEW_COUNT: &str = r#"//div[@jsaction="pane.reviewChart.moreReviews"]//span"#;
pub const PLACE_RATING: &str =
    r#"//div[@jsaction="pane.reviewChart.moreReviews"]//div[@role="img"]"#;

/// Tab slot in the detail pane; the reviews tab moves between slots.
pub fn tab_slot(index: u8) -> String {
    format!(r#"//button[@data-tab-index="{index}"]"#)
}

/// One review card in the reviews panel.
pub const REVIEW_CARD: &str = r#"//div[@data-review-id]"#;

// Sub-fields relative to one review card.
pub const REVIEWER_NAME: &str = r#".//div[contains(@class, "d4r55")]"#;
pub const REVIEWER_INFO: &str = r#".//div[contains(@class, "RfnDt")]"#;
pub const REVIEW_LANGUAGE: &str = r#".//div[contains(@class, "oqftme")]"#;
pub const REVIEW_TEXT: &str = r#".//span[contains(@class, "wiI7pd")]"#;
pub const REVIEW_DATE: &str = r#".//span[contains(@class, "rsqaWe")]"#;
pub const REVIEW_RATING: &str = r#".//span[contains(@class, "kvMYJc")]"#;
pub const REVIEW_PHOTOS: &str = r#".//button[contains(@class, "KtCyie")]"#;
