// Field-level extraction helpers.
//
// Contract: a locator that matches nothing is ABSENT, never an error; the
// caller maps ABSENT to a defined default. A region that matches but fails
// to parse its expected shape is a fault for that one field only.

use anyhow::Result;

use crate::traits::{Region, Surface};

/// Text of the first region matching `locator`, or `None` when nothing matches.
pub async fn first_text(surface: &dyn Surface, locator: &str) -> Result<Option<String>> {
    let regions = surface.find_all(locator).await?;
    match regions.first() {
        Some(region) => Ok(Some(region.text().await?)),
        None => Ok(None),
    }
}

pub async fn text_or(surface: &dyn Surface, locator: &str, default: &str) -> Result<String> {
    Ok(first_text(surface, locator)
        .await?
        .unwrap_or_else(|| default.to_string()))
}

/// Scoped variant for sub-fields inside one region.
pub async fn region_text(region: &dyn Region, locator: &str) -> Result<Option<String>> {
    let matches = region.find_all(locator).await?;
    match matches.first() {
        Some(sub) => Ok(Some(sub.text().await?)),
        None => Ok(None),
    }
}

pub async fn region_text_or(region: &dyn Region, locator: &str, default: &str) -> Result<String> {
    Ok(region_text(region, locator)
        .await?
        .unwrap_or_else(|| default.to_string()))
}

/// Numeric prefix of a rating label ("4.0 stars" → 4.0). `None` when the
/// label lost its number — the caller substitutes ABSENT.
pub fn leading_number(label: &str) -> Option<f64> {
    label.split_whitespace().next()?.parse().ok()
}
