// One listing → one Place record.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::dedup::DedupIndex;
use crate::fields;
use crate::locators;
use crate::model::{self, Place, PlaceBuilder, ABSENT};
use crate::pacing::Pacing;
use crate::reviews::ReviewHarvester;
use crate::traits::{Region, Surface};

/// Outcome of one listing pass.
#[derive(Debug)]
pub enum Outcome {
    Extracted(Place),
    /// The place was already committed in this run.
    Skipped,
}

pub struct ListingExtractor {
    harvester: ReviewHarvester,
}

impl ListingExtractor {
    pub fn new(harvester: ReviewHarvester) -> Self {
        Self { harvester }
    }

    /// Extract one listing into a Place.
    ///
    /// The name is read first and checked against the dedup index before any
    /// other work, so a known place costs one lookup instead of a full
    /// extraction. The index learns the name only after the record is fully
    /// built — a failed extraction never poisons it.
    pub async fn extract(
        &self,
        surface: &dyn Surface,
        listing: &dyn Region,
        search_key: &str,
        dedup: &DedupIndex,
        pacing: &Pacing,
    ) -> Result<Outcome> {
        listing.click().await.context("Failed to open listing")?;
        pacing.listing_settle().await;

        let name = fields::text_or(surface, locators::PLACE_NAME, ABSENT).await?;
        if dedup.contains(&name) {
            debug!(name, "Skipping already-committed place");
            return Ok(Outcome::Skipped);
        }

        let category = fields::text_or(surface, locators::PLACE_CATEGORY, ABSENT).await?;

        let price_label = fields::first_text(surface, locators::PLACE_PRICE)
            .await?
            .unwrap_or_else(|| "0".to_string());
        let price_tier = model::price_tier(&price_label)?;

        let address = fields::text_or(surface, locators::PLACE_ADDRESS, ABSENT).await?;
        let website = fields::text_or(surface, locators::PLACE_WEBSITE, ABSENT).await?;
        let phone = fields::text_or(surface, locators::PLACE_PHONE, ABSENT).await?;
        let review_count_label =
            fields::text_or(surface, locators::PLACE_REVIEW_COUNT, ABSENT).await?;
        let rating_label = fields::text_or(surface, locators::PLACE_RATING, ABSENT).await?;

        let (latitude, longitude) = model::coordinates_from_url(&surface.current_url().await?)?;

        let harvest = self.harvester.harvest(surface, pacing).await;

        let place = PlaceBuilder {
            search_key: search_key.to_string(),
            name,
            category,
            price_tier,
            address,
            website,
            phone,
            review_count_label,
            rating_label,
            latitude,
            longitude,
            harvest,
        }
        .build()?;

        dedup.insert(&place.name);
        info!(
            name = place.name.as_str(),
            reviews = place.harvested_review_count,
            "Place extracted"
        );
        Ok(Outcome::Extracted(place))
    }
}
