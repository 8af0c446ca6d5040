// Review harvesting: activate the reviews tab, scroll the panel to
// stability, extract each review card.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::ScoutConfig;
use crate::fields;
use crate::locators;
use crate::model::{Harvest, Review, ABSENT, BASELINE_LANGUAGE};
use crate::pacing::Pacing;
use crate::stabilize::{self, Settle};
use crate::traits::{Region, Surface};

const REVIEWS_TAB_LABEL: &str = "Reviews";

/// Tab slots worth probing; the reviews tab moves around but stays early.
const TAB_SLOTS: [u8; 3] = [1, 2, 3];

pub struct ReviewHarvester {
    retries: u32,
    max_scroll_rounds: u32,
    language_of_interest: String,
}

impl ReviewHarvester {
    pub fn from_config(config: &ScoutConfig) -> Self {
        Self {
            retries: config.harvest_retries,
            max_scroll_rounds: config.max_review_rounds,
            language_of_interest: config.language_of_interest.clone(),
        }
    }

    /// Harvest every review reachable on the current place view.
    ///
    /// Retried as a unit: any failure reloads the page and starts over from
    /// tab activation. Exhausting the retries degrades to whatever the best
    /// attempt collected (possibly nothing) — a missing review set never
    /// aborts the parent record.
    pub async fn harvest(&self, surface: &dyn Surface, pacing: &Pacing) -> Harvest {
        let mut best_partial = Harvest::default();

        for attempt in 1..=self.retries {
            let mut harvest = Harvest::default();
            match self.harvest_once(surface, pacing, &mut harvest).await {
                Ok(()) => {
                    info!(
                        reviews = harvest.reviews.len(),
                        of_interest = harvest.of_interest,
                        other_language = harvest.other_language,
                        "Reviews harvested"
                    );
                    return harvest;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        retries = self.retries,
                        error = %e,
                        "Review harvest failed"
                    );
                    if harvest.reviews.len() > best_partial.reviews.len() {
                        best_partial = harvest;
                    }
                    if attempt < self.retries {
                        if let Err(e) = surface.reload().await {
                            warn!(error = %e, "Reload after failed harvest also failed");
                        }
                        pacing.page_settle().await;
                    }
                }
            }
        }

        warn!(
            kept = best_partial.reviews.len(),
            "Review harvest exhausted retries, keeping partial result"
        );
        best_partial
    }

    async fn harvest_once(
        &self,
        surface: &dyn Surface,
        pacing: &Pacing,
        out: &mut Harvest,
    ) -> Result<()> {
        self.activate_reviews_tab(surface, pacing).await?;

        let cards = stabilize::settle(
            surface,
            locators::REVIEW_CARD,
            usize::MAX,
            self.max_scroll_rounds,
            pacing,
            Settle::Jittered,
        )
        .await?;

        for card in &cards {
            let (review, translated) = extract_review(card.as_ref()).await?;
            // The surface only marks translated reviews, so the marker itself
            // is the non-baseline signal regardless of the name it carries.
            if translated {
                out.other_language += 1;
                if review.language == self.language_of_interest {
                    out.of_interest += 1;
                }
            }
            out.reviews.push(review);
        }
        Ok(())
    }

    /// Probe the early tab slots for the one labelled "Reviews" and click it.
    /// When no slot matches, proceed anyhow and harvest whatever panel is
    /// showing rather than failing the whole harvest.
    async fn activate_reviews_tab(&self, surface: &dyn Surface, pacing: &Pacing) -> Result<()> {
        for index in TAB_SLOTS {
            let locator = locators::tab_slot(index);
            let tabs = surface.find_all(&locator).await?;
            let Some(tab) = tabs.first() else {
                continue;
            };
            if tab.text().await?.trim() == REVIEWS_TAB_LABEL {
                tab.click().await?;
                pacing.listing_settle().await;
                return Ok(());
            }
            debug!(index, "Tab slot is not the reviews tab");
        }
        warn!("Reviews tab not found in any probed slot, proceeding anyhow");
        Ok(())
    }
}

/// Extract one review card. Every sub-field defaults independently on
/// absence; only a surface fault propagates. The flag reports whether the
/// card carried a translation marker.
async fn extract_review(card: &dyn Region) -> Result<(Review, bool)> {
    let reviewer_name = fields::region_text_or(card, locators::REVIEWER_NAME, ABSENT).await?;
    let reviewer_info = fields::region_text_or(card, locators::REVIEWER_INFO, ABSENT).await?;
    let date = fields::region_text_or(card, locators::REVIEW_DATE, ABSENT).await?;
    let text = fields::region_text_or(card, locators::REVIEW_TEXT, ABSENT).await?;

    // The rating rides in an aria-label ("4.0 stars"); a label that lost its
    // numeric prefix is a parse miss for this field only.
    let rating = match card.find_all(locators::REVIEW_RATING).await?.first() {
        Some(region) => region
            .attribute("aria-label")
            .await?
            .as_deref()
            .and_then(fields::leading_number),
        None => None,
    };

    let photo_count = card.find_all(locators::REVIEW_PHOTOS).await?.len() as u32;

    let marker = fields::region_text(card, locators::REVIEW_LANGUAGE).await?;
    let translated = marker.is_some();
    let language = match marker {
        Some(marker) => parse_language_marker(&marker),
        None => BASELINE_LANGUAGE.to_string(),
    };

    Ok((
        Review {
            reviewer_name,
            reviewer_info,
            language,
            date,
            rating,
            photo_count,
            text,
        },
        translated,
    ))
}

/// Pull the language name out of a translation marker like
/// "See original (Russian)".
fn parse_language_marker(marker: &str) -> String {
    let tail = marker.rsplit_once('(').map(|(_, t)| t).unwrap_or(marker);
    tail.split(')').next().unwrap_or(tail).trim().to_string()
}
