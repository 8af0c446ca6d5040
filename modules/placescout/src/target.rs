// Per-target orchestration:
// NAVIGATE → SEARCH → PAGINATE → EXTRACT_EACH → PERSIST,
// with FAILED reachable from NAVIGATE after exhausting retries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::ScoutConfig;
use crate::dedup::DedupIndex;
use crate::listing::{ListingExtractor, Outcome};
use crate::locators;
use crate::model::PlaceBatch;
use crate::pacing::Pacing;
use crate::reviews::ReviewHarvester;
use crate::sink::BatchSink;
use crate::stabilize::{self, Settle};
use crate::traits::Surface;

/// Marker in the resolved URL that the surface served a bot challenge.
const CHALLENGE_MARKER: &str = "captcha";

/// Cooperative cancellation, checked between targets, between listings and
/// between navigation attempts. Batches already persisted are never lost to
/// a shutdown.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Stats from one full run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub targets_completed: u32,
    pub targets_failed: u32,
    pub places_committed: u32,
    pub reviews_harvested: u32,
    pub listings_skipped: u32,
    pub listings_failed: u32,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Run Complete ===")?;
        writeln!(f, "Targets completed: {}", self.targets_completed)?;
        writeln!(f, "Targets failed:    {}", self.targets_failed)?;
        writeln!(f, "Places committed:  {}", self.places_committed)?;
        writeln!(f, "Reviews harvested: {}", self.reviews_harvested)?;
        writeln!(f, "Listings skipped:  {}", self.listings_skipped)?;
        writeln!(f, "Listings failed:   {}", self.listings_failed)?;
        Ok(())
    }
}

pub struct TargetRunner {
    config: ScoutConfig,
    pacing: Pacing,
    extractor: ListingExtractor,
    dedup: DedupIndex,
    sink: Arc<dyn BatchSink>,
    cancel: CancelFlag,
}

impl TargetRunner {
    pub fn new(config: ScoutConfig, sink: Arc<dyn BatchSink>, cancel: CancelFlag) -> Self {
        let pacing = Pacing::from_config(&config);
        let extractor = ListingExtractor::new(ReviewHarvester::from_config(&config));
        Self {
            config,
            pacing,
            extractor,
            dedup: DedupIndex::new(),
            sink,
            cancel,
        }
    }

    pub fn dedup(&self) -> &DedupIndex {
        &self.dedup
    }

    /// Drive every target to completion, one at a time. A failed target is
    /// logged and its browsing context recycled; the run keeps going.
    pub async fn run_all(&self, surface: &dyn Surface, targets: &[String]) -> Result<RunStats> {
        let mut stats = RunStats::default();

        for target in targets {
            if self.cancel.is_cancelled() {
                warn!("Run cancelled, stopping before next target");
                break;
            }
            match self.run_target(surface, target, &mut stats).await {
                Ok(()) => {
                    stats.targets_completed += 1;
                }
                Err(e) => {
                    error!(target, error = %e, "Target failed");
                    stats.targets_failed += 1;
                    if let Err(e) = surface.recycle().await {
                        warn!(error = %e, "Failed to recycle browsing context");
                    }
                }
            }
        }

        Ok(stats)
    }

    async fn run_target(
        &self,
        surface: &dyn Surface,
        target: &str,
        stats: &mut RunStats,
    ) -> Result<()> {
        info!(target, "Starting target");
        self.navigate_with_retry(surface, target).await?;

        let mut batch = PlaceBatch::default();
        let result = self.extract_target(surface, target, &mut batch, stats).await;

        // Flush whatever completed even when the target faulted mid-way;
        // records already extracted are not discarded with the failure.
        if !batch.is_empty() {
            self.sink
                .append(target, &batch)
                .await
                .context("Failed to persist batch")?;
            stats.places_committed += batch.len() as u32;
        }

        result
    }

    async fn extract_target(
        &self,
        surface: &dyn Surface,
        target: &str,
        batch: &mut PlaceBatch,
        stats: &mut RunStats,
    ) -> Result<()> {
        // SEARCH
        surface
            .fill(locators::SEARCH_BOX, &self.config.search_term)
            .await
            .context("Search box not found")?;
        surface.press_enter().await?;
        surface
            .hover(locators::LISTING_LINK)
            .await
            .context("No listings rendered for search")?;

        // PAGINATE
        let listings = stabilize::settle(
            surface,
            locators::LISTING_CARD,
            self.config.listing_cap,
            self.config.max_listing_rounds,
            &self.pacing,
            Settle::Fixed,
        )
        .await?;
        info!(target, listings = listings.len(), "Pagination settled");

        // EXTRACT_EACH
        for listing in &listings {
            if self.cancel.is_cancelled() {
                warn!(target, "Run cancelled mid-target");
                break;
            }
            match self
                .extractor
                .extract(surface, listing.as_ref(), target, &self.dedup, &self.pacing)
                .await
            {
                Ok(Outcome::Extracted(place)) => {
                    stats.reviews_harvested += place.harvested_review_count;
                    batch.push(place);
                }
                Ok(Outcome::Skipped) => {
                    stats.listings_skipped += 1;
                }
                Err(e) => {
                    warn!(target, error = %e, "Listing extraction failed, skipping");
                    stats.listings_failed += 1;
                }
            }
        }

        Ok(())
    }

    /// NAVIGATE with bounded retries. A bot challenge is a distinct recovery
    /// path: cool down and retry the same attempt slot instead of consuming
    /// it — up to its own ceiling, so a permanently challenged target still
    /// terminates.
    async fn navigate_with_retry(&self, surface: &dyn Surface, target: &str) -> Result<()> {
        let url = format!("{}{}", self.config.base_url, target);
        let mut attempt = 1;
        let mut cooldowns = 0u32;

        while attempt <= self.config.nav_retries {
            if self.cancel.is_cancelled() {
                anyhow::bail!("Run cancelled during navigation to {url}");
            }
            match surface.goto(&url).await {
                Ok(()) => {
                    let resolved = surface.current_url().await?;
                    if resolved.contains(CHALLENGE_MARKER) {
                        cooldowns += 1;
                        if cooldowns > self.config.max_challenge_cooldowns {
                            anyhow::bail!(
                                "Still challenged after {cooldowns} cooldowns for {url}"
                            );
                        }
                        warn!(target, cooldowns, "Bot challenge detected, cooling down");
                        self.pacing.challenge_cooldown().await;
                        continue;
                    }
                    self.pacing.page_settle().await;
                    return Ok(());
                }
                Err(e) => {
                    warn!(target, attempt, error = %e, "Navigation failed");
                    attempt += 1;
                    if attempt <= self.config.nav_retries {
                        self.pacing.nav_backoff().await;
                    }
                }
            }
        }

        anyhow::bail!(
            "Navigation to {url} failed after {} attempts",
            self.config.nav_retries
        )
    }
}
