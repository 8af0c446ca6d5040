// Pagination stabilization: decide when a virtualized infinite-scroll
// surface has finished loading.

use anyhow::Result;
use tracing::{debug, warn};

use crate::pacing::Pacing;
use crate::traits::{Region, Surface};

/// How far one incremental-load scroll reaches, in pixels.
const SCROLL_STEP: i64 = 10_000;

/// Which settle delay the loop waits between scroll rounds.
#[derive(Debug, Clone, Copy)]
pub enum Settle {
    /// Fixed interval — the listing feed.
    Fixed,
    /// Jittered interval — the reviews panel.
    Jittered,
}

/// Scroll until the number of regions matching `locator` stops growing, then
/// return them truncated to `cap`.
///
/// Two consecutive equal counts mean the surface is settled. The loop also
/// stops as soon as the count reaches `cap`, and unconditionally after
/// `max_rounds` scrolls — the surface is adversarial and may never settle.
pub async fn settle(
    surface: &dyn Surface,
    locator: &str,
    cap: usize,
    max_rounds: u32,
    pacing: &Pacing,
    delay: Settle,
) -> Result<Vec<Box<dyn Region>>> {
    let mut count = 0usize;
    for round in 1..=max_rounds {
        surface.scroll_down(SCROLL_STEP).await?;
        match delay {
            Settle::Fixed => pacing.scroll_settle().await,
            Settle::Jittered => pacing.review_settle().await,
        }

        let mut regions = surface.find_all(locator).await?;
        let new_count = regions.len();
        debug!(locator, round, count = new_count, "Scroll round");

        if new_count == count || new_count >= cap || round == max_rounds {
            if round == max_rounds && new_count != count && new_count < cap {
                warn!(
                    locator,
                    count = new_count,
                    max_rounds,
                    "Surface never settled, stopping at round ceiling"
                );
            }
            regions.truncate(cap);
            return Ok(regions);
        }
        count = new_count;
    }

    // max_rounds == 0
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{text_region, MockSurface};

    fn cards(n: usize) -> Vec<crate::testing::MockRegion> {
        (0..n).map(|i| text_region(&format!("card {i}"))).collect()
    }

    #[tokio::test]
    async fn settles_on_two_equal_observations() {
        let surface = MockSurface::new().with_region_script("//card", vec![cards(3), cards(3)]);
        let regions = settle(&surface, "//card", usize::MAX, 50, &Pacing::zero(), Settle::Fixed)
            .await
            .unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(surface.find_count("//card"), 2);
        assert_eq!(surface.scroll_count(), 2);
    }

    #[tokio::test]
    async fn empty_surface_settles_immediately() {
        let surface = MockSurface::new();
        let regions = settle(&surface, "//card", usize::MAX, 50, &Pacing::zero(), Settle::Fixed)
            .await
            .unwrap();
        assert!(regions.is_empty());
        assert_eq!(surface.find_count("//card"), 1);
    }

    #[tokio::test]
    async fn cap_truncates_and_stops_early() {
        let surface = MockSurface::new().with_region_script("//card", vec![cards(5)]);
        let regions = settle(&surface, "//card", 3, 50, &Pacing::zero(), Settle::Jittered)
            .await
            .unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(surface.find_count("//card"), 1);
    }

    #[tokio::test]
    async fn round_ceiling_terminates_growing_surface() {
        let surface = MockSurface::new()
            .with_region_script("//card", vec![cards(1), cards(2), cards(3), cards(4)]);
        let regions = settle(&surface, "//card", usize::MAX, 3, &Pacing::zero(), Settle::Fixed)
            .await
            .unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(surface.find_count("//card"), 3);
    }
}
