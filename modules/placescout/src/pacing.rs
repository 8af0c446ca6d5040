// Delay schedule for every wait the engine performs.
//
// Randomized settle delays blur the fixed-interval signature that automation
// countermeasures key on. All jitter is drawn from one seeded RNG threaded
// through here, so a seeded run is reproducible.

use std::ops::Range;
use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;

use crate::config::ScoutConfig;

pub struct Pacing {
    rng: Mutex<StdRng>,
    listing_settle_ms: Range<u64>,
    review_settle_ms: Range<u64>,
    scroll_settle_ms: u64,
    page_settle_ms: u64,
    nav_backoff_ms: Range<u64>,
    challenge_cooldown_ms: u64,
}

impl Pacing {
    pub fn from_config(config: &ScoutConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
            listing_settle_ms: config.listing_settle_ms.clone(),
            review_settle_ms: config.review_settle_ms.clone(),
            scroll_settle_ms: config.scroll_settle_ms,
            page_settle_ms: config.page_settle_ms,
            nav_backoff_ms: config.nav_backoff_ms.clone(),
            challenge_cooldown_ms: config.challenge_cooldown_ms,
        }
    }

    /// All delays zero. For tests.
    #[cfg(any(test, feature = "test-support"))]
    pub fn zero() -> Self {
        Self::from_config(&ScoutConfig::fast())
    }

    pub(crate) fn jitter_ms(&self, range: &Range<u64>) -> u64 {
        if range.start >= range.end {
            return range.start;
        }
        self.rng
            .lock()
            .expect("pacing rng lock")
            .random_range(range.clone())
    }

    /// After opening a listing or switching tabs.
    pub async fn listing_settle(&self) {
        sleep(Duration::from_millis(self.jitter_ms(&self.listing_settle_ms))).await;
    }

    /// Between review-panel scroll rounds.
    pub async fn review_settle(&self) {
        sleep(Duration::from_millis(self.jitter_ms(&self.review_settle_ms))).await;
    }

    /// Between listing-feed scroll rounds.
    pub async fn scroll_settle(&self) {
        sleep(Duration::from_millis(self.scroll_settle_ms)).await;
    }

    /// After a navigation or reload, before touching the page.
    pub async fn page_settle(&self) {
        sleep(Duration::from_millis(self.page_settle_ms)).await;
    }

    /// Between failed navigation attempts.
    pub async fn nav_backoff(&self) {
        sleep(Duration::from_millis(self.jitter_ms(&self.nav_backoff_ms))).await;
    }

    /// After the surface served a bot challenge.
    pub async fn challenge_cooldown(&self) {
        sleep(Duration::from_millis(self.challenge_cooldown_ms)).await;
    }
}
