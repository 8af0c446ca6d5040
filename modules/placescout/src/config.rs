use std::env;
use std::ops::Range;
use std::path::PathBuf;

/// Engine configuration. `Default` carries the production values; the
/// environment and CLI override the few knobs operators actually turn.
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// Targets are appended to this to select a starting view.
    pub base_url: String,
    /// Fixed query submitted on every target.
    pub search_term: String,

    /// Navigation attempts per target before the target is marked failed.
    pub nav_retries: u32,
    /// Review harvest attempts per place before degrading to a partial set.
    pub harvest_retries: u32,
    /// Bot-challenge cooldowns tolerated within one navigation before giving up.
    pub max_challenge_cooldowns: u32,

    /// Listings extracted per target.
    pub listing_cap: usize,
    /// Scroll-round ceiling for the listing feed. The surface is adversarial;
    /// without a ceiling a never-settling feed would spin forever.
    pub max_listing_rounds: u32,
    /// Scroll-round ceiling for the reviews panel.
    pub max_review_rounds: u32,

    /// Reviews in this language get their own counter.
    pub language_of_interest: String,

    pub output_dir: PathBuf,

    /// Seed for all jittered delays; None draws from the OS.
    pub rng_seed: Option<u64>,

    // Delay schedule, milliseconds.
    pub listing_settle_ms: Range<u64>,
    pub review_settle_ms: Range<u64>,
    pub scroll_settle_ms: u64,
    pub page_settle_ms: u64,
    pub nav_backoff_ms: Range<u64>,
    pub challenge_cooldown_ms: u64,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.google.com/maps/".to_string(),
            search_term: "restaurant".to_string(),
            nav_retries: 3,
            harvest_retries: 3,
            max_challenge_cooldowns: 5,
            listing_cap: usize::MAX,
            max_listing_rounds: 120,
            max_review_rounds: 200,
            language_of_interest: "Russian".to_string(),
            output_dir: PathBuf::from("output"),
            rng_seed: None,
            listing_settle_ms: 2_000..5_000,
            review_settle_ms: 2_000..6_000,
            scroll_settle_ms: 3_000,
            page_settle_ms: 5_000,
            nav_backoff_ms: 5_000..10_000,
            challenge_cooldown_ms: 60_000,
        }
    }
}

impl ScoutConfig {
    /// Production defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("PLACESCOUT_LANGUAGE") {
            config.language_of_interest = v;
        }
        if let Ok(v) = env::var("PLACESCOUT_OUTPUT_DIR") {
            config.output_dir = v.into();
        }
        if let Ok(v) = env::var("PLACESCOUT_SEED") {
            config.rng_seed = v.parse().ok();
        }
        config
    }

    /// Zero delays, small ceilings, fixed seed. For tests.
    #[cfg(any(test, feature = "test-support"))]
    pub fn fast() -> Self {
        Self {
            base_url: "https://maps.example.com/".to_string(),
            rng_seed: Some(42),
            max_listing_rounds: 10,
            max_review_rounds: 10,
            listing_settle_ms: 0..0,
            review_settle_ms: 0..0,
            scroll_settle_ms: 0,
            page_settle_ms: 0,
            nav_backoff_ms: 0..0,
            challenge_cooldown_ms: 0,
            ..Self::default()
        }
    }
}
