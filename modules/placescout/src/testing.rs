// Test mocks for the extraction pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockSurface (Surface) — scripted navigation and region lookups
// - MemorySink (BatchSink) — collects flushed batches in memory
//
// Plus helpers for building region trees (text_region, review_card).

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::locators;
use crate::model::{Place, PlaceBatch};
use crate::sink::BatchSink;
use crate::traits::{Region, Surface};

/// Default view URL; carries coordinates so extraction succeeds out of the box.
pub const DEFAULT_URL: &str = "https://maps.example.com/search/@25.276,55.296,15z";

// ---------------------------------------------------------------------------
// MockRegion
// ---------------------------------------------------------------------------

/// One scripted element region. Clones share the click counter, so a test
/// can keep the original and observe clicks made on clones handed to the
/// engine.
#[derive(Clone, Default)]
pub struct MockRegion {
    text: String,
    attrs: HashMap<String, String>,
    children: HashMap<String, Vec<MockRegion>>,
    click_fails: bool,
    clicks: Arc<AtomicU32>,
}

impl MockRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, locator: &str, child: MockRegion) -> Self {
        self.children.entry(locator.to_string()).or_default().push(child);
        self
    }

    pub fn failing_click(mut self) -> Self {
        self.click_fails = true;
        self
    }

    pub fn click_count(&self) -> u32 {
        self.clicks.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Region for MockRegion {
    async fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn click(&self) -> Result<()> {
        if self.click_fails {
            bail!("region went stale");
        }
        self.clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<Box<dyn Region>>> {
        Ok(self
            .children
            .get(locator)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|r| Box::new(r) as Box<dyn Region>)
            .collect())
    }
}

pub fn text_region(text: &str) -> MockRegion {
    MockRegion::new().with_text(text)
}

/// A review card with the usual sub-fields populated.
pub fn review_card(
    reviewer: &str,
    text: &str,
    language_marker: Option<&str>,
    rating_label: Option<&str>,
) -> MockRegion {
    let mut card = MockRegion::new()
        .with_child(locators::REVIEWER_NAME, text_region(reviewer))
        .with_child(locators::REVIEWER_INFO, text_region("Local Guide"))
        .with_child(locators::REVIEW_DATE, text_region("2 weeks ago"))
        .with_child(locators::REVIEW_TEXT, text_region(text));
    if let Some(marker) = language_marker {
        card = card.with_child(locators::REVIEW_LANGUAGE, text_region(marker));
    }
    if let Some(label) = rating_label {
        card = card.with_child(
            locators::REVIEW_RATING,
            MockRegion::new().with_attr("aria-label", label),
        );
    }
    card
}

// ---------------------------------------------------------------------------
// MockSurface
// ---------------------------------------------------------------------------

/// Scripted navigation step: what the next `goto` does.
pub enum NavStep {
    /// Navigation succeeds and the view resolves to this URL.
    Resolve(String),
    /// Navigation errors.
    Fail(String),
}

/// Scripted surface. Builder pattern: `.with_regions()`, `.with_region_script()`,
/// `.with_nav_script()`, `.failing_find()`.
///
/// `find_all` serves per-locator scripts first (one scripted set per call,
/// for stabilization sequences), then the static region map, then empty.
#[derive(Default)]
pub struct MockSurface {
    regions: Mutex<HashMap<String, Vec<MockRegion>>>,
    region_script: Mutex<HashMap<String, VecDeque<Vec<MockRegion>>>>,
    nav_script: Mutex<VecDeque<NavStep>>,
    fail_locators: HashSet<String>,
    current_url: Mutex<String>,
    find_log: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
    fills: Mutex<Vec<(String, String)>>,
    reloads: AtomicU32,
    scrolls: AtomicU32,
    recycles: AtomicU32,
}

impl MockSurface {
    pub fn new() -> Self {
        let surface = Self::default();
        *surface.current_url.lock().unwrap() = DEFAULT_URL.to_string();
        surface
    }

    pub fn with_url(self, url: &str) -> Self {
        *self.current_url.lock().unwrap() = url.to_string();
        self
    }

    /// Static regions returned for a locator on every call.
    pub fn with_regions(self, locator: &str, regions: Vec<MockRegion>) -> Self {
        self.regions
            .lock()
            .unwrap()
            .insert(locator.to_string(), regions);
        self
    }

    pub fn with_region(self, locator: &str, region: MockRegion) -> Self {
        self.with_regions(locator, vec![region])
    }

    /// Successive region sets for a locator, one consumed per `find_all`.
    pub fn with_region_script(self, locator: &str, sets: Vec<Vec<MockRegion>>) -> Self {
        self.region_script
            .lock()
            .unwrap()
            .insert(locator.to_string(), sets.into());
        self
    }

    pub fn with_nav_script(self, steps: Vec<NavStep>) -> Self {
        *self.nav_script.lock().unwrap() = steps.into();
        self
    }

    /// Every `find_all` for this locator errors.
    pub fn failing_find(mut self, locator: &str) -> Self {
        self.fail_locators.insert(locator.to_string());
        self
    }

    pub fn find_log(&self) -> Vec<String> {
        self.find_log.lock().unwrap().clone()
    }

    pub fn find_count(&self, locator: &str) -> usize {
        self.find_log
            .lock()
            .unwrap()
            .iter()
            .filter(|l| *l == locator)
            .count()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.fills.lock().unwrap().clone()
    }

    pub fn reload_count(&self) -> u32 {
        self.reloads.load(Ordering::Relaxed)
    }

    pub fn scroll_count(&self) -> u32 {
        self.scrolls.load(Ordering::Relaxed)
    }

    pub fn recycle_count(&self) -> u32 {
        self.recycles.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Surface for MockSurface {
    async fn goto(&self, url: &str) -> Result<()> {
        self.navigations.lock().unwrap().push(url.to_string());
        let step = self.nav_script.lock().unwrap().pop_front();
        match step {
            Some(NavStep::Resolve(resolved)) => {
                *self.current_url.lock().unwrap() = resolved;
                Ok(())
            }
            Some(NavStep::Fail(message)) => bail!("navigation failed: {message}"),
            None => {
                *self.current_url.lock().unwrap() = DEFAULT_URL.to_string();
                Ok(())
            }
        }
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<Box<dyn Region>>> {
        self.find_log.lock().unwrap().push(locator.to_string());
        if self.fail_locators.contains(locator) {
            bail!("lookup failed for {locator}");
        }

        let scripted = self
            .region_script
            .lock()
            .unwrap()
            .get_mut(locator)
            .and_then(|sets| sets.pop_front());
        let regions = match scripted {
            Some(set) => set,
            None => self
                .regions
                .lock()
                .unwrap()
                .get(locator)
                .cloned()
                .unwrap_or_default(),
        };
        Ok(regions
            .into_iter()
            .map(|r| Box::new(r) as Box<dyn Region>)
            .collect())
    }

    async fn fill(&self, locator: &str, text: &str) -> Result<()> {
        self.fills
            .lock()
            .unwrap()
            .push((locator.to_string(), text.to_string()));
        Ok(())
    }

    async fn press_enter(&self) -> Result<()> {
        Ok(())
    }

    async fn hover(&self, _locator: &str) -> Result<()> {
        Ok(())
    }

    async fn scroll_down(&self, _pixels: i64) -> Result<()> {
        self.scrolls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.current_url.lock().unwrap().clone())
    }

    async fn reload(&self) -> Result<()> {
        self.reloads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn recycle(&self) -> Result<()> {
        self.recycles.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySink {
    batches: Mutex<Vec<(String, Vec<Place>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<(String, Vec<Place>)> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchSink for MemorySink {
    async fn append(&self, target: &str, batch: &PlaceBatch) -> Result<()> {
        self.batches
            .lock()
            .unwrap()
            .push((target.to_string(), batch.places.clone()));
        Ok(())
    }
}
