// Trait abstractions for the automation surface.
//
// Surface replaces a concrete WebDriver session — every interaction the
// engine performs flows through this seam, so the whole pipeline runs under
// test against MockSurface: no browser, no network.

use anyhow::Result;
use async_trait::async_trait;

/// A handle to one rendered element region.
#[async_trait]
pub trait Region: Send + Sync {
    async fn text(&self) -> Result<String>;

    /// `None` when the attribute is not present on the region.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    async fn click(&self) -> Result<()>;

    /// Scoped lookup under this region. Zero matches is `Ok(vec![])`.
    async fn find_all(&self, locator: &str) -> Result<Vec<Box<dyn Region>>>;
}

/// The rendering/automation surface the engine drives. One instance holds
/// exactly one navigable "current view"; clicking a different listing
/// invalidates in-flight regions of the previous one, which is why extraction
/// within a target is sequential.
#[async_trait]
pub trait Surface: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Zero matches is `Ok(vec![])`, never an error.
    async fn find_all(&self, locator: &str) -> Result<Vec<Box<dyn Region>>>;

    async fn fill(&self, locator: &str, text: &str) -> Result<()>;

    async fn press_enter(&self) -> Result<()>;

    async fn hover(&self, locator: &str) -> Result<()>;

    async fn scroll_down(&self, pixels: i64) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    async fn reload(&self) -> Result<()>;

    /// Tear down the current browsing context and open a fresh one.
    async fn recycle(&self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Production impls over webdriver-client
// ---------------------------------------------------------------------------

#[async_trait]
impl Region for webdriver_client::WebDriverRegion {
    async fn text(&self) -> Result<String> {
        Ok(self.text().await?)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attribute(name).await?)
    }

    async fn click(&self) -> Result<()> {
        Ok(self.click().await?)
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<Box<dyn Region>>> {
        Ok(self
            .find_all(locator)
            .await?
            .into_iter()
            .map(|region| Box::new(region) as Box<dyn Region>)
            .collect())
    }
}

#[async_trait]
impl Surface for webdriver_client::WebDriverSurface {
    async fn goto(&self, url: &str) -> Result<()> {
        Ok(self.goto(url).await?)
    }

    async fn find_all(&self, locator: &str) -> Result<Vec<Box<dyn Region>>> {
        Ok(self
            .find_all(locator)
            .await?
            .into_iter()
            .map(|region| Box::new(region) as Box<dyn Region>)
            .collect())
    }

    async fn fill(&self, locator: &str, text: &str) -> Result<()> {
        Ok(self.fill(locator, text).await?)
    }

    async fn press_enter(&self) -> Result<()> {
        Ok(self.press_enter().await?)
    }

    async fn hover(&self, locator: &str) -> Result<()> {
        Ok(self.hover(locator).await?)
    }

    async fn scroll_down(&self, pixels: i64) -> Result<()> {
        Ok(self.scroll_down(pixels).await?)
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.current_url().await?)
    }

    async fn reload(&self) -> Result<()> {
        Ok(self.reload().await?)
    }

    async fn recycle(&self) -> Result<()> {
        Ok(self.recycle().await?)
    }
}
