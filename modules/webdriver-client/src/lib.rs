pub mod error;

pub use error::{Result, WebDriverClientError};

use thirtyfour::prelude::*;
use thirtyfour::Key;
use tracing::info;

/// Scrolls the results feed when one is present, otherwise the document.
/// The listing pane is its own scroll container, so `window.scrollBy` alone
/// never triggers incremental loading there.
const SCROLL_SCRIPT: &str = r#"
    const el = document.querySelector('[role="feed"]') || document.scrollingElement;
    el.scrollBy(0, arguments[0]);
"#;

/// One WebDriver session against a remote chromedriver/geckodriver.
pub struct WebDriverSurface {
    driver: WebDriver,
}

impl WebDriverSurface {
    pub async fn connect(server_url: &str) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg("--window-size=1920,1080")?;

        let driver = WebDriver::new(server_url, caps).await?;
        info!(server_url, "WebDriver session started");
        Ok(Self { driver })
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| WebDriverClientError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// All elements matching an XPath locator. Zero matches is an empty vec.
    pub async fn find_all(&self, xpath: &str) -> Result<Vec<WebDriverRegion>> {
        let elements = self.driver.find_all(By::XPath(xpath)).await?;
        Ok(elements.into_iter().map(WebDriverRegion).collect())
    }

    pub async fn fill(&self, xpath: &str, text: &str) -> Result<()> {
        let element = self.driver.find(By::XPath(xpath)).await?;
        element.clear().await?;
        element.send_keys(text).await?;
        Ok(())
    }

    pub async fn press_enter(&self) -> Result<()> {
        let element = self.driver.active_element().await?;
        element.send_keys(Key::Enter).await?;
        Ok(())
    }

    pub async fn hover(&self, xpath: &str) -> Result<()> {
        let element = self.driver.find(By::XPath(xpath)).await?;
        self.driver
            .action_chain()
            .move_to_element_center(&element)
            .perform()
            .await?;
        Ok(())
    }

    pub async fn scroll_down(&self, pixels: i64) -> Result<()> {
        self.driver
            .execute(SCROLL_SCRIPT, vec![serde_json::json!(pixels)])
            .await
            .map_err(|e| WebDriverClientError::Script(e.to_string()))?;
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    pub async fn reload(&self) -> Result<()> {
        Ok(self.driver.refresh().await?)
    }

    /// Tear down the current browsing context and start clean: fresh tab,
    /// cookies gone. Used after a target-level fault.
    pub async fn recycle(&self) -> Result<()> {
        let fresh = self.driver.new_tab().await?;
        self.driver.close_window().await?;
        self.driver.switch_to_window(fresh).await?;
        self.driver.delete_all_cookies().await?;
        info!("Browsing context recycled");
        Ok(())
    }

    pub async fn quit(self) -> Result<()> {
        Ok(self.driver.quit().await?)
    }
}

/// A handle to one rendered element region.
pub struct WebDriverRegion(WebElement);

impl WebDriverRegion {
    pub async fn text(&self) -> Result<String> {
        Ok(self.0.text().await?)
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.attr(name).await?)
    }

    pub async fn click(&self) -> Result<()> {
        Ok(self.0.click().await?)
    }

    /// Scoped lookup under this region.
    pub async fn find_all(&self, xpath: &str) -> Result<Vec<WebDriverRegion>> {
        let elements = self.0.find_all(By::XPath(xpath)).await?;
        Ok(elements.into_iter().map(WebDriverRegion).collect())
    }
}
