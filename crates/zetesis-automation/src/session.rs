//! Fallback session: drive a browser through the service UI to harvest
//! session cookies, optionally answering one query along the way.

use std::collections::HashMap;

use zetesis_types::Result;

use crate::driver::BrowserDriver;

/// What a completed fallback run produced.
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    pub cookies: HashMap<String, String>,
    /// Answer text when a query was submitted through the UI.
    pub answer: Option<String>,
}

/// One-shot orchestration of a [`BrowserDriver`].
///
/// The driver is closed on every exit path, including mid-run failures, so
/// no browser session is left behind.
pub struct FallbackSession<D: BrowserDriver> {
    driver: D,
}

impl<D: BrowserDriver> FallbackSession<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Start the browser, harvest cookies, and close. No query is submitted.
    pub async fn harvest_cookies(self) -> Result<HashMap<String, String>> {
        Ok(self.run(None).await?.cookies)
    }

    /// Start the browser, optionally submit one query through the UI, harvest
    /// cookies, and close.
    pub async fn run(mut self, query: Option<&str>) -> Result<HarvestOutcome> {
        self.driver.start().await?;

        let outcome = self.drive(query).await;
        let close_result = self.driver.close().await;
        if let Err(err) = &close_result {
            tracing::warn!(%err, "browser close failed");
        }

        // A drive failure takes precedence over a close failure.
        let outcome = outcome?;
        close_result?;
        Ok(outcome)
    }

    async fn drive(&mut self, query: Option<&str>) -> Result<HarvestOutcome> {
        self.driver.navigate_to_home().await?;

        let answer = match query {
            Some(query) => {
                tracing::debug!(%query, "submitting query through the browser UI");
                Some(self.driver.search(query).await?)
            }
            None => None,
        };

        let cookies = self.driver.cookies().await?;
        Ok(HarvestOutcome { cookies, answer })
    }
}
