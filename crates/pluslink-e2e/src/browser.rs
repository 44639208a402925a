//! Headless Chromium control over the Chrome `DevTools` Protocol.
//!
//! With the `browser` feature, [`ChromiumFactory`] launches one Chromium
//! process per run and gives every test case its own browser context (an
//! incognito-style profile with separate storage), disposed when the case
//! ends. Without the feature the factory still exists so callers compile, but
//! launching reports [`E2eError::FeatureDisabled`].

use crate::result::E2eError;
use serde::{Deserialize, Serialize};

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg_attr(not(feature = "browser"), allow(dead_code))]
fn launch_error(message: String) -> E2eError {
    if message.contains("Could not auto detect") {
        E2eError::BrowserNotFound
    } else {
        E2eError::BrowserLaunchError { message }
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{launch_error, BrowserConfig};
    use crate::accessibility::{role_query_script, AriaRole, ElementState};
    use crate::driver::{DriverFactory, PageDriver};
    use crate::result::{E2eError, E2eResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
    use chromiumoxide::cdp::browser_protocol::target::{
        CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// One Chromium process shared by every case of a run
    #[derive(Debug)]
    pub struct ChromiumFactory {
        inner: Arc<Mutex<CdpBrowser>>,
        handle: tokio::task::JoinHandle<()>,
        navigation_timeout: Duration,
    }

    impl ChromiumFactory {
        /// Launch Chromium
        ///
        /// # Errors
        ///
        /// [`E2eError::BrowserNotFound`] when no executable is found,
        /// [`E2eError::BrowserLaunchError`] when the process fails to start
        pub async fn launch(
            config: &BrowserConfig,
            navigation_timeout: Duration,
        ) -> E2eResult<Self> {
            let mut builder =
                CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(launch_error)?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| launch_error(e.to_string()))?;

            // Drive the CDP event loop until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            tracing::info!(headless = config.headless, "chromium launched");

            Ok(Self {
                inner: Arc::new(Mutex::new(browser)),
                handle,
                navigation_timeout,
            })
        }
    }

    #[async_trait]
    impl DriverFactory for ChromiumFactory {
        type Driver = ChromiumDriver;

        async fn open(&self) -> E2eResult<ChromiumDriver> {
            let browser = self.inner.lock().await;
            let context_id = browser
                .execute(CreateBrowserContextParams::default())
                .await
                .map_err(|e| E2eError::PageError {
                    message: format!("create browser context: {e}"),
                })?
                .result
                .browser_context_id;

            let target = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(context_id.clone())
                .build()
                .map_err(|message| E2eError::PageError { message })?;

            let page = match browser.new_page(target).await {
                Ok(page) => page,
                Err(e) => {
                    let _ = browser
                        .execute(DisposeBrowserContextParams::new(context_id))
                        .await;
                    return Err(E2eError::PageError {
                        message: e.to_string(),
                    });
                }
            };

            tracing::debug!(context = ?context_id, "browser context opened");

            Ok(ChromiumDriver {
                browser: Arc::clone(&self.inner),
                page: Some(page),
                context_id: Some(context_id),
                navigation_timeout: self.navigation_timeout,
            })
        }

        async fn shutdown(&self) -> E2eResult<()> {
            let mut browser = self.inner.lock().await;
            let closed = browser
                .close()
                .await
                .map_err(|e| E2eError::BrowserLaunchError {
                    message: e.to_string(),
                });
            let _ = browser.wait().await;
            self.handle.abort();
            closed.map(|_| ())
        }
    }

    /// A page inside its own browser context
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: Arc<Mutex<CdpBrowser>>,
        page: Option<CdpPage>,
        context_id: Option<BrowserContextId>,
        navigation_timeout: Duration,
    }

    impl ChromiumDriver {
        fn page(&self) -> E2eResult<&CdpPage> {
            self.page.as_ref().ok_or_else(|| E2eError::PageError {
                message: "page already closed".to_string(),
            })
        }
    }

    #[async_trait]
    impl PageDriver for ChromiumDriver {
        async fn navigate(&mut self, url: &str) -> E2eResult<()> {
            let page = self.page()?;
            let nav_error = |message: String| E2eError::NavigationError {
                url: url.to_string(),
                message,
            };
            match tokio::time::timeout(self.navigation_timeout, page.goto(url)).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(nav_error(e.to_string())),
                Err(_) => Err(nav_error(format!(
                    "no load event within {}ms",
                    self.navigation_timeout.as_millis()
                ))),
            }
        }

        async fn query_role(&self, role: AriaRole, name: &str) -> E2eResult<Vec<ElementState>> {
            let page = self.page()?;
            let script = role_query_script(role, name);
            let result = page
                .evaluate(script)
                .await
                .map_err(|e| E2eError::QueryError {
                    message: e.to_string(),
                })?;
            result
                .into_value::<Vec<ElementState>>()
                .map_err(|e| E2eError::QueryError {
                    message: e.to_string(),
                })
        }

        async fn close(&mut self) -> E2eResult<()> {
            let mut first_error = None;
            if let Some(page) = self.page.take() {
                if let Err(e) = page.close().await {
                    first_error = Some(E2eError::PageError {
                        message: e.to_string(),
                    });
                }
            }
            if let Some(context_id) = self.context_id.take() {
                let browser = self.browser.lock().await;
                if let Err(e) = browser
                    .execute(DisposeBrowserContextParams::new(context_id))
                    .await
                {
                    first_error.get_or_insert(E2eError::PageError {
                        message: format!("dispose browser context: {e}"),
                    });
                }
            }
            first_error.map_or(Ok(()), Err)
        }
    }
}

// ============================================================================
// Stand-in when the `browser` feature is NOT enabled
// ============================================================================

#[cfg(not(feature = "browser"))]
mod disabled {
    use super::BrowserConfig;
    use crate::driver::{DriverFactory, MockDriver};
    use crate::result::{E2eError, E2eResult};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Chromium factory placeholder; launching always fails
    #[derive(Debug)]
    pub struct ChromiumFactory {
        _private: (),
    }

    impl ChromiumFactory {
        /// Always fails: rebuild with `--features browser`
        ///
        /// # Errors
        ///
        /// Always returns [`E2eError::FeatureDisabled`]
        #[allow(clippy::unused_async)]
        pub async fn launch(
            _config: &BrowserConfig,
            _navigation_timeout: Duration,
        ) -> E2eResult<Self> {
            Err(E2eError::FeatureDisabled { feature: "browser" })
        }
    }

    #[async_trait]
    impl DriverFactory for ChromiumFactory {
        type Driver = MockDriver;

        async fn open(&self) -> E2eResult<MockDriver> {
            Err(E2eError::FeatureDisabled { feature: "browser" })
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{ChromiumDriver, ChromiumFactory};

#[cfg(not(feature = "browser"))]
pub use disabled::ChromiumFactory;
