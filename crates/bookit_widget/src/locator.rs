// --- File: crates/bookit_widget/src/locator.rs ---
//! Backend discovery.
//!
//! The widget may be served from a dev server, straight from disk or from the
//! production site. The locator picks the most likely backend for the page it
//! is embedded in, then health-checks it and a list of fallbacks. The first
//! backend that answers is adopted for the rest of the session.

use bookit_common::BookingApi;
use bookit_config::ApiConfig;
use once_cell::sync::OnceCell;
use reqwest::Url;
use tracing::{debug, info, warn};

use crate::error::WidgetError;

/// Candidate used when the widget is served from a foreign host.
pub const SAME_ORIGIN_API_PATH: &str = "/api";

/// Hosts treated as a developer machine.
const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Where the page hosting the widget was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn parse(page_url: &str) -> Result<Self, WidgetError> {
        let url = Url::parse(page_url).map_err(|e| {
            WidgetError::InvalidConfiguration(format!("page_url {:?}: {}", page_url, e))
        })?;
        Ok(Self { url })
    }

    pub fn protocol(&self) -> &str {
        self.url.scheme()
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    /// Resolves a possibly relative API URL (`/api`) against the page.
    /// Absolute URLs are returned unchanged.
    pub fn resolve(&self, candidate: &str) -> String {
        match Url::parse(candidate) {
            Ok(_) => candidate.to_string(),
            Err(_) => match self.url.join(candidate) {
                Ok(joined) => joined.to_string().trim_end_matches('/').to_string(),
                Err(e) => {
                    warn!("Cannot resolve {:?} against {}: {}", candidate, self.url, e);
                    candidate.to_string()
                }
            },
        }
    }
}

/// Resolves and adopts the backend base URL.
pub struct ApiLocator {
    config: ApiConfig,
    page: PageLocation,
    adopted: OnceCell<String>,
}

impl ApiLocator {
    pub fn new(config: ApiConfig, page: PageLocation) -> Self {
        Self {
            config,
            page,
            adopted: OnceCell::new(),
        }
    }

    /// Builds a locator for the page configured in `api.page_url`.
    pub fn from_config(config: ApiConfig) -> Result<Self, WidgetError> {
        let page = PageLocation::parse(&config.page_url)?;
        Ok(Self::new(config, page))
    }

    /// Picks the primary backend from the page location.
    ///
    /// Rules, first match wins:
    /// 1. auto detection off, or page opened from disk: configured base URL
    /// 2. `localhost` on the local dev port: the local dev API URL
    /// 3. any host other than localhost/127.0.0.1: same-origin `/api`
    /// 4. otherwise the configured base URL
    pub fn resolve_base_url(&self) -> String {
        let primary = if !self.config.auto_detect || self.page.protocol() == "file" {
            self.config.base_url.clone()
        } else if self.page.hostname() == "localhost"
            && self.page.port() == Some(self.config.local_dev_port)
        {
            self.config.local_dev_api_url.clone()
        } else if !LOCAL_HOSTS.contains(&self.page.hostname()) {
            SAME_ORIGIN_API_PATH.to_string()
        } else {
            self.config.base_url.clone()
        };
        self.page.resolve(&primary)
    }

    /// Primary URL followed by the configured fallbacks, all absolute.
    pub fn candidates(&self) -> Vec<String> {
        std::iter::once(self.resolve_base_url())
            .chain(self.config.fallback_urls.iter().map(|url| self.page.resolve(url)))
            .collect()
    }

    /// Health-checks `candidates` in order and returns the first healthy one.
    pub async fn probe_candidates(
        &self,
        api: &dyn BookingApi,
        candidates: &[String],
    ) -> Result<String, WidgetError> {
        for url in candidates {
            debug!("Probing booking API at {}", url);
            match api.health(url).await {
                Ok(()) => {
                    info!("Found working API at: {}", url);
                    return Ok(url.clone());
                }
                Err(e) => {
                    warn!("API not available at {}: {}", url, e);
                }
            }
        }
        Err(WidgetError::NoBackendAvailable {
            tried: candidates.to_vec(),
        })
    }

    /// Probes all candidates and adopts the first healthy backend.
    ///
    /// Once a backend is adopted later calls return it without probing again.
    pub async fn discover(&self, api: &dyn BookingApi) -> Result<String, WidgetError> {
        if let Some(url) = self.adopted.get() {
            return Ok(url.clone());
        }
        let url = self.probe_candidates(api, &self.candidates()).await?;
        // a concurrent discover may have won; keep whichever was set first
        Ok(self.adopted.get_or_init(|| url).clone())
    }

    /// The adopted base URL.
    pub fn base_url(&self) -> Result<&str, WidgetError> {
        self.adopted
            .get()
            .map(String::as_str)
            .ok_or(WidgetError::NotReady)
    }

    pub fn page(&self) -> &PageLocation {
        &self.page
    }
}
