// --- File: crates/bookit_widget/src/startup.rs ---
use bookit_common::{log_result, BookingApi};
use bookit_config::AppConfig;
use std::sync::Arc;
use tracing::info;

use crate::availability::AvailabilityCache;
use crate::clock::Clock;
use crate::embed::SchedulerEmbed;
use crate::error::WidgetError;
use crate::flow::{BookingFlow, FlowSettings};
use crate::locator::ApiLocator;
use crate::notify::{FeedbackSurface, Lifetime, NotificationKind};

/// Everything a host needs once the widget is up.
pub struct BookingWidget {
    pub flow: BookingFlow,
    pub cache: Arc<AvailabilityCache>,
    pub locator: Arc<ApiLocator>,
    pub embed: SchedulerEmbed,
}

/// Discovers the backend and starts the booking flow on today's month.
///
/// If no backend answers, a persistent error notice is shown and the error is
/// returned; no availability is requested in that case. A failure to load the
/// first month is reported to the visitor but does not stop startup.
pub async fn bootstrap(
    config: &AppConfig,
    api: Arc<dyn BookingApi>,
    surface: Arc<dyn FeedbackSurface>,
    clock: Arc<dyn Clock>,
) -> Result<BookingWidget, WidgetError> {
    let locator = match discover(config, api.as_ref()).await {
        Ok(locator) => Arc::new(locator),
        Err(e) => {
            surface.notify(NotificationKind::Error, &e.user_message(), Lifetime::Persistent);
            return Err(e);
        }
    };

    let cache = Arc::new(AvailabilityCache::new(api.clone(), locator.clone()));
    let flow = BookingFlow::new(
        cache.clone(),
        locator.clone(),
        api,
        surface,
        clock,
        FlowSettings::from_config(&config.booking),
    );
    flow.start().await;

    info!("{} booking widget ready", config.business.name);
    Ok(BookingWidget {
        flow,
        cache,
        locator,
        embed: SchedulerEmbed::new(&config.embed, config.business.name.clone()),
    })
}

async fn discover(config: &AppConfig, api: &dyn BookingApi) -> Result<ApiLocator, WidgetError> {
    let locator = ApiLocator::from_config(config.api.clone())?;
    let base_url = log_result(
        locator.discover(api).await,
        "Booking API discovered",
        "Booking API discovery failed",
    )?;
    info!("Using API: {}", base_url);
    Ok(locator)
}
