use std::sync::Arc;

use papyrus_convert::Converter;
use papyrus_scraper::Scraper;
use papyrus_storage::store::ObjectStore;

use crate::config::Settings;

/// Shared application state, injected into all route handlers and the
/// queue poller.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub scraper: Scraper,
    pub converter: Converter,
    pub http: reqwest::Client,
    pub settings: Arc<Settings>,
}

impl<S: ObjectStore> AppState<S> {
    pub fn new(store: S, settings: Settings) -> eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.callback_timeout)
            .build()?;
        Ok(Self {
            store,
            scraper: Scraper::new(settings.scraper_config()),
            converter: Converter::new(settings.converter_config()),
            http,
            settings: Arc::new(settings),
        })
    }
}
