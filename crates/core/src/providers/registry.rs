use crate::models::settings::{ProviderKind, Settings};

use super::backend::BackendPriceProvider;
use super::marketstack::MarketstackProvider;
use super::traits::PriceProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of all available price providers, looked up by `ProviderKind`.
///
/// New providers can be added without modifying existing code.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with every provider the settings allow.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // Backend proxy: no key, talks to our own server
        registry.register(Box::new(BackendPriceProvider::new(
            settings.base_url(),
            settings.request_timeout_secs,
        )));

        // Marketstack: requires API key
        if let Some(key) = settings.api_key("marketstack") {
            registry.register(Box::new(MarketstackProvider::new(
                key.to_string(),
                settings.request_timeout_secs,
            )));
        }

        // Yahoo Finance: no key
        match YahooFinanceProvider::new() {
            Ok(yahoo) => registry.register(Box::new(yahoo)),
            Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
        }

        registry
    }

    /// Register a new price provider. If two providers share a kind, the
    /// first one registered wins on lookup.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// Find the provider registered for `kind`.
    pub fn get_provider_for(&self, kind: ProviderKind) -> Option<&dyn PriceProvider> {
        self.providers
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| p.as_ref())
    }

    /// Names of all registered providers, in registration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
