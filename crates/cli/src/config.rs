use anyhow::{Context, Result};

use portfolio_calc_core::models::settings::Settings;

use crate::cli::GlobalArgs;

/// Build settings: defaults, then `.env`/environment, then command-line flags.
pub fn load_settings(args: &GlobalArgs) -> Result<Settings> {
    dotenv::dotenv().ok();
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    apply_args(&mut settings, args)?;
    Ok(settings)
}

/// Overlay `PORTFOLIO_*` variables (and `MARKETSTACK_API_KEY`).
pub fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(url) = var("PORTFOLIO_API_URL") {
        settings.api_base_url = url;
    }
    if let Some(provider) = var("PORTFOLIO_PRICE_PROVIDER") {
        settings.price_provider = provider.parse().context("PORTFOLIO_PRICE_PROVIDER")?;
    }
    if let Some(key) = var("MARKETSTACK_API_KEY") {
        settings.api_keys.insert("marketstack".to_string(), key);
    }
    if let Some(store) = var("PORTFOLIO_HISTORY_STORE") {
        settings.history_store = store.parse().context("PORTFOLIO_HISTORY_STORE")?;
    }
    if let Some(path) = var("PORTFOLIO_HISTORY_FILE") {
        settings.history_file = path;
    }
    if let Some(lang) = var("PORTFOLIO_LANG") {
        settings.language = lang.parse().context("PORTFOLIO_LANG")?;
    }
    if let Some(secs) = var("PORTFOLIO_REQUEST_TIMEOUT") {
        settings.request_timeout_secs = secs
            .parse()
            .with_context(|| format!("PORTFOLIO_REQUEST_TIMEOUT must be seconds, got '{secs}'"))?;
    }
    if let Some(secs) = var("PORTFOLIO_CALC_TIMEOUT") {
        let secs: u64 = secs
            .parse()
            .with_context(|| format!("PORTFOLIO_CALC_TIMEOUT must be seconds, got '{secs}'"))?;
        settings.calculation_timeout_secs = Some(secs);
    }
    if let Some(months) = var("PORTFOLIO_LOOKBACK_MONTHS") {
        settings.history_lookback_months = months
            .parse()
            .with_context(|| format!("PORTFOLIO_LOOKBACK_MONTHS must be a number, got '{months}'"))?;
    }
    Ok(())
}

/// Overlay command-line flags.
pub fn apply_args(settings: &mut Settings, args: &GlobalArgs) -> Result<()> {
    if let Some(url) = &args.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(provider) = &args.provider {
        settings.price_provider = provider.parse().context("--provider")?;
    }
    if let Some(store) = &args.store {
        settings.history_store = store.parse().context("--store")?;
    }
    if let Some(path) = &args.history_file {
        settings.history_file = path.clone();
    }
    if let Some(lang) = &args.lang {
        settings.language = lang.parse().context("--lang")?;
    }
    if let Some(secs) = args.timeout {
        settings.calculation_timeout_secs = Some(secs);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_calc_core::i18n::Language;
    use portfolio_calc_core::models::settings::{HistoryStoreKind, ProviderKind};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env(&[
                ("PORTFOLIO_API_URL", "http://prices.local:9000"),
                ("PORTFOLIO_PRICE_PROVIDER", "marketstack"),
                ("MARKETSTACK_API_KEY", "k"),
                ("PORTFOLIO_HISTORY_STORE", "file"),
                ("PORTFOLIO_LANG", "en"),
                ("PORTFOLIO_CALC_TIMEOUT", "20"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.api_base_url, "http://prices.local:9000");
        assert_eq!(settings.price_provider, ProviderKind::Marketstack);
        assert_eq!(settings.api_key("marketstack"), Some("k"));
        assert_eq!(settings.history_store, HistoryStoreKind::File);
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.calculation_timeout_secs, Some(20));
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let mut settings = Settings::default();
        let result = apply_env(&mut settings, env(&[("PORTFOLIO_PRICE_PROVIDER", "bloomberg")]));
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_env() {
        let mut settings = Settings::default();
        apply_env(&mut settings, env(&[("PORTFOLIO_LANG", "en")])).unwrap();
        let args = GlobalArgs {
            lang: Some("zh".into()),
            store: Some("memory".into()),
            ..GlobalArgs::default()
        };
        apply_args(&mut settings, &args).unwrap();

        assert_eq!(settings.language, Language::Zh);
        assert_eq!(settings.history_store, HistoryStoreKind::Memory);
    }
}
