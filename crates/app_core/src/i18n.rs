//! Internationalization support using Fluent

use fluent::concurrent::FluentBundle;
use fluent::{FluentArgs, FluentResource};
use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

use crate::AppError;

const BUILTIN_EN: &str = include_str!("../locales/en/main.ftl");

/// Localization manager
pub struct I18n {
    bundles: RwLock<HashMap<String, Arc<FluentBundle<FluentResource>>>>,
    current_locale: RwLock<String>,
    fallback_locale: String,
}

impl I18n {
    /// Create an empty I18n manager with default locale
    pub fn new(default_locale: &str) -> Self {
        Self {
            bundles: RwLock::new(HashMap::new()),
            current_locale: RwLock::new(default_locale.to_string()),
            fallback_locale: "en".to_string(),
        }
    }

    /// Manager with the bundled English messages, switched to the closest match of `locale`
    pub fn with_builtin(locale: &str) -> Self {
        let i18n = Self::new("en");
        if let Err(e) = i18n.add_locale("en", vec![BUILTIN_EN.to_string()]) {
            tracing::error!("Built-in translations are invalid: {}", e);
        }
        i18n.set_locale(locale);
        i18n
    }

    /// Load translations from a directory of `<locale>/*.ftl`
    pub fn load_from_dir(&self, dir: &Path) -> Result<(), AppError> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                let locale = path.file_name().and_then(|n| n.to_str()).unwrap_or("en").to_string();

                let mut sources = Vec::new();
                for file in std::fs::read_dir(&path)? {
                    let file = file?.path();
                    if file.extension().map_or(false, |ext| ext == "ftl") {
                        sources.push(std::fs::read_to_string(&file)?);
                    }
                }

                self.add_locale(&locale, sources)?;
            }
        }

        Ok(())
    }

    /// Register a locale from Fluent sources; later sources override earlier messages
    pub fn add_locale(&self, locale: &str, sources: Vec<String>) -> Result<(), AppError> {
        let lang_id: LanguageIdentifier = locale
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid locale {}: {}", locale, e)))?;

        let mut bundle = FluentBundle::new_concurrent(vec![lang_id]);
        bundle.set_use_isolating(false);

        // Built-in English stays underneath directory overrides
        if locale == self.fallback_locale {
            if let Ok(resource) = FluentResource::try_new(BUILTIN_EN.to_string()) {
                bundle.add_resource_overriding(resource);
            }
        }

        for source in sources {
            let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
                AppError::Config(format!("Fluent parse errors in {}: {:?}", locale, errors))
            })?;
            bundle.add_resource_overriding(resource);
        }

        self.bundles.write().insert(locale.to_string(), Arc::new(bundle));
        tracing::info!("Loaded locale: {}", locale);

        Ok(())
    }

    /// Switch to the best available match of `requested`
    pub fn set_locale(&self, requested: &str) -> bool {
        match self.negotiate(requested) {
            Some(locale) => {
                *self.current_locale.write() = locale;
                true
            }
            None => false,
        }
    }

    fn negotiate(&self, requested: &str) -> Option<String> {
        // fluent-langneg negotiates over its own identifier type
        let requested: fluent_langneg::LanguageIdentifier = requested.parse().ok()?;
        let available: Vec<fluent_langneg::LanguageIdentifier> = self
            .bundles
            .read()
            .keys()
            .filter_map(|locale| locale.parse().ok())
            .collect();

        negotiate_languages(&[requested], &available, None, NegotiationStrategy::Filtering)
            .first()
            .map(|id| id.to_string())
    }

    /// Get the current locale
    pub fn current_locale(&self) -> String {
        self.current_locale.read().clone()
    }

    /// Get a localized string
    pub fn get(&self, key: &str) -> String {
        self.get_with_args(key, None)
    }

    /// Get a localized string with arguments
    pub fn get_with_args(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let bundles = self.bundles.read();
        let current = self.current_locale.read().clone();

        let mut candidates = vec![current.as_str()];
        if current != self.fallback_locale {
            candidates.push(self.fallback_locale.as_str());
        }

        for locale in candidates {
            let Some(bundle) = bundles.get(locale) else {
                continue;
            };
            let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
                continue;
            };

            let mut errors = Vec::new();
            let result = bundle.format_pattern(pattern, args, &mut errors);
            if errors.is_empty() {
                return result.to_string();
            }
            tracing::debug!("Formatting {} in {} failed: {:?}", key, locale, errors);
        }

        // Return key as fallback
        key.to_string()
    }

    /// Get available locales
    pub fn available_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.bundles.read().keys().cloned().collect();
        locales.sort();
        locales
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::with_builtin("en")
    }
}

/// Convenience macro for getting localized strings
#[macro_export]
macro_rules! t {
    ($i18n:expr, $key:expr) => {
        $i18n.get($key)
    };
    ($i18n:expr, $key:expr, $($arg_name:ident = $arg_value:expr),+ $(,)?) => {{
        let mut args = fluent::FluentArgs::new();
        $(
            args.set(stringify!($arg_name), $arg_value);
        )+
        $i18n.get_with_args($key, Some(&args))
    }};
}
