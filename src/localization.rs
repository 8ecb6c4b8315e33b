//! # Localization Module
//!
//! Fluent-based message catalog. English and Russian resources are embedded
//! at compile time; the Telegram language code of the user picks the bundle
//! and anything unknown falls back to English.

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::LazyLock;
use unic_langid::LanguageIdentifier;

const FALLBACK_LANGUAGE: &str = "en";

const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("ru", include_str!("../locales/ru/main.ftl")),
];

/// Localization manager for the bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every embedded language
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (code, source) in RESOURCES {
            let locale: LanguageIdentifier = code.parse()?;
            bundles.insert(code.to_string(), Self::create_bundle(locale, source)?);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("invalid fluent resource for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("duplicate fluent messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Map a Telegram language code ("ru", "en-US", ...) to a loaded bundle key
    fn resolve_language<'a>(&'a self, language_code: Option<&str>) -> &'a str {
        let primary = language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(|code| code.to_lowercase());

        match primary {
            Some(code) => self
                .bundles
                .keys()
                .find(|key| **key == code)
                .map(|key| key.as_str())
                .unwrap_or(FALLBACK_LANGUAGE),
            None => FALLBACK_LANGUAGE,
        }
    }

    /// Get a localized message in the requested language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language_code: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let language = self.resolve_language(Some(language_code));
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
        else {
            return format!("Missing translation: {key}");
        };

        let Some(msg) = bundle.get_message(key) else {
            return format!("Missing translation: {key}");
        };
        let Some(pattern) = msg.value() else {
            return format!("Missing value for key: {key}");
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors)
            .into_owned()
    }

    /// Whether a bundle exists for the language code (after fallback rules)
    pub fn supports(&self, language_code: &str) -> bool {
        let primary = language_code.split(['-', '_']).next().unwrap_or_default();
        self.bundles.contains_key(&primary.to_lowercase())
    }
}

static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(|| {
    LocalizationManager::new().unwrap_or_else(|e| panic!("embedded locales are invalid: {e}"))
});

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Get a localized message for the given Telegram language code
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    get_localization_manager().get_message_in_language(
        key,
        language_code.unwrap_or(FALLBACK_LANGUAGE),
        None,
    )
}

/// Get a localized message with arguments for the given Telegram language code
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    get_localization_manager().get_message_in_language(
        key,
        language_code.unwrap_or(FALLBACK_LANGUAGE),
        Some(&args_map),
    )
}
