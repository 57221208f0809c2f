//! Default language resolution

use tracing::{debug, info};

use crate::domain::entities::Locale;

/// Language used when the model does not flag exactly one default locale.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Select the code of the single locale flagged as default.
///
/// Zero defaults, or more than one, is ambiguous input: the `fallback` code is
/// returned instead. An empty slice is the same as a model without locales.
pub fn resolve_language(locales: &[Locale], fallback: &str) -> String {
    let mut defaults = Vec::new();
    for locale in locales {
        if locale.is_default {
            debug!("Default language code '{}' found", locale.code);
            defaults.push(locale.code.as_str());
        } else {
            debug!("Language code '{}' found", locale.code);
        }
    }

    match defaults.as_slice() {
        [single] => {
            info!("Using model's default language '{}'", single);
            (*single).to_string()
        }
        [] => {
            info!(
                "No default language specified in model. Defaulting to '{}'",
                fallback
            );
            fallback.to_string()
        }
        many => {
            info!(
                "{} default languages specified in model ({}). Defaulting to '{}'",
                many.len(),
                many.join(", "),
                fallback
            );
            fallback.to_string()
        }
    }
}
