//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Content-hashed copies of static assets, as produced by `build.rs`.
///
/// `(source path under /static, stem, extension, hash)`
const HASHED_ASSETS: &[(&str, &str, &str, &str)] = &[
    ("css/main.css", "main", "css", env!("CSS_HASH")),
    ("js/checkout.js", "checkout", "js", env!("CHECKOUT_JS_HASH")),
];

/// Public URL of the hashed copy of `asset`, or `None` for an unknown asset.
#[must_use]
pub fn hashed_asset_path(asset: &str) -> Option<String> {
    HASHED_ASSETS
        .iter()
        .find(|(source, ..)| *source == asset)
        .map(|(source, stem, ext, hash)| {
            let dir = source.rsplit_once('/').map_or("", |(dir, _)| dir);
            if hash.is_empty() {
                // Build script could not read the file; serve the original
                format!("/static/{source}")
            } else {
                format!("/static/{dir}/derived/{stem}.{hash}.{ext}")
            }
        })
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Maps a static asset to its immutable, content-hashed URL.
///
/// Usage in templates: `{{ "css/main.css"|asset }}`
#[askama::filter_fn]
pub fn asset(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let name = value.to_string();
    hashed_asset_path(&name).ok_or_else(|| {
        askama::Error::Custom(format!("unknown static asset '{name}'").into())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_assets_resolve() {
        let css = hashed_asset_path("css/main.css").unwrap();
        assert!(css.starts_with("/static/css/"));
        assert!(css.ends_with(".css"));

        let js = hashed_asset_path("js/checkout.js").unwrap();
        assert!(js.starts_with("/static/js/"));
        assert!(js.ends_with(".js"));
    }

    #[test]
    fn test_unknown_asset_is_none() {
        assert!(hashed_asset_path("js/app.js").is_none());
    }
}
