//! Per-request language selection.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use serde::Deserialize;
use storefront_core::locale::Locale;

use crate::state::AppState;

/// The language responses should be resolved in.
///
/// Taken from `?lang=`, then the `Accept-Language` header, then the
/// configured default. Unsupported values are ignored, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

#[derive(Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let from_query = Query::<LangQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.lang)
            .and_then(|lang| lang.parse::<Locale>().ok());

        let from_header = || {
            parts
                .headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .and_then(Locale::from_accept_language)
        };

        Ok(RequestLocale(
            from_query
                .or_else(from_header)
                .unwrap_or(state.config.shop.default_locale),
        ))
    }
}
