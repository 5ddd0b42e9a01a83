//! Request handlers, one module per area of the site.

pub mod accounts;
pub mod bookmarks;
pub mod catalog;
pub mod exercises;
pub mod workouts;

use crate::{error::AppError, AppState};
use core_types::{ImageUpload, MediaKind};

/// Raw query-string pairs, in order. Repeated keys are kept so the last one
/// can win, instead of the request being rejected.
pub type QueryPairs = Vec<(String, String)>;

fn last_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// `?q=&page=` of the catalog listings.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: last_value(pairs, "q"),
            page: last_value(pairs, "page"),
        }
    }

    /// The search text, trimmed. Empty when no search was made.
    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or_default()
    }
}

/// `?page=&mostrar=` of the workout detail.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DetailQuery {
    pub page: Option<String>,
    pub mostrar: Option<String>,
}

impl DetailQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            page: last_value(pairs, "page"),
            mostrar: last_value(pairs, "mostrar"),
        }
    }
}

/// Stores the upload, if any, and returns the image reference to persist.
/// Without an upload the default placeholder is used.
pub(crate) async fn store_image(
    state: &AppState,
    kind: MediaKind,
    upload: Option<&ImageUpload>,
) -> Result<String, AppError> {
    match upload {
        Some(upload) => Ok(state.media.save(kind, upload).await?),
        None => Ok(state.media.default_image().to_string()),
    }
}

/// Best-effort removal of a stored image. Failures are logged, never returned:
/// the database write this follows has already happened.
pub(crate) async fn discard_image(state: &AppState, reference: &str) {
    if let Err(e) = state.media.delete(reference).await {
        tracing::warn!(%reference, error = %e, "Failed to delete stored image.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> QueryPairs {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let query = ListingQuery::from_pairs(&pairs(&[
            ("page", "1"),
            ("q", "a"),
            ("page", "2"),
            ("q", "b"),
        ]));
        assert_eq!(query.page.as_deref(), Some("2"));
        assert_eq!(query.search(), "b");

        let detail = DetailQuery::from_pairs(&pairs(&[
            ("mostrar", "descripcion"),
            ("mostrar", "ejercicios"),
        ]));
        assert_eq!(detail.mostrar.as_deref(), Some("ejercicios"));
        assert_eq!(detail.page, None);
    }
}
