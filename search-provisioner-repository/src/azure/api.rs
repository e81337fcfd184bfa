//! REST addressing and response handling for the Azure Search administrative API.
//!
//! Every resource lives under a collection path (`/indexes`, `/datasources`,
//! `/indexers`) and every request carries the `api-version` query parameter.

use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::errors::SearchAdminError;

/// Query parameter carrying the REST API version.
pub const API_VERSION_PARAM: &str = "api-version";

/// Header carrying the admin key.
pub const API_KEY_HEADER: &str = "api-key";

/// Top-level resource collections of the administrative API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCollection {
    Indexes,
    DataSources,
    Indexers,
}

impl ResourceCollection {
    /// Returns the path segment of the collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCollection::Indexes => "indexes",
            ResourceCollection::DataSources => "datasources",
            ResourceCollection::Indexers => "indexers",
        }
    }
}

/// Build the URL of a collection, a named resource, or an action on a named resource.
///
/// Segments are percent-encoded by `url`, so resource names are never spliced into
/// the path verbatim.
pub(crate) fn build_url(
    endpoint: &Url,
    api_version: &str,
    collection: ResourceCollection,
    name: Option<&str>,
    action: Option<&str>,
) -> Result<Url, SearchAdminError> {
    let mut url = endpoint.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            SearchAdminError::connection(format!("endpoint '{}' cannot be a base URL", endpoint))
        })?;
        segments.pop_if_empty().push(collection.as_str());
        if let Some(name) = name {
            segments.push(name);
        }
        if let Some(action) = action {
            segments.push(action);
        }
    }
    url.query_pairs_mut()
        .clear()
        .append_pair(API_VERSION_PARAM, api_version);
    Ok(url)
}

/// Interpret the status of a `GET` on a named resource.
///
/// Returns `None` when the status is a failure the caller must report.
pub(crate) fn existence_from_status(status: StatusCode) -> Option<bool> {
    if status == StatusCode::NOT_FOUND {
        Some(false)
    } else if status.is_success() {
        Some(true)
    } else {
        None
    }
}

/// Whether a `DELETE` left the resource absent. A resource that was already gone
/// counts as deleted.
pub(crate) fn deleted_from_status(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::NOT_FOUND
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Extract the service's error message from a response body.
///
/// The service answers failures with `{"error":{"code":..,"message":..}}`; anything
/// else is returned unchanged.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ErrorDetail {
                code: Some(code),
                message,
            },
        }) if !code.is_empty() => format!("{}: {}", code, message),
        Ok(parsed) => parsed.error.message,
        Err(_) => body.to_string(),
    }
}

/// Map a rejected response to an error.
pub(crate) fn status_error(operation: &str, status: u16, body: &str) -> SearchAdminError {
    let message = error_message(body);
    match status {
        401 | 403 => SearchAdminError::unauthorized(format!(
            "{} was rejected with status {}: {}",
            operation, status, message
        )),
        _ => SearchAdminError::unexpected_status(operation, status, message),
    }
}
