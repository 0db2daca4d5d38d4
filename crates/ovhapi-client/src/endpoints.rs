//! Vendor endpoint table

use crate::errors::ClientError;

/// Named API endpoints and their base URLs
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

/// Base URL for an endpoint name or an explicit `http(s)://` URL
///
/// A trailing `/` on an explicit URL is dropped.
///
/// # Errors
///
/// Returns [`ClientError::InvalidRegion`] for unknown names.
pub fn base_url(endpoint: &str) -> Result<String, ClientError> {
    if let Some((_, url)) = ENDPOINTS.iter().find(|(name, _)| *name == endpoint) {
        return Ok((*url).to_string());
    }
    if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
        return Ok(endpoint.trim_end_matches('/').to_string());
    }
    Err(ClientError::InvalidRegion {
        endpoint: endpoint.to_string(),
    })
}

/// Comma-separated list of known endpoint names
pub fn known_names() -> String {
    ENDPOINTS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}
