//! HTTP utilities shared by the data provider clients

use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("ffdb/", env!("CARGO_PKG_VERSION"));

/// Client with the fixed per-request timeout used for every provider call.
///
/// Requests are never retried; a timeout surfaces as an error for the unit of
/// work that issued it.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// JSON accept header plus `x-api-key` when a key is configured.
pub fn api_key_header_map(api_key: Option<&str>) -> Result<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key {
        h.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(key.trim())?,
        );
    }
    Ok(h)
}

/// Fill `{season}` (and `{week}` if present) in a URL template.
pub fn expand_url(template: &str, season: u16, week: Option<u16>) -> String {
    let url = template.replace("{season}", &season.to_string());
    match week {
        Some(week) => url.replace("{week}", &week.to_string()),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_header_map_with_key() {
        let headers = api_key_header_map(Some("secret")).unwrap();
        assert!(headers.contains_key(ACCEPT));
        assert_eq!(headers.get("x-api-key").unwrap().to_str().unwrap(), "secret");
    }

    #[test]
    fn test_api_key_header_map_without_key() {
        let headers = api_key_header_map(None).unwrap();
        assert!(headers.contains_key(ACCEPT));
        assert!(headers.get("x-api-key").is_none());
    }

    #[test]
    fn test_api_key_header_map_rejects_control_chars() {
        assert!(api_key_header_map(Some("bad\nkey")).is_err());
    }

    #[test]
    fn test_expand_url() {
        assert_eq!(
            expand_url("https://x/stats_{season}.csv", 2024, None),
            "https://x/stats_2024.csv"
        );
        assert_eq!(
            expand_url("https://x/{season}/w{week}", 2025, Some(3)),
            "https://x/2025/w3"
        );
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(15)).is_ok());
    }
}
