use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Why a page could not be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Timeout,
    Dns,
    HttpError,
    TlsError,
    Connection,
    InvalidUrl,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Dns => "dns",
            FetchErrorKind::HttpError => "http_error",
            FetchErrorKind::TlsError => "tls_error",
            FetchErrorKind::Connection => "connection",
            FetchErrorKind::InvalidUrl => "invalid_url",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure for one URL's analysis. No partial result is produced.
#[derive(Debug, Clone, Error)]
#[error("failed to fetch {url} ({kind}): {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        Self::new(categorize_reqwest_error(error), url, error_chain(error))
    }
}

/// Maps a reqwest error onto the fetch taxonomy.
///
/// reqwest does not expose DNS or TLS failures as distinct kinds, so connect
/// errors are classified by walking the source chain.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> FetchErrorKind {
    if error.status().is_some() {
        return FetchErrorKind::HttpError;
    }

    if error.is_builder() {
        FetchErrorKind::InvalidUrl
    } else if error.is_timeout() {
        FetchErrorKind::Timeout
    } else {
        categorize_message(&error_chain(error))
    }
}

fn categorize_message(chain: &str) -> FetchErrorKind {
    let chain = chain.to_lowercase();

    const DNS_MARKERS: &[&str] = &[
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
    ];
    const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

    if DNS_MARKERS.iter().any(|marker| chain.contains(marker)) {
        FetchErrorKind::Dns
    } else if TLS_MARKERS.iter().any(|marker| chain.contains(marker)) {
        FetchErrorKind::TlsError
    } else if chain.contains("timed out") {
        FetchErrorKind::Timeout
    } else {
        FetchErrorKind::Connection
    }
}

/// Joins an error and all of its sources into one line
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_message() {
        let cases = [
            ("error sending request: dns error: failed to lookup address information", FetchErrorKind::Dns),
            ("error trying to connect: invalid peer certificate: UnknownIssuer", FetchErrorKind::TlsError),
            ("error trying to connect: tcp connect error: Connection refused", FetchErrorKind::Connection),
            ("operation timed out", FetchErrorKind::Timeout),
        ];

        for (message, expected) in cases {
            assert_eq!(categorize_message(message), expected, "message: {}", message);
        }
    }

    #[test]
    fn test_fetch_error_display() {
        let error = FetchError::new(FetchErrorKind::HttpError, "https://example.com", "HTTP 404");
        assert_eq!(
            error.to_string(),
            "failed to fetch https://example.com (http_error): HTTP 404"
        );
    }
}
