//! Request correlation ids.

use std::fmt;

/// ULID identifying one dispatch; recorded on the `dispatch` tracing span.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(ulid::Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        RequestId(ulid::Ulid::new())
    }

    /// Use the upstream id when it is a valid ULID (CGI passes `X-Request-Id` as
    /// `HTTP_X_REQUEST_ID`), otherwise mint a new one.
    #[must_use]
    pub fn parse_or_new(upstream: Option<&str>) -> Self {
        upstream
            .map(str::trim)
            .and_then(|s| ulid::Ulid::from_string(s).ok())
            .map_or_else(Self::new, RequestId)
    }

    /// Milliseconds since the epoch encoded in the id.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
