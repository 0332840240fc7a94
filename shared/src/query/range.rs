//! Time range query construction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::Seconds;

/// Document type every query is restricted to.
pub const DOCUMENT_TYPE: &str = "fluentd";

/// Field holding the document timestamp.
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// A count-only query for documents in `[now - window, now]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRangeQuery {
    /// Target index name or pattern.
    pub index_name: String,
    /// Document type filter.
    pub document_type: &'static str,
    /// Timestamp field the range applies to.
    pub timestamp_field: &'static str,
    /// Length of the trailing window.
    pub window: Seconds,
}

impl TimeRangeQuery {
    /// Builds the query for a window of `window` seconds ending now.
    #[must_use]
    pub fn new(index_name: impl Into<String>, window: Seconds) -> Self {
        Self {
            index_name: index_name.into(),
            document_type: DOCUMENT_TYPE,
            timestamp_field: TIMESTAMP_FIELD,
            window,
        }
    }

    /// Number of documents requested. Always zero, only the hit count is read.
    #[must_use]
    pub fn size(&self) -> u64 {
        0
    }

    /// Relative lower bound in date math syntax.
    #[must_use]
    pub fn lower_bound(&self) -> String {
        format!("now-{}s", self.window)
    }

    /// Relative upper bound in date math syntax.
    #[must_use]
    pub fn upper_bound(&self) -> &'static str {
        "now"
    }

    /// Resolves the lower bound against a concrete instant.
    #[must_use]
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.window.window_start(now)
    }

    /// Returns true if `timestamp` lies inside the window ending at `now`, bounds included.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        timestamp >= self.window_start(now) && timestamp <= now
    }

    /// Path segments of the search endpoint, unencoded.
    ///
    /// Each segment must be percent-encoded on its own when joined into a URL,
    /// so an index name containing `/`, `?` or `#` stays inside its segment.
    #[must_use]
    pub fn path_segments(&self) -> [&str; 3] {
        [self.index_name.as_str(), self.document_type, "_search"]
    }

    /// Request body in the store's `filtered` query dialect.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({
            "size": self.size(),
            "query": {
                "filtered": {
                    "query": {},
                    "filter": {
                        "bool": {
                            "must": {
                                "range": {
                                    self.timestamp_field: {
                                        "from": self.lower_bound(),
                                        "to": self.upper_bound()
                                    }
                                }
                            }
                        }
                    }
                }
            }
        })
    }
}
