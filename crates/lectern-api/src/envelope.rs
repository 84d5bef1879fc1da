// ── Response envelope handling ──
//
// The backend answers list requests in one of two shapes:
//
//   bare paginator:    { data: [...], current_page, last_page, from, to, total }
//   wrapped paginator: { success: true, data: { data: [...], current_page, ... } }
//
// `normalize` folds both into `Paginated { items, meta }` so nothing
// downstream ever sniffs response shapes itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

// ── PageMeta ────────────────────────────────────────────────────────

/// Pagination descriptor returned alongside a list.
///
/// Always satisfies `from <= to <= total` and
/// `1 <= current_page <= last_page` once produced by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            from: 0,
            to: 0,
            total: 0,
        }
    }
}

impl PageMeta {
    /// Read pagination fields from a paginator object.
    ///
    /// Missing or null fields take their defaults; numeric strings are
    /// accepted. The result is repaired to satisfy the invariants.
    pub fn from_paginator(paginator: &Value) -> Self {
        let defaults = Self::default();
        let page = |key: &str, default: u32| {
            read_u64(paginator.get(key))
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(default)
        };
        let count = |key: &str| read_u64(paginator.get(key)).unwrap_or(0);

        Self {
            current_page: page("current_page", defaults.current_page),
            last_page: page("last_page", defaults.last_page),
            from: count("from"),
            to: count("to"),
            total: count("total"),
        }
        .repaired()
    }

    /// Metadata describing a single, complete page of `len` items.
    pub fn single_page(len: usize) -> Self {
        let total = u64::try_from(len).unwrap_or(u64::MAX);
        Self {
            current_page: 1,
            last_page: 1,
            from: u64::from(total > 0),
            to: total,
            total,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.current_page >= 1
            && self.current_page <= self.last_page
            && self.from <= self.to
            && self.to <= self.total
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    fn repaired(mut self) -> Self {
        self.current_page = self.current_page.max(1);
        // Laravel reports current_page past last_page for out-of-range requests.
        self.last_page = self.last_page.max(self.current_page);
        self.to = self.to.min(self.total);
        self.from = self.from.min(self.to);
        self
    }
}

fn read_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ── Paginated ───────────────────────────────────────────────────────

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::default(),
        }
    }
}

impl Paginated<Value> {
    /// Decode the raw items into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Paginated<T>, Error> {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: item.to_string(),
                })
            })
            .collect::<Result<Vec<T>, _>>()?;
        Ok(Paginated {
            items,
            meta: self.meta,
        })
    }
}

/// Fold either list-response shape into `{items, meta}`.
///
/// `items` is empty, never absent, when no array is found.
pub fn normalize(raw: &Value) -> Paginated<Value> {
    let wrapped = raw.get("success").and_then(Value::as_bool) == Some(true)
        && raw.get("data").is_some_and(|d| !d.is_null());
    let paginator = if wrapped { &raw["data"] } else { raw };

    let items = match paginator.get("data") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    Paginated {
        items,
        meta: PageMeta::from_paginator(paginator),
    }
}

// ── Single-record envelope ──────────────────────────────────────────

/// Server-provided `message`, if any.
pub fn message_of(raw: &Value) -> Option<String> {
    raw.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

/// Extract a record from either `{success, data}` or a bare object.
pub fn record<T: DeserializeOwned>(raw: Value) -> Result<T, Error> {
    let inner = match raw {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: inner.to_string(),
    })
}
