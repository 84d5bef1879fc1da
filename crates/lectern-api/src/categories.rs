// Category endpoints
//
// `GET categories` returns a flat list; `GET categories?tree=1` returns
// root nodes with nested `children`. Both come back either bare or inside
// the usual `{success, data}` wrapper, sometimes paginated.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::envelope::normalize;
use crate::error::Error;

pub const CATEGORIES_PATH: &str = "categories";

/// Which representation to ask the server for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryView {
    #[default]
    Flat,
    Tree,
}

fn category_rows(raw: Value) -> Vec<Value> {
    match raw {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => rows,
            Some(inner @ Value::Object(_)) => category_rows(inner),
            _ => normalize(&Value::Object(map)).items,
        },
        _ => Vec::new(),
    }
}

impl ApiClient {
    /// `GET categories[?tree=1][&type=X]`
    pub async fn list_categories(
        &self,
        view: CategoryView,
        category_type: Option<&str>,
    ) -> Result<Vec<Value>, Error> {
        let mut query = Vec::new();
        if view == CategoryView::Tree {
            query.push(("tree", "1".to_owned()));
        }
        if let Some(kind) = category_type {
            query.push(("type", kind.to_owned()));
        }
        let raw = self.get(CATEGORIES_PATH, &query).await?;
        let rows = category_rows(raw);
        debug!(?view, rows = rows.len(), "fetched categories");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_bare_array() {
        assert_eq!(category_rows(json!([{"id": 1}, {"id": 2}])).len(), 2);
    }

    #[test]
    fn accepts_wrapped_array() {
        assert_eq!(
            category_rows(json!({"success": true, "data": [{"id": 1}]})).len(),
            1
        );
    }

    #[test]
    fn accepts_wrapped_paginator() {
        let raw = json!({"success": true, "data": {"data": [{"id": 1}], "total": 1}});
        assert_eq!(category_rows(raw).len(), 1);
    }

    #[test]
    fn garbage_is_empty() {
        assert!(category_rows(json!("nope")).is_empty());
        assert!(category_rows(json!({"success": false})).is_empty());
    }
}
