// Homepage widget configuration endpoints
//
// The configuration is read and written as a whole: the server stores the
// ordered sequence, so there is no per-widget endpoint.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

pub const WIDGETS_CONFIG_PATH: &str = "widgets-config";

/// Raw `{widgets, available_widgets}` payload.
///
/// Descriptors stay as JSON here; `lectern-core` owns their typed model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetsConfigPayload {
    /// The current ordered arrangement.
    pub widgets: Vec<Value>,
    /// The server's default arrangement.
    pub available_widgets: Vec<Value>,
}

impl WidgetsConfigPayload {
    fn from_response(raw: &Value) -> Self {
        // `{data: {widgets, available_widgets}}`, tolerating a bare object.
        let data = raw.get("data").filter(|d| d.is_object()).unwrap_or(raw);
        let array = |key: &str| {
            data.get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        Self {
            widgets: array("widgets"),
            available_widgets: array("available_widgets"),
        }
    }
}

impl ApiClient {
    /// `GET widgets-config`
    pub async fn get_widgets_config(&self) -> Result<WidgetsConfigPayload, Error> {
        let raw = self.get(WIDGETS_CONFIG_PATH, &[]).await?;
        let payload = WidgetsConfigPayload::from_response(&raw);
        debug!(
            widgets = payload.widgets.len(),
            available = payload.available_widgets.len(),
            "fetched widget configuration"
        );
        Ok(payload)
    }

    /// `PUT widgets-config` with the entire ordered sequence.
    pub async fn put_widgets_config(&self, widgets: Vec<Value>) -> Result<Value, Error> {
        debug!(widgets = widgets.len(), "publishing widget configuration");
        self.put_json(WIDGETS_CONFIG_PATH, json!({ "widgets": widgets }))
            .await
    }
}
