// ── Homepage customizer ──
//
// Async shell around `WidgetLayout`: loads the arrangement from the server,
// publishes it back, and resets it to the server's defaults. At most one
// publish runs at a time; edits made while a publish is in flight keep the
// layout dirty after it completes.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use lectern_api::ApiClient;

use super::drag::DragSession;
use super::layout::WidgetLayout;
use crate::confirm::Confirm;
use crate::error::CoreError;
use crate::model::{SettingValue, WidgetDescriptor};
use crate::store::Alert;

pub const RESET_PROMPT: &str =
    "Reset the homepage to the default layout? Unpublished changes will be lost.";

/// Coarse lifecycle for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CustomizerStatus {
    Unloaded,
    Loading,
    Loaded,
    Dirty,
    Publishing,
    Resetting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Loading,
    Publishing,
    Resetting,
}

#[derive(Debug, Clone, Default)]
pub struct CustomizerState {
    pub layout: WidgetLayout,
    /// Server-provided default arrangement, used by reset.
    pub defaults: Vec<WidgetDescriptor>,
    pub loaded: bool,
    pub alert: Option<Alert>,
    phase: Phase,
}

impl CustomizerState {
    pub fn status(&self) -> CustomizerStatus {
        match self.phase {
            Phase::Loading => CustomizerStatus::Loading,
            Phase::Publishing => CustomizerStatus::Publishing,
            Phase::Resetting => CustomizerStatus::Resetting,
            Phase::Idle if !self.loaded => CustomizerStatus::Unloaded,
            Phase::Idle if self.layout.is_dirty() => CustomizerStatus::Dirty,
            Phase::Idle => CustomizerStatus::Loaded,
        }
    }
}

pub struct HomepageCustomizer {
    api: Arc<ApiClient>,
    state: watch::Sender<CustomizerState>,
}

impl HomepageCustomizer {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(CustomizerState::default());
        Self { api, state }
    }

    pub fn snapshot(&self) -> CustomizerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CustomizerState> {
        self.state.subscribe()
    }

    pub fn status(&self) -> CustomizerStatus {
        self.state.borrow().status()
    }

    pub fn layout(&self) -> WidgetLayout {
        self.state.borrow().layout.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().layout.is_dirty()
    }

    pub fn dismiss_alert(&self) {
        self.state.send_if_modified(|s| s.alert.take().is_some());
    }

    // ── Server round-trips ───────────────────────────────────────────

    /// Fetch the current arrangement and defaults. Replaces local edits.
    ///
    /// Rejected with [`CoreError::Busy`] while a publish or reset is running.
    pub async fn load(&self) -> Result<(), CoreError> {
        let mut claimed = false;
        self.state.send_if_modified(|s| {
            if s.phase != Phase::Idle {
                return false;
            }
            s.phase = Phase::Loading;
            claimed = true;
            true
        });
        if !claimed {
            return Err(CoreError::Busy {
                operation: "Load".into(),
            });
        }
        let result = async {
            let payload = self.api.get_widgets_config().await?;
            Ok::<_, CoreError>((
                decode_widgets(payload.widgets)?,
                decode_widgets(payload.available_widgets)?,
            ))
        }
        .await;

        match result {
            Ok((widgets, defaults)) => {
                debug!(widgets = widgets.len(), defaults = defaults.len(), "layout loaded");
                self.state.send_modify(|s| {
                    s.layout = WidgetLayout::new(widgets);
                    s.defaults = defaults;
                    s.loaded = true;
                    s.phase = Phase::Idle;
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "loading layout failed");
                self.state.send_modify(|s| {
                    s.phase = Phase::Idle;
                    s.alert = Some(Alert::from(&e));
                });
                Err(e)
            }
        }
    }

    /// Send the entire ordered sequence to the server.
    ///
    /// Rejected with [`CoreError::Busy`] while another publish is running.
    /// On failure the layout stays dirty.
    pub async fn publish(&self) -> Result<(), CoreError> {
        let mut claimed = None;
        self.state.send_if_modified(|s| {
            if s.phase != Phase::Idle {
                return false;
            }
            s.phase = Phase::Publishing;
            claimed = Some((s.layout.widgets().to_vec(), s.layout.revision()));
            true
        });
        let (widgets, revision) = claimed.ok_or_else(|| CoreError::Busy {
            operation: "Publish".into(),
        })?;

        let result = async {
            let body = widgets
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<Value>, _>>()?;
            self.api.put_widgets_config(body).await?;
            Ok::<_, CoreError>(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(widgets = widgets.len(), "homepage layout published");
                self.state.send_modify(|s| {
                    s.phase = Phase::Idle;
                    s.layout.mark_clean_at(revision);
                    s.alert = Some(Alert::success("Homepage layout published successfully"));
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "publishing layout failed");
                self.state.send_modify(|s| {
                    s.phase = Phase::Idle;
                    s.alert = Some(Alert::from(&e));
                });
                Err(e)
            }
        }
    }

    /// Replace the arrangement with the server's defaults after confirmation.
    ///
    /// Returns `false` if declined. The result is dirty until published.
    pub async fn reset(&self, confirm: &dyn Confirm) -> Result<bool, CoreError> {
        if !confirm.confirm(RESET_PROMPT) {
            return Ok(false);
        }

        let mut claimed = false;
        self.state.send_if_modified(|s| {
            if s.phase != Phase::Idle {
                return false;
            }
            s.phase = Phase::Resetting;
            claimed = true;
            true
        });
        if !claimed {
            return Err(CoreError::Busy {
                operation: "Reset".into(),
            });
        }

        let result = async {
            let payload = self.api.get_widgets_config().await?;
            let defaults = decode_widgets(payload.available_widgets)?;
            if defaults.is_empty() {
                return Err(CoreError::validation(
                    "The server did not provide a default layout",
                ));
            }
            Ok(defaults)
        }
        .await;

        match result {
            Ok(defaults) => {
                info!(widgets = defaults.len(), "layout reset to defaults");
                self.state.send_modify(|s| {
                    s.layout.replace(defaults.clone());
                    s.defaults = defaults;
                    s.loaded = true;
                    s.phase = Phase::Idle;
                    s.alert = Some(Alert::info("Layout reset to defaults. Publish to apply."));
                });
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "resetting layout failed");
                self.state.send_modify(|s| {
                    s.phase = Phase::Idle;
                    s.alert = Some(Alert::from(&e));
                });
                Err(e)
            }
        }
    }

    // ── Local edits ──────────────────────────────────────────────────

    pub fn toggle(&self, index: usize) -> Result<bool, CoreError> {
        let mut result = Err(CoreError::InvalidIndex { index, len: 0 });
        self.state.send_modify(|s| result = s.layout.toggle(index));
        result
    }

    pub fn reorder(&self, from: usize, to: usize) -> bool {
        self.state.send_if_modified(|s| s.layout.reorder(from, to))
    }

    /// Apply a finished drag gesture.
    pub fn apply_drag(&self, session: DragSession) -> bool {
        session
            .release()
            .is_some_and(|r| self.reorder(r.from, r.to))
    }

    pub fn update_setting(
        &self,
        index: usize,
        key: &str,
        value: SettingValue,
    ) -> Result<(), CoreError> {
        let mut result = Ok(());
        self.state
            .send_modify(|s| result = s.layout.update_setting(index, key, value));
        result
    }

    pub fn enable_all(&self) {
        self.state.send_modify(|s| s.layout.enable_all());
    }

    pub fn disable_all(&self) {
        self.state.send_modify(|s| s.layout.disable_all());
    }
}

fn decode_widgets(raw: Vec<Value>) -> Result<Vec<WidgetDescriptor>, CoreError> {
    raw.into_iter()
        .map(|w| {
            serde_json::from_value(w).map_err(|e| CoreError::Decode {
                message: format!("widget descriptor: {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lectern_api::{AuthHeaders, TransportConfig};

    use super::*;

    fn offline() -> HomepageCustomizer {
        let api = ApiClient::new(
            "http://127.0.0.1:1/api/admin",
            AuthHeaders::default(),
            &TransportConfig::default(),
        )
        .unwrap();
        HomepageCustomizer::new(Arc::new(api))
    }

    fn seeded() -> HomepageCustomizer {
        let c = offline();
        c.state.send_modify(|s| {
            s.layout = WidgetLayout::new(vec![
                WidgetDescriptor::new("A", "Hero", true),
                WidgetDescriptor::new("B", "Sermons", true),
                WidgetDescriptor::new("C", "Events", true),
            ]);
            s.loaded = true;
        });
        c
    }

    #[test]
    fn status_tracks_dirty() {
        let c = seeded();
        assert_eq!(c.status(), CustomizerStatus::Loaded);
        assert!(c.reorder(0, 2));
        assert_eq!(c.status(), CustomizerStatus::Dirty);
        assert_eq!(offline().status(), CustomizerStatus::Unloaded);
    }

    #[test]
    fn drag_applies_reorder() {
        let c = seeded();
        let mut drag = DragSession::start(2);
        drag.hover(0);
        assert!(c.apply_drag(drag));
        assert_eq!(c.layout().ids(), ["C", "A", "B"]);
    }

    #[tokio::test]
    async fn publish_rejected_while_publishing() {
        let c = seeded();
        c.state.send_modify(|s| s.phase = Phase::Publishing);
        let err = c.publish().await.unwrap_err();
        assert!(matches!(err, CoreError::Busy { .. }));
    }

    #[tokio::test]
    async fn load_rejected_while_publishing() {
        let c = seeded();
        c.toggle(0).unwrap();
        c.state.send_modify(|s| s.phase = Phase::Publishing);
        let err = c.load().await.unwrap_err();
        assert!(matches!(err, CoreError::Busy { .. }));

        let s = c.snapshot();
        assert_eq!(s.status(), CustomizerStatus::Publishing);
        assert!(s.layout.is_dirty());
    }

    #[tokio::test]
    async fn declined_reset_changes_nothing() {
        let c = seeded();
        assert!(!c.reset(&|_: &str| false).await.unwrap());
        assert!(!c.is_dirty());
    }

    #[tokio::test]
    async fn failed_publish_keeps_dirty() {
        let c = seeded();
        c.toggle(1).unwrap();
        assert!(c.publish().await.is_err());
        let s = c.snapshot();
        assert!(s.layout.is_dirty());
        assert_eq!(s.status(), CustomizerStatus::Dirty);
        assert!(s.alert.unwrap().is_error());
    }
}
