// ── Generic paginated resource store ──
//
// One store per admin screen. Holds the current page of records, its
// pagination metadata, the editor form and the alert banner inside a
// `watch` channel so views re-render on every change.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use lectern_api::envelope::message_of;
use lectern_api::{ApiClient, PageMeta, normalize};

use super::alert::Alert;
use crate::confirm::Confirm;
use crate::error::CoreError;
use crate::model::EntityId;
use crate::resource::{FormMode, Resource, ResourceForm};

/// Observable state of a [`ResourceStore`].
#[derive(Debug, Clone)]
pub struct StoreState<R: Resource> {
    /// Current page, in server order.
    pub items: Vec<R>,
    pub meta: PageMeta,
    pub form: R::Form,
    /// Record being edited; `None` in create mode.
    pub editing: Option<R>,
    pub editor_open: bool,
    pub alert: Option<Alert>,
    pub loading: bool,
}

impl<R: Resource> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::default(),
            form: R::Form::default(),
            editing: None,
            editor_open: false,
            alert: None,
            loading: false,
        }
    }
}

impl<R: Resource> StoreState<R> {
    pub fn mode(&self) -> FormMode {
        if self.editing.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }
}

/// Whether a `list` response was applied or dropped for a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Applied,
    Superseded,
}

/// Result of a successful `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub mode: FormMode,
    pub message: String,
    /// `false` when the follow-up list refresh failed.
    pub refreshed: bool,
}

/// Paginated CRUD store for one resource type.
pub struct ResourceStore<R: Resource> {
    api: Arc<ApiClient>,
    state: watch::Sender<StoreState<R>>,
    /// Bumped per `list` call; only the newest call may apply its page.
    list_seq: AtomicU64,
    filters: Vec<(String, String)>,
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            api,
            state,
            list_seq: AtomicU64::new(0),
            filters: Vec::new(),
        }
    }

    /// Add a query filter sent with every `list` call, e.g. `status=pending`.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> StoreState<R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<R>> {
        self.state.subscribe()
    }

    pub fn items(&self) -> Vec<R> {
        self.state.borrow().items.clone()
    }

    pub fn meta(&self) -> PageMeta {
        self.state.borrow().meta
    }

    pub fn alert(&self) -> Option<Alert> {
        self.state.borrow().alert.clone()
    }

    pub fn form(&self) -> R::Form {
        self.state.borrow().form.clone()
    }

    /// Look up a record on the current page.
    pub fn find(&self, id: &EntityId) -> Option<R> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn dismiss_alert(&self) {
        self.state.send_if_modified(|s| s.alert.take().is_some());
    }

    /// Fetch one record by id, without touching the list state.
    pub async fn fetch(&self, id: &EntityId) -> Result<R, CoreError> {
        let path = format!("{}/{id}", R::COLLECTION);
        let raw = self.api.get(&path, &[]).await.map_err(|e| {
            if e.is_not_found() {
                CoreError::NotFound {
                    entity_type: R::LABEL.to_owned(),
                    identifier: id.to_string(),
                }
            } else {
                e.into()
            }
        })?;
        Ok(lectern_api::envelope::record(raw)?)
    }

    // ── Listing ──────────────────────────────────────────────────────

    /// Fetch `page` and replace the current items and metadata.
    ///
    /// On failure the previous items stay in place and an error alert is
    /// set. When calls overlap, only the most recently issued one applies.
    pub async fn list(&self, page: u32) -> Result<ListOutcome, CoreError> {
        let seq = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.loading = true);

        let filters: Vec<(&str, String)> = self
            .filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        let result = match self.api.list(R::COLLECTION, page.max(1), &filters).await {
            Ok(raw) => normalize(&raw).decode::<R>().map_err(CoreError::from),
            Err(e) => Err(CoreError::from(e)),
        };

        if self.list_seq.load(Ordering::SeqCst) != seq {
            debug!(collection = R::COLLECTION, page, "discarding superseded page");
            return Ok(ListOutcome::Superseded);
        }

        match result {
            Ok(page_data) => {
                debug!(
                    collection = R::COLLECTION,
                    page = page_data.meta.current_page,
                    items = page_data.items.len(),
                    total = page_data.meta.total,
                    "page loaded"
                );
                self.state.send_modify(|s| {
                    s.items = page_data.items;
                    s.meta = page_data.meta;
                    s.loading = false;
                });
                Ok(ListOutcome::Applied)
            }
            Err(e) => {
                warn!(collection = R::COLLECTION, page, error = %e, "list failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.alert = Some(Alert::from(&e));
                });
                Err(e)
            }
        }
    }

    /// Re-fetch the page currently shown.
    pub async fn refresh(&self) -> Result<ListOutcome, CoreError> {
        let page = self.state.borrow().meta.current_page;
        self.list(page).await
    }

    // ── Editor ───────────────────────────────────────────────────────

    /// Open the editor with a fresh default form.
    pub fn open_create(&self) {
        self.state.send_modify(|s| {
            s.form = R::Form::default();
            s.editing = None;
            s.editor_open = true;
        });
    }

    /// Open the editor populated from `entity`.
    pub fn open_edit(&self, entity: &R) {
        let form = entity.to_form();
        let entity = entity.clone();
        self.state.send_modify(|s| {
            s.form = form;
            s.editing = Some(entity);
            s.editor_open = true;
        });
    }

    pub fn close_editor(&self) {
        self.state.send_modify(|s| {
            s.editor_open = false;
            s.editing = None;
        });
    }

    pub fn set_form(&self, form: R::Form) {
        self.state.send_modify(|s| s.form = form);
    }

    pub fn edit_form(&self, edit: impl FnOnce(&mut R::Form)) {
        self.state.send_modify(|s| edit(&mut s.form));
    }

    /// Patch one form field from text; see [`ResourceForm::set_field`].
    pub fn set_field(&self, key: &str, raw: &str) -> Result<(), CoreError> {
        let mut form = self.form();
        form.set_field(key, raw)?;
        self.set_form(form);
        Ok(())
    }

    /// Create or update from the current form.
    ///
    /// On success the editor closes, a success alert is set and the current
    /// page is re-fetched. On failure the editor stays open with the form
    /// intact and the server's message in the alert.
    pub async fn submit(&self) -> Result<SubmitOutcome, CoreError> {
        let (form, editing) = {
            let s = self.state.borrow();
            (s.form.clone(), s.editing.clone())
        };
        let mode = if editing.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        };

        let result = async {
            form.validate(mode)?;
            let body = form.body()?;
            let raw = match &editing {
                Some(entity) => {
                    self.api
                        .update(R::COLLECTION, &entity.id().to_string(), body)
                        .await?
                }
                None => self.api.create(R::COLLECTION, body).await?,
            };
            Ok::<Value, CoreError>(raw)
        }
        .await;

        match result {
            Ok(_) => {
                let message = format!("{} {} successfully", R::LABEL, mode.past_tense());
                info!(collection = R::COLLECTION, ?mode, "record saved");
                self.state.send_modify(|s| {
                    s.editor_open = false;
                    s.editing = None;
                    s.alert = Some(Alert::success(message.clone()));
                });
                let refreshed = self.refresh_after_mutation().await;
                Ok(SubmitOutcome {
                    mode,
                    message,
                    refreshed,
                })
            }
            Err(e) => {
                warn!(collection = R::COLLECTION, ?mode, error = %e, "save failed");
                self.state.send_modify(|s| s.alert = Some(Alert::from(&e)));
                Err(e)
            }
        }
    }

    // ── Delete and status actions ────────────────────────────────────

    /// Delete `entity` after confirmation. Returns `false` if declined.
    pub async fn remove(&self, entity: &R, confirm: &dyn Confirm) -> Result<bool, CoreError> {
        if !confirm.confirm(&entity.delete_prompt()) {
            debug!(collection = R::COLLECTION, id = %entity.id(), "delete declined");
            return Ok(false);
        }

        match self
            .api
            .delete(R::COLLECTION, &entity.id().to_string())
            .await
        {
            Ok(raw) => {
                let message = message_of(&raw)
                    .unwrap_or_else(|| format!("{} deleted successfully", R::LABEL));
                info!(collection = R::COLLECTION, id = %entity.id(), "record deleted");
                self.state
                    .send_modify(|s| s.alert = Some(Alert::success(message)));
                self.refresh_after_mutation().await;
                Ok(true)
            }
            Err(e) => {
                let e = CoreError::from(e);
                self.state.send_modify(|s| s.alert = Some(Alert::from(&e)));
                Err(e)
            }
        }
    }

    /// Run a status action such as `approve` or `toggle-featured`.
    pub async fn action(
        &self,
        entity: &R,
        action: &str,
        body: Option<Value>,
    ) -> Result<(), CoreError> {
        if !R::ACTIONS.contains(&action) {
            return Err(CoreError::UnsupportedAction {
                entity_type: R::LABEL.to_owned(),
                action: action.to_owned(),
            });
        }

        match self
            .api
            .action(R::COLLECTION, &entity.id().to_string(), action, body)
            .await
        {
            Ok(raw) => {
                let message = message_of(&raw)
                    .unwrap_or_else(|| format!("{} updated successfully", R::LABEL));
                info!(collection = R::COLLECTION, id = %entity.id(), action, "action applied");
                self.state
                    .send_modify(|s| s.alert = Some(Alert::success(message)));
                self.refresh_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                let e = CoreError::from(e);
                self.state.send_modify(|s| s.alert = Some(Alert::from(&e)));
                Err(e)
            }
        }
    }

    /// A failed refresh leaves its own alert; the mutation still succeeded.
    async fn refresh_after_mutation(&self) -> bool {
        match self.refresh().await {
            Ok(_) => true,
            Err(e) => {
                warn!(collection = R::COLLECTION, error = %e, "refresh after mutation failed");
                false
            }
        }
    }
}
