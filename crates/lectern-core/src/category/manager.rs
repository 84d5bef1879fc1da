// ── Category manager ──
//
// Screen state for the category hierarchy. Unlike the paginated stores it
// always holds the whole tree and re-fetches it after every mutation.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use lectern_api::envelope::message_of;
use lectern_api::{ApiClient, CategoryView};

use super::tree::{CategoryTree, ParentOption};
use crate::confirm::Confirm;
use crate::error::CoreError;
use crate::model::{Category, CategoryForm, CategoryType, EntityId};
use crate::resource::{FormMode, Resource, ResourceForm};
use crate::store::Alert;

#[derive(Debug, Clone, Default)]
pub struct CategoryState {
    pub tree: CategoryTree,
    pub view: CategoryView,
    /// Type filter sent with `load`; `None` lists every type.
    pub filter: Option<CategoryType>,
    pub form: CategoryForm,
    pub editing: Option<EntityId>,
    pub editor_open: bool,
    /// Set by `add_child`: parent and type come from the parent node.
    pub parent_locked: bool,
    pub alert: Option<Alert>,
    pub loading: bool,
}

pub struct CategoryManager {
    api: Arc<ApiClient>,
    state: watch::Sender<CategoryState>,
}

impl CategoryManager {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(CategoryState {
            view: CategoryView::Tree,
            ..CategoryState::default()
        });
        Self { api, state }
    }

    pub fn snapshot(&self) -> CategoryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CategoryState> {
        self.state.subscribe()
    }

    pub fn tree(&self) -> CategoryTree {
        self.state.borrow().tree.clone()
    }

    pub fn alert(&self) -> Option<Alert> {
        self.state.borrow().alert.clone()
    }

    pub fn type_counts(&self) -> BTreeMap<CategoryType, usize> {
        self.state.borrow().tree.type_counts()
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch categories in `view`, optionally limited to one type.
    pub async fn load(
        &self,
        view: CategoryView,
        filter: Option<CategoryType>,
    ) -> Result<(), CoreError> {
        self.state.send_modify(|s| {
            s.view = view;
            s.filter = filter;
            s.loading = true;
        });
        self.fetch().await
    }

    /// Re-fetch with the last view and filter.
    pub async fn reload(&self) -> Result<(), CoreError> {
        self.state.send_modify(|s| s.loading = true);
        self.fetch().await
    }

    async fn fetch(&self) -> Result<(), CoreError> {
        let (view, filter) = {
            let s = self.state.borrow();
            (s.view, s.filter)
        };
        let filter_text = filter.map(|t| t.to_string());
        let result = async {
            let rows = self
                .api
                .list_categories(view, filter_text.as_deref())
                .await?;
            let decoded = rows
                .into_iter()
                .map(serde_json::from_value::<Category>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| CoreError::Decode {
                    message: format!("category: {e}"),
                })?;
            Ok::<_, CoreError>(CategoryTree::build(decoded))
        }
        .await;

        match result {
            Ok(tree) => {
                debug!(nodes = tree.len(), ?view, "categories loaded");
                self.state.send_modify(|s| {
                    s.tree = tree;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "loading categories failed");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.alert = Some(Alert::from(&e));
                });
                Err(e)
            }
        }
    }

    // ── Editor ───────────────────────────────────────────────────────

    /// Open a blank root-level form. The type defaults to the active filter.
    pub fn open_create(&self) {
        self.state.send_modify(|s| {
            s.form = CategoryForm {
                category_type: s.filter.unwrap_or_default(),
                ..CategoryForm::default()
            };
            s.editing = None;
            s.parent_locked = false;
            s.editor_open = true;
        });
    }

    /// Open a form for a new child of `parent_id`, inheriting its type.
    pub fn add_child(&self, parent_id: &EntityId) -> Result<(), CoreError> {
        let parent_type = self
            .state
            .borrow()
            .tree
            .get(parent_id)
            .map(|p| p.category_type)
            .ok_or_else(|| not_found(parent_id))?;
        let parent_id = parent_id.clone();
        self.state.send_modify(|s| {
            s.form = CategoryForm {
                category_type: parent_type,
                parent_id: Some(parent_id),
                ..CategoryForm::default()
            };
            s.editing = None;
            s.parent_locked = true;
            s.editor_open = true;
        });
        Ok(())
    }

    pub fn open_edit(&self, id: &EntityId) -> Result<(), CoreError> {
        let form = self
            .state
            .borrow()
            .tree
            .get(id)
            .map(Resource::to_form)
            .ok_or_else(|| not_found(id))?;
        let id = id.clone();
        self.state.send_modify(|s| {
            s.form = form;
            s.editing = Some(id);
            s.parent_locked = false;
            s.editor_open = true;
        });
        Ok(())
    }

    pub fn close_editor(&self) {
        self.state.send_modify(|s| {
            s.editor_open = false;
            s.editing = None;
            s.parent_locked = false;
        });
    }

    pub fn edit_form(&self, edit: impl FnOnce(&mut CategoryForm)) {
        self.state.send_modify(|s| edit(&mut s.form));
    }

    pub fn set_field(&self, key: &str, raw: &str) -> Result<(), CoreError> {
        let (mut form, locked) = {
            let s = self.state.borrow();
            (s.form.clone(), s.parent_locked)
        };
        if locked && matches!(key, "type" | "parent_id") {
            return Err(CoreError::validation(format!(
                "'{key}' is fixed when adding a subcategory"
            )));
        }
        form.set_field(key, raw)?;
        self.state.send_modify(|s| s.form = form);
        Ok(())
    }

    /// Parent picker entries for the open form.
    pub fn parent_options(&self) -> Vec<ParentOption> {
        let s = self.state.borrow();
        s.tree
            .parent_options(s.editing.as_ref(), Some(s.form.category_type))
    }

    /// Create or update from the current form, then reload the tree.
    pub async fn submit(&self) -> Result<FormMode, CoreError> {
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
            self.state
                .borrow()
                .tree
                .validate_form(&form, editing.as_ref())?;
            let body = form.body()?;
            match &editing {
                Some(id) => {
                    self.api
                        .update(Category::COLLECTION, &id.to_string(), body)
                        .await?
                }
                None => self.api.create(Category::COLLECTION, body).await?,
            };
            Ok::<_, CoreError>(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(?mode, name = %form.name, "category saved");
                self.state.send_modify(|s| {
                    s.editor_open = false;
                    s.editing = None;
                    s.parent_locked = false;
                    s.alert = Some(Alert::success(format!(
                        "Category {} successfully",
                        mode.past_tense()
                    )));
                });
                self.reload_quietly().await;
                Ok(mode)
            }
            Err(e) => {
                warn!(?mode, error = %e, "saving category failed");
                self.state.send_modify(|s| s.alert = Some(Alert::from(&e)));
                Err(e)
            }
        }
    }

    /// Delete a node (the server cascades to its subtree) after
    /// confirmation, then re-fetch. Returns `false` if declined.
    pub async fn delete(&self, id: &EntityId, confirm: &dyn Confirm) -> Result<bool, CoreError> {
        let prompt = self
            .state
            .borrow()
            .tree
            .delete_prompt(id)
            .ok_or_else(|| not_found(id))?;
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        match self
            .api
            .delete(Category::COLLECTION, &id.to_string())
            .await
        {
            Ok(raw) => {
                let message =
                    message_of(&raw).unwrap_or_else(|| "Category deleted successfully".into());
                info!(%id, "category deleted");
                self.state
                    .send_modify(|s| s.alert = Some(Alert::success(message)));
                self.reload_quietly().await;
                Ok(true)
            }
            Err(e) => {
                let e = CoreError::from(e);
                self.state.send_modify(|s| s.alert = Some(Alert::from(&e)));
                Err(e)
            }
        }
    }

    async fn reload_quietly(&self) {
        if let Err(e) = self.reload().await {
            warn!(error = %e, "reload after mutation failed");
        }
    }
}

fn not_found(id: &EntityId) -> CoreError {
    CoreError::NotFound {
        entity_type: "Category".into(),
        identifier: id.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lectern_api::{AuthHeaders, TransportConfig};
    use serde_json::json;

    use super::*;

    fn seeded() -> CategoryManager {
        let api = ApiClient::new(
            "http://127.0.0.1:1/api/admin",
            AuthHeaders::default(),
            &TransportConfig::default(),
        )
        .unwrap();
        let manager = CategoryManager::new(Arc::new(api));
        let rows: Vec<Category> = serde_json::from_value(json!([
            {"id": 1, "name": "Studies", "type": "bible-study", "children": [
                {"id": 2, "name": "Romans", "type": "bible-study"}
            ]},
            {"id": 3, "name": "News", "type": "post"}
        ]))
        .unwrap();
        manager
            .state
            .send_modify(|s| s.tree = CategoryTree::build(rows));
        manager
    }

    #[test]
    fn add_child_inherits_type_and_locks_parent() {
        let m = seeded();
        m.add_child(&EntityId::Numeric(1)).unwrap();
        let s = m.snapshot();
        assert_eq!(s.form.category_type, CategoryType::BibleStudy);
        assert_eq!(s.form.parent_id, Some(EntityId::Numeric(1)));
        assert!(s.parent_locked);
        assert!(m.set_field("type", "post").is_err());
        m.set_field("name", "Galatians").unwrap();
    }

    #[test]
    fn parent_options_follow_form_type() {
        let m = seeded();
        m.open_edit(&EntityId::Numeric(1)).unwrap();
        assert!(m.parent_options().is_empty());
        m.open_edit(&EntityId::Numeric(2)).unwrap();
        let options = m.parent_options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "Studies");
    }

    #[test]
    fn add_child_of_unknown_parent_fails() {
        assert!(seeded().add_child(&EntityId::Numeric(99)).is_err());
    }

    #[tokio::test]
    async fn cyclic_edit_rejected_before_request() {
        let m = seeded();
        m.open_edit(&EntityId::Numeric(1)).unwrap();
        m.set_field("parent_id", "2").unwrap();
        let err = m.submit().await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(m.snapshot().editor_open);
    }
}
