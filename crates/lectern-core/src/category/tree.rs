// ── Category hierarchy ──
//
// Arena-backed tree built from either the flat or the nested API view.
// Nodes live in one table indexed by id; parent/child links are indices.
// Each id appears exactly once, and parent chains never loop: a row whose
// parent is unknown or would close a cycle is attached as a root.

use std::collections::{BTreeMap, HashMap, VecDeque};

use strum::IntoEnumIterator;
use tracing::warn;

use crate::error::CoreError;
use crate::model::category::delete_prompt;
use crate::model::{Category, CategoryForm, CategoryType, EntityId};

/// One entry of a parent picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentOption {
    pub id: EntityId,
    /// Name indented by depth, e.g. `"— — Romans"`.
    pub label: String,
    pub depth: usize,
    pub category_type: CategoryType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTree {
    /// Node payloads with `children` emptied.
    nodes: Vec<Category>,
    index: HashMap<EntityId, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl CategoryTree {
    /// Build from API rows in either shape; nested `children` are flattened.
    pub fn build(rows: Vec<Category>) -> Self {
        let mut flat = Vec::new();
        flatten(rows, None, &mut flat);

        let mut tree = Self::default();
        for node in flat {
            if tree.index.contains_key(&node.id) {
                warn!(id = %node.id, "duplicate category id; keeping the first");
                continue;
            }
            tree.index.insert(node.id.clone(), tree.nodes.len());
            tree.nodes.push(node);
        }

        tree.parent = vec![None; tree.nodes.len()];
        tree.children = vec![Vec::new(); tree.nodes.len()];
        for i in 0..tree.nodes.len() {
            let parent = tree.nodes[i]
                .parent_id
                .as_ref()
                .and_then(|pid| tree.index.get(pid).copied());
            match parent {
                Some(p) if p != i && !tree.is_ancestor_idx(i, p) => {
                    tree.parent[i] = Some(p);
                    tree.children[p].push(i);
                }
                Some(_) => {
                    warn!(id = %tree.nodes[i].id, "category parent would form a cycle; treating as root");
                    tree.nodes[i].parent_id = None;
                    tree.roots.push(i);
                }
                None => {
                    if tree.nodes[i].parent_id.is_some() {
                        warn!(id = %tree.nodes[i].id, "category parent not loaded; treating as root");
                    }
                    tree.roots.push(i);
                }
            }
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<&Category> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn roots(&self) -> impl Iterator<Item = &Category> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    pub fn children(&self, id: &EntityId) -> Vec<&Category> {
        self.index
            .get(id)
            .map(|&i| self.children[i].iter().map(|&c| &self.nodes[c]).collect())
            .unwrap_or_default()
    }

    pub fn child_count(&self, id: &EntityId) -> usize {
        self.index.get(id).map_or(0, |&i| self.children[i].len())
    }

    pub fn parent(&self, id: &EntityId) -> Option<&Category> {
        let i = *self.index.get(id)?;
        self.parent[i].map(|p| &self.nodes[p])
    }

    pub fn depth(&self, id: &EntityId) -> Option<usize> {
        let mut i = *self.index.get(id)?;
        let mut depth = 0;
        while let Some(p) = self.parent[i] {
            depth += 1;
            i = p;
        }
        Some(depth)
    }

    /// All nodes below `id`, breadth-first.
    pub fn descendants(&self, id: &EntityId) -> Vec<&Category> {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut queue: VecDeque<usize> = self.children[start].iter().copied().collect();
        while let Some(i) = queue.pop_front() {
            out.push(&self.nodes[i]);
            queue.extend(self.children[i].iter().copied());
        }
        out
    }

    /// `true` if `node` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: &EntityId, node: &EntityId) -> bool {
        match (self.index.get(ancestor), self.index.get(node)) {
            (Some(&a), Some(&n)) => self.is_ancestor_idx(a, n),
            _ => false,
        }
    }

    /// `true` if re-parenting `node` under `new_parent` would close a loop.
    pub fn would_create_cycle(&self, node: &EntityId, new_parent: &EntityId) -> bool {
        node == new_parent || self.is_descendant(node, new_parent)
    }

    fn is_ancestor_idx(&self, ancestor: usize, mut node: usize) -> bool {
        // Bounded walk: during `build` links are still being attached.
        for _ in 0..self.nodes.len() {
            match self.parent.get(node).copied().flatten() {
                Some(p) if p == ancestor => return true,
                Some(p) => node = p,
                None => return false,
            }
        }
        false
    }

    /// Depth-first walk in display order.
    pub fn walk(&self) -> Vec<(usize, &Category)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (0, r)).collect();
        while let Some((depth, i)) = stack.pop() {
            out.push((depth, &self.nodes[i]));
            stack.extend(self.children[i].iter().rev().map(|&c| (depth + 1, c)));
        }
        out
    }

    /// Rebuild the nested representation.
    pub fn nested(&self) -> Vec<Category> {
        self.roots.iter().map(|&r| self.nest(r)).collect()
    }

    fn nest(&self, i: usize) -> Category {
        let mut node = self.nodes[i].clone();
        node.children = self.children[i].iter().map(|&c| self.nest(c)).collect();
        node
    }

    /// Candidate parents for a form.
    ///
    /// Excludes the node being edited and everything below it, and keeps
    /// only nodes of `category_type` when one is given.
    pub fn parent_options(
        &self,
        editing: Option<&EntityId>,
        category_type: Option<CategoryType>,
    ) -> Vec<ParentOption> {
        self.walk()
            .into_iter()
            .filter(|(_, node)| {
                editing.is_none_or(|e| &node.id != e && !self.is_descendant(e, &node.id))
            })
            .filter(|(_, node)| category_type.is_none_or(|t| node.category_type == t))
            .map(|(depth, node)| ParentOption {
                id: node.id.clone(),
                label: format!("{}{}", "— ".repeat(depth), node.name),
                depth,
                category_type: node.category_type,
            })
            .collect()
    }

    /// Nodes per type, every type present (zero when empty).
    pub fn type_counts(&self) -> BTreeMap<CategoryType, usize> {
        let mut counts: BTreeMap<CategoryType, usize> =
            CategoryType::iter().map(|t| (t, 0)).collect();
        for node in &self.nodes {
            *counts.entry(node.category_type).or_default() += 1;
        }
        counts
    }

    pub fn delete_prompt(&self, id: &EntityId) -> Option<String> {
        let node = self.get(id)?;
        Some(delete_prompt(&node.name, self.child_count(id)))
    }

    /// Check a form against the hierarchy rules.
    ///
    /// The parent must exist, share the form's type, and not be the edited
    /// node or one of its descendants. A node with children keeps its type.
    pub fn validate_form(
        &self,
        form: &CategoryForm,
        editing: Option<&EntityId>,
    ) -> Result<(), CoreError> {
        if let Some(node) = editing.and_then(|id| self.get(id)) {
            let children = self.child_count(&node.id);
            if node.category_type != form.category_type && children > 0 {
                return Err(CoreError::validation(format!(
                    "\"{}\" has {children} subcategories of type {}; move them before changing its type",
                    node.name, node.category_type
                )));
            }
        }
        let Some(parent_id) = &form.parent_id else {
            return Ok(());
        };
        let parent = self.get(parent_id).ok_or_else(|| CoreError::NotFound {
            entity_type: "Parent category".into(),
            identifier: parent_id.to_string(),
        })?;
        if parent.category_type != form.category_type {
            return Err(CoreError::validation(format!(
                "A {} category cannot be placed under the {} category \"{}\"",
                form.category_type, parent.category_type, parent.name
            )));
        }
        if editing.is_some_and(|id| self.would_create_cycle(id, parent_id)) {
            return Err(CoreError::validation(
                "A category cannot be moved under itself or one of its subcategories",
            ));
        }
        Ok(())
    }
}

fn flatten(rows: Vec<Category>, parent: Option<&EntityId>, out: &mut Vec<Category>) {
    for mut row in rows {
        if row.parent_id.is_none() {
            row.parent_id = parent.cloned();
        }
        let children = std::mem::take(&mut row.children);
        let id = row.id.clone();
        out.push(row);
        flatten(children, Some(&id), out);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn rows(value: serde_json::Value) -> Vec<Category> {
        serde_json::from_value(value).unwrap()
    }

    fn id(n: u64) -> EntityId {
        EntityId::Numeric(n)
    }

    /// Root(1) -> [A(2) -> [A1(4)], B(3)], plus a sermon root(5).
    fn sample() -> CategoryTree {
        CategoryTree::build(rows(json!([
            {"id": 1, "name": "Root", "type": "post", "children": [
                {"id": 2, "name": "A", "type": "post", "children": [
                    {"id": 4, "name": "A1", "type": "post"}
                ]},
                {"id": 3, "name": "B", "type": "post"}
            ]},
            {"id": 5, "name": "Series", "type": "sermon"}
        ])))
    }

    #[test]
    fn nested_and_flat_build_same_tree() {
        let flat = CategoryTree::build(rows(json!([
            {"id": 4, "name": "A1", "type": "post", "parent_id": 2},
            {"id": 1, "name": "Root", "type": "post"},
            {"id": 2, "name": "A", "type": "post", "parent_id": 1},
            {"id": 3, "name": "B", "type": "post", "parent_id": 1},
            {"id": 5, "name": "Series", "type": "sermon"}
        ])));
        let nested = sample();
        assert_eq!(flat.len(), nested.len());
        for n in 1..=5 {
            assert_eq!(flat.depth(&id(n)), nested.depth(&id(n)));
        }
    }

    #[test]
    fn descendants_and_depth() {
        let tree = sample();
        let below: Vec<_> = tree.descendants(&id(1)).iter().map(|c| c.name.clone()).collect();
        assert_eq!(below, ["A", "B", "A1"]);
        assert_eq!(tree.depth(&id(4)), Some(2));
        assert_eq!(tree.parent(&id(4)).unwrap().name, "A");
    }

    #[test]
    fn parent_options_exclude_self_and_descendants() {
        let tree = sample();
        let labels: Vec<_> = tree
            .parent_options(Some(&id(2)), None)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, ["Root", "— B", "Series"]);
    }

    #[test]
    fn parent_options_filter_by_type() {
        let tree = sample();
        let options = tree.parent_options(None, Some(CategoryType::Sermon));
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].id, id(5));
    }

    #[test]
    fn type_counts_include_every_type() {
        let counts = sample().type_counts();
        assert_eq!(counts[&CategoryType::Post], 4);
        assert_eq!(counts[&CategoryType::Sermon], 1);
        assert_eq!(counts[&CategoryType::BibleStudy], 0);
        assert_eq!(counts.values().sum::<usize>(), 5);
    }

    #[test]
    fn delete_prompt_counts_direct_children() {
        let prompt = sample().delete_prompt(&id(1)).unwrap();
        assert!(prompt.contains('2'), "{prompt}");
    }

    #[test]
    fn cycles_in_input_are_broken() {
        let tree = CategoryTree::build(rows(json!([
            {"id": 1, "name": "X", "type": "post", "parent_id": 2},
            {"id": 2, "name": "Y", "type": "post", "parent_id": 1}
        ])));
        assert_eq!(tree.roots().count(), 1);
        assert_eq!(tree.walk().len(), 2);
    }

    #[test]
    fn orphans_become_roots() {
        let tree = CategoryTree::build(rows(json!([
            {"id": 7, "name": "Lost", "type": "page", "parent_id": 99}
        ])));
        assert_eq!(tree.roots().count(), 1);
        assert_eq!(tree.get(&id(7)).unwrap().parent_id, Some(id(99)));
    }

    #[test]
    fn form_validation_rules() {
        let tree = sample();
        let mut form = CategoryForm {
            name: "Moved".into(),
            parent_id: Some(id(4)),
            ..CategoryForm::default()
        };
        assert!(tree.validate_form(&form, Some(&id(2))).is_err());
        assert!(tree.validate_form(&form, Some(&id(3))).is_ok());

        form.parent_id = Some(id(5));
        assert!(tree.validate_form(&form, None).is_err());
        form.category_type = CategoryType::Sermon;
        assert!(tree.validate_form(&form, None).is_ok());

        form.parent_id = Some(id(42));
        assert!(matches!(
            tree.validate_form(&form, None),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn type_change_blocked_while_children_exist() {
        let tree = sample();
        let root = CategoryForm {
            name: "Root".into(),
            category_type: CategoryType::Sermon,
            ..CategoryForm::default()
        };
        let err = tree.validate_form(&root, Some(&id(1))).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }), "{err:?}");

        // Same type with children, or new type on a leaf, is fine.
        let keep = CategoryForm {
            category_type: CategoryType::Post,
            ..root.clone()
        };
        assert!(tree.validate_form(&keep, Some(&id(1))).is_ok());
        assert!(tree.validate_form(&root, Some(&id(5))).is_ok());
    }

    #[test]
    fn nested_round_trip_keeps_structure() {
        let nested = sample().nested();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].children.len(), 2);
        assert_eq!(nested[0].children[0].children[0].name, "A1");
    }
}
