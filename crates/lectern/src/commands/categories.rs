//! Category tree handlers.

use std::collections::BTreeMap;
use std::str::FromStr;

use strum::IntoEnumIterator;
use tabled::Tabled;

use lectern_core::{
    Backoffice, Category, CategoryManager, CategoryType, CategoryView, ParentOption,
};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    category_type: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Active")]
    active: String,
}

fn category_row(depth: usize, c: &Category) -> CategoryRow {
    CategoryRow {
        id: c.id.to_string(),
        name: format!("{}{}", "  ".repeat(depth), c.name),
        category_type: c.category_type.to_string(),
        slug: c.slug.clone(),
        active: if c.is_active { "yes" } else { "no" }.to_owned(),
    }
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Type")]
    category_type: String,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Clone, Tabled, serde::Serialize)]
struct ParentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Parent")]
    label: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    category_type: String,
}

impl From<&ParentOption> for ParentRow {
    fn from(p: &ParentOption) -> Self {
        Self {
            id: p.id.to_string(),
            label: p.label.clone(),
            category_type: p.category_type.to_string(),
        }
    }
}

fn parse_type(raw: Option<&str>) -> Result<Option<CategoryType>, CliError> {
    raw.map(|t| {
        CategoryType::from_str(t.trim()).map_err(|_| {
            let known: Vec<String> = CategoryType::iter().map(|t| t.to_string()).collect();
            CliError::bad_argument("type", format!("'{t}' is not one of {}", known.join(", ")))
        })
    })
    .transpose()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    office: &Backoffice,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filter = parse_type(args.category_type.as_deref())?;
    let manager = office.categories();

    match args.command {
        CategoriesCommand::Tree { flat } => {
            let view = if flat {
                CategoryView::Flat
            } else {
                CategoryView::Tree
            };
            manager.load(view, filter).await?;
            output::print_output(&render_tree(&manager, global), global.quiet);
            Ok(())
        }

        CategoriesCommand::Counts => {
            manager.load(CategoryView::Flat, None).await?;
            output::print_output(&render_counts(&manager.type_counts(), global), global.quiet);
            Ok(())
        }

        CategoriesCommand::Parents { editing } => {
            manager.load(CategoryView::Flat, None).await?;
            let options = match editing {
                Some(id) => {
                    manager.open_edit(&util::parse_id(&id))?;
                    manager.parent_options()
                }
                None => manager.tree().parent_options(None, filter),
            };
            let rows: Vec<ParentRow> = options.iter().map(ParentRow::from).collect();
            let out = output::render_list(&global.output, &rows, ParentRow::clone, |r| {
                r.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Create { name, parent, set } => {
            manager.load(CategoryView::Flat, None).await?;
            manager.open_create();
            if let Some(t) = filter {
                manager.set_field("type", &t.to_string())?;
            }
            manager.set_field("name", &name)?;
            if let Some(parent) = parent {
                manager.set_field("parent_id", &parent)?;
            }
            apply_pairs(&manager, &set)?;
            submit(&manager, global).await
        }

        CategoriesCommand::AddChild { parent, name, set } => {
            manager.load(CategoryView::Flat, None).await?;
            manager.add_child(&util::parse_id(&parent))?;
            manager.set_field("name", &name)?;
            apply_pairs(&manager, &set)?;
            submit(&manager, global).await
        }

        CategoriesCommand::Update { id, set } => {
            manager.load(CategoryView::Flat, None).await?;
            manager.open_edit(&util::parse_id(&id))?;
            apply_pairs(&manager, &set)?;
            submit(&manager, global).await
        }

        CategoriesCommand::Delete { id } => {
            // Tree view so the prompt can count children.
            manager.load(CategoryView::Tree, None).await?;
            let confirm = util::confirmer(global, "categories delete")?;
            if !manager.delete(&util::parse_id(&id), &confirm).await? {
                if !global.quiet {
                    eprintln!("Cancelled");
                }
                return Ok(());
            }
            print_alert(&manager, global);
            Ok(())
        }
    }
}

fn apply_pairs(manager: &CategoryManager, pairs: &[String]) -> Result<(), CliError> {
    for raw in pairs {
        let (key, value) = util::split_pair(raw, "set")?;
        manager.set_field(key, value)?;
    }
    Ok(())
}

async fn submit(manager: &CategoryManager, global: &GlobalOpts) -> Result<(), CliError> {
    let mode = manager.submit().await?;
    tracing::debug!(?mode, "category form submitted");
    print_alert(manager, global);
    Ok(())
}

fn print_alert(manager: &CategoryManager, global: &GlobalOpts) {
    if let Some(alert) = manager.alert() {
        output::print_alert(&alert, global);
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn render_tree(manager: &CategoryManager, global: &GlobalOpts) -> String {
    let tree = manager.tree();
    match global.output {
        OutputFormat::Table => {
            let rows: Vec<CategoryRow> = tree
                .walk()
                .into_iter()
                .map(|(depth, c)| category_row(depth, c))
                .collect();
            output::render_table(&rows)
        }
        OutputFormat::Plain => tree
            .walk()
            .into_iter()
            .map(|(_, c)| c.id.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => {
            let nested = tree.nested();
            output::render_list(
                &global.output,
                &nested,
                |c| category_row(0, c),
                |c| c.id.to_string(),
            )
        }
    }
}

fn render_counts(counts: &BTreeMap<CategoryType, usize>, global: &GlobalOpts) -> String {
    match global.output {
        OutputFormat::Table => {
            let rows: Vec<CountRow> = counts
                .iter()
                .map(|(t, n)| CountRow {
                    category_type: t.to_string(),
                    count: *n,
                })
                .collect();
            output::render_table(&rows)
        }
        OutputFormat::Plain => counts
            .iter()
            .map(|(t, n)| format!("{t}\t{n}"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => {
            let keyed: BTreeMap<String, usize> =
                counts.iter().map(|(t, n)| (t.to_string(), *n)).collect();
            output::render_single(&global.output, &keyed, |_| String::new(), |_| String::new())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn type_flag_accepts_kebab_case() {
        assert_eq!(parse_type(None).unwrap(), None);
        assert_eq!(
            parse_type(Some("bible-study")).unwrap(),
            Some(CategoryType::BibleStudy)
        );
        let err = parse_type(Some("hymn")).unwrap_err();
        assert!(err.to_string().contains("hymn"));
    }

    #[test]
    fn rows_indent_by_depth() {
        let node: Category = serde_json::from_value(json!({
            "id": 4, "name": "Romans", "slug": "romans", "type": "bible-study", "is_active": 0
        }))
        .unwrap();
        let row = category_row(2, &node);
        assert_eq!(row.name, "    Romans");
        assert_eq!(row.category_type, "bible-study");
        assert_eq!(row.active, "no");
    }
}
