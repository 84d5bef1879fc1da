//! Generic handlers for the paginated admin collections.
//!
//! Every collection command (`announcements`, `sermons`, ...) routes through
//! [`handle`], parameterized by the core `Resource` type.

use serde_json::Value;
use tabled::Tabled;

use lectern_core::{
    Alert, Announcement, Backoffice, Book, Donation, Event, Menu, Post, PrayerRequest, Resource,
    ResourceStore, Role, Sermon, User,
};

use crate::cli::{FormArgs, GlobalOpts, ListArgs, MenusCommand, ResourceCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Info")]
    info: String,
}

/// Per-collection summary columns for list tables.
pub trait Columns: Resource {
    fn status(&self) -> String;
    fn info(&self) -> String;
}

fn active(flag: bool) -> String {
    let label = if flag { "active" } else { "inactive" };
    label.to_owned()
}

fn featured(is_active: bool, is_featured: bool) -> String {
    let base = active(is_active);
    if is_featured {
        format!("{base}, featured")
    } else {
        base
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_owned()
}

impl Columns for Announcement {
    fn status(&self) -> String {
        active(self.is_active)
    }
    fn info(&self) -> String {
        format!("{} (priority {})", self.kind, self.priority)
    }
}

impl Columns for Post {
    fn status(&self) -> String {
        if self.is_featured {
            format!("{}, featured", self.status)
        } else {
            self.status.clone()
        }
    }
    fn info(&self) -> String {
        or_dash(self.published_at.as_deref())
    }
}

impl Columns for Sermon {
    fn status(&self) -> String {
        featured(self.is_active, self.is_featured)
    }
    fn info(&self) -> String {
        match self.sermon_date.as_deref() {
            Some(date) => format!("{} · {date}", self.speaker),
            None => self.speaker.clone(),
        }
    }
}

impl Columns for Book {
    fn status(&self) -> String {
        featured(self.is_active, self.is_featured)
    }
    fn info(&self) -> String {
        self.author.clone()
    }
}

impl Columns for Event {
    fn status(&self) -> String {
        featured(self.is_active, self.is_featured)
    }
    fn info(&self) -> String {
        let date = or_dash(self.start_date.as_deref());
        if self.location.is_empty() {
            date
        } else {
            format!("{date} @ {}", self.location)
        }
    }
}

impl Columns for PrayerRequest {
    fn status(&self) -> String {
        self.status.clone()
    }
    fn info(&self) -> String {
        or_dash(self.created_at.as_deref())
    }
}

impl Columns for Donation {
    fn status(&self) -> String {
        self.status.clone()
    }
    fn info(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency)
    }
}

impl Columns for User {
    fn status(&self) -> String {
        active(self.is_active)
    }
    fn info(&self) -> String {
        format!("{} ({})", self.email, self.role)
    }
}

impl Columns for Role {
    fn status(&self) -> String {
        "-".into()
    }
    fn info(&self) -> String {
        format!("{} permissions", self.permissions.len())
    }
}

impl Columns for Menu {
    fn status(&self) -> String {
        active(self.is_active)
    }
    fn info(&self) -> String {
        format!("{} · {} items", self.location, self.items.len())
    }
}

fn row<R: Columns>(r: &R) -> ResourceRow {
    ResourceRow {
        id: r.id().to_string(),
        title: r.title(),
        status: r.status(),
        info: r.info(),
    }
}

/// `key: value` lines for a single record.
fn detail<R: Resource>(r: &R) -> String {
    let Ok(Value::Object(map)) = serde_json::to_value(r) else {
        return r.title();
    };
    let width = map.keys().map(String::len).max().unwrap_or(0) + 1;
    map.iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => "-".into(),
                other => other.to_string(),
            };
            format!("{:<width$} {text}", format!("{key}:"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle<R: Columns>(
    office: &Backoffice,
    command: ResourceCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        ResourceCommand::List(args) => list::<R>(office, &args, global).await,

        ResourceCommand::Show { id } => {
            let record = office.store::<R>().fetch(&util::parse_id(&id)).await?;
            let out = output::render_single(&global.output, &record, detail::<R>, |r| {
                r.id().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Create(form) => {
            let store = office.store::<R>();
            store.open_create();
            submit_with(&store, &form, global).await
        }

        ResourceCommand::Update { id, form } => {
            let store = office.store::<R>();
            let record = store.fetch(&util::parse_id(&id)).await?;
            store.open_edit(&record);
            submit_with(&store, &form, global).await
        }

        ResourceCommand::Delete { id } => {
            let store = office.store::<R>();
            let record = store.fetch(&util::parse_id(&id)).await?;
            let confirm = util::confirmer(global, &format!("{} delete", R::COLLECTION))?;
            if !store.remove(&record, &confirm).await? {
                if !global.quiet {
                    eprintln!("Cancelled");
                }
                return Ok(());
            }
            print_store_alert(&store, global);
            Ok(())
        }

        ResourceCommand::Action { id, action, set } => {
            if !R::ACTIONS.contains(&action.as_str()) {
                return Err(CliError::UnsupportedAction {
                    resource_type: R::LABEL.into(),
                    action,
                    supported: if R::ACTIONS.is_empty() {
                        "(none)".into()
                    } else {
                        R::ACTIONS.join(", ")
                    },
                });
            }
            let store = office.store::<R>();
            let record = store.fetch(&util::parse_id(&id)).await?;
            store
                .action(&record, &action, util::pairs_to_json(&set)?)
                .await?;
            print_store_alert(&store, global);
            Ok(())
        }
    }
}

async fn list<R: Columns>(
    office: &Backoffice,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut store = office.store::<R>();
    for raw in &args.filter {
        let (key, value) = util::split_pair(raw, "filter")?;
        store = store.with_filter(key, value);
    }
    store.list(args.page).await?;

    let state = store.snapshot();
    let out = output::render_list(&global.output, &state.items, row::<R>, |r| {
        r.id().to_string()
    });
    output::print_output(&out, global.quiet);
    output::print_footer(&state.meta, global);
    Ok(())
}

/// Patch the open form from the command line and submit it.
async fn submit_with<R: Resource>(
    store: &ResourceStore<R>,
    form: &FormArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut patched = Ok(());
    store.edit_form(|f| patched = util::apply_form_args(f, form));
    patched?;

    let outcome = store.submit().await?;
    output::print_alert(&Alert::success(outcome.message), global);
    if !outcome.refreshed {
        if let Some(alert) = store.alert() {
            output::print_alert(&alert, global);
        }
    }
    Ok(())
}

fn print_store_alert<R: Resource>(store: &ResourceStore<R>, global: &GlobalOpts) {
    if let Some(alert) = store.alert() {
        output::print_alert(&alert, global);
    }
}

// ── Menus ───────────────────────────────────────────────────────────

pub async fn handle_menus(
    office: &Backoffice,
    command: MenusCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        MenusCommand::Common(cmd) => handle::<Menu>(office, cmd, global).await,

        MenusCommand::MoveItem {
            id,
            from,
            to,
            parent,
        } => {
            let store = office.menus();
            let menu = store.fetch(&util::parse_id(&id)).await?;
            store.open_edit(&menu);

            let mut moved = false;
            store.edit_form(|f| {
                moved = match parent {
                    Some(p) => f.move_child(p, from, to),
                    None => f.move_item(from, to),
                };
            });
            if !moved {
                return Err(CliError::bad_argument(
                    "position",
                    format!("cannot move item {from} to {to} in menu '{}'", menu.name),
                ));
            }

            let outcome = store.submit().await?;
            output::print_alert(&Alert::success(outcome.message), global);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rows_summarize_each_collection() {
        let sermon: Sermon = serde_json::from_value(json!({
            "id": 3, "title": "Grace", "speaker": "Rev. Lee",
            "sermon_date": "2026-03-01", "is_featured": 1, "is_active": true
        }))
        .unwrap();
        let r = row(&sermon);
        assert_eq!(r.id, "3");
        assert_eq!(r.status, "active, featured");
        assert_eq!(r.info, "Rev. Lee · 2026-03-01");

        let gift: Donation = serde_json::from_value(json!({
            "id": 1, "donor_name": "Ann", "amount": "25.5", "currency": "USD", "status": "completed"
        }))
        .unwrap();
        assert_eq!(row(&gift).info, "25.50 USD");
    }

    #[test]
    fn detail_lists_fields() {
        let role: Role = serde_json::from_value(json!({
            "id": 2, "name": "Editor", "permissions": ["posts.edit"]
        }))
        .unwrap();
        let text = detail(&role);
        assert!(text.contains("name:"));
        assert!(text.contains("Editor"));
        assert!(text.contains("posts.edit"));
    }
}
