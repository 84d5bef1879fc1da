//! Homepage widget layout handlers.
//!
//! Mutating commands load the layout, apply one edit and publish the whole
//! sequence unless `--dry-run` is given.

use std::io::IsTerminal;

use dialoguer::{Input, Select};
use tabled::Tabled;

use lectern_core::{
    Backoffice, Confirm, CoreError, DragSession, HomepageCustomizer, SettingValue,
    WidgetDescriptor, WidgetLayout,
};

use crate::cli::{GlobalOpts, OutputFormat, WidgetsArgs, WidgetsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WidgetRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Settings")]
    settings: String,
}

fn widget_row(position: usize, w: &WidgetDescriptor) -> WidgetRow {
    WidgetRow {
        position,
        id: w.id.clone(),
        label: w.display_name().to_owned(),
        enabled: if w.enabled { "yes" } else { "no" }.to_owned(),
        settings: w
            .settings
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn render_layout(layout: &WidgetLayout, global: &GlobalOpts) -> String {
    if matches!(global.output, OutputFormat::Table) {
        let rows: Vec<WidgetRow> = layout
            .widgets()
            .iter()
            .enumerate()
            .map(|(i, w)| widget_row(i, w))
            .collect();
        return output::render_table(&rows);
    }
    output::render_list(
        &global.output,
        layout.widgets(),
        |w| widget_row(0, w),
        |w| w.id.clone(),
    )
}

/// "Hero → Sermons → Events": what the homepage renders, in order.
fn preview(layout: &WidgetLayout) -> String {
    let names: Vec<&str> = layout.rendered().map(WidgetDescriptor::display_name).collect();
    if names.is_empty() {
        "(nothing enabled)".into()
    } else {
        names.join(" → ")
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    office: &Backoffice,
    args: WidgetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let homepage = office.homepage();
    homepage.load().await?;

    match args.command {
        WidgetsCommand::Show => {
            output::print_output(&render_layout(&homepage.layout(), global), global.quiet);
            return Ok(());
        }

        WidgetsCommand::Toggle { index } => {
            let enabled = homepage.toggle(index)?;
            tracing::debug!(index, enabled, "widget toggled");
        }

        WidgetsCommand::Move { from, to } => move_widget(&homepage, from, to)?,

        WidgetsCommand::Set { index, key, value } => set_widget(&homepage, index, &key, &value)?,

        WidgetsCommand::EnableAll => homepage.enable_all(),

        WidgetsCommand::DisableAll => homepage.disable_all(),

        WidgetsCommand::Reset => {
            let confirm = util::confirmer(global, "widgets reset")?;
            if !homepage.reset(&confirm).await? {
                if !global.quiet {
                    eprintln!("Cancelled");
                }
                return Ok(());
            }
        }

        WidgetsCommand::Edit => return edit_session(&homepage, global).await,
    }

    if args.dry_run {
        output::print_output(&render_layout(&homepage.layout(), global), global.quiet);
        if !global.quiet {
            eprintln!("Dry run: layout not published");
        }
        return Ok(());
    }
    publish(&homepage, global).await
}

fn move_widget(homepage: &HomepageCustomizer, from: usize, to: usize) -> Result<(), CliError> {
    let len = homepage.layout().len();
    for index in [from, to] {
        if index >= len {
            return Err(CoreError::InvalidIndex { index, len }.into());
        }
    }
    let mut drag = DragSession::start(from);
    drag.hover(to);
    homepage.apply_drag(drag);
    Ok(())
}

fn set_widget(
    homepage: &HomepageCustomizer,
    index: usize,
    key: &str,
    raw: &str,
) -> Result<(), CliError> {
    let layout = homepage.layout();
    let current = layout.get(index).and_then(|w| w.settings.get(key));
    let value = SettingValue::parse_like(raw, current);
    homepage.update_setting(index, key, value)?;
    Ok(())
}

async fn publish(homepage: &HomepageCustomizer, global: &GlobalOpts) -> Result<(), CliError> {
    let spinner = util::spinner("Publishing homepage layout…", global);
    let result = homepage.publish().await;
    spinner.finish_and_clear();
    result?;
    if let Some(alert) = homepage.snapshot().alert {
        output::print_alert(&alert, global);
    }
    Ok(())
}

// ── Interactive session ─────────────────────────────────────────────

const MENU: &[&str] = &[
    "Toggle a widget",
    "Move a widget",
    "Change a setting",
    "Enable all",
    "Disable all",
    "Reset to defaults",
    "Publish",
    "Quit",
];

fn pick_widget(layout: &WidgetLayout, prompt: &str) -> Result<usize, CliError> {
    let items: Vec<String> = layout
        .widgets()
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let mark = if w.enabled { "●" } else { "○" };
            format!("{i}. {mark} {}", w.display_name())
        })
        .collect();
    Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()
        .map_err(util::prompt_err)
}

async fn edit_session(homepage: &HomepageCustomizer, global: &GlobalOpts) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::bad_argument(
            "widgets edit",
            "an interactive terminal is required",
        ));
    }

    loop {
        let layout = homepage.layout();
        eprintln!("{}", render_layout(&layout, global));
        eprintln!("Renders: {}   [{}]", preview(&layout), homepage.status());
        if let Some(alert) = homepage.snapshot().alert {
            output::print_alert(&alert, global);
            homepage.dismiss_alert();
        }

        let choice = Select::new()
            .with_prompt("Action")
            .items(MENU)
            .default(0)
            .interact()
            .map_err(util::prompt_err)?;

        // Failed edits are reported and the session continues.
        let outcome: Result<(), CliError> = match choice {
            0 if !layout.is_empty() => {
                let index = pick_widget(&layout, "Toggle which widget?")?;
                homepage.toggle(index).map(drop).map_err(CliError::from)
            }
            1 if !layout.is_empty() => {
                let from = pick_widget(&layout, "Move which widget?")?;
                let mut drag = DragSession::start(from);
                let to = pick_widget(&layout, "Drop it at which position?")?;
                drag.hover(to);
                homepage.apply_drag(drag);
                Ok(())
            }
            2 if !layout.is_empty() => {
                let index = pick_widget(&layout, "Configure which widget?")?;
                let key: String = Input::new()
                    .with_prompt("Setting")
                    .interact_text()
                    .map_err(util::prompt_err)?;
                let value: String = Input::new()
                    .with_prompt("Value")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(util::prompt_err)?;
                set_widget(homepage, index, &key, &value)
            }
            3 => {
                homepage.enable_all();
                Ok(())
            }
            4 => {
                homepage.disable_all();
                Ok(())
            }
            5 => {
                let confirm = util::confirmer(global, "widgets reset")?;
                homepage.reset(&confirm).await.map(drop).map_err(CliError::from)
            }
            6 => publish(homepage, global).await,
            7 => {
                if homepage.is_dirty()
                    && !util::confirmer(global, "discard changes")?
                        .confirm("Discard unpublished changes?")
                {
                    continue;
                }
                return Ok(());
            }
            _ => Ok(()),
        };

        if let Err(e) = outcome {
            eprintln!("{}", miette::Report::new(e));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn preview_lists_enabled_in_order() {
        let layout = WidgetLayout::new(vec![
            WidgetDescriptor::new("hero", "Hero", true),
            WidgetDescriptor::new("events", "", false),
            WidgetDescriptor::new("sermons", "Sermons", true),
        ]);
        assert_eq!(preview(&layout), "Hero → Sermons");
        assert_eq!(preview(&WidgetLayout::new(Vec::new())), "(nothing enabled)");
    }

    #[test]
    fn row_shows_settings_inline() {
        let mut w = WidgetDescriptor::new("events", "", true);
        w.settings.insert("limit".into(), SettingValue::Integer(3));
        let row = widget_row(1, &w);
        assert_eq!(row.label, "events");
        assert_eq!(row.settings, "limit=3");
    }
}
