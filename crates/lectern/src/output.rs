//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Alert banners and pagination footers go to stderr so stdout stays
//! machine-readable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use lectern_core::{Alert, AlertKind, PageMeta};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views don't use
/// the `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Pagination & alerts ──────────────────────────────────────────────

/// "Showing 1-10 of 25 (page 1 of 3)".
pub fn pagination_footer(meta: &PageMeta) -> String {
    if meta.total == 0 {
        return "No results".into();
    }
    format!(
        "Showing {}-{} of {} (page {} of {})",
        meta.from, meta.to, meta.total, meta.current_page, meta.last_page
    )
}

/// Print the footer under a table. Structured formats carry no footer.
pub fn print_footer(meta: &PageMeta, global: &GlobalOpts) {
    if global.quiet || !matches!(global.output, OutputFormat::Table) {
        return;
    }
    let footer = pagination_footer(meta);
    let mut stderr = io::stderr().lock();
    if should_color(&global.color) {
        let _ = writeln!(stderr, "{}", footer.dimmed());
    } else {
        let _ = writeln!(stderr, "{footer}");
    }
}

/// Print an alert banner to stderr. Errors print even in quiet mode.
pub fn print_alert(alert: &Alert, global: &GlobalOpts) {
    if global.quiet && !alert.is_error() {
        return;
    }
    let mut stderr = io::stderr().lock();
    if !should_color(&global.color) {
        let _ = writeln!(stderr, "{alert}");
        return;
    }
    let _ = match alert.kind {
        AlertKind::Success => writeln!(stderr, "{} {}", "✓".green().bold(), alert.message.green()),
        AlertKind::Info => writeln!(stderr, "{} {}", "i".cyan().bold(), alert.message.cyan()),
        AlertKind::Error => writeln!(stderr, "{} {}", "✗".red().bold(), alert.message.red()),
    };
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Name")]
        name: String,
    }

    #[test]
    fn footer_reports_range_and_page() {
        let meta = PageMeta {
            current_page: 2,
            last_page: 3,
            from: 11,
            to: 20,
            total: 25,
        };
        assert_eq!(pagination_footer(&meta), "Showing 11-20 of 25 (page 2 of 3)");
        assert_eq!(pagination_footer(&PageMeta::default()), "No results");
    }

    #[test]
    fn formats_render_the_same_data() {
        let items = [Item { id: 1, name: "Hero" }, Item { id: 2, name: "Events" }];
        let row = |i: &Item| Row {
            name: i.name.to_owned(),
        };
        let id = |i: &Item| i.id.to_string();

        assert_eq!(render_list(&OutputFormat::Plain, &items, row, id), "1\n2");
        assert!(render_list(&OutputFormat::Table, &items, row, id).contains("Events"));
        assert_eq!(
            render_list(&OutputFormat::JsonCompact, &items, row, id),
            r#"[{"id":1,"name":"Hero"},{"id":2,"name":"Events"}]"#
        );
        assert!(render_list(&OutputFormat::Yaml, &items, row, id).contains("name: Hero"));
    }
}
