pub mod acquire;
pub mod catalog;
pub mod status;

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::config::Config;

/// Exit code after SIGINT/SIGTERM stopped a run early
pub const EXIT_INTERRUPTED: u8 = 130;

/// Table with the shared look and cyan headers
pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

/// Print a key-value summary table on stderr
pub fn print_summary(title: &str, rows: &[(&str, String)]) {
    let mut table = table(&[title, "Value"]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{table}");
}

pub fn print_config(config: &Config) {
    let source = config
        .source
        .as_ref()
        .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
    let search_paths = config
        .acquire
        .search_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    print_summary(
        "Setting",
        &[
            ("Config source", source),
            ("Catalog root", config.catalog.root.display().to_string()),
            ("Venue list", config.catalog.venue_list.display().to_string()),
            (
                "Years",
                format!("{}-{}", config.catalog.min_year, config.catalog.max_year),
            ),
            ("Endpoint", config.catalog.endpoint.clone()),
            ("Page size", config.catalog.page_size.to_string()),
            ("Archive raw JSON", config.catalog.archive_raw.to_string()),
            ("Retrieval tool", config.acquire.tool.clone()),
            ("Tool arguments", config.acquire.args.join(" ")),
            ("Search paths", search_paths),
            ("No-result marker", format!("{:?}", config.acquire.no_result_marker)),
            (
                "Request-failed marker",
                format!("{:?}", config.acquire.request_failed_marker),
            ),
            ("Priority", config.acquire.priority.join(", ")),
            (
                "Timeouts",
                format!(
                    "connect {}s, request {}s",
                    config.http.connect_timeout, config.http.request_timeout
                ),
            ),
            ("Max retries", config.http.max_retries.to_string()),
        ],
    );
}
