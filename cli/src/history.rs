use pufftrack_core::HistoryEntry;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

use crate::locale::{self, Language};

// Helper struct for Table Row
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Smoked / Limit")]
    smoked: String,
    #[tabled(rename = "Over")]
    over: String,
    #[tabled(rename = "Times")]
    times: String,
}

pub fn show_history(entries: &[HistoryEntry], lang: Language) {
    if entries.is_empty() {
        println!("{}", locale::text(lang, "history.empty"));
        return;
    }

    let rows: Vec<HistoryRow> = entries
        .iter()
        .map(|entry| HistoryRow {
            date: locale::format_date(lang, entry.date),
            id: entry.id.clone(),
            smoked: format!("{} / {}", entry.smoked_count, entry.limit),
            over: if entry.over_limit > 0 {
                entry.over_limit.to_string()
            } else {
                "-".to_string()
            },
            times: entry
                .smoke_times
                .iter()
                .map(|e| e.time.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", locale::text(lang, "history.title"));
    println!("{}", table);
}
