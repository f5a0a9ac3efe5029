//! Terminal and JSON rendering of a reconciliation result.

use chainfiles_core::FileEntry;
use chainfiles_engine::{Reconciliation, TombstoneOutcome};
use serde_json::json;

pub fn print_result(result: &Reconciliation, json_output: bool) {
    if let TombstoneOutcome::Skipped { reason } = &result.tombstones {
        eprintln!("warning: deletion check skipped ({reason}); listing may contain deleted files");
    }

    if json_output {
        println!("{}", to_json(&result.entries));
    } else {
        print_table(&result.entries);
    }
}

fn to_json(entries: &[FileEntry]) -> String {
    let rows: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "identifier": entry.identifier,
                "contractAddress": entry.contract_address,
                "owner": entry.owner,
                "accessGranted": entry.access_granted,
                "name": entry.metadata.name,
                "cid": entry.metadata.storage_locator,
                "metadata": entry.metadata.raw.value().ok(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows).expect("json rows always serialize")
}

fn print_table(entries: &[FileEntry]) {
    if entries.is_empty() {
        println!("No files visible.");
        return;
    }

    const HEADERS: [&str; 5] = ["IDENTIFIER", "NAME", "CID", "GRANTED", "OWNER"];
    let rows: Vec<[String; 5]> = entries.iter().map(table_row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    print_cells(&HEADERS.map(String::from), &widths);
    for row in &rows {
        print_cells(row, &widths);
    }
    println!("{} file(s)", rows.len());
}

fn table_row(entry: &FileEntry) -> [String; 5] {
    [
        entry.identifier.clone(),
        entry.metadata.name.clone().unwrap_or_else(|| "-".into()),
        entry
            .metadata
            .storage_locator
            .clone()
            .unwrap_or_else(|| "-".into()),
        if entry.access_granted { "yes" } else { "no" }.to_string(),
        entry.owner.clone(),
    ]
}

fn print_cells(row: &[String; 5], widths: &[usize; 5]) {
    let line = row
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", line.trim_end());
}
