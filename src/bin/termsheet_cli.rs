//! CLI tool for termsheet - loads a CSV, recalculates, prints the sheet
//!
//! Usage:
//!   termsheet_cli <input.csv>                     # Print display values
//!   termsheet_cli <input.csv> --preserve          # Treat =... fields as formulas
//!   termsheet_cli <input.csv> --json              # Dump cells as JSON
//!   termsheet_cli <input.csv> -o out.csv          # Save back (same mode)

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;

use termsheet::{CsvMode, Sheet};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: termsheet_cli <input.csv> [--preserve] [--json] [-o output.csv]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let preserve = args.iter().any(|a| a == "--preserve");
    let json = args.iter().any(|a| a == "--json");
    let output_path = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1));

    let mode = if preserve {
        CsvMode::Preserve
    } else {
        CsvMode::Flatten
    };

    let mut sheet = Sheet::default();
    if let Err(e) = sheet.load_csv(input_path, mode) {
        eprintln!("Error loading {input_path}: {e}");
        std::process::exit(1);
    }

    if json {
        let cells: Vec<_> = sheet.cells().collect();
        match serde_json::to_string_pretty(&cells) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error serializing JSON: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(path) = output_path {
        if let Err(e) = sheet.save_csv(path, mode) {
            eprintln!("Error saving {path}: {e}");
            std::process::exit(1);
        }
        return;
    }

    // Print the populated rectangle as aligned display strings.
    let Some(rect) = sheet.grid().used_rect() else {
        println!("(empty sheet)");
        return;
    };
    for row in rect.start_row..=rect.end_row {
        let line: Vec<String> = (rect.start_col..=rect.end_col)
            .map(|col| {
                let width = usize::from(sheet.column_width(col));
                let value = sheet.display_value(row, col);
                format!("{value:>width$}")
            })
            .collect();
        println!("{}", line.join(" "));
    }
}
