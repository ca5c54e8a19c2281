//! CSV save and load.
//!
//! The engine's side of the CSV contract: save walks the minimal
//! rectangle covering non-empty cells row-major; load clears the grid and
//! classifies each field. Field quoting and escaping belong to the csv
//! crate.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::command::CsvMode;
use crate::error::Result;
use crate::grid::Grid;
use crate::numfmt::display_value;
use crate::types::CellContent;

/// Write the grid as CSV. In [`CsvMode::Flatten`] every cell emits its
/// display value; in [`CsvMode::Preserve`] formula cells emit their
/// source expression instead.
pub fn save<W: Write>(grid: &Grid, writer: W, mode: CsvMode) -> Result<()> {
    let mut out = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    let Some(rect) = grid.used_rect() else {
        out.flush()?;
        return Ok(());
    };

    for row in rect.start_row..=rect.end_row {
        let record: Vec<String> = (rect.start_col..=rect.end_col)
            .map(|col| field_for(grid, row, col, mode))
            .collect();
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

fn field_for(grid: &Grid, row: usize, col: usize, mode: CsvMode) -> String {
    let Some(cell) = grid.get(row, col) else {
        return String::new();
    };
    match (&cell.content, mode) {
        (CellContent::Formula { source, .. }, CsvMode::Preserve) => source.clone(),
        _ => display_value(cell),
    }
}

/// Save to a file path.
pub fn save_path<P: AsRef<Path>>(grid: &Grid, path: P, mode: CsvMode) -> Result<()> {
    save(grid, File::create(path)?, mode)
}

/// Clear the grid and load CSV into it. Fields with a leading `=` become
/// formulas in [`CsvMode::Preserve`]; numeric fields become numbers;
/// anything else non-empty becomes text.
pub fn load<R: Read>(grid: &mut Grid, reader: R, mode: CsvMode) -> Result<()> {
    let mut input = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    grid.clear_all();

    for (row, record) in input.records().enumerate() {
        let record = record?;
        for (col, field) in record.iter().enumerate() {
            let trimmed = field.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('=') && mode == CsvMode::Preserve {
                grid.set_formula(row, col, trimmed);
            } else if let Ok(value) = trimmed.parse::<f64>() {
                grid.set_number(row, col, value);
            } else {
                grid.set_text(row, col, field);
            }
        }
    }
    Ok(())
}

/// Load from a file path.
pub fn load_path<P: AsRef<Path>>(grid: &mut Grid, path: P, mode: CsvMode) -> Result<()> {
    load(grid, File::open(path)?, mode)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::recalc::recalculate;

    fn save_to_string(grid: &Grid, mode: CsvMode) -> String {
        let mut buf = Vec::new();
        save(grid, &mut buf, mode).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn save_flatten_emits_display_values() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(0, 0, 1.0);
        grid.set_formula(0, 1, "=A1+1");
        recalculate(&mut grid);
        assert_eq!(save_to_string(&grid, CsvMode::Flatten), "1,2\n");
    }

    #[test]
    fn save_preserve_keeps_formula_sources() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(0, 0, 1.0);
        grid.set_formula(0, 1, "=A1+1");
        recalculate(&mut grid);
        assert_eq!(save_to_string(&grid, CsvMode::Preserve), "1,=A1+1\n");
    }

    #[test]
    fn save_quotes_fields_with_commas_and_quotes() {
        let mut grid = Grid::new(10, 10);
        grid.set_text(0, 0, "a,b");
        grid.set_text(0, 1, "say \"hi\"");
        assert_eq!(
            save_to_string(&grid, CsvMode::Flatten),
            "\"a,b\",\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn save_covers_the_minimal_rectangle() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(1, 1, 5.0);
        grid.set_number(2, 2, 6.0);
        assert_eq!(save_to_string(&grid, CsvMode::Flatten), "5,\n,6\n");
    }

    #[test]
    fn load_classifies_fields() {
        let mut grid = Grid::new(10, 10);
        load(
            &mut grid,
            "1.5,hello,=A1*2\n".as_bytes(),
            CsvMode::Preserve,
        )
        .unwrap();
        assert_eq!(grid.get(0, 0).unwrap().content, CellContent::Number(1.5));
        assert_eq!(
            grid.get(0, 1).unwrap().content,
            CellContent::Text("hello".to_string())
        );
        assert!(matches!(
            grid.get(0, 2).unwrap().content,
            CellContent::Formula { .. }
        ));
    }

    #[test]
    fn load_flatten_keeps_formula_text_as_text() {
        let mut grid = Grid::new(10, 10);
        load(&mut grid, "=A1*2\n".as_bytes(), CsvMode::Flatten).unwrap();
        assert_eq!(
            grid.get(0, 0).unwrap().content,
            CellContent::Text("=A1*2".to_string())
        );
    }

    #[test]
    fn load_clears_previous_contents() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(5, 5, 9.0);
        load(&mut grid, "1\n".as_bytes(), CsvMode::Flatten).unwrap();
        assert!(grid.get(5, 5).is_none());
        assert_eq!(grid.get(0, 0).unwrap().content, CellContent::Number(1.0));
    }

    #[test]
    fn roundtrip_preserve_restores_sources() {
        let mut grid = Grid::new(10, 10);
        grid.set_number(0, 0, 2.0);
        grid.set_formula(1, 0, "=A1*3");
        recalculate(&mut grid);
        let text = save_to_string(&grid, CsvMode::Preserve);

        let mut reloaded = Grid::new(10, 10);
        load(&mut reloaded, text.as_bytes(), CsvMode::Preserve).unwrap();
        recalculate(&mut reloaded);
        assert_eq!(
            reloaded.get(1, 0).map(display_value).unwrap(),
            "6".to_string()
        );
    }
}
