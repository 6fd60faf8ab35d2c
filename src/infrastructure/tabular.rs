// Parsers turning delimited text and spreadsheets into tables
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;

use crate::domain::artifact::{Artifact, ArtifactFormat};
use crate::domain::error::RenderError;
use crate::domain::table::{Cell, Table};

/// Parse an artifact by its extension. Blocking; call from a blocking context.
pub fn load_table(artifact: &Artifact) -> Result<Table, RenderError> {
    let name = artifact.file_name();
    match artifact.format {
        ArtifactFormat::DelimitedText => {
            let delimiter = match artifact.extension().as_deref() {
                Some("tsv") => b'\t',
                _ => b',',
            };
            read_delimited(&artifact.path, &name, delimiter)
        }
        ArtifactFormat::Spreadsheet => read_spreadsheet(&artifact.path, &name),
        ArtifactFormat::Image => Err(RenderError::parse_failure(
            name,
            "image artifacts cannot be read as a table",
        )),
    }
}

pub fn read_delimited(path: &Path, name: &str, delimiter: u8) -> Result<Table, RenderError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| RenderError::parse_failure(name, e))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| RenderError::parse_failure(name, format!("failed to read header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
        return Err(RenderError::parse_failure(name, "missing header row"));
    }

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        // Ragged rows surface here as UnequalLengths
        let record = record.map_err(|e| RenderError::parse_failure(name, e))?;
        rows.push(record.iter().map(|v| Cell::Text(v.to_string())).collect());
    }

    tracing::debug!(artifact = name, rows = rows.len(), "parsed delimited text");
    Ok(Table::new(name, columns, rows))
}

pub fn read_spreadsheet(path: &Path, name: &str) -> Result<Table, RenderError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| RenderError::parse_failure(name, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RenderError::parse_failure(name, "workbook has no sheets"))?
        .map_err(|e| RenderError::parse_failure(name, e))?;

    let mut sheet_rows = range.rows();
    let header = sheet_rows
        .next()
        .ok_or_else(|| RenderError::parse_failure(name, "first sheet is empty"))?;

    let columns: Vec<String> = header.iter().map(|c| c.to_string()).collect();
    if columns.iter().all(|c| c.trim().is_empty()) {
        return Err(RenderError::parse_failure(name, "missing header row"));
    }

    let rows: Vec<Vec<Cell>> = sheet_rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    tracing::debug!(artifact = name, rows = rows.len(), "parsed spreadsheet");
    Ok(Table::new(name, columns, rows))
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(data.to_string())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use std::fs;
    use tempfile::TempDir;

    fn artifact(path: &Path) -> Artifact {
        let ext = path.extension().unwrap().to_str().unwrap();
        Artifact {
            logical_name: "fixture".to_string(),
            path: path.to_path_buf(),
            modified: Utc::now(),
            format: ArtifactFormat::from_extension(ext).unwrap(),
        }
    }

    #[test]
    fn test_csv_rows_and_columns_follow_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("earnings_calendar_20240102.csv");
        fs::write(
            &path,
            "Ticker,Report Date,Time\nAAPL,2024-01-25,AMC\nMSFT,2024-01-30,AMC\nJPM,2024-01-12,BMO\n",
        )
        .unwrap();

        let table = load_table(&artifact(&path)).unwrap();

        assert_eq!(table.columns, vec!["Ticker", "Report Date", "Time"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[2][0], Cell::Text("JPM".to_string()));
        assert_eq!(table.source, "earnings_calendar_20240102.csv");
    }

    #[test]
    fn test_csv_keeps_header_tokens_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hourly_8_30am_1.csv");
        fs::write(&path, "Date, Ticker ,Candle Signal\n2024-01-02,AAPL,Bullish Wick\n").unwrap();

        let table = load_table(&artifact(&path)).unwrap();
        assert_eq!(table.columns, vec!["Date", " Ticker ", "Candle Signal"]);
        assert!(matches!(
            table.filter_exact("Ticker", "AAPL"),
            Err(RenderError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_padded_values_do_not_match_in_csv_or_xlsx() {
        let dir = TempDir::new().unwrap();
        let signals = ["Bullish Wick ", " Bullish Wick", "Bullish Wick"];

        let csv_path = dir.path().join("hourly_9_30am_1.csv");
        let mut body = String::from("Ticker,Candle Signal\n");
        for signal in signals {
            body.push_str(&format!("SPY,{signal}\n"));
        }
        fs::write(&csv_path, body).unwrap();

        let xlsx_path = dir.path().join("daily_summary_data_1.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Ticker").unwrap();
        sheet.write_string(0, 1, "Candle Signal").unwrap();
        for (i, signal) in signals.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, "SPY").unwrap();
            sheet.write_string(row, 1, *signal).unwrap();
        }
        workbook.save(&xlsx_path).unwrap();

        for path in [&csv_path, &xlsx_path] {
            let table = load_table(&artifact(path)).unwrap();
            assert_eq!(table.len(), 3);
            let subview = table.filter_exact("Candle Signal", "Bullish Wick").unwrap();
            assert_eq!(subview.count(), 1, "{}", path.display());
            assert_eq!(table.filter_exact("Candle Signal", "Bullish Wick ").unwrap().count(), 1);
        }
    }

    #[test]
    fn test_tsv_uses_tab_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sectors_1.tsv");
        fs::write(&path, "Sector\tCandle Signal\nTech\tBullish Wick\n").unwrap();

        let table = load_table(&artifact(&path)).unwrap();
        assert_eq!(table.columns, vec!["Sector", "Candle Signal"]);
        assert_eq!(table.filter_exact("Candle Signal", "Bullish Wick").unwrap().count(), 1);
    }

    #[test]
    fn test_csv_ragged_row_is_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken_1.csv");
        fs::write(&path, "a,b\n1,2\n3,4,5\n").unwrap();

        assert!(matches!(
            load_table(&artifact(&path)),
            Err(RenderError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_empty_csv_is_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty_1.csv");
        fs::write(&path, "").unwrap();

        let err = load_table(&artifact(&path)).unwrap_err();
        assert!(err.to_string().contains("missing header row"));
    }

    #[test]
    fn test_image_is_not_a_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart_1.png");
        fs::write(&path, b"\x89PNG").unwrap();

        assert!(matches!(
            load_table(&artifact(&path)),
            Err(RenderError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_xlsx_first_sheet_with_typed_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily_summary_data_20240102.xlsx");

        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Date").unwrap();
        sheet.write_string(0, 1, "Ticker").unwrap();
        sheet.write_string(0, 2, "Candle Signal").unwrap();
        sheet.write_string(0, 3, "Close").unwrap();
        let date = ExcelDateTime::from_ymd(2024, 1, 2).unwrap();
        sheet.write_datetime_with_format(1, 0, &date, &date_format).unwrap();
        sheet.write_string(1, 1, "AAPL").unwrap();
        sheet.write_string(1, 2, "Bullish Wick").unwrap();
        sheet.write_number(1, 3, 185.5).unwrap();
        workbook.add_worksheet().write_string(0, 0, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let table = load_table(&artifact(&path)).unwrap();

        assert_eq!(table.columns, vec!["Date", "Ticker", "Candle Signal", "Close"]);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.first_row_date("Date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert_eq!(table.rows[0][3], Cell::Float(185.5));
    }

    #[test]
    fn test_corrupt_xlsx_is_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily_summary_data_1.xlsx");
        fs::write(&path, "not a zip archive").unwrap();

        assert!(matches!(
            load_table(&artifact(&path)),
            Err(RenderError::ParseFailure { .. })
        ));
    }
}
