use std::io::Cursor;

use calamine::Reader;
use verdict_core::{DealResult, DocumentFormat, DocumentUpload, RawField, RawFinancialRecord, VerdictError};

/// Turns an uploaded byte stream into a `RawFinancialRecord`.
///
/// Structured formats (CSV, XLSX/XLS) are parsed directly. PDF goes through
/// best-effort text extraction and line heuristics, which is lossy by
/// contract: extraction either recovers real label/value pairs or the load
/// fails with `ParseFailure`. There is no placeholder fallback.
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Pick the format from the file extension
    pub fn detect_format(file_name: &str) -> DealResult<DocumentFormat> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".csv") {
            Ok(DocumentFormat::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(DocumentFormat::Excel)
        } else if lower.ends_with(".pdf") {
            Ok(DocumentFormat::Pdf)
        } else {
            Err(VerdictError::UnsupportedFormat(format!(
                "unrecognized file extension on '{}' (expected .csv, .xls, .xlsx, or .pdf)",
                file_name
            )))
        }
    }

    /// Parse one uploaded document into raw label/value fields
    pub fn load(&self, upload: &DocumentUpload) -> DealResult<RawFinancialRecord> {
        let format = Self::detect_format(&upload.file_name)?;
        let record = match format {
            DocumentFormat::Csv => self.load_csv(&upload.bytes)?,
            DocumentFormat::Excel => self.load_excel(&upload.bytes)?,
            DocumentFormat::Pdf => self.load_pdf(&upload.bytes)?,
        };

        tracing::debug!(
            "parsed {} fields from {} ({})",
            record.len(),
            upload.file_name,
            format.name()
        );
        Ok(record)
    }

    fn load_csv(&self, bytes: &[u8]) -> DealResult<RawFinancialRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in reader.records() {
            let record = result
                .map_err(|e| VerdictError::ParseFailure(format!("CSV parse error: {e}")))?;
            let row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
            if row.iter().any(|c| !c.is_empty()) {
                rows.push(row);
            }
        }

        record_from_rows(rows, DocumentFormat::Csv)
    }

    fn load_excel(&self, bytes: &[u8]) -> DealResult<RawFinancialRecord> {
        let cursor = Cursor::new(bytes.to_vec());
        // Open failure means the bytes are not a recognizable workbook at
        // all; row-level problems downstream are parse failures.
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| VerdictError::UnsupportedFormat(format!("unreadable workbook: {e}")))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| VerdictError::ParseFailure("workbook has no sheets".to_string()))?
            .map_err(|e| VerdictError::ParseFailure(format!("worksheet read failed: {e}")))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(|c| c.to_string().trim().to_string()).collect();
            if cells.iter().any(|c| !c.is_empty()) {
                rows.push(cells);
            }
        }

        record_from_rows(rows, DocumentFormat::Excel)
    }

    fn load_pdf(&self, bytes: &[u8]) -> DealResult<RawFinancialRecord> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| VerdictError::ParseFailure(format!("PDF text extraction failed: {e}")))?;

        if text.trim().is_empty() {
            return Err(VerdictError::ParseFailure(
                "PDF contains no extractable text (may be image-based)".to_string(),
            ));
        }

        let fields = fields_from_text(&text);
        if fields.is_empty() {
            return Err(VerdictError::ParseFailure(
                "no label/value pairs recovered from PDF text".to_string(),
            ));
        }

        Ok(RawFinancialRecord::new(DocumentFormat::Pdf, fields))
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a record from tabular rows, deciding orientation deterministically:
/// a table with at least two rows of exactly two columns whose first column
/// is never numeric is long-format (one label/value pair per row); anything
/// else is wide-format (header row + first data row).
fn record_from_rows(rows: Vec<Vec<String>>, format: DocumentFormat) -> DealResult<RawFinancialRecord> {
    if rows.is_empty() {
        return Err(VerdictError::ParseFailure("document has no rows".to_string()));
    }

    let is_long = rows.len() >= 2
        && rows.iter().all(|row| {
            row.len() == 2
                && !row[0].is_empty()
                && verdict_core::coerce_numeric(&row[0]).is_none()
        });

    let fields = if is_long {
        rows.into_iter()
            .map(|mut row| {
                let value = row.pop().unwrap_or_default();
                let label = row.pop().unwrap_or_default();
                RawField::new(label, value)
            })
            .collect()
    } else {
        if rows.len() < 2 {
            return Err(VerdictError::ParseFailure(
                "wide-format document has a header row but no data row".to_string(),
            ));
        }
        let headers = &rows[0];
        let values = &rows[1];
        headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty())
            .map(|(i, h)| RawField::new(h.clone(), values.get(i).cloned().unwrap_or_default()))
            .collect()
    };

    Ok(RawFinancialRecord::new(format, fields))
}

/// Split extracted PDF text into label/value pairs, line by line.
/// Lines with a `:` split there; otherwise the trailing token is taken as
/// the value when it is numeric. Unparseable lines are dropped.
fn fields_from_text(text: &str) -> Vec<RawField> {
    let mut fields = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((label, value)) = line.split_once(':') {
            let label = label.trim();
            let value = value.trim();
            if !label.is_empty() && !value.is_empty() {
                fields.push(RawField::new(label, value));
            }
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() >= 2 {
            let value = tokens[tokens.len() - 1];
            if verdict_core::coerce_numeric(value).is_some() {
                let label = tokens[..tokens.len() - 1].join(" ");
                fields.push(RawField::new(label, value));
            }
        }
    }

    fields
}
