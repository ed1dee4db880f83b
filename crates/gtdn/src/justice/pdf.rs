//! Text extraction, table recovery and type detection for
//! document-collection PDFs.
//!
//! Tables are rebuilt from text positions: runs sharing a baseline form a
//! row, and consecutive rows with at least two cells form a table whose
//! columns are the distinct run start offsets. Ruling lines are not read.

use std::collections::BTreeMap;

use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

use super::constants::{DETECTION_WINDOW_CHARS, MAX_PDF_PAGES};

/// Rows of cells; missing cells are empty strings.
pub type Table = Vec<Vec<String>>;

/// Baselines closer than this belong to one row.
const ROW_TOLERANCE: f32 = 2.0;
/// Run starts closer than this belong to one column.
const COLUMN_TOLERANCE: f32 = 3.0;
const MIN_TABLE_ROWS: usize = 2;
const MIN_TABLE_COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    BalanceSheet,
    ProfitLoss,
    Notes,
    Unknown,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance_sheet",
            Self::ProfitLoss => "profit_loss",
            Self::Notes => "notes",
            Self::Unknown => "unknown",
        }
    }
}

/// Text and tables of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPdf {
    pub text: String,
    pub tables: Vec<Table>,
}

/// Parse the first pages once for both text and tables.
pub fn parse(bytes: &[u8]) -> Result<ParsedPdf, lopdf::Error> {
    let document = Document::load_mem(bytes)?;
    let pages = first_pages(&document);
    let text = text_of(&document, &pages);

    let mut tables = Vec::new();
    for (number, page_id) in pages {
        match page_runs(&document, page_id) {
            Ok(runs) => tables.extend(tables_of(rows_of(runs))),
            Err(err) => {
                tracing::debug!(page = number, error = %err, "skipping tables of unreadable PDF page")
            }
        }
    }
    Ok(ParsedPdf { text, tables })
}

/// Text of the first pages, one blank line between pages. Pages that yield
/// no text are skipped.
pub fn extract_text(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let document = Document::load_mem(bytes)?;
    let pages = first_pages(&document);
    Ok(text_of(&document, &pages))
}

pub fn extract_tables(bytes: &[u8]) -> Result<Vec<Table>, lopdf::Error> {
    parse(bytes).map(|parsed| parsed.tables)
}

fn first_pages(document: &Document) -> Vec<(u32, ObjectId)> {
    document
        .get_pages()
        .into_iter()
        .take(MAX_PDF_PAGES)
        .collect()
}

fn text_of(document: &Document, pages: &[(u32, ObjectId)]) -> String {
    let mut texts = Vec::with_capacity(pages.len());
    for (page, _) in pages {
        match document.extract_text(&[*page]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    texts.push(text.to_string());
                }
            }
            Err(err) => tracing::debug!(page, error = %err, "skipping unreadable PDF page"),
        }
    }
    texts.join("\n\n")
}

/// Text set by consecutive show operators, at its line origin.
#[derive(Debug, Clone, PartialEq)]
struct TextRun {
    x: f32,
    y: f32,
    text: String,
}

fn page_runs(document: &Document, page_id: ObjectId) -> Result<Vec<TextRun>, lopdf::Error> {
    let encodings: BTreeMap<Vec<u8>, &str> = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect();
    let content = document.get_and_decode_page_content(page_id)?;

    let mut runs: Vec<TextRun> = Vec::new();
    let mut encoding = None;
    let (mut x, mut y, mut leading) = (0.0_f32, 0.0_f32, 0.0_f32);
    let mut same_run = false;

    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        let number = |index: usize| {
            operands
                .get(index)
                .and_then(|operand| operand.as_float().ok())
                .unwrap_or(0.0)
        };

        match operation.operator.as_str() {
            "BT" => {
                (x, y) = (0.0, 0.0);
                same_run = false;
            }
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "TL" => leading = number(0),
            "Td" | "TD" => {
                if operation.operator == "TD" {
                    leading = -number(1);
                }
                x += number(0);
                y += number(1);
                same_run = false;
            }
            "Tm" => {
                (x, y) = (number(4), number(5));
                same_run = false;
            }
            "T*" => {
                y -= leading;
                same_run = false;
            }
            "Tj" | "TJ" | "'" | "\"" => {
                let shown = match operation.operator.as_str() {
                    "'" => {
                        y -= leading;
                        same_run = false;
                        operands
                    }
                    "\"" => {
                        y -= leading;
                        same_run = false;
                        operands.get(2..).unwrap_or_default()
                    }
                    _ => operands,
                };
                let mut text = String::new();
                collect_shown(&mut text, encoding, shown);
                match runs.last_mut() {
                    Some(last) if same_run => last.text.push_str(&text),
                    _ => runs.push(TextRun { x, y, text }),
                }
                same_run = true;
            }
            _ => {}
        }
    }
    Ok(runs)
}

fn collect_shown(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)),
            Object::Array(items) => collect_shown(text, encoding, items),
            Object::Integer(_) | Object::Real(_) => {
                // Large negative kerning in a TJ array stands for a word gap.
                if operand.as_float().is_ok_and(|shift| shift < -100.0) {
                    text.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Runs grouped by baseline, top of the page first, each row left to right.
fn rows_of(mut runs: Vec<TextRun>) -> Vec<Vec<TextRun>> {
    runs.retain(|run| !run.text.trim().is_empty());
    runs.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Vec<TextRun>> = Vec::new();
    for run in runs {
        match rows.last_mut() {
            Some(row) if row.first().is_some_and(|head| head.y - run.y <= ROW_TOLERANCE) => {
                row.push(run)
            }
            _ => rows.push(vec![run]),
        }
    }
    for row in &mut rows {
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    rows
}

fn tables_of(rows: Vec<Vec<TextRun>>) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut block: Vec<Vec<TextRun>> = Vec::new();
    for row in rows.into_iter().chain(std::iter::once(Vec::new())) {
        if row.len() >= MIN_TABLE_COLUMNS {
            block.push(row);
            continue;
        }
        if block.len() >= MIN_TABLE_ROWS {
            tables.push(grid(&block));
        }
        block.clear();
    }
    tables
}

fn grid(rows: &[Vec<TextRun>]) -> Table {
    let mut starts: Vec<f32> = rows.iter().flatten().map(|run| run.x).collect();
    starts.sort_by(f32::total_cmp);
    let mut columns: Vec<f32> = Vec::new();
    for start in starts {
        if columns
            .last()
            .map_or(true, |anchor| start - anchor > COLUMN_TOLERANCE)
        {
            columns.push(start);
        }
    }

    rows.iter()
        .map(|row| {
            let mut cells = vec![String::new(); columns.len()];
            for run in row {
                let column = columns
                    .iter()
                    .rposition(|anchor| *anchor <= run.x)
                    .unwrap_or(0);
                if let Some(cell) = cells.get_mut(column) {
                    if !cell.is_empty() {
                        cell.push(' ');
                    }
                    cell.push_str(run.text.trim());
                }
            }
            cells
        })
        .collect()
}

/// Guess the statement type from the opening of the text.
pub fn detect_document_type(text: &str) -> DocumentType {
    let head: String = text.chars().take(DETECTION_WINDOW_CHARS).collect();
    let head = head.to_uppercase();
    if head.contains("ROZVAHA") {
        DocumentType::BalanceSheet
    } else if head.contains("VÝKAZ ZISKU") || head.contains("VYKAZ ZISKU") {
        DocumentType::ProfitLoss
    } else if head.contains("PŘÍLOHA") || head.contains("PRILOH") {
        DocumentType::Notes
    } else {
        DocumentType::Unknown
    }
}

/// Single-page PDF per line of `lines`, set in Courier.
#[cfg(test)]
pub(crate) fn sample_pdf(lines: &[&str]) -> Vec<u8> {
    let pages: Vec<Vec<(i64, i64, &str)>> =
        lines.iter().map(|line| vec![(72, 720, *line)]).collect();
    sample_pdf_placed(&pages)
}

/// One page per entry, each text placed at its `(x, y)` in its own text
/// object.
#[cfg(test)]
pub(crate) fn sample_pdf_placed(pages: &[Vec<(i64, i64, &str)>]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for placements in pages {
        let mut operations = Vec::new();
        for (x, y, text) in placements {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![(*x).into(), (*y).into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]);
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("pdf serializes");
    bytes
}
