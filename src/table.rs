/*!
 * Translation table parsing.
 *
 * Turns a delimited table such as
 *
 * ```text
 * name,en-us,fr
 * Greeting,Hello,Bonjour
 * ```
 *
 * into one `TranslationRecord` per data row. The `name` column names the
 * item; every other column is a locale code whose cells are that
 * language's text. The first locale column is the default variant.
 *
 * Row numbers in errors are zero-based lines of the file, so the header on
 * the first line is row 0.
 */

use csv::{Position, ReaderBuilder, StringRecord};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::TableError;
use crate::locales::LocaleDirectory;

/// Header label of the item name column
pub const NAME_COLUMN: &str = "name";

/// One language's text for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Header label of the column
    pub language_code: String,
    /// Remote id of the locale, `None` when the column matched no locale
    pub remote_locale_id: Option<u64>,
    pub is_default: bool,
    pub content: String,
}

/// One dynamic content item to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    pub name: String,
    /// Remote id of the default variant's locale
    pub default_remote_locale_id: Option<u64>,
    /// Variants in column order, the first being the default
    pub variants: Vec<Variant>,
}

impl TranslationRecord {
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants.iter().find(|v| v.is_default)
    }
}

/// A locale column that matched nothing in the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedColumn {
    /// Zero-based column index
    pub column: usize,
    /// Header label
    pub code: String,
}

/// Result of parsing a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    /// Records in row order
    pub records: Vec<TranslationRecord>,
    /// Locale columns whose variants will carry no locale id
    pub unmapped_columns: Vec<UnmappedColumn>,
}

// Column layout derived from the header row
#[derive(Debug)]
struct Layout {
    name_column: usize,
    locale_columns: Vec<LocaleColumn>,
}

#[derive(Debug)]
struct LocaleColumn {
    index: usize,
    code: String,
    remote_id: Option<u64>,
}

/// Parser binding table columns to the locales of one instance
#[derive(Debug)]
pub struct TranslationTableParser<'a> {
    locales: &'a LocaleDirectory,
    strict_locales: bool,
}

impl<'a> TranslationTableParser<'a> {
    pub fn new(locales: &'a LocaleDirectory) -> Self {
        Self {
            locales,
            strict_locales: false,
        }
    }

    /// Reject tables with locale columns the instance does not have
    pub fn strict_locales(mut self, strict: bool) -> Self {
        self.strict_locales = strict;
        self
    }

    /// Parse the table stored at `path`
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<ParsedTable, TableError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| TableError::Io {
            path: source.clone(),
            source: e,
        })?;
        self.parse_source(file, &source)
    }

    /// Parse a table from any reader
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParsedTable, TableError> {
        self.parse_source(reader, "<input>")
    }

    fn parse_source<R: Read>(&self, mut reader: R, source: &str) -> Result<ParsedTable, TableError> {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .map_err(|e| TableError::Io {
                path: source.to_string(),
                source: e,
            })?;

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(content.as_slice());

        let mut layout: Option<Layout> = None;
        let mut table = ParsedTable::default();

        for (index, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| csv_error(e, &content, index, source))?;

            if let Some(layout) = &layout {
                table.records.push(build_record(layout, &record));
                continue;
            }

            let parsed = self.read_header(&record, row_of(&content, record.position(), index))?;
            table.unmapped_columns = parsed
                .locale_columns
                .iter()
                .filter(|c| c.remote_id.is_none())
                .map(|c| UnmappedColumn {
                    column: c.index,
                    code: c.code.clone(),
                })
                .collect();

            if self.strict_locales {
                if let Some(first) = table.unmapped_columns.first() {
                    return Err(TableError::UnmappedLocale {
                        column: first.column,
                        code: first.code.clone(),
                    });
                }
            }
            layout = Some(parsed);
        }

        if layout.is_none() {
            return Err(TableError::Format {
                row: 0,
                message: "table is empty, expected a header row".to_string(),
            });
        }

        debug!("Parsed {} translation record(s) from {}", table.records.len(), source);
        Ok(table)
    }

    fn read_header(&self, record: &StringRecord, row: usize) -> Result<Layout, TableError> {
        let mut name_column = None;
        let mut locale_columns = Vec::new();

        for (index, raw) in record.iter().enumerate() {
            let label = raw.trim_start_matches('\u{feff}').trim();
            if label == NAME_COLUMN {
                if name_column.is_some() {
                    return Err(header_error(
                        row,
                        format!("'{}' column appears more than once", NAME_COLUMN),
                    ));
                }
                name_column = Some(index);
                continue;
            }

            locale_columns.push(LocaleColumn {
                index,
                code: label.to_string(),
                remote_id: self.locales.lookup(label).map(|l| l.remote_id),
            });
        }

        let name_column = name_column
            .ok_or_else(|| header_error(row, format!("no '{}' column in header", NAME_COLUMN)))?;
        if locale_columns.is_empty() {
            return Err(header_error(row, "header has no locale columns".to_string()));
        }

        Ok(Layout {
            name_column,
            locale_columns,
        })
    }
}

// Column counts are enforced by the csv reader, so every index is in range
fn build_record(layout: &Layout, row: &StringRecord) -> TranslationRecord {
    let variants: Vec<Variant> = layout
        .locale_columns
        .iter()
        .enumerate()
        .map(|(position, column)| Variant {
            language_code: column.code.clone(),
            remote_locale_id: column.remote_id,
            is_default: position == 0,
            content: row.get(column.index).unwrap_or_default().to_string(),
        })
        .collect();

    TranslationRecord {
        name: row.get(layout.name_column).unwrap_or_default().to_string(),
        default_remote_locale_id: variants.first().and_then(|v| v.remote_locale_id),
        variants,
    }
}

fn header_error(row: usize, message: String) -> TableError {
    TableError::Format { row, message }
}

// Zero-based line a row starts on. The csv reader skips blank lines and
// positions a row before them, so they are stepped over here.
fn row_of(content: &[u8], position: Option<&Position>, fallback: usize) -> usize {
    let Some(position) = position else {
        return fallback;
    };
    let start = usize::try_from(position.byte())
        .unwrap_or(content.len())
        .min(content.len());
    let row_start = content[start..]
        .iter()
        .position(|b| !matches!(b, b'\r' | b'\n'))
        .map_or(content.len(), |skipped| start + skipped);

    content[..row_start].iter().filter(|&&b| b == b'\n').count()
}

fn csv_error(error: csv::Error, content: &[u8], index: usize, source: &str) -> TableError {
    let row = row_of(content, error.position(), index);
    if error.is_io_error() {
        if let csv::ErrorKind::Io(io) = error.into_kind() {
            return TableError::Io {
                path: source.to_string(),
                source: io,
            };
        }
        return TableError::Format {
            row,
            message: "unreadable row".to_string(),
        };
    }

    let message = match error.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {} columns, found {}", expected_len, len)
        }
        csv::ErrorKind::Utf8 { .. } => "row is not valid UTF-8".to_string(),
        _ => error.to_string(),
    };
    TableError::Format { row, message }
}
