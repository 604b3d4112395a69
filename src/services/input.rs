use crate::error::{GenerationError, GenerationResult};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::str::FromStr;

/// Which CSV column to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Header name. An all-digit name that matches no header is read as a zero-based index.
    Name(String),
    /// Zero-based position, regardless of header names
    Index(usize),
}

impl FromStr for ColumnSelector {
    type Err = std::convert::Infallible;

    /// `#N` selects position `N`; anything else is a header name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.strip_prefix('#').map(str::parse::<usize>) {
            Some(Ok(index)) => ColumnSelector::Index(index),
            _ => ColumnSelector::Name(s.to_string()),
        })
    }
}

impl ColumnSelector {
    /// Position of the selected column in `headers`
    fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            ColumnSelector::Name(name) => headers
                .iter()
                .position(|h| h == name)
                .or_else(|| name.parse::<usize>().ok().filter(|i| *i < headers.len())),
            ColumnSelector::Index(index) => (*index < headers.len()).then_some(*index),
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Name(name) => write!(f, "{}", name),
            ColumnSelector::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// Where batch records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    /// One record per non-blank line
    Text(Utf8PathBuf),
    /// One record per non-blank cell of the selected column
    Csv {
        path: Utf8PathBuf,
        column: ColumnSelector,
    },
}

impl BatchSource {
    /// Pick the reader from the file extension: `.csv` (case-insensitive) reads `column`,
    /// defaulting to the first one, anything else is a plain text list.
    pub fn from_path(path: impl Into<Utf8PathBuf>, column: Option<ColumnSelector>) -> Self {
        let path = path.into();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            BatchSource::Csv {
                path,
                column: column.unwrap_or(ColumnSelector::Index(0)),
            }
        } else {
            BatchSource::Text(path)
        }
    }

    pub fn path(&self) -> &Utf8Path {
        match self {
            BatchSource::Text(path) => path,
            BatchSource::Csv { path, .. } => path,
        }
    }
}

/// Read the records a batch will process
pub fn read_records(source: &BatchSource) -> GenerationResult<Vec<String>> {
    let records = match source {
        BatchSource::Text(path) => read_text_records(path)?,
        BatchSource::Csv { path, column } => read_csv_column(path, column)?,
    };
    tracing::info!("Loaded {} records from {}", records.len(), source.path());
    Ok(records)
}

/// Non-blank lines of a text file, trimmed
pub fn read_text_records(path: &Utf8Path) -> GenerationResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| GenerationError::io(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Header row of a CSV file, trimmed and without a leading byte order mark
pub fn read_csv_headers(path: &Utf8Path) -> GenerationResult<Vec<String>> {
    let mut reader = open_csv(path)?;
    header_names(&mut reader, path)
}

fn header_names(
    reader: &mut csv::Reader<std::fs::File>,
    path: &Utf8Path,
) -> GenerationResult<Vec<String>> {
    let headers = reader.headers().map_err(|e| csv_error(path, e))?;
    Ok(headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect())
}

/// Trimmed, non-blank cells of one column, header row excluded
///
/// A [`ColumnSelector::Name`] matches a header exactly before falling back to a
/// position. Rows too short to have the column are skipped like blank cells.
///
/// # Errors
/// [`GenerationError::InvalidInput`] if the column does not exist in the header row.
pub fn read_csv_column(path: &Utf8Path, column: &ColumnSelector) -> GenerationResult<Vec<String>> {
    let mut reader = open_csv(path)?;
    let headers = header_names(&mut reader, path)?;

    let index = column.resolve(&headers).ok_or_else(|| {
        GenerationError::InvalidInput(format!(
            "Column {} not found in {} (available: {})",
            column,
            path,
            headers.join(", ")
        ))
    })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        if let Some(cell) = record.get(index).map(str::trim)
            && !cell.is_empty()
        {
            values.push(cell.to_string());
        }
    }
    Ok(values)
}

fn open_csv(path: &Utf8Path) -> GenerationResult<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|e| GenerationError::io(path, e))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

fn csv_error(path: &Utf8Path, err: csv::Error) -> GenerationError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return GenerationError::io(path, io);
        }
        return GenerationError::InvalidInput(format!("Could not read {}", path));
    }
    GenerationError::InvalidInput(format!("Malformed CSV in {}: {}", path, err))
}
