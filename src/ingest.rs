use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::SHIFT_JIS;
use zstd::stream::read::Decoder as ZstdDecoder;

use crate::error::StatsError;
use crate::log;
use crate::types::{GameRecordTable, Row};

type CsvInput = Box<dyn Read>;

const UTF8_BOM: &str = "\u{feff}";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Encoding {
    #[default]
    Utf8,
    ShiftJis,
}

impl Encoding {
    pub fn parse(raw: &str) -> Result<Self, StatsError> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "shift-jis" | "sjis" | "cp932" | "windows-31j" => Ok(Self::ShiftJis),
            _ => Err(StatsError::UnknownEncoding(raw.trim().to_string())),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::ShiftJis => "Shift_JIS",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    Plain,
    Zstd,
}

impl Compression {
    pub fn parse(raw: &str) -> Result<Self, StatsError> {
        let normalized = raw.trim();
        if normalized.eq_ignore_ascii_case("zstd") {
            Ok(Self::Zstd)
        } else {
            Err(StatsError::UnknownCompression(normalized.to_string()))
        }
    }
}

/// Parses an uploaded CSV export. Either the whole table is returned or an
/// error; a malformed record never yields a partial table.
pub fn load_table(bytes: &[u8], encoding: Encoding) -> Result<GameRecordTable, StatsError> {
    let text = decode(bytes, encoding)?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text.as_ref());
    if text.trim().is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(Row::new(record.iter().map(str::to_string).collect()));
    }

    let table = GameRecordTable { columns, rows };
    log::debug(format!(
        "loaded {} rows with columns [{}]",
        table.rows.len(),
        table.columns.join(", ")
    ));
    Ok(table)
}

pub fn read_table_file(
    path: &Path,
    encoding: Encoding,
    compression: Compression,
) -> Result<GameRecordTable, StatsError> {
    load_table(&read_upload(path, compression)?, encoding)
}

/// Raw (decompressed) bytes of an uploaded file.
pub fn read_upload(path: &Path, compression: Compression) -> Result<Vec<u8>, StatsError> {
    let io_error = |source| StatsError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut input = open_input_stream(path, compression).map_err(io_error)?;
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes).map_err(io_error)?;
    Ok(bytes)
}

fn open_input_stream(path: &Path, compression: Compression) -> std::io::Result<CsvInput> {
    let file = File::open(path)?;
    match compression {
        Compression::Plain => Ok(Box::new(file)),
        Compression::Zstd => Ok(Box::new(ZstdDecoder::new(file)?)),
    }
}

fn decode(bytes: &[u8], encoding: Encoding) -> Result<Cow<'_, str>, StatsError> {
    if bytes.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let invalid = || StatsError::InvalidEncoding {
        encoding: encoding.name(),
    };
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|_| invalid()),
        Encoding::ShiftJis => SHIFT_JIS
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(invalid),
    }
}
