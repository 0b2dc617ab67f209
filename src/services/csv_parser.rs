use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;

use crate::errors::FeedError;

/// One data row of the buyback feed, looked up by header name.
/// Empty or missing cells come through as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(rename = "DATE", default)]
    pub date: Option<String>,
    #[serde(rename = "ORDER ID", default)]
    pub order_id: Option<String>,
    #[serde(rename = "BATCH ID", default)]
    pub batch_id: Option<String>,
    #[serde(rename = "TYPE", default)]
    pub order_type: Option<String>,
    #[serde(rename = "PRICE", default)]
    pub price: Option<String>,
    #[serde(rename = "QUANTITY FILLED", default)]
    pub quantity_filled: Option<String>,
    #[serde(rename = "USD AMOUNT FILLED", default)]
    pub usd_amount_filled: Option<String>,
}

/// Incremental CSV decoder fed with arbitrary byte chunks.
///
/// Bytes are buffered until a record terminator outside of a quoted field
/// is seen; everything up to the last such terminator is decoded and
/// returned. The first record is taken as the header row.
#[derive(Debug, Default)]
pub struct CsvStreamDecoder {
    buffer: Vec<u8>,
    // bytes of `buffer` already scanned for terminators
    scanned: usize,
    in_quotes: bool,
    headers: Option<StringRecord>,
}

impl CsvStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> Option<&StringRecord> {
        self.headers.as_ref()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<RawRow>, FeedError> {
        self.buffer.extend_from_slice(chunk);

        let Some(boundary) = self.scan_boundary() else {
            return Ok(Vec::new());
        };

        let complete: Vec<u8> = self.buffer.drain(..boundary).collect();
        self.scanned -= boundary;
        self.decode(&complete)
    }

    /// Decodes whatever is left once the feed is exhausted.
    pub fn finish(mut self) -> Result<Vec<RawRow>, FeedError> {
        if self.buffer.is_empty() {
            return Ok(Vec::new());
        }
        let rest = std::mem::take(&mut self.buffer);
        self.decode(&rest)
    }

    fn scan_boundary(&mut self) -> Option<usize> {
        let mut boundary = None;
        for (i, &byte) in self.buffer.iter().enumerate().skip(self.scanned) {
            match byte {
                // an escaped quote ("") toggles twice
                b'"' => self.in_quotes = !self.in_quotes,
                b'\n' if !self.in_quotes => boundary = Some(i + 1),
                _ => {}
            }
        }
        self.scanned = self.buffer.len();
        boundary
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<Vec<RawRow>, FeedError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            match &self.headers {
                None => self.headers = Some(record.clone()),
                Some(headers) => rows.push(record.deserialize::<RawRow>(Some(headers))?),
            }
        }
        Ok(rows)
    }
}

/// Decodes a complete feed body in one go.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<RawRow>, FeedError> {
    let mut decoder = CsvStreamDecoder::new();
    let mut rows = decoder.push(bytes)?;
    rows.extend(decoder.finish()?);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "DATE,ORDER ID,BATCH ID,TYPE,PRICE,QUANTITY FILLED,USD AMOUNT FILLED\n";

    #[test]
    fn test_decode_all_maps_columns_by_name() {
        let body = format!(
            "{}2024-01-01T10:00:00Z,o-1,b-1,Market,1.25,80,100.50\n",
            HEADER
        );
        let rows = decode_all(body.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.date.as_deref(), Some("2024-01-01T10:00:00Z"));
        assert_eq!(row.order_id.as_deref(), Some("o-1"));
        assert_eq!(row.batch_id.as_deref(), Some("b-1"));
        assert_eq!(row.order_type.as_deref(), Some("Market"));
        assert_eq!(row.price.as_deref(), Some("1.25"));
        assert_eq!(row.quantity_filled.as_deref(), Some("80"));
        assert_eq!(row.usd_amount_filled.as_deref(), Some("100.50"));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let body = "USD AMOUNT FILLED,EXTRA,DATE\n7.5,ignored,2024-02-02\n";
        let rows = decode_all(body.as_bytes()).unwrap();

        assert_eq!(rows[0].usd_amount_filled.as_deref(), Some("7.5"));
        assert_eq!(rows[0].date.as_deref(), Some("2024-02-02"));
        assert_eq!(rows[0].order_id, None);
    }

    #[test]
    fn test_short_and_empty_fields_are_absent() {
        let body = format!("{}2024-01-01T10:00:00Z,o-1\n,o-2,b-2,Limit,,,\n", HEADER);
        let rows = decode_all(body.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order_id.as_deref(), Some("o-1"));
        assert_eq!(rows[0].usd_amount_filled, None);
        assert_eq!(rows[1].date, None);
        assert_eq!(rows[1].price, None);
    }

    #[test]
    fn test_rows_split_across_chunks() {
        let mut decoder = CsvStreamDecoder::new();

        assert!(decoder.push(b"DATE,ORDER ID\n2024-01-0").unwrap().is_empty());
        assert!(decoder.headers().is_some());

        let rows = decoder.push(b"1T10:00:00Z,a\n2024-01-02T10:00:00Z,").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date.as_deref(), Some("2024-01-01T10:00:00Z"));

        let rows = decoder.push(b"b").unwrap();
        assert!(rows.is_empty());

        let rows = decoder.finish().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_quoted_newline_is_not_a_boundary() {
        let mut decoder = CsvStreamDecoder::new();
        decoder.push(b"DATE,TYPE\n").unwrap();

        let rows = decoder.push(b"2024-01-01,\"Limit\nsplit").unwrap();
        assert!(rows.is_empty());

        let rows = decoder.push(b"\"\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_type.as_deref(), Some("Limit\nsplit"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let body = format!("{}\n2024-01-01,o-1,,,,,\n\n", HEADER);
        let rows = decode_all(body.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_a_decode_error() {
        let mut body = HEADER.as_bytes().to_vec();
        body.extend_from_slice(b"2024-01-01,\xff\xfe,,,,,\n");

        let err = decode_all(&body).unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }
}
