//! Loading of data files, from local storage or over HTTP
//!
//! This is the asynchronous part of the pipeline: bytes are streamed from the
//! source, decompressed if need be, split into CSV rows and handed over to the
//! [`RowParser`] one row at a time.

use crate::{
    config::Config,
    parse::{ParsedRows, RawRow, RowParser},
    progress::{ProgressReport, Work},
    Result,
};
use anyhow::Context;
use async_compression::tokio::bufread::GzipDecoder;
use bytes::Bytes;
use csv_async::{AsyncReaderBuilder, Trim};
use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use reqwest::Response;
use std::{
    fmt,
    io::{self, ErrorKind},
    path::PathBuf,
    pin::Pin,
};
use tokio::{fs::File, io::AsyncRead};
use tokio_util::io::{ReaderStream, StreamReader};

/// Location of a data file
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DataSource {
    /// File from local storage
    File(PathBuf),

    /// File to be downloaded over http or https
    Url(Box<str>),
}
//
impl DataSource {
    /// Truth that the data file is gzip-compressed, judging by its name
    pub fn is_gzipped(&self) -> bool {
        match self {
            Self::File(path) => path.extension().is_some_and(|ext| ext == "gz"),
            Self::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or_default();
                path.ends_with(".gz")
            }
        }
    }
}
//
impl From<&str> for DataSource {
    fn from(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.into())
        } else {
            Self::File(source.into())
        }
    }
}
//
impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Load and parse the data file designated by the configuration
pub async fn load(
    config: &Config,
    client: reqwest::Client,
    report: &ProgressReport,
) -> Result<ParsedRows> {
    let source = &config.source;

    // Open the byte stream
    let context = || format!("opening {source}");
    let (length, bytes): (Option<u64>, BoxStream<'static, io::Result<Bytes>>) = match source {
        DataSource::File(path) => {
            let file = File::open(path).await.with_context(context)?;
            let length = file.metadata().await.with_context(context)?.len();
            (Some(length), ReaderStream::new(file).boxed())
        }
        DataSource::Url(url) => {
            let response = client
                .get(&**url)
                .send()
                .await
                .and_then(Response::error_for_status)
                .with_context(context)?;
            let length = response.content_length();
            let bytes = response
                .bytes_stream()
                // Translate reqwest errors into I/O errors
                .map_err(|e| io::Error::new(ErrorKind::Other, Box::new(e)));
            (length, bytes.boxed())
        }
    };

    // Track how many input bytes have been read so far
    let progress = report.add(format!("Loading {source}"), Work::from(length));
    let tracker = progress.clone();
    let raw_bytes = StreamReader::new(
        bytes.inspect_ok(move |bytes_block| tracker.make_progress(bytes_block.len() as u64)),
    );

    // Apply gzip decoder to compressed bytes
    let csv_bytes: Pin<Box<dyn AsyncRead + Send>> = if source.is_gzipped() {
        Box::pin(GzipDecoder::new(raw_bytes))
    } else {
        Box::pin(raw_bytes)
    };

    // Apply CSV decoder to uncompressed bytes
    //
    // Rows are collected by hand rather than deserialized so that rows with
    // missing fields become parse errors instead of aborting the load. Fields
    // are read as bytes so that a badly encoded field only affects its row.
    let mut reader = AsyncReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .trim(Trim::Headers)
        .create_reader(csv_bytes);
    let headers = reader
        .byte_headers()
        .await
        .with_context(|| format!("reading column names from {source}"))?
        .iter()
        .map(decode_field)
        .collect::<Vec<Box<str>>>();
    let mut records = reader.into_byte_records();

    // Parse rows as they come
    let mut parser = RowParser::new(config.input);
    while let Some(record) = records.next().await {
        let record = record
            .with_context(|| format!("reading row {} of {source}", parser.rows_seen()))?;
        if std::str::from_utf8(record.as_slice()).is_err() {
            log::warn!(
                "Row {} of {source} is not valid UTF-8, replacing invalid bytes",
                parser.rows_seen()
            );
        }
        let row = (headers.iter())
            .zip(record.iter())
            .map(|(column, value)| (column.clone(), decode_field(value)))
            .collect::<RawRow>();
        parser.add_row(&row);
    }
    progress.finish();
    Ok(parser.finish())
}

/// Decode a CSV field, replacing invalid UTF-8 sequences
fn decode_field(field: &[u8]) -> Box<str> {
    String::from_utf8_lossy(field).into()
}
