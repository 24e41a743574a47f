//! CSV candle file adapter.
//!
//! Layout: `timestamp,open,high,low,close,volume` with timestamps formatted
//! `%Y-%m-%d %H:%M:%S`. One file holds one symbol/interval series.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::candle::Candle;
use crate::domain::error::CryptraderError;
use crate::ports::data_port::DataPort;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HEADER: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

pub struct CsvDataAdapter {
    path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn malformed(&self, reason: String) -> CryptraderError {
        CryptraderError::MalformedData {
            source_name: self.path.display().to_string(),
            reason,
        }
    }

    fn column<'a>(
        &self,
        record: &'a csv::StringRecord,
        index: usize,
    ) -> Result<&'a str, CryptraderError> {
        record
            .get(index)
            .ok_or_else(|| self.malformed(format!("missing {} column", HEADER[index])))
    }

    fn numeric(&self, record: &csv::StringRecord, index: usize) -> Result<f64, CryptraderError> {
        self.column(record, index)?
            .parse()
            .map_err(|e| self.malformed(format!("invalid {} value: {}", HEADER[index], e)))
    }
}

impl DataPort for CsvDataAdapter {
    fn fetch_candles(
        &self,
        _symbol: &str,
        _interval: &str,
    ) -> Result<Vec<Candle>, CryptraderError> {
        let content = fs::read_to_string(&self.path)?;

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| self.malformed(format!("csv parse error: {}", e)))?;

            let timestamp =
                NaiveDateTime::parse_from_str(self.column(&record, 0)?, TIMESTAMP_FORMAT)
                    .map_err(|e| self.malformed(format!("invalid timestamp: {}", e)))?;

            candles.push(Candle {
                timestamp,
                open: self.numeric(&record, 1)?,
                high: self.numeric(&record, 2)?,
                low: self.numeric(&record, 3)?,
                close: self.numeric(&record, 4)?,
                volume: self.numeric(&record, 5)?,
            });
        }

        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }
}

/// Write candles in the layout `fetch_candles` reads back.
pub fn write_candles(path: &Path, candles: &[Candle]) -> Result<(), CryptraderError> {
    let mut writer = csv::Writer::from_path(path).map_err(into_io)?;
    writer.write_record(HEADER).map_err(into_io)?;

    for candle in candles {
        writer
            .write_record([
                candle.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                candle.open.to_string(),
                candle.high.to_string(),
                candle.low.to_string(),
                candle.close.to_string(),
                candle.volume.to_string(),
            ])
            .map_err(into_io)?;
    }

    writer.flush()?;
    Ok(())
}

fn into_io(err: csv::Error) -> CryptraderError {
    CryptraderError::Io(std::io::Error::other(err))
}
