//! CSV message log.
//!
//! One row per accepted message, `sender,message,time`, appended to a flat
//! file that is never rewritten or rotated. Fields are quoted per RFC 4180
//! when they contain a comma, a double quote or a line break.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

use crate::domain::{ChatMessage, MessageLog, MessageLogError};

/// Header row, written once when the file is created or found empty
pub const CSV_HEADER: [&str; 3] = ["sender", "message", "time"];

/// Append-only CSV file sink
pub struct CsvMessageLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl CsvMessageLog {
    /// Open `path` in append mode, creating it with a header row if needed.
    ///
    /// An existing non-empty file is reused as-is so that a restarted
    /// process keeps appending after the previous rows.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, MessageLogError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        if file.metadata().await?.len() == 0 {
            file.write_all(encode_row(&CSV_HEADER).as_bytes()).await?;
            file.flush().await?;
            tracing::info!("Created message log at {}", path.display());
        } else {
            tracing::info!("Appending to existing message log at {}", path.display());
        }

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MessageLog for CsvMessageLog {
    async fn append(&self, message: &ChatMessage) -> Result<(), MessageLogError> {
        let timestamp = message.timestamp.to_iso8601();
        let row = encode_row(&[
            message.client_id.as_str(),
            message.content.as_str(),
            &timestamp,
        ]);

        let mut file = self.file.lock().await;
        file.write_all(row.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), MessageLogError> {
        let mut file = self.file.lock().await;
        file.flush().await?;
        file.sync_data().await?;
        Ok(())
    }
}

/// Encode one CSV record terminated by CRLF.
pub fn encode_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|field| quote_field(field))
        .collect::<Vec<_>>()
        .join(",");
    row.push_str("\r\n");
    row
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
