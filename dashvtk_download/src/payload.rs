use std::fmt;
use std::io::Write;
use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use log::debug;
use serde::Serialize;

use crate::error::DownloadError;

type WriteFn = Box<dyn FnOnce(&mut dyn Write) -> Result<(), DownloadError> + Send>;

/// Content of a download, or a writer that produces it on demand.
pub enum DownloadSource {
    Bytes(Vec<u8>),
    Text(String),
    Writer(WriteFn),
}

impl fmt::Debug for DownloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadSource::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            DownloadSource::Text(t) => f.debug_tuple("Text").field(&t.len()).finish(),
            DownloadSource::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    /// MIME type handed to the browser.
    pub mime_type: Option<String>,
    /// Writer output is text rather than binary.
    pub text: bool,
}

impl DownloadOptions {
    pub fn with_type(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            ..Self::default()
        }
    }
}

/// The (content-or-writer, filename, options) triple a download callback returns.
#[derive(Debug)]
pub struct Download {
    pub source: DownloadSource,
    pub filename: String,
    pub options: DownloadOptions,
}

/// Data dict the host framework turns into a browser download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadPayload {
    pub content: String,
    pub filename: String,
    pub base64: bool,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
}

impl DownloadPayload {
    /// Content as raw bytes, decoding base64 when needed.
    pub fn decoded(&self) -> Result<Vec<u8>, base64::DecodeError> {
        if self.base64 {
            STANDARD.decode(&self.content)
        } else {
            Ok(self.content.clone().into_bytes())
        }
    }
}

impl Download {
    pub fn new(source: DownloadSource, filename: impl Into<String>, options: DownloadOptions) -> Self {
        Self {
            source,
            filename: filename.into(),
            options,
        }
    }

    /// Runs the writer if there is one and encodes the result.
    pub fn into_payload(self) -> Result<DownloadPayload, DownloadError> {
        if self.filename.trim().is_empty() {
            return Err(DownloadError::EmptyFilename);
        }

        let (content, base64) = match self.source {
            DownloadSource::Bytes(bytes) => (STANDARD.encode(bytes), true),
            DownloadSource::Text(text) => (text, false),
            DownloadSource::Writer(write) => {
                let mut buf = Vec::new();
                write(&mut buf)?;
                if self.options.text {
                    (String::from_utf8(buf).map_err(|_| DownloadError::NotUtf8)?, false)
                } else {
                    (STANDARD.encode(buf), true)
                }
            }
        };
        debug!(
            "download `{}`: {} chars{}",
            self.filename,
            content.len(),
            if base64 { " (base64)" } else { "" }
        );

        Ok(DownloadPayload {
            content,
            filename: self.filename,
            base64,
            mime_type: self.options.mime_type,
        })
    }
}

pub fn send_bytes(bytes: impl Into<Vec<u8>>, filename: impl Into<String>, options: DownloadOptions) -> Download {
    Download::new(DownloadSource::Bytes(bytes.into()), filename, options)
}

pub fn send_string(text: impl Into<String>, filename: impl Into<String>, options: DownloadOptions) -> Download {
    Download::new(DownloadSource::Text(text.into()), filename, options)
}

/// Reads a file; the download keeps only its base name.
pub fn send_file(path: &Path, options: DownloadOptions) -> Result<Download, DownloadError> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or(DownloadError::EmptyFilename)?;
    Ok(send_bytes(bytes, filename, options))
}

pub fn send_writer<F>(write: F, filename: impl Into<String>, options: DownloadOptions) -> Download
where
    F: FnOnce(&mut dyn Write) -> Result<(), DownloadError> + Send + 'static,
{
    Download::new(DownloadSource::Writer(Box::new(write)), filename, options)
}
