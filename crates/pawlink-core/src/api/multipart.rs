//! Multipart request bodies for file uploads.
//!
//! Uploads are encoded to raw bytes up front with a random uuid boundary.
//! A replay after a token refresh then resends the identical byte stream,
//! boundary included, instead of re-driving a streaming encoder.

use std::path::Path;

use anyhow::{Context, Result};
use uuid::Uuid;

/// One file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Build a part from in-memory bytes, guessing the MIME type from the
    /// filename extension.
    pub fn new(name: impl Into<String>, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            name: name.into(),
            filename,
            mime,
            bytes,
        }
    }

    /// Read a file from disk into a part named `name`.
    pub fn from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read upload file {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, filename, bytes))
    }
}

/// A multipart/form-data body with a freshly generated uuid boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: Uuid::new_v4().to_string(),
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Append a plain text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a file part.
    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Header value for the request, `multipart/form-data; boundary=<uuid>`.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode all parts into one buffer using RFC 7578 framing with CRLF
    /// line endings.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for (name, value) in &self.fields {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            out.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    escape_header_value(name)
                )
                .as_bytes(),
            );
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }

        for part in &self.files {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            out.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    escape_header_value(&part.name),
                    escape_header_value(&part.filename)
                )
                .as_bytes(),
            );
            out.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.mime).as_bytes());
            out.extend_from_slice(&part.bytes);
            out.extend_from_slice(b"\r\n");
        }

        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

/// Percent-escape the characters that would break out of a quoted
/// Content-Disposition parameter, matching how browsers encode field names.
fn escape_header_value(value: &str) -> String {
    value
        .replace('\r', "%0D")
        .replace('\n', "%0A")
        .replace('"', "%22")
}

// ============================================================================
// Tests
// ============================================================================
