// Request payloads: JSON bodies and multipart uploads.
//
// Multipart payloads are kept as plain data until send time so they can be
// inspected, logged and rebuilt; `reqwest::multipart::Form` is single-use.

use std::path::Path;

use bytes::Bytes;
use serde_json::Value;

use crate::error::Error;

/// Field used by the backend to tunnel a verb through a multipart POST.
pub const METHOD_OVERRIDE_FIELD: &str = "_method";

/// Body of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// JSON body, sent with `Content-Type: application/json`.
    Json(Value),
    /// Multipart body; the transport sets the content type and boundary.
    Multipart(MultipartPayload),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<MultipartPayload> for RequestBody {
    fn from(payload: MultipartPayload) -> Self {
        Self::Multipart(payload)
    }
}

/// A binary file attached to a multipart payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl FilePart {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, inferring its content type from the extension.
    pub fn from_path(field: impl Into<String>, path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path)
            .map_err(|e| Error::Upload(format!("failed to read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_owned();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Ok(Self::new(field, file_name, content_type_for(&ext), data))
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "epub" => "application/epub+zip",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Text fields plus file parts for a `multipart/form-data` request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a JSON object into text fields.
    ///
    /// Booleans become `1`/`0`, nulls are skipped, arrays become repeated
    /// `name[]` fields and nested objects are sent as JSON text.
    pub fn from_json(value: &Value) -> Self {
        let mut payload = Self::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                match value {
                    Value::Array(items) => {
                        let name = format!("{key}[]");
                        for item in items {
                            if let Some(text) = scalar_text(item) {
                                payload.fields.push((name.clone(), text));
                            }
                        }
                    }
                    other => {
                        if let Some(text) = scalar_text(other) {
                            payload.fields.push((key.clone(), text));
                        }
                    }
                }
            }
        }
        payload
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    /// Append `_method={method}` so the server routes a POST as `method`.
    pub fn with_method_override(self, method: &str) -> Self {
        self.text(METHOD_OVERRIDE_FIELD, method)
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    /// First value of a text field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_form(self) -> Result<reqwest::multipart::Form, Error> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for part in self.files {
            let body = reqwest::multipart::Part::bytes(part.data.to_vec())
                .file_name(part.file_name)
                .mime_str(&part.content_type)
                .map_err(|e| Error::Upload(format!("invalid content type: {e}")))?;
            form = form.part(part.field, body);
        }
        Ok(form)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(if *b { "1".into() } else { "0".into() }),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_json_flattens_scalars() {
        let payload = MultipartPayload::from_json(&json!({
            "title": "Mere Christianity",
            "is_featured": true,
            "is_active": false,
            "pages": 227,
            "subtitle": null,
            "tags": ["apologetics", "classic"],
        }));

        assert_eq!(payload.field("title"), Some("Mere Christianity"));
        assert_eq!(payload.field("is_featured"), Some("1"));
        assert_eq!(payload.field("is_active"), Some("0"));
        assert_eq!(payload.field("pages"), Some("227"));
        assert_eq!(payload.field("subtitle"), None);
        let tags: Vec<_> = payload
            .fields()
            .iter()
            .filter(|(k, _)| k == "tags[]")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(tags, ["apologetics", "classic"]);
    }

    #[test]
    fn method_override_is_a_plain_field() {
        let payload = MultipartPayload::new()
            .text("title", "x")
            .with_method_override("PUT");
        assert_eq!(payload.field(METHOD_OVERRIDE_FIELD), Some("PUT"));
    }

    #[test]
    fn content_type_falls_back_to_octet_stream() {
        assert_eq!(content_type_for("pdf"), "application/pdf");
        assert_eq!(content_type_for("xyz"), "application/octet-stream");
    }
}
