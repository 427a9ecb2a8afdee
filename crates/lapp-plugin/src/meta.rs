//! lapp-meta.json handling
//!
//! Developers write the metadata file by hand and are allowed to leave
//! comments in it. The build output gets a strict, 4-space indented copy.
//!
//! ```text
//! lapp-meta.json (comments) → strip comments → serde_json::Value
//!                           → pretty JSON → build/lapp-meta.json
//! ```

use std::io::Read;
use std::path::Path;

use json_comments::StripComments;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{LappError, Result};

/// File name of the metadata document, both as input and as build output
pub const META_FILE_NAME: &str = "lapp-meta.json";

const INDENT: &[u8] = b"    ";

/// A parsed metadata document
///
/// No schema is enforced; any JSON value is accepted. Object key order is
/// kept as written.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaDocument {
    value: Value,
}

impl MetaDocument {
    /// Wrap an already parsed value
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parse comment-tolerant JSON from any reader
    pub fn from_reader(reader: impl Read) -> serde_json::Result<Self> {
        let value = serde_json::from_reader(StripComments::new(reader))?;
        Ok(Self { value })
    }

    /// Parse comment-tolerant JSON from raw bytes
    pub fn parse(bytes: &[u8]) -> serde_json::Result<Self> {
        Self::from_reader(bytes)
    }

    /// Read and parse the metadata file at `path`
    ///
    /// # Errors
    ///
    /// Returns `MetaRead` when the file cannot be read and `MetaParse` when
    /// it is not valid JSON after comments are stripped
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| LappError::meta_read(path, e))?;
        Self::parse(&bytes).map_err(|e| LappError::meta_parse(path, e))
    }

    /// The parsed JSON value
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Render as strict JSON with 4-space indentation and no trailing newline
    pub fn to_pretty_string(&self) -> String {
        let mut out = Vec::with_capacity(128);
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
        self.value
            .serialize(&mut serializer)
            .expect("Value serialization into memory should never fail");
        String::from_utf8(out).expect("serde_json always emits UTF-8")
    }

    /// Write the formatted document to `<dir>/lapp-meta.json`
    ///
    /// Creates `dir` when missing and overwrites any previous file. Returns
    /// the rendered text so callers can show it without formatting twice.
    ///
    /// # Errors
    ///
    /// Returns `MetaWrite` naming the target file when the directory cannot
    /// be created or the file cannot be written
    pub fn write_into(&self, dir: &Path) -> Result<String> {
        let target = dir.join(META_FILE_NAME);
        let formatted = self.to_pretty_string();

        std::fs::create_dir_all(dir).map_err(|e| LappError::meta_write(&target, e))?;
        std::fs::write(&target, formatted.as_bytes())
            .map_err(|e| LappError::meta_write(&target, e))?;

        tracing::debug!(bytes = formatted.len(), "wrote {}", target.display());
        Ok(formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_with_comments() {
        let source = br#"{
            // line comment
            "foo": 1, /* block comment */
            "bar": ["a", "b"]
        }"#;

        let doc = MetaDocument::parse(source).unwrap();
        assert_eq!(doc.value(), &json!({ "foo": 1, "bar": ["a", "b"] }));
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let source = br#"{ "url": "https://example.com/a//b", "glob": "/* not a comment */" }"#;
        let doc = MetaDocument::parse(source).unwrap();
        assert_eq!(doc.value()["url"], "https://example.com/a//b");
        assert_eq!(doc.value()["glob"], "/* not a comment */");
    }

    #[test]
    fn test_pretty_output_uses_four_spaces() {
        let doc = MetaDocument::parse(br#"{ "foo": 1 /* c */ }"#).unwrap();
        assert_eq!(doc.to_pretty_string(), "{\n    \"foo\": 1\n}");
    }

    #[test]
    fn test_key_order_is_preserved() {
        let source = br#"{"zeta": 1, "alpha": 2, "mid": {"y": 1, "x": 2}}"#;
        let doc = MetaDocument::parse(source).unwrap();
        let out = doc.to_pretty_string();
        let zeta = out.find("zeta").unwrap();
        let alpha = out.find("alpha").unwrap();
        let y = out.find("\"y\"").unwrap();
        let x = out.find("\"x\"").unwrap();
        assert!(zeta < alpha);
        assert!(y < x);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let doc = MetaDocument::parse(
            br#"{
                /* header */
                "name": "demo",
                "pages": [{ "path": "/", "title": "Home" }],
                "nested": { "empty": {}, "list": [] }
            }"#,
        )
        .unwrap();

        let first = doc.to_pretty_string();
        let second = MetaDocument::parse(first.as_bytes()).unwrap().to_pretty_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_object_documents_are_accepted() {
        let list = MetaDocument::parse(b"[1, 2] // trailing").unwrap();
        assert_eq!(list.value(), &json!([1, 2]));

        let text = MetaDocument::parse(b"\"just a string\"").unwrap();
        assert_eq!(text.to_pretty_string(), "\"just a string\"");
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(MetaDocument::parse(b"{ foo: 1 }").is_err());
        assert!(MetaDocument::parse(b"").is_err());
        assert!(MetaDocument::parse(b"/* only a comment */").is_err());
    }
}
