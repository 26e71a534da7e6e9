//! Normalization of records into comparable text.
//!
//! A record is converted into a [`Document`] in field declaration order,
//! stripped of noise paths (server-assigned or non-deterministic values),
//! has its embedded JSON payloads re-indented, and is finally rendered as
//! block-style text by [`crate::text::render`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{DiffError, DiffResult};
use crate::{pointer, text, unified, Document};

/// Which paths a [`Normalizer`] strips and which it treats as embedded JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Paths removed before comparison.
    pub noise_paths: Vec<String>,
    /// Paths whose string value is itself a JSON document.
    pub embedded_paths: Vec<String>,
}

impl NormalizeConfig {
    /// Settings for schedule records: identifiers, timestamps, idempotency
    /// tokens and response metadata are noise, and the target input is an
    /// embedded payload.
    pub fn schedule() -> Self {
        Self {
            noise_paths: [
                "/Arn",
                "/CreationDate",
                "/ClientToken",
                "/LastModificationDate",
                "/ResultMetadata",
            ]
            .map(String::from)
            .to_vec(),
            embedded_paths: vec!["/Target/Input".to_string()],
        }
    }

    /// Settings that leave documents untouched apart from rendering.
    pub fn none() -> Self {
        Self {
            noise_paths: Vec::new(),
            embedded_paths: Vec::new(),
        }
    }

    /// Check that every configured path is well formed.
    pub fn validate(&self) -> DiffResult<()> {
        for path in self.noise_paths.iter().chain(&self.embedded_paths) {
            pointer::parse_path(path)?;
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::schedule()
    }
}

/// A record paired with the name it is shown under in a diff header.
#[derive(Clone, Copy, Debug)]
pub struct Labeled<'a, T: ?Sized> {
    pub label: &'a str,
    pub record: &'a T,
}

impl<'a, T: ?Sized> Labeled<'a, T> {
    pub fn new(label: &'a str, record: &'a T) -> Self {
        Self { label, record }
    }
}

/// Convert a record into a document, keeping field declaration order.
pub fn to_document<T: Serialize + ?Sized>(record: &T) -> DiffResult<Document> {
    serde_json::to_value(record).map_err(|e| DiffError::Serialization(e.to_string()))
}

/// Re-indent a JSON document with two spaces, keeping key order and number
/// literals. Surrounding whitespace is dropped.
///
/// The payload is validated first and then re-emitted token by token, so a
/// number such as `1e3` comes out exactly as written. Strings are decoded
/// and re-escaped.
pub fn normalize_json(payload: &str) -> Result<String, serde_json::Error> {
    serde_json::from_str::<serde::de::IgnoredAny>(payload)?;

    let bytes = payload.as_bytes();
    let mut out = String::with_capacity(payload.len() * 2);
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            open @ (b'{' | b'[') => {
                let close = if open == b'{' { b'}' } else { b']' };
                let next = skip_whitespace(bytes, i + 1);
                out.push(char::from(open));
                if bytes.get(next) == Some(&close) {
                    out.push(char::from(close));
                    i = next + 1;
                } else {
                    depth += 1;
                    push_newline(&mut out, depth);
                    i += 1;
                }
            }
            close @ (b'}' | b']') => {
                depth = depth.saturating_sub(1);
                push_newline(&mut out, depth);
                out.push(char::from(close));
                i += 1;
            }
            b',' => {
                out.push(',');
                push_newline(&mut out, depth);
                i += 1;
            }
            b':' => {
                out.push_str(": ");
                i += 1;
            }
            b'"' => {
                let end = string_end(bytes, i);
                let decoded: String = serde_json::from_str(&payload[i..end])?;
                out.push_str(&serde_json::to_string(&decoded)?);
                i = end;
            }
            _ => {
                // number, true, false or null
                let start = i;
                while i < bytes.len()
                    && !matches!(bytes[i], b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r')
                {
                    i += 1;
                }
                out.push_str(&payload[start..i]);
            }
        }
    }
    Ok(out)
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\n' | b'\r')) {
        i += 1;
    }
    i
}

/// Index one past the closing quote of the string starting at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn push_newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Turns records into normalized text and diffs them.
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    /// Create a normalizer, rejecting malformed configured paths.
    pub fn new(config: NormalizeConfig) -> DiffResult<Self> {
        config.validate().map_err(|e| e.context("normalize config"))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Strip noise paths and normalize embedded payloads.
    ///
    /// Absent noise paths are skipped. An embedded payload that is not valid
    /// JSON is kept byte for byte; one that is not a string is a
    /// [`DiffError::TypeMismatch`].
    pub fn normalize_document(&self, mut doc: Document) -> DiffResult<Document> {
        for path in &self.config.noise_paths {
            let (next, removed) = pointer::remove(doc, path)
                .map_err(|e| e.context(format!("remove noise path {path}")))?;
            doc = next;
            if removed {
                trace!(path = %path, "removed noise path");
            }
        }

        for path in &self.config.embedded_paths {
            let payload = pointer::get_as::<Option<String>>(&doc, path)
                .map_err(|e| e.context(format!("read embedded payload {path}")))?;
            let Some(Some(payload)) = payload else {
                continue;
            };
            match normalize_json(&payload) {
                Ok(normalized) => {
                    pointer::set(&mut doc, path, Document::String(normalized))
                        .map_err(|e| e.context(format!("write embedded payload {path}")))?;
                }
                Err(err) => {
                    debug!(
                        path = %path,
                        error = %err,
                        "embedded payload is not JSON, keeping it as is"
                    );
                }
            }
        }

        Ok(doc)
    }

    /// Normalize a record into its canonical text.
    pub fn normalize<T: Serialize + ?Sized>(&self, record: &T) -> DiffResult<String> {
        let doc = to_document(record).map_err(|e| e.context("convert record"))?;
        let doc = self.normalize_document(doc)?;
        Ok(text::render(&doc))
    }

    /// Render the highlighted diff from the current record to the desired
    /// one. `None` for `current` means the resource does not exist yet.
    pub fn diff<C, D>(
        &self,
        current: Option<Labeled<'_, C>>,
        desired: Labeled<'_, D>,
    ) -> DiffResult<String>
    where
        C: Serialize + ?Sized,
        D: Serialize + ?Sized,
    {
        let (from_label, from_text) = match current {
            Some(current) => (
                current.label,
                self.normalize(current.record)
                    .map_err(|e| e.context("normalize current record"))?,
            ),
            None => (unified::NULL_DEVICE, String::new()),
        };
        let to_text = self
            .normalize(desired.record)
            .map_err(|e| e.context("normalize desired record"))?;
        Ok(unified::render(from_label, &from_text, desired.label, &to_text))
    }
}
