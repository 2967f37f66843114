//! Document codec: Hjson-style reader and writer.
//!
//! The grammar is a compact Hjson subset: `#`/`//`/`/* */` comments,
//! optional root braces, `key: value` members separated by newlines,
//! quoteless strings running to end of line, and `[...]` arrays. With
//! formatting preservation enabled the reader captures the verbatim
//! whitespace and comment text around every node, and the writer replays it,
//! so an unmodified decode/encode round trip reproduces the source bytes
//! (modulo root-brace omission).

mod decode;
mod encode;

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::value::Value;

/// Options controlling how a document is read.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Fail with [`ConfigError::DuplicateKey`] on the first repeated key
    /// within one map level. When false, the later occurrence silently
    /// overwrites the earlier value.
    pub duplicate_key_strict: bool,
    /// Capture comment and blank-line text per node for later round trip.
    /// When false the tree is smaller but re-encoding is lossy.
    pub preserve_formatting: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            duplicate_key_strict: false,
            preserve_formatting: true,
        }
    }
}

/// Options controlling how a document is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Leave out the `{` `}` around the root map. Stylistic only.
    pub omit_root_braces: bool,
}

/// Decode a document from text.
pub fn decode_str(src: &str, opts: &DecodeOptions) -> ConfigResult<Value> {
    decode::Reader::new(src, opts).document()
}

/// Decode a document from a file.
///
/// A missing file is reported as [`ConfigError::FileNotFound`], which
/// callers treat as "no user overrides" rather than as a failure.
pub fn decode_file(path: &Path, opts: &DecodeOptions) -> ConfigResult<Value> {
    let src = fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io(err)
        }
    })?;
    decode_str(&src, opts)
}

/// Encode a document to text. Total for any well-formed [`Value`].
pub fn encode_string(value: &Value, opts: &EncodeOptions) -> String {
    encode::Writer::new(opts).document(value)
}

/// Encode a document and write it to `path`. Fails only on I/O.
pub fn encode_file(value: &Value, path: &Path, opts: &EncodeOptions) -> ConfigResult<()> {
    let text = encode_string(value, opts);
    fs::write(path, text)?;
    Ok(())
}
