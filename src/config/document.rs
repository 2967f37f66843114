//! The process's single configuration document.
//!
//! Created at startup by decode-then-merge, mutated in place by bindings
//! and application logic, encoded once at shutdown. There is no autosave
//! and no concurrent writer.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::{self, DecodeOptions, EncodeOptions};
use crate::error::ConfigResult;
use crate::value::Value;

use super::merge;

/// Root document value plus the codec options used to produce it and the
/// path it will be written back to.
#[derive(Debug)]
pub struct ConfigDocument {
    root: Value,
    path: PathBuf,
    encode_opts: EncodeOptions,
}

impl ConfigDocument {
    /// Decode the document at `path`. A missing file degrades to an empty
    /// document; every other decode failure is passed through.
    pub fn load(
        path: PathBuf,
        decode_opts: &DecodeOptions,
        encode_opts: EncodeOptions,
    ) -> ConfigResult<Self> {
        let root = match codec::decode_file(&path, decode_opts) {
            Ok(value) => {
                info!(path = %path.display(), "loaded config file");
                value
            }
            Err(err) if err.is_file_not_found() => {
                debug!(path = %path.display(), "no config file, starting from defaults");
                Value::map()
            }
            Err(err) => return Err(err),
        };
        Ok(ConfigDocument {
            root,
            path,
            encode_opts,
        })
    }

    /// Overlay the loaded document onto `defaults`, replacing the root with
    /// the merged tree.
    pub fn overlay_defaults(&mut self, defaults: &Value) {
        self.root = merge(defaults, &self.root);
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encode the document back to its path. Structurally total; fails only
    /// on I/O.
    pub fn save(&self) -> ConfigResult<()> {
        codec::encode_file(&self.root, &self.path, &self.encode_opts)?;
        info!(path = %self.path.display(), "wrote config file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_document, keys};

    fn strict_opts() -> DecodeOptions {
        DecodeOptions {
            duplicate_key_strict: true,
            preserve_formatting: true,
        }
    }

    #[test]
    fn missing_file_becomes_empty_document() {
        let doc = ConfigDocument::load(
            PathBuf::from("/nonexistent/dir/config.hjson"),
            &strict_opts(),
            EncodeOptions { omit_root_braces: true },
        )
        .unwrap();
        assert!(doc.root().is_map());
        assert!(doc.root().is_empty());
    }

    #[test]
    fn missing_file_then_merge_yields_exact_defaults() {
        let mut doc = ConfigDocument::load(
            PathBuf::from("/nonexistent/dir/config.hjson"),
            &strict_opts(),
            EncodeOptions { omit_root_braces: true },
        )
        .unwrap();
        doc.overlay_defaults(&default_document());
        assert_eq!(doc.root().get(keys::ALPHA).unwrap().try_i64().unwrap(), 2030);
        let text = codec::encode_string(
            doc.root(),
            &EncodeOptions { omit_root_braces: true },
        );
        assert_eq!(text, crate::config::DEFAULT_CONFIG);
    }
}
