//! Compiled-in default configuration.
//!
//! Decoded with the same grammar as user files. Every key carries its
//! documentation comment, and the text doubles as the on-disk template:
//! when no config file exists, the merged document is exactly this text and
//! gets written out on exit.

use crate::codec::{self, DecodeOptions};
use crate::value::Value;

/// Default value for each config key not found in the config file read from
/// disk. If no config file was found, this whole document is written to
/// config.hjson on application exit.
pub const DEFAULT_CONFIG: &str = "\
// This file is overwritten on exit by hjson-panel.

// If true, enables the slider for alpha in the UI.
enableAlpha: false
// These numbers can be modified in the UI.
alpha: 2030
beta: 64
gamma: 7
// This string will be shown in the UI.
exampleString: This string can be changed in config.hjson
mainWindowWidth: 500
mainWindowHeight: 389
";

/// Decode the embedded defaults, formatting included.
///
/// # Panics
///
/// Panics if the embedded text does not parse, which would be a defect in
/// this crate rather than a runtime condition.
pub fn default_document() -> Value {
    let opts = DecodeOptions {
        duplicate_key_strict: true,
        preserve_formatting: true,
    };
    codec::decode_str(DEFAULT_CONFIG, &opts).expect("embedded default config must parse")
}
