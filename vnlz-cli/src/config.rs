//! User configuration: extra dialect tables loaded from JSON.
//!
//! ```json
//! {
//!   "dialects": [
//!     {
//!       "name": "my-engine",
//!       "frame_size": 4096,
//!       "initial_cursor": 4078,
//!       "initial_fill": { "kind": "zeros" },
//!       "control": { "order": "lsb-first", "cadence": "sentinel", "literal_bit": true },
//!       "token": { "kind": "split-byte", "length_bits": 4 },
//!       "offset": { "kind": "absolute" },
//!       "min_match": 3,
//!       "length_bias": 3
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;
use vnlz_core::error::{LzError, Result};
use vnlz_lzss::{DialectTable, lookup};

/// Parsed configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Custom dialect tables, looked up before the built-in catalog.
    #[serde(default)]
    pub dialects: Vec<DialectTable>,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        tracing::info!(
            path = %path.display(),
            dialects = config.dialects.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_json(text: &str) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(text)?;
        for (i, table) in config.dialects.iter().enumerate() {
            table.validate()?;
            if config.dialects[..i]
                .iter()
                .any(|t| t.name.eq_ignore_ascii_case(&table.name))
            {
                return Err(format!("dialect '{}' defined twice", table.name).into());
            }
        }
        Ok(config)
    }

    /// Find a table by tag, custom tables first.
    pub fn resolve(&self, tag: &str) -> Result<Cow<'_, DialectTable>> {
        let wanted = tag.trim();
        if let Some(table) = self
            .dialects
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(wanted))
        {
            return Ok(Cow::Borrowed(table));
        }
        lookup(wanted)
            .map(|t| Cow::Owned(t.clone()))
            .map_err(|_| LzError::unsupported_dialect(tag))
    }
}
