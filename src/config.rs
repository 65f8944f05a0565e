use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// File name of the optional per-vault config, relative to the vault root.
pub const CONFIG_FILE_NAME: &str = ".vaultkit.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Directory name treated as trash at any depth; nothing below it is a note.
    pub trash_dir: String,
    /// Skip directories whose name starts with a dot.
    pub skip_hidden: bool,
    /// File extension (without dot) that marks a note.
    pub note_extension: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            trash_dir: "_trash".into(),
            skip_hidden: true,
            note_extension: "md".into(),
        }
    }
}

impl VaultConfig {
    /// Loads `.vaultkit.toml` from the vault root, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| Error::ConfigToml(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg = VaultConfig::from_toml_str("trash_dir = \"Archive\"\n").unwrap();
        assert_eq!(cfg.trash_dir, "Archive");
        assert!(cfg.skip_hidden);
        assert_eq!(cfg.note_extension, "md");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = VaultConfig::from_toml_str("trash = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigToml(_)));
    }
}
