use std::path::PathBuf;

use tracing::{trace, warn};

use crate::parse::frontmatter_aliases;
use crate::{Error, Result, Vault, VaultPath};

/// Which resolution phase produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    Path,
    Filename,
    Alias,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNote {
    pub path: VaultPath,
    pub abs: PathBuf,
    pub via: ResolvedVia,
}

/// Maps a title to a note: path match (titles containing `/`), then exact
/// filename, then declared aliases. The first phase that matches wins.
#[derive(Debug, Clone, Copy)]
pub struct NoteResolver<'v> {
    vault: &'v Vault,
}

impl<'v> NoteResolver<'v> {
    pub fn new(vault: &'v Vault) -> Self {
        Self { vault }
    }

    pub fn resolve(&self, title: &str) -> Result<ResolvedNote> {
        if title.contains('/') {
            if let Some(path) = self.by_path(title)? {
                return Ok(self.found(path, ResolvedVia::Path));
            }
        } else if let Some(path) = self.by_filename(title)? {
            return Ok(self.found(path, ResolvedVia::Filename));
        }

        if let Some(path) = self.by_alias(title)? {
            return Ok(self.found(path, ResolvedVia::Alias));
        }

        Err(Error::NotFound(title.to_string()))
    }

    /// A vault-relative path (leading `/` allowed), or a trailing path suffix.
    pub fn by_path(&self, title: &str) -> Result<Option<VaultPath>> {
        let wanted = self.with_extension(title.trim_start_matches('/'));
        trace!(%wanted, "resolve by path");

        if let Ok(rel) = VaultPath::try_from(wanted.as_str())
            && self.vault.is_note_rel(rel.as_path())
            && self.vault.to_abs(&rel).is_file()
        {
            return Ok(Some(rel));
        }

        let suffix = format!("/{wanted}");
        Ok(self
            .vault
            .notes()?
            .into_iter()
            .find(|p| p.to_slash().ends_with(&suffix)))
    }

    /// Exact `<title>.md` file name; never reads file contents.
    pub fn by_filename(&self, title: &str) -> Result<Option<VaultPath>> {
        let wanted = self.with_extension(title);
        trace!(%wanted, "resolve by filename");
        Ok(self.vault.notes()?.into_iter().find(|p| {
            p.as_path()
                .file_name()
                .is_some_and(|name| name.to_string_lossy() == wanted)
        }))
    }

    /// Case-insensitive match against each note's declared aliases.
    pub fn by_alias(&self, title: &str) -> Result<Option<VaultPath>> {
        let wanted = title.to_lowercase();
        trace!(%wanted, "resolve by alias");
        for path in self.vault.notes()? {
            let content = self.vault.read_note(&path)?;
            let aliases = match frontmatter_aliases(&content) {
                Ok(aliases) => aliases,
                Err(err) => {
                    warn!(note = %path.as_str_lossy(), %err, "front matter does not parse; no aliases");
                    continue;
                }
            };
            if aliases.iter().any(|a| a.to_lowercase() == wanted) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    fn with_extension(&self, title: &str) -> String {
        let ext = &self.vault.config().note_extension;
        if title.ends_with(&format!(".{ext}")) {
            title.to_string()
        } else {
            format!("{title}.{ext}")
        }
    }

    fn found(&self, path: VaultPath, via: ResolvedVia) -> ResolvedNote {
        ResolvedNote {
            abs: self.vault.to_abs(&path),
            path,
            via,
        }
    }
}

impl Vault {
    pub fn resolve_note(&self, title: &str) -> Result<ResolvedNote> {
        NoteResolver::new(self).resolve(title)
    }
}
