use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::links::title_key;
use crate::parse::{extract_wikilinks, frontmatter_aliases};
use crate::{LinkTarget, NoteResolver, Result, Vault, VaultPath, WikiLink};

/// A referenced title that matches no note, alias or path in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub title: String,
    /// Notes containing at least one link to `title`, in traversal order.
    pub sources: Vec<VaultPath>,
}

/// One note after mask + parse; the unit every vault-wide report is built from.
#[derive(Debug, Clone)]
pub(crate) struct ScannedNote {
    pub path: VaultPath,
    pub target: LinkTarget,
    pub links: Vec<WikiLink>,
}

impl Vault {
    /// Notes containing at least one wikilink or embed to `title`, outside
    /// masked zones. Each note appears once.
    ///
    /// When `title` names a note on disk (by path or file name), links that
    /// spell out that note's path count too.
    pub fn backlinks(&self, title: &str) -> Result<Vec<VaultPath>> {
        let target = self.title_target(title)?;
        let mut out = Vec::new();
        for path in self.notes()? {
            let content = self.read_note(&path)?;
            let links = extract_wikilinks(&content, self.pipeline());
            if links.iter().any(|l| target.is_named_by(&l.title)) {
                debug!(source = %path.as_str_lossy(), title, "backlink");
                out.push(path);
            }
        }
        Ok(out)
    }

    /// Notes whose title and aliases receive no wikilink from any other note.
    pub fn orphans(&self) -> Result<Vec<VaultPath>> {
        let notes = self.scan_notes()?;
        let mut out = Vec::new();
        for note in &notes {
            let referenced = notes
                .iter()
                .filter(|other| other.path != note.path)
                .flat_map(|other| &other.links)
                .any(|link| note.target.is_named_by(&link.title));
            if !referenced {
                out.push(note.path.clone());
            }
        }
        Ok(out)
    }

    /// Referenced titles that name no note by stem, alias or path.
    pub fn unresolved_links(&self) -> Result<Vec<UnresolvedLink>> {
        let notes = self.scan_notes()?;
        let mut by_title: BTreeMap<String, UnresolvedLink> = BTreeMap::new();
        for source in &notes {
            for link in &source.links {
                if notes.iter().any(|n| n.target.is_named_by(&link.title)) {
                    continue;
                }
                let entry = by_title
                    .entry(title_key(&link.title))
                    .or_insert_with(|| UnresolvedLink {
                        title: link.title.clone(),
                        sources: Vec::new(),
                    });
                if !entry.sources.contains(&source.path) {
                    entry.sources.push(source.path.clone());
                }
            }
        }
        Ok(by_title.into_values().collect())
    }

    pub(crate) fn scan_notes(&self) -> Result<Vec<ScannedNote>> {
        let mut out = Vec::new();
        for path in self.notes()? {
            let content = self.read_note(&path)?;
            let aliases = frontmatter_aliases(&content).unwrap_or_else(|err| {
                warn!(note = %path.as_str_lossy(), %err, "front matter does not parse; no aliases");
                Vec::new()
            });
            let links = extract_wikilinks(&content, self.pipeline());
            out.push(ScannedNote {
                target: LinkTarget::note(&path, &aliases),
                path,
                links,
            });
        }
        Ok(out)
    }

    /// The note `title` names by path or file name, without reading any
    /// note; a bare title when there is none.
    fn title_target(&self, title: &str) -> Result<LinkTarget> {
        let resolver = NoteResolver::new(self);
        let found = if title.contains('/') {
            resolver.by_path(title)?
        } else {
            resolver.by_filename(title)?
        };
        Ok(match found {
            Some(path) => LinkTarget::note(&path, &[]),
            None => LinkTarget::title(title),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_target_uses_the_note_on_disk() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        std::fs::create_dir_all(temp.path().join("notes"))?;
        std::fs::write(temp.path().join("notes/Target.md"), "")?;
        let vault = Vault::open(temp.path())?;

        let target = vault.title_target("Target")?;
        assert!(target.is_named_by("notes/Target"));
        assert!(target.is_named_by("Target.md"));

        let missing = vault.title_target("Ghost")?;
        assert!(missing.is_named_by("ghost"));
        assert!(!missing.is_named_by("notes/Ghost"));
        Ok(())
    }
}
