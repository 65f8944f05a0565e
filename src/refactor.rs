use tracing::{debug, info};

use crate::rewrite::{
    parent_dir, rewrite_markdown_links, rewrite_moved_note_links, rewrite_note_links,
};
use crate::{Error, LinkTarget, Result, Vault, VaultPath};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub from: VaultPath,
    pub to: VaultPath,
    /// Notes whose content was rewritten and written back.
    pub files_modified: usize,
    pub wikilinks_rewritten: usize,
    pub markdown_links_rewritten: usize,
}

impl Vault {
    /// Moves a note and updates every link that points at it.
    ///
    /// Wikilinks naming the note by stem or path are pointed at the new
    /// location; a move between folders keeps the stem, so bare-title links
    /// stay as they are. Links through an alias keep working untouched.
    ///
    /// Not atomic. Notes are rewritten one at a time; if writing note N
    /// fails, notes already rewritten stay rewritten and the rest stay
    /// untouched. The file itself has already moved by then.
    pub fn move_note(&self, from: &VaultPath, to: &VaultPath) -> Result<MoveReport> {
        let from_abs = self.to_abs(from);
        if !from_abs.is_file() {
            return Err(Error::NotFound(from.to_slash()));
        }
        let to_abs = self.to_abs(to);
        if to_abs.exists() {
            return Err(Error::AlreadyExists(to_abs));
        }
        if let Some(parent) = to_abs.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::rename(&from_abs, &to_abs).map_err(|e| Error::io(&from_abs, e))?;

        let target = LinkTarget::note(from, &[]);
        let old_path = from.to_slash();
        let new_path = to.to_slash();

        let mut report = MoveReport {
            from: from.clone(),
            to: to.clone(),
            files_modified: 0,
            wikilinks_rewritten: 0,
            markdown_links_rewritten: 0,
        };

        for note in self.notes()? {
            let original = self.read_note(&note)?;

            let titled = rewrite_note_links(&original, &target, to);
            let note_path = note.to_slash();
            let pathed = if note == *to {
                rewrite_moved_note_links(&titled.content, &old_path, &new_path)
            } else {
                rewrite_markdown_links(
                    &titled.content,
                    parent_dir(&note_path),
                    &old_path,
                    &new_path,
                )
            };

            if !titled.changed() && !pathed.changed() {
                continue;
            }
            self.write_note(&note, &pathed.content)?;
            debug!(
                note = %note_path,
                wikilinks = titled.count,
                markdown_links = pathed.count,
                "rewrote links"
            );
            report.files_modified += 1;
            report.wikilinks_rewritten += titled.count;
            report.markdown_links_rewritten += pathed.count;
        }

        info!(
            from = %old_path,
            to = %new_path,
            files_modified = report.files_modified,
            "moved note"
        );
        Ok(report)
    }

    /// Renames a note in place, keeping its folder.
    pub fn rename_note(&self, from: &VaultPath, new_title: &str) -> Result<MoveReport> {
        if new_title.is_empty() || new_title.contains(['/', '\\']) {
            return Err(Error::InvalidVaultPath(format!(
                "not a note title: {new_title:?}"
            )));
        }
        let file_name = format!("{new_title}.{}", self.config().note_extension);
        let to = match from.as_path().parent() {
            Some(dir) => dir.join(file_name),
            None => file_name.into(),
        };
        self.move_note(from, &VaultPath::try_from(to.as_path())?)
    }
}
