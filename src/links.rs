use std::borrow::Cow;
use std::ops::Range;

use crate::VaultPath;

/// Fragment of a wikilink: `#Heading` or `#^block-id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subpath {
    Heading(String),
    Block(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based byte column.
    pub column: u32,
}

impl LinkLocation {
    pub(crate) fn at(text: &str, offset: usize) -> Self {
        let before = &text[..offset];
        let line = 1 + before.bytes().filter(|b| *b == b'\n').count() as u32;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Self {
            line,
            column: (offset - line_start + 1) as u32,
        }
    }
}

/// One `[[Title#Fragment|Display]]` or `![[...]]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WikiLink {
    /// Verbatim title, case and whitespace preserved.
    pub title: String,
    pub subpath: Option<Subpath>,
    pub display: Option<String>,
    pub embed: bool,
    /// The exact source text of the whole link, `!` included.
    pub raw: String,
    /// Byte range of `raw` in the source text.
    pub span: Range<usize>,
    pub location: LinkLocation,
}

impl WikiLink {
    pub fn heading(&self) -> Option<&str> {
        match &self.subpath {
            Some(Subpath::Heading(h)) => Some(h),
            _ => None,
        }
    }

    pub fn block_id(&self) -> Option<&str> {
        match &self.subpath {
            Some(Subpath::Block(b)) => Some(b),
            _ => None,
        }
    }
}

/// One `[display](path#fragment)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkdownLink {
    pub embed: bool,
    pub display: String,
    /// Path exactly as written, without the fragment.
    pub written_path: String,
    /// Fragment without the leading `#`.
    pub fragment: Option<String>,
    pub raw: String,
    pub span: Range<usize>,
    /// Byte range of `written_path` in the source text.
    pub path_span: Range<usize>,
}

impl MarkdownLink {
    /// True for URLs and paths rooted outside the vault.
    pub fn is_external(&self) -> bool {
        let p = self.written_path.as_str();
        p.starts_with('/')
            || p.starts_with('\\')
            || p.contains("://")
            || p.starts_with("mailto:")
            || p.as_bytes().get(1) == Some(&b':')
    }

    /// Vault-relative canonical target, resolved against the directory of the
    /// note containing the link. `None` for external links and for paths that
    /// climb above the vault root.
    pub fn canonical_target(&self, containing_dir: &str) -> Option<String> {
        if self.written_path.is_empty() || self.is_external() {
            return None;
        }
        let decoded = crate::rewrite::percent_decode(&self.written_path)
            .unwrap_or(Cow::Borrowed(self.written_path.as_str()));
        crate::rewrite::resolve_link_path(containing_dir, &decoded)
    }
}

/// Comparison key for link titles: case-insensitive, `.md` suffix ignored.
pub(crate) fn title_key(title: &str) -> String {
    let lower = title.to_lowercase();
    match lower.strip_suffix(".md") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

/// The names a wikilink can use for one note. Backlinks, orphans, unresolved
/// links and the rename rewriter all decide "does this link point here"
/// through [`LinkTarget::is_named_by`].
///
/// A bare title (`[[Note]]`, `[[note.md]]`) names the note by stem or alias.
/// A title containing `/` names it by vault path: the whole path, or any
/// trailing run of whole path segments, with an optional leading `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    stem: String,
    path: Option<String>,
    aliases: Vec<String>,
}

impl LinkTarget {
    /// A note at `path`, also reachable through `aliases`.
    pub fn note(path: &VaultPath, aliases: &[String]) -> Self {
        Self {
            stem: title_key(&path.stem()),
            path: Some(title_key(&path.without_extension())),
            aliases: aliases.iter().map(|a| title_key(a)).collect(),
        }
    }

    /// A title that may not match any note on disk. A path-form title is
    /// named by that path, any trailing part of it, or its last segment.
    pub fn title(title: &str) -> Self {
        let key = title_key(title.trim_start_matches('/'));
        let stem = key.rsplit('/').next().unwrap_or_default().to_string();
        let path = key.contains('/').then_some(key);
        Self {
            stem,
            path,
            aliases: Vec::new(),
        }
    }

    pub fn is_named_by(&self, link_title: &str) -> bool {
        let key = title_key(link_title);
        if key.contains('/') {
            let key = key.trim_start_matches('/');
            return self
                .path
                .as_deref()
                .is_some_and(|p| p == key || p.ends_with(&format!("/{key}")));
        }
        key == self.stem || self.aliases.contains(&key)
    }

    /// True when `link_title` uses the note's stem or path rather than an alias.
    pub(crate) fn is_named_by_file(&self, link_title: &str) -> bool {
        let key = title_key(link_title);
        if key.contains('/') {
            return self.is_named_by(link_title);
        }
        key == self.stem
    }
}

/// Result of a text rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    /// Number of links replaced.
    pub count: usize,
}

impl Rewritten {
    pub(crate) fn unchanged(text: &str) -> Self {
        Self {
            content: text.to_string(),
            count: 0,
        }
    }

    pub fn changed(&self) -> bool {
        self.count > 0
    }
}
