//! Link rewriting for renames and moves.
//!
//! Wikilinks and markdown links are rewritten independently: wikilinks name
//! a note by title (or by path), markdown links by relative path. A
//! folder-only move leaves bare-title wikilinks alone and only needs new
//! paths.

use std::borrow::Cow;

use crate::parse::{parse_markdown_links, parse_wikilinks};
use crate::{LinkTarget, MarkdownLink, Rewritten, VaultPath};

/// Replaces the title of every wikilink/embed whose title equals `old_title`
/// (case-insensitively, `.md` suffix ignored) with `new_title`. Embed marker,
/// fragment and display text are kept byte-for-byte. Works on the raw text,
/// so links inside code or comments are rewritten too.
pub fn rewrite_title_links(text: &str, old_title: &str, new_title: &str) -> Rewritten {
    if old_title == new_title || old_title.is_empty() {
        return Rewritten::unchanged(text);
    }
    let target = LinkTarget::title(old_title);
    rewrite_wikilink_titles(text, |title| {
        target
            .is_named_by(title)
            .then(|| keep_md_suffix(title, new_title.to_string()))
    })
}

/// Points every wikilink/embed that names `target` by stem or path at the
/// note now stored at `to`. Path-form links get the new full path, bare
/// titles the new stem; links that already name `to` and links through an
/// alias are left alone.
pub fn rewrite_note_links(text: &str, target: &LinkTarget, to: &VaultPath) -> Rewritten {
    let moved = LinkTarget::note(to, &[]);
    rewrite_wikilink_titles(text, |title| {
        if !target.is_named_by_file(title) || moved.is_named_by_file(title) {
            return None;
        }
        let renamed = if title.contains('/') {
            let lead = if title.starts_with('/') { "/" } else { "" };
            format!("{lead}{}", to.without_extension())
        } else {
            to.stem()
        };
        Some(keep_md_suffix(title, renamed))
    })
}

fn rewrite_wikilink_titles(
    text: &str,
    mut new_title_for: impl FnMut(&str) -> Option<String>,
) -> Rewritten {
    let mut content = String::with_capacity(text.len());
    let mut count = 0usize;
    let mut last = 0usize;
    for link in parse_wikilinks(text) {
        let Some(replacement) = new_title_for(&link.title) else {
            continue;
        };
        if replacement == link.title {
            continue;
        }
        // The title sits right after `[[` (or `![[`).
        let start = link.span.start + usize::from(link.embed) + 2;
        content.push_str(&text[last..start]);
        content.push_str(&replacement);
        last = start + link.title.len();
        count += 1;
    }
    content.push_str(&text[last..]);
    Rewritten { content, count }
}

/// `[[Note.md]]` stays written with its extension after a rename.
fn keep_md_suffix(old: &str, mut new: String) -> String {
    if let Some(suffix) = old.get(old.len().saturating_sub(3)..)
        && suffix.eq_ignore_ascii_case(".md")
        && !new.to_lowercase().ends_with(".md")
    {
        new.push_str(suffix);
    }
    new
}

/// Rewrites markdown links in a note living in `containing_dir` that point
/// at `old_path`, so they point at `new_path` instead. All paths are
/// vault-relative and `/`-separated; `containing_dir` is `""` at the root.
pub fn rewrite_markdown_links(
    text: &str,
    containing_dir: &str,
    old_path: &str,
    new_path: &str,
) -> Rewritten {
    rewrite_link_paths(text, |link| {
        let target = link.canonical_target(containing_dir)?;
        if target != old_path {
            return None;
        }
        Some(relative_link_path(containing_dir, new_path))
    })
}

/// Rewrites the outgoing markdown links of a note that moved from `old_path`
/// to `new_path`, so every link keeps pointing at the same target from the
/// new directory. Links back to the note itself follow it.
pub fn rewrite_moved_note_links(text: &str, old_path: &str, new_path: &str) -> Rewritten {
    if old_path == new_path {
        return Rewritten::unchanged(text);
    }
    let old_dir = parent_dir(old_path);
    let new_dir = parent_dir(new_path);
    rewrite_link_paths(text, |link| {
        let target = link.canonical_target(old_dir)?;
        let target = if target == old_path {
            new_path
        } else {
            target.as_str()
        };
        Some(relative_link_path(new_dir, target))
    })
}

fn rewrite_link_paths(
    text: &str,
    mut new_path_for: impl FnMut(&MarkdownLink) -> Option<String>,
) -> Rewritten {
    let mut content = String::with_capacity(text.len());
    let mut count = 0usize;
    let mut last = 0usize;
    for link in parse_markdown_links(text) {
        let Some(replacement) = new_path_for(&link) else {
            continue;
        };
        let replacement = if is_percent_encoded(&link.written_path) {
            percent_encode_spaces(&replacement)
        } else {
            replacement
        };
        if replacement == link.written_path {
            continue;
        }
        content.push_str(&text[last..link.path_span.start]);
        content.push_str(&replacement);
        last = link.path_span.end;
        count += 1;
    }
    content.push_str(&text[last..]);
    Rewritten { content, count }
}

/// Directory part of a `/`-separated vault path; `""` at the root.
pub fn parent_dir(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}

/// Joins `written` onto `containing_dir`, folding `.` and `..`. `None` when
/// the result would climb above the vault root.
pub fn resolve_link_path(containing_dir: &str, written: &str) -> Option<String> {
    let mut segments: Vec<&str> = containing_dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in written.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Relative path from directory `from_dir` to the note at `to_path`.
///
/// ```
/// use vaultkit::rewrite::relative_link_path;
///
/// assert_eq!(relative_link_path("", "decisions/Note.md"), "decisions/Note.md");
/// assert_eq!(relative_link_path("a/b", "a/c/Note.md"), "../c/Note.md");
/// ```
pub fn relative_link_path(from_dir: &str, to_path: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = to_path.split('/').filter(|s| !s.is_empty()).collect();
    let to_dirs = &to[..to.len().saturating_sub(1)];

    let common = from
        .iter()
        .zip(to_dirs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend_from_slice(&to[common..]);
    parts.join("/")
}

fn is_percent_encoded(written: &str) -> bool {
    percent_decode(written).is_some_and(|decoded| decoded != written)
}

fn percent_encode_spaces(path: &str) -> String {
    path.replace(' ', "%20")
}

/// Decodes `%XX` escapes, borrowing when there are none. `None` when the
/// decoded bytes are not UTF-8.
pub(crate) fn percent_decode(s: &str) -> Option<Cow<'_, str>> {
    if !s.contains('%') {
        return Some(Cow::Borrowed(s));
    }
    let mut out = Vec::with_capacity(s.len());
    let mut rest = s.as_bytes();
    while let Some((&b, tail)) = rest.split_first() {
        if b == b'%'
            && let [hi, lo, after @ ..] = tail
            && let (Some(hi), Some(lo)) = (hex_digit(*hi), hex_digit(*lo))
        {
            out.push((hi << 4) | lo);
            rest = after;
            continue;
        }
        out.push(b);
        rest = tail;
    }
    String::from_utf8(out).ok().map(Cow::Owned)
}

fn hex_digit(b: u8) -> Option<u8> {
    char::from(b).to_digit(16).map(|d| d as u8)
}
