use crate::mask::MaskPipeline;
use crate::parse::frontmatter::split_frontmatter;

/// An inline `#tag`, without the `#`, case preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub String);

impl Tag {
    /// Lowercased form for case-insensitive grouping.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

/// Masks `text`, skips the front-matter block, and returns inline tags in
/// order of occurrence.
pub fn extract_tags(text: &str, pipeline: &MaskPipeline) -> Vec<Tag> {
    let masked = pipeline.mask(text);
    let body_offset = split_frontmatter(&masked)
        .map(|fm| fm.body_offset)
        .unwrap_or(0);
    parse_tags(&masked[body_offset..])
}

/// Scans already-masked text for inline tags.
pub fn parse_tags(masked: &str) -> Vec<Tag> {
    let mut out = Vec::new();
    let bytes = masked.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'#' {
            i += 1;
            continue;
        }

        // Require a boundary before '#'.
        let prev = masked[..i].chars().next_back();
        if prev.is_some_and(|p| p.is_alphanumeric() || matches!(p, '/' | '&' | '#' | '_')) {
            i += 1;
            continue;
        }

        let rest = &masked[i + 1..];
        let len: usize = rest
            .chars()
            .take_while(|c| is_tag_char(*c))
            .map(char::len_utf8)
            .sum();

        // "# Heading" and a bare '#' end up here with len == 0.
        if len > 0 {
            let raw = rest[..len].trim_matches('/');
            if raw.chars().any(|c| !c.is_ascii_digit()) {
                out.push(Tag(raw.to_string()));
            }
        }

        i += 1 + len;
    }
    out
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<String> {
        extract_tags(text, &MaskPipeline::standard())
            .into_iter()
            .map(|t| t.0)
            .collect()
    }

    #[test]
    fn inline_tags_in_order() {
        assert_eq!(
            tags("Body #Quux and #bar/baz, then #Quux again"),
            ["Quux", "bar/baz", "Quux"]
        );
    }

    #[test]
    fn headings_are_not_tags() {
        assert_eq!(tags("# Title\n## Subtitle\n#tag\n"), ["tag"]);
    }

    #[test]
    fn boundaries_and_numbers() {
        assert!(tags("issue#12 a/#b &#123; #2024").is_empty());
        assert_eq!(tags("#2024-q1 #é-tag"), ["2024-q1", "é-tag"]);
    }

    #[test]
    fn masked_zones_and_frontmatter_hide_tags() {
        let text = "---\ntitle: x #nottag\n---\n`#code` %% #hidden %% #real\n```\n#fenced\n```\n";
        assert_eq!(tags(text), ["real"]);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(tags("#area/"), ["area"]);
    }
}
