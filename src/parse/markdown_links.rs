use std::sync::LazyLock;

use regex::Regex;

use crate::MarkdownLink;

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[([^\]\n]*)\]\(([^)#\s]*)(?:#([^)\s]*))?\)").unwrap()
});

/// `[display](path#fragment)` links and `![alt](path)` embeds, in order.
pub fn parse_markdown_links(text: &str) -> Vec<MarkdownLink> {
    let mut out = Vec::new();
    for caps in MARKDOWN_LINK.captures_iter(text) {
        let (Some(whole), Some(display), Some(path)) = (caps.get(0), caps.get(2), caps.get(3))
        else {
            continue;
        };
        out.push(MarkdownLink {
            embed: caps.get(1).is_some_and(|m| m.as_str() == "!"),
            display: display.as_str().to_string(),
            written_path: path.as_str().to_string(),
            fragment: caps.get(4).map(|m| m.as_str().to_string()),
            raw: whole.as_str().to_string(),
            span: whole.range(),
            path_span: path.range(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_fragment_are_split() {
        let links = parse_markdown_links("a [text](_inbox/Note.md#s) b ![img](pic.png)");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].display, "text");
        assert_eq!(links[0].written_path, "_inbox/Note.md");
        assert_eq!(links[0].fragment.as_deref(), Some("s"));
        assert!(!links[0].embed);
        assert_eq!(links[1].written_path, "pic.png");
        assert!(links[1].embed);
    }

    #[test]
    fn external_and_anchor_links() {
        let links = parse_markdown_links("[a](https://x.io/p) [b](#local) [c](/abs/N.md)");
        assert!(links[0].is_external());
        assert_eq!(links[1].written_path, "");
        assert_eq!(links[1].canonical_target("dir"), None);
        assert!(links[2].is_external());
    }

    #[test]
    fn canonical_target_resolves_against_containing_dir() {
        let links = parse_markdown_links("[x](../b/My%20Note.md)");
        assert_eq!(
            links[0].canonical_target("a/c").as_deref(),
            Some("a/b/My Note.md")
        );
        assert_eq!(links[0].canonical_target(""), None);
    }
}
