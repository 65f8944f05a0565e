//! Wikilink and embed grammar: `(!)?[[Title(#Fragment)?(|Display)?]]`.
//!
//! `Title` excludes `]`, `#` and `|`. A fragment starting with `^` is a block
//! id, anything else is a heading. Run this on masked text so links inside
//! code, comments and math never show up.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::mask::MaskPipeline;
use crate::{LinkLocation, Subpath, WikiLink};

static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\]#|]+)(?:#([^\]|]*))?(?:\|([^\]]*))?\]\]").unwrap()
});

/// Parses wikilinks from text that has already been masked.
pub fn parse_wikilinks(masked: &str) -> Vec<WikiLink> {
    links_in(masked, masked)
}

/// Masks `text` with `pipeline`, then parses. Positions come from the masked
/// copy; `raw` and the parsed fields come from the original text.
pub fn extract_wikilinks(text: &str, pipeline: &MaskPipeline) -> Vec<WikiLink> {
    let masked = pipeline.mask(text);
    links_in(text, &masked)
}

fn links_in(source: &str, masked: &str) -> Vec<WikiLink> {
    let mut out = Vec::new();
    for caps in WIKILINK.captures_iter(masked) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let span = whole.range();
        let Some(raw) = source.get(span.clone()) else {
            continue;
        };

        // A masked zone inside the link (say, inline code in the display text)
        // may keep the original from matching on its own; fall back to the
        // masked fields then.
        let fields = match WIKILINK.captures(raw) {
            Some(orig) if orig.get(0).is_some_and(|m| m.start() == 0 && m.end() == raw.len()) => {
                fields_of(&orig)
            }
            _ => fields_of(&caps),
        };

        out.push(WikiLink {
            title: fields.title,
            subpath: fields.subpath,
            display: fields.display,
            embed: fields.embed,
            raw: raw.to_string(),
            location: LinkLocation::at(source, span.start),
            span,
        });
    }
    out
}

struct Fields {
    embed: bool,
    title: String,
    subpath: Option<Subpath>,
    display: Option<String>,
}

fn fields_of(caps: &Captures<'_>) -> Fields {
    let group = |i: usize| caps.get(i).map(|m| m.as_str());
    Fields {
        embed: group(1).is_some_and(|bang| bang == "!"),
        title: group(2).unwrap_or_default().to_string(),
        subpath: group(3).and_then(subpath_of),
        display: group(4)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    }
}

fn subpath_of(fragment: &str) -> Option<Subpath> {
    match fragment.strip_prefix('^') {
        Some("") => None,
        Some(block) => Some(Subpath::Block(block.to_string())),
        None if fragment.is_empty() => None,
        None => Some(Subpath::Heading(fragment.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn extract(text: &str) -> Vec<WikiLink> {
        extract_wikilinks(text, &MaskPipeline::standard())
    }

    #[test]
    fn full_grammar_is_split_into_fields() {
        let links = extract("See [[Old Note#Intro|here]] and ![[Pic#^abc123]].");
        assert_eq!(links.len(), 2);

        assert_eq!(links[0].title, "Old Note");
        assert_eq!(links[0].heading(), Some("Intro"));
        assert_eq!(links[0].block_id(), None);
        assert_eq!(links[0].display.as_deref(), Some("here"));
        assert!(!links[0].embed);
        assert_eq!(links[0].raw, "[[Old Note#Intro|here]]");

        assert_eq!(links[1].title, "Pic");
        assert_eq!(links[1].block_id(), Some("abc123"));
        assert_eq!(links[1].heading(), None);
        assert!(links[1].embed);
        assert_eq!(links[1].raw, "![[Pic#^abc123]]");
    }

    #[test]
    fn title_is_verbatim() {
        let links = extract("[[ Spaced  Title ]]");
        assert_eq!(links[0].title, " Spaced  Title ");
    }

    #[test]
    fn links_in_inert_zones_are_ignored() {
        let text = "`[[A]]`\n```\n[[B]]\n```\n%% [[C]] %%\n<!-- [[D]] -->\n$$[[E]]$$\n[[F]]\n";
        let titles: Vec<_> = extract(text).into_iter().map(|l| l.title).collect();
        assert_eq!(titles, ["F"]);
    }

    #[test]
    fn masked_display_text_keeps_original_raw() {
        let text = "x [[Note|a `b` c]] y";
        let links = extract(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].raw, "[[Note|a `b` c]]");
        assert_eq!(links[0].display.as_deref(), Some("a `b` c"));
    }

    #[test]
    fn location_is_one_based() {
        let links = extract("first\n  [[A]]\n");
        assert_eq!(links[0].location, LinkLocation { line: 2, column: 3 });
    }

    #[test]
    fn empty_title_and_empty_fragment() {
        assert!(extract("[[#Heading]]").is_empty());
        let links = extract("[[A#]] [[B|]]");
        assert_eq!(links[0].subpath, None);
        assert_eq!(links[1].display, None);
    }

    #[test]
    fn order_of_occurrence_is_kept() {
        let titles: Vec<_> = extract("[[c]] ![[a]] [[b]]")
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, ["c", "a", "b"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn raw_span_replays_at_its_position(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("[[A]]"),
                    Just("![[B#^x]]"),
                    Just("[[C#H|d]]"),
                    Just("`"),
                    Just("%%"),
                    Just("$"),
                    Just("\n"),
                    Just(" text "),
                    Just("[["),
                    Just("]]"),
                ],
                0..30,
            ),
        ) {
            let text = parts.concat();
            for link in extract(&text) {
                prop_assert_eq!(&text[link.span.clone()], link.raw.as_str());
            }
        }
    }
}
