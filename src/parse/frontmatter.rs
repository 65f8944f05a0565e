/// A `---`-fenced YAML block at the very start of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    pub yaml: &'a str,
    /// Byte offset where the note body starts.
    pub body_offset: usize,
}

/// Splits off the front-matter block. An unclosed fence means no front matter.
pub fn split_frontmatter(content: &str) -> Option<Frontmatter<'_>> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;
    let rest_start = content.len() - rest.len();

    let mut idx = 0usize;
    for line in rest.split_inclusive('\n') {
        let line_end = idx + line.len();
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some(Frontmatter {
                yaml: &rest[..idx],
                body_offset: rest_start + line_end,
            });
        }
        idx = line_end;
    }
    None
}

/// Aliases declared under `aliases` or `alias`, as a list or a single string.
pub fn frontmatter_aliases(content: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let Some(fm) = split_frontmatter(content) else {
        return Ok(Vec::new());
    };
    if fm.yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(fm.yaml)?;
    let Some(map) = value.as_mapping() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for key in ["aliases", "alias"] {
        let Some(v) = map.get(serde_yaml::Value::String(key.into())) else {
            continue;
        };
        match v {
            serde_yaml::Value::Sequence(seq) => {
                for item in seq {
                    if let Some(s) = item.as_str() {
                        push_alias(&mut out, s);
                    }
                }
            }
            serde_yaml::Value::String(s) => push_alias(&mut out, s),
            _ => {}
        }
    }
    Ok(out)
}

fn push_alias(out: &mut Vec<String>, raw: &str) {
    let s = raw.trim();
    if !s.is_empty() {
        out.push(s.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_offset_points_past_closing_fence() {
        let text = "---\na: 1\n---\nbody";
        let fm = split_frontmatter(text).unwrap();
        assert_eq!(fm.yaml, "a: 1\n");
        assert_eq!(&text[fm.body_offset..], "body");
    }

    #[test]
    fn unclosed_fence_is_not_frontmatter() {
        assert!(split_frontmatter("---\na: 1\n").is_none());
        assert!(split_frontmatter("no fm").is_none());
    }

    #[test]
    fn aliases_from_list_and_string() {
        let list = frontmatter_aliases("---\naliases: [PM, \"Project Mgmt\"]\n---\n").unwrap();
        assert_eq!(list, ["PM", "Project Mgmt"]);
        let single = frontmatter_aliases("---\nalias: Hello, World\n---\n").unwrap();
        assert_eq!(single, ["Hello, World"]);
    }

    #[test]
    fn broken_yaml_is_an_error() {
        assert!(frontmatter_aliases("---\naliases: [unclosed\n---\n").is_err());
    }
}
