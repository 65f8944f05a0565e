//! Zone masking: blanks out the interior of inert markup regions (code,
//! comments, math) so link and tag extraction never see them.
//!
//! Every pass is a pure `&str -> String` function that keeps the byte length
//! and the position of every `\n` intact. Delimiters are left in place; only
//! the bytes between them become spaces. Passes run in the order they were
//! added to a [`MaskPipeline`], and [`MaskPipeline::standard`] fixes the order
//! the note dialect needs: a later pass must never react to delimiter
//! characters that only exist inside a zone an earlier pass already blanked.

use std::sync::LazyLock;

use regex::Regex;

// Double-backtick spans are the first alternative, so a match always consumes
// both of its delimiters and a single-backtick span can never start on one.
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"``[^\n]+?``|`[^`\n]+`").unwrap());
static PERCENT_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)%%.*?%%").unwrap());
static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static DISPLAY_MATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\$\$.*?\$\$").unwrap());
// Display spans are matched again (their interior is already blank) so their
// `$$` delimiters are consumed instead of pairing with a later `$`.
static ANY_MATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s:\$\$.*?\$\$)|\$[^\s$](?:[^\n$]*[^\s$])?\$").unwrap()
});

pub type MaskFn = fn(&str) -> String;

/// One named masking rule.
#[derive(Debug, Clone, Copy)]
pub struct MaskPass {
    name: &'static str,
    apply: MaskFn,
}

impl MaskPass {
    pub const fn new(name: &'static str, apply: MaskFn) -> Self {
        Self { name, apply }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, text: &str) -> String {
        (self.apply)(text)
    }
}

/// An explicit, ordered list of masking passes.
#[derive(Debug, Clone, Default)]
pub struct MaskPipeline {
    passes: Vec<MaskPass>,
}

impl MaskPipeline {
    /// An empty pipeline; `mask` returns its input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fenced code, inline code, `%%` comments, HTML comments, display math,
    /// inline math, in that order.
    pub fn standard() -> Self {
        Self::new()
            .with(MaskPass::new("fenced-code", mask_fenced_code))
            .with(MaskPass::new("inline-code", mask_inline_code))
            .with(MaskPass::new("percent-comment", mask_percent_comments))
            .with(MaskPass::new("html-comment", mask_html_comments))
            .with(MaskPass::new("display-math", mask_display_math))
            .with(MaskPass::new("inline-math", mask_inline_math))
    }

    pub fn with(mut self, pass: MaskPass) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn passes(&self) -> &[MaskPass] {
        &self.passes
    }

    pub fn mask(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pass in &self.passes {
            out = pass.apply(&out);
        }
        out
    }
}

/// Blanks every line between an opening fence (3+ backticks at line start,
/// optional info string) and a closing line of exactly three backticks.
/// An unclosed fence masks through end of input.
pub fn mask_fenced_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_fence = false;
    for line in text.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        if in_fence {
            if body.trim_end() == "```" {
                in_fence = false;
                out.push_str(line);
            } else {
                push_blanked(&mut out, line);
            }
            continue;
        }
        if is_opening_fence(body) {
            in_fence = true;
        }
        out.push_str(line);
    }
    out
}

fn is_opening_fence(line: &str) -> bool {
    if !line.starts_with("```") {
        return false;
    }
    !line.trim_start_matches('`').contains('`')
}

/// Double-backtick spans take precedence over single-backtick spans, and the
/// two never overlap. Neither crosses a newline.
pub fn mask_inline_code(text: &str) -> String {
    mask_spans(text, &INLINE_CODE, |span| {
        if span.starts_with("``") {
            (2, 2)
        } else {
            (1, 1)
        }
    })
}

/// `%% ... %%`, possibly multiline; each pair is matched independently.
pub fn mask_percent_comments(text: &str) -> String {
    mask_interiors(text, &PERCENT_COMMENT, 2, 2)
}

/// `<!-- ... -->`, possibly multiline; each pair is matched independently.
pub fn mask_html_comments(text: &str) -> String {
    mask_interiors(text, &HTML_COMMENT, 4, 3)
}

pub fn mask_display_math(text: &str) -> String {
    mask_interiors(text, &DISPLAY_MATH, 2, 2)
}

/// `$...$` on one line, with non-space, non-`$` characters hugging both
/// delimiters. `$50` and `$100 and $200` stay untouched, and the `$$` of a
/// display span never opens or closes an inline span.
pub fn mask_inline_math(text: &str) -> String {
    mask_spans(text, &ANY_MATH, |span| {
        if span.starts_with("$$") {
            (2, 2)
        } else {
            (1, 1)
        }
    })
}

fn mask_interiors(text: &str, re: &Regex, open_len: usize, close_len: usize) -> String {
    mask_spans(text, re, |_| (open_len, close_len))
}

/// Blanks each match of `re` between its delimiters; `delimiters` gives the
/// opening and closing widths for a matched span.
fn mask_spans(text: &str, re: &Regex, delimiters: impl Fn(&str) -> (usize, usize)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for m in re.find_iter(text) {
        let (open_len, close_len) = delimiters(m.as_str());
        let inner_start = m.start() + open_len;
        let inner_end = m.end() - close_len;
        out.push_str(&text[last..inner_start]);
        push_blanked(&mut out, &text[inner_start..inner_end]);
        last = inner_end;
    }
    out.push_str(&text[last..]);
    out
}

fn push_blanked(out: &mut String, s: &str) {
    for c in s.chars() {
        if c == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat_n(' ', c.len_utf8()));
        }
    }
}
