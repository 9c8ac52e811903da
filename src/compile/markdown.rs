//! Block-level reader for native documents.
//!
//! Native documents use a small Markdown subset: optional YAML front matter,
//! ATX headings, fenced code blocks, paragraphs and flat lists. This reader
//! splits a document into those blocks and answers "what is under heading X"
//! the way heading ranges work in Markdown tooling: a section runs until the
//! next heading of the same or a higher rank.

use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("valid regex"));
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?:[*+-]|\d{1,9}[.)])[ \t]+(.*)$").expect("valid regex"));
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})[ \t]*([^`\s]*)").expect("valid regex"));
static STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Paragraphs of the item, each with its lines joined by `\n`.
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { depth: usize, text: String },
    Code { lang: Option<String>, code: String },
    Paragraph(String),
    List(Vec<ListItem>),
}

impl Block {
    /// Markdown text of the block.
    pub fn render(&self) -> String {
        match self {
            Block::Heading { depth, text } => format!("{} {text}", "#".repeat(*depth)),
            Block::Code { lang, code } => {
                format!("```{}\n{code}\n```", lang.as_deref().unwrap_or_default())
            }
            Block::Paragraph(text) => text.clone(),
            Block::List(items) => items
                .iter()
                .map(|item| format!("*   {}", item.paragraphs.join("\n\n    ")))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Raw YAML between the leading `---` fences.
    pub frontmatter: Option<String>,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        let source = source.trim_start_matches('\u{feff}');
        let lines: Vec<&str> = source.lines().collect();
        let (frontmatter, body_start) = split_frontmatter(&lines);
        Self { frontmatter, blocks: parse_blocks(&lines[body_start..]) }
    }

    /// Blocks under the first heading whose text equals `title` (ASCII case-insensitive).
    pub fn section(&self, title: &str) -> Option<&[Block]> {
        let (start, depth) = self.blocks.iter().enumerate().find_map(|(idx, block)| match block {
            Block::Heading { depth, text } if text.eq_ignore_ascii_case(title) => Some((idx, *depth)),
            _ => None,
        })?;
        let body = &self.blocks[start + 1..];
        let end = body
            .iter()
            .position(|b| matches!(b, Block::Heading { depth: d, .. } if *d <= depth))
            .unwrap_or(body.len());
        Some(&body[..end])
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        code_blocks(&self.blocks)
    }
}

pub fn code_blocks(blocks: &[Block]) -> impl Iterator<Item = (Option<&str>, &str)> {
    blocks.iter().filter_map(|b| match b {
        Block::Code { lang, code } => Some((lang.as_deref(), code.as_str())),
        _ => None,
    })
}

/// Render blocks back to Markdown, separated by blank lines.
pub fn render_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> String {
    blocks
        .into_iter()
        .map(Block::render)
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

/// First strong span of `text` and whatever follows it.
pub fn split_strong(text: &str) -> Option<(&str, &str)> {
    let caps = STRONG.captures(text)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1).or_else(|| caps.get(2))?;
    Some((inner.as_str(), &text[whole.end()..]))
}

fn split_frontmatter(lines: &[&str]) -> (Option<String>, usize) {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return (None, 0);
    }
    match lines[1..].iter().position(|l| matches!(l.trim_end(), "---" | "...")) {
        Some(close) => (Some(lines[1..=close].join("\n")), close + 2),
        None => (None, 0),
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_indented(line: &str) -> bool {
    line.starts_with("  ") || line.starts_with('\t')
}

fn starts_block(line: &str) -> bool {
    HEADING.is_match(line) || FENCE.is_match(line) || LIST_MARKER.is_match(line)
}

fn parse_blocks(lines: &[&str]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_blank(line) {
            i += 1;
            continue;
        }

        if let Some(caps) = FENCE.captures(line) {
            let marker = &caps[1];
            let lang = Some(caps[2].to_string()).filter(|l| !l.is_empty());
            let fence_char = marker.chars().next().unwrap_or('`');
            let mut code = Vec::new();
            i += 1;
            while i < lines.len() {
                let trimmed = lines[i].trim_start();
                if trimmed.starts_with(marker) && trimmed.trim_end().chars().all(|c| c == fence_char) {
                    i += 1;
                    break;
                }
                code.push(lines[i]);
                i += 1;
            }
            blocks.push(Block::Code { lang, code: code.join("\n") });
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            let depth = caps[1].len();
            let text = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            blocks.push(Block::Heading { depth, text });
            i += 1;
            continue;
        }

        if LIST_MARKER.is_match(line) {
            let (items, next) = parse_list(lines, i);
            blocks.push(Block::List(items));
            i = next;
            continue;
        }

        let mut para = vec![line.trim()];
        i += 1;
        while i < lines.len() && !is_blank(lines[i]) && !starts_block(lines[i]) {
            para.push(lines[i].trim());
            i += 1;
        }
        blocks.push(Block::Paragraph(para.join("\n")));
    }

    blocks
}

fn parse_list(lines: &[&str], mut i: usize) -> (Vec<ListItem>, usize) {
    let mut items: Vec<ListItem> = Vec::new();

    while i < lines.len() {
        let Some(caps) = LIST_MARKER.captures(lines[i]) else {
            break;
        };
        let mut paragraphs = Vec::new();
        let mut current = vec![caps[1].trim().to_string()];
        i += 1;

        loop {
            if i >= lines.len() {
                break;
            }
            let line = lines[i];
            if is_blank(line) {
                // A blank line continues the item only if indented content follows.
                let next = lines[i + 1..].iter().position(|l| !is_blank(l)).map(|p| i + 1 + p);
                match next {
                    Some(n) if is_indented(lines[n]) && !LIST_MARKER.is_match(lines[n]) => {
                        paragraphs.push(current.join("\n"));
                        current = Vec::new();
                        i = n;
                        continue;
                    }
                    _ => break,
                }
            }
            if LIST_MARKER.is_match(line) || HEADING.is_match(line) || FENCE.is_match(line) {
                break;
            }
            current.push(line.trim().to_string());
            i += 1;
        }
        if !current.is_empty() {
            paragraphs.push(current.join("\n"));
        }
        items.push(ListItem { paragraphs });

        // Blank lines between items keep the list going.
        let next = lines[i..].iter().position(|l| !is_blank(l)).map(|p| i + p);
        match next {
            Some(n) if LIST_MARKER.is_match(lines[n]) => i = n,
            _ => break,
        }
    }

    (items, i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "---
ns: PLAYER
---
## GET_PLAYER_PED

```c
Ped GET_PLAYER_PED(Player playerId);
```

Returns the ped
of a player.

## Parameters
* **playerId**: The player.
* **other**: Second line
  continues here.

## Return value
A ped handle.
";

    #[test]
    fn splits_front_matter() {
        let doc = Document::parse(DOC);
        assert_eq!(doc.frontmatter.as_deref(), Some("ns: PLAYER"));
        assert_eq!(doc.blocks[0], Block::Heading { depth: 2, text: "GET_PLAYER_PED".into() });
    }

    #[test]
    fn sections_end_at_same_rank_heading() {
        let doc = Document::parse(DOC);
        let desc = doc.section("get_player_ped").unwrap();
        assert_eq!(desc.len(), 2);
        assert_eq!(desc[1], Block::Paragraph("Returns the ped\nof a player.".into()));

        let params = doc.section("PARAMETERS").unwrap();
        let Block::List(items) = &params[0] else {
            panic!("expected a list, got {params:?}");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].paragraphs, vec!["**other**: Second line\ncontinues here.".to_string()]);

        assert!(doc.section("Examples").is_none());
    }

    #[test]
    fn code_blocks_keep_language() {
        let doc = Document::parse("```c\nvoid A();\n```\n\n```\nplain\n```\n");
        let blocks: Vec<_> = doc.code_blocks().collect();
        assert_eq!(blocks, vec![(Some("c"), "void A();"), (None, "plain")]);
    }

    #[test]
    fn list_items_with_indented_paragraphs() {
        let doc = Document::parse("* **a**: one\n\n  more about a\n* **b**: two\n\nafter\n");
        let Block::List(items) = &doc.blocks[0] else {
            panic!("expected a list");
        };
        assert_eq!(items[0].paragraphs.len(), 2);
        assert_eq!(items[1].paragraphs, vec!["**b**: two".to_string()]);
        assert_eq!(doc.blocks[1], Block::Paragraph("after".into()));
    }

    #[test]
    fn strong_split() {
        assert_eq!(split_strong("**playerId**: The player."), Some(("playerId", ": The player.")));
        assert_eq!(split_strong("__p0__"), Some(("p0", "")));
        assert_eq!(split_strong("no name"), None);
    }

    #[test]
    fn missing_front_matter_close_is_body() {
        let doc = Document::parse("---\nns: X\n");
        assert!(doc.frontmatter.is_none());
    }
}
