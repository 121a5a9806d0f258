//! Content transformation: blog Markdown → ordered render tree.
//!
//! ## Why a render tree?
//!
//! The presentation layer needs more than HTML: code blocks carry a language
//! for highlighting, tables need an explicit header/body split to lay out
//! responsively, and every image must be lazy-loaded with alt text. Parsing
//! once into [`RenderNode`]s lets the view walk a flat list without ever
//! re-parsing Markdown.
//!
//! ## Passes
//!
//! 1. Sanitise: normalise line endings, strip invisible Unicode
//! 2. Parse with pulldown-cmark (GFM tables and strikethrough enabled)
//! 3. Fold the event stream into nodes:
//!    - fenced code → [`RenderNode::CodeBlock`] tagged `language-<word>`,
//!      one trailing newline stripped
//!    - tables → header cells + rows padded to the header width
//!    - images → lazy, alt defaults to `"Image"`; script-capable sources
//!      are dropped and their alt text kept as text
//!    - everything else (headings, paragraphs, list items, inline code, raw
//!      HTML) → literal [`RenderNode::Text`]
//!
//! The transform is pure and idempotent.

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::mem;
use tracing::debug;

/// Alt text given to images that have none.
pub const DEFAULT_ALT: &str = "Image";

/// One block of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderNode {
    /// Plain text. Never interpreted as markup.
    Text(String),
    /// A code block. `language` is set only for tagged fences.
    #[serde(rename_all = "camelCase")]
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    /// A table with one header row. Every row has `header_cells.len()` cells.
    #[serde(rename_all = "camelCase")]
    Table {
        header_cells: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// An embedded image. `alt` is never empty; `lazy` is always set.
    Image { src: String, alt: String, lazy: bool },
}

/// Transform blog Markdown into render nodes.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn transform(markdown: &str) -> Vec<RenderNode> {
    if markdown.trim().is_empty() {
        return Vec::new();
    }

    let source = sanitise(markdown);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(&source, options) {
        builder.push(event);
    }
    let nodes = builder.finish();
    debug!("Transformed {} bytes of Markdown into {} nodes", markdown.len(), nodes.len());
    nodes
}

// ── Pass 1: sanitise ─────────────────────────────────────────────────────────

fn sanitise(input: &str) -> String {
    remove_invisible_chars(&normalise_line_endings(input))
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Pass 3 helpers ───────────────────────────────────────────────────────────

static RE_FENCE_LANGUAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^language-(\w+)").unwrap());

/// Language of a fenced block, read the way a `class="language-…"` attribute
/// would be: the first info-string token, matched as `language-<word>`.
fn fence_language(info: &str) -> Option<String> {
    let token = info.split_whitespace().next()?;
    let class = format!("language-{token}");
    RE_FENCE_LANGUAGE
        .captures(&class)
        .map(|caps| caps[1].to_string())
}

/// Image sources that could execute script when handed to a renderer.
fn is_unsafe_src(src: &str) -> bool {
    let scheme: String = src
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(11)
        .collect::<String>()
        .to_ascii_lowercase();
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|prefix| scheme.starts_with(prefix))
}

fn strip_trailing_newline(mut code: String) -> String {
    if code.ends_with('\n') {
        code.pop();
    }
    code
}

#[derive(Default)]
struct CodeAcc {
    language: Option<String>,
    code: String,
}

#[derive(Default)]
struct TableAcc {
    in_head: bool,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

impl TableAcc {
    fn into_node(self) -> RenderNode {
        let width = self.header.len();
        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        RenderNode::Table {
            header_cells: self.header,
            rows,
        }
    }
}

struct ImageAcc {
    src: String,
    alt: String,
    /// Images opened inside this one's description; their text joins `alt`.
    nested: usize,
}

/// Folds pulldown-cmark events into [`RenderNode`]s.
#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<RenderNode>,
    text: String,
    code: Option<CodeAcc>,
    table: Option<TableAcc>,
    image: Option<ImageAcc>,
}

impl TreeBuilder {
    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(t) | Event::Code(t) | Event::Html(t) | Event::InlineHtml(t) => {
                self.push_str(&t)
            }
            Event::SoftBreak => self.push_str(" "),
            Event::HardBreak => self.push_str("\n"),
            Event::Rule => self.flush_text(),
            Event::TaskListMarker(done) => self.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    /// Route inline text to whatever is currently open.
    fn push_str(&mut self, s: &str) {
        if let Some(code) = self.code.as_mut() {
            code.code.push_str(s);
        } else if let Some(image) = self.image.as_mut() {
            image.alt.push_str(s);
        } else if let Some(table) = self.table.as_mut() {
            table.cell.push_str(s);
        } else {
            self.text.push_str(s);
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::CodeBlock(kind) => {
                self.flush_text();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeAcc {
                    language,
                    code: String::new(),
                });
            }
            Tag::Table(_) => {
                self.flush_text();
                self.table = Some(TableAcc::default());
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            // Images inside table cells contribute their alt text to the cell.
            Tag::Image { dest_url, .. } if self.table.is_none() => match self.image.as_mut() {
                Some(outer) => outer.nested += 1,
                None => {
                    self.flush_text();
                    self.image = Some(ImageAcc {
                        src: dest_url.to_string(),
                        alt: String::new(),
                        nested: 0,
                    });
                }
            },
            Tag::Paragraph
            | Tag::Heading { .. }
            | Tag::BlockQuote
            | Tag::HtmlBlock
            | Tag::List(_)
            | Tag::Item
            | Tag::FootnoteDefinition(_) => self.flush_text(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                if let Some(acc) = self.code.take() {
                    self.nodes.push(RenderNode::CodeBlock {
                        language: acc.language,
                        code: strip_trailing_newline(acc.code),
                    });
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = mem::take(&mut table.row);
                    if table.in_head {
                        table.header = row;
                    } else {
                        table.rows.push(row);
                    }
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    if !table.row.is_empty() {
                        table.header = mem::take(&mut table.row);
                    }
                    table.in_head = false;
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.nodes.push(table.into_node());
                }
            }
            TagEnd::Image => match self.image.as_mut() {
                Some(outer) if outer.nested > 0 => outer.nested -= 1,
                _ => {
                    if let Some(image) = self.image.take() {
                        self.push_image(image);
                    }
                }
            },
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote
            | TagEnd::HtmlBlock
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::FootnoteDefinition => self.flush_text(),
            _ => {}
        }
    }

    fn push_image(&mut self, image: ImageAcc) {
        let alt = image.alt.trim();
        if is_unsafe_src(&image.src) {
            debug!("Dropping image with unsafe source scheme");
            if !alt.is_empty() {
                self.nodes.push(RenderNode::Text(alt.to_string()));
            }
            return;
        }
        let alt = if alt.is_empty() { DEFAULT_ALT } else { alt };
        self.nodes.push(RenderNode::Image {
            src: image.src,
            alt: alt.to_string(),
            lazy: true,
        });
    }

    fn flush_text(&mut self) {
        let text = mem::take(&mut self.text);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.nodes.push(RenderNode::Text(trimmed.to_string()));
        }
    }

    fn finish(mut self) -> Vec<RenderNode> {
        if let Some(image) = self.image.take() {
            self.push_image(image);
        }
        self.flush_text();
        self.nodes
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RenderNode {
        RenderNode::Text(s.to_string())
    }

    #[test]
    fn fenced_js_block_is_single_code_node() {
        let nodes = transform("```js\nconst x=1;\n```");
        assert_eq!(
            nodes,
            vec![RenderNode::CodeBlock {
                language: Some("js".into()),
                code: "const x=1;".into(),
            }]
        );
    }

    #[test]
    fn only_one_trailing_newline_is_stripped() {
        let nodes = transform("```\na\n\n```");
        assert_eq!(
            nodes,
            vec![RenderNode::CodeBlock {
                language: None,
                code: "a\n".into(),
            }]
        );
    }

    #[test]
    fn fence_language_follows_class_convention() {
        assert_eq!(fence_language("rust"), Some("rust".into()));
        assert_eq!(fence_language("python title=\"x\""), Some("python".into()));
        assert_eq!(fence_language("c++"), Some("c".into()));
        assert_eq!(fence_language("{.python}"), None);
        assert_eq!(fence_language(""), None);
    }

    #[test]
    fn indented_code_has_no_language() {
        let nodes = transform("Intro\n\n    let x = 1;\n");
        assert_eq!(nodes[0], text("Intro"));
        assert!(matches!(
            &nodes[1],
            RenderNode::CodeBlock { language: None, code } if code == "let x = 1;"
        ));
    }

    #[test]
    fn inline_code_is_plain_text() {
        let nodes = transform("Use `cargo build` to compile.");
        assert_eq!(nodes, vec![text("Use cargo build to compile.")]);
    }

    #[test]
    fn headings_and_paragraphs_become_text() {
        let nodes = transform("# Hi\n\nSome *emphasised*\ntext.");
        assert_eq!(nodes, vec![text("Hi"), text("Some emphasised text.")]);
    }

    #[test]
    fn list_items_are_separate_text_nodes() {
        let nodes = transform("- one\n- two\n  - nested");
        assert_eq!(nodes, vec![text("one"), text("two"), text("nested")]);
    }

    #[test]
    fn image_gets_lazy_and_default_alt() {
        let nodes = transform("![](https://cdn.site/a.png)");
        assert_eq!(
            nodes,
            vec![RenderNode::Image {
                src: "https://cdn.site/a.png".into(),
                alt: DEFAULT_ALT.into(),
                lazy: true,
            }]
        );
    }

    #[test]
    fn image_splits_surrounding_text() {
        let nodes = transform("before ![Chart](c.png) after");
        assert_eq!(
            nodes,
            vec![
                text("before"),
                RenderNode::Image {
                    src: "c.png".into(),
                    alt: "Chart".into(),
                    lazy: true,
                },
                text("after"),
            ]
        );
    }

    #[test]
    fn nested_image_folds_into_outer_alt() {
        let nodes = transform("![outer ![inner](i.png)](o.png) tail");
        assert_eq!(
            nodes,
            vec![
                RenderNode::Image {
                    src: "o.png".into(),
                    alt: "outer inner".into(),
                    lazy: true,
                },
                text("tail"),
            ]
        );
    }

    #[test]
    fn script_image_sources_are_dropped() {
        let nodes = transform("![Click me](javascript:alert(1))");
        assert_eq!(nodes, vec![text("Click me")]);
        assert!(is_unsafe_src(" JaVaScRiPt:alert(1)"));
        assert!(is_unsafe_src("data:image/svg+xml;base64,AAAA"));
        assert!(!is_unsafe_src("https://example.org/x.png"));
    }

    #[test]
    fn table_is_split_into_header_and_rows() {
        let md = "| Name | Score |\n| --- | --- |\n| a | 1 |\n| b | 2 |";
        assert_eq!(
            transform(md),
            vec![RenderNode::Table {
                header_cells: vec!["Name".into(), "Score".into()],
                rows: vec![
                    vec!["a".into(), "1".into()],
                    vec!["b".into(), "2".into()],
                ],
            }]
        );
    }

    #[test]
    fn short_table_rows_are_padded() {
        let md = "| A | B | C |\n|---|---|---|\n| 1 |";
        match &transform(md)[0] {
            RenderNode::Table { header_cells, rows } => {
                assert_eq!(header_cells.len(), 3);
                assert_eq!(rows, &vec![vec!["1".to_string(), String::new(), String::new()]]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn raw_html_is_literal_text() {
        let nodes = transform("<script>alert(1)</script>");
        assert_eq!(nodes, vec![text("<script>alert(1)</script>")]);
    }

    #[test]
    fn empty_content_yields_no_nodes() {
        assert!(transform("").is_empty());
        assert!(transform("  \n\n\t").is_empty());
    }

    #[test]
    fn crlf_and_invisible_chars_are_sanitised() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(
            remove_invisible_chars("hello\u{200B}world\u{FEFF}foo\u{00AD}bar"),
            "helloworldfoobar"
        );
        let nodes = transform("```py\r\nprint(1)\r\n```\r\n");
        assert_eq!(
            nodes,
            vec![RenderNode::CodeBlock {
                language: Some("py".into()),
                code: "print(1)".into(),
            }]
        );
    }

    #[test]
    fn transform_is_idempotent() {
        let md = "# Title\n\nIntro ![x](https://a/b.png)\n\n```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        assert_eq!(transform(md), transform(md));
    }

    #[test]
    fn mixed_document_order_is_preserved() {
        let md = "# Heading\n\nPara\n\n```sh\nls\n```\n\n![pic](p.png)\n\n| h |\n|---|\n| v |\n\nEnd";
        let kinds: Vec<&str> = transform(md)
            .iter()
            .map(|n| match n {
                RenderNode::Text(_) => "text",
                RenderNode::CodeBlock { .. } => "code",
                RenderNode::Table { .. } => "table",
                RenderNode::Image { .. } => "image",
            })
            .collect();
        assert_eq!(kinds, ["text", "text", "code", "image", "table", "text"]);
    }
}
