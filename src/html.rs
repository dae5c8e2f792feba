//! Generic HTML to Markdown conversion, used when no document tree is
//! available. Output follows turndown conventions: ATX headings, `-` bullets
//! and fenced code blocks.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::config::Config;
use crate::list::{self, Item};

/// Convert an HTML fragment or document to Markdown.
///
/// Comments are dropped, so an embedded tree comment never leaks into the
/// output. If the HTML cannot be read at all the input is returned as is.
pub fn html_to_markdown(html: &str, config: &Config) -> String {
    let dom = match parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
    {
        Ok(dom) => dom,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read HTML, keeping it unconverted");
            return html.to_string();
        }
    };

    let mut writer = BlockWriter::new(config, 0);
    writer.visit(&dom.document);
    writer.finish()
}

struct BlockWriter<'a> {
    config: &'a Config,
    depth: usize,
    blocks: Vec<String>,
    // Inline content of the paragraph being built
    inline: String,
}

impl<'a> BlockWriter<'a> {
    fn new(config: &'a Config, depth: usize) -> Self {
        Self {
            config,
            depth,
            blocks: Vec::new(),
            inline: String::new(),
        }
    }

    fn visit(&mut self, node: &Handle) {
        match &node.data {
            NodeData::Document => self.visit_children(node),
            NodeData::Text { contents } => {
                self.inline.push_str(&escape_text(&collapse_whitespace(&contents.borrow())));
            }
            NodeData::Element { name, .. } => match &*name.local {
                tag if is_skipped(tag) => {}
                tag @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                    self.flush();
                    let level = usize::from(tag.as_bytes()[1] - b'0');
                    let text = inline_children(node, self.config);
                    let text = text.trim();
                    if !text.is_empty() {
                        self.blocks.push(format!("{} {}", "#".repeat(level), text));
                    }
                }
                tag @ ("ul" | "ol") => {
                    self.flush();
                    let block = list_block(node, tag == "ol", self.depth, self.config);
                    if !block.is_empty() {
                        self.blocks.push(block.trim_end_matches('\n').to_string());
                    }
                }
                "pre" => {
                    self.flush();
                    self.blocks.push(fenced_code(node));
                }
                "blockquote" => {
                    self.flush();
                    let mut inner = BlockWriter::new(self.config, self.depth);
                    inner.visit_children(node);
                    let inner = inner.finish();
                    if !inner.is_empty() {
                        self.blocks.push(quote(&inner));
                    }
                }
                "hr" => {
                    self.flush();
                    self.blocks.push("---".to_string());
                }
                tag if is_block(tag) => {
                    self.flush();
                    self.visit_children(node);
                    self.flush();
                }
                _ => self.inline.push_str(&inline(node, self.config)),
            },
            // Comments, doctypes, processing instructions
            _ => {}
        }
    }

    fn visit_children(&mut self, node: &Handle) {
        for child in node.children.borrow().iter() {
            self.visit(child);
        }
    }

    fn flush(&mut self) {
        let text = self.inline.trim();
        if !text.is_empty() {
            self.blocks.push(text.to_string());
        }
        self.inline.clear();
    }

    fn finish(mut self) -> String {
        self.flush();
        self.blocks.join("\n\n")
    }
}

fn inline(node: &Handle, config: &Config) -> String {
    match &node.data {
        NodeData::Text { contents } => escape_text(&collapse_whitespace(&contents.borrow())),
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs.borrow();
            let attr = |key: &str| {
                attrs
                    .iter()
                    .find(|a| &*a.name.local == key)
                    .map(|a| a.value.to_string())
            };
            match &*name.local {
                "strong" | "b" => wrap("**", &inline_children(node, config)),
                "em" | "i" => wrap("*", &inline_children(node, config)),
                "del" | "s" | "strike" => wrap("~~", &inline_children(node, config)),
                "code" => code_span(&text_content(node)),
                "br" => config.whitespace.break_tag.clone(),
                "a" => match attr("href") {
                    Some(href) => format!("[{}]({href})", inline_children(node, config).trim()),
                    None => inline_children(node, config),
                },
                "img" => match attr("src") {
                    Some(src) => format!("![{}]({src})", attr("alt").unwrap_or_default()),
                    None => String::new(),
                },
                tag if is_skipped(tag) => String::new(),
                _ => inline_children(node, config),
            }
        }
        _ => String::new(),
    }
}

fn inline_children(node: &Handle, config: &Config) -> String {
    node.children
        .borrow()
        .iter()
        .map(|child| inline(child, config))
        .collect()
}

fn list_block(node: &Handle, ordered: bool, depth: usize, config: &Config) -> String {
    let items: Vec<Item> = node
        .children
        .borrow()
        .iter()
        .filter(|child| element_name(child) == Some("li"))
        .map(|li| list_item(li, depth, config))
        .collect();
    list::format_list(&items, ordered, depth, &config.lists)
}

fn list_item(li: &Handle, depth: usize, config: &Config) -> Item {
    let mut item = Item::default();
    let mut pending = String::new();

    for child in li.children.borrow().iter() {
        match element_name(child) {
            Some(tag @ ("ul" | "ol")) => {
                push_inline(&mut item, &mut pending);
                let block = list_block(child, tag == "ol", depth + 1, config);
                if !block.is_empty() {
                    item.nested.push(block);
                }
            }
            Some(tag) if is_block(tag) => {
                push_inline(&mut item, &mut pending);
                pending.push_str(&inline(child, config));
                push_inline(&mut item, &mut pending);
            }
            _ => pending.push_str(&inline(child, config)),
        }
    }
    push_inline(&mut item, &mut pending);

    item
}

fn push_inline(item: &mut Item, pending: &mut String) {
    let text = pending.trim();
    if !text.is_empty() {
        item.inline.push(text.to_string());
    }
    pending.clear();
}

fn fenced_code(pre: &Handle) -> String {
    let language = pre
        .children
        .borrow()
        .iter()
        .find_map(|child| match &child.data {
            NodeData::Element { name, attrs, .. } if &*name.local == "code" => attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == "class")
                .and_then(|a| {
                    a.value
                        .split_whitespace()
                        .find_map(|class| class.strip_prefix("language-"))
                        .map(str::to_string)
                }),
            _ => None,
        })
        .unwrap_or_default();
    let code = text_content(pre);
    format!("```{language}\n{}\n```", code.trim_end_matches('\n'))
}

fn quote(markdown: &str) -> String {
    markdown
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, .. } if &*name.local == "br" => out.push('\n'),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

// Keep surrounding whitespace outside the delimiters so `** x**` never appears.
fn wrap(delimiter: &str, inner: &str) -> String {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return inner.to_string();
    }
    let start = inner.len() - inner.trim_start().len();
    let end = start + trimmed.len();
    format!(
        "{}{delimiter}{trimmed}{delimiter}{}",
        &inner[..start],
        &inner[end..]
    )
}

fn code_span(code: &str) -> String {
    if code.contains('`') {
        format!("`` {code} ``")
    } else {
        format!("`{code}`")
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '*' | '_' | '`' | '[' | ']' => {
                out.push('\\');
                out.push(ch);
            }
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "html"
            | "body"
            | "p"
            | "div"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "main"
            | "aside"
            | "nav"
            | "figure"
            | "figcaption"
            | "address"
            | "li"
            | "dl"
            | "dt"
            | "dd"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
    )
}

fn is_skipped(tag: &str) -> bool {
    matches!(
        tag,
        "head" | "script" | "style" | "title" | "meta" | "link" | "template" | "noscript"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(html: &str) -> String {
        html_to_markdown(html, &Config::default())
    }

    #[test]
    fn paragraphs() {
        assert_eq!(md("<p>Hello   world</p><p>Second</p>"), "Hello world\n\nSecond");
    }

    #[test]
    fn headings_and_rules() {
        assert_eq!(md("<h2>Title</h2><hr><p>x</p>"), "## Title\n\n---\n\nx");
    }

    #[test]
    fn inline_formatting() {
        assert_eq!(
            md("<p><strong>bold </strong><em>it</em> <s>gone</s> <code>a_b</code></p>"),
            "**bold** *it* ~~gone~~ `a_b`"
        );
    }

    #[test]
    fn links_images_and_breaks() {
        assert_eq!(
            md(r#"<p><a href="https://example.com">site</a><br><img src="a.png" alt="A"></p>"#),
            "[site](https://example.com)<br>![A](a.png)"
        );
    }

    #[test]
    fn nested_lists() {
        let html = "<ul><li><p>one</p><ol><li><p>a</p></li><li><p>b</p></li></ol></li><li><p>two</p></li></ul>";
        assert_eq!(md(html), "- one\n  1. a\n  2. b\n- two");
    }

    #[test]
    fn code_block_keeps_whitespace() {
        assert_eq!(
            md("<pre><code class=\"language-rust\">fn main() {\n    x();\n}\n</code></pre>"),
            "```rust\nfn main() {\n    x();\n}\n```"
        );
    }

    #[test]
    fn blockquote() {
        assert_eq!(md("<blockquote><p>a</p><p>b</p></blockquote>"), "> a\n>\n> b");
    }

    #[test]
    fn comments_are_dropped_and_text_escaped() {
        assert_eq!(
            md("<p>2 * 3 = [six]</p><!-- TREE_JSON:{\"type\":\"doc\"} -->"),
            "2 \\* 3 = \\[six\\]"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(md(""), "");
    }
}
