use crate::config::Config;
use crate::list::{self, Item};
use crate::node::{Mark, Node};
use crate::normalize::escape_leading;

/// Render a document tree to Markdown, before whitespace normalization.
pub fn render(node: &Node, config: &Config) -> String {
    let mut out = String::new();
    render_node(node, 0, config, &mut out);
    out
}

fn render_node(node: &Node, depth: usize, config: &Config, out: &mut String) {
    match node {
        Node::Doc(children) => emit_blocks(children, config, out),
        Node::Paragraph(children) => {
            let mut inline = String::new();
            render_children(children, depth, config, &mut inline);
            out.push_str(&escape_leading(&inline, &config.whitespace));
            out.push_str("\n\n");
        }
        Node::Heading { level, children } => {
            for _ in 0..*level {
                out.push('#');
            }
            out.push(' ');
            render_children(children, depth, config, out);
            out.push_str("\n\n");
        }
        Node::BulletList(items) => out.push_str(&render_list(items, false, depth, config)),
        Node::OrderedList(items) => out.push_str(&render_list(items, true, depth, config)),
        Node::ListItem(children) => {
            // A stray item outside any list renders as a one-item bullet list
            let item = render_item(children, depth, config);
            out.push_str(&list::format_list(&[item], false, depth, &config.lists));
        }
        Node::Text { value, marks } => emit_text(value, marks, out),
        Node::Bold(children) => {
            out.push_str("**");
            render_children(children, depth, config, out);
            out.push_str("**");
        }
        Node::Italic(children) => {
            out.push('*');
            render_children(children, depth, config, out);
            out.push('*');
        }
        Node::HardBreak => out.push_str(&config.whitespace.break_tag),
        Node::Unknown { children, .. } => render_children(children, depth, config, out),
    }
}

fn render_children(children: &[Node], depth: usize, config: &Config, out: &mut String) {
    for child in children {
        render_node(child, depth, config, out);
    }
}

// Top-level blocks. Lists only end in a single newline, so any block without a
// paragraph gap gets one more newline when another block follows; otherwise
// that block would continue the last item.
fn emit_blocks(children: &[Node], config: &Config, out: &mut String) {
    let mut needs_gap = false;
    for child in children {
        let mut block = String::new();
        render_node(child, 0, config, &mut block);
        if block.is_empty() {
            continue;
        }
        if needs_gap {
            out.push('\n');
        }
        out.push_str(&block);
        needs_gap = !block.ends_with("\n\n");
    }
}

fn emit_text(value: &str, marks: &[Mark], out: &mut String) {
    let bold = marks.contains(&Mark::Bold);
    let italic = marks.contains(&Mark::Italic);
    if italic {
        out.push('*');
    }
    if bold {
        out.push_str("**");
    }
    out.push_str(value);
    if bold {
        out.push_str("**");
    }
    if italic {
        out.push('*');
    }
}

fn render_list(items: &[Node], ordered: bool, depth: usize, config: &Config) -> String {
    let items: Vec<Item> = items
        .iter()
        .map(|node| match node {
            Node::ListItem(children) => render_item(children, depth, config),
            other => render_item(std::slice::from_ref(other), depth, config),
        })
        .collect();
    list::format_list(&items, ordered, depth, &config.lists)
}

/// Split an item's children into inline pieces for the marker line and
/// nested list blocks rendered one level deeper.
fn render_item(children: &[Node], depth: usize, config: &Config) -> Item {
    let mut item = Item::default();
    for child in children {
        let mut rendered = String::new();
        if child.is_list() {
            render_node(child, depth + 1, config, &mut rendered);
            if !rendered.is_empty() {
                item.nested.push(rendered);
            }
        } else {
            render_node(child, depth, config, &mut rendered);
            let inline = rendered.trim_end_matches('\n').trim();
            if !inline.is_empty() {
                item.inline.push(inline.to_string());
            }
        }
    }
    item
}
