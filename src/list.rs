use crate::config::ListsConfig;
use crate::normalize::is_marker_line;

/// A list item, already rendered to Markdown fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Inline pieces, joined by spaces onto the marker line.
    pub inline: Vec<String>,
    /// Nested list blocks, already indented for their own depth.
    pub nested: Vec<String>,
}

/// Format the items of one list at `depth`.
///
/// Items are separated by a single newline and the block ends with exactly
/// one newline. Ordered lists are numbered by position starting at 1.
pub fn format_list(items: &[Item], ordered: bool, depth: usize, config: &ListsConfig) -> String {
    if items.is_empty() {
        return String::new();
    }

    let indent = config.prefix(depth);
    let continuation = format!("{indent}{}", " ".repeat(config.indent));

    let mut out = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if ordered {
                format!("{}. ", i + 1)
            } else {
                "- ".to_string()
            };
            format_item(item, &marker, &indent, &continuation)
        })
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

fn format_item(item: &Item, marker: &str, indent: &str, continuation: &str) -> String {
    let content = item.inline.join(" ");
    let mut lines = content.split('\n');

    let mut out = String::new();
    out.push_str(indent);
    out.push_str(marker);
    out.push_str(lines.next().unwrap_or_default().trim_start());

    for line in lines {
        out.push('\n');
        if line.trim().is_empty() {
            out.push_str(line);
        } else if is_marker_line(line) {
            out.push_str(indent);
            out.push_str(line);
        } else {
            out.push_str(continuation);
            out.push_str(line.trim_start());
        }
    }

    for block in &item.nested {
        out.push('\n');
        out.push_str(block.trim_end_matches('\n'));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str) -> Item {
        Item {
            inline: vec![text.to_string()],
            nested: Vec::new(),
        }
    }

    #[test]
    fn bullet_items_one_per_line() {
        let items = [item("one"), item("two")];
        assert_eq!(
            format_list(&items, false, 0, &ListsConfig::default()),
            "- one\n- two\n"
        );
    }

    #[test]
    fn ordered_items_number_by_position() {
        let items = [item("a"), item("b"), item("c")];
        assert_eq!(
            format_list(&items, true, 1, &ListsConfig::default()),
            "  1. a\n  2. b\n  3. c\n"
        );
    }

    #[test]
    fn continuation_and_marker_lines() {
        let items = [Item {
            inline: vec!["first\nsecond\n\n- dash".to_string()],
            nested: Vec::new(),
        }];
        assert_eq!(
            format_list(&items, false, 1, &ListsConfig::default()),
            "  - first\n    second\n\n  - dash\n"
        );
    }

    #[test]
    fn empty_item_keeps_marker() {
        assert_eq!(
            format_list(&[Item::default()], false, 0, &ListsConfig::default()),
            "- \n"
        );
    }

    #[test]
    fn nested_block_follows_marker_line() {
        let items = [Item {
            inline: vec!["parent".to_string(), "more".to_string()],
            nested: vec!["  - child\n".to_string()],
        }];
        assert_eq!(
            format_list(&items, false, 0, &ListsConfig::default()),
            "- parent more\n  - child\n"
        );
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(format_list(&[], true, 0, &ListsConfig::default()), "");
    }
}
