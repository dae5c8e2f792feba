use pulldown_cmark::{Options, Parser, html};

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options
}

/// Render stored Markdown to HTML for display.
///
/// Raw HTML in the Markdown (`<br>`, `&nbsp;`) passes through untouched.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Node, tree_to_markdown};

    #[test]
    fn raw_html_passes_through() {
        assert_eq!(
            markdown_to_html("a<br>b\n\n&nbsp;&nbsp;c\n"),
            "<p>a<br>b</p>\n<p>\u{a0}\u{a0}c</p>\n"
        );
    }

    #[test]
    fn gap_marker_survives_rendering() {
        let html = markdown_to_html("first\n\n<br>\nsecond\n\n");
        assert!(html.starts_with("<p>first</p>\n"));
        assert!(html.contains("<br>"));
        assert!(html.contains("second"));
    }

    #[test]
    fn strikethrough() {
        assert_eq!(markdown_to_html("~~x~~"), "<p><del>x</del></p>\n");
    }

    #[test]
    fn nested_list_renders_nested() {
        let tree = Node::BulletList(vec![Node::ListItem(vec![
            Node::Paragraph(vec![Node::text("parent")]),
            Node::OrderedList(vec![
                Node::ListItem(vec![Node::Paragraph(vec![Node::text("one")])]),
                Node::ListItem(vec![Node::Paragraph(vec![Node::text("two")])]),
            ]),
        ])]);
        let html = markdown_to_html(&tree_to_markdown(&tree, &Config::default()));
        assert_eq!(
            html,
            "<ul>\n<li>parent\n<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n</li>\n</ul>\n"
        );
    }
}
