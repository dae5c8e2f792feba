mod config;
mod convert;
mod error;
mod html;
mod list;
mod markdown;
mod node;
mod normalize;
mod preview;

pub use config::{Config, ListsConfig, TreeConfig, WhitespaceConfig};
pub use convert::{EditorContent, convert, convert_content, convert_with_config, tree_to_markdown};
pub use error::{Error, Result};
pub use html::html_to_markdown;
pub use node::{Mark, Node};
pub use normalize::{collapse_gaps, escape_indentation, normalize};
pub use preview::markdown_to_html;

/// Render a document tree to Markdown without whitespace normalization.
pub fn render(node: &Node, config: &Config) -> String {
    markdown::render(node, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn plain_paragraph_is_reproduced(text in "[A-Za-z0-9,.!?'][A-Za-z0-9 ,.!?']{0,40}") {
            let doc = Node::Doc(vec![Node::Paragraph(vec![Node::text(text.clone())])]);
            let markdown = tree_to_markdown(&doc, &Config::default());
            prop_assert_eq!(markdown, format!("{text}\n\n"));
        }
    }
}
