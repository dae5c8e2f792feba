use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::html;
use crate::markdown;
use crate::node::Node;
use crate::normalize;

/// What the rich-text editor hands over on save: the HTML mirror of the
/// content and, when available, its structured document tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorContent {
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<Value>,
}

impl EditorContent {
    pub fn new(html: impl Into<String>, tree: Option<Value>) -> Self {
        Self {
            html: html.into(),
            tree,
        }
    }

    /// Split a serialized payload, HTML followed by a
    /// `<!-- MARKER:{json} -->` comment, into its two parts.
    ///
    /// Every marker comment is removed from the HTML. A tree that is not valid
    /// JSON is logged and dropped.
    pub fn from_serialized(serialized: &str, marker: &str) -> Self {
        let open = format!("<!-- {marker}:");
        let mut html = String::with_capacity(serialized.len());
        let mut tree = None;
        let mut rest = serialized;

        while let Some(start) = rest.find(&open) {
            html.push_str(&rest[..start]);
            let after = &rest[start + open.len()..];
            let Some(end) = after.find(" -->") else {
                warn!(marker, "unterminated document tree comment");
                rest = "";
                break;
            };
            if tree.is_none() {
                match serde_json::from_str::<Value>(&after[..end]) {
                    Ok(value) => tree = Some(value),
                    Err(e) => warn!(error = %e, "embedded document tree is not valid JSON"),
                }
            }
            rest = &after[end + " -->".len()..];
        }
        html.push_str(rest);

        Self { html, tree }
    }
}

/// Convert a serialized editor payload to Markdown with the default settings.
pub fn convert(serialized: &str) -> String {
    convert_with_config(serialized, &Config::compiled_default())
}

/// Convert a serialized editor payload to Markdown.
pub fn convert_with_config(serialized: &str, config: &Config) -> String {
    let content = EditorContent::from_serialized(serialized, &config.tree.marker);
    convert_content(&content, config)
}

/// Convert editor content to Markdown, preferring the document tree and
/// falling back to the HTML mirror. Never fails: the worst case is the
/// best-effort HTML conversion.
pub fn convert_content(content: &EditorContent, config: &Config) -> String {
    if let Some(tree) = &content.tree {
        match Node::from_value(tree) {
            Ok(node) => {
                debug!("converting from document tree");
                return tree_to_markdown(&node, config);
            }
            Err(e) => warn!(error = %e, "failed to decode document tree, using HTML"),
        }
    }

    if content.html.trim().is_empty() {
        return String::new();
    }
    debug!("converting from HTML");
    let markdown = html::html_to_markdown(&content.html, config);
    normalize::escape_indentation(&markdown, &config.whitespace)
}

/// Render a document tree and normalize its whitespace.
pub fn tree_to_markdown(node: &Node, config: &Config) -> String {
    let markdown = markdown::render(node, config);
    normalize::normalize(&markdown, &config.whitespace)
}
