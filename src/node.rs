use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// Inline formatting carried on a text node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
}

impl Mark {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" | "strong" => Some(Mark::Bold),
            "italic" | "em" => Some(Mark::Italic),
            _ => None,
        }
    }
}

/// A node of the editor's document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Doc(Vec<Node>),
    Paragraph(Vec<Node>),
    Heading {
        level: u8,
        children: Vec<Node>,
    },
    BulletList(Vec<Node>),
    OrderedList(Vec<Node>),
    ListItem(Vec<Node>),
    Text {
        value: String,
        marks: Vec<Mark>,
    },
    Bold(Vec<Node>),
    Italic(Vec<Node>),
    HardBreak,
    /// Any node type this crate does not know; rendered as its children.
    Unknown {
        kind: String,
        children: Vec<Node>,
    },
}

impl Node {
    /// Decode a tree from its JSON text.
    pub fn from_json(json: &str) -> Result<Node> {
        let raw: RawNode = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    /// Decode a tree from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Node> {
        let raw = RawNode::deserialize(value)?;
        Ok(raw.into())
    }

    /// Plain text without marks.
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text {
            value: value.into(),
            marks: Vec::new(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::BulletList(_) | Node::OrderedList(_))
    }
}

// Wire shape produced by the editor: `type`, `content`, `text`, `attrs`, `marks`.
#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, alias = "children", alias = "items")]
    content: Vec<RawNode>,
    #[serde(default, alias = "value")]
    text: Option<String>,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    attrs: Option<RawAttrs>,
    #[serde(default)]
    marks: Vec<RawMark>,
}

#[derive(Deserialize, Default)]
struct RawAttrs {
    #[serde(default)]
    level: Option<u8>,
}

#[derive(Deserialize)]
struct RawMark {
    #[serde(rename = "type")]
    kind: String,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let children = || raw.content.into_iter().map(Node::from).collect::<Vec<_>>();
        match raw.kind.as_str() {
            "doc" => Node::Doc(children()),
            "paragraph" => Node::Paragraph(children()),
            "heading" => {
                let level = raw
                    .attrs
                    .as_ref()
                    .and_then(|attrs| attrs.level)
                    .or(raw.level)
                    .unwrap_or(1)
                    .clamp(1, 6);
                Node::Heading {
                    level,
                    children: children(),
                }
            }
            "bulletList" => Node::BulletList(children()),
            "orderedList" => Node::OrderedList(children()),
            "listItem" => Node::ListItem(children()),
            "text" => Node::Text {
                value: raw.text.unwrap_or_default(),
                marks: raw
                    .marks
                    .iter()
                    .filter_map(|mark| Mark::from_name(&mark.kind))
                    .collect(),
            },
            "bold" => Node::Bold(children()),
            "italic" => Node::Italic(children()),
            "hardBreak" => Node::HardBreak,
            _ => Node::Unknown {
                kind: raw.kind.clone(),
                children: children(),
            },
        }
    }
}
