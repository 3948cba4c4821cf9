//! The print-layout tree produced by conversion.

use serde::Serialize;

use crate::style::StyleKey;

/// One piece of printable content.
///
/// Nodes are plain values: a converted document is just a `Vec<LayoutNode>`
/// which the caller owns and hands on to a layout engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutNode {
    /// A run of unstyled text.
    TextRun {
        /// The text, exactly as it appeared in the input.
        text: String,
    },
    /// Inline text with an optional style.
    StyledText {
        /// Style table entry, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<StyleKey>,
        /// Plain text printed before the children (list markers).
        #[serde(skip_serializing_if = "Option::is_none")]
        lead: Option<String>,
        /// The content.
        children: Vec<LayoutNode>,
    },
    /// A block-level container.
    StyledBlock {
        /// Style table entry.
        style: StyleKey,
        /// The content.
        children: Vec<LayoutNode>,
    },
    /// An image.
    Image {
        /// Image source URL.
        src: String,
        /// Size selector, if the image had a recognised one.
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<StyleKey>,
        /// Alignment selector, if the image had a recognised one.
        #[serde(skip_serializing_if = "Option::is_none")]
        align: Option<StyleKey>,
    },
    /// A hyperlink around some content.
    Link {
        /// Link target.
        href: String,
        /// Style table entry.
        style: StyleKey,
        /// The link text.
        children: Vec<LayoutNode>,
    },
}

impl LayoutNode {
    /// A text run with the given content.
    pub fn text(text: impl Into<String>) -> LayoutNode {
        LayoutNode::TextRun { text: text.into() }
    }

    /// The children of this node (empty for leaves).
    pub fn children(&self) -> &[LayoutNode] {
        use LayoutNode::*;
        match self {
            TextRun { .. } | Image { .. } => &[],
            StyledText { children, .. } | StyledBlock { children, .. } | Link { children, .. } => {
                children
            }
        }
    }

    /// The style table entry of this node, if it has one.  Images report
    /// their size selector.
    pub fn style(&self) -> Option<StyleKey> {
        use LayoutNode::*;
        match *self {
            TextRun { .. } => None,
            StyledText { style, .. } => style,
            StyledBlock { style, .. } | Link { style, .. } => Some(style),
            Image { size, .. } => size,
        }
    }

    /// Returns true for nodes which start a new block when laid out.
    pub fn is_block(&self) -> bool {
        matches!(self, LayoutNode::StyledBlock { .. } | LayoutNode::Image { .. })
    }

    /// All of the text in this subtree, including list markers.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            LayoutNode::TextRun { text } => out.push_str(text),
            LayoutNode::StyledText {
                lead: Some(lead), ..
            } => {
                out.push_str(lead);
                for child in self.children() {
                    child.push_text(out);
                }
            }
            _ => {
                for child in self.children() {
                    child.push_text(out);
                }
            }
        }
    }
}
