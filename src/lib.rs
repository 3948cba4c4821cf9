//! Convert rich-text HTML into print-layout trees.
//!
//! This crate turns the HTML produced by the content editor (headings,
//! paragraphs, emphasis, links, lists, block quotes and images) into a tree of
//! [`LayoutNode`]s.  Each node refers to an entry in a [`StyleSheet`] by key,
//! and the tree is ready to be handed to a paginating layout engine.
//!
//! # Examples
//!
//! ```rust
//! # use html2layout::{convert, layout::LayoutNode, style::StyleKey};
//! let nodes = convert("<ol><li><p>First</p></li><li><p>Second</p></li></ol>").unwrap();
//! assert_eq!(nodes.len(), 1);
//! assert_eq!(nodes[0].style(), Some(StyleKey::List));
//! assert_eq!(nodes[0].plain_text(), "1. First2. Second");
//! ```
//!
//! Any element outside the supported vocabulary aborts the conversion:
//!
//! ```rust
//! # use html2layout::{convert, Error};
//! assert_eq!(
//!     convert("<table></table>").unwrap_err(),
//!     Error::UnsupportedElement("table".into())
//! );
//! ```
//!
//! The layout tree can be previewed with the renderers in [`render`], and
//! whole printable documents are put together by [`document`].

#![deny(missing_docs)]

#[macro_use]
extern crate html5ever;

#[macro_use]
mod macros;

pub mod document;
pub mod layout;
pub mod render;
pub mod style;

use layout::LayoutNode;
use style::{StyleKey, StyleSheet};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{Attribute, QualName};
pub use markup5ever_rcdom::RcDom;
use markup5ever_rcdom::{
    Handle,
    NodeData::{self, Comment, Doctype, Document, Element, ProcessingInstruction, Text},
};
use tendril::TendrilSink;

use std::io;

/// Errors from converting HTML or rendering the result
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input contains an element outside the supported vocabulary.
    #[error("Couldn't handle element type: {0}")]
    UnsupportedElement(String),
    /// The input contains a node which is neither text nor an element.
    #[error("Unknown type of node: {0}")]
    UnsupportedNode(String),
    /// An element was found outside the structure it requires.
    #[error("Invalid structure: {0}")]
    Structural(String),
    /// The input nests elements more deeply than [`MAX_NESTING`].
    #[error("Elements nested more than {0} deep")]
    TooDeep(usize),
    /// The output width was too narrow to render to.
    #[error("Output width not wide enough.")]
    TooNarrow,
    /// A style sheet override could not be applied.
    #[error("Invalid style sheet: {0}")]
    StyleSheet(String),
    /// An general error was encountered.
    #[error("Unknown failure")]
    Fail,
    /// An I/O error
    #[error("I/O error")]
    IoError(#[from] io::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        use Error::*;
        match (self, other) {
            (UnsupportedElement(a), UnsupportedElement(b)) => a == b,
            (UnsupportedNode(a), UnsupportedNode(b)) => a == b,
            (Structural(a), Structural(b)) => a == b,
            (TooDeep(a), TooDeep(b)) => a == b,
            (TooNarrow, TooNarrow) => true,
            (StyleSheet(a), StyleSheet(b)) => a == b,
            (Fail, Fail) => true,
            _ => false,
        }
    }
}

impl Eq for Error {}

type Result<T> = std::result::Result<T, Error>;

/// The kind of list an item belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// A `<ul>`: items are marked with a bullet.
    Unordered,
    /// An `<ol>`: items are numbered.
    Ordered,
}

/// The list an element is being converted inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListContext {
    /// What sort of list.
    pub kind: ListKind,
    /// 1-based position of the current item within its own list.
    pub position: usize,
}

impl ListContext {
    /// The marker printed before a paragraph in this list item.
    pub fn marker(&self) -> String {
        match self.kind {
            ListKind::Ordered => format!("{}. ", self.position),
            ListKind::Unordered => "\u{2022} ".to_string(),
        }
    }
}

/// Bold or italic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyleKind {
    /// `<strong>` or `<b>`
    Bold,
    /// `<em>` or `<i>`
    Italic,
}

impl TextStyleKind {
    fn style(self) -> StyleKey {
        match self {
            TextStyleKind::Bold => StyleKey::Strong,
            TextStyleKind::Italic => StyleKey::Em,
        }
    }
}

/// The text style span an element is being converted inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyleContext {
    /// The kind of the closest enclosing span.
    pub kind: TextStyleKind,
}

/// State inherited from ancestors while converting.
///
/// Each node receives its own copy, so nothing a node does is visible to its
/// siblings or its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HtmlContext {
    /// Set while inside a list item.
    pub list: Option<ListContext>,
    /// Set while inside a bold or italic span.
    pub text_style: Option<TextStyleContext>,
}

/// The supported elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Heading(usize),
    Strong,
    B,
    Em,
    I,
    P,
    A,
    Ul,
    Ol,
    Li,
    Blockquote,
    Img,
}

impl Tag {
    fn from_name(name: &QualName) -> Result<Tag> {
        Ok(match name.expanded() {
            expanded_name!(html "h1") => Tag::Heading(1),
            expanded_name!(html "h2") => Tag::Heading(2),
            expanded_name!(html "h3") => Tag::Heading(3),
            expanded_name!(html "h4") => Tag::Heading(4),
            expanded_name!(html "strong") => Tag::Strong,
            expanded_name!(html "b") => Tag::B,
            expanded_name!(html "em") => Tag::Em,
            expanded_name!(html "i") => Tag::I,
            expanded_name!(html "p") => Tag::P,
            expanded_name!(html "a") => Tag::A,
            expanded_name!(html "ul") => Tag::Ul,
            expanded_name!(html "ol") => Tag::Ol,
            expanded_name!(html "li") => Tag::Li,
            expanded_name!(html "blockquote") => Tag::Blockquote,
            expanded_name!(html "img") => Tag::Img,
            _ => {
                html_trace!("Unhandled element: {:?}", name.local);
                return Err(Error::UnsupportedElement(name.local.to_string()));
            }
        })
    }
}

/// A reducer which combines results from mapping children into
/// the result for the current node.  Takes a context and a
/// vector of results and returns a new result (or nothing).
type ResultReducer<'a, C, R> = dyn FnOnce(&mut C, Vec<R>) -> Result<Option<R>> + 'a;

/// The result of trying to map one node.
enum TreeMapResult<'a, C, N, R> {
    /// A completed result.
    Finished(R),
    /// Deferred completion - can be turned into a result
    /// once the vector of children are processed.
    PendingChildren {
        children: Vec<N>,
        cons: Box<ResultReducer<'a, C, R>>,
    },
}

/// Map a tree depth-first, children in order, without recursing on the call
/// stack.  The first error returned by `process_node` or a reducer aborts the
/// whole walk.
fn tree_map_reduce<'a, C, N, R, M>(context: &mut C, top: N, mut process_node: M) -> Result<Option<R>>
where
    M: FnMut(&mut C, N) -> Result<TreeMapResult<'a, C, N, R>>,
{
    /// A node partially decoded, waiting for its children to
    /// be processed.
    struct PendingNode<'a, C, R, N> {
        /// How to make the node once finished
        construct: Box<ResultReducer<'a, C, R>>,
        /// Children already processed
        children: Vec<R>,
        /// Iterator of child nodes not yet processed
        to_process: std::vec::IntoIter<N>,
    }

    let mut last = PendingNode {
        // We only expect one child, which we'll just return.
        construct: Box::new(|_, mut cs| Ok(cs.pop())),
        children: Vec::new(),
        to_process: vec![top].into_iter(),
    };
    let mut pending_stack = Vec::new();
    loop {
        // Get the next child node to process
        while let Some(h) = last.to_process.next() {
            match process_node(context, h)? {
                TreeMapResult::Finished(result) => {
                    last.children.push(result);
                }
                TreeMapResult::PendingChildren { children, cons } => {
                    pending_stack.push(last);
                    last = PendingNode {
                        construct: cons,
                        children: Vec::new(),
                        to_process: children.into_iter(),
                    };
                }
            };
        }
        // No more children, so finally construct the parent.
        if let Some(mut parent) = pending_stack.pop() {
            if let Some(node) = (last.construct)(context, last.children)? {
                parent.children.push(node);
            }
            last = parent;
            continue;
        }
        // Finished the whole stack!
        break (last.construct)(context, last.children);
    }
}

/// The deepest element nesting accepted by the converter.
///
/// Layout trees are dropped, compared and serialised recursively, so deeper
/// input is refused with [`Error::TooDeep`] rather than risking the stack.
pub const MAX_NESTING: usize = 1024;

/// A DOM node together with the context it is converted in.
struct ConvertInput {
    handle: Handle,
    context: HtmlContext,
    /// Number of ancestors below the top-level node.
    depth: usize,
}

impl ConvertInput {
    /// The children, converted in the same context as this node.
    fn children(&self) -> Vec<ConvertInput> {
        self.children_in(self.context)
    }

    /// The children, all converted in `context`.
    fn children_in(&self, context: HtmlContext) -> Vec<ConvertInput> {
        self.children_with(|_| context)
    }

    /// The children, each converted in the context made from its index.
    fn children_with<F>(&self, context_for: F) -> Vec<ConvertInput>
    where
        F: Fn(usize) -> HtmlContext,
    {
        self.handle
            .children
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, child)| ConvertInput {
                handle: child.clone(),
                context: context_for(i),
                depth: self.depth + 1,
            })
            .collect()
    }
}

fn pending<F>(
    children: Vec<ConvertInput>,
    f: F,
) -> TreeMapResult<'static, (), ConvertInput, LayoutNode>
where
    F: FnOnce(Vec<LayoutNode>) -> LayoutNode + 'static,
{
    TreeMapResult::PendingChildren {
        children,
        cons: Box::new(move |_, children| Ok(Some(f(children)))),
    }
}

/// Return the value of the named attribute, if present.
fn get_attr(attrs: &[Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| &attr.name.local == name)
        .map(|attr| attr.value.to_string())
}

const IMAGE_SIZE_MARKER: &str = "image-size-";
const IMAGE_ALIGN_MARKER: &str = "image-align-";

/// `"extra-large"` -> `"extraLarge"`
fn hyphen_to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, word) in s.split('-').enumerate() {
        if i == 0 {
            result.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Find the first class containing `marker` and map the rest of it to a
/// style key, eg `tiptap-image-size-original` -> `originalImageSize`.
fn class_selector(classes: &[&str], marker: &str, suffix: &str) -> Option<StyleKey> {
    let class = classes.iter().find(|class| class.contains(marker))?;
    let start = class.find(marker)? + marker.len();
    let name = format!("{}{}", hyphen_to_camel_case(&class[start..]), suffix);
    let key = StyleKey::from_name(&name);
    if key.is_none() {
        html_trace!("No style for image class {:?}", class);
    }
    key
}

fn image_node(attrs: &[Attribute]) -> LayoutNode {
    let class = get_attr(attrs, "class").unwrap_or_default();
    let classes: Vec<&str> = class.split_whitespace().collect();
    LayoutNode::Image {
        src: get_attr(attrs, "src").unwrap_or_default(),
        size: class_selector(&classes, IMAGE_SIZE_MARKER, "ImageSize"),
        align: class_selector(&classes, IMAGE_ALIGN_MARKER, "ImageAlign"),
    }
}

fn node_kind(data: &NodeData) -> &'static str {
    match data {
        Document => "document",
        Doctype { .. } => "doctype",
        Text { .. } => "text",
        Comment { .. } => "comment",
        Element { .. } => "element",
        ProcessingInstruction { .. } => "processing instruction",
    }
}

fn process_dom_node(
    input: ConvertInput,
) -> Result<TreeMapResult<'static, (), ConvertInput, LayoutNode>> {
    use LayoutNode::*;
    use TreeMapResult::*;

    let (name, attrs) = match input.handle.data {
        Text { ref contents } => {
            return Ok(Finished(LayoutNode::text(contents.borrow().to_string())));
        }
        Element {
            ref name,
            ref attrs,
            ..
        } => (name, attrs),
        ref other => {
            let kind = node_kind(other);
            html_trace!("Unhandled node type: {}", kind);
            return Err(Error::UnsupportedNode(kind.to_string()));
        }
    };
    if input.depth > MAX_NESTING {
        html_trace!("Nesting too deep at {:?}", name.local);
        return Err(Error::TooDeep(MAX_NESTING));
    }
    let context = input.context;

    Ok(match Tag::from_name(name)? {
        Tag::Heading(level) => {
            let style = StyleKey::heading(level);
            pending(input.children(), move |children| StyledText {
                style,
                lead: None,
                children,
            })
        }
        tag @ (Tag::Strong | Tag::B | Tag::Em | Tag::I) => {
            let kind = if matches!(tag, Tag::Strong | Tag::B) {
                TextStyleKind::Bold
            } else {
                TextStyleKind::Italic
            };
            // Only the closest enclosing span is taken into account.
            let style = match context.text_style {
                Some(active) if active.kind != kind => StyleKey::StrongEm,
                _ => kind.style(),
            };
            let child_context = HtmlContext {
                text_style: Some(TextStyleContext { kind }),
                ..context
            };
            pending(input.children_in(child_context), move |children| {
                StyledText {
                    style: Some(style),
                    lead: None,
                    children,
                }
            })
        }
        Tag::P => match context.list {
            None => pending(input.children(), |children| StyledText {
                style: Some(StyleKey::P),
                lead: None,
                children,
            }),
            Some(list) => {
                let lead = list.marker();
                pending(input.children(), move |children| StyledText {
                    style: None,
                    lead: Some(lead),
                    children,
                })
            }
        },
        Tag::A => {
            let href = get_attr(&attrs.borrow(), "href").unwrap_or_default();
            pending(input.children(), move |children| Link {
                href,
                style: StyleKey::A,
                children,
            })
        }
        tag @ (Tag::Ul | Tag::Ol) => {
            let kind = if tag == Tag::Ol {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };
            // Numbering restarts for every list; no text style is inherited.
            let children = input.children_with(|i| HtmlContext {
                list: Some(ListContext {
                    kind,
                    position: i + 1,
                }),
                text_style: None,
            });
            pending(children, |children| StyledBlock {
                style: StyleKey::List,
                children,
            })
        }
        Tag::Li => {
            if context.list.is_none() {
                return Err(Error::Structural(
                    "list item outside of a list".to_string(),
                ));
            }
            pending(input.children(), |children| StyledBlock {
                style: StyleKey::ListItem,
                children,
            })
        }
        Tag::Blockquote => pending(
            input.children_in(HtmlContext::default()),
            |children| StyledBlock {
                style: StyleKey::Blockquote,
                children,
            },
        ),
        Tag::Img => Finished(image_node(&attrs.borrow())),
    })
}

/// Convert one DOM node (and its subtree) in the given context.
pub fn convert_node(handle: Handle, context: HtmlContext) -> Result<LayoutNode> {
    html_trace!("### convert_node: HTML: {:?}", handle);
    let top = ConvertInput {
        handle,
        context,
        depth: 0,
    };
    let result = tree_map_reduce(&mut (), top, |_, input| process_dom_node(input))?;
    html_trace!("### convert_node: out= {:#?}", result);
    result.ok_or(Error::Fail)
}

/// Reads and parses HTML from `input`.
pub fn parse_html(mut input: impl io::Read) -> Result<RcDom> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    Ok(parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut input)?)
}

/// The top-level content of a parsed document, in order: any nodes outside
/// the `<html>` element, then the content of `<head>` and of `<body>`.
///
/// The parser puts some elements (eg `<title>`) into the head; they are kept
/// here so that they are reported rather than silently dropped.
pub fn content_nodes(dom: &RcDom) -> Vec<Handle> {
    let mut nodes = Vec::new();
    for child in dom.document.children.borrow().iter() {
        match child.data {
            Element { ref name, .. } if name.expanded() == expanded_name!(html "html") => {
                for part in child.children.borrow().iter() {
                    match part.data {
                        Element { ref name, .. }
                            if name.expanded() == expanded_name!(html "head")
                                || name.expanded() == expanded_name!(html "body") =>
                        {
                            nodes.extend(part.children.borrow().iter().cloned());
                        }
                        _ => nodes.push(part.clone()),
                    }
                }
            }
            Doctype { .. } => {}
            _ => nodes.push(child.clone()),
        }
    }
    nodes
}

/// Convert an already parsed document.
pub fn convert_dom(dom: &RcDom) -> Result<Vec<LayoutNode>> {
    content_nodes(dom)
        .into_iter()
        .map(|handle| convert_node(handle, HtmlContext::default()))
        .collect()
}

/// Reads HTML from `input` and converts it to layout nodes.
pub fn convert_from_read(input: impl io::Read) -> Result<Vec<LayoutNode>> {
    convert_dom(&parse_html(input)?)
}

/// Convert an HTML string to layout nodes.
///
/// The first unsupported element or node aborts the conversion; there is no
/// partial result.  So does nesting deeper than [`MAX_NESTING`].
pub fn convert(html: &str) -> Result<Vec<LayoutNode>> {
    convert_from_read(html.as_bytes())
}

pub mod config {
    //! Configure conversion and rendering using the `Config` type, which can
    //! be constructed using [`default`].

    use std::io;

    use crate::document::{self, Assignment, Document, DocumentOptions, Instruction, Language};
    use crate::layout::LayoutNode;
    use crate::render::markup::MarkupRenderer;
    use crate::render::text_renderer::TextRenderer;
    use crate::render::render_nodes;
    use crate::style::StyleSheet;
    use crate::Result;

    /// Configure the HTML processing.
    #[derive(Clone, Debug, Default)]
    pub struct Config {
        styles: StyleSheet,
        document: DocumentOptions,
    }

    impl Config {
        /// Use `styles` as the style table.
        pub fn style_sheet(mut self, styles: StyleSheet) -> Self {
            self.styles = styles;
            self
        }

        /// Apply TOML overrides to the current style table.
        pub fn style_overrides_toml(mut self, overrides: &str) -> Result<Self> {
            self.styles = self.styles.with_overrides_toml(overrides)?;
            Ok(self)
        }

        /// The title used for documents whose content has no name.
        pub fn fallback_title(mut self, title: &str) -> Self {
            self.document.fallback_title = title.to_string();
            self
        }

        /// Show the image at `src` at the foot of assignment documents.
        pub fn footer_logo(mut self, src: &str) -> Self {
            self.document.footer_logo = Some(src.to_string());
            self
        }

        /// The style table in use.
        pub fn styles(&self) -> &StyleSheet {
            &self.styles
        }

        /// Reads HTML from `input` and converts it to layout nodes.
        pub fn convert_from_read<R: io::Read>(&self, input: R) -> Result<Vec<LayoutNode>> {
            crate::convert_from_read(input)
        }

        /// Reads HTML from `input`, and returns the layout tree as markup.
        pub fn markup_from_read<R: io::Read>(&self, input: R) -> Result<String> {
            let nodes = self.convert_from_read(input)?;
            let mut renderer = MarkupRenderer::new();
            render_nodes(&mut renderer, &nodes)?;
            Ok(renderer.into_string())
        }

        /// Reads HTML from `input`, and returns a plain text preview wrapped
        /// to `width` columns.
        pub fn string_from_read<R: io::Read>(&self, input: R, width: usize) -> Result<String> {
            let nodes = self.convert_from_read(input)?;
            let mut renderer = TextRenderer::new(width, &self.styles)?;
            render_nodes(&mut renderer, &nodes)?;
            renderer.into_string()
        }

        /// Build the printable document for an assignment.
        pub fn assignment_document(
            &self,
            assignment: &Assignment,
            language: Language,
        ) -> Result<Document> {
            document::assignment_document(assignment, language, &self.document)
        }

        /// Build the printable document for an instruction.
        pub fn instruction_document(
            &self,
            instruction: &Instruction,
            language: Language,
        ) -> Result<Document> {
            document::instruction_document(instruction, language, &self.document)
        }
    }

    /// Return a Config with the default style table.
    pub fn default() -> Config {
        Config::default()
    }

    /// Return a Config initialized with a custom style table.
    pub fn with_style_sheet(styles: StyleSheet) -> Config {
        default().style_sheet(styles)
    }
}

/// Reads HTML from `input`, and returns the layout tree rendered as markup.
pub fn markup_from_read<R>(input: R) -> Result<String>
where
    R: io::Read,
{
    config::default().markup_from_read(input)
}

/// Reads HTML from `input`, and returns a plain text preview wrapped to
/// `width` columns.
pub fn from_read<R>(input: R, width: usize) -> Result<String>
where
    R: io::Read,
{
    config::default().string_from_read(input, width)
}

/// The default style table.
pub fn default_styles() -> StyleSheet {
    StyleSheet::default()
}

#[cfg(test)]
mod tests;
