//! Module containing the `Renderer` interface for previewing a layout tree.
//!
//! Laying out pages is left to a real layout engine; the renderers here are
//! for inspecting conversion results (tests, the command line demo).

pub mod markup;
pub mod text_renderer;

use crate::layout::LayoutNode;
use crate::style::StyleKey;
use crate::{tree_map_reduce, Result, TreeMapResult};

/// A type which is a backend for previewing layout nodes.
pub trait Renderer {
    /// Start an inline text node.  `lead` is plain text to print before the
    /// children.
    fn start_text(&mut self, style: Option<StyleKey>, lead: Option<&str>) -> Result<()>;

    /// Finish a text node started with `start_text`.
    fn end_text(&mut self) -> Result<()>;

    /// Start a block container.
    fn start_block(&mut self, style: StyleKey) -> Result<()>;

    /// Mark the end of a block.
    fn end_block(&mut self) -> Result<()>;

    /// Start a hyperlink
    fn start_link(&mut self, href: &str, style: StyleKey) -> Result<()>;

    /// Finish a hyperlink started earlier.
    fn end_link(&mut self) -> Result<()>;

    /// Add a run of text.
    fn add_text(&mut self, text: &str) -> Result<()>;

    /// Add an image
    fn add_image(&mut self, src: &str, size: Option<StyleKey>, align: Option<StyleKey>)
        -> Result<()>;
}

fn pending<'a, D: Renderer + 'a>(
    children: &'a [LayoutNode],
    f: fn(&mut D) -> Result<()>,
) -> TreeMapResult<'a, D, &'a LayoutNode, ()> {
    TreeMapResult::PendingChildren {
        children: children.iter().collect(),
        cons: Box::new(move |renderer, _| {
            f(renderer)?;
            Ok(Some(()))
        }),
    }
}

fn do_render_node<'a, D: Renderer + 'a>(
    renderer: &mut D,
    node: &'a LayoutNode,
) -> Result<TreeMapResult<'a, D, &'a LayoutNode, ()>> {
    use LayoutNode::*;
    use TreeMapResult::*;

    Ok(match node {
        TextRun { text } => {
            renderer.add_text(text)?;
            Finished(())
        }
        StyledText {
            style,
            lead,
            children,
        } => {
            renderer.start_text(*style, lead.as_deref())?;
            pending(children, D::end_text)
        }
        StyledBlock { style, children } => {
            renderer.start_block(*style)?;
            pending(children, D::end_block)
        }
        Link {
            href,
            style,
            children,
        } => {
            renderer.start_link(href, *style)?;
            pending(children, D::end_link)
        }
        Image { src, size, align } => {
            renderer.add_image(src, *size, *align)?;
            Finished(())
        }
    })
}

/// Feed a sequence of layout nodes to `renderer`, in order.
pub fn render_nodes<D: Renderer>(renderer: &mut D, nodes: &[LayoutNode]) -> Result<()> {
    for node in nodes {
        tree_map_reduce(renderer, node, |renderer, node| {
            do_render_node(renderer, node)
        })?;
    }
    Ok(())
}
