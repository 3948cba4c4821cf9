//! Render a layout tree as indented markup, one element per line.
//!
//! The output mirrors the element tree a react-pdf style engine would be
//! given:
//!
//! ```text
//! <Text style="p">
//!   <Text>paragraph</Text>
//!   <Text style="strong">
//!     <Text>strong</Text>
//!   </Text>
//! </Text>
//! ```

use super::Renderer;
use crate::style::StyleKey;
use crate::Result;

const INDENT: &str = "  ";

/// An element which has been opened but not yet closed.
#[derive(Debug)]
struct OpenElement {
    name: &'static str,
    /// Index of the opening line in the output.
    line: usize,
}

/// A `Renderer` producing markup text.
#[derive(Debug, Default)]
pub struct MarkupRenderer {
    lines: Vec<String>,
    open: Vec<OpenElement>,
}

impl MarkupRenderer {
    /// Create an empty renderer.
    pub fn new() -> MarkupRenderer {
        Default::default()
    }

    fn push_line(&mut self, line: String) {
        let indent = INDENT.repeat(self.open.len());
        self.lines.push(indent + &line);
    }

    fn open(&mut self, name: &'static str, attrs: String) {
        self.push_line(format!("<{}{}>", name, attrs));
        let line = self.lines.len() - 1;
        self.open.push(OpenElement { name, line });
    }

    fn close(&mut self) {
        if let Some(element) = self.open.pop() {
            if element.line + 1 == self.lines.len() {
                // No children: turn `<X>` into `<X/>`.
                let opening = &mut self.lines[element.line];
                opening.pop();
                opening.push_str("/>");
            } else {
                self.push_line(format!("</{}>", element.name));
            }
        } else {
            html_trace!("MarkupRenderer: close without open element");
        }
    }

    /// Return the markup, one element per line.
    pub fn into_string(self) -> String {
        let mut result = String::new();
        for line in self.lines {
            result.push_str(&line);
            result.push('\n');
        }
        result
    }
}

fn style_attr(style: Option<StyleKey>) -> String {
    match style {
        Some(style) => format!(" style=\"{}\"", style),
        None => String::new(),
    }
}

impl Renderer for MarkupRenderer {
    fn start_text(&mut self, style: Option<StyleKey>, lead: Option<&str>) -> Result<()> {
        self.open("Text", style_attr(style));
        if let Some(lead) = lead {
            self.push_line(format!("{{{:?}}}", lead));
        }
        Ok(())
    }

    fn end_text(&mut self) -> Result<()> {
        self.close();
        Ok(())
    }

    fn start_block(&mut self, style: StyleKey) -> Result<()> {
        self.open("View", style_attr(Some(style)));
        Ok(())
    }

    fn end_block(&mut self) -> Result<()> {
        self.close();
        Ok(())
    }

    fn start_link(&mut self, href: &str, style: StyleKey) -> Result<()> {
        self.open("Link", format!(" src={:?}{}", href, style_attr(Some(style))));
        Ok(())
    }

    fn end_link(&mut self) -> Result<()> {
        self.close();
        Ok(())
    }

    fn add_text(&mut self, text: &str) -> Result<()> {
        // Keep one element per line.
        if text.contains(|c: char| c.is_control()) {
            self.push_line(format!("<Text>{{{:?}}}</Text>", text));
        } else {
            self.push_line(format!("<Text>{}</Text>", text));
        }
        Ok(())
    }

    fn add_image(
        &mut self,
        src: &str,
        size: Option<StyleKey>,
        align: Option<StyleKey>,
    ) -> Result<()> {
        let styles: Vec<&str> = size.iter().chain(align.iter()).map(|s| s.name()).collect();
        let style = if styles.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", styles.join(" "))
        };
        self.push_line(format!("<Image src={:?}{}/>", src, style));
        Ok(())
    }
}
