//! A plain text preview of a layout tree.
//!
//! Text is wrapped to a fixed width.  Emphasis is shown with `*` markers
//! chosen from the font properties in the style table, so a style sheet
//! override changes the preview too.  Links are numbered and listed as
//! footnotes at the end.

use std::mem;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::Renderer;
use crate::style::{FontStyle, StyleKey, StyleSheet};
use crate::{Error, Result};

/// A type to build up wrapped text.
#[derive(Debug)]
struct WrappedBlock {
    width: usize,
    text: Vec<String>,
    line: String,
    linelen: usize,
    word: String, // The current word (with no whitespace).
    wordlen: usize,
    opening: String, // Markers waiting for the next word to start.
}

impl WrappedBlock {
    fn new(width: usize) -> WrappedBlock {
        WrappedBlock {
            width,
            text: Vec::new(),
            line: String::new(),
            linelen: 0,
            word: String::new(),
            wordlen: 0,
            opening: String::new(),
        }
    }

    fn flush_word(&mut self) {
        /* Finish the word. */
        html_trace_quiet!("flush_word: word={:?}, linelen={}", self.word, self.linelen);
        if !self.word.is_empty() {
            let space_in_line = self.width.saturating_sub(self.linelen);
            let space_needed = self.wordlen + if self.linelen > 0 { 1 } else { 0 }; // space
            if space_needed <= space_in_line {
                if self.linelen > 0 {
                    self.line.push(' ');
                    self.linelen += 1;
                }
                self.line.push_str(&self.word);
                self.linelen += self.wordlen;
                self.word.clear();
            } else {
                /* Start a new line */
                self.flush_line();
                let word = mem::take(&mut self.word);
                if self.wordlen <= self.width {
                    self.line = word;
                    self.linelen = self.wordlen;
                } else {
                    /* We need to split the word. */
                    for c in word.chars() {
                        let c_w = UnicodeWidthChar::width(c).unwrap_or(0);
                        if self.linelen > 0 && self.linelen + c_w > self.width {
                            self.flush_line();
                        }
                        self.line.push(c);
                        self.linelen += c_w;
                    }
                }
            }
        }
        self.wordlen = 0;
    }

    fn flush_line(&mut self) {
        if !self.line.is_empty() {
            self.text.push(mem::take(&mut self.line));
            self.linelen = 0;
        }
    }

    /// Consume self and return a vector of lines.
    fn into_lines(mut self) -> Vec<String> {
        self.flush_word();
        self.flush_line();
        self.text
    }

    fn add_text(&mut self, text: &str) {
        html_trace!("WrappedBlock::add_text({})", text);
        for c in text.chars() {
            if c.is_whitespace() {
                /* Whitespace is mostly ignored, except to terminate words. */
                self.flush_word();
            } else if let Some(charwidth) = UnicodeWidthChar::width(c) {
                /* Not whitespace; add to the current word. */
                if !self.opening.is_empty() {
                    let opening = mem::take(&mut self.opening);
                    self.add_word_part(&opening);
                }
                self.word.push(c);
                self.wordlen += charwidth;
            }
        }
    }

    /// Add text which sticks to the current word.
    fn add_word_part(&mut self, s: &str) {
        self.word.push_str(s);
        self.wordlen += UnicodeWidthStr::width(s);
    }

    /// Start a marked span: `marker` sticks to the front of the next word.
    fn open_span(&mut self, marker: &str) {
        self.opening.push_str(marker);
    }

    /// End a span opened with `open`, attaching `close` to the last word
    /// written.  A span with no words in this block leaves nothing behind.
    fn close_span(&mut self, open: &str, close: &str) {
        if !self.opening.is_empty() && self.opening.ends_with(open) {
            let len = self.opening.len() - open.len();
            self.opening.truncate(len);
        } else if !self.word.is_empty() {
            self.add_word_part(close);
        } else if !self.line.is_empty() {
            self.line.push_str(close);
            self.linelen += UnicodeWidthStr::width(close);
        } else if let Some(last) = self.text.last_mut() {
            last.push_str(close);
        }
    }
}

/// What to do when a node's children are finished.
#[derive(Debug)]
enum Frame {
    /// Inline span: append the closing marker.
    Inline(String),
    /// Paragraph-like text: finish the block, optionally leaving a gap.
    Paragraph { gap: bool },
    /// Block container.
    Block { prefixed: bool, list: bool, gap: bool },
    /// Link: append the footnote number.
    Link,
}

fn heading_level(style: StyleKey) -> Option<usize> {
    match style {
        StyleKey::H1 => Some(1),
        StyleKey::H2 => Some(2),
        StyleKey::H3 => Some(3),
        StyleKey::H4 => Some(4),
        _ => None,
    }
}

/// A `Renderer` producing wrapped plain text.
#[derive(Debug)]
pub struct TextRenderer<'s> {
    width: usize,
    styles: &'s StyleSheet,
    lines: Vec<String>,
    block: Option<WrappedBlock>,
    prefixes: Vec<&'static str>,
    frames: Vec<Frame>,
    links: Vec<String>,
    list_depth: usize,
    last_blank: bool,
}

impl<'s> TextRenderer<'s> {
    /// Construct a new empty TextRenderer wrapping at `width` columns.
    pub fn new(width: usize, styles: &'s StyleSheet) -> Result<TextRenderer<'s>> {
        if width == 0 {
            return Err(Error::TooNarrow);
        }
        Ok(TextRenderer {
            width,
            styles,
            lines: Vec::new(),
            block: None,
            prefixes: Vec::new(),
            frames: Vec::new(),
            links: Vec::new(),
            list_depth: 0,
            last_blank: false,
        })
    }

    fn prefix(&self) -> String {
        self.prefixes.concat()
    }

    /// The block currently being filled, started at the width left over by
    /// the current prefixes.
    fn current_block(&mut self) -> Result<&mut WrappedBlock> {
        if self.block.is_none() {
            let avail = self.width.saturating_sub(UnicodeWidthStr::width(self.prefix().as_str()));
            if avail == 0 {
                return Err(Error::TooNarrow);
            }
            self.block = Some(WrappedBlock::new(avail));
        }
        self.block.as_mut().ok_or(Error::Fail)
    }

    fn flush_block(&mut self) {
        if let Some(block) = self.block.take() {
            let prefix = self.prefix();
            for line in block.into_lines() {
                self.lines.push(format!("{}{}", prefix, line));
                self.last_blank = false;
            }
        }
    }

    fn add_gap(&mut self) {
        if !self.lines.is_empty() && !self.last_blank {
            self.lines.push(self.prefix().trim_end().to_string());
            self.last_blank = true;
        }
    }

    /// Emphasis marker for an inline style, from its font properties.
    fn marker(&self, style: Option<StyleKey>) -> &'static str {
        let Some(style) = style else {
            return "";
        };
        let resolved = self.styles.get(style);
        let bold = resolved.font_weight.map_or(false, |w| w >= 700);
        let italic = resolved.font_style == Some(FontStyle::Italic);
        match (bold, italic) {
            (true, true) => "***",
            (true, false) => "**",
            (false, true) => "*",
            (false, false) => "",
        }
    }

    /// Return the rendered text, followed by the link footnotes.
    pub fn into_string(mut self) -> Result<String> {
        self.flush_block();
        while self.last_blank {
            self.lines.pop();
            self.last_blank = self.lines.last().map_or(false, |l| l.trim().is_empty());
        }
        if !self.links.is_empty() {
            self.lines.push(String::new());
            for (i, href) in self.links.iter().enumerate() {
                self.lines.push(format!("[{}]: {}", i + 1, href));
            }
        }
        let mut result = String::new();
        for line in self.lines {
            result.push_str(&line);
            result.push('\n');
        }
        Ok(result)
    }
}

impl Renderer for TextRenderer<'_> {
    fn start_text(&mut self, style: Option<StyleKey>, lead: Option<&str>) -> Result<()> {
        let level = style.and_then(heading_level);
        if lead.is_some() || level.is_some() || style == Some(StyleKey::P) {
            self.flush_block();
            if let Some(level) = level {
                let prefix = format!("{} ", "#".repeat(level));
                self.current_block()?.add_text(&prefix);
            }
            if let Some(lead) = lead {
                self.current_block()?.add_text(lead);
            }
            self.frames.push(Frame::Paragraph {
                gap: lead.is_none(),
            });
        } else {
            let marker = self.marker(style);
            self.current_block()?.open_span(marker);
            self.frames.push(Frame::Inline(marker.to_string()));
        }
        Ok(())
    }

    fn end_text(&mut self) -> Result<()> {
        match self.frames.pop() {
            Some(Frame::Inline(marker)) => self.current_block()?.close_span(&marker, &marker),
            Some(Frame::Paragraph { gap }) => {
                self.flush_block();
                if gap {
                    self.add_gap();
                }
            }
            _ => {
                html_trace!("end_text: unbalanced text node");
                return Err(Error::Fail);
            }
        }
        Ok(())
    }

    fn start_block(&mut self, style: StyleKey) -> Result<()> {
        self.flush_block();
        let (prefix, list, gap) = match style {
            StyleKey::Blockquote => (Some("> "), false, true),
            StyleKey::List => {
                let nested = self.list_depth > 0;
                self.list_depth += 1;
                (if nested { Some("  ") } else { None }, true, !nested)
            }
            _ => (None, false, false),
        };
        if let Some(prefix) = prefix {
            self.prefixes.push(prefix);
        }
        self.frames.push(Frame::Block {
            prefixed: prefix.is_some(),
            list,
            gap,
        });
        Ok(())
    }

    fn end_block(&mut self) -> Result<()> {
        self.flush_block();
        match self.frames.pop() {
            Some(Frame::Block {
                prefixed,
                list,
                gap,
            }) => {
                if prefixed {
                    // A gap left inside the block belongs outside it.
                    if self.last_blank {
                        self.lines.pop();
                        self.last_blank = false;
                    }
                    self.prefixes.pop();
                }
                if list {
                    self.list_depth -= 1;
                }
                if gap {
                    self.add_gap();
                }
                Ok(())
            }
            _ => {
                html_trace!("end_block: unbalanced block");
                Err(Error::Fail)
            }
        }
    }

    fn start_link(&mut self, href: &str, _style: StyleKey) -> Result<()> {
        self.links.push(href.to_string());
        self.current_block()?.open_span("[");
        self.frames.push(Frame::Link);
        Ok(())
    }

    fn end_link(&mut self) -> Result<()> {
        let n = self.links.len();
        self.current_block()?
            .close_span("[", &format!("][{}]", n));
        match self.frames.pop() {
            Some(Frame::Link) => Ok(()),
            _ => Err(Error::Fail),
        }
    }

    fn add_text(&mut self, text: &str) -> Result<()> {
        self.current_block()?.add_text(text);
        Ok(())
    }

    fn add_image(
        &mut self,
        src: &str,
        _size: Option<StyleKey>,
        _align: Option<StyleKey>,
    ) -> Result<()> {
        self.flush_block();
        self.current_block()?.add_word_part(&format!("[image: {}]", src));
        self.flush_block();
        Ok(())
    }
}
