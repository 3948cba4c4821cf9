//! Printable documents made from converted content.
//!
//! A [`Document`] is a list of A4 pages, each a column of [`Section`]s.  The
//! builders here put together the two kinds of printable content: assignments
//! and instructions.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutNode;
use crate::style::StyleKey;
use crate::{convert, Result};

/// The language content is printed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Finnish
    Fi,
    /// Swedish
    Sv,
}

/// The exam a piece of content belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exam {
    #[allow(missing_docs)]
    Suko,
    #[allow(missing_docs)]
    Ld,
    #[allow(missing_docs)]
    Puhvi,
}

/// An assignment, as delivered by the content API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Assignment {
    pub name_fi: String,
    pub name_sv: String,
    /// Content blocks, each an HTML fragment.
    pub content_fi: Vec<String>,
    pub content_sv: Vec<String>,
    pub instruction_fi: String,
    pub instruction_sv: String,
}

/// An instruction, as delivered by the content API.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Instruction {
    pub exam: Exam,
    #[serde(default)]
    pub name_fi: String,
    #[serde(default)]
    pub name_sv: String,
    #[serde(default)]
    pub content_fi: String,
    #[serde(default)]
    pub content_sv: String,
    #[serde(default)]
    pub short_description_fi: Option<String>,
    #[serde(default)]
    pub short_description_sv: Option<String>,
}

fn pick<T>(language: Language, fi: T, sv: T) -> T {
    match language {
        Language::Fi => fi,
        Language::Sv => sv,
    }
}

/// Page sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PageSize {
    /// ISO A4
    A4,
}

/// A horizontal band of a page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    /// Style table entries, later ones taking precedence.
    pub styles: Vec<StyleKey>,
    /// Whether the section may be split across pages.
    pub wrap: bool,
    /// The content of the section.
    pub content: Vec<LayoutNode>,
}

/// A single page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    #[allow(missing_docs)]
    pub size: PageSize,
    #[allow(missing_docs)]
    pub style: StyleKey,
    #[allow(missing_docs)]
    pub sections: Vec<Section>,
}

/// A printable document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    /// Document title (also printed in the title section).
    pub title: String,
    #[allow(missing_docs)]
    pub pages: Vec<Page>,
}

/// Settings shared by the document builders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Title used when the content's name in the chosen language is empty.
    pub fallback_title: String,
    /// Image shown at the foot of assignment documents.
    pub footer_logo: Option<String>,
}

impl Default for DocumentOptions {
    fn default() -> DocumentOptions {
        DocumentOptions {
            fallback_title: "Nimetön".to_string(),
            footer_logo: None,
        }
    }
}

impl DocumentOptions {
    fn title(&self, name: &str) -> String {
        if name.is_empty() {
            self.fallback_title.clone()
        } else {
            name.to_string()
        }
    }
}

fn section(styles: &[StyleKey], wrap: bool, content: Vec<LayoutNode>) -> Section {
    Section {
        styles: styles.to_vec(),
        wrap,
        content,
    }
}

fn title_section(title: &str) -> Section {
    section(
        &[StyleKey::Section, StyleKey::Title],
        false,
        vec![LayoutNode::StyledText {
            style: None,
            lead: None,
            children: vec![LayoutNode::text(title)],
        }],
    )
}

fn single_page(title: String, sections: Vec<Section>) -> Document {
    Document {
        title,
        pages: vec![Page {
            size: PageSize::A4,
            style: StyleKey::Page,
            sections,
        }],
    }
}

/// Build the document for an assignment: title, instruction, the content
/// blocks in order, and the footer logo if one is configured.
///
/// Fails with the first conversion error; nothing is produced in that case.
pub fn assignment_document(
    assignment: &Assignment,
    language: Language,
    options: &DocumentOptions,
) -> Result<Document> {
    let title = options.title(pick(language, &assignment.name_fi, &assignment.name_sv));
    let instruction = convert(pick(
        language,
        &assignment.instruction_fi,
        &assignment.instruction_sv,
    ))?;
    let mut content = Vec::new();
    for block in pick(language, &assignment.content_fi, &assignment.content_sv) {
        content.extend(convert(block)?);
    }

    let mut sections = vec![
        title_section(&title),
        section(&[StyleKey::Section, StyleKey::Content], true, instruction),
        section(&[StyleKey::Section, StyleKey::Content], true, content),
    ];
    if let Some(logo) = &options.footer_logo {
        sections.push(section(
            &[StyleKey::Section, StyleKey::FooterImage],
            false,
            vec![LayoutNode::Image {
                src: logo.clone(),
                size: None,
                align: None,
            }],
        ));
    }
    Ok(single_page(title, sections))
}

/// Build the document for an instruction: title, the short description (for
/// SUKO and PUHVI instructions, even when it is missing) and the content.
pub fn instruction_document(
    instruction: &Instruction,
    language: Language,
    options: &DocumentOptions,
) -> Result<Document> {
    let title = options.title(pick(language, &instruction.name_fi, &instruction.name_sv));
    let content = convert(pick(
        language,
        &instruction.content_fi,
        &instruction.content_sv,
    ))?;

    let mut sections = vec![title_section(&title)];
    if matches!(instruction.exam, Exam::Suko | Exam::Puhvi) {
        let description = pick(
            language,
            &instruction.short_description_fi,
            &instruction.short_description_sv,
        );
        sections.push(section(
            &[StyleKey::Section, StyleKey::Instruction],
            false,
            vec![LayoutNode::StyledText {
                style: None,
                lead: None,
                children: description.iter().map(LayoutNode::text).collect(),
            }],
        ));
    }
    sections.push(section(
        &[StyleKey::Section, StyleKey::Content],
        true,
        content,
    ));
    Ok(single_page(title, sections))
}

/// Like [`assignment_document`], but a failure is logged and reported as
/// `None`.
pub fn generate_assignment_document(
    assignment: &Assignment,
    language: Language,
    options: &DocumentOptions,
) -> Option<Document> {
    match assignment_document(assignment, language, options) {
        Ok(document) => {
            log::debug!("generated assignment document {:?}", document.title);
            Some(document)
        }
        Err(e) => {
            log::error!("could not generate assignment document: {}", e);
            None
        }
    }
}

/// Like [`instruction_document`], but a failure is logged and reported as
/// `None`.
pub fn generate_instruction_document(
    instruction: &Instruction,
    language: Language,
    options: &DocumentOptions,
) -> Option<Document> {
    match instruction_document(instruction, language, options) {
        Ok(document) => {
            log::debug!("generated instruction document {:?}", document.title);
            Some(document)
        }
        Err(e) => {
            log::error!("could not generate instruction document: {}", e);
            None
        }
    }
}
