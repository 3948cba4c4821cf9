//! The style table referenced by layout nodes.
//!
//! Layout nodes never carry layout properties themselves; they carry a
//! [`StyleKey`], which is looked up in a [`StyleSheet`] by whatever ends up
//! paginating the document.  The default sheet matches the printed look of
//! the exam material, and individual entries can be overridden from TOML.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The semantic name of an entry in the style table.
///
/// Serialised (and looked up by name) in the camelCase convention used by the
/// table, eg `listItem` or `originalImageSize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKey {
    /// A whole page.
    Page,
    /// A horizontal band of a page.
    Section,
    /// The document title band.
    Title,
    /// The short description of an instruction.
    Instruction,
    /// A band of converted content.
    Content,
    /// A paragraph.
    P,
    /// Level 1 heading.
    H1,
    /// Level 2 heading.
    H2,
    /// Level 3 heading.
    H3,
    /// Level 4 heading.
    H4,
    /// A block quotation.
    Blockquote,
    /// A list container.
    List,
    /// A single list item.
    ListItem,
    /// A hyperlink.
    A,
    /// Bold text.
    Strong,
    /// Italic text.
    Em,
    /// Bold inside italic or italic inside bold.  The default entry is only
    /// italic.
    StrongEm,
    /// Image size selected by `image-size-small`.
    SmallImageSize,
    /// Image size selected by `image-size-large`.
    LargeImageSize,
    /// Image size selected by `image-size-original`.
    OriginalImageSize,
    /// Image alignment selected by `image-align-left`.
    LeftImageAlign,
    /// Image alignment selected by `image-align-center`.
    CenterImageAlign,
    /// A single item in a list of content.
    ContentItem,
    /// A content item separated from the previous one by a rule.
    ContentItemWithBorder,
    /// The logo at the foot of a page.
    FooterImage,
}

impl StyleKey {
    /// Every key, in table order.
    pub const ALL: [StyleKey; 25] = [
        StyleKey::Page,
        StyleKey::Section,
        StyleKey::Title,
        StyleKey::Instruction,
        StyleKey::Content,
        StyleKey::P,
        StyleKey::H1,
        StyleKey::H2,
        StyleKey::H3,
        StyleKey::H4,
        StyleKey::Blockquote,
        StyleKey::List,
        StyleKey::ListItem,
        StyleKey::A,
        StyleKey::Strong,
        StyleKey::Em,
        StyleKey::StrongEm,
        StyleKey::SmallImageSize,
        StyleKey::LargeImageSize,
        StyleKey::OriginalImageSize,
        StyleKey::LeftImageAlign,
        StyleKey::CenterImageAlign,
        StyleKey::ContentItem,
        StyleKey::ContentItemWithBorder,
        StyleKey::FooterImage,
    ];

    /// The name of this entry in the style table.
    pub fn name(self) -> &'static str {
        use StyleKey::*;
        match self {
            Page => "page",
            Section => "section",
            Title => "title",
            Instruction => "instruction",
            Content => "content",
            P => "p",
            H1 => "h1",
            H2 => "h2",
            H3 => "h3",
            H4 => "h4",
            Blockquote => "blockquote",
            List => "list",
            ListItem => "listItem",
            A => "a",
            Strong => "strong",
            Em => "em",
            StrongEm => "strongEm",
            SmallImageSize => "smallImageSize",
            LargeImageSize => "largeImageSize",
            OriginalImageSize => "originalImageSize",
            LeftImageAlign => "leftImageAlign",
            CenterImageAlign => "centerImageAlign",
            ContentItem => "contentItem",
            ContentItemWithBorder => "contentItemWithBorder",
            FooterImage => "footerImage",
        }
    }

    /// Look up a key by its table name.
    pub fn from_name(name: &str) -> Option<StyleKey> {
        StyleKey::ALL.iter().copied().find(|key| key.name() == name)
    }

    /// The heading style for `<h1>`..`<h4>`.
    pub fn heading(level: usize) -> Option<StyleKey> {
        match level {
            1 => Some(StyleKey::H1),
            2 => Some(StyleKey::H2),
            3 => Some(StyleKey::H3),
            4 => Some(StyleKey::H4),
            _ => None,
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An RGB colour value
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    /// Red value
    pub r: u8,
    /// Green value
    pub g: u8,
    /// Blue value
    pub b: u8,
}

impl Colour {
    const fn rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b }
    }
}

impl FromStr for Colour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Colour> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| Error::StyleSheet(format!("invalid colour `{}`", s)))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| Error::StyleSheet(format!("invalid colour `{}`", s)))
        };
        Ok(Colour::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Colour {
    type Error = Error;

    fn try_from(s: String) -> Result<Colour> {
        s.parse()
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> String {
        c.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// Colours of the application theme.
const WHITE: Colour = Colour::rgb(0xff, 0xff, 0xff);
const GREEN_PRIMARY: Colour = Colour::rgb(0x3a, 0x7a, 0x10);
const GRAY_SECONDARY: Colour = Colour::rgb(0x6f, 0x6f, 0x6f);
const GRAY_SEPARATOR: Colour = Colour::rgb(0xd8, 0xd8, 0xd8);

/// A length: points, a percentage of the containing box, or `auto`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DimensionRepr", into = "DimensionRepr")]
pub enum Dimension {
    /// An absolute length in points.
    Points(f32),
    /// A percentage of the containing box.
    Percent(f32),
    /// Let the layout engine decide (used for centring).
    Auto,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f32),
    Text(String),
}

impl TryFrom<DimensionRepr> for Dimension {
    type Error = Error;

    fn try_from(repr: DimensionRepr) -> Result<Dimension> {
        match repr {
            DimensionRepr::Number(n) => Ok(Dimension::Points(n)),
            DimensionRepr::Text(s) if s == "auto" => Ok(Dimension::Auto),
            DimensionRepr::Text(s) => s
                .strip_suffix('%')
                .and_then(|n| n.trim().parse().ok())
                .map(Dimension::Percent)
                .ok_or_else(|| Error::StyleSheet(format!("invalid dimension `{}`", s))),
        }
    }
}

impl From<Dimension> for DimensionRepr {
    fn from(d: Dimension) -> DimensionRepr {
        match d {
            Dimension::Points(n) => DimensionRepr::Number(n),
            Dimension::Percent(n) => DimensionRepr::Text(format!("{}%", n)),
            Dimension::Auto => DimensionRepr::Text("auto".into()),
        }
    }
}

/// Italic or upright text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[allow(missing_docs)]
    Normal,
    #[allow(missing_docs)]
    Italic,
}

/// Horizontal alignment of text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Center,
    #[allow(missing_docs)]
    Right,
    #[allow(missing_docs)]
    Justify,
}

/// The main axis of a block's children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    #[allow(missing_docs)]
    Row,
    #[allow(missing_docs)]
    Column,
}

/// Positioning scheme of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[allow(missing_docs)]
    Relative,
    #[allow(missing_docs)]
    Absolute,
}

/// A solid border along one edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Width in points.
    pub width: f32,
    /// Border colour.
    pub color: Colour,
}

/// The layout properties of one style table entry.  Unset properties are
/// inherited from (or defaulted by) the layout engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
#[allow(missing_docs)]
pub struct Style {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub color: Option<Colour>,
    pub background_color: Option<Colour>,
    pub flex_direction: Option<FlexDirection>,
    pub padding_top: Option<f32>,
    pub padding_bottom: Option<f32>,
    pub padding_left: Option<f32>,
    pub padding_right: Option<f32>,
    pub margin_top: Option<Dimension>,
    pub margin_bottom: Option<Dimension>,
    pub margin_left: Option<Dimension>,
    pub margin_right: Option<Dimension>,
    pub width: Option<Dimension>,
    pub border_top: Option<Border>,
    pub border_left: Option<Border>,
    pub position: Option<Position>,
    pub bottom: Option<f32>,
}

macro_rules! merge_fields {
    ($dst:expr, $src:expr, $( $field:ident ),*) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )*
    };
}

impl Style {
    /// Overwrite every property which is set in `other`.
    pub fn merge(&mut self, other: &Style) {
        merge_fields!(
            self,
            other,
            font_family,
            font_size,
            font_weight,
            font_style,
            text_align,
            color,
            background_color,
            flex_direction,
            padding_top,
            padding_bottom,
            padding_left,
            padding_right,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
            width,
            border_top,
            border_left,
            position,
            bottom
        );
    }

    /// Returns true if no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }

    fn padding_vertical(mut self, v: f32) -> Style {
        self.padding_top = Some(v);
        self.padding_bottom = Some(v);
        self
    }

    fn font(mut self, size: Option<f32>, weight: u16) -> Style {
        self.font_size = size;
        self.font_weight = Some(weight);
        self
    }
}

/// A complete style table.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSheet {
    entries: HashMap<StyleKey, Style>,
}

impl StyleSheet {
    /// Return the entry for `key`.  Every key has an entry, although it may
    /// be empty.
    pub fn get(&self, key: StyleKey) -> &Style {
        static EMPTY: Style = Style {
            font_family: None,
            font_size: None,
            font_weight: None,
            font_style: None,
            text_align: None,
            color: None,
            background_color: None,
            flex_direction: None,
            padding_top: None,
            padding_bottom: None,
            padding_left: None,
            padding_right: None,
            margin_top: None,
            margin_bottom: None,
            margin_left: None,
            margin_right: None,
            width: None,
            border_top: None,
            border_left: None,
            position: None,
            bottom: None,
        };
        self.entries.get(&key).unwrap_or(&EMPTY)
    }

    /// Look up an entry by its table name.
    pub fn get_by_name(&self, name: &str) -> Option<&Style> {
        StyleKey::from_name(name).map(|key| self.get(key))
    }

    /// Combine several entries, later ones taking precedence.
    pub fn resolve(&self, keys: &[StyleKey]) -> Style {
        keys.iter().fold(Style::default(), |mut style, key| {
            style.merge(self.get(*key));
            style
        })
    }

    /// Replace a single entry.
    pub fn set(&mut self, key: StyleKey, style: Style) {
        self.entries.insert(key, style);
    }

    /// Apply overrides from a TOML document with one table per entry, eg:
    ///
    /// ```toml
    /// [h1]
    /// fontSize = 18
    ///
    /// [centerImageAlign]
    /// marginLeft = "auto"
    /// ```
    ///
    /// Properties given in the TOML replace the existing ones; the others are
    /// kept.
    pub fn with_overrides_toml(mut self, input: &str) -> Result<StyleSheet> {
        let overrides: HashMap<String, Style> =
            toml::from_str(input).map_err(|e| Error::StyleSheet(e.to_string()))?;
        for (name, style) in overrides {
            let key = StyleKey::from_name(&name)
                .ok_or_else(|| Error::StyleSheet(format!("unknown style `{}`", name)))?;
            html_trace!("style override for {}: {:?}", key, style);
            self.entries.entry(key).or_default().merge(&style);
        }
        Ok(self)
    }
}

impl Default for StyleSheet {
    fn default() -> StyleSheet {
        use StyleKey::*;

        let separator = Border {
            width: 1.0,
            color: GRAY_SEPARATOR,
        };
        let mut entries = HashMap::new();
        entries.insert(
            Page,
            Style {
                flex_direction: Some(FlexDirection::Column),
                background_color: Some(WHITE),
                font_family: Some("Open Sans".into()),
                ..Style::default()
            }
            .font(Some(10.0), 400)
            .padding_vertical(30.0),
        );
        entries.insert(
            Section,
            Style {
                padding_left: Some(35.0),
                padding_right: Some(50.0),
                width: Some(Dimension::Percent(100.0)),
                ..Style::default()
            },
        );
        entries.insert(
            Title,
            Style::default().padding_vertical(15.0).font(Some(14.0), 600),
        );
        entries.insert(Instruction, Style::default());
        entries.insert(
            Content,
            Style {
                border_top: Some(separator),
                ..Style::default()
            }
            .padding_vertical(15.0),
        );
        entries.insert(P, Style::default().padding_vertical(5.0));
        entries.insert(
            H1,
            Style {
                text_align: Some(TextAlign::Justify),
                ..Style::default()
            }
            .font(Some(16.0), 600),
        );
        entries.insert(H2, Style::default().font(Some(14.0), 600));
        entries.insert(H3, Style::default().font(Some(13.0), 600));
        entries.insert(H4, Style::default().font(None, 500));
        entries.insert(
            Blockquote,
            Style {
                border_left: Some(Border {
                    width: 1.0,
                    color: GRAY_SECONDARY,
                }),
                padding_left: Some(10.0),
                ..Style::default()
            },
        );
        entries.insert(
            List,
            Style {
                margin_left: Some(Dimension::Points(8.0)),
                ..Style::default()
            },
        );
        entries.insert(
            ListItem,
            Style {
                flex_direction: Some(FlexDirection::Column),
                ..Style::default()
            },
        );
        entries.insert(
            A,
            Style {
                color: Some(GREEN_PRIMARY),
                ..Style::default()
            },
        );
        entries.insert(Strong, Style::default().font(None, 700));
        let italic = Style {
            font_style: Some(FontStyle::Italic),
            ..Style::default()
        };
        entries.insert(Em, italic.clone());
        entries.insert(StrongEm, italic);
        for (key, width) in [
            (SmallImageSize, 300.0),
            (LargeImageSize, 768.0),
            (OriginalImageSize, 350.0),
        ] {
            entries.insert(
                key,
                Style {
                    width: Some(Dimension::Points(width)),
                    ..Style::default()
                },
            );
        }
        entries.insert(LeftImageAlign, Style::default());
        entries.insert(
            CenterImageAlign,
            Style {
                margin_left: Some(Dimension::Auto),
                margin_right: Some(Dimension::Auto),
                ..Style::default()
            },
        );
        entries.insert(
            ContentItem,
            Style {
                padding_bottom: Some(10.0),
                ..Style::default()
            },
        );
        entries.insert(
            ContentItemWithBorder,
            Style {
                border_top: Some(separator),
                padding_top: Some(10.0),
                ..Style::default()
            },
        );
        entries.insert(
            FooterImage,
            Style {
                position: Some(Position::Absolute),
                width: Some(Dimension::Points(200.0)),
                bottom: Some(20.0),
                ..Style::default()
            },
        );
        StyleSheet { entries }
    }
}
