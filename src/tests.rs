use crate::document::{
    self, Assignment, DocumentOptions, Exam, Instruction, Language, PageSize,
};
use crate::layout::LayoutNode;
use crate::render::markup::MarkupRenderer;
use crate::render::render_nodes;
use crate::render::text_renderer::TextRenderer;
use crate::style::{Colour, Dimension, FontStyle, StyleKey, StyleSheet};
use crate::{config, convert, Error, HtmlContext};

use super::{from_read, markup_from_read};

/// Like assert_eq!(), but prints out the results normally as well
macro_rules! assert_eq_str {
    ($a:expr, $b:expr) => {
        if $a != $b {
            println!("<<<\n{}===\n{}>>>", $a, $b);
            assert_eq!($a, $b);
        }
    };
}
#[track_caller]
fn test_html(input: &[u8], expected: &str) {
    let output = markup_from_read(input).unwrap();
    assert_eq_str!(output, expected);
}
#[track_caller]
fn test_html_text(input: &[u8], expected: &str, width: usize) {
    let output = from_read(input, width).unwrap();
    assert_eq_str!(output, expected);
}
#[track_caller]
fn test_html_conf<F>(input: &[u8], expected: &str, width: usize, conf: F)
where
    F: Fn(config::Config) -> config::Config,
{
    let result = conf(config::default())
        .string_from_read(input, width)
        .unwrap();
    assert_eq_str!(result, expected);
}
#[track_caller]
fn test_html_err(input: &[u8], expected: Error) {
    match markup_from_read(input) {
        Err(e) => {
            assert_eq!(e, expected);
        }
        Ok(text) => {
            panic!("Expected error, got: [[{}]]", text);
        }
    }
}

fn styled(style: StyleKey, children: Vec<LayoutNode>) -> LayoutNode {
    LayoutNode::StyledText {
        style: Some(style),
        lead: None,
        children,
    }
}

#[test]
fn test_h1() {
    test_html(
        br#"<h1 class="tiptap-text-h1">h1</h1>"#,
        r#"<Text style="h1">
  <Text>h1</Text>
</Text>
"#,
    );
}

#[test]
fn test_para_with_bold() {
    test_html(
        b"<p>paragraph<strong>strong</strong><em>italic</em>paragraph</p>",
        r#"<Text style="p">
  <Text>paragraph</Text>
  <Text style="strong">
    <Text>strong</Text>
  </Text>
  <Text style="em">
    <Text>italic</Text>
  </Text>
  <Text>paragraph</Text>
</Text>
"#,
    );
}

#[test]
fn test_plain_text() {
    test_html(b"hello world", "<Text>hello world</Text>\n");
    assert_eq!(
        convert("hello world").unwrap(),
        vec![LayoutNode::text("hello world")]
    );
}

#[test]
fn test_empty() {
    assert_eq!(convert("").unwrap(), vec![]);
    test_html(b"", "");
}

#[test]
fn test_empty_para() {
    test_html(b"<p></p>", "<Text style=\"p\"/>\n");
}

#[test]
fn test_various_elements() {
    test_html(
        concat!(
            "<h1 class='tiptap-text-h1'>h1</h1>",
            "<h2 class='tiptap-text-h2'>h2</h2>",
            "<h3 class='tiptap-text-h3'>h3</h3>",
            "<h4 class='tiptap-text-h4'>h4</h4>",
            "<ul class='tiptap-bullet-list'><li><p>ul li 1</p></li><li><p>ul li 2</p></li></ul>",
            "<ol class='tiptap-bullet-list'><li><p>ol li 1</p></li><li><p>ol li 2</p></li></ol>",
            "<blockquote class='tiptap-blockquote'><p>blockquote</p></blockquote>",
            "<p><a target='_blank' rel='noopener noreferrer nofollow' class='tiptap-link' ",
            "href='https://oph.fi'>oph.fi</a></p>",
            "<img src='/api/image' alt='test image' ",
            "class='tiptap-image-size-original tiptap-image-align-center'>"
        )
        .as_bytes(),
        r#"<Text style="h1">
  <Text>h1</Text>
</Text>
<Text style="h2">
  <Text>h2</Text>
</Text>
<Text style="h3">
  <Text>h3</Text>
</Text>
<Text style="h4">
  <Text>h4</Text>
</Text>
<View style="list">
  <View style="listItem">
    <Text>
      {"• "}
      <Text>ul li 1</Text>
    </Text>
  </View>
  <View style="listItem">
    <Text>
      {"• "}
      <Text>ul li 2</Text>
    </Text>
  </View>
</View>
<View style="list">
  <View style="listItem">
    <Text>
      {"1. "}
      <Text>ol li 1</Text>
    </Text>
  </View>
  <View style="listItem">
    <Text>
      {"2. "}
      <Text>ol li 2</Text>
    </Text>
  </View>
</View>
<View style="blockquote">
  <Text style="p">
    <Text>blockquote</Text>
  </Text>
</View>
<Text style="p">
  <Link src="https://oph.fi" style="a">
    <Text>oph.fi</Text>
  </Link>
</Text>
<Image src="/api/image" style="originalImageSize centerImageAlign"/>
"#,
    );
}

#[test]
fn test_nested_lists() {
    test_html(
        concat!(
            "<ul class='tiptap-bullet-list'><li><p>ul li 1</p>",
            "<ol class='tiptap-numbered-list'><li><p>ol li 1</p></li>",
            "<ol class='tiptap-numbered-list'><li><p>ol li 1</p></li></ol>",
            "</ol></li></ul>"
        )
        .as_bytes(),
        r#"<View style="list">
  <View style="listItem">
    <Text>
      {"• "}
      <Text>ul li 1</Text>
    </Text>
    <View style="list">
      <View style="listItem">
        <Text>
          {"1. "}
          <Text>ol li 1</Text>
        </Text>
      </View>
      <View style="list">
        <View style="listItem">
          <Text>
            {"1. "}
            <Text>ol li 1</Text>
          </Text>
        </View>
      </View>
    </View>
  </View>
</View>
"#,
    );
}

#[test]
fn test_complex_assignment() {
    test_html(
        concat!(
            "<h1 class='tiptap-text-h1'>Assignment Title</h1>",
            "<p class='tiptap-paragraph'>This is an <strong>important</strong> assignment ",
            "with various <em>text stylings</em>.</p>",
            "<ul class='tiptap-bullet-list'><li><p>First bullet point</p></li>",
            "<li><p>Second bullet point with a <a href='https://example.com'>link</a></p></li></ul>",
            "<p class='tiptap-paragraph'>Here is an image:</p>",
            "<img src='/path/to/image.jpg' alt='Descriptive Image' ",
            "class='tiptap-image-size-original tiptap-image-align-center'>",
            "<blockquote class='tiptap-blockquote'><h1>Quote header</h1>",
            "<p>A meaningful quote.</p>",
            "<p>A meaningful quote with a strong <strong>message</strong>.</p>",
            "<ul class='tiptap-bullet-list'><li><p>First bullet point</p></li>",
            "<li><p>Second bullet point with a <a href='https://example.com'>link</a></p></li></ul>",
            "</blockquote>"
        )
        .as_bytes(),
        r#"<Text style="h1">
  <Text>Assignment Title</Text>
</Text>
<Text style="p">
  <Text>This is an </Text>
  <Text style="strong">
    <Text>important</Text>
  </Text>
  <Text> assignment with various </Text>
  <Text style="em">
    <Text>text stylings</Text>
  </Text>
  <Text>.</Text>
</Text>
<View style="list">
  <View style="listItem">
    <Text>
      {"• "}
      <Text>First bullet point</Text>
    </Text>
  </View>
  <View style="listItem">
    <Text>
      {"• "}
      <Text>Second bullet point with a </Text>
      <Link src="https://example.com" style="a">
        <Text>link</Text>
      </Link>
    </Text>
  </View>
</View>
<Text style="p">
  <Text>Here is an image:</Text>
</Text>
<Image src="/path/to/image.jpg" style="originalImageSize centerImageAlign"/>
<View style="blockquote">
  <Text style="h1">
    <Text>Quote header</Text>
  </Text>
  <Text style="p">
    <Text>A meaningful quote.</Text>
  </Text>
  <Text style="p">
    <Text>A meaningful quote with a strong </Text>
    <Text style="strong">
      <Text>message</Text>
    </Text>
    <Text>.</Text>
  </Text>
  <View style="list">
    <View style="listItem">
      <Text>
        {"• "}
        <Text>First bullet point</Text>
      </Text>
    </View>
    <View style="listItem">
      <Text>
        {"• "}
        <Text>Second bullet point with a </Text>
        <Link src="https://example.com" style="a">
          <Text>link</Text>
        </Link>
      </Text>
    </View>
  </View>
</View>
"#,
    );
}

#[test]
fn test_strong_italic() {
    test_html(
        b"<p><em>foo </em><strong><em>bar</em></strong><em> baz</em><em><strong>bar</strong></em></p>",
        r#"<Text style="p">
  <Text style="em">
    <Text>foo </Text>
  </Text>
  <Text style="strong">
    <Text style="strongEm">
      <Text>bar</Text>
    </Text>
  </Text>
  <Text style="em">
    <Text> baz</Text>
  </Text>
  <Text style="em">
    <Text style="strongEm">
      <Text>bar</Text>
    </Text>
  </Text>
</Text>
"#,
    );
}

#[test]
fn test_b_and_i() {
    test_html(
        b"<p><i>foo</i><b>bar</b></p>",
        r#"<Text style="p">
  <Text style="em">
    <Text>foo</Text>
  </Text>
  <Text style="strong">
    <Text>bar</Text>
  </Text>
</Text>
"#,
    );
}

#[test]
fn test_merge_uses_closest_span_only() {
    // The innermost <strong> only sees the <em> around it.
    let nodes = convert("<strong><em><strong>x</strong></em></strong>").unwrap();
    assert_eq!(
        nodes,
        vec![styled(
            StyleKey::Strong,
            vec![styled(
                StyleKey::StrongEm,
                vec![styled(StyleKey::StrongEm, vec![LayoutNode::text("x")])]
            )]
        )]
    );

    let nodes = convert("<b><strong>x</strong></b>").unwrap();
    assert_eq!(
        nodes,
        vec![styled(
            StyleKey::Strong,
            vec![styled(StyleKey::Strong, vec![LayoutNode::text("x")])]
        )]
    );
}

#[test]
fn test_list_positions_restart() {
    let nodes = convert(concat!(
        "<ol><li><p>a</p></li><li><p>b</p></li>",
        "<li><p>c</p><ol><li><p>d</p></li></ol></li></ol>"
    ))
    .unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].plain_text(), "1. a2. b3. c1. d");
}

#[test]
fn test_list_positions_count_all_children() {
    // Whitespace between items is a child node too.
    let nodes = convert("<ol>\n<li><p>a</p></li></ol>").unwrap();
    assert_eq!(nodes[0].children()[0], LayoutNode::text("\n"));
    assert_eq!(nodes[0].plain_text(), "\n2. a");
}

#[test]
fn test_list_does_not_inherit_text_style() {
    let nodes = convert("<em><ul><li><p><strong>x</strong></p></li></ul></em>").unwrap();
    let strong = &nodes[0].children()[0].children()[0].children()[0].children()[0];
    assert_eq!(strong.style(), Some(StyleKey::Strong));
}

#[test]
fn test_blockquote_resets_context() {
    let nodes = convert("<ul><li><blockquote><p>q</p></blockquote></li></ul>").unwrap();
    let quote = &nodes[0].children()[0].children()[0];
    assert_eq!(quote.style(), Some(StyleKey::Blockquote));
    assert_eq!(
        quote.children(),
        &[styled(StyleKey::P, vec![LayoutNode::text("q")])]
    );
}

#[test]
fn test_image_classes() {
    let nodes = convert(
        "<img src='a.png' class='tiptap-image-size-small tiptap-image-align-left'>",
    )
    .unwrap();
    assert_eq!(
        nodes,
        vec![LayoutNode::Image {
            src: "a.png".into(),
            size: Some(StyleKey::SmallImageSize),
            align: Some(StyleKey::LeftImageAlign),
        }]
    );

    let nodes = convert("<img src='a.png' class='image-size-large'>").unwrap();
    assert_eq!(nodes[0].style(), Some(StyleKey::LargeImageSize));
}

#[test]
fn test_image_without_classes() {
    let expected = vec![LayoutNode::Image {
        src: "a.png".into(),
        size: None,
        align: None,
    }];
    assert_eq!(convert("<img src='a.png'>").unwrap(), expected);
    assert_eq!(
        convert("<img src='a.png' class='tiptap-image-size-huge rounded'>").unwrap(),
        expected
    );
    test_html(b"<img src='a.png'>", "<Image src=\"a.png\"/>\n");
}

#[test]
fn test_link_without_href() {
    assert_eq!(
        convert("<a>x</a>").unwrap(),
        vec![LayoutNode::Link {
            href: String::new(),
            style: StyleKey::A,
            children: vec![LayoutNode::text("x")],
        }]
    );
}

#[test]
fn test_entities() {
    assert_eq!(
        convert("<p>a &amp; b</p>").unwrap(),
        vec![styled(StyleKey::P, vec![LayoutNode::text("a & b")])]
    );
}

#[test]
fn test_unsupported_element() {
    test_html_err(b"<table></table>", Error::UnsupportedElement("table".into()));
    test_html_err(
        b"<p>ok</p><p><span>no</span></p>",
        Error::UnsupportedElement("span".into()),
    );
    assert_eq!(
        Error::UnsupportedElement("table".into()).to_string(),
        "Couldn't handle element type: table"
    );
}

#[test]
fn test_head_elements_reported() {
    test_html_err(
        b"<title>Title</title><p>body</p>",
        Error::UnsupportedElement("title".into()),
    );
}

#[test]
fn test_comment() {
    test_html_err(
        b"<p>a</p><!-- note -->",
        Error::UnsupportedNode("comment".into()),
    );
    test_html_err(
        b"<!-- note --><p>a</p>",
        Error::UnsupportedNode("comment".into()),
    );
}

#[test]
fn test_orphan_list_item() {
    match convert("<li><p>lost</p></li>") {
        Err(Error::Structural(_)) => {}
        other => panic!("Expected structural error, got {:?}", other),
    }
}

#[test]
fn test_convert_node_in_context() {
    let dom = crate::parse_html("<p>x</p>".as_bytes()).unwrap();
    let handle = crate::content_nodes(&dom).remove(0);
    let context = HtmlContext {
        list: Some(crate::ListContext {
            kind: crate::ListKind::Ordered,
            position: 7,
        }),
        text_style: None,
    };
    let node = crate::convert_node(handle, context).unwrap();
    assert_eq!(node.plain_text(), "7. x");
    assert_eq!(node.style(), None);
}

#[test]
fn test_layout_json() {
    let nodes = convert("<h1>T</h1><img src='a.png' class='image-align-center'>").unwrap();
    let json = serde_json::to_value(&nodes).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {
                "type": "styledText",
                "style": "h1",
                "children": [{ "type": "textRun", "text": "T" }]
            },
            { "type": "image", "src": "a.png", "align": "centerImageAlign" }
        ])
    );
}

#[test]
fn test_render_nodes_directly() {
    let nodes = vec![LayoutNode::StyledBlock {
        style: StyleKey::ContentItem,
        children: vec![LayoutNode::text("a")],
    }];
    let mut renderer = MarkupRenderer::new();
    render_nodes(&mut renderer, &nodes).unwrap();
    let output = renderer.into_string();
    assert_eq_str!(
        output,
        r#"<View style="contentItem">
  <Text>a</Text>
</View>
"#
    );
}

#[test]
fn test_text_para() {
    test_html_text(
        concat!(
            "<h1>Title</h1><p>Some <strong>bold</strong> and <em>italic</em> text.</p>",
            "<ul><li><p>one</p></li><li><p>two</p></li></ul>"
        )
        .as_bytes(),
        r#"# Title

Some **bold** and *italic* text.

• one
• two
"#,
        40,
    );
}

#[test]
fn test_text_wrap() {
    test_html_text(
        b"<p>The quick brown fox jumps over the lazy dog</p>",
        "The quick brown fox\njumps over the lazy\ndog\n",
        20,
    );
}

#[test]
fn test_text_long_word() {
    test_html_text(b"<p>abcdefgh</p>", "abc\ndef\ngh\n", 3);
}

#[test]
fn test_text_links() {
    test_html_text(
        br#"<p>See <a href="https://oph.fi">oph.fi</a> now</p>"#,
        "See [oph.fi][1] now\n\n[1]: https://oph.fi\n",
        80,
    );
}

#[test]
fn test_text_blockquote() {
    test_html_text(
        b"<blockquote><p>quoted text</p></blockquote><p>after</p>",
        "> quoted text\n\nafter\n",
        40,
    );
}

#[test]
fn test_text_nested_list() {
    test_html_text(
        b"<ul><li><p>a</p><ol><li><p>b</p></li></ol></li></ul>",
        "• a\n  1. b\n",
        40,
    );
}

#[test]
fn test_text_image() {
    test_html_text(b"<img src='/api/image'>", "[image: /api/image]\n", 40);
}

#[test]
fn test_text_too_narrow() {
    assert_eq!(from_read(&b"<p>x</p>"[..], 0), Err(Error::TooNarrow));
    assert_eq!(
        from_read(
            &b"<blockquote><blockquote><p>x</p></blockquote></blockquote>"[..],
            2
        ),
        Err(Error::TooNarrow)
    );
    let styles = StyleSheet::default();
    assert!(matches!(TextRenderer::new(0, &styles), Err(Error::TooNarrow)));
}

#[test]
fn test_text_follows_style_overrides() {
    test_html_conf(
        b"<p><strong>x</strong> <em>y</em></p>",
        "x *y*\n",
        20,
        |conf| {
            conf.style_overrides_toml("[strong]\nfontWeight = 400\n")
                .unwrap()
        },
    );
}

#[test]
fn test_default_styles() {
    let styles = crate::default_styles();
    for key in StyleKey::ALL {
        assert_eq!(StyleKey::from_name(key.name()), Some(key));
    }
    assert_eq!(styles.get(StyleKey::Strong).font_weight, Some(700));
    assert_eq!(styles.get(StyleKey::Em).font_style, Some(FontStyle::Italic));
    assert_eq!(styles.get(StyleKey::StrongEm).font_weight, None);
    assert_eq!(
        styles.get(StyleKey::StrongEm).font_style,
        Some(FontStyle::Italic)
    );
    assert!(styles.get(StyleKey::Instruction).is_empty());
    assert_eq!(
        styles.get(StyleKey::OriginalImageSize).width,
        Some(Dimension::Points(350.0))
    );
    assert_eq!(
        styles.get(StyleKey::CenterImageAlign).margin_left,
        Some(Dimension::Auto)
    );
    assert_eq!(
        styles.get_by_name("listItem"),
        Some(styles.get(StyleKey::ListItem))
    );
    assert_eq!(styles.get_by_name("table"), None);
}

#[test]
fn test_resolve_styles() {
    let styles = StyleSheet::default();
    let title = styles.resolve(&[StyleKey::Section, StyleKey::Title]);
    assert_eq!(title.padding_left, Some(35.0));
    assert_eq!(title.padding_top, Some(15.0));
    assert_eq!(title.font_size, Some(14.0));
    assert_eq!(title.font_weight, Some(600));
}

#[test]
fn test_style_overrides() {
    let styles = StyleSheet::default()
        .with_overrides_toml(
            r##"
[h1]
fontSize = 18.5
color = "#102030"

[list]
marginLeft = "50%"
"##,
        )
        .unwrap();
    let h1 = styles.get(StyleKey::H1);
    assert_eq!(h1.font_size, Some(18.5));
    assert_eq!(h1.font_weight, Some(600));
    assert_eq!(
        h1.color,
        Some(Colour {
            r: 0x10,
            g: 0x20,
            b: 0x30
        })
    );
    assert_eq!(
        styles.get(StyleKey::List).margin_left,
        Some(Dimension::Percent(50.0))
    );
}

#[test]
fn test_style_override_errors() {
    assert_eq!(
        StyleSheet::default().with_overrides_toml("[nosuch]\nfontSize = 1.0\n"),
        Err(Error::StyleSheet("unknown style `nosuch`".into()))
    );
    assert!(matches!(
        StyleSheet::default().with_overrides_toml("[h1]\nbogus = 1\n"),
        Err(Error::StyleSheet(_))
    ));
    assert!(matches!(
        StyleSheet::default().with_overrides_toml("[h1\n"),
        Err(Error::StyleSheet(_))
    ));
}

#[test]
fn test_colour_parse() {
    let c: Colour = "#3a7a10".parse().unwrap();
    assert_eq!(c.to_string(), "#3a7a10");
    assert!("green".parse::<Colour>().is_err());
    assert!("#12345".parse::<Colour>().is_err());
}

fn assignment() -> Assignment {
    Assignment {
        name_fi: "Tehtävä".into(),
        content_fi: vec!["<p>a</p>".into(), "<h2>b</h2><p>c</p>".into()],
        instruction_fi: "<p>ohje</p>".into(),
        content_sv: vec!["<p>sv</p>".into()],
        instruction_sv: "<p>instruktion</p>".into(),
        ..Default::default()
    }
}

fn instruction(exam: Exam, description: Option<&str>) -> Instruction {
    Instruction {
        exam,
        name_fi: "Ohje".into(),
        name_sv: "Instruktion".into(),
        content_fi: "<p>sisältö</p>".into(),
        content_sv: "<p>innehåll</p>".into(),
        short_description_fi: description.map(String::from),
        short_description_sv: None,
    }
}

#[test]
fn test_assignment_document() {
    let doc =
        document::assignment_document(&assignment(), Language::Fi, &DocumentOptions::default())
            .unwrap();
    assert_eq!(doc.title, "Tehtävä");
    assert_eq!(doc.pages.len(), 1);
    let page = &doc.pages[0];
    assert_eq!(page.size, PageSize::A4);
    assert_eq!(page.style, StyleKey::Page);
    assert_eq!(page.sections.len(), 3);
    assert_eq!(
        page.sections[0].styles,
        vec![StyleKey::Section, StyleKey::Title]
    );
    assert_eq!(page.sections[0].content[0].plain_text(), "Tehtävä");
    assert!(!page.sections[0].wrap);
    assert_eq!(
        page.sections[1].styles,
        vec![StyleKey::Section, StyleKey::Content]
    );
    assert!(page.sections[1].wrap);
    assert_eq!(page.sections[1].content[0].plain_text(), "ohje");
    let content: Vec<_> = page.sections[2]
        .content
        .iter()
        .map(|n| n.style())
        .collect();
    assert_eq!(
        content,
        vec![Some(StyleKey::P), Some(StyleKey::H2), Some(StyleKey::P)]
    );
}

#[test]
fn test_assignment_document_swedish_untitled() {
    let conf = config::default().footer_logo("/logo.png");
    let doc = conf.assignment_document(&assignment(), Language::Sv).unwrap();
    assert_eq!(doc.title, "Nimetön");
    let sections = &doc.pages[0].sections;
    assert_eq!(sections.len(), 4);
    assert_eq!(sections[1].content[0].plain_text(), "instruktion");
    assert_eq!(sections[2].content[0].plain_text(), "sv");
    assert_eq!(
        sections[3].styles,
        vec![StyleKey::Section, StyleKey::FooterImage]
    );
    assert_eq!(
        sections[3].content,
        vec![LayoutNode::Image {
            src: "/logo.png".into(),
            size: None,
            align: None
        }]
    );

    let doc = config::default()
        .fallback_title("Untitled")
        .assignment_document(&assignment(), Language::Sv)
        .unwrap();
    assert_eq!(doc.title, "Untitled");
}

#[test]
fn test_assignment_document_failure() {
    let mut broken = assignment();
    broken.content_fi.push("<table></table>".into());
    let options = DocumentOptions::default();
    assert_eq!(
        document::assignment_document(&broken, Language::Fi, &options),
        Err(Error::UnsupportedElement("table".into()))
    );
    assert_eq!(
        document::generate_assignment_document(&broken, Language::Fi, &options),
        None
    );
    assert!(document::generate_assignment_document(&broken, Language::Sv, &options).is_some());
}

#[test]
fn test_instruction_document() {
    let options = DocumentOptions::default();
    let doc = document::instruction_document(
        &instruction(Exam::Suko, Some("Lyhyesti")),
        Language::Fi,
        &options,
    )
    .unwrap();
    assert_eq!(doc.title, "Ohje");
    let sections = &doc.pages[0].sections;
    assert_eq!(sections.len(), 3);
    assert_eq!(
        sections[1].styles,
        vec![StyleKey::Section, StyleKey::Instruction]
    );
    assert_eq!(sections[1].content[0].plain_text(), "Lyhyesti");
    assert_eq!(sections[2].content[0].plain_text(), "sisältö");

    // Only SUKO and PUHVI instructions have a description band.
    let doc = document::generate_instruction_document(
        &instruction(Exam::Ld, Some("Lyhyesti")),
        Language::Fi,
        &options,
    )
    .unwrap();
    assert_eq!(doc.pages[0].sections.len(), 2);
}

#[test]
fn test_instruction_document_missing_description() {
    let options = DocumentOptions::default();
    for (description, language, expected) in [
        (Some(""), Language::Fi, ""),
        (Some("Lyhyesti"), Language::Sv, ""),
        (None, Language::Fi, ""),
    ] {
        let doc = document::generate_instruction_document(
            &instruction(Exam::Puhvi, description),
            language,
            &options,
        )
        .unwrap();
        let sections = &doc.pages[0].sections;
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections[1].styles,
            vec![StyleKey::Section, StyleKey::Instruction]
        );
        assert_eq!(sections[1].content[0].plain_text(), expected);
    }
}

#[test]
fn test_document_json_input() {
    let assignment: Assignment = serde_json::from_str(
        r#"{"id": 5, "nameFi": "Tehtävä", "contentFi": ["<p>a</p>"], "instructionFi": ""}"#,
    )
    .unwrap();
    assert_eq!(assignment.name_fi, "Tehtävä");
    assert_eq!(assignment.content_fi, vec!["<p>a</p>".to_string()]);
    assert!(assignment.content_sv.is_empty());

    let instruction: Instruction = serde_json::from_str(
        r#"{"exam": "PUHVI", "nameSv": "Instruktion", "contentSv": "<p>x</p>",
            "shortDescriptionSv": "Kort"}"#,
    )
    .unwrap();
    assert_eq!(instruction.exam, Exam::Puhvi);
    let doc = config::default()
        .instruction_document(&instruction, Language::Sv)
        .unwrap();
    assert_eq!(doc.title, "Instruktion");
    assert_eq!(doc.pages[0].sections[1].content[0].plain_text(), "Kort");
}

#[test]
fn test_deeply_nested() {
    use ::std::iter::repeat;
    let html = repeat("<em>").take(1000).collect::<Vec<_>>().concat() + "x";
    let nodes = convert(&html).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].plain_text(), "x");
    assert!(markup_from_read(html.as_bytes()).is_ok());
}

#[test]
fn test_too_deeply_nested() {
    use ::std::iter::repeat;
    let html = repeat("<em>").take(5000).collect::<Vec<_>>().concat() + "x";
    assert_eq!(convert(&html), Err(Error::TooDeep(crate::MAX_NESTING)));
    test_html_err(html.as_bytes(), Error::TooDeep(crate::MAX_NESTING));
}

#[test]
fn test_text_span_whitespace() {
    test_html_text(b"<p><em>foo </em>bar</p>", "*foo* bar\n", 40);
    test_html_text(b"<p>foo<em> bar</em></p>", "foo *bar*\n", 40);
    test_html_text(b"<p>a<em> </em>b</p>", "a b\n", 40);
    test_html_text(
        br#"<p>See <a href="https://oph.fi">oph.fi </a>now</p>"#,
        "See [oph.fi][1] now\n\n[1]: https://oph.fi\n",
        40,
    );
}

#[test]
fn test_text_strong_em_is_italic() {
    // Bold inside italic prints with the italic entry of the table.
    test_html_text(b"<p><em><strong>bar</strong></em></p>", "**bar**\n", 40);
}

#[test]
fn test_markup_multiline_text() {
    test_html(
        b"<p>a\nb</p>",
        r#"<Text style="p">
  <Text>{"a\nb"}</Text>
</Text>
"#,
    );
}

#[test]
fn test_blank_title_kept() {
    let mut blank = assignment();
    blank.name_fi = "  ".into();
    let doc =
        document::assignment_document(&blank, Language::Fi, &DocumentOptions::default()).unwrap();
    assert_eq!(doc.title, "  ");
}
