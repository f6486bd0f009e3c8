//! Custom block tag rewriting.
//!
//! Docs content may use a small vocabulary of JSX-like block tags:
//!
//! ```text
//! <CardGroup>
//!   <Card title="Channels" href="/features/channels">Connect your chat apps</Card>
//! </CardGroup>
//!
//! <Note>Something worth knowing.</Note>
//! <Warning>Something that can go wrong.</Warning>
//! ```
//!
//! Every tag is resolved to plain Markdown so that the renderer only deals with
//! standard syntax. Tags that don't fit the expected shape stay in the text.

use std::sync::LazyLock;

use regex::Regex;

const CARD_GROUP: &str = "CardGroup";
const CARD: &str = "Card";
const NOTE: &str = "Note";
const WARNING: &str = "Warning";

/// What may follow the tag name inside an opening tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenTag {
    /// Only `>`, as in `<Note>`
    Bare,
    /// `>` or whitespace followed by attributes
    Attributes,
    /// Whitespace followed by attributes
    Spaced,
}

/// A complete `<Name ...>inner</Name>` element inside a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Element<'a> {
    /// Byte offset of the opening `<`
    start: usize,
    /// Byte offset just past the closing tag
    end: usize,
    /// Raw text between the tag name and the `>` of the opening tag
    attrs: &'a str,
    /// Text between the opening and closing tags
    inner: &'a str,
}

/// A single `<Card>` inside a card group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Card<'a> {
    title: &'a str,
    href: &'a str,
    body: &'a str,
}

impl<'a> Card<'a> {
    /// Read a card from its element. `title` must be the first attribute and
    /// `href` has to come after it.
    fn parse(element: &Element<'a>) -> Option<Self> {
        static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r#"([A-Za-z][A-Za-z0-9_-]*)="([^"]*)""#).expect("Invalid attribute regex")
        });

        let attrs = element.attrs;
        let mut found = ATTR_RE.captures_iter(attrs);

        let first = found.next()?;
        let leading = &attrs[..first.get(0)?.start()];
        if &first[1] != "title" || !leading.trim().is_empty() {
            return None;
        }
        let title = first.get(2)?.as_str();

        let href = found.find(|caps| &caps[1] == "href")?.get(2)?.as_str();

        Some(Self {
            title,
            href,
            body: element.inner.trim(),
        })
    }

    fn to_markdown(self) -> String {
        format!("- [**{}**]({}) — {}", self.title, self.href, self.body)
    }
}

/// Rewrite all custom tags in `source` into standard Markdown.
///
/// Card groups become bullet lists of links, notes and warnings become
/// labelled blockquotes. The passes are repeated until nothing changes, so
/// the result never contains a complete tag and transforming it again is a
/// no-op. Every rewrite shortens the text, which bounds the loop.
pub fn transform_tags(source: &str) -> String {
    let mut current = apply_passes(source);

    loop {
        let next = apply_passes(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One round of rewrites, in the order card groups, notes, warnings.
fn apply_passes(source: &str) -> String {
    let text = card_groups(source);
    let text = callouts(&text, NOTE, "Note");
    callouts(&text, WARNING, "Warning")
}

/// `<CardGroup>` blocks to one `- [**title**](href) — body` line per card.
fn card_groups(source: &str) -> String {
    rewrite_elements(source, CARD_GROUP, OpenTag::Attributes, |group| {
        cards(group.inner).join("\n")
    })
}

/// Markdown lines for every well-formed card, in source order.
fn cards(inner: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cursor = 0;

    while let Some(element) = find_element(inner, cursor, CARD, OpenTag::Spaced) {
        match Card::parse(&element) {
            Some(card) => {
                lines.push(card.to_markdown());
                cursor = element.end;
            }
            // Not a usable card, keep looking right after its `<`
            None => cursor = element.start + 1,
        }
    }

    lines
}

/// `<Name>` blocks to a blockquote starting with a bold label.
fn callouts(source: &str, name: &str, label: &str) -> String {
    rewrite_elements(source, name, OpenTag::Bare, |element| {
        format!("> **{label}:** {}", element.inner.trim())
    })
}

/// Replace every complete `name` element with the output of `render`.
fn rewrite_elements(
    source: &str,
    name: &str,
    open: OpenTag,
    render: impl Fn(&Element<'_>) -> String,
) -> String {
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    while let Some(element) = find_element(source, cursor, name, open) {
        output.push_str(&source[cursor..element.start]);
        output.push_str(&render(&element));
        cursor = element.end;
    }

    output.push_str(&source[cursor..]);
    output
}

/// Find the first complete element named `name` at or after byte offset `from`.
///
/// The element ends at the first closing tag after its opening tag; nested
/// elements of the same name are not matched up.
fn find_element<'a>(source: &'a str, from: usize, name: &str, open: OpenTag) -> Option<Element<'a>> {
    let open_pattern = format!("<{name}");
    let close_tag = format!("</{name}>");
    let mut pos = from;

    while let Some(found) = source.get(pos..)?.find(&open_pattern) {
        let start = pos + found;
        let after_name = start + open_pattern.len();
        pos = start + 1;

        let Some(tag_len) = open_tag_len(&source[after_name..], open) else {
            continue;
        };

        let inner_start = after_name + tag_len + 1;
        let Some(close) = source[inner_start..].find(&close_tag) else {
            continue;
        };
        let inner_end = inner_start + close;

        return Some(Element {
            start,
            end: inner_end + close_tag.len(),
            attrs: &source[after_name..after_name + tag_len],
            inner: &source[inner_start..inner_end],
        });
    }

    None
}

/// Length of the attribute text of an opening tag, up to its closing `>`.
fn open_tag_len(rest: &str, open: OpenTag) -> Option<usize> {
    let first = rest.chars().next()?;

    match open {
        OpenTag::Bare | OpenTag::Attributes if first == '>' => Some(0),
        OpenTag::Attributes | OpenTag::Spaced if first.is_whitespace() => unquoted_gt(rest),
        _ => None,
    }
}

/// Byte offset of the first `>` outside a double-quoted attribute value.
fn unquoted_gt(text: &str) -> Option<usize> {
    let mut quoted = false;

    for (i, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '>' if !quoted => return Some(i),
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn converts_note() {
        assert_eq!(
            transform_tags("<Note>\n  Be careful\n</Note>"),
            "> **Note:** Be careful"
        );
    }

    #[test]
    fn converts_warning() {
        assert_eq!(
            transform_tags("Intro\n\n<Warning>Keys are shown once.</Warning>\n\nOutro"),
            "Intro\n\n> **Warning:** Keys are shown once.\n\nOutro"
        );
    }

    #[test]
    fn converts_single_card() {
        assert_eq!(
            transform_tags("<CardGroup>\n<Card title=\"A\" href=\"/x\">desc</Card>\n</CardGroup>"),
            "- [**A**](/x) — desc"
        );
    }

    #[test]
    fn converts_cards_in_source_order() {
        let source = r#"## Next steps

<CardGroup cols={2}>
  <Card title="Channels" icon="message" href="/features/channels">
    Connect Slack, Discord and more.
  </Card>
  <Card title="Skills" href="/features/skills">Extend your agent.</Card>
</CardGroup>
"#;

        assert_eq!(
            transform_tags(source),
            "## Next steps\n\n\
             - [**Channels**](/features/channels) — Connect Slack, Discord and more.\n\
             - [**Skills**](/features/skills) — Extend your agent.\n"
        );
    }

    #[test]
    fn empty_card_group_collapses() {
        assert_eq!(
            transform_tags("before\n<CardGroup>\n  nothing here\n</CardGroup>\nafter"),
            "before\n\nafter"
        );
    }

    #[test]
    fn skips_cards_without_title_first_or_href() {
        let source = "<CardGroup>\
            <Card href=\"/a\" title=\"Swapped\">x</Card>\
            <Card title=\"No link\">y</Card>\
            <Card title=\"Ok\" href=\"/ok\">z</Card>\
            </CardGroup>";

        assert_eq!(transform_tags(source), "- [**Ok**](/ok) — z");
    }

    #[test]
    fn attribute_values_may_contain_angle_brackets() {
        assert_eq!(
            transform_tags("<CardGroup><Card title=\"a > b\" href=\"/cmp\">c</Card></CardGroup>"),
            "- [**a > b**](/cmp) — c"
        );
    }

    #[test]
    fn leaves_unclosed_tags_untouched() {
        let source = "<Note>\nnever closed\n\n<CardGroup>\n<Card title=\"A\" href=\"/x\">desc</Card>";

        assert_eq!(transform_tags(source), source);
    }

    #[test]
    fn leaves_tags_with_attributes_on_callouts_untouched() {
        let source = "<Note type=\"info\">hello</Note>";

        assert_eq!(transform_tags(source), source);
    }

    #[test]
    fn transforms_multiple_callouts() {
        assert_eq!(
            transform_tags("<Note>one</Note>\n<Note>two</Note>\n<Warning>three</Warning>"),
            "> **Note:** one\n> **Note:** two\n> **Warning:** three"
        );
    }

    #[test]
    fn nested_callouts_resolve_completely() {
        let once = transform_tags("<Note><Note>inner</Note></Note>");

        assert_eq!(once, "> **Note:** > **Note:** inner");
        assert_eq!(transform_tags(&once), once);
    }

    #[test]
    fn text_without_tags_is_unchanged() {
        let source = "# Title\n\nA <span>bit</span> of <b>HTML</b> and `<Note>` talk.";

        assert_eq!(transform_tags(source), source);
    }

    #[test]
    fn finds_elements_after_offset() {
        let source = "<Note>a</Note><Note>b</Note>";

        let first = find_element(source, 0, NOTE, OpenTag::Bare).unwrap();
        let second = find_element(source, first.end, NOTE, OpenTag::Bare).unwrap();

        assert_eq!(first.inner, "a");
        assert_eq!(second.inner, "b");
        assert_eq!(second.end, source.len());
    }

    fn tag_soup() -> impl Strategy<Value = String> {
        let fragments = vec![
            "<CardGroup>",
            "</CardGroup>",
            "<Card title=\"T\" href=\"/h\">",
            "<Card title=\"U\">",
            "</Card>",
            "<Note>",
            "</Note>",
            "<Warning>",
            "</Warning>",
            "<No",
            "te>",
            "text",
            " ",
            "\n",
            ">",
        ];
        prop::collection::vec(prop::sample::select(fragments), 0..24).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn transform_is_idempotent(source in tag_soup()) {
            let once = transform_tags(&source);
            prop_assert_eq!(transform_tags(&once), once);
        }

        #[test]
        fn transform_is_idempotent_on_arbitrary_text(source in "\\PC{0,64}") {
            let once = transform_tags(&source);
            prop_assert_eq!(transform_tags(&once), once);
        }
    }
}
