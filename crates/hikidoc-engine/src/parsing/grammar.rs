//! Regular expressions for the line and inline grammar.
//!
//! Patterns that never change live in lazily built statics. Patterns whose
//! shape depends on [`Options`] (heading depth, attribute id slot, math
//! blocks, CamelCase links) are built once per compiler in [`Grammar`].
//!
//! Lines handed to the line patterns still carry their trailing `\n`, so an
//! "end of line" anchor is spelled `\n?\z`.

use crate::options::Options;
use crate::sink::BlockKind;
use regex::Regex;
use std::sync::OnceLock;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            CELL.get_or_init(|| {
                Regex::new($re).expect(concat!("Invalid ", stringify!($name), " regex"))
            })
        }
    };
}

pattern!(comment, r"\A//");
pattern!(header_marker, r"\A!+");
pattern!(rule, r"\A----(?:\[.*\])?\n?\z");
pattern!(list_marker, r"\A[*#]{1,5}");
pattern!(definition_marker, r"\A[;:]");
pattern!(table_row, r"\A(?:\[.*?\])?\|\|");
pattern!(block_start, r"\A<<<");
pattern!(block_end, r"\A>>>+(?:\s*//.*)?\n?\z");
pattern!(block_terminate, r"\A(?:<<<|>>>+(?:\s*//.*)?\n?\z)");
pattern!(blank, r"\A\n?\z");
pattern!(continuation, r"\A[ \t]");
pattern!(
    paragraph_end,
    r"\A(?:\n?\z|!+|----(?:\[.*\])?\n?\z|[*#]{1,5}|[;:]|<<<|(?:\[.*?\])?\|\|)"
);

pattern!(container_open, r"\A\(\(\(\s*(?:[a-zA-Z0-9_]+)?");
pattern!(container_end, r"\A\s*\)\)\)\s*(?://.*)?\n?\z");
pattern!(container_element, r"\|\|!?\^*>*\s*\(\(\(|[*#:]+\s*\(\(\(");
pattern!(
    container_terminate,
    r"\A\s*\)\)\)\s*(?://.*)?\n?\z|\|\|!?\^*>*\s*\(\(\(|[*#:]+\s*\(\(\("
);
pattern!(cell_container, r"\|\|!?\^*>*\s*\(\(\(");
pattern!(item_container, r"[*#]+\s*\(\(\(");

pattern!(placeholder, r"\x00([0-9]+)\x00");
pattern!(modifier, &format!("(?:{})", MODIFIERS.join("|")));
pattern!(reference, REFERENCE);

const SELECTORS: &str = r"[a-zA-Z][a-zA-Z0-9_:.\-]*(?: +[a-zA-Z][a-zA-Z0-9_:.\-]*)*";
const TITLE: &str = r#"".+?""#;

const BRACKET_LINK: &str = r"\[\[.+?\]\]";
const URI: &str = r"(?:https?|ftp|file|mailto):[A-Za-z0-9;/?:@&=+$,\-_.!~*'()#%]+";
const WIKI_NAME: &str = r"\b(?:[A-Z]+[a-z0-9]+){2,}\b";
const CONTINUATION_BREAK: &str = r"[\r\n]+[ \t]+";

pub(crate) const REFERENCE: &str = r"\{&(?:#[0-9]{2,5}|[a-zA-Z]{2,8}[0-9]{0,2});\}";

const STRONG: &str = r"\{''.+?''\}";
const EM: &str = r"\{'.+?'\}";
const DEL: &str = r"\{=.+?=\}";
const BIG: &str = r"\{\+.+?\+\}";
const SMALL: &str = r"\{-.+?-\}";
const SUP: &str = r"\{\^\^.+?\^\^\}";
const SUB: &str = r"\{__.+?__\}";
const UNDERLINE: &str = r"\{_.+?_\}";
const ITALIC: &str = r"\{/.+?/\}";
const TT: &str = r"\{`.+?`\}";
const ASIS: &str = r"\{!.+?!\}";
const CITE: &str = r"\{@.+?@\}";
const SPAN: &str = r#"\{".+?"\}"#;
const COLOR: &str = r"\{~.+?~\}";
const MATH: &str = r"\{\$.+?\$\}";

/// Every modifier family, in scan priority order.
const MODIFIERS: [&str; 16] = [
    STRONG, EM, DEL, BIG, SMALL, SUP, SUB, UNDERLINE, ITALIC, ASIS, SPAN, CITE, TT, COLOR, MATH,
    REFERENCE,
];

/// The families that still mean something inside preformatted text.
const PRE_MODIFIERS: [&str; 8] = [STRONG, EM, DEL, ASIS, UNDERLINE, ITALIC, TT, MATH];

/// Option-dependent patterns for one compiler instance.
#[derive(Debug)]
pub struct Grammar {
    header: Regex,
    block_open: Regex,
    attribute_prefix: Regex,
    attribute_line: Regex,
    attribute_anywhere: Regex,
    inline: Regex,
    inline_pre: Regex,
}

/// Named groups of the tagged-block opener, paired with the kind they select.
const BLOCK_TAGS: [(&str, &str, BlockKind); 9] = [
    ("blockquote", "b(?:lockquote)?", BlockKind::Blockquote),
    ("left", "l(?:eft)?", BlockKind::Left),
    ("center", "c(?:enter)?", BlockKind::Center),
    ("right", "r(?:ight)?", BlockKind::Right),
    ("pre_asis", "p(?:re)?_?a(?:sis)?", BlockKind::PreAsis),
    ("pre", "p(?:re)?", BlockKind::Pre),
    ("asis", "a(?:sis)?", BlockKind::Asis),
    ("div", "d(?:iv)?", BlockKind::Div),
    ("math", "m(?:ath)?", BlockKind::Math),
];

/// A recognised `<<<` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOpening<'a> {
    /// Kind named after the `<<<`, if any.
    pub kind: Option<BlockKind>,
    /// Everything after the kind and its trailing spaces.
    pub rest: &'a str,
}

impl Grammar {
    pub fn new(options: &Options) -> Self {
        let attribute = attribute_pattern(options.enable_id);
        Self {
            header: build(&format!(r"\A!{{1,{}}}", 7 - options.heading_base())),
            block_open: build(&block_open_pattern(options.enable_math)),
            attribute_prefix: build(&format!(r"\A{attribute}")),
            attribute_line: build(&format!(r"\A{attribute}\n?\z")),
            attribute_anywhere: build(&attribute),
            inline: build(&inline_pattern(options, false)),
            inline_pre: build(&inline_pattern(options, true)),
        }
    }

    /// Length of the heading marker run this grammar accepts on `line`.
    pub fn header_depth(&self, line: &str) -> Option<usize> {
        self.header.find(line).map(|m| m.len())
    }

    pub fn block_opening<'a>(&self, line: &'a str) -> Option<BlockOpening<'a>> {
        let caps = self.block_open.captures(line)?;
        let kind = BLOCK_TAGS
            .iter()
            .find(|(group, _, _)| caps.name(group).is_some())
            .map(|(_, _, kind)| *kind);
        let end = caps.get(0).map_or(0, |m| m.end());
        Some(BlockOpening {
            kind,
            rest: &line[end..],
        })
    }

    /// Attribute bracket at the very start of `text`.
    pub fn attribute_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.attribute_prefix.find(text).map(|m| m.as_str())
    }

    /// True when `line` is nothing but an attribute bracket.
    pub fn is_attribute_line(&self, line: &str) -> bool {
        self.attribute_line.is_match(line)
    }

    /// First attribute bracket anywhere in `text`.
    pub fn attribute_anywhere<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.attribute_anywhere.find(text).map(|m| m.as_str())
    }

    pub fn inline(&self, in_pre: bool) -> &Regex {
        if in_pre { &self.inline_pre } else { &self.inline }
    }
}

fn build(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid grammar regex")
}

fn attribute_pattern(enable_id: bool) -> String {
    let attributes = format!("(?:{SELECTORS}|{TITLE})");
    if enable_id {
        format!(
            r"\[ *(?:{attributes}|(?:{SELECTORS})? *, *(?:{attributes})?|(?:(?:{SELECTORS})? *, *){{2}}(?:{TITLE})?) *\]"
        )
    } else {
        format!(r"\[ *(?:{attributes}|(?:{SELECTORS})? *, *(?:{TITLE})) *\]")
    }
}

fn block_open_pattern(enable_math: bool) -> String {
    let tags: Vec<String> = BLOCK_TAGS
        .iter()
        .filter(|(_, _, kind)| enable_math || *kind != BlockKind::Math)
        .map(|(group, tag, _)| format!("(?P<{group}>{tag})"))
        .collect();
    format!(r"\A<<<+\s*(?:{})? *", tags.join("|"))
}

fn inline_pattern(options: &Options, in_pre: bool) -> String {
    let modifiers = if in_pre {
        PRE_MODIFIERS.join("|")
    } else {
        MODIFIERS.join("|")
    };
    let mut alternatives = vec![
        format!("(?P<link>{BRACKET_LINK})"),
        format!("(?P<uri>{URI})"),
        format!("(?P<modifier>{modifiers})"),
    ];
    if options.use_wiki_name {
        let caret = if options.use_not_wiki_name { r"\^?" } else { "" };
        alternatives.push(format!("(?P<wiki_name>{caret}{WIKI_NAME})"));
    }
    if !in_pre {
        alternatives.push(format!("(?P<break>{CONTINUATION_BREAK})"));
    }
    alternatives.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn grammar() -> Grammar {
        Grammar::new(&Options::default())
    }

    #[rstest]
    #[case("<<<\n", None, "")]
    #[case("<<< b\n", Some(BlockKind::Blockquote), "")]
    #[case("<<<blockquote[cls]\n", Some(BlockKind::Blockquote), "[cls]")]
    #[case("<<<pa\n", Some(BlockKind::PreAsis), "")]
    #[case("<<<pre_asis\n", Some(BlockKind::PreAsis), "")]
    #[case("<<<pre\n", Some(BlockKind::Pre), "")]
    #[case("<<<asis\n", Some(BlockKind::Asis), "")]
    #[case("<<<math\n", Some(BlockKind::Math), "")]
    #[case("<<<be\n", Some(BlockKind::Blockquote), "e")]
    #[case("<<<div a\n", Some(BlockKind::Div), "a")]
    #[case("<<<<\n", None, "")]
    fn block_openings(#[case] line: &str, #[case] kind: Option<BlockKind>, #[case] rest: &str) {
        let opening = grammar().block_opening(line.trim_end_matches('\n')).unwrap();
        assert_eq!(opening.kind, kind);
        assert_eq!(opening.rest, rest);
    }

    #[test]
    fn math_blocks_can_be_disabled() {
        let grammar = Grammar::new(&Options {
            enable_math: false,
            ..Options::default()
        });
        let opening = grammar.block_opening("<<<math").unwrap();
        assert_eq!(opening.kind, None);
        assert_eq!(opening.rest, "math");
    }

    #[test]
    fn header_depth_respects_base_level() {
        assert_eq!(grammar().header_depth("!!!!!!!! x"), Some(6));
        let deep = Grammar::new(&Options {
            level: 3,
            ..Options::default()
        });
        assert_eq!(deep.header_depth("!!!!!!!! x"), Some(4));
    }

    #[rstest]
    #[case("[cls]", true)]
    #[case("[ cls1 cls2 ]", true)]
    #[case(r#"["title"]"#, true)]
    #[case(r#"[cls,"title"]"#, true)]
    #[case(r#"[ , "title" ]"#, true)]
    #[case("[id,cls]", false)]
    #[case("[cls,]", false)]
    #[case("[]", false)]
    #[case("[1cls]", false)]
    fn attribute_forms_without_ids(#[case] text: &str, #[case] accepted: bool) {
        assert_eq!(grammar().attribute_prefix(text).is_some(), accepted);
    }

    #[rstest]
    #[case("[id,cls]", true)]
    #[case(r#"[id,cls,"title"]"#, true)]
    #[case("[id,]", true)]
    #[case(r#"[,,"title"]"#, true)]
    #[case("[a,b,c]", false)]
    fn attribute_forms_with_ids(#[case] text: &str, #[case] accepted: bool) {
        let grammar = Grammar::new(&Options {
            enable_id: true,
            ..Options::default()
        });
        assert_eq!(grammar.attribute_prefix(text).is_some(), accepted);
    }

    #[test]
    fn attribute_line_allows_trailing_newline_only() {
        assert!(grammar().is_attribute_line("[cls]\n"));
        assert!(!grammar().is_attribute_line("[cls]foo\n"));
        assert!(!grammar().is_attribute_line(" [cls]\n"));
    }

    #[rstest]
    #[case(">>>", true)]
    #[case(">>>>\n", true)]
    #[case(">>> // done\n", true)]
    #[case(">>> \n", false)]
    #[case(">>>a", false)]
    fn block_end_lines(#[case] line: &str, #[case] closes: bool) {
        assert_eq!(block_end().is_match(line), closes);
    }

    #[rstest]
    #[case(")))", true)]
    #[case("  )))  // c\n", true)]
    #[case(")))x", false)]
    fn container_end_lines(#[case] line: &str, #[case] closes: bool) {
        assert_eq!(container_end().is_match(line), closes);
    }

    #[test]
    fn paragraph_end_matches_block_starts() {
        for line in ["\n", "", "!h", "----\n", "* i", "# i", ";t", ":d", "<<<", "||c", "[x]||c"] {
            assert!(paragraph_end().is_match(line), "{line:?}");
        }
        for line in ["text\n", " indented", "[cls]text", "-- dash"] {
            assert!(!paragraph_end().is_match(line), "{line:?}");
        }
    }
}
