//! The rendering side of the compiler.
//!
//! The compiler never builds a document tree. It walks the source once and
//! calls a [`Sink`] in document order: block procedures write output as a
//! side effect, inline functions return the rendered fragment so the
//! compiler can splice it into the enclosing line, item or cell.
//!
//! Attribute brackets are forwarded to the sink as soon as they are
//! recognised ([`Sink::push_attribute`]); the next construct that renders
//! attributes pops the most recent one. A pushed attribute that nothing
//! pops simply lingers until a later element claims it or the document
//! ends.

pub mod attributes;
pub mod event;
pub mod html;

pub use attributes::{Attributes, PendingAttributes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Head,
    Data,
}

impl CellKind {
    pub fn tag(self) -> &'static str {
        match self {
            CellKind::Head => "th",
            CellKind::Data => "td",
        }
    }
}

/// Row and column span of a table cell; `None` means no span marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSpan {
    pub rows: Option<usize>,
    pub columns: Option<usize>,
}

/// `<<< kind` containers. `Anonymous` is a bare `<<<` and renders no wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Anonymous,
    Blockquote,
    Left,
    Center,
    Right,
    Pre,
    PreAsis,
    Asis,
    Div,
    Math,
}

/// Inline `{x ... x}` modifier families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Strong,
    Em,
    Del,
    Big,
    Small,
    Sup,
    Sub,
    Underline,
    Italic,
    Tt,
    Asis,
    Cite,
    Span,
    Color,
    Math,
    Reference,
}

impl Modifier {
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Strong => "strong",
            Modifier::Em => "em",
            Modifier::Del => "del",
            Modifier::Big => "big",
            Modifier::Small => "small",
            Modifier::Sup => "sup",
            Modifier::Sub => "sub",
            Modifier::Underline => "underline",
            Modifier::Italic => "italic",
            Modifier::Tt => "tt",
            Modifier::Asis => "asis",
            Modifier::Cite => "cite",
            Modifier::Span => "span",
            Modifier::Color => "color",
            Modifier::Math => "math",
            Modifier::Reference => "reference",
        }
    }
}

/// Receiver of compiler events.
///
/// Implementations own the pending attribute stack; every method documented
/// as "claims attributes" pops it once.
pub trait Sink {
    type Output;

    /// Clears all output and pending attributes before a new document.
    fn reset(&mut self);
    fn finish(&mut self) -> Self::Output;

    fn push_attribute(&mut self, raw: String);
    /// Prepends fields to the most recently pushed attribute, or pushes
    /// them alone when nothing is pending. The compiler calls this with the
    /// `math` class right before opening a math block or span.
    fn merge_attribute(&mut self, id: &str, class: &str, title: &str);

    // Blocks

    /// Claims attributes. `level` is zero for a single `!`.
    fn headline(&mut self, base_level: u8, level: u8, content: &str);
    /// Claims attributes.
    fn rule(&mut self);
    /// Separator written after a complete list.
    fn line_break(&mut self);

    /// Claims attributes.
    fn list_open(&mut self, kind: ListKind);
    fn list_close(&mut self, kind: ListKind);
    /// Claims attributes.
    fn list_item_open(&mut self);
    fn list_item_close(&mut self);
    fn list_item(&mut self, content: &str);

    /// Claims attributes.
    fn definition_list_open(&mut self);
    fn definition_list_close(&mut self);
    /// Either side may be empty, in which case it is not rendered. Claims
    /// attributes once per rendered side, term first.
    fn definition_item(&mut self, term: &str, description: &str);
    /// Claims attributes.
    fn description_open(&mut self);
    fn description_close(&mut self);

    /// Claims attributes.
    fn table_open(&mut self);
    fn table_close(&mut self);
    /// Claims attributes.
    fn row_open(&mut self);
    fn row_close(&mut self);
    /// Claims attributes.
    fn cell(&mut self, kind: CellKind, content: &str, span: CellSpan);
    /// Claims attributes.
    fn cell_open(&mut self, kind: CellKind, span: CellSpan);
    fn cell_close(&mut self, kind: CellKind);

    /// Claims attributes, except for [`BlockKind::Anonymous`].
    fn block_open(&mut self, kind: BlockKind);
    fn block_close(&mut self, kind: BlockKind);
    /// Already rendered content of a block, written verbatim.
    fn preformatted(&mut self, content: &str);
    /// Claims attributes.
    fn paragraph(&mut self, lines: &[String]);
    fn math_block(&mut self, source: &str);
    fn block_plugin(&mut self, source: &str);

    // Inline

    /// Escapes literal text for the output format.
    fn text(&mut self, text: &str) -> String;
    fn break_line(&mut self) -> String;
    /// Claims attributes.
    fn hyperlink(&mut self, uri: &str, label: &str) -> String;
    /// Claims attributes.
    fn image_link(&mut self, uri: &str, alt: &str) -> String;
    /// Claims attributes.
    fn wiki_name(&mut self, name: &str) -> String;
    /// Claims attributes, except for [`Modifier::Asis`] and
    /// [`Modifier::Reference`].
    fn modifier(&mut self, modifier: Modifier, content: &str) -> String;
    fn inline_plugin(&mut self, source: &str) -> String;
}
