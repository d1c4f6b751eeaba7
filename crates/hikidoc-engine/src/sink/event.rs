//! A sink that records what the compiler did instead of rendering it.
//!
//! Block procedures become [`Event`]s carrying the attributes the HTML
//! renderer would have claimed at the same point. Inline fragments are
//! rendered into a small bracketed notation:
//!
//! | construct | recorded as |
//! |---|---|
//! | text | the text, unescaped |
//! | inline break | `<br>` |
//! | hyperlink | `[label](uri)` |
//! | image | `![alt](uri)` |
//! | CamelCase link | `[[Name]]` |
//! | modifier | `{name:content}` |
//! | reference | `&name;` |
//! | plugin | `{{source}}` |
//!
//! Links, images, CamelCase links and modifiers that claimed attributes are
//! followed by them in braces, e.g. `[label](uri){#id .a .b "title"}`.

use super::{
    Attributes, BlockKind, CellKind, CellSpan, ListKind, Modifier, PendingAttributes, Sink,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Headline {
        level: u8,
        content: String,
        attributes: Attributes,
    },
    Rule {
        attributes: Attributes,
    },
    LineBreak,
    ListOpen {
        kind: ListKind,
        attributes: Attributes,
    },
    ListClose(ListKind),
    ListItemOpen {
        attributes: Attributes,
    },
    ListItemClose,
    ListItem(String),
    DefinitionListOpen {
        attributes: Attributes,
    },
    DefinitionListClose,
    DefinitionItem {
        term: String,
        description: String,
        term_attributes: Attributes,
        description_attributes: Attributes,
    },
    DescriptionOpen {
        attributes: Attributes,
    },
    DescriptionClose,
    TableOpen {
        attributes: Attributes,
    },
    TableClose,
    RowOpen {
        attributes: Attributes,
    },
    RowClose,
    Cell {
        kind: CellKind,
        content: String,
        span: CellSpan,
        attributes: Attributes,
    },
    CellOpen {
        kind: CellKind,
        span: CellSpan,
        attributes: Attributes,
    },
    CellClose(CellKind),
    BlockOpen {
        kind: BlockKind,
        attributes: Attributes,
    },
    BlockClose(BlockKind),
    Preformatted(String),
    Paragraph {
        lines: Vec<String>,
        attributes: Attributes,
    },
    MathBlock(String),
    BlockPlugin(String),
}

#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
    pending: PendingAttributes,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Pops the pending attributes and renders them as an inline suffix.
    fn inline_attributes(&mut self) -> String {
        let attributes = self.pending.pop();
        if attributes.is_empty() {
            return String::new();
        }
        let mut parts = Vec::new();
        if let Some(id) = &attributes.id {
            parts.push(format!("#{id}"));
        }
        if let Some(class) = &attributes.class {
            parts.extend(class.split_whitespace().map(|name| format!(".{name}")));
        }
        if let Some(title) = &attributes.title {
            parts.push(format!("\"{title}\""));
        }
        format!("{{{}}}", parts.join(" "))
    }
}

impl Sink for EventLog {
    type Output = Vec<Event>;

    fn reset(&mut self) {
        self.events.clear();
        self.pending.clear();
    }

    fn finish(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn push_attribute(&mut self, raw: String) {
        self.pending.push(raw);
    }

    fn merge_attribute(&mut self, id: &str, class: &str, title: &str) {
        self.pending.merge(id, class, title);
    }

    fn headline(&mut self, base_level: u8, level: u8, content: &str) {
        let attributes = self.pending.pop();
        self.record(Event::Headline {
            level: base_level + level,
            content: content.to_owned(),
            attributes,
        });
    }

    fn rule(&mut self) {
        let attributes = self.pending.pop();
        self.record(Event::Rule { attributes });
    }

    fn line_break(&mut self) {
        self.record(Event::LineBreak);
    }

    fn list_open(&mut self, kind: ListKind) {
        let attributes = self.pending.pop();
        self.record(Event::ListOpen { kind, attributes });
    }

    fn list_close(&mut self, kind: ListKind) {
        self.record(Event::ListClose(kind));
    }

    fn list_item_open(&mut self) {
        let attributes = self.pending.pop();
        self.record(Event::ListItemOpen { attributes });
    }

    fn list_item_close(&mut self) {
        self.record(Event::ListItemClose);
    }

    fn list_item(&mut self, content: &str) {
        self.record(Event::ListItem(content.to_owned()));
    }

    fn definition_list_open(&mut self) {
        let attributes = self.pending.pop();
        self.record(Event::DefinitionListOpen { attributes });
    }

    fn definition_list_close(&mut self) {
        self.record(Event::DefinitionListClose);
    }

    fn definition_item(&mut self, term: &str, description: &str) {
        let description_only = term.is_empty() && !description.is_empty();
        let (term_attributes, description_attributes) = if description_only {
            (Attributes::default(), self.pending.pop())
        } else {
            let term_attributes = self.pending.pop();
            let description_attributes = if description.is_empty() {
                Attributes::default()
            } else {
                self.pending.pop()
            };
            (term_attributes, description_attributes)
        };
        self.record(Event::DefinitionItem {
            term: term.to_owned(),
            description: description.to_owned(),
            term_attributes,
            description_attributes,
        });
    }

    fn description_open(&mut self) {
        let attributes = self.pending.pop();
        self.record(Event::DescriptionOpen { attributes });
    }

    fn description_close(&mut self) {
        self.record(Event::DescriptionClose);
    }

    fn table_open(&mut self) {
        let attributes = self.pending.pop();
        self.record(Event::TableOpen { attributes });
    }

    fn table_close(&mut self) {
        self.record(Event::TableClose);
    }

    fn row_open(&mut self) {
        let attributes = self.pending.pop();
        self.record(Event::RowOpen { attributes });
    }

    fn row_close(&mut self) {
        self.record(Event::RowClose);
    }

    fn cell(&mut self, kind: CellKind, content: &str, span: CellSpan) {
        let attributes = self.pending.pop();
        self.record(Event::Cell {
            kind,
            content: content.to_owned(),
            span,
            attributes,
        });
    }

    fn cell_open(&mut self, kind: CellKind, span: CellSpan) {
        let attributes = self.pending.pop();
        self.record(Event::CellOpen {
            kind,
            span,
            attributes,
        });
    }

    fn cell_close(&mut self, kind: CellKind) {
        self.record(Event::CellClose(kind));
    }

    fn block_open(&mut self, kind: BlockKind) {
        let attributes = match kind {
            BlockKind::Anonymous => Attributes::default(),
            _ => self.pending.pop(),
        };
        self.record(Event::BlockOpen { kind, attributes });
    }

    fn block_close(&mut self, kind: BlockKind) {
        self.record(Event::BlockClose(kind));
    }

    fn preformatted(&mut self, content: &str) {
        self.record(Event::Preformatted(content.to_owned()));
    }

    fn paragraph(&mut self, lines: &[String]) {
        let attributes = self.pending.pop();
        self.record(Event::Paragraph {
            lines: lines.to_vec(),
            attributes,
        });
    }

    fn math_block(&mut self, source: &str) {
        self.record(Event::MathBlock(source.to_owned()));
    }

    fn block_plugin(&mut self, source: &str) {
        self.record(Event::BlockPlugin(source.to_owned()));
    }

    fn text(&mut self, text: &str) -> String {
        text.to_owned()
    }

    fn break_line(&mut self) -> String {
        "<br>".to_owned()
    }

    fn hyperlink(&mut self, uri: &str, label: &str) -> String {
        let attributes = self.inline_attributes();
        format!("[{label}]({uri}){attributes}")
    }

    fn image_link(&mut self, uri: &str, alt: &str) -> String {
        let attributes = self.inline_attributes();
        format!("![{alt}]({uri}){attributes}")
    }

    fn wiki_name(&mut self, name: &str) -> String {
        let attributes = self.inline_attributes();
        format!("[[{name}]]{attributes}")
    }

    fn modifier(&mut self, modifier: Modifier, content: &str) -> String {
        match modifier {
            Modifier::Asis => content.to_owned(),
            Modifier::Reference => format!("&{content};"),
            _ => {
                let attributes = self.inline_attributes();
                format!("{{{}:{content}}}{attributes}", modifier.name())
            }
        }
    }

    fn inline_plugin(&mut self, source: &str) -> String {
        format!("{{{{{source}}}}}")
    }
}
