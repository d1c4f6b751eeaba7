//! HTML and XHTML rendering.

use super::{
    Attributes, BlockKind, CellKind, CellSpan, ListKind, Modifier, PendingAttributes, Sink,
};
use crate::parsing::grammar;

/// Empty-element style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavor {
    /// `<br>`
    Html,
    /// `<br />`
    #[default]
    Xhtml,
}

impl Flavor {
    fn empty_tag_end(self) -> &'static str {
        match self {
            Flavor::Html => ">",
            Flavor::Xhtml => " />",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    pub flavor: Flavor,
    /// Presentational markup (`align=`, `<font>`) instead of inline CSS.
    pub amazon_dtp_mode: bool,
}

/// Sink that renders HTML into a string.
#[derive(Debug, Default)]
pub struct HtmlOutput {
    options: HtmlOptions,
    out: String,
    pending: PendingAttributes,
}

impl HtmlOutput {
    pub fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn html() -> Self {
        Self::new(HtmlOptions {
            flavor: Flavor::Html,
            ..HtmlOptions::default()
        })
    }

    pub fn xhtml() -> Self {
        Self::new(HtmlOptions::default())
    }

    /// Writes `s` and terminates the line unless `s` already does.
    fn puts(&mut self, s: &str) {
        self.out.push_str(s);
        if !s.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn print(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Pops the pending attribute and renders it as ` id=".." class=".." title=".."`.
    fn attr(&mut self) -> String {
        let Attributes { id, class, title } = self.pending.pop();
        let mut rendered = String::new();
        if let Some(id) = id {
            rendered.push_str(&format!(r#" id="{id}""#));
        }
        if let Some(class) = class {
            rendered.push_str(&format!(r#" class="{class}""#));
        }
        if let Some(title) = title {
            rendered.push_str(&format!(r#" title="{}""#, escape_title(&title)));
        }
        rendered
    }

    fn aligned_div_open(&mut self, align: &str) {
        let attr = self.attr();
        if self.options.amazon_dtp_mode {
            self.puts(&format!(r#"<div align="{align}"{attr}>"#));
        } else {
            self.puts(&format!(r#"<div style="text-align:{align};"{attr}>"#));
        }
    }

    fn color(&mut self, content: &str) -> String {
        let content = content.strip_suffix('\n').unwrap_or(content);
        let Some((name, rest)) = content.split_once(':') else {
            let attr = self.attr();
            return format!("<span{attr}>{content}</span>");
        };
        let attr = self.attr();
        if self.options.amazon_dtp_mode {
            format!(r#"<font color="{name}"{attr}>{rest}</font>"#)
        } else {
            format!(r#"<span style="color: {name};"{attr}>{rest}</span>"#)
        }
    }
}

fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn escape_param(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// Escapes a title attribute, letting `{&name;}` character references through.
fn escape_title(title: &str) -> String {
    let mut escaped = String::new();
    let mut last = 0;
    for m in grammar::reference().find_iter(title) {
        escaped.push_str(&escape_param(&title[last..m.start()]));
        let chunk = m.as_str();
        escaped.push('&');
        escaped.push_str(&chunk[2..chunk.len() - 2]);
        escaped.push(';');
        last = m.end();
    }
    escaped.push_str(&escape_param(&title[last..]));
    escaped
}

fn span_attributes(span: CellSpan) -> String {
    let mut rendered = String::new();
    if let Some(rows) = span.rows {
        rendered.push_str(&format!(r#" rowspan="{rows}""#));
    }
    if let Some(columns) = span.columns {
        rendered.push_str(&format!(r#" colspan="{columns}""#));
    }
    rendered
}

impl Sink for HtmlOutput {
    type Output = String;

    fn reset(&mut self) {
        self.out.clear();
        self.pending.clear();
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    fn push_attribute(&mut self, raw: String) {
        self.pending.push(raw);
    }

    fn merge_attribute(&mut self, id: &str, class: &str, title: &str) {
        self.pending.merge(id, class, title);
    }

    fn headline(&mut self, base_level: u8, level: u8, content: &str) {
        let n = base_level + level;
        let attr = self.attr();
        self.puts(&format!("<h{n}{attr}>{content}</h{n}>"));
    }

    fn rule(&mut self) {
        let attr = self.attr();
        let end = self.options.flavor.empty_tag_end();
        self.puts(&format!("<hr{attr}{end}"));
    }

    fn line_break(&mut self) {
        self.puts("");
    }

    fn list_open(&mut self, kind: ListKind) {
        let attr = self.attr();
        self.puts(&format!("<{}{attr}>", kind.tag()));
    }

    fn list_close(&mut self, kind: ListKind) {
        self.print(&format!("</{}>", kind.tag()));
    }

    fn list_item_open(&mut self) {
        let attr = self.attr();
        self.print(&format!("<li{attr}>"));
    }

    fn list_item_close(&mut self) {
        self.puts("</li>");
    }

    fn list_item(&mut self, content: &str) {
        self.print(content);
    }

    fn definition_list_open(&mut self) {
        let attr = self.attr();
        self.puts(&format!("<dl{attr}>"));
    }

    fn definition_list_close(&mut self) {
        self.puts("</dl>");
    }

    fn definition_item(&mut self, term: &str, description: &str) {
        if !description.is_empty() && term.is_empty() {
            let attr = self.attr();
            self.puts(&format!("<dd{attr}>{description}</dd>"));
            return;
        }
        let attr = self.attr();
        self.puts(&format!("<dt{attr}>{term}</dt>"));
        if !description.is_empty() {
            let attr = self.attr();
            self.puts(&format!("<dd{attr}>{description}</dd>"));
        }
    }

    fn description_open(&mut self) {
        let attr = self.attr();
        self.print(&format!("<dd{attr}>"));
    }

    fn description_close(&mut self) {
        self.puts("</dd>");
    }

    fn table_open(&mut self) {
        let attr = self.attr();
        self.puts(&format!("<table{attr}>"));
    }

    fn table_close(&mut self) {
        self.puts("</table>");
    }

    fn row_open(&mut self) {
        let attr = self.attr();
        self.print(&format!("<tr{attr}>"));
    }

    fn row_close(&mut self) {
        self.puts("</tr>");
    }

    fn cell(&mut self, kind: CellKind, content: &str, span: CellSpan) {
        let attr = self.attr();
        let tag = kind.tag();
        self.print(&format!("<{tag}{}{attr}>{content}</{tag}>", span_attributes(span)));
    }

    fn cell_open(&mut self, kind: CellKind, span: CellSpan) {
        let attr = self.attr();
        self.print(&format!("<{}{}{attr}>", kind.tag(), span_attributes(span)));
    }

    fn cell_close(&mut self, kind: CellKind) {
        self.print(&format!("</{}>", kind.tag()));
    }

    fn block_open(&mut self, kind: BlockKind) {
        match kind {
            BlockKind::Anonymous => {}
            BlockKind::Blockquote => {
                let attr = self.attr();
                self.puts(&format!("<blockquote{attr}>"));
            }
            BlockKind::Div => {
                let attr = self.attr();
                self.puts(&format!("<div{attr}>"));
            }
            BlockKind::Left => self.aligned_div_open("left"),
            BlockKind::Center => self.aligned_div_open("center"),
            BlockKind::Right => self.aligned_div_open("right"),
            BlockKind::Pre | BlockKind::PreAsis => {
                let attr = self.attr();
                self.print(&format!("<pre{attr}>"));
            }
            BlockKind::Asis | BlockKind::Math => {
                let attr = self.attr();
                self.print(&format!("<p{attr}>"));
            }
        }
    }

    fn block_close(&mut self, kind: BlockKind) {
        match kind {
            BlockKind::Anonymous => {}
            BlockKind::Blockquote => self.puts("</blockquote>"),
            BlockKind::Div | BlockKind::Left | BlockKind::Center | BlockKind::Right => {
                self.puts("</div>")
            }
            BlockKind::Pre | BlockKind::PreAsis => self.puts("</pre>"),
            BlockKind::Asis | BlockKind::Math => self.puts("</p>"),
        }
    }

    fn preformatted(&mut self, content: &str) {
        self.print(content);
    }

    fn paragraph(&mut self, lines: &[String]) {
        let attr = self.attr();
        self.puts(&format!("<p{attr}>{}</p>", lines.join("\n")));
    }

    fn math_block(&mut self, source: &str) {
        self.block_plugin(&format!("mtex '{source}'"));
    }

    fn block_plugin(&mut self, source: &str) {
        self.puts(&format!(
            r#"<div class="plugin">{{{{{}}}}}</div>"#,
            escape_html(source)
        ));
    }

    fn text(&mut self, text: &str) -> String {
        escape_html(text)
    }

    fn break_line(&mut self) -> String {
        format!("<br{}", self.options.flavor.empty_tag_end())
    }

    fn hyperlink(&mut self, uri: &str, label: &str) -> String {
        let attr = self.attr();
        format!(r#"<a href="{}"{attr}>{label}</a>"#, escape_param(uri))
    }

    fn image_link(&mut self, uri: &str, alt: &str) -> String {
        let attr = self.attr();
        format!(
            r#"<img src="{}" alt="{}"{attr}{}"#,
            escape_param(uri),
            escape_html(alt),
            self.options.flavor.empty_tag_end()
        )
    }

    fn wiki_name(&mut self, name: &str) -> String {
        let label = self.text(name);
        self.hyperlink(name, &label)
    }

    fn modifier(&mut self, modifier: Modifier, content: &str) -> String {
        let tag = match modifier {
            Modifier::Asis => return escape_html(content),
            Modifier::Reference => return format!("&{content};"),
            Modifier::Color => return self.color(content),
            Modifier::Math => {
                let attr = self.attr();
                let plugin = self.inline_plugin(&format!("mtex '{content}'"));
                return format!("<span{attr}>{plugin}</span>");
            }
            Modifier::Strong => "strong",
            Modifier::Em => "em",
            Modifier::Del => "del",
            Modifier::Big => "big",
            Modifier::Small => "small",
            Modifier::Sup => "sup",
            Modifier::Sub => "sub",
            Modifier::Underline => "u",
            Modifier::Italic => "i",
            Modifier::Tt => "tt",
            Modifier::Cite => "cite",
            Modifier::Span => "span",
        };
        let attr = self.attr();
        format!("<{tag}{attr}>{content}</{tag}>")
    }

    fn inline_plugin(&mut self, source: &str) -> String {
        format!(r#"<span class="plugin">{{{{{}}}}}</span>"#, escape_html(source))
    }
}
