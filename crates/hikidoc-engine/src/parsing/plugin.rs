//! Plugin shielding.
//!
//! `{{...}}` calls are cut out of the source before any grammar runs and
//! replaced by `\0N\0`, where `N` indexes the plugin table. Block and inline
//! patterns therefore never see plugin bodies. Placeholders are turned back
//! into literal `{{...}}` text ([`PluginTable::restore`]) or into plugin
//! invocations on the sink ([`Compiler::evaluate_plugins`]).

use super::Compiler;
use super::grammar;
use crate::error::{CompileError, Result};
use crate::options::PluginSyntax;
use crate::sink::Sink;

/// Append-only store of extracted plugin bodies.
#[derive(Debug, Default, Clone)]
pub struct PluginTable {
    entries: Vec<String>,
}

/// A slice of shielded text: either literal text or a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    Plugin(usize),
}

impl PluginTable {
    /// Replaces every acceptable `{{...}}` in `text` with a placeholder.
    ///
    /// For each `{{` the closest `}}` whose body `syntax` accepts wins; when
    /// no `}}` is acceptable the `{{` stays literal and scanning resumes
    /// right after it. Clears any previous table contents.
    pub fn shield(&mut self, text: &str, syntax: &PluginSyntax) -> String {
        self.entries.clear();
        let mut shielded = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find("{{") {
            shielded.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            match extract(after, syntax) {
                Some(end) => {
                    shielded.push('\0');
                    shielded.push_str(&self.entries.len().to_string());
                    shielded.push('\0');
                    self.entries.push(after[..end].to_owned());
                    rest = &after[end + 2..];
                }
                None => {
                    shielded.push_str("{{");
                    rest = after;
                }
            }
        }
        shielded.push_str(rest);
        shielded
    }

    pub fn get(&self, index: usize) -> Result<&str> {
        self.entries
            .get(index)
            .map(String::as_str)
            .ok_or(CompileError::UnknownPlugin(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Turns placeholders back into their `{{...}}` source text.
    pub fn restore(&self, fragment: &str) -> Result<String> {
        let mut restored = String::with_capacity(fragment.len());
        for piece in pieces(fragment) {
            match piece {
                Piece::Text(text) => restored.push_str(text),
                Piece::Plugin(index) => {
                    restored.push_str("{{");
                    restored.push_str(self.get(index)?);
                    restored.push_str("}}");
                }
            }
        }
        Ok(restored)
    }
}

/// Byte offset of the first acceptable `}}` in `after`, if any.
fn extract(after: &str, syntax: &PluginSyntax) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = after[from..].find("}}") {
        let end = from + found;
        if syntax.accepts(&after[..end]) {
            return Some(end);
        }
        from = end + 2;
    }
    None
}

/// Splits shielded text on placeholder boundaries. Empty text pieces are
/// skipped.
pub fn pieces(fragment: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in grammar::placeholder().captures_iter(fragment) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Piece::Text(&fragment[last..whole.start()]));
        }
        out.push(Piece::Plugin(digits.as_str().parse().unwrap_or(usize::MAX)));
        last = whole.end();
    }
    if last < fragment.len() {
        out.push(Piece::Text(&fragment[last..]));
    }
    out
}

impl<S: Sink> Compiler<S> {
    /// Renders shielded text: literal pieces through the sink's escaping,
    /// placeholders as inline plugin calls. An attribute bracket at the start
    /// of a plugin body is consumed into the pending attributes.
    pub(crate) fn evaluate_plugins(&mut self, fragment: &str) -> Result<String> {
        let mut rendered = String::new();
        for piece in pieces(fragment) {
            match piece {
                Piece::Text(text) => rendered.push_str(&self.sink.text(text)),
                Piece::Plugin(index) => {
                    let source = self.plugins.get(index)?.to_owned();
                    let source = self.take_attribute(&source)?;
                    rendered.push_str(&self.sink.inline_plugin(&source));
                }
            }
        }
        Ok(rendered)
    }

    pub(crate) fn restore(&self, fragment: &str) -> Result<String> {
        self.plugins.restore(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shield(text: &str) -> (String, PluginTable) {
        let mut table = PluginTable::default();
        let shielded = table.shield(text, &PluginSyntax::default());
        (shielded, table)
    }

    #[test]
    fn plugin_spans_become_placeholders() {
        let (shielded, table) = shield("a {{foo}} b {{bar(1)}}");
        assert_eq!(shielded, "a \u{0}0\u{0} b \u{0}1\u{0}");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Ok("bar(1)"));
    }

    #[test]
    fn closing_braces_inside_quotes_do_not_end_the_span() {
        let (shielded, table) = shield(r#"{{foo("}}")}}"#);
        assert_eq!(shielded, "\u{0}0\u{0}");
        assert_eq!(table.get(0), Ok(r#"foo("}}")"#));
    }

    #[test]
    fn unterminated_span_stays_literal() {
        let (shielded, table) = shield("{{foo('}} bar");
        assert_eq!(shielded, "{{foo('}} bar");
        assert!(table.is_empty());
    }

    #[test]
    fn literal_open_does_not_swallow_later_plugins() {
        let (shielded, table) = shield("{{'x}} {{ok}}");
        assert_eq!(table.get(0), Ok("ok"));
        assert_eq!(shielded, "{{'x}} \u{0}0\u{0}");
        let (shielded, table) = shield("{{'x}}'}}");
        assert_eq!(table.get(0), Ok("'x}}'"));
        assert_eq!(shielded, "\u{0}0\u{0}");
        let (shielded, table) = shield("{{\"x {{ok}}");
        assert_eq!(table.get(0), Ok("ok"));
        assert_eq!(shielded, "{{\"x \u{0}0\u{0}");
    }

    #[test]
    fn restore_round_trips_the_source() {
        let source = r#"x {{foo("}}")}} y {{bar}}"#;
        let (shielded, table) = shield(source);
        assert_eq!(table.restore(&shielded).unwrap(), source);
    }

    #[test]
    fn unknown_placeholder_is_fatal() {
        let table = PluginTable::default();
        assert_eq!(
            table.restore("\u{0}3\u{0}"),
            Err(CompileError::UnknownPlugin(3))
        );
    }

    #[test]
    fn pieces_alternate_text_and_plugins() {
        assert_eq!(
            pieces("a\u{0}0\u{0}\u{0}12\u{0}b"),
            vec![
                Piece::Text("a"),
                Piece::Plugin(0),
                Piece::Plugin(12),
                Piece::Text("b")
            ]
        );
        assert!(pieces("").is_empty());
    }

    #[test]
    fn custom_syntax_controls_the_closing_brace() {
        let mut table = PluginTable::default();
        let syntax = PluginSyntax::new(|body| !body.ends_with('x'));
        let shielded = table.shield("{{ax}}b}}", &syntax);
        assert_eq!(shielded, "\u{0}0\u{0}");
        assert_eq!(table.get(0), Ok("ax}}b"));
    }
}
