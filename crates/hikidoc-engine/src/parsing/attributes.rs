use super::Compiler;
use crate::error::Result;
use crate::sink::Sink;

impl<S: Sink> Compiler<S> {
    /// Consumes an attribute bracket at the start of `text`.
    ///
    /// On a match the bracket's interior (plugin placeholders restored) is
    /// pushed to the sink and the remainder returned; otherwise `text` comes
    /// back unchanged. Without id support the interior is stored behind an
    /// empty id slot so decomposition reads it as `class,"title"`.
    pub(crate) fn take_attribute(&mut self, text: &str) -> Result<String> {
        let Some(bracket) = self.grammar.attribute_prefix(text) else {
            return Ok(text.to_owned());
        };
        let rest = text[bracket.len()..].to_owned();
        let interior = self.restore(&bracket[1..bracket.len() - 1])?;
        let raw = if self.options.enable_id {
            interior
        } else {
            format!(",{interior}")
        };
        log::trace!("pending attribute {raw:?}");
        self.sink.push_attribute(raw);
        Ok(rest)
    }

    /// Consumes `text` when it is an attribute bracket and nothing else.
    pub(crate) fn take_attribute_only(&mut self, text: String) -> Result<String> {
        if self.grammar.is_attribute_line(&text) {
            self.take_attribute(&text)
        } else {
            Ok(text)
        }
    }
}
