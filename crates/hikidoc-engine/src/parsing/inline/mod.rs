//! Inline compilation: links, autolinks, modifiers, CamelCase names and
//! continuation breaks inside a single piece of block content.

mod link;
mod modifier;

use crate::error::{CompileError, Result};
use crate::parsing::Compiler;
use crate::sink::Sink;
use regex::Captures;

impl<S: Sink> Compiler<S> {
    /// Compiles `text` into rendered inline content.
    ///
    /// In preformatted text only the preformatted subset of modifiers is
    /// recognised, line breaks stay literal and bracket links never become
    /// images, including inside modifiers nested in the text.
    pub(crate) fn compile_inline(&mut self, text: &str, in_pre: bool) -> Result<String> {
        if !in_pre {
            return self.scan_inline(text, false);
        }
        let saved = std::mem::replace(&mut self.suppress_images, true);
        let rendered = self.scan_inline(text, true);
        self.suppress_images = saved;
        rendered
    }

    fn scan_inline(&mut self, text: &str, in_pre: bool) -> Result<String> {
        let pattern = self.grammar.inline(in_pre).clone();
        let mut rendered = String::new();
        // literal text held back by `^Name` escapes
        let mut pending = String::new();
        let mut rest = text;
        while let Some(caps) = pattern.captures(rest) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            let before = &rest[..whole.start()];
            let after = &rest[whole.end()..];

            if let Some(escaped) = caps
                .name("wiki_name")
                .and_then(|name| name.as_str().strip_prefix('^'))
            {
                pending.push_str(before);
                pending.push_str(escaped);
                rest = after;
                continue;
            }

            pending.push_str(before);
            let literal = std::mem::take(&mut pending);
            rendered.push_str(&self.literal(&literal, in_pre)?);
            rendered.push_str(&self.compile_markup(&caps)?);
            rest = after;
        }
        pending.push_str(rest);
        rendered.push_str(&self.literal(&pending, in_pre)?);
        Ok(rendered)
    }

    fn literal(&mut self, text: &str, in_pre: bool) -> Result<String> {
        if in_pre && !self.options.evaluate_plugins_in_pre {
            let restored = self.restore(text)?;
            Ok(self.sink.text(&restored))
        } else {
            self.evaluate_plugins(text)
        }
    }

    fn compile_markup(&mut self, caps: &Captures<'_>) -> Result<String> {
        if let Some(link) = caps.name("link") {
            let link = link.as_str();
            let inner = self.take_attribute(&link[2..link.len() - 2])?;
            return self.compile_bracket_link(&inner);
        }
        if let Some(uri) = caps.name("uri") {
            self.sink.push_attribute(String::new());
            return self.compile_autolink(uri.as_str());
        }
        if let Some(chunk) = caps.name("modifier") {
            return self.compile_modifiers(chunk.as_str());
        }
        if let Some(name) = caps.name("wiki_name") {
            self.sink.push_attribute(String::new());
            return Ok(self.sink.wiki_name(name.as_str()));
        }
        if caps.name("break").is_some() {
            return Ok(self.sink.break_line());
        }
        Err(CompileError::Unreachable("inline match without a construct"))
    }
}
