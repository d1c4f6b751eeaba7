use crate::error::Result;
use crate::parsing::cursor::LineCursor;
use crate::parsing::grammar;
use crate::parsing::{Compiler, chomp, lstrip, strip};
use crate::sink::{Modifier, Sink};

impl<S: Sink> Compiler<S> {
    /// Compiles lines up to the next block start as one paragraph.
    ///
    /// `preload` is a line handed back by a construct that turned out to be
    /// literal text. A paragraph consisting of a lone plugin call becomes a
    /// block plugin instead.
    pub(super) fn compile_paragraph(
        &mut self,
        cur: &mut LineCursor,
        preload: Option<String>,
    ) -> Result<()> {
        let mut lines: Vec<String> = preload.into_iter().collect();
        lines.extend(
            cur.read_until(grammar::paragraph_end())
                .into_iter()
                .filter(|line| !grammar::comment().is_match(line)),
        );

        let lone_plugin = match lines.as_slice() {
            [line] => sole_placeholder(strip(line)),
            _ => None,
        };
        if let Some(index) = lone_plugin {
            let source = self.plugins.get(index)?.to_owned();
            self.sink.block_plugin(&source);
            return Ok(());
        }

        let mut rendered: Vec<String> = Vec::new();
        for line in &lines {
            if grammar::continuation().is_match(line) && !rendered.is_empty() {
                let br = self.sink.break_line();
                if let Some(previous) = rendered.last_mut() {
                    previous.push_str(&br);
                }
            }
            let line = lstrip(line);
            if self.grammar.attribute_prefix(line).is_some() {
                let rest = self.take_attribute(line)?;
                if !chomp(&rest).is_empty() {
                    let content = self.compile_inline(chomp(lstrip(&rest)), false)?;
                    rendered.push(self.sink.modifier(Modifier::Span, &content));
                }
            } else {
                rendered.push(self.compile_inline(chomp(line), false)?);
            }
        }
        self.sink.paragraph(&rendered);
        Ok(())
    }
}

/// Index of the placeholder when `text` is exactly one placeholder.
fn sole_placeholder(text: &str) -> Option<usize> {
    let digits = text.strip_prefix('\0')?.strip_suffix('\0')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
