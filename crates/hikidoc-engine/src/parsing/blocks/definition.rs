use super::{continuation_lines, skip_comments};
use crate::error::Result;
use crate::parsing::cursor::LineCursor;
use crate::parsing::grammar;
use crate::parsing::{Compiler, chomp};
use crate::sink::Sink;

impl<S: Sink> Compiler<S> {
    /// Compiles `;term:description` and `:description` lines.
    pub(super) fn compile_definition_list(&mut self, cur: &mut LineCursor) -> Result<()> {
        self.sink.definition_list_open();
        while let Some(mut line) = cur.read_if(grammar::definition_marker()) {
            line.push_str(&continuation_lines(cur));
            let line = chomp(&line);
            let body = &line[1..];
            let (term, description) = if line.starts_with(':') {
                (None, Some(body))
            } else {
                let mut parts = body.split(";:");
                (parts.next(), parts.next())
            };

            match description {
                Some(description) if grammar::container_open().is_match(description) => {
                    cur.push_back(description.to_owned());
                    if let Some(term) = term.filter(|term| !term.is_empty()) {
                        let term = self.compile_inline(term, false)?;
                        self.sink.definition_item(&term, "");
                    }
                    self.sink.description_open();
                    self.compile_container(cur)?;
                    self.sink.description_close();
                }
                _ => {
                    let description = description
                        .map(|description| self.take_attribute(description))
                        .transpose()?;
                    let term = term.map(|term| self.take_attribute(term)).transpose()?;
                    let term = self.compile_inline(term.as_deref().unwrap_or(""), false)?;
                    let description =
                        self.compile_inline(description.as_deref().unwrap_or(""), false)?;
                    self.sink.definition_item(&term, &description);
                }
            }
            skip_comments(cur);
        }
        self.sink.definition_list_close();
        Ok(())
    }
}
