//! Block-level compilation.
//!
//! [`Compiler::compile_blocks`] classifies the line under the cursor and
//! dispatches to the construct that owns it. Constructs read their own
//! lines and leave the cursor on the first line they do not own.

mod container;
mod definition;
mod list;
mod paragraph;
mod table;
mod tagged;

use super::cursor::LineCursor;
use super::grammar::{self, Grammar};
use super::{Compiler, lstrip, rstrip};
use crate::error::{CompileError, Result};
use crate::sink::Sink;

/// What a line starts, in the order lines are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Comment,
    Header,
    Rule,
    List,
    DefinitionList,
    Table,
    TaggedBlock,
    Attribute,
    Blank,
    Paragraph,
}

impl LineClass {
    pub(crate) fn of(grammar: &Grammar, line: &str) -> Self {
        if grammar::comment().is_match(line) {
            Self::Comment
        } else if grammar::header_marker().is_match(line) {
            Self::Header
        } else if grammar::rule().is_match(line) {
            Self::Rule
        } else if grammar::list_marker().is_match(line) {
            Self::List
        } else if grammar::definition_marker().is_match(line) {
            Self::DefinitionList
        } else if grammar::table_row().is_match(line) {
            Self::Table
        } else if grammar::block_start().is_match(line) {
            Self::TaggedBlock
        } else if grammar.is_attribute_line(line) {
            Self::Attribute
        } else if grammar::blank().is_match(line) {
            Self::Blank
        } else {
            Self::Paragraph
        }
    }
}

/// Lines gathered by a speculative container parse.
///
/// A nested construct that closed properly keeps its own frame so it can
/// be compiled as a unit; everything else is a plain line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    Line(String),
    Nested(Vec<Frame>),
}

impl Frame {
    fn lines(frames: &[Frame]) -> Vec<String> {
        let mut out = Vec::new();
        for frame in frames {
            frame.flatten_into(&mut out);
        }
        out
    }

    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            Frame::Line(line) => out.push(line.clone()),
            Frame::Nested(frames) => {
                for frame in frames {
                    frame.flatten_into(out);
                }
            }
        }
    }
}

/// Outcome of a speculative container parse.
#[derive(Debug)]
pub(crate) enum Collected {
    /// The container closed; its frame follows.
    Committed(Vec<Frame>),
    /// The container never closed. Only the opening line was consumed and
    /// it is handed back to be treated as text.
    Literal(String),
}

/// Returns every consumed line after the first to the cursor and hands the
/// first back as literal text.
fn backtrack(cur: &mut LineCursor, frames: &[Frame]) -> Collected {
    let mut lines = Frame::lines(frames).into_iter();
    let first = lines.next().unwrap_or_default();
    log::debug!("unclosed container at {:?}, backtracking", first.trim_end());
    cur.push_back_all(lines.collect::<Vec<_>>().into_iter());
    Collected::Literal(first)
}

impl<S: Sink> Compiler<S> {
    pub(crate) fn compile_blocks(&mut self, src: &str) -> Result<()> {
        let mut cur = LineCursor::new(src);
        while let Some(line) = cur.peek() {
            let class = LineClass::of(&self.grammar, line);
            log::trace!("{class:?}: {line:?}");
            match class {
                LineClass::Comment | LineClass::Blank => {
                    cur.read();
                }
                LineClass::Header => self.compile_header(&mut cur)?,
                LineClass::Rule => self.compile_rule(&mut cur)?,
                LineClass::List => self.compile_list(&mut cur)?,
                LineClass::DefinitionList => self.compile_definition_list(&mut cur)?,
                LineClass::Table => self.compile_table(&mut cur)?,
                LineClass::TaggedBlock => self.compile_tagged_block(&mut cur)?,
                LineClass::Attribute => {
                    if let Some(line) = cur.read() {
                        self.take_attribute(&line)?;
                    }
                }
                LineClass::Paragraph => self.compile_paragraph(&mut cur, None)?,
            }
        }
        Ok(())
    }

    fn compile_header(&mut self, cur: &mut LineCursor) -> Result<()> {
        let Some(line) = cur.read() else {
            return Ok(());
        };
        let depth = self
            .grammar
            .header_depth(&line)
            .ok_or(CompileError::Unreachable("header line without a marker"))?;
        let mut title = self.take_attribute(lstrip(&line[depth..]))?;
        title.push_str(&continuation_lines(cur));
        let content = self.compile_inline(rstrip(&title), false)?;
        // depth is at most 6
        self.sink
            .headline(self.options.heading_base(), (depth - 1) as u8, &content);
        Ok(())
    }

    fn compile_rule(&mut self, cur: &mut LineCursor) -> Result<()> {
        let Some(line) = cur.read() else {
            return Ok(());
        };
        if let Some(bracket) = self.grammar.attribute_anywhere(&line) {
            let bracket = bracket.to_owned();
            self.take_attribute(&bracket)?;
        }
        self.sink.rule();
        Ok(())
    }
}

/// Indented lines that continue the item above, joined verbatim.
fn continuation_lines(cur: &mut LineCursor) -> String {
    cur.read_while(grammar::continuation()).concat()
}

fn skip_comments(cur: &mut LineCursor) {
    cur.read_while(grammar::comment());
}
