use super::{Collected, Frame, backtrack};
use crate::error::{CompileError, Result};
use crate::parsing::cursor::LineCursor;
use crate::parsing::grammar::{self, BlockOpening};
use crate::parsing::{Compiler, chomp};
use crate::sink::{BlockKind, Sink};

impl BlockKind {
    /// Kinds whose body is taken verbatim up to the first `>>>` line.
    fn is_verbatim(self) -> bool {
        matches!(
            self,
            BlockKind::Pre | BlockKind::PreAsis | BlockKind::Asis | BlockKind::Math
        )
    }
}

impl<S: Sink> Compiler<S> {
    pub(super) fn compile_tagged_block(&mut self, cur: &mut LineCursor) -> Result<()> {
        match self.tagged_body(cur)? {
            Collected::Literal(line) => self.compile_paragraph(cur, Some(line)),
            Collected::Committed(frames) => self.commit_tagged(frames),
        }
    }

    fn block_kind(&self, opening: &BlockOpening<'_>) -> BlockKind {
        opening.kind.unwrap_or(if opening.rest.is_empty() {
            BlockKind::Anonymous
        } else {
            BlockKind::Div
        })
    }

    /// Reads a `<<<` block including its opening and closing lines.
    ///
    /// Text after the opener is only allowed when it carries an attribute
    /// bracket; otherwise the opener is an ordinary line. Blocks that do not
    /// reach a `>>>` line give back everything they read past the opener.
    fn tagged_body(&self, cur: &mut LineCursor) -> Result<Collected> {
        let first = cur
            .read()
            .ok_or(CompileError::Unreachable("tagged block at end of input"))?;
        let opening = self
            .grammar
            .block_opening(chomp(&first))
            .ok_or(CompileError::Unreachable("tagged block without an opener"))?;
        if !opening.rest.is_empty() && self.grammar.attribute_anywhere(opening.rest).is_none() {
            return Ok(Collected::Literal(first));
        }
        let kind = self.block_kind(&opening);

        let mut frames = vec![Frame::Line(first)];
        if kind.is_verbatim() {
            frames.extend(
                cur.read_until(grammar::block_end())
                    .into_iter()
                    .map(Frame::Line),
            );
        } else {
            loop {
                frames.extend(
                    cur.read_until(grammar::block_terminate())
                        .into_iter()
                        .map(Frame::Line),
                );
                if cur
                    .peek()
                    .is_some_and(|line| grammar::block_start().is_match(line))
                {
                    frames.push(match self.tagged_body(cur)? {
                        Collected::Literal(line) => Frame::Line(line),
                        Collected::Committed(nested) => Frame::Nested(nested),
                    });
                }
                if cur
                    .peek()
                    .is_none_or(|line| grammar::block_end().is_match(line))
                {
                    break;
                }
            }
        }

        let last = cur.read();
        let closed = last
            .as_deref()
            .is_some_and(|line| grammar::block_end().is_match(line));
        frames.extend(last.map(Frame::Line));
        if closed {
            Ok(Collected::Committed(frames))
        } else {
            Ok(backtrack(cur, &frames))
        }
    }

    /// Emits a block read by [`tagged_body`](Self::tagged_body).
    fn commit_tagged(&mut self, frames: Vec<Frame>) -> Result<()> {
        let mut frames = frames.into_iter();
        let Some(Frame::Line(first)) = frames.next() else {
            return Err(CompileError::Unreachable("tagged block without an opening line"));
        };
        let mut body: Vec<Frame> = frames.collect();
        body.pop();

        let opening = self
            .grammar
            .block_opening(chomp(&first))
            .ok_or(CompileError::Unreachable("tagged block without an opener"))?;
        let kind = self.block_kind(&opening);
        if !kind.is_verbatim() {
            body.retain(
                |frame| !matches!(frame, Frame::Line(line) if grammar::comment().is_match(line)),
            );
        }
        let rest = self.take_attribute(opening.rest)?;
        if !rest.is_empty() {
            body.insert(0, Frame::Line(rest));
        }

        log::trace!("{kind:?} block with {} line(s)", body.len());
        if kind == BlockKind::Math {
            self.sink.merge_attribute("", "math", "");
        }
        self.sink.block_open(kind);
        match kind {
            BlockKind::Pre | BlockKind::PreAsis => {
                let text = Frame::lines(&body).concat();
                self.compile_pre(chomp(&text), kind == BlockKind::PreAsis)?;
            }
            BlockKind::Asis => self.compile_asis(&body)?,
            BlockKind::Math => {
                let source = self.restore(chomp(&Frame::lines(&body).concat()))?;
                self.sink.math_block(&source);
            }
            _ => self.compile_misc(body)?,
        }
        self.sink.block_close(kind);
        Ok(())
    }

    fn compile_pre(&mut self, text: &str, asis: bool) -> Result<()> {
        let content = if asis {
            let restored = self.restore(text)?;
            self.sink.text(&restored)
        } else {
            self.compile_inline(text, true)?
        };
        self.sink.preformatted(&content);
        Ok(())
    }

    fn compile_asis(&mut self, body: &[Frame]) -> Result<()> {
        let mut lines = Vec::new();
        for line in Frame::lines(body) {
            let restored = self.restore(chomp(&line))?;
            lines.push(self.sink.text(&restored));
        }
        let separator = format!("{}\n", self.sink.break_line());
        self.sink.preformatted(&lines.join(&separator));
        Ok(())
    }

    /// Compiles the body of a block that holds other blocks.
    ///
    /// Plain lines accumulate into a buffer that is compiled as a document
    /// whenever a nested block has to be emitted in between. While a table
    /// cell or list item container is open, nested blocks are left inline in
    /// the buffer so the container sees them as its own content.
    fn compile_misc(&mut self, body: Vec<Frame>) -> Result<()> {
        let mut buffer = String::new();
        let mut open: isize = 0;
        for frame in body {
            match frame {
                Frame::Nested(nested) if open == 0 => {
                    self.compile_blocks(&std::mem::take(&mut buffer))?;
                    self.commit_tagged(nested)?;
                }
                Frame::Nested(nested) => {
                    for line in Frame::lines(&nested) {
                        self.buffer_misc_line(&line, &mut buffer, &mut open)?;
                    }
                }
                Frame::Line(line) => self.buffer_misc_line(&line, &mut buffer, &mut open)?,
            }
        }
        if !buffer.is_empty() {
            self.compile_blocks(&buffer)?;
        }
        Ok(())
    }

    fn buffer_misc_line(
        &mut self,
        line: &str,
        buffer: &mut String,
        open: &mut isize,
    ) -> Result<()> {
        let opens = grammar::cell_container().find_iter(line).count()
            + grammar::item_container().find_iter(line).count();
        *open += opens as isize;
        buffer.push_str(line);
        let closes = isize::from(grammar::container_end().is_match(line));
        if *open > 0 && *open == closes {
            self.compile_blocks(&std::mem::take(buffer))?;
        }
        *open -= closes;
        Ok(())
    }
}
