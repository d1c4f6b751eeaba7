use super::{Collected, Frame, backtrack, continuation_lines};
use crate::error::{CompileError, Result};
use crate::parsing::cursor::LineCursor;
use crate::parsing::grammar;
use crate::parsing::{Compiler, chomp};
use crate::sink::Sink;

impl<S: Sink> Compiler<S> {
    /// Compiles the `(((` container that the cursor is positioned on.
    ///
    /// A closed container's body is compiled as a document of its own; an
    /// unclosed one leaves only its opening line consumed, rendered as a
    /// preformatted line.
    pub(super) fn compile_container(&mut self, cur: &mut LineCursor) -> Result<()> {
        match container_body(cur)? {
            Collected::Literal(mut text) => {
                text.push_str(&continuation_lines(cur));
                let content = self.compile_inline(chomp(&text), false)?;
                self.sink.preformatted(&content);
            }
            Collected::Committed(body) => {
                self.compile_blocks(&Frame::lines(&body).concat())?;
            }
        }
        Ok(())
    }
}

/// Reads a `(((` container, excluding its opening and closing lines.
fn container_body(cur: &mut LineCursor) -> Result<Collected> {
    let first = cur
        .read()
        .ok_or(CompileError::Unreachable("container at end of input"))?;
    let opener = grammar::container_open()
        .find(&first)
        .ok_or(CompileError::Unreachable("container without an opener"))?;
    if opener.end() != first.len() {
        return Ok(Collected::Literal(first));
    }

    let mut frames = vec![Frame::Line(first)];
    collect_until_close(cur, &mut frames);
    match cur.read() {
        Some(last) if grammar::container_end().is_match(&last) => {
            frames.remove(0);
            Ok(Collected::Committed(frames))
        }
        _ => Ok(backtrack(cur, &frames)),
    }
}

/// Gathers lines up to the closing `)))` of the current level, folding in
/// nested containers opened by table cells and list items.
fn collect_until_close(cur: &mut LineCursor, frames: &mut Vec<Frame>) {
    loop {
        frames.extend(
            cur.read_until(grammar::container_terminate())
                .into_iter()
                .map(Frame::Line),
        );
        if cur
            .peek()
            .is_some_and(|line| grammar::container_element().is_match(line))
        {
            frames.push(nested_container(cur));
        }
        if cur
            .peek()
            .is_none_or(|line| grammar::container_end().is_match(line))
        {
            break;
        }
    }
}

/// Reads a line that opens one or more containers together with every
/// container it opens.
fn nested_container(cur: &mut LineCursor) -> Frame {
    let Some(first) = cur.read() else {
        return Frame::Nested(Vec::new());
    };
    let opens = grammar::container_element().find_iter(&first).count();
    if opens == 0 {
        return Frame::Line(first);
    }

    let mut frames = vec![Frame::Line(first)];
    let mut closed = false;
    for _ in 0..opens {
        collect_until_close(cur, &mut frames);
        let last = cur.read();
        closed = last
            .as_deref()
            .is_some_and(|line| grammar::container_end().is_match(line));
        frames.extend(last.map(Frame::Line));
    }
    if closed {
        Frame::Nested(frames)
    } else {
        match backtrack(cur, &frames) {
            Collected::Literal(first) => Frame::Line(first),
            Collected::Committed(frames) => Frame::Nested(frames),
        }
    }
}
