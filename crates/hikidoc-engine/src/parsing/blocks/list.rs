use super::{continuation_lines, skip_comments};
use crate::error::{CompileError, Result};
use crate::parsing::cursor::LineCursor;
use crate::parsing::grammar;
use crate::parsing::{Compiler, lstrip, rstrip};
use crate::sink::{ListKind, Sink};

impl<S: Sink> Compiler<S> {
    /// Compiles a run of `*`/`#` lines into nested lists.
    ///
    /// The stack holds the kind of every open list, so its depth is the
    /// current nesting level. An item whose body opens a `(((` container
    /// gets that container as its content instead of inline text.
    pub(super) fn compile_list(&mut self, cur: &mut LineCursor) -> Result<()> {
        let mut stack: Vec<ListKind> = Vec::new();
        let mut unclosed = false;
        while let Some(line) = cur.read_if(grammar::list_marker()) {
            let depth = grammar::list_marker().find(&line).map_or(0, |m| m.len());
            let kind = if line.starts_with('*') {
                ListKind::Unordered
            } else {
                ListKind::Ordered
            };
            let rest = lstrip(&line[depth..]);
            let item = if grammar::container_open().is_match(rest) {
                cur.push_back(rest.to_owned());
                None
            } else {
                let mut item = rest.to_owned();
                item.push_str(&continuation_lines(cur));
                Some(rstrip(&item).to_owned())
            };

            let level = stack.len();
            unclosed = if depth > level {
                stack.extend(std::iter::repeat_n(kind, depth - level));
                self.list_up(level, depth, kind, item, cur)?
            } else if depth < level {
                let closing = stack.split_off(depth);
                self.list_down(closing, depth, item, cur, unclosed)?
            } else if stack.last() == Some(&kind) {
                self.list_continue(kind, item, cur, unclosed)?
            } else {
                let previous = stack
                    .pop()
                    .ok_or(CompileError::Unreachable("list change without an open list"))?;
                stack.push(kind);
                self.list_change(previous, kind, item, cur, unclosed)?
            };
            skip_comments(cur);
        }
        self.list_down(stack, 0, Some(String::new()), cur, unclosed)?;
        self.sink.line_break();
        Ok(())
    }

    fn list_up(
        &mut self,
        from: usize,
        to: usize,
        kind: ListKind,
        item: Option<String>,
        cur: &mut LineCursor,
    ) -> Result<bool> {
        let item = item.map(|item| self.take_attribute_only(item)).transpose()?;
        for level in from + 1..=to {
            // intermediate levels get an anonymous item to hang the next list on
            let intermediate = level < to;
            if intermediate {
                self.sink.push_attribute(String::new());
            }
            self.sink.list_open(kind);
            if intermediate {
                self.sink.push_attribute(String::new());
                self.sink.list_item_open();
            }
        }
        self.list_item(item, cur)
    }

    fn list_down(
        &mut self,
        closing: Vec<ListKind>,
        to: usize,
        item: Option<String>,
        cur: &mut LineCursor,
        mut unclosed: bool,
    ) -> Result<bool> {
        for kind in closing.into_iter().rev() {
            if unclosed {
                self.sink.list_item_close();
            }
            unclosed = true;
            self.sink.list_close(kind);
        }
        if to > 0 {
            self.sink.list_item_close();
        }
        self.list_item(item, cur)
    }

    fn list_continue(
        &mut self,
        kind: ListKind,
        item: Option<String>,
        cur: &mut LineCursor,
        unclosed: bool,
    ) -> Result<bool> {
        if unclosed {
            self.sink.list_item_close();
        }
        match item {
            // an attribute-only item splits the list in two
            Some(item) if self.grammar.is_attribute_line(&item) => {
                self.sink.list_close(kind);
                self.take_attribute(&item)?;
                self.sink.list_open(kind);
                Ok(false)
            }
            item => self.list_item(item, cur),
        }
    }

    fn list_change(
        &mut self,
        previous: ListKind,
        kind: ListKind,
        item: Option<String>,
        cur: &mut LineCursor,
        unclosed: bool,
    ) -> Result<bool> {
        if unclosed {
            self.sink.list_item_close();
        }
        self.sink.list_close(previous);
        let item = item.map(|item| self.take_attribute_only(item)).transpose()?;
        self.sink.list_open(kind);
        self.list_item(item, cur)
    }

    /// Emits one item and reports whether it was left open.
    fn list_item(&mut self, item: Option<String>, cur: &mut LineCursor) -> Result<bool> {
        match item {
            Some(item) if item.is_empty() => Ok(false),
            Some(item) => {
                let item = self.take_attribute(&item)?;
                self.sink.list_item_open();
                let content = self.compile_inline(&item, false)?;
                self.sink.list_item(&content);
                Ok(true)
            }
            None => {
                self.sink.list_item_open();
                self.compile_container(cur)?;
                Ok(true)
            }
        }
    }
}
