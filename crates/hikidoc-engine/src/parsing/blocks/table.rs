use super::skip_comments;
use crate::error::Result;
use crate::parsing::cursor::LineCursor;
use crate::parsing::grammar;
use crate::parsing::{Compiler, chomp};
use crate::sink::{CellKind, CellSpan, Sink};

impl<S: Sink> Compiler<S> {
    /// Compiles a run of `||` rows.
    ///
    /// Rows are gathered before anything is emitted. A cell that opens a
    /// `(((` container reads that container from the lines after the table
    /// run, which is also where the container's own lines were left.
    pub(super) fn compile_table(&mut self, cur: &mut LineCursor) -> Result<()> {
        let mut rows = Vec::new();
        while let Some(row) = cur.read_if(grammar::table_row()) {
            rows.push(row);
            skip_comments(cur);
        }

        self.sink.table_open();
        for row in rows {
            let row = self.take_attribute(&row)?;
            let cells = row.strip_prefix("||").unwrap_or(&row);
            self.sink.row_open();
            if !cells.is_empty() {
                for cell in cells.split("||") {
                    self.compile_cell(cell, cur)?;
                }
            }
            self.sink.row_close();
        }
        self.sink.table_close();
        Ok(())
    }

    fn compile_cell(&mut self, cell: &str, cur: &mut LineCursor) -> Result<()> {
        let (kind, cell) = match cell.strip_prefix('!') {
            Some(cell) => (CellKind::Head, cell),
            None => (CellKind::Data, cell),
        };
        let marks = cell.len() - cell.trim_start_matches(['^', '>']).len();
        let (marks, cell) = cell.split_at(marks);
        let span = CellSpan {
            rows: span_count(marks, '^'),
            columns: span_count(marks, '>'),
        };

        if grammar::container_open().is_match(cell) {
            cur.push_back(cell.to_owned());
            self.sink.cell_open(kind, span);
            self.compile_container(cur)?;
            self.sink.cell_close(kind);
        } else {
            let cell = self.take_attribute(cell)?;
            let content = self.compile_inline(chomp(&cell), false)?;
            self.sink.cell(kind, &content, span);
        }
        Ok(())
    }
}

/// Each marker extends the cell by one beyond its own row or column.
fn span_count(marks: &str, marker: char) -> Option<usize> {
    let count = marks.matches(marker).count();
    (count > 0).then_some(count + 1)
}
