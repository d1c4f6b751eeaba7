//! Single-pass HikiDoc compiler.
//!
//! Compilation runs in two stages over one [`Compiler`]:
//!
//! 1. The plugin shield replaces `{{...}}` calls with placeholders
//!    ([`plugin`]).
//! 2. The block compiler walks the shielded text line by line through a
//!    [`LineCursor`], classifying each line and handing inline content to
//!    the inline compiler ([`blocks`], [`inline`]).
//!
//! Both stages report straight to the [`Sink`]; nothing is buffered into a
//! tree. Container constructs (`<<< ... >>>`, `((( ... )))`) are parsed
//! speculatively and, when their closing line never arrives, every line
//! they consumed is pushed back so the text reparses as if the attempt had
//! never happened.

mod attributes;
pub mod blocks;
pub mod cursor;
pub(crate) mod grammar;
mod inline;
pub mod plugin;

pub use cursor::LineCursor;
pub use plugin::{Piece, PluginTable};

use crate::error::Result;
use crate::options::Options;
use crate::sink::Sink;
use grammar::Grammar;

/// Compiles HikiDoc source into calls on a [`Sink`].
///
/// One compiler can compile any number of documents in turn; each
/// [`compile`](Compiler::compile) starts from an empty plugin table and a
/// reset sink.
#[derive(Debug)]
pub struct Compiler<S: Sink> {
    options: Options,
    grammar: Grammar,
    plugins: PluginTable,
    sink: S,
    suppress_images: bool,
}

impl<S: Sink> Compiler<S> {
    pub fn new(sink: S, options: Options) -> Self {
        Self {
            grammar: Grammar::new(&options),
            options,
            plugins: PluginTable::default(),
            sink,
            suppress_images: false,
        }
    }

    pub fn compile(&mut self, src: &str) -> Result<S::Output> {
        self.sink.reset();
        self.suppress_images = false;
        let shielded = self.plugins.shield(src, &self.options.plugin_syntax);
        log::debug!("shielded {} plugin call(s)", self.plugins.len());
        self.compile_blocks(&shielded)?;
        Ok(self.sink.finish())
    }
}

const WHITESPACE: [char; 6] = [' ', '\t', '\r', '\n', '\x0b', '\x0c'];

pub(crate) fn lstrip(s: &str) -> &str {
    s.trim_start_matches(WHITESPACE)
}

pub(crate) fn rstrip(s: &str) -> &str {
    s.trim_end_matches(WHITESPACE)
}

pub(crate) fn strip(s: &str) -> &str {
    rstrip(lstrip(s))
}

/// Drops one trailing line terminator.
pub(crate) fn chomp(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .or_else(|| s.strip_suffix('\r'))
        .unwrap_or(s)
}
