//! HikiDoc compiler.
//!
//! [`Compiler`] reads HikiDoc source and reports what it finds to a
//! [`sink::Sink`]. Two sinks ship with the crate: [`HtmlOutput`] renders
//! HTML or XHTML text and [`EventLog`] records the calls for inspection.
//!
//! ```
//! use hikidoc_engine::{Options, to_xhtml};
//!
//! let html = to_xhtml("!Title\n\nSome ''text''.\n", &Options::default()).unwrap();
//! assert_eq!(html, "<h1>Title</h1>\n<p>Some ''text''.</p>\n");
//! ```

pub mod error;
pub mod options;
pub mod parsing;
pub mod sink;

pub use error::{CompileError, Result};
pub use options::{Options, PluginSyntax};
pub use parsing::Compiler;
pub use sink::Sink;
pub use sink::event::{Event, EventLog};
pub use sink::html::{Flavor, HtmlOptions, HtmlOutput};

/// Compiles `src` to HTML with `<br>`-style empty tags.
pub fn to_html(src: &str, options: &Options) -> Result<String> {
    Compiler::new(HtmlOutput::html(), options.clone()).compile(src)
}

/// Compiles `src` to XHTML with `<br />`-style empty tags.
pub fn to_xhtml(src: &str, options: &Options) -> Result<String> {
    Compiler::new(HtmlOutput::xhtml(), options.clone()).compile(src)
}
