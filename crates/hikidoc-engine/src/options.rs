use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Compiler switches. Read-only once a [`crate::Compiler`] is built.
#[derive(Debug, Clone)]
pub struct Options {
    /// Heading base level; `!` renders as `<h{level}>`. Clamped to 1..=6.
    pub level: u8,
    /// `[[picture.png]]` renders an image instead of a link.
    pub allow_bracket_inline_image: bool,
    /// CamelCase tokens become links.
    pub use_wiki_name: bool,
    /// A leading `^` keeps a CamelCase token as plain text.
    pub use_not_wiki_name: bool,
    /// Attribute brackets accept an id slot: `[id,class,"title"]`.
    pub enable_id: bool,
    /// Recognise `<<<math` blocks. `{$...$}` spans are always recognised.
    pub enable_math: bool,
    /// Render plugin calls inside `pre` blocks instead of restoring them verbatim.
    pub evaluate_plugins_in_pre: bool,
    pub plugin_syntax: PluginSyntax,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level: 1,
            allow_bracket_inline_image: true,
            use_wiki_name: true,
            use_not_wiki_name: true,
            enable_id: false,
            enable_math: true,
            evaluate_plugins_in_pre: false,
            plugin_syntax: PluginSyntax::default(),
        }
    }
}

impl Options {
    pub fn heading_base(&self) -> u8 {
        self.level.clamp(1, 6)
    }
}

/// Decides whether the text between `{{` and a candidate `}}` is a complete
/// plugin call. Rejecting a candidate makes the shield try the next `}}`.
#[derive(Clone)]
pub struct PluginSyntax(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl PluginSyntax {
    pub fn new(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    pub fn accepts(&self, body: &str) -> bool {
        (self.0)(body)
    }
}

impl Default for PluginSyntax {
    fn default() -> Self {
        Self::new(balanced_quotes)
    }
}

impl fmt::Debug for PluginSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PluginSyntax(..)")
    }
}

static ESCAPED_QUOTE: OnceLock<Regex> = OnceLock::new();
static QUOTED: OnceLock<Regex> = OnceLock::new();

/// Default plugin predicate: no quote may be left open.
///
/// Escaped backslashes go first, then escaped quotes, then every complete
/// `'...'` or `"..."` literal. Any quote still standing means the candidate
/// `}}` sits inside a string.
pub fn balanced_quotes(code: &str) -> bool {
    let escaped_quote =
        ESCAPED_QUOTE.get_or_init(|| Regex::new(r#"\\['"]"#).expect("Invalid escaped quote regex"));
    let quoted = QUOTED
        .get_or_init(|| Regex::new(r#"'[^']*'|"[^"]*""#).expect("Invalid quoted literal regex"));

    let stripped = code.replace(r"\\", "");
    let stripped = escaped_quote.replace_all(&stripped, "");
    let stripped = quoted.replace_all(&stripped, "");
    !stripped.contains(['\'', '"'])
}
