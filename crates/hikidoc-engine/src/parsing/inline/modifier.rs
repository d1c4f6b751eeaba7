use crate::error::{CompileError, Result};
use crate::parsing::grammar;
use crate::parsing::{Compiler, strip};
use crate::sink::{Modifier, Sink};

/// Opening sequences, three-character forms first so `{''` is not read
/// as `{'`.
const PREFIXES: [(&str, Modifier); 16] = [
    ("{''", Modifier::Strong),
    ("{^^", Modifier::Sup),
    ("{__", Modifier::Sub),
    ("{'", Modifier::Em),
    ("{=", Modifier::Del),
    ("{+", Modifier::Big),
    ("{-", Modifier::Small),
    ("{_", Modifier::Underline),
    ("{/", Modifier::Italic),
    ("{`", Modifier::Tt),
    ("{!", Modifier::Asis),
    ("{@", Modifier::Cite),
    ("{\"", Modifier::Span),
    ("{~", Modifier::Color),
    ("{$", Modifier::Math),
    ("{&", Modifier::Reference),
];

impl Modifier {
    /// Families whose body is rendered as written rather than compiled.
    fn keeps_raw_body(self) -> bool {
        matches!(self, Modifier::Asis | Modifier::Math | Modifier::Reference)
    }
}

impl<S: Sink> Compiler<S> {
    /// Renders every modifier in `text`; the text between them goes
    /// through plugin evaluation only.
    pub(super) fn compile_modifiers(&mut self, text: &str) -> Result<String> {
        let mut rendered = String::new();
        let mut rest = text;
        while let Some(found) = grammar::modifier().find(rest) {
            rendered.push_str(&self.evaluate_plugins(&rest[..found.start()])?);
            rendered.push_str(&self.compile_modifier(found.as_str())?);
            rest = &rest[found.end()..];
        }
        rendered.push_str(&self.evaluate_plugins(rest)?);
        Ok(rendered)
    }

    fn compile_modifier(&mut self, chunk: &str) -> Result<String> {
        let (modifier, body) = split_modifier(chunk)
            .ok_or(CompileError::Unreachable("modifier without a known opening"))?;
        let body = self.take_attribute(body)?;
        let body = strip(&body);
        let content = if modifier.keeps_raw_body() {
            self.restore(body)?
        } else {
            self.compile_inline(body, false)?
        };
        if modifier == Modifier::Math {
            self.sink.merge_attribute("", "math", "");
        }
        Ok(self.sink.modifier(modifier, &content))
    }
}

/// Splits a matched modifier into its family and body.
///
/// The opening decides the family even when a shorter family matched, so
/// `{'''}` is an empty strong span.
fn split_modifier(chunk: &str) -> Option<(Modifier, &str)> {
    let (prefix, modifier) = PREFIXES
        .iter()
        .find(|(prefix, _)| chunk.starts_with(prefix))?;
    let width = prefix.len();
    let body = chunk
        .get(width..chunk.len().saturating_sub(width))
        .unwrap_or("");
    Some((*modifier, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("{''bold''}", Modifier::Strong, "bold")]
    #[case("{'em'}", Modifier::Em, "em")]
    #[case("{^^up^^}", Modifier::Sup, "up")]
    #[case("{__down__}", Modifier::Sub, "down")]
    #[case("{_under_}", Modifier::Underline, "under")]
    #[case("{\"[cls]x\"}", Modifier::Span, "[cls]x")]
    #[case("{&amp;}", Modifier::Reference, "amp")]
    #[case("{$x^2$}", Modifier::Math, "x^2")]
    #[case("{'''}", Modifier::Strong, "")]
    fn splits_family_and_body(#[case] chunk: &str, #[case] modifier: Modifier, #[case] body: &str) {
        assert_eq!(split_modifier(chunk), Some((modifier, body)));
    }

    #[test]
    fn unknown_opening_is_rejected() {
        assert_eq!(split_modifier("{?x?}"), None);
    }
}
