use crate::error::Result;
use crate::parsing::Compiler;
use crate::sink::Sink;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "gif", "png"];

impl<S: Sink> Compiler<S> {
    /// Compiles the inside of `[[...]]`.
    ///
    /// Everything before the last `|` is the label and may carry modifiers.
    /// With no `|` the target doubles as the label.
    pub(super) fn compile_bracket_link(&mut self, link: &str) -> Result<String> {
        let images = self.options.allow_bracket_inline_image && !self.suppress_images;
        if let Some((label, target)) = link.rsplit_once('|') {
            let uri = self.restore(fix_uri(target))?;
            if images && is_image(target) {
                let alt = self.restore(label)?;
                Ok(self.sink.image_link(&uri, &alt))
            } else {
                let label = self.compile_modifiers(label)?;
                Ok(self.sink.hyperlink(&uri, &label))
            }
        } else {
            let uri = self.restore(fix_uri(link))?;
            if images && is_image(link) {
                Ok(self.sink.image_link(&uri, ""))
            } else {
                let label = self.restore(link)?;
                let label = self.sink.text(&label);
                Ok(self.sink.hyperlink(&uri, &label))
            }
        }
    }

    pub(super) fn compile_autolink(&mut self, uri: &str) -> Result<String> {
        if is_image(uri) {
            Ok(self.sink.image_link(fix_uri(uri), ""))
        } else {
            let label = self.sink.text(uri);
            Ok(self.sink.hyperlink(fix_uri(uri), &label))
        }
    }
}

/// Drops the scheme from scheme-relative links such as `http:page.html`.
fn fix_uri(uri: &str) -> &str {
    for scheme in ["http:", "https:", "ftp:", "file:"] {
        if let Some(rest) = uri.strip_prefix(scheme) {
            return if rest.starts_with("//") { uri } else { rest };
        }
    }
    uri
}

fn is_image(uri: &str) -> bool {
    uri.rsplit_once('.').is_some_and(|(_, extension)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|image| extension.eq_ignore_ascii_case(image))
    })
}
