//! The output side of value rendering.

use std::{fmt, str::FromStr};

use crate::error::TypeError;

/// Receives rendered output. Implemented by the document back-end.
pub trait DocumentRenderer {
    /// Appends plain character data; the back-end escapes it as needed.
    fn cdata(&mut self, text: &str);
}

/// The kind of document being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Xhtml,
    Metadata,
    Text,
}

impl FromStr for RenderMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xhtml" => Ok(RenderMode::Xhtml),
            "metadata" => Ok(RenderMode::Metadata),
            "text" => Ok(RenderMode::Text),
            other => Err(TypeError::InvalidConfig(format!(
                "unknown render mode `{other}`"
            ))),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Xhtml => "xhtml",
            RenderMode::Metadata => "metadata",
            RenderMode::Text => "text",
        };
        f.write_str(name)
    }
}

/// Collects rendered output into a string.
#[derive(Debug, Default, Clone)]
pub struct StringRenderer {
    pub doc: String,
}

impl DocumentRenderer for StringRenderer {
    fn cdata(&mut self, text: &str) {
        self.doc.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentRenderer, RenderMode, StringRenderer};

    #[test]
    fn test_render_mode_names() {
        for mode in [RenderMode::Xhtml, RenderMode::Metadata, RenderMode::Text] {
            assert_eq!(mode.to_string().parse::<RenderMode>().unwrap(), mode);
        }
        assert!("odt".parse::<RenderMode>().is_err());
    }

    #[test]
    fn test_string_renderer_appends() {
        let mut r = StringRenderer::default();
        r.cdata("a");
        r.cdata(", ");
        r.cdata("b");
        assert_eq!(r.doc, "a, b");
    }
}
