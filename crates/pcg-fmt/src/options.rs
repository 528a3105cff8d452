use pcg_core::{ErrorInfo, PcgError};
use serde::{Deserialize, Serialize};

/// Layout options of the printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenderOptions {
    /// Indentation unit per nesting level.
    #[serde(default = "default_indent")]
    pub indent: String,
    /// Widest single-line tag, indentation included.
    #[serde(default = "default_max_width")]
    pub max_width: usize,
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_max_width() -> usize {
    100
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            max_width: default_max_width(),
        }
    }
}

impl RenderOptions {
    /// Options with a custom maximum width.
    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Rejects options that cannot produce a well-formed layout.
    pub fn validate(&self) -> Result<(), PcgError> {
        if self.max_width == 0 {
            return Err(PcgError::Render(
                ErrorInfo::new("invalid-render-options", "maximum width must be positive")
                    .with_context("max_width", "0"),
            ));
        }
        if !self.indent.chars().all(|ch| ch == ' ' || ch == '\t') {
            return Err(PcgError::Render(
                ErrorInfo::new(
                    "invalid-render-options",
                    "indentation may only contain spaces and tabs",
                )
                .with_context("indent", self.indent.clone()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = RenderOptions::default();
        assert_eq!(options.indent, "  ");
        assert_eq!(options.max_width, 100);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = RenderOptions::default().with_max_width(0).validate().unwrap_err();
        assert_eq!(err.code(), "invalid-render-options");
        assert!(matches!(err, PcgError::Render(_)));
    }

    #[test]
    fn visible_indent_is_rejected() {
        let options = RenderOptions {
            indent: "--".into(),
            ..RenderOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert_eq!(err.info().context.get("indent").map(String::as_str), Some("--"));
    }
}
