use model::core::value::Value;

use crate::{column_type::ColumnType, config::TextConfig};

/// Free text with optional decoration around the shown value.
#[derive(Debug, Clone, Default)]
pub struct Text {
    config: TextConfig,
}

impl Text {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }
}

impl ColumnType for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn display_value(&self, value: &Value) -> String {
        match value.as_string() {
            Some(text) if !text.is_empty() => {
                format!("{}{}{}", self.config.prefix, text, self.config.postfix)
            }
            _ => String::new(),
        }
    }
}
