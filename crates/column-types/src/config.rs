//! Serializable type configuration and schema definitions.

use std::{
    collections::HashSet,
    sync::{Arc, Weak},
};

use serde::{Deserialize, Serialize};

use crate::{
    column_type::ColumnType,
    error::TypeError,
    schema::{ColumnRegistry, Schema, clean_table_name},
    types::{decimal::Decimal, join::Join, lookup::Lookup, text::Text},
};

/// Target of a lookup or join column. Both parts are optional; a column
/// missing either one behaves like a plain column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

impl LookupConfig {
    pub fn new(schema: &str, field: &str) -> Self {
        Self {
            schema: Some(schema.to_string()),
            field: Some(field.to_string()),
        }
    }

    /// The `(schema, field)` pair when both are set and non-empty.
    pub fn target(&self) -> Option<(&str, &str)> {
        let schema = self.schema.as_deref().filter(|s| !s.is_empty())?;
        let field = self.field.as_deref().filter(|f| !f.is_empty())?;
        Some((schema, field))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub prefix: String,
    pub postfix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalConfig {
    /// Decimal places shown; `None` shows the value as stored.
    pub round_to: Option<u32>,
    pub prefix: String,
    pub postfix: String,
}

/// A column type and its configuration, tagged by type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeSpec {
    Text(TextConfig),
    Decimal(DecimalConfig),
    Lookup(LookupConfig),
    Join(LookupConfig),
}

impl TypeSpec {
    /// Instantiates the type. Lookup and join types resolve their target
    /// through `registry` on every call.
    pub fn build(self, registry: &Weak<dyn ColumnRegistry>) -> Arc<dyn ColumnType> {
        match self {
            TypeSpec::Text(config) => Arc::new(Text::new(config)),
            TypeSpec::Decimal(config) => Arc::new(Decimal::new(config)),
            TypeSpec::Lookup(config) => Arc::new(Lookup::new(config, registry.clone())),
            TypeSpec::Join(config) => Arc::new(Join::new(config, registry.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub label: String,
    /// Storage column; defaults to `col<N>`.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(flatten)]
    pub spec: TypeSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl SchemaDef {
    pub fn build(self, registry: &Weak<dyn ColumnRegistry>) -> Result<Schema, TypeError> {
        if clean_table_name(&self.name).is_empty() {
            return Err(TypeError::InvalidConfig(format!(
                "`{}` is not a usable schema name",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        let mut schema = Schema::new(&self.name);

        for def in self.columns {
            if !seen.insert(def.label.to_lowercase()) {
                return Err(TypeError::InvalidConfig(format!(
                    "duplicate column `{}` in schema `{}`",
                    def.label, self.name
                )));
            }

            let ty = def.spec.build(registry);
            schema = match def.column {
                Some(col_name) => schema.with_named_column(&def.label, &col_name, ty),
                None => schema.with_column(&def.label, ty),
            };
        }

        Ok(schema)
    }
}
