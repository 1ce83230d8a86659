//! Schemas, their columns, and the registry column types resolve against.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock, Weak},
};

use tracing::debug;

use crate::{
    column_type::ColumnType,
    config::SchemaDef,
    error::TypeError,
};

/// Prefix of the table holding a schema's rows.
pub const DATA_TABLE_PREFIX: &str = "data_";

/// Normalizes a schema name: lowercase, leading non-letters and anything
/// outside `[a-z0-9_]` removed.
pub fn clean_table_name(name: &str) -> String {
    name.to_lowercase()
        .trim_start_matches(|c: char| !c.is_ascii_lowercase())
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Name of the table that stores the rows of `schema`.
pub fn data_table_name(schema: &str) -> String {
    format!("{DATA_TABLE_PREFIX}{}", clean_table_name(schema))
}

/// A field of a schema together with its type.
#[derive(Clone)]
pub struct Column {
    label: String,
    col_name: String,
    ty: Arc<dyn ColumnType>,
}

impl Column {
    pub fn new(label: impl Into<String>, col_name: impl Into<String>, ty: Arc<dyn ColumnType>) -> Self {
        Self {
            label: label.into(),
            col_name: col_name.into(),
            ty,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the database column holding this field.
    pub fn col_name(&self) -> &str {
        &self.col_name
    }

    pub fn column_type(&self) -> &dyn ColumnType {
        self.ty.as_ref()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("col_name", &self.col_name)
            .field("type", &self.ty.name())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(name: &str) -> Self {
        Self {
            name: clean_table_name(name),
            columns: Vec::new(),
        }
    }

    /// Adds a column stored in `col<N>`, N being its 1-based position.
    pub fn with_column(self, label: &str, ty: Arc<dyn ColumnType>) -> Self {
        let col_name = format!("col{}", self.columns.len() + 1);
        self.with_named_column(label, &col_name, ty)
    }

    pub fn with_named_column(mut self, label: &str, col_name: &str, ty: Arc<dyn ColumnType>) -> Self {
        self.columns.push(Column::new(label, col_name, ty));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> String {
        data_table_name(&self.name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(label))
    }
}

/// Resolves `(schema, field)` to a column definition.
pub trait ColumnRegistry: Send + Sync {
    fn lookup_column(&self, schema: &str, field: &str) -> Option<Column>;
}

/// In-memory registry. Schemas may be added or removed at any time; types
/// holding a handle see the change on their next call.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A non-owning handle for column types that resolve through this
    /// registry.
    pub fn handle(self: &Arc<Self>) -> Weak<dyn ColumnRegistry> {
        Arc::downgrade(self) as Weak<dyn ColumnRegistry>
    }

    /// Adds or replaces a schema, returning the previous definition.
    pub fn register(&self, schema: Schema) -> Option<Schema> {
        debug!("Registering schema `{}`", schema.name());
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema.name().to_string(), schema)
    }

    pub fn remove(&self, name: &str) -> Option<Schema> {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&clean_table_name(name))
    }

    pub fn schema(&self, name: &str) -> Option<Schema> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&clean_table_name(name))
            .cloned()
    }

    pub fn schema_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Registers the schemas described by a JSON array of schema definitions.
    /// Returns the registered schema names in input order.
    pub fn load_json(self: &Arc<Self>, json: &str) -> Result<Vec<String>, TypeError> {
        let defs: Vec<SchemaDef> = serde_json::from_str(json)?;
        let handle = self.handle();

        let schemas = defs
            .into_iter()
            .map(|def| def.build(&handle))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(schemas
            .into_iter()
            .map(|schema| {
                let name = schema.name().to_string();
                self.register(schema);
                name
            })
            .collect())
    }
}

impl ColumnRegistry for SchemaRegistry {
    fn lookup_column(&self, schema: &str, field: &str) -> Option<Column> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&clean_table_name(schema))
            .and_then(|s| s.column(field))
            .cloned()
    }
}
