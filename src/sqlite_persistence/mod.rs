mod schema_def;

pub use schema_def::{CatalogSchema, Column, ForeignKey, SqlType, Table};
