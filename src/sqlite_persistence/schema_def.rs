use anyhow::{bail, Result};
use rusqlite::{params, Connection};

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Allow unused_mut because the variable is only mutated when optional
            // field assignments are passed to the macro (e.g., `non_null = true`)
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

/// Declared column types. `VarChar`/`Char` carry the maximum length exactly as
/// written in the DDL; SQLite keeps the declared type text verbatim, which is
/// what validation compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    /// Single-precision floating point.
    Float,
    VarChar(u16),
    Char(u16),
    Date,
}

impl SqlType {
    pub fn sql_name(&self) -> String {
        match self {
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::Float => "FLOAT".to_string(),
            SqlType::VarChar(len) => format!("VARCHAR({})", len),
            SqlType::Char(len) => format!("CHAR({})", len),
            SqlType::Date => "DATE".to_string(),
        }
    }

    /// Parse a declared type as reported by `PRAGMA table_info`.
    pub fn parse(s: &str) -> Option<SqlType> {
        let s = s.trim().to_ascii_uppercase();
        match s.as_str() {
            "INTEGER" => return Some(SqlType::Integer),
            "FLOAT" => return Some(SqlType::Float),
            "DATE" => return Some(SqlType::Date),
            _ => {}
        }
        let parse_len = |inner: &str| inner.strip_suffix(')')?.parse::<u16>().ok();
        if let Some(inner) = s.strip_prefix("VARCHAR(") {
            return parse_len(inner).map(SqlType::VarChar);
        }
        if let Some(inner) = s.strip_prefix("CHAR(") {
            return parse_len(inner).map(SqlType::Char);
        }
        None
    }
}

/// A foreign-key reference. No ON DELETE / ON UPDATE clause is ever emitted;
/// the engine default (NO ACTION: reject deleting a referenced parent row)
/// applies.
pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
}

pub struct Column<'a, S: AsRef<str>> {
    pub name: S,
    pub sql_type: SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub foreign_key: Option<&'a ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column<'static, &'static str>],
}

impl Table {
    /// Create this table. Fails before any DDL is issued if a foreign key
    /// references a table that does not exist yet: SQLite defers that check
    /// until the first insert, but declaration order is load-bearing here, so
    /// it is enforced up front.
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for column in self.columns {
            if let Some(foreign_key) = column.foreign_key {
                if foreign_key.foreign_table != self.name
                    && !table_exists(conn, foreign_key.foreign_table)?
                {
                    bail!(
                        "Cannot create table {}: column {} references table {} which has not been created",
                        self.name,
                        column.name,
                        foreign_key.foreign_table
                    );
                }
            }
        }

        let mut create_sql = format!("CREATE TABLE {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!("{} {}", column.name, column.sql_type.sql_name()));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
            if let Some(foreign_key) = column.foreign_key {
                create_sql.push_str(&format!(
                    " REFERENCES {}({})",
                    foreign_key.foreign_table, foreign_key.foreign_column
                ));
            }
        }
        create_sql.push_str(");");
        conn.execute(&create_sql, params![])?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1",
            params![name],
            |_| Ok(true),
        )
        .unwrap_or(false);
    Ok(exists)
}

/// The full set of relations making up a catalog database. Tables are listed
/// parent before child so that every foreign key resolves at creation time.
pub struct CatalogSchema {
    pub tables: &'static [Table],
}

impl CatalogSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;
        for table in self.tables {
            table.create(conn)?;
        }
        Ok(())
    }

    /// Compare the live database against the declarations and reject drift in
    /// table presence, column names, declared types, nullability, primary
    /// keys, or foreign keys.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            if !table_exists(conn, table.name)? {
                bail!("Missing table {}", table.name);
            }

            let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", table.name))?;
            let actual_columns: Vec<Column<'_, String>> = stmt
                .query_map(params![], |row| {
                    let name = row.get::<usize, String>(1)?;
                    let declared_type = row.get::<_, String>(2)?;
                    let sql_type = SqlType::parse(&declared_type).ok_or_else(|| {
                        rusqlite::Error::InvalidColumnType(
                            2,
                            declared_type,
                            rusqlite::types::Type::Text,
                        )
                    })?;

                    Ok(Column {
                        name,
                        sql_type,
                        non_null: row.get::<_, i32>(3)? == 1,
                        is_primary_key: row.get::<_, i32>(5)? == 1,
                        foreign_key: None,
                    })
                })?
                .collect::<Result<Vec<_>, rusqlite::Error>>()?;

            if actual_columns.len() != table.columns.len() {
                bail!(
                    "Table {} has {} columns, expected {}. Found column names: {}, expected: {}",
                    table.name,
                    actual_columns.len(),
                    table.columns.len(),
                    actual_columns
                        .iter()
                        .map(|c| c.name.clone())
                        .collect::<Vec<String>>()
                        .join(", "),
                    table
                        .columns
                        .iter()
                        .map(|c| c.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }

            for (actual_column, expected_column) in
                actual_columns.iter().zip(table.columns.iter())
            {
                if actual_column.name != expected_column.name {
                    bail!(
                        "Table {} Column name mismatch: expected {}, got {}",
                        &table.name,
                        expected_column.name,
                        actual_column.name
                    );
                }
                if actual_column.sql_type != expected_column.sql_type {
                    bail!(
                        "Table {} Column {} type mismatch: expected {}, got {}",
                        &table.name,
                        expected_column.name,
                        expected_column.sql_type.sql_name(),
                        actual_column.sql_type.sql_name()
                    );
                }
                if actual_column.non_null != expected_column.non_null {
                    bail!(
                        "Table {} Column {} non-null mismatch: expected {}, got {}",
                        &table.name,
                        expected_column.name,
                        expected_column.non_null,
                        actual_column.non_null
                    );
                }
                if actual_column.is_primary_key != expected_column.is_primary_key {
                    bail!(
                        "Table {} Column {} primary key mismatch: expected {}, got {}",
                        &table.name,
                        expected_column.name,
                        expected_column.is_primary_key,
                        actual_column.is_primary_key
                    );
                }
            }

            // PRAGMA foreign_key_list returns: id, seq, table, from, to, on_update, on_delete, match
            let mut fk_stmt =
                conn.prepare(&format!("PRAGMA foreign_key_list({})", table.name))?;

            struct ActualFk {
                from_column: String,
                to_table: String,
                to_column: String,
                on_delete: String,
            }

            let actual_fks: Vec<ActualFk> = fk_stmt
                .query_map([], |row| {
                    Ok(ActualFk {
                        from_column: row.get(3)?,
                        to_table: row.get(2)?,
                        to_column: row.get(4)?,
                        on_delete: row.get(6)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            for column in table.columns {
                if let Some(expected_fk) = column.foreign_key {
                    let found = actual_fks.iter().any(|actual| {
                        actual.from_column == column.name
                            && actual.to_table == expected_fk.foreign_table
                            && actual.to_column == expected_fk.foreign_column
                            && actual.on_delete == "NO ACTION"
                    });

                    if !found {
                        let partial_match = actual_fks
                            .iter()
                            .find(|actual| actual.from_column == column.name);

                        if let Some(actual) = partial_match {
                            bail!(
                                "Table {} column {} has foreign key mismatch: expected REFERENCES {}({}) with no delete rule, got REFERENCES {}({}) ON DELETE {}",
                                table.name,
                                column.name,
                                expected_fk.foreign_table,
                                expected_fk.foreign_column,
                                actual.to_table,
                                actual.to_column,
                                actual.on_delete
                            );
                        } else {
                            bail!(
                                "Table {} column {} is missing foreign key: expected REFERENCES {}({})",
                                table.name,
                                column.name,
                                expected_fk.foreign_table,
                                expected_fk.foreign_column
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
