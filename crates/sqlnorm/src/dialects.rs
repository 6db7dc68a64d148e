//! DBMS dialect selection
//!
//! The lexer branches on a single dialect tag at the few points where
//! lexical rules differ (dollar sign, colon, backtick, at sign, hash,
//! bracket). There is no per-dialect subtype: the tag is enough.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The DBMS dialect a lexer is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ANSI-ish behavior, no vendor extensions
    #[default]
    Generic,
    /// PostgreSQL
    #[serde(alias = "postgres")]
    PostgreSql,
    /// MySQL / MariaDB: backtick identifiers, `#` comments
    MySql,
    /// SQL Server: bracket identifiers, `#temp` and `$name` identifiers
    #[serde(alias = "mssql", alias = "sql-server")]
    SqlServer,
    /// Oracle: `:name` bind parameters
    Oracle,
    /// Snowflake: `@stage` references lex as identifiers
    Snowflake,
}

impl Dialect {
    /// Canonical lowercase name of the dialect.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::PostgreSql => "postgresql",
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle => "oracle",
            Dialect::Snowflake => "snowflake",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    /// Resolve a dialect name, accepting the fixed alias table
    /// (`postgres`, `mssql`, `sql-server`) case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "postgresql" | "postgres" => Ok(Dialect::PostgreSql),
            "mysql" => Ok(Dialect::MySql),
            "sqlserver" | "mssql" | "sql-server" => Ok(Dialect::SqlServer),
            "oracle" => Ok(Dialect::Oracle),
            "snowflake" => Ok(Dialect::Snowflake),
            _ => Err(Error::UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolution() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
        assert_eq!("POSTGRESQL".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
        assert_eq!("mssql".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert_eq!("sql-server".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySql);
    }

    #[test]
    fn test_unknown_dialect() {
        let err = "sybase".parse::<Dialect>().unwrap_err();
        assert_eq!(err, Error::UnknownDialect("sybase".to_string()));
    }

    #[test]
    fn test_display_roundtrip() {
        for dialect in [
            Dialect::Generic,
            Dialect::PostgreSql,
            Dialect::MySql,
            Dialect::SqlServer,
            Dialect::Oracle,
            Dialect::Snowflake,
        ] {
            assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
        }
    }
}
