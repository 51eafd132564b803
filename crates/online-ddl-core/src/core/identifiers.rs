// crates/online-ddl-core/src/core/identifiers.rs
// ============================================================================
// Module: Online DDL Identifiers
// Description: Validated table and column identifiers.
// Purpose: Keep user-supplied names safe to splice into SQL text.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Table names arrive from the command line and configuration, so they are
//! validated once at construction and always rendered back-quoted. Both the
//! MySQL protocol and `SQLite` accept back-quoted identifiers, which keeps a
//! single rendering path for every dialect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum identifier length accepted by the MySQL protocol.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;
/// Table used when no name is supplied.
pub const DEFAULT_TABLE_NAME: &str = "online_ddl_test";
/// Column added by the default alter operation.
pub const DEFAULT_COLUMN_NAME: &str = "ed";
/// Column definition used by the default alter operation.
pub const DEFAULT_COLUMN_DEFINITION: &str = "VARCHAR(10) DEFAULT 'N/A'";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier validation failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier was empty or whitespace only.
    #[error("{kind} name must be non-empty")]
    Empty {
        /// Identifier kind label (`table`, `column`).
        kind: &'static str,
    },
    /// Identifier exceeded the protocol length limit.
    #[error("{kind} name exceeds {max} characters")]
    TooLong {
        /// Identifier kind label.
        kind: &'static str,
        /// Maximum permitted length.
        max: usize,
    },
    /// Identifier contained a NUL byte.
    #[error("{kind} name must not contain NUL")]
    Nul {
        /// Identifier kind label.
        kind: &'static str,
    },
    /// Column definition was empty.
    #[error("column definition must be non-empty")]
    EmptyDefinition,
    /// Column definition contained a statement separator.
    #[error("column definition must not contain ';'")]
    DefinitionSeparator,
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Name of the table targeted by the writer and the alter controller.
///
/// # Invariants
/// - 1..=64 characters, no NUL, surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Creates a validated table name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the name is empty, too long, or
    /// contains NUL.
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        validate_identifier("table", name.into()).map(Self)
    }

    /// Returns the raw (unquoted) table name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the back-quoted form for SQL text.
    #[must_use]
    pub fn quoted(&self) -> String {
        quote_identifier(&self.0)
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE_NAME.to_string())
    }
}

impl TryFrom<String> for TableName {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Column added by an alter operation: a validated name plus its SQL
/// definition (type, default, nullability).
///
/// # Invariants
/// - `name` obeys the same rules as [`TableName`].
/// - `definition` is non-empty and contains no `;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name (unquoted).
    name: String,
    /// Column definition following the name.
    definition: String,
}

impl ColumnSpec {
    /// Creates a validated column spec.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the name or definition is invalid.
    pub fn new(
        name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<Self, IdentifierError> {
        let name = validate_identifier("column", name.into())?;
        let definition = definition.into().trim().to_string();
        if definition.is_empty() {
            return Err(IdentifierError::EmptyDefinition);
        }
        if definition.contains(';') {
            return Err(IdentifierError::DefinitionSeparator);
        }
        Ok(Self {
            name,
            definition,
        })
    }

    /// Returns the column name (unquoted).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column definition.
    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_COLUMN_NAME.to_string(),
            definition: DEFAULT_COLUMN_DEFINITION.to_string(),
        }
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", quote_identifier(&self.name), self.definition)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Quotes an identifier with back-quotes, doubling embedded back-quotes.
#[must_use]
pub fn quote_identifier(identifier: &str) -> String {
    let mut escaped = identifier.replace('`', "``");
    escaped.insert(0, '`');
    escaped.push('`');
    escaped
}

/// Trims and validates an identifier.
fn validate_identifier(kind: &'static str, raw: String) -> Result<String, IdentifierError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentifierError::Empty {
            kind,
        });
    }
    if trimmed.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(IdentifierError::TooLong {
            kind,
            max: MAX_IDENTIFIER_LENGTH,
        });
    }
    if trimmed.contains('\0') {
        return Err(IdentifierError::Nul {
            kind,
        });
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
