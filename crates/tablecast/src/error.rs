//! Error types for stack synthesis and table mapping.

use thiserror::Error;

/// Result type alias for the tablecast crate.
pub type Result<T> = std::result::Result<T, TablecastError>;

/// Errors that can occur while declaring, synthesizing, or mapping a table.
#[derive(Error, Debug)]
pub enum TablecastError {
    /// The resolver's single error: the logical identifier is missing from
    /// the synthesized template, or it names a resource of another type.
    #[error("resource '{logical_id}' not found in template or not a DynamoDB table")]
    ResourceNotResolvable { logical_id: String },

    #[error("construct id '{0}' is already in use within the stack")]
    DuplicateConstructId(String),

    #[error("index '{0}' is already declared on this table")]
    DuplicateIndexName(String),

    #[error("no table with construct id '{0}' in this stack")]
    UnknownConstruct(String),

    /// The same attribute name was declared with two different types across
    /// the base key schema and the secondary indexes.
    #[error("attribute '{name}' is declared as both '{existing}' and '{requested}'")]
    ConflictingAttributeType {
        name: String,
        existing: String,
        requested: String,
    },

    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("Timeout waiting for table to become active")]
    TableActivationTimeout,
}
