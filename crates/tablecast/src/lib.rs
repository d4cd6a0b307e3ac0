//! tablecast: map declarative DynamoDB table stacks onto CreateTable calls.
//!
//! A [`Stack`] collects declarative table descriptions. [`resolve::resolve`]
//! synthesizes the stack into a literal template and locates one table's
//! resource record by its logical identifier; [`mapper::create_table_input`]
//! maps that record onto the input of the DynamoDB `CreateTable` API call.
//! The [`client`] module holds the scaffolding for exercising the result
//! against DynamoDB Local.
//!
//! ```no_run
//! use tablecast::{KeyAttribute, Stack, TableProps};
//!
//! # fn main() -> tablecast::Result<()> {
//! let mut stack = Stack::new("teststack");
//! let table = stack.add_table(
//!     "Orders",
//!     TableProps::new(KeyAttribute::string("PK"))
//!         .with_sort_key(KeyAttribute::string("SK"))
//!         .with_table_name("orders"),
//! )?;
//!
//! let input = tablecast::create_table_input_from_stack(&stack, &table)?;
//! assert_eq!(input.table_name.as_deref(), Some("orders"));
//! # Ok(())
//! # }
//! ```

pub mod cfn;
pub mod client;
pub mod error;
pub mod mapper;
pub mod resolve;
pub mod stack;
pub mod table;

pub use error::{Result, TablecastError};
pub use stack::{Stack, StackEnv, TableHandle};
pub use table::{
    AttributeType, Billing, GsiProps, KeyAttribute, LsiProps, Projection, StreamViewType,
    TableProps,
};

use aws_sdk_dynamodb::operation::create_table::CreateTableInput;

/// Resolves one declared table and maps it onto a `CreateTableInput`.
///
/// Convenience composition of [`resolve::resolve`] and
/// [`mapper::create_table_input`].
pub fn create_table_input_from_stack(
    stack: &Stack,
    table: &TableHandle,
) -> Result<CreateTableInput> {
    let properties = resolve::resolve(stack, table)?;
    mapper::create_table_input(&properties)
}
