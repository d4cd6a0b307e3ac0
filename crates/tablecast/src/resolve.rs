//! Template resolver.
//!
//! Synthesizes a stack and locates one table's resource record by its
//! logical identifier. This is the only place the crate validates anything
//! about a record: a missing identifier or a record of another declared type
//! fails the whole resolution instead of mapping garbage into an API call.

use crate::cfn::{Template, TableProperties, TABLE_RESOURCE_TYPE};
use crate::error::{Result, TablecastError};
use crate::stack::{Stack, TableHandle};

/// Synthesizes `stack` and returns the resolved property bag for `table`.
///
/// Every call re-synthesizes; nothing is cached.
pub fn resolve(stack: &Stack, table: &TableHandle) -> Result<TableProperties> {
    let template = stack.synth()?;
    let logical_id = stack.logical_id(table);
    tracing::debug!(stack = %stack.name(), %logical_id, "resolving table resource");
    find_table_properties(&template, &logical_id).cloned()
}

/// Looks up a table resource record in an already-synthesized template.
pub fn find_table_properties<'a>(
    template: &'a Template,
    logical_id: &str,
) -> Result<&'a TableProperties> {
    match template.resources.get(logical_id) {
        Some(resource) if resource.resource_type == TABLE_RESOURCE_TYPE => {
            Ok(&resource.properties)
        }
        _ => Err(TablecastError::ResourceNotResolvable {
            logical_id: logical_id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfn::Resource;
    use crate::table::{KeyAttribute, TableProps};

    fn stack_with_table() -> (Stack, TableHandle) {
        let mut stack = Stack::new("teststack");
        let handle = stack
            .add_table(
                "Orders",
                TableProps::new(KeyAttribute::string("PK"))
                    .with_sort_key(KeyAttribute::string("SK"))
                    .with_table_name("orders"),
            )
            .unwrap();
        (stack, handle)
    }

    #[test]
    fn test_resolve_returns_declared_properties() {
        let (stack, handle) = stack_with_table();
        let properties = resolve(&stack, &handle).unwrap();
        assert_eq!(properties.table_name.as_deref(), Some("orders"));
        assert_eq!(properties.key_schema.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_resolve_fails_for_unknown_logical_id() {
        let (stack, _) = stack_with_table();
        let mut other = Stack::new("elsewhere");
        let foreign = other
            .add_table("Other", TableProps::new(KeyAttribute::string("PK")))
            .unwrap();

        let err = resolve(&stack, &foreign).unwrap_err();
        assert!(matches!(err, TablecastError::ResourceNotResolvable { .. }));
    }

    #[test]
    fn test_lookup_rejects_wrong_resource_type() {
        let mut template = Template::default();
        template.resources.insert(
            "Bucket12345678".to_string(),
            Resource {
                resource_type: "AWS::S3::Bucket".to_string(),
                properties: Default::default(),
            },
        );

        let err = find_table_properties(&template, "Bucket12345678").unwrap_err();
        assert!(matches!(
            err,
            TablecastError::ResourceNotResolvable { logical_id } if logical_id == "Bucket12345678"
        ));
    }

    #[test]
    fn test_lookup_finds_table_resource() {
        let (stack, handle) = stack_with_table();
        let template = stack.synth().unwrap();
        let logical_id = stack.logical_id(&handle);
        let properties = find_table_properties(&template, &logical_id).unwrap();
        assert_eq!(properties.table_name.as_deref(), Some("orders"));
    }
}
