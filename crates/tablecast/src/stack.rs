//! Stack declaration and template synthesis.
//!
//! A [`Stack`] collects declarative table descriptions and renders them into
//! a resolved [`Template`](crate::cfn::Template) keyed by framework-generated
//! logical identifiers. Synthesis is a pure render: it never mutates the
//! stack and is idempotent to re-invoke.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::cfn::{
    AttributeDefinitionProperty, GlobalIndexProperty, KeySchemaProperty, LocalIndexProperty,
    ProjectionProperty, Resource, StreamSpecificationProperty, Template, TableProperties,
    ThroughputProperty, TABLE_RESOURCE_TYPE,
};
use crate::error::{Result, TablecastError};
use crate::table::{Billing, GsiProps, KeyAttribute, LsiProps, Projection, TableProps};

/// Literal account and region a stack is declared for.
///
/// Kept literal so no deferred value survives into the synthesized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEnv {
    pub account: String,
    pub region: String,
}

impl Default for StackEnv {
    fn default() -> Self {
        Self {
            account: "000000000000".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

/// A reference to one table declared within a stack.
///
/// Holds only the construct id; the logical identifier is derived from it
/// together with the stack name. Resolving a handle against a stack that
/// never declared it simply produces an identifier absent from that stack's
/// template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    construct_id: String,
}

impl TableHandle {
    /// The construct id this handle was declared under.
    pub fn construct_id(&self) -> &str {
        &self.construct_id
    }
}

#[derive(Debug, Clone)]
struct TableEntry {
    construct_id: String,
    props: TableProps,
    gsis: Vec<GsiProps>,
    lsis: Vec<LsiProps>,
}

/// An in-memory declarative description of table resources.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: StackEnv,
    tables: Vec<TableEntry>,
}

impl Stack {
    /// Creates an empty stack with the default environment.
    pub fn new(name: &str) -> Self {
        Self::with_env(name, StackEnv::default())
    }

    /// Creates an empty stack with an explicit environment.
    pub fn with_env(name: &str, env: StackEnv) -> Self {
        Self {
            name: name.to_string(),
            env,
            tables: Vec::new(),
        }
    }

    /// Stack name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Environment the stack is declared for.
    pub fn env(&self) -> &StackEnv {
        &self.env
    }

    /// Declares a table under the given construct id.
    pub fn add_table(&mut self, construct_id: &str, props: TableProps) -> Result<TableHandle> {
        if self.tables.iter().any(|t| t.construct_id == construct_id) {
            return Err(TablecastError::DuplicateConstructId(
                construct_id.to_string(),
            ));
        }
        self.tables.push(TableEntry {
            construct_id: construct_id.to_string(),
            props,
            gsis: Vec::new(),
            lsis: Vec::new(),
        });
        Ok(TableHandle {
            construct_id: construct_id.to_string(),
        })
    }

    /// Adds a global secondary index to a declared table.
    pub fn add_global_secondary_index(
        &mut self,
        table: &TableHandle,
        gsi: GsiProps,
    ) -> Result<()> {
        let entry = self.entry_mut(table)?;
        if entry.index_names().any(|name| name == gsi.index_name) {
            return Err(TablecastError::DuplicateIndexName(gsi.index_name));
        }
        entry.gsis.push(gsi);
        Ok(())
    }

    /// Adds a local secondary index to a declared table.
    pub fn add_local_secondary_index(&mut self, table: &TableHandle, lsi: LsiProps) -> Result<()> {
        let entry = self.entry_mut(table)?;
        if entry.index_names().any(|name| name == lsi.index_name) {
            return Err(TablecastError::DuplicateIndexName(lsi.index_name));
        }
        entry.lsis.push(lsi);
        Ok(())
    }

    /// The framework-generated logical identifier for a handle.
    ///
    /// Sanitized construct id plus an eight-hex-digit digest of the
    /// `<stack>/<construct id>` path. Pure derivation; the handle does not
    /// have to belong to this stack.
    pub fn logical_id(&self, table: &TableHandle) -> String {
        let sanitized: String = table
            .construct_id
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();

        let mut hasher = DefaultHasher::new();
        format!("{}/{}", self.name, table.construct_id).hash(&mut hasher);
        let digest = format!("{:016X}", hasher.finish());

        format!("{}{}", sanitized, &digest[..8])
    }

    /// Synthesizes the stack into a resolved, literal template.
    ///
    /// Validates attribute declarations across the base key schema and every
    /// secondary index; a name declared with two different types fails the
    /// synthesis.
    pub fn synth(&self) -> Result<Template> {
        tracing::debug!(stack = %self.name, tables = self.tables.len(), "synthesizing stack");

        let mut template = Template::default();
        for entry in &self.tables {
            let logical_id = self.logical_id(&TableHandle {
                construct_id: entry.construct_id.clone(),
            });
            let resource = Resource {
                resource_type: TABLE_RESOURCE_TYPE.to_string(),
                properties: render_table(entry)?,
            };
            template.resources.insert(logical_id, resource);
        }
        Ok(template)
    }

    fn entry_mut(&mut self, table: &TableHandle) -> Result<&mut TableEntry> {
        self.tables
            .iter_mut()
            .find(|t| t.construct_id == table.construct_id)
            .ok_or_else(|| TablecastError::UnknownConstruct(table.construct_id.clone()))
    }
}

impl TableEntry {
    fn index_names(&self) -> impl Iterator<Item = &str> {
        self.gsis
            .iter()
            .map(|g| g.index_name.as_str())
            .chain(self.lsis.iter().map(|l| l.index_name.as_str()))
    }
}

fn render_table(entry: &TableEntry) -> Result<TableProperties> {
    let props = &entry.props;

    // Collect attribute definitions across the base keys and every index,
    // de-duplicated by name.
    let mut attribute_definitions = Vec::new();
    push_attribute(&mut attribute_definitions, &props.partition_key)?;
    if let Some(sk) = &props.sort_key {
        push_attribute(&mut attribute_definitions, sk)?;
    }
    for gsi in &entry.gsis {
        push_attribute(&mut attribute_definitions, &gsi.partition_key)?;
        if let Some(sk) = &gsi.sort_key {
            push_attribute(&mut attribute_definitions, sk)?;
        }
    }
    for lsi in &entry.lsis {
        push_attribute(&mut attribute_definitions, &lsi.sort_key)?;
    }

    let (billing_mode, provisioned_throughput) = match props.billing {
        Billing::PayPerRequest => (Some("PAY_PER_REQUEST".to_string()), None),
        Billing::Provisioned {
            read_capacity,
            write_capacity,
        } => (
            None,
            Some(ThroughputProperty {
                read_capacity_units: read_capacity,
                write_capacity_units: write_capacity,
            }),
        ),
    };

    let global_secondary_indexes = if entry.gsis.is_empty() {
        None
    } else {
        Some(
            entry
                .gsis
                .iter()
                .map(|gsi| GlobalIndexProperty {
                    index_name: gsi.index_name.clone(),
                    key_schema: render_key_schema(&gsi.partition_key, gsi.sort_key.as_ref()),
                    projection: render_projection(&gsi.projection),
                    provisioned_throughput: provisioned_throughput.clone(),
                })
                .collect(),
        )
    };

    let local_secondary_indexes = if entry.lsis.is_empty() {
        None
    } else {
        Some(
            entry
                .lsis
                .iter()
                .map(|lsi| LocalIndexProperty {
                    index_name: lsi.index_name.clone(),
                    key_schema: render_key_schema(&props.partition_key, Some(&lsi.sort_key)),
                    projection: render_projection(&lsi.projection),
                })
                .collect(),
        )
    };

    Ok(TableProperties {
        table_name: props.table_name.clone(),
        attribute_definitions: Some(attribute_definitions),
        key_schema: Some(render_key_schema(
            &props.partition_key,
            props.sort_key.as_ref(),
        )),
        billing_mode,
        provisioned_throughput,
        local_secondary_indexes,
        global_secondary_indexes,
        stream_specification: props.stream.map(|view_type| StreamSpecificationProperty {
            stream_enabled: None,
            stream_view_type: view_type.as_str().to_string(),
        }),
    })
}

fn push_attribute(
    definitions: &mut Vec<AttributeDefinitionProperty>,
    key: &KeyAttribute,
) -> Result<()> {
    let code = key.attribute_type.code();
    if let Some(existing) = definitions.iter().find(|d| d.attribute_name == key.name) {
        if existing.attribute_type != code {
            return Err(TablecastError::ConflictingAttributeType {
                name: key.name.clone(),
                existing: existing.attribute_type.clone(),
                requested: code.to_string(),
            });
        }
        return Ok(());
    }
    definitions.push(AttributeDefinitionProperty {
        attribute_name: key.name.clone(),
        attribute_type: code.to_string(),
    });
    Ok(())
}

fn render_key_schema(
    partition_key: &KeyAttribute,
    sort_key: Option<&KeyAttribute>,
) -> Vec<KeySchemaProperty> {
    let mut schema = vec![KeySchemaProperty {
        attribute_name: partition_key.name.clone(),
        key_type: "HASH".to_string(),
    }];
    if let Some(sk) = sort_key {
        schema.push(KeySchemaProperty {
            attribute_name: sk.name.clone(),
            key_type: "RANGE".to_string(),
        });
    }
    schema
}

fn render_projection(projection: &Projection) -> ProjectionProperty {
    match projection {
        Projection::All => ProjectionProperty {
            projection_type: Some("ALL".to_string()),
            non_key_attributes: None,
        },
        Projection::KeysOnly => ProjectionProperty {
            projection_type: Some("KEYS_ONLY".to_string()),
            non_key_attributes: None,
        },
        Projection::Include(attributes) => ProjectionProperty {
            projection_type: Some("INCLUDE".to_string()),
            non_key_attributes: Some(attributes.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{AttributeType, StreamViewType};

    fn base_props() -> TableProps {
        TableProps::new(KeyAttribute::string("PK")).with_sort_key(KeyAttribute::string("SK"))
    }

    #[test]
    fn test_logical_id_is_sanitized_and_stable() {
        let mut stack = Stack::new("teststack");
        let handle = stack
            .add_table("My-Table.1", base_props())
            .unwrap();

        let id = stack.logical_id(&handle);
        assert!(id.starts_with("MyTable1"));
        assert_eq!(id.len(), "MyTable1".len() + 8);
        assert_eq!(id, stack.logical_id(&handle));
    }

    #[test]
    fn test_logical_id_depends_on_stack_name() {
        let mut a = Stack::new("stack-a");
        let handle = a.add_table("Orders", base_props()).unwrap();
        let b = Stack::new("stack-b");
        assert_ne!(a.logical_id(&handle), b.logical_id(&handle));
    }

    #[test]
    fn test_duplicate_construct_id_is_rejected() {
        let mut stack = Stack::new("teststack");
        stack.add_table("Orders", base_props()).unwrap();
        let err = stack.add_table("Orders", base_props()).unwrap_err();
        assert!(matches!(err, TablecastError::DuplicateConstructId(_)));
    }

    #[test]
    fn test_duplicate_index_name_is_rejected() {
        let mut stack = Stack::new("teststack");
        let handle = stack.add_table("Orders", base_props()).unwrap();
        stack
            .add_global_secondary_index(
                &handle,
                GsiProps::new("GSI1", KeyAttribute::string("GSI1PK"), None),
            )
            .unwrap();
        let err = stack
            .add_local_secondary_index(&handle, LsiProps::new("GSI1", KeyAttribute::string("LSK")))
            .unwrap_err();
        assert!(matches!(err, TablecastError::DuplicateIndexName(_)));
    }

    #[test]
    fn test_index_on_unknown_handle_is_rejected() {
        let mut other = Stack::new("other");
        let foreign = other.add_table("Elsewhere", base_props()).unwrap();

        let mut stack = Stack::new("teststack");
        let err = stack
            .add_global_secondary_index(
                &foreign,
                GsiProps::new("GSI1", KeyAttribute::string("GSI1PK"), None),
            )
            .unwrap_err();
        assert!(matches!(err, TablecastError::UnknownConstruct(_)));
    }

    #[test]
    fn test_synth_renders_pay_per_request() {
        let mut stack = Stack::new("teststack");
        let handle = stack
            .add_table(
                "Orders",
                base_props()
                    .with_table_name("orders")
                    .with_billing(Billing::PayPerRequest),
            )
            .unwrap();

        let template = stack.synth().unwrap();
        let resource = &template.resources[&stack.logical_id(&handle)];
        assert_eq!(resource.resource_type, TABLE_RESOURCE_TYPE);

        let properties = &resource.properties;
        assert_eq!(properties.table_name.as_deref(), Some("orders"));
        assert_eq!(properties.billing_mode.as_deref(), Some("PAY_PER_REQUEST"));
        assert!(properties.provisioned_throughput.is_none());

        let key_schema = properties.key_schema.as_ref().unwrap();
        assert_eq!(key_schema.len(), 2);
        assert_eq!(key_schema[0].attribute_name, "PK");
        assert_eq!(key_schema[0].key_type, "HASH");
        assert_eq!(key_schema[1].attribute_name, "SK");
        assert_eq!(key_schema[1].key_type, "RANGE");
    }

    #[test]
    fn test_synth_renders_provisioned_default_without_billing_mode() {
        let mut stack = Stack::new("teststack");
        let handle = stack.add_table("Orders", base_props()).unwrap();
        stack
            .add_global_secondary_index(
                &handle,
                GsiProps::new("GSI1", KeyAttribute::string("GSI1PK"), None),
            )
            .unwrap();

        let template = stack.synth().unwrap();
        let properties = &template.resources[&stack.logical_id(&handle)].properties;

        assert!(properties.billing_mode.is_none());
        let throughput = properties.provisioned_throughput.as_ref().unwrap();
        assert_eq!(throughput.read_capacity_units, 5);
        assert_eq!(throughput.write_capacity_units, 5);

        // Provisioned tables carry the throughput onto every GSI.
        let gsis = properties.global_secondary_indexes.as_ref().unwrap();
        assert_eq!(
            gsis[0].provisioned_throughput.as_ref().unwrap(),
            throughput
        );
    }

    #[test]
    fn test_synth_omits_optional_fields() {
        let mut stack = Stack::new("teststack");
        let handle = stack
            .add_table("Orders", TableProps::new(KeyAttribute::string("PK")))
            .unwrap();

        let template = stack.synth().unwrap();
        let properties = &template.resources[&stack.logical_id(&handle)].properties;

        assert!(properties.table_name.is_none());
        assert!(properties.local_secondary_indexes.is_none());
        assert!(properties.global_secondary_indexes.is_none());
        assert!(properties.stream_specification.is_none());
    }

    #[test]
    fn test_synth_renders_stream_view_type_only() {
        let mut stack = Stack::new("teststack");
        let handle = stack
            .add_table(
                "Orders",
                base_props().with_stream(StreamViewType::NewAndOldImages),
            )
            .unwrap();

        let template = stack.synth().unwrap();
        let stream = template.resources[&stack.logical_id(&handle)]
            .properties
            .stream_specification
            .as_ref()
            .cloned()
            .unwrap();
        assert_eq!(stream.stream_enabled, None);
        assert_eq!(stream.stream_view_type, "NEW_AND_OLD_IMAGES");
    }

    #[test]
    fn test_synth_dedupes_attributes_across_indexes() {
        let mut stack = Stack::new("teststack");
        let handle = stack.add_table("Orders", base_props()).unwrap();
        // GSI reusing the base partition key as its own sort key.
        stack
            .add_global_secondary_index(
                &handle,
                GsiProps::new(
                    "GSI1",
                    KeyAttribute::string("GSI1PK"),
                    Some(KeyAttribute::string("PK")),
                ),
            )
            .unwrap();

        let template = stack.synth().unwrap();
        let definitions = template.resources[&stack.logical_id(&handle)]
            .properties
            .attribute_definitions
            .as_ref()
            .cloned()
            .unwrap();

        let names: Vec<&str> = definitions.iter().map(|d| d.attribute_name.as_str()).collect();
        assert_eq!(names, vec!["PK", "SK", "GSI1PK"]);
    }

    #[test]
    fn test_synth_rejects_conflicting_attribute_types() {
        let mut stack = Stack::new("teststack");
        let handle = stack.add_table("Orders", base_props()).unwrap();
        stack
            .add_global_secondary_index(
                &handle,
                GsiProps::new(
                    "GSI1",
                    KeyAttribute::new("PK", AttributeType::Number),
                    None,
                ),
            )
            .unwrap();

        let err = stack.synth().unwrap_err();
        assert!(matches!(
            err,
            TablecastError::ConflictingAttributeType { .. }
        ));
    }

    #[test]
    fn test_synth_is_idempotent() {
        let mut stack = Stack::new("teststack");
        stack
            .add_table("Orders", base_props().with_table_name("orders"))
            .unwrap();
        assert_eq!(stack.synth().unwrap(), stack.synth().unwrap());
    }
}
