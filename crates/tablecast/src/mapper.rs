//! Property mapper: resolved table record to `CreateTableInput`.
//!
//! A straight field-for-field mapping with no semantic validation; the
//! resolver has already checked resource identity and type. Absent attribute
//! definitions and key schema become empty sequences, absent secondary index
//! lists stay absent. The asymmetry is deliberate and pinned by tests.

use aws_sdk_dynamodb::operation::create_table::CreateTableInput;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType,
    LocalSecondaryIndex, Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType,
    StreamSpecification, StreamViewType,
};

use crate::cfn::{
    AttributeDefinitionProperty, GlobalIndexProperty, KeySchemaProperty, LocalIndexProperty,
    ProjectionProperty, StreamSpecificationProperty, TableProperties, ThroughputProperty,
};
use crate::error::{Result, TablecastError};

/// Maps a resolved table record onto the CreateTable API input.
pub fn create_table_input(properties: &TableProperties) -> Result<CreateTableInput> {
    let attribute_definitions = properties
        .attribute_definitions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(to_attribute_definition)
        .collect::<Result<Vec<_>>>()?;

    let key_schema = properties
        .key_schema
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(to_key_schema_element)
        .collect::<Result<Vec<_>>>()?;

    let provisioned_throughput = properties
        .provisioned_throughput
        .as_ref()
        .map(to_provisioned_throughput)
        .transpose()?;

    let local_secondary_indexes = properties
        .local_secondary_indexes
        .as_ref()
        .map(|indexes| indexes.iter().map(to_local_index).collect::<Result<Vec<_>>>())
        .transpose()?;

    let global_secondary_indexes = properties
        .global_secondary_indexes
        .as_ref()
        .map(|indexes| indexes.iter().map(to_global_index).collect::<Result<Vec<_>>>())
        .transpose()?;

    let stream_specification = properties
        .stream_specification
        .as_ref()
        .map(to_stream_specification)
        .transpose()?;

    CreateTableInput::builder()
        .set_table_name(properties.table_name.clone())
        .set_attribute_definitions(Some(attribute_definitions))
        .set_key_schema(Some(key_schema))
        .set_billing_mode(properties.billing_mode.as_deref().map(BillingMode::from))
        .set_provisioned_throughput(provisioned_throughput)
        .set_local_secondary_indexes(local_secondary_indexes)
        .set_global_secondary_indexes(global_secondary_indexes)
        .set_stream_specification(stream_specification)
        .build()
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}

fn to_attribute_definition(property: &AttributeDefinitionProperty) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(&property.attribute_name)
        .attribute_type(ScalarAttributeType::from(property.attribute_type.as_str()))
        .build()
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}

fn to_key_schema_element(property: &KeySchemaProperty) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(&property.attribute_name)
        .key_type(KeyType::from(property.key_type.as_str()))
        .build()
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}

fn to_provisioned_throughput(property: &ThroughputProperty) -> Result<ProvisionedThroughput> {
    ProvisionedThroughput::builder()
        .read_capacity_units(property.read_capacity_units)
        .write_capacity_units(property.write_capacity_units)
        .build()
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}

fn to_projection(property: &ProjectionProperty) -> Projection {
    Projection::builder()
        .set_projection_type(
            property
                .projection_type
                .as_deref()
                .map(ProjectionType::from),
        )
        .set_non_key_attributes(property.non_key_attributes.clone())
        .build()
}

fn to_local_index(property: &LocalIndexProperty) -> Result<LocalSecondaryIndex> {
    let key_schema = property
        .key_schema
        .iter()
        .map(to_key_schema_element)
        .collect::<Result<Vec<_>>>()?;

    LocalSecondaryIndex::builder()
        .index_name(&property.index_name)
        .set_key_schema(Some(key_schema))
        .projection(to_projection(&property.projection))
        .build()
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}

fn to_global_index(property: &GlobalIndexProperty) -> Result<GlobalSecondaryIndex> {
    let key_schema = property
        .key_schema
        .iter()
        .map(to_key_schema_element)
        .collect::<Result<Vec<_>>>()?;

    let throughput = property
        .provisioned_throughput
        .as_ref()
        .map(to_provisioned_throughput)
        .transpose()?;

    GlobalSecondaryIndex::builder()
        .index_name(&property.index_name)
        .set_key_schema(Some(key_schema))
        .projection(to_projection(&property.projection))
        .set_provisioned_throughput(throughput)
        .build()
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}

/// A declared stream specification always maps to an enabled stream; the
/// record's own `StreamEnabled` flag is not consulted.
fn to_stream_specification(property: &StreamSpecificationProperty) -> Result<StreamSpecification> {
    StreamSpecification::builder()
        .stream_enabled(true)
        .stream_view_type(StreamViewType::from(property.stream_view_type.as_str()))
        .build()
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}
