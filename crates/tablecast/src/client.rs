//! DynamoDB Local client setup and table scaffolding (imperative shell).
//!
//! Nothing here is part of the mapping core: these helpers exist so the
//! mapped [`CreateTableInput`] can be exercised against a local emulator
//! (or, with `AWS_ENDPOINT_URL` unset in a custom config, against the real
//! service).

use std::time::Duration;

use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::operation::create_table::{CreateTableInput, CreateTableOutput};
use aws_sdk_dynamodb::types::{IndexStatus, TableDescription, TableStatus};
use aws_sdk_dynamodb::Client;

use crate::error::{Result, TablecastError};

const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8000";

/// Connection settings for the local emulator.
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    /// Endpoint URL, `http://localhost:8000` unless overridden.
    pub endpoint_url: String,
    /// AWS region. The emulator accepts any value.
    pub region: String,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            endpoint_url: std::env::var("AWS_ENDPOINT_URL")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT_URL.to_string()),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }
}

impl EmulatorConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        format!("Local DynamoDB ({}, region: {})", self.endpoint_url, self.region)
    }
}

/// Creates a DynamoDB client against the emulator endpoint.
///
/// Credentials are static placeholders; the emulator does not verify them.
pub async fn create_client(config: &EmulatorConfig) -> Client {
    tracing::debug!(target = %config.target_display(), "creating DynamoDB client");

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .endpoint_url(config.endpoint_url.clone())
        .credentials_provider(Credentials::new("fake", "fake", None, None, "tablecast"))
        .load()
        .await;

    Client::new(&sdk_config)
}

/// Sends a mapped `CreateTableInput` as a CreateTable call.
pub async fn send_create_table(
    client: &Client,
    input: CreateTableInput,
) -> Result<CreateTableOutput> {
    client
        .create_table()
        .set_table_name(input.table_name)
        .set_attribute_definitions(input.attribute_definitions)
        .set_key_schema(input.key_schema)
        .set_billing_mode(input.billing_mode)
        .set_provisioned_throughput(input.provisioned_throughput)
        .set_local_secondary_indexes(input.local_secondary_indexes)
        .set_global_secondary_indexes(input.global_secondary_indexes)
        .set_stream_specification(input.stream_specification)
        .send()
        .await
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))
}

/// Fetches the current table status, `None` if the table doesn't exist.
pub async fn table_status(client: &Client, table_name: &str) -> Result<Option<TableStatus>> {
    let description = describe_table(client, table_name).await?;
    Ok(description.and_then(|table| table.table_status))
}

/// Polls until the table and all of its GSIs are active.
pub async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    let max_attempts = 60;
    let delay = Duration::from_secs(2);

    for _ in 0..max_attempts {
        if let Some(table) = describe_table(client, table_name).await? {
            let table_active = table.table_status == Some(TableStatus::Active);
            let gsis_active = table
                .global_secondary_indexes()
                .iter()
                .all(|gsi| gsi.index_status == Some(IndexStatus::Active));
            if table_active && gsis_active {
                return Ok(());
            }
        }
        tokio::time::sleep(delay).await;
    }

    Err(TablecastError::TableActivationTimeout)
}

/// Deletes a table. Used by tests to clean up disposable tables.
pub async fn delete_table(client: &Client, table_name: &str) -> Result<()> {
    client
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| TablecastError::AwsSdk(e.to_string()))?;
    Ok(())
}

async fn describe_table(client: &Client, table_name: &str) -> Result<Option<TableDescription>> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(response) => Ok(response.table().cloned()),
        Err(err) => {
            let service_err = err.into_service_error();
            if service_err.is_resource_not_found_exception() {
                Ok(None)
            } else {
                Err(TablecastError::AwsSdk(service_err.to_string()))
            }
        }
    }
}
