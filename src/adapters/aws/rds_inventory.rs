use crate::core::error::{InventoryError, RdsOperation};
use crate::core::types::{ClusterDescriptor, InstanceDescriptor, RdsTag};
use crate::ports::RdsInventoryPort;
use async_trait::async_trait;
use aws_sdk_rds::types::{DbCluster, DbInstance, Tag};
use tracing::debug;

/// RDS inventory for a single identity. Only the first result page is read.
pub(crate) struct RdsSdkInventoryClient {
    rds_client: aws_sdk_rds::Client,
}

impl RdsSdkInventoryClient {
    pub(crate) fn new(rds_client: aws_sdk_rds::Client) -> Self {
        Self { rds_client }
    }
}

#[async_trait]
impl RdsInventoryPort for RdsSdkInventoryClient {
    async fn describe_db_clusters(&self) -> Result<Vec<ClusterDescriptor>, InventoryError> {
        let operation = RdsOperation::DescribeDbClusters;
        debug!("Calling {}", operation);
        let output = self
            .rds_client
            .describe_db_clusters()
            .send()
            .await
            .map_err(|e| InventoryError::ApiCall {
                operation,
                source: Box::new(e),
            })?;

        output.db_clusters().iter().map(cluster_from_sdk).collect()
    }

    async fn describe_db_instances(&self) -> Result<Vec<InstanceDescriptor>, InventoryError> {
        let operation = RdsOperation::DescribeDbInstances;
        debug!("Calling {}", operation);
        let output = self
            .rds_client
            .describe_db_instances()
            .send()
            .await
            .map_err(|e| InventoryError::ApiCall {
                operation,
                source: Box::new(e),
            })?;

        output.db_instances().iter().map(instance_from_sdk).collect()
    }
}

fn required<'a>(
    value: Option<&'a str>,
    operation: RdsOperation,
    resource_id: &str,
    field: &'static str,
) -> Result<&'a str, InventoryError> {
    value.ok_or_else(|| InventoryError::MissingField {
        operation,
        resource_id: resource_id.to_string(),
        field,
    })
}

fn tags_from_sdk(
    tags: &[Tag],
    operation: RdsOperation,
    resource_id: &str,
) -> Result<Vec<RdsTag>, InventoryError> {
    tags.iter()
        .map(|tag| {
            let key = required(tag.key(), operation, resource_id, "TagList.Key")?;
            let value = required(tag.value(), operation, resource_id, "TagList.Value")?;
            Ok(RdsTag::new(key, value))
        })
        .collect()
}

pub(crate) fn cluster_from_sdk(cluster: &DbCluster) -> Result<ClusterDescriptor, InventoryError> {
    let operation = RdsOperation::DescribeDbClusters;
    let identifier = required(
        cluster.db_cluster_identifier(),
        operation,
        "<unknown>",
        "DBClusterIdentifier",
    )?;

    Ok(ClusterDescriptor {
        identifier: identifier.to_string(),
        endpoint: required(cluster.endpoint(), operation, identifier, "Endpoint")?.to_string(),
        port: cluster
            .port()
            .ok_or_else(|| InventoryError::MissingField {
                operation,
                resource_id: identifier.to_string(),
                field: "Port",
            })?,
        engine: required(cluster.engine(), operation, identifier, "Engine")?.to_string(),
        engine_version: required(
            cluster.engine_version(),
            operation,
            identifier,
            "EngineVersion",
        )?
        .to_string(),
        tags: tags_from_sdk(cluster.tag_list(), operation, identifier)?,
    })
}

pub(crate) fn instance_from_sdk(
    instance: &DbInstance,
) -> Result<InstanceDescriptor, InventoryError> {
    let operation = RdsOperation::DescribeDbInstances;
    let identifier = required(
        instance.db_instance_identifier(),
        operation,
        "<unknown>",
        "DBInstanceIdentifier",
    )?;
    let missing = |field| InventoryError::MissingField {
        operation,
        resource_id: identifier.to_string(),
        field,
    };

    let endpoint = instance.endpoint().ok_or_else(|| missing("Endpoint"))?;

    Ok(InstanceDescriptor {
        identifier: identifier.to_string(),
        endpoint_address: endpoint
            .address()
            .ok_or_else(|| missing("Endpoint.Address"))?
            .to_string(),
        endpoint_port: endpoint.port().ok_or_else(|| missing("Endpoint.Port"))?,
        engine: required(instance.engine(), operation, identifier, "Engine")?.to_string(),
        engine_version: required(
            instance.engine_version(),
            operation,
            identifier,
            "EngineVersion",
        )?
        .to_string(),
        tags: tags_from_sdk(instance.tag_list(), operation, identifier)?,
        cluster_identifier: instance.db_cluster_identifier().map(String::from),
    })
}
