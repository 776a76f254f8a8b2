use crate::core::error::InventoryError;
use crate::core::types::{
    ClusterDescriptor, DiscoveryRecord, InstanceDescriptor, LABEL_ENGINE, LABEL_ENGINE_VERSION,
    LABEL_INSTANCE_ID, LABEL_TAG_PREFIX, RdsTag,
};
use crate::ports::RdsInventoryPort;
use std::collections::BTreeMap;

/// Lists clusters and standalone instances as `http_sd` target groups.
///
/// Cluster records come first, then instances that are not cluster members,
/// each group in the order RDS returned it. Either call failing fails the whole
/// listing.
pub(crate) async fn discover_targets(
    client: &dyn RdsInventoryPort,
) -> Result<Vec<DiscoveryRecord>, InventoryError> {
    let clusters = client.describe_db_clusters().await?;
    let instances = client.describe_db_instances().await?;

    let mut records = Vec::with_capacity(clusters.len() + instances.len());
    records.extend(clusters.iter().map(cluster_record));
    records.extend(
        instances
            .iter()
            .filter(|instance| !instance.is_cluster_member())
            .map(instance_record),
    );
    Ok(records)
}

pub(crate) fn cluster_record(cluster: &ClusterDescriptor) -> DiscoveryRecord {
    DiscoveryRecord {
        targets: vec![format!("{}:{}", cluster.endpoint, cluster.port)],
        labels: rds_labels(
            &cluster.identifier,
            &cluster.engine,
            &cluster.engine_version,
            &cluster.tags,
        ),
    }
}

pub(crate) fn instance_record(instance: &InstanceDescriptor) -> DiscoveryRecord {
    DiscoveryRecord {
        targets: vec![format!(
            "{}:{}",
            instance.endpoint_address, instance.endpoint_port
        )],
        labels: rds_labels(
            &instance.identifier,
            &instance.engine,
            &instance.engine_version,
            &instance.tags,
        ),
    }
}

// Tag keys go into label names as-is, even if Prometheus would reject them.
fn rds_labels(
    identifier: &str,
    engine: &str,
    engine_version: &str,
    tags: &[RdsTag],
) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_INSTANCE_ID.to_string(), identifier.to_string());
    labels.insert(LABEL_ENGINE.to_string(), engine.to_string());
    labels.insert(LABEL_ENGINE_VERSION.to_string(), engine_version.to_string());
    for tag in tags {
        labels.insert(format!("{}{}", LABEL_TAG_PREFIX, tag.key), tag.value.clone());
    }
    labels
}
