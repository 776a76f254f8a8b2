use aws_credential_types::Credentials as AwsCredentialsExternal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) type AwsCredentials = AwsCredentialsExternal;

pub(crate) const LABEL_INSTANCE_ID: &str = "__meta_rds_instance_id";
pub(crate) const LABEL_ENGINE: &str = "__meta_rds_engine";
pub(crate) const LABEL_ENGINE_VERSION: &str = "__meta_rds_engine_version";
pub(crate) const LABEL_TAG_PREFIX: &str = "__meta_rds_tag_";

/// One Prometheus `http_sd` target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DiscoveryRecord {
    pub targets: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct RdsTag {
    pub key: String,
    pub value: String,
}

impl RdsTag {
    pub(crate) fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ClusterDescriptor {
    pub identifier: String,
    pub endpoint: String,
    pub port: i32,
    pub engine: String,
    pub engine_version: String,
    pub tags: Vec<RdsTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct InstanceDescriptor {
    pub identifier: String,
    pub endpoint_address: String,
    pub endpoint_port: i32,
    pub engine: String,
    pub engine_version: String,
    pub tags: Vec<RdsTag>,
    pub cluster_identifier: Option<String>,
}

impl InstanceDescriptor {
    /// Members of a cluster are reachable through the cluster endpoint.
    pub(crate) fn is_cluster_member(&self) -> bool {
        self.cluster_identifier
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }
}

/// Which identity a discovery request runs under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ClientSelector {
    Default,
    AssumedRole(String),
}

impl ClientSelector {
    pub(crate) fn from_role_arn(role_arn: Option<&str>) -> Self {
        match role_arn.map(str::trim) {
            Some(arn) if !arn.is_empty() => ClientSelector::AssumedRole(arn.to_string()),
            _ => ClientSelector::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_selector_from_role_arn() {
        assert_eq!(ClientSelector::from_role_arn(None), ClientSelector::Default);
        assert_eq!(
            ClientSelector::from_role_arn(Some("")),
            ClientSelector::Default
        );
        assert_eq!(
            ClientSelector::from_role_arn(Some("   ")),
            ClientSelector::Default
        );
        assert_eq!(
            ClientSelector::from_role_arn(Some("arn:aws:iam::123456789012:role/sd")),
            ClientSelector::AssumedRole("arn:aws:iam::123456789012:role/sd".to_string())
        );
    }

    #[test]
    fn test_cluster_membership() {
        let mut instance = InstanceDescriptor {
            identifier: "db-1".to_string(),
            ..Default::default()
        };
        assert!(!instance.is_cluster_member());

        instance.cluster_identifier = Some(String::new());
        assert!(!instance.is_cluster_member());

        instance.cluster_identifier = Some("aurora-1".to_string());
        assert!(instance.is_cluster_member());
    }
}
