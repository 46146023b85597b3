use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rds::Client;

use crate::error::{PipelineError, Result};
use crate::models::Instance;
use crate::services::Discovery;

/// Fleet discovery backed by the RDS control plane.
#[derive(Debug, Clone)]
pub struct RdsDiscovery {
    client: Client,
}

impl RdsDiscovery {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl Discovery for RdsDiscovery {
    async fn list_instances(&self) -> Result<Vec<Instance>> {
        let mut instances = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut request = self.client.describe_db_instances();
            if let Some(m) = &marker {
                request = request.marker(m);
            }
            let response = request
                .send()
                .await
                .map_err(|e| PipelineError::Discovery(e.to_string()))?;

            for db in response.db_instances() {
                instances.push(Instance {
                    name: db.db_instance_identifier().unwrap_or_default().to_string(),
                    arn: db.db_instance_arn().unwrap_or_default().to_string(),
                    resource_id: db.dbi_resource_id().unwrap_or_default().to_string(),
                    pi_enabled: db.performance_insights_enabled().unwrap_or(false),
                });
            }

            marker = response.marker().map(str::to_string);
            if marker.is_none() {
                break;
            }
        }

        Ok(instances)
    }

    async fn list_tags(&self, instance: &Instance) -> Result<HashMap<String, String>> {
        let response = self
            .client
            .list_tags_for_resource()
            .resource_name(&instance.arn)
            .send()
            .await
            .map_err(|e| PipelineError::Discovery(e.to_string()))?;

        Ok(response
            .tag_list()
            .iter()
            .filter_map(|tag| Some((tag.key()?.to_string(), tag.value()?.to_string())))
            .collect())
    }
}
