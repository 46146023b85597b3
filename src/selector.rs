use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Instance;
use crate::services::Discovery;

/// Tag constraints on instance selection: tag key to the set of values that
/// put an instance in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    entries: HashMap<String, HashSet<String>>,
}

impl TagFilter {
    /// Parses a `key=v1,v2;key2=v3` expression. Entries that do not split
    /// into exactly one key and one value list are ignored.
    pub fn parse(expr: Option<&str>) -> Self {
        let mut entries: HashMap<String, HashSet<String>> = HashMap::new();

        for item in expr.unwrap_or_default().split(';') {
            if item.is_empty() {
                continue;
            }
            let parts: Vec<&str> = item.split('=').collect();
            if parts.len() != 2 {
                warn!(entry = item, "Ignoring malformed tag filter entry");
                continue;
            }
            let values = parts[1].split(',').map(str::to_string).collect();
            entries.insert(parts[0].to_string(), values);
        }

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a tag key/value pair satisfies the filter.
    pub fn matches(&self, key: &str, value: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|values| values.contains(value))
    }
}

/// Determines which instances are in scope for this invocation.
///
/// Without a filter every Performance Insights-enabled instance is selected.
/// With a filter, an instance is selected on its first tag that matches,
/// remaining tags are not evaluated. An empty selection is not an error.
pub async fn select_instances(
    discovery: &dyn Discovery,
    filter_expr: Option<&str>,
) -> Result<Vec<Instance>> {
    let filter = TagFilter::parse(filter_expr);
    let instances = discovery.list_instances().await?;

    if filter.is_empty() {
        return Ok(instances.into_iter().filter(|i| i.pi_enabled).collect());
    }

    let mut selected = Vec::new();
    for instance in instances {
        let tags = discovery.list_tags(&instance).await?;
        for (key, value) in &tags {
            if filter.matches(key, value) && instance.pi_enabled {
                selected.push(instance);
                break;
            }
        }
    }

    debug!(count = selected.len(), "Instance selection complete");
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    struct FakeDiscovery {
        instances: Vec<Instance>,
        tags: HashMap<String, HashMap<String, String>>,
    }

    #[async_trait]
    impl Discovery for FakeDiscovery {
        async fn list_instances(&self) -> Result<Vec<Instance>> {
            Ok(self.instances.clone())
        }

        async fn list_tags(&self, instance: &Instance) -> Result<HashMap<String, String>> {
            Ok(self.tags.get(&instance.name).cloned().unwrap_or_default())
        }
    }

    fn instance(name: &str, pi_enabled: bool) -> Instance {
        Instance {
            name: name.to_string(),
            arn: format!("arn:aws:rds:us-east-1:123456789012:db:{name}"),
            resource_id: format!("db-{name}"),
            pi_enabled,
        }
    }

    #[test]
    fn parse_filter_expression() {
        let filter = TagFilter::parse(Some("env=dev,test;team=db"));
        assert!(filter.matches("env", "dev"));
        assert!(filter.matches("env", "test"));
        assert!(filter.matches("team", "db"));
        assert!(!filter.matches("env", "prod"));
        assert!(!filter.matches("owner", "db"));
    }

    #[test]
    fn parse_drops_malformed_entries() {
        let filter = TagFilter::parse(Some("badentry;env=dev"));
        assert!(filter.matches("env", "dev"));
        assert!(!filter.matches("badentry", ""));

        assert!(TagFilter::parse(Some("badentry")).is_empty());
        assert!(TagFilter::parse(None).is_empty());
        assert!(TagFilter::parse(Some("")).is_empty());
    }

    #[tokio::test]
    async fn no_filter_selects_enabled_instances() {
        let discovery = FakeDiscovery {
            instances: vec![instance("a", true), instance("b", false)],
            tags: HashMap::new(),
        };

        let selected = select_instances(&discovery, None).await.unwrap();
        let names: Vec<&str> = selected.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[tokio::test]
    async fn filter_selects_matching_tagged_instances() {
        let discovery = FakeDiscovery {
            instances: vec![instance("a", true), instance("b", true)],
            tags: HashMap::from([
                (
                    "a".to_string(),
                    HashMap::from([("env".to_string(), "prod".to_string())]),
                ),
                (
                    "b".to_string(),
                    HashMap::from([("env".to_string(), "dev".to_string())]),
                ),
            ]),
        };

        let selected = select_instances(&discovery, Some("env=prod")).await.unwrap();
        let names: Vec<&str> = selected.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[tokio::test]
    async fn filter_excludes_disabled_instances() {
        let discovery = FakeDiscovery {
            instances: vec![instance("a", false)],
            tags: HashMap::from([(
                "a".to_string(),
                HashMap::from([("env".to_string(), "prod".to_string())]),
            )]),
        };

        let selected = select_instances(&discovery, Some("env=prod")).await.unwrap();
        assert!(selected.is_empty());
    }
}
