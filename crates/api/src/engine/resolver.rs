use std::sync::Arc;

use fieldops_core::directory::{ClientDirectory, OwnershipSource};
use fieldops_core::error::CoreError;
use fieldops_core::ownership::{
    normalize_department, select_owner, OwnerSource, OwnershipConfig, OwnershipInputs,
};
use fieldops_core::types::DbId;

/// Computes the technician who owns a client.
///
/// Rules are loaded one tier at a time and loading stops at the first tier
/// that produces an owner. Selection within a tier is delegated to
/// [`select_owner`].
pub struct OwnershipResolver {
    clients: Arc<dyn ClientDirectory>,
    rules: Arc<dyn OwnershipSource>,
    config: OwnershipConfig,
}

impl OwnershipResolver {
    pub fn new(
        clients: Arc<dyn ClientDirectory>,
        rules: Arc<dyn OwnershipSource>,
        config: OwnershipConfig,
    ) -> Self {
        Self {
            clients,
            rules,
            config,
        }
    }

    /// Resolve the owner of `client_id`. An unknown client has no owner.
    pub async fn resolve_owner(&self, client_id: DbId) -> Result<Option<DbId>, CoreError> {
        let Some(client) = self.clients.find_client(client_id).await? else {
            tracing::debug!(client_id, "Client not found, no owner");
            return Ok(None);
        };

        let rules_only = OwnershipConfig::default();
        let mut inputs = OwnershipInputs {
            direct: self.rules.direct_assignments(client_id).await?,
            ..Default::default()
        };
        if let Some(found) = select_owner(&inputs, &rules_only) {
            return Ok(Some(traced(client_id, found)));
        }

        if let Some(department) = normalize_department(client.department.as_deref()) {
            inputs.by_department = self.rules.department_assignments(&department).await?;
            if let Some(found) = select_owner(&inputs, &rules_only) {
                return Ok(Some(traced(client_id, found)));
            }
            inputs.coverage = self.rules.coverage_rules(&department).await?;
        }

        match select_owner(&inputs, &self.config) {
            Some(found) => Ok(Some(traced(client_id, found))),
            None => {
                tracing::debug!(client_id, "No ownership rule matched");
                Ok(None)
            }
        }
    }
}

fn traced(client_id: DbId, (technician_id, source): (DbId, OwnerSource)) -> DbId {
    tracing::debug!(client_id, technician_id, source = ?source, "Owner resolved");
    technician_id
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use fieldops_core::directory::ClientProfile;
    use fieldops_core::ownership::{AssignmentCandidate, CoverageCandidate};
    use fieldops_core::types::Timestamp;

    use super::*;

    #[derive(Default)]
    struct FakeStore {
        clients: HashMap<DbId, ClientProfile>,
        direct: HashMap<DbId, Vec<AssignmentCandidate>>,
        by_department: HashMap<String, Vec<AssignmentCandidate>>,
        coverage: HashMap<String, Vec<CoverageCandidate>>,
        loads: Mutex<Vec<&'static str>>,
    }

    impl FakeStore {
        fn with_client(mut self, id: DbId, department: Option<&str>) -> Self {
            self.clients.insert(
                id,
                ClientProfile {
                    id,
                    name: format!("Client {id}"),
                    department: department.map(str::to_string),
                    contact_email: None,
                },
            );
            self
        }

        fn loads(&self) -> Vec<&'static str> {
            self.loads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClientDirectory for FakeStore {
        async fn find_client(&self, client_id: DbId) -> Result<Option<ClientProfile>, CoreError> {
            Ok(self.clients.get(&client_id).cloned())
        }
    }

    #[async_trait]
    impl OwnershipSource for FakeStore {
        async fn direct_assignments(
            &self,
            client_id: DbId,
        ) -> Result<Vec<AssignmentCandidate>, CoreError> {
            self.loads.lock().unwrap().push("direct");
            Ok(self.direct.get(&client_id).cloned().unwrap_or_default())
        }

        async fn department_assignments(
            &self,
            department: &str,
        ) -> Result<Vec<AssignmentCandidate>, CoreError> {
            self.loads.lock().unwrap().push("department");
            Ok(self.by_department.get(department).cloned().unwrap_or_default())
        }

        async fn coverage_rules(
            &self,
            department: &str,
        ) -> Result<Vec<CoverageCandidate>, CoreError> {
            self.loads.lock().unwrap().push("coverage");
            Ok(self.coverage.get(department).cloned().unwrap_or_default())
        }
    }

    fn at(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn rule(rule_id: DbId, technician_id: DbId) -> AssignmentCandidate {
        AssignmentCandidate {
            rule_id,
            technician_id,
            valid_from: at(rule_id),
            active: true,
            valid_until: None,
        }
    }

    fn cover(rule_id: DbId, technician_id: DbId, priority: i32) -> CoverageCandidate {
        CoverageCandidate {
            rule_id,
            technician_id,
            priority,
            active: true,
        }
    }

    fn resolver(store: FakeStore, fallback: Option<DbId>) -> (OwnershipResolver, Arc<FakeStore>) {
        let store = Arc::new(store);
        let resolver = OwnershipResolver::new(
            store.clone(),
            store.clone(),
            OwnershipConfig {
                fallback_technician_id: fallback,
            },
        );
        (resolver, store)
    }

    #[tokio::test]
    async fn direct_rule_short_circuits_later_tiers() {
        let mut store = FakeStore::default().with_client(1, Some("North"));
        store.direct.insert(1, vec![rule(1, 11)]);
        store.by_department.insert("North".into(), vec![rule(2, 22)]);
        let (resolver, store) = resolver(store, None);

        assert_eq!(resolver.resolve_owner(1).await.unwrap(), Some(11));
        assert_eq!(store.loads(), vec!["direct"]);
    }

    #[tokio::test]
    async fn department_rule_used_without_direct() {
        let mut store = FakeStore::default().with_client(1, Some("North"));
        store.by_department.insert("North".into(), vec![rule(2, 22)]);
        store.coverage.insert("North".into(), vec![cover(3, 33, 1)]);
        let (resolver, store) = resolver(store, None);

        assert_eq!(resolver.resolve_owner(1).await.unwrap(), Some(22));
        assert_eq!(store.loads(), vec!["direct", "department"]);
    }

    #[tokio::test]
    async fn coverage_with_lowest_priority_wins() {
        let mut store = FakeStore::default().with_client(1, Some("North"));
        store
            .coverage
            .insert("North".into(), vec![cover(1, 5, 50), cover(2, 9, 10)]);
        let (resolver, _) = resolver(store, Some(99));

        assert_eq!(resolver.resolve_owner(1).await.unwrap(), Some(9));
    }

    #[tokio::test]
    async fn client_without_department_skips_department_tiers() {
        let store = FakeStore::default().with_client(1, Some("  "));
        let (resolver, store) = resolver(store, Some(99));

        assert_eq!(resolver.resolve_owner(1).await.unwrap(), Some(99));
        assert_eq!(store.loads(), vec!["direct"]);
    }

    #[tokio::test]
    async fn no_rule_and_no_fallback_means_no_owner() {
        let store = FakeStore::default().with_client(1, Some("North"));
        let (resolver, _) = resolver(store, None);

        assert_eq!(resolver.resolve_owner(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_client_has_no_owner_even_with_fallback() {
        let (resolver, store) = resolver(FakeStore::default(), Some(99));

        assert_eq!(resolver.resolve_owner(404).await.unwrap(), None);
        assert!(store.loads().is_empty());
    }
}
