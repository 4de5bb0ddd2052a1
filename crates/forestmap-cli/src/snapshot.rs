//! JSON topology snapshots: the CLI's stand-in for live directory
//! enumeration.
//!
//! A snapshot lists the forest name, its sites with their domain
//! controllers, and the forest's trust relationships. The provider replays
//! the same discovery bookkeeping a live enumeration performs: trusts first,
//! then every site, then the servers of each site, synthesizing
//! configuration-container distinguished names as it goes.

use forestmap::{
    DiscoveryError, EntityFlags, EntityKind, EntityStore, TopologyProvider, site_common_name,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySnapshot {
    /// Forest root DNS name, e.g. `corp.example.com`.
    pub forest: String,
    #[serde(default)]
    pub sites: Vec<SiteSnapshot>,
    #[serde(default)]
    pub trusts: Vec<TrustSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub name: String,
    #[serde(default)]
    pub domain_controllers: Vec<DcSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcSnapshot {
    pub fqdn: String,
    /// Raw role attribute bits; see `EntityFlags`.
    #[serde(default)]
    pub flags: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustSnapshot {
    pub domain: String,
    #[serde(default)]
    pub flags: u32,
}

fn forest_distinguished_name(forest: &str) -> Option<String> {
    let parts: Vec<String> = forest
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| format!("DC={p}"))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}

/// One-shot provider that feeds a parsed snapshot into the entity store.
pub struct SnapshotProvider {
    json: String,
}

impl SnapshotProvider {
    pub fn new(json: String) -> Self {
        Self { json }
    }
}

impl TopologyProvider for SnapshotProvider {
    fn discover(&mut self, store: &mut EntityStore) -> Result<(), DiscoveryError> {
        let snapshot: TopologySnapshot = serde_json::from_str(&self.json)
            .map_err(|err| DiscoveryError::InvalidSnapshot(err.to_string()))?;
        let forest_dn = forest_distinguished_name(&snapshot.forest)
            .ok_or_else(|| DiscoveryError::InvalidSnapshot("forest name is empty".to_string()))?;

        info!(
            forest = %snapshot.forest,
            trusts = snapshot.trusts.len(),
            sites = snapshot.sites.len(),
            "loaded topology snapshot"
        );

        for trust in &snapshot.trusts {
            let id = store.create(EntityKind::Trust);
            let entity = store.get_mut(id).expect("fresh trust");
            entity.display_name = trust.domain.clone();
            entity.fully_qualified_name = trust.domain.clone();
            entity.flags = EntityFlags::from_bits_retain(trust.flags);
        }

        // Sites are enumerated before any servers, as the configuration
        // container is listed site-by-site.
        let mut site_ids = Vec::with_capacity(snapshot.sites.len());
        for site in &snapshot.sites {
            let dn = format!("CN={},CN=Sites,CN=Configuration,{forest_dn}", site.name);
            let id = store.create(EntityKind::Site);
            let entity = store.get_mut(id).expect("fresh site");
            entity.display_name = site_common_name(&dn).unwrap_or(&site.name).to_string();
            entity.distinguished_name = dn.clone();
            site_ids.push((id, dn));
        }

        for ((site_id, site_dn), site) in site_ids.iter().zip(&snapshot.sites) {
            for dc in &site.domain_controllers {
                let host = dc.fqdn.split('.').next().unwrap_or(&dc.fqdn).to_string();
                let id = store.create(EntityKind::DomainController);
                let entity = store.get_mut(id).expect("fresh dc");
                entity.display_name = host.clone();
                entity.fully_qualified_name = dc.fqdn.clone();
                entity.distinguished_name = format!("CN={host},CN=Servers,{site_dn}");
                entity.site_ref = site_dn.clone();
                entity.flags = EntityFlags::from_bits_retain(dc.flags);
                store.get_mut(*site_id).expect("site placed earlier").dcs_in_site += 1;
            }
            info!(
                site = %site.name,
                dcs = site.domain_controllers.len(),
                "site enumerated"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "forest": "corp.example.com",
        "sites": [
            {
                "name": "HQ",
                "domain_controllers": [
                    {"fqdn": "dc1.corp.example.com", "flags": 1},
                    {"fqdn": "dc2.corp.example.com"}
                ]
            },
            {"name": "Branch"}
        ],
        "trusts": [{"domain": "partner.example.org", "flags": 32}]
    }"#;

    #[test]
    fn replays_snapshot_into_the_store_in_discovery_order() {
        let mut store = EntityStore::new();
        SnapshotProvider::new(SNAPSHOT.to_string())
            .discover(&mut store)
            .expect("discover ok");

        let kinds: Vec<EntityKind> = store.iter().map(|(_, e)| e.kind).collect();
        assert_eq!(
            kinds,
            [
                EntityKind::Trust,
                EntityKind::Site,
                EntityKind::Site,
                EntityKind::DomainController,
                EntityKind::DomainController,
            ]
        );

        let hq = store
            .iter()
            .find(|(_, e)| e.display_name == "HQ")
            .map(|(_, e)| e)
            .expect("HQ site");
        assert_eq!(hq.dcs_in_site, 2);
        assert_eq!(
            hq.distinguished_name,
            "CN=HQ,CN=Sites,CN=Configuration,DC=corp,DC=example,DC=com"
        );

        let dc1 = store
            .iter()
            .find(|(_, e)| e.fully_qualified_name == "dc1.corp.example.com")
            .map(|(_, e)| e)
            .expect("dc1");
        assert_eq!(dc1.display_name, "dc1");
        assert_eq!(dc1.site_ref, hq.distinguished_name);
        assert!(dc1.flags.contains(EntityFlags::GLOBAL_CATALOG));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let parsed: TopologySnapshot = serde_json::from_str(SNAPSHOT).expect("parse");
        let rendered = serde_json::to_string(&parsed).expect("serialize");
        let reparsed: TopologySnapshot = serde_json::from_str(&rendered).expect("reparse");
        assert_eq!(
            serde_json::to_value(&parsed).expect("value"),
            serde_json::to_value(&reparsed).expect("value")
        );
    }

    #[test]
    fn malformed_json_is_a_discovery_failure() {
        let mut store = EntityStore::new();
        let err = SnapshotProvider::new("{not json".to_string())
            .discover(&mut store)
            .expect_err("must fail");
        assert!(matches!(err, DiscoveryError::InvalidSnapshot(_)));
    }

    #[test]
    fn empty_forest_name_is_rejected() {
        let mut store = EntityStore::new();
        let err = SnapshotProvider::new(r#"{"forest": ""}"#.to_string())
            .discover(&mut store)
            .expect_err("must fail");
        assert!(matches!(err, DiscoveryError::InvalidSnapshot(_)));
    }
}
