//! Discovered topology objects.

use crate::geom::{WorldBox, world_point};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Site,
    DomainController,
    Trust,
    /// Reserved: inter-site connection objects are discovered but never laid
    /// out or drawn. Kept so snapshots round-trip.
    SiteLink,
}

bitflags! {
    /// Role attributes of a domain controller, or the raw trust attribute
    /// bits for a trust entity. Carried for future display; layout does not
    /// depend on them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u32 {
        const GLOBAL_CATALOG        = 1;
        const READ_ONLY             = 1 << 1;
        const PDC_EMULATOR          = 1 << 2;
        const SCHEMA_MASTER         = 1 << 3;
        const DOMAIN_NAMING_MASTER  = 1 << 4;
        const RID_MASTER            = 1 << 5;
        const INFRASTRUCTURE_MASTER = 1 << 6;
    }
}

/// One discovered topology object.
///
/// `x`/`y`/`width`/`height` are world-space integer units and stay zero until
/// the layout engine assigns them. The frame renderer never mutates an
/// entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Short label: site common name, or trust domain name.
    pub display_name: String,
    /// Long label: DC DNS hostname, shown at high zoom.
    pub fully_qualified_name: String,
    /// Opaque directory identifier; only used to correlate a DC to its site.
    pub distinguished_name: String,
    /// DC only: distinguished name of the containing site.
    pub site_ref: String,
    /// Site only: number of DCs assigned to this site.
    pub dcs_in_site: u32,
    pub flags: EntityFlags,
}

impl Entity {
    pub(crate) fn blank(kind: EntityKind) -> Self {
        Self {
            kind,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            display_name: String::new(),
            fully_qualified_name: String::new(),
            distinguished_name: String::new(),
            site_ref: String::new(),
            dcs_in_site: 0,
            flags: EntityFlags::empty(),
        }
    }

    /// Whether the layout engine has assigned this entity a box. Trusts and
    /// orphaned DCs stay unplaced and are skipped by the renderer.
    pub fn is_placed(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn world_box(&self) -> WorldBox {
        WorldBox::new(
            world_point(f64::from(self.x), f64::from(self.y)),
            world_point(
                f64::from(self.x) + f64::from(self.width),
                f64::from(self.y) + f64::from(self.height),
            ),
        )
    }
}

/// Extracts the leading common name from a site distinguished name, e.g.
/// `CN=Default-First-Site-Name,CN=Sites,...` -> `Default-First-Site-Name`.
pub fn site_common_name(distinguished_name: &str) -> Option<&str> {
    let rest = distinguished_name
        .get(..3)
        .filter(|prefix| prefix.eq_ignore_ascii_case("cn="))
        .map(|_| &distinguished_name[3..])?;
    let end = rest.find(',').unwrap_or(rest.len());
    if end == 0 { None } else { Some(&rest[..end]) }
}

// Serialize as the raw bits; the snapshot format stores the directory's
// attribute DWORD verbatim.
impl Serialize for EntityFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for EntityFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(EntityFlags::from_bits_retain(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_common_name_extracts_leading_cn() {
        let dn = "CN=Default-First-Site-Name,CN=Sites,CN=Configuration,DC=corp,DC=example,DC=com";
        assert_eq!(site_common_name(dn), Some("Default-First-Site-Name"));
    }

    #[test]
    fn site_common_name_is_case_insensitive_and_tolerates_missing_tail() {
        assert_eq!(site_common_name("cn=HQ"), Some("HQ"));
        assert_eq!(site_common_name("ou=HQ,cn=Sites"), None);
        assert_eq!(site_common_name("CN=,CN=Sites"), None);
        assert_eq!(site_common_name(""), None);
    }

    #[test]
    fn flags_round_trip_as_raw_bits() {
        let flags = EntityFlags::GLOBAL_CATALOG | EntityFlags::PDC_EMULATOR;
        let json = serde_json::to_string(&flags).expect("serialize");
        assert_eq!(json, "5");
        let back: EntityFlags = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, flags);

        // Unknown bits from the directory are preserved, not dropped.
        let raw: EntityFlags = serde_json::from_str("4096").expect("deserialize");
        assert_eq!(raw.bits(), 4096);
    }

    #[test]
    fn blank_entities_are_unplaced() {
        let e = Entity::blank(EntityKind::Trust);
        assert!(!e.is_placed());
        assert_eq!(e.dcs_in_site, 0);
    }
}
