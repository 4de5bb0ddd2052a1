//! Two-pass topology layout.
//!
//! Sites are packed left-to-right along a single baseline in discovery
//! order; each site is sized to hold its widest DC label at the largest font
//! tier plus a fixed icon allowance, and its DCs are stacked top-to-bottom
//! inside it. Runs exactly once, after discovery completes; window resizes
//! and zoom changes only move the camera, never the world-space layout.

use crate::error::{Error, Result};
use crate::text::{FontSize, TextMeasurer, TextMetrics};
use forestmap_core::{EntityId, EntityKind, EntityStore};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// World-space edge length of a DC triangle icon.
pub const DC_SIZE: i32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// DC icon edge length; also the base unit for insets and padding.
    pub dc_size: i32,
    /// Placement cursor start. The first site lands at
    /// `origin_x + site_gap`.
    pub origin_x: i32,
    pub origin_y: i32,
    /// Horizontal gap between adjacent site boxes.
    pub site_gap: i32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            dc_size: DC_SIZE,
            origin_x: -64,
            origin_y: 64,
            site_gap: 256,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub sites: usize,
    pub domain_controllers: usize,
    /// DCs whose `site_ref` matched no site; skipped, never placed.
    pub orphaned_dcs: usize,
}

fn checked_measure(
    measurer: &dyn TextMeasurer,
    text: &str,
    font: FontSize,
) -> Result<TextMetrics> {
    let metrics = measurer.measure(text, font);
    if !metrics.width.is_finite() || metrics.width < 0.0 || !metrics.height.is_finite() {
        return Err(Error::TextMetrics {
            text: text.to_string(),
        });
    }
    Ok(metrics)
}

/// Assigns world-space position and size to every site and DC in the store.
///
/// Pure function of the entity sequence and the measurer: a fixed discovery
/// order with fixed names lays out identically on every run.
pub fn layout_topology(
    store: &mut EntityStore,
    measurer: &dyn TextMeasurer,
    params: &LayoutParams,
) -> Result<LayoutSummary> {
    // Correlate DCs to their sites up front so both passes stay O(n).
    let mut site_index: FxHashMap<String, usize> = FxHashMap::default();
    let mut sites: Vec<EntityId> = Vec::new();
    for (id, entity) in store.iter() {
        if entity.kind == EntityKind::Site {
            site_index.insert(entity.distinguished_name.to_ascii_lowercase(), sites.len());
            sites.push(id);
        }
    }

    let mut members: Vec<Vec<EntityId>> = vec![Vec::new(); sites.len()];
    let mut summary = LayoutSummary {
        sites: sites.len(),
        ..LayoutSummary::default()
    };
    for (id, entity) in store.iter() {
        if entity.kind != EntityKind::DomainController {
            continue;
        }
        match site_index.get(&entity.site_ref.to_ascii_lowercase()) {
            Some(&site) => {
                members[site].push(id);
                summary.domain_controllers += 1;
            }
            None => {
                warn!(
                    dc = %entity.fully_qualified_name,
                    site_ref = %entity.site_ref,
                    "domain controller references an unknown site; skipping"
                );
                summary.orphaned_dcs += 1;
            }
        }
    }

    let dc_size = params.dc_size;
    let dc_pitch = dc_size + dc_size / 2;
    let mut cursor_x = params.origin_x;
    let mut previous_width = 0;

    for (site_pos, &site_id) in sites.iter().enumerate() {
        // Sizing: the widest DC label at the largest tier decides the width.
        let mut max_label_width = 0_i32;
        for &dc_id in &members[site_pos] {
            let dc = store.get(dc_id).expect("dc id from this store");
            let metrics = checked_measure(measurer, &dc.fully_qualified_name, FontSize::Huge)?;
            max_label_width = max_label_width.max(metrics.width.ceil() as i32);
        }

        let dc_count = members[site_pos].len();
        let width = max_label_width + dc_size + dc_size / 2;
        let height = if dc_count > 0 {
            dc_count as i32 * dc_pitch
        } else {
            // An empty site still gets a visible box.
            dc_size
        };

        let x = cursor_x + previous_width + params.site_gap;
        let y = params.origin_y;
        {
            let site = store.get_mut(site_id).expect("site id from this store");
            site.x = x;
            site.y = y;
            site.width = width;
            site.height = height;
            site.dcs_in_site = dc_count as u32;
            debug!(site = %site.display_name, dc_count, width, height, "placed site");
        }

        // Placement: DCs stack top-to-bottom in discovery order, inset from
        // the site origin.
        for (dc_pos, &dc_id) in members[site_pos].iter().enumerate() {
            let dc = store.get_mut(dc_id).expect("dc id from this store");
            dc.x = x + dc_size / 4;
            dc.y = y + dc_size / 4 + dc_pos as i32 * dc_pitch;
            dc.width = dc_size;
            dc.height = dc_size;
        }

        cursor_x = x;
        previous_width = width;
    }

    info!(
        sites = summary.sites,
        domain_controllers = summary.domain_controllers,
        orphaned_dcs = summary.orphaned_dcs,
        "topology layout complete"
    );
    Ok(summary)
}
