//! Fleet assembly: spec parsing, loadout legality, and ship construction
//! from catalog templates.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::combat::fleet::{IdAllocator, Player};
use crate::combat::ship::{Hull, Part, Ship};
use crate::data::catalog::{normalize_lookup, Catalog};
use crate::data::validate::{ValidationReport, ValidationSeverity};

/// Parses `"cruiser:2,interceptor:3"` into (hull name, count) pairs. A bare
/// name means one ship.
pub fn parse_fleet_spec(spec: &str) -> Result<Vec<(String, u32)>, String> {
    let mut entries = Vec::new();
    for raw_entry in spec.split(',') {
        let entry = raw_entry.trim();
        if entry.is_empty() {
            return Err(format!("empty entry in fleet spec '{spec}'"));
        }
        let (name, count) = match entry.split_once(':') {
            Some((name, count_text)) => {
                let count: u32 = count_text.trim().parse().map_err(|_| {
                    format!("invalid ship count '{}' in fleet spec entry '{entry}'", count_text.trim())
                })?;
                (name.trim(), count)
            }
            None => (entry, 1),
        };
        if name.is_empty() {
            return Err(format!("missing hull name in fleet spec entry '{entry}'"));
        }
        if count == 0 {
            return Err(format!("ship count must be at least 1 in fleet spec entry '{entry}'"));
        }
        entries.push((name.to_string(), count));
    }
    if entries.is_empty() {
        return Err("fleet spec names no hulls".to_string());
    }
    Ok(entries)
}

/// Checks one loadout against a hull's rules. Pure; the cross-ship
/// single-copy rule for ancient parts lives on [`FleetBuilder`], which owns
/// the claim state.
pub fn validate_loadout(hull: &Arc<Hull>, parts: &[Arc<Part>]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let context = format!("hull '{}'", hull.name);

    if parts.len() != hull.nslots as usize {
        report.push(
            ValidationSeverity::Error,
            context.clone(),
            format!("loadout fills {} of {} slots", parts.len(), hull.nslots),
        );
        return report;
    }

    for part in parts {
        if !part.is_available {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("part '{}' is not available", part.name),
            );
        }
    }

    let mut seen_ancients = HashSet::new();
    for part in parts {
        if part.is_ancient && !seen_ancients.insert(normalize_lookup(&part.name)) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("ancient part '{}' equipped more than once", part.name),
            );
        }
    }

    let empty_limit = hull
        .default_parts
        .iter()
        .filter(|part| part.is_empty_slot())
        .count();
    let empty_count = parts.iter().filter(|part| part.is_empty_slot()).count();
    if empty_count > empty_limit {
        report.push(
            ValidationSeverity::Error,
            context.clone(),
            format!("loadout leaves {empty_count} slots empty; at most {empty_limit} may be empty"),
        );
    }

    let probe = Ship::new(0, Arc::clone(hull), parts.to_vec(), false);
    if probe.stats.net_power < 0 {
        report.push(
            ValidationSeverity::Error,
            context.clone(),
            format!(
                "loadout draws more power than it supplies (net {})",
                probe.stats.net_power
            ),
        );
    }
    if hull.needs_drive && !probe.stats.has_drive {
        report.push(
            ValidationSeverity::Error,
            context,
            "hull requires a drive but the loadout equips none",
        );
    }

    report
}

/// Builds validated players from catalog templates. Owns the id factory and
/// the claimed-ancient-part pool; hull count limits apply per player, the
/// ancient pool spans the whole builder session.
pub struct FleetBuilder<'a> {
    catalog: &'a Catalog,
    ids: IdAllocator,
    ancient_claimed: HashSet<String>,
}

impl<'a> FleetBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            ids: IdAllocator::new(),
            ancient_claimed: HashSet::new(),
        }
    }

    /// Builds a player whose ships all carry their hulls' default loadouts.
    /// A failed build leaves earlier ancient claims in place; builders are
    /// cheap, start a fresh one to retry.
    pub fn build_player(
        &mut self,
        name: &str,
        defending: bool,
        spec: &[(String, u32)],
    ) -> Result<Player, String> {
        if spec.is_empty() {
            return Err("fleet spec names no hulls".to_string());
        }
        let mut ships = Vec::new();
        let mut built_counts: BTreeMap<String, u32> = BTreeMap::new();
        for (hull_name, count) in spec {
            let hull = self.resolve_hull(hull_name)?;
            let built = built_counts.entry(normalize_lookup(&hull.name)).or_insert(0);
            for _ in 0..*count {
                *built += 1;
                if *built > hull.nmax {
                    return Err(format!(
                        "hull '{}' allows at most {} ships per player",
                        hull.name, hull.nmax
                    ));
                }
                ships.push(self.build_ship(hull_name, defending, None)?);
            }
        }
        Ok(Player::new(self.ids.next_player_id(), name, ships, defending))
    }

    /// Builds one ship, with the hull's default loadout or a custom part
    /// list. Ancient parts are claimed from the shared pool only after the
    /// whole loadout passes validation.
    pub fn build_ship(
        &mut self,
        hull_name: &str,
        defending: bool,
        custom_parts: Option<&[String]>,
    ) -> Result<Ship, String> {
        let hull = self.resolve_hull(hull_name)?;
        let parts = match custom_parts {
            Some(names) => {
                let mut parts = Vec::with_capacity(names.len());
                for part_name in names {
                    let part = self.catalog.resolve_part(part_name).ok_or_else(|| {
                        format!("unknown part '{part_name}' for hull '{}'", hull.name)
                    })?;
                    parts.push(part);
                }
                parts
            }
            None => hull.default_parts.clone(),
        };

        let report = validate_loadout(&hull, &parts);
        if report.has_errors() {
            return Err(format!(
                "illegal loadout for hull '{}': {}",
                hull.name,
                summarize_errors(&report)
            ));
        }

        for part in &parts {
            if part.is_ancient && self.ancient_claimed.contains(&normalize_lookup(&part.name)) {
                return Err(format!(
                    "ancient part '{}' already claimed by an earlier ship",
                    part.name
                ));
            }
        }
        for part in &parts {
            if part.is_ancient {
                self.ancient_claimed.insert(normalize_lookup(&part.name));
            }
        }

        Ok(Ship::new(self.ids.next_ship_id(), hull, parts, defending))
    }

    fn resolve_hull(&self, hull_name: &str) -> Result<Arc<Hull>, String> {
        self.catalog
            .resolve_hull(hull_name)
            .ok_or_else(|| format!("unknown hull '{hull_name}'"))
    }
}

fn summarize_errors(report: &ValidationReport) -> String {
    report
        .diagnostics
        .iter()
        .filter(|diag| diag.severity == ValidationSeverity::Error)
        .map(|diag| diag.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
