//! Dataset validation: structured diagnostics over part and hull records.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::data::catalog::normalize_lookup;
use crate::data::hull::{load_hull_records, HullRecord};
use crate::data::part::{load_part_records, PartRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Loads both dataset files and reports every problem found, rather than
/// failing fast the way catalog construction does.
pub fn validate_dataset(parts_path: &str, hulls_path: &str) -> Result<ValidationReport, String> {
    let part_records = load_part_records(parts_path)?;
    let hull_records = load_hull_records(hulls_path)?;
    Ok(validate_records(&part_records, &hull_records))
}

pub fn validate_records(
    part_records: &[PartRecord],
    hull_records: &[HullRecord],
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut parts_by_key: BTreeMap<String, &PartRecord> = BTreeMap::new();
    let mut seen_parts = HashSet::new();
    for (index, record) in part_records.iter().enumerate() {
        let context = format!("parts[{index}] '{}'", record.name);
        if record.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                "missing non-empty 'name'",
            );
        }
        let key = normalize_lookup(&record.name);
        if !key.is_empty() {
            if !seen_parts.insert(key.clone()) {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    format!("duplicate part name '{}'", record.name),
                );
            } else {
                parts_by_key.insert(key, record);
            }
        }
        if record.damage < 0 {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                "negative damage",
            );
        }
        if record.shots < 0 {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                "negative shot count",
            );
        }
        if record.missile && !record.weapon {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                "missile part not flagged as a weapon",
            );
        }
        if record.weapon && record.damage == 0 {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "weapon with zero damage",
            );
        }
        if record.weapon && record.shots == 0 {
            report.push(ValidationSeverity::Warning, context, "weapon with zero shots");
        }
    }

    let mut seen_hulls = HashSet::new();
    for (index, record) in hull_records.iter().enumerate() {
        let context = format!("hulls[{index}] '{}'", record.name);
        if record.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                "missing non-empty 'name'",
            );
        }
        let key = normalize_lookup(&record.name);
        if !key.is_empty() && !seen_hulls.insert(key) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate hull name '{}'", record.name),
            );
        }
        if record.max_count < 1 {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "max_count of 0 means the hull can never be built",
            );
        }
        if record.default_parts.len() != record.slots as usize {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!(
                    "default loadout fills {} of {} slots",
                    record.default_parts.len(),
                    record.slots
                ),
            );
        }

        let mut power = record.bonus_power;
        let mut has_drive = false;
        let mut all_resolved = true;
        for part_name in &record.default_parts {
            let Some(part) = parts_by_key.get(&normalize_lookup(part_name)) else {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    format!("unknown default part '{part_name}'"),
                );
                all_resolved = false;
                continue;
            };
            power += part.power;
            has_drive |= part.drive;
            if !part.available {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    format!("default loadout uses unavailable part '{part_name}'"),
                );
            }
            if part.ancient {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("default loadout uses single-copy ancient part '{part_name}'"),
                );
            }
        }
        if all_resolved {
            if power < 0 {
                report.push(
                    ValidationSeverity::Error,
                    context.clone(),
                    "default loadout draws more power than it supplies",
                );
            }
            if record.needs_drive && !has_drive {
                report.push(
                    ValidationSeverity::Error,
                    context,
                    "hull requires a drive but its default loadout equips none",
                );
            }
        }
    }

    report
}
