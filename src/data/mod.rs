pub mod catalog;
pub mod hull;
pub mod part;
pub mod validate;

pub use catalog::{normalize_lookup, Catalog};
pub use hull::{load_hull_records, HullRecord, HullsFile, DEFAULT_HULLS_PATH};
pub use part::{load_part_records, PartRecord, PartsFile, DEFAULT_PARTS_PATH};
pub use validate::{
    validate_dataset, validate_records, ValidationDiagnostic, ValidationReport, ValidationSeverity,
};
