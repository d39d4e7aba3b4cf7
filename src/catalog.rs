use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::CatalogError;
use crate::models::{ClassSession, PricingTier, Program, Trainer};
use crate::validation::{check_integrity, parse_collection};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Validated static site content. Built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub programs: Vec<Program>,
    pub trainers: Vec<Trainer>,
    pub pricing: Vec<PricingTier>,
    pub classes: Vec<ClassSession>,
}

impl Catalog {
    pub fn builtin(base_path: &str) -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG, base_path)
    }

    pub fn from_path(path: impl AsRef<Path>, base_path: &str) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw, base_path)
    }

    /// Validates every collection and prefixes relative program links with
    /// `base_path`, which must already end with `/`.
    pub fn from_json(raw: &str, base_path: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_json::from_str(raw)?;

        let mut programs: Vec<Program> = parse_collection(&root, "programs")?;
        for program in &mut programs {
            if !program.href.starts_with('/') && !program.href.contains("://") {
                program.href = format!("{base_path}{}", program.href);
            }
        }

        let catalog = Catalog {
            programs,
            trainers: parse_collection(&root, "trainers")?,
            pricing: parse_collection(&root, "pricing")?,
            classes: parse_collection(&root, "classes")?,
        };
        check_integrity(&catalog);

        info!(
            programs = catalog.programs.len(),
            trainers = catalog.trainers.len(),
            pricing = catalog.pricing.len(),
            classes = catalog.classes.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, SessionType};
    use crate::validation::IntegrityWarning;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin("/demo-gym-pulse-force/").unwrap();
        assert_eq!(catalog.trainers.len(), 3);
        assert_eq!(catalog.programs.len(), 3);
        assert_eq!(catalog.pricing.len(), 3);
        assert!(!catalog.classes.is_empty());
        assert!(check_integrity(&catalog).is_empty());
    }

    #[test]
    fn test_builtin_program_links_use_base() {
        let catalog = Catalog::builtin("/demo-gym-pulse-force/").unwrap();
        assert_eq!(catalog.programs[0].href, "/demo-gym-pulse-force/programs/strength");
    }

    #[test]
    fn test_builtin_pricing_defaults_applied() {
        let catalog = Catalog::builtin("/").unwrap();
        let standard = catalog.pricing.iter().find(|p| p.id == "standard").unwrap();
        assert!(standard.is_popular);
        assert_eq!(standard.cta, "Choose Plan");
        let trial = catalog.pricing.iter().find(|p| p.id == "trial").unwrap();
        assert!(!trial.is_popular);
        assert_eq!(trial.cta, "Forge Your Path");
    }

    #[test]
    fn test_builtin_keeps_source_order() {
        let catalog = Catalog::builtin("/").unwrap();
        assert_eq!(catalog.classes[0].day, Day::Monday);
        assert_eq!(catalog.classes[1].session_type, SessionType::Hiit);
    }

    #[test]
    fn test_invalid_record_is_fatal() {
        let raw = r#"{
            "programs": [], "trainers": [], "pricing": [],
            "classes": [{ "id": "x", "name": "X", "trainerId": "t", "day": "Monday",
                          "time": "06:00", "duration": 30, "type": "Pilates",
                          "intensity": "Low", "spotsLeft": 1, "slug": "x" }]
        }"#;
        let err = Catalog::from_json(raw, "/").unwrap_err();
        assert!(err.to_string().contains("'classes' at index 0"));
    }

    #[test]
    fn test_dangling_trainer_is_not_fatal() {
        let raw = r#"{
            "programs": [], "trainers": [], "pricing": [],
            "classes": [{ "id": "x", "name": "X", "trainerId": "ghost-id", "day": "Monday",
                          "time": "06:00", "duration": 30, "type": "Yoga",
                          "intensity": "Low", "spotsLeft": -1, "slug": "x" }]
        }"#;
        let catalog = Catalog::from_json(raw, "/").unwrap();
        let warnings = check_integrity(&catalog);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], IntegrityWarning::UnknownTrainer { .. }));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Catalog::from_path("/nonexistent/catalog.json", "/").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
