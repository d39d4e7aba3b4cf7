use std::collections::HashSet;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::catalog::Catalog;
use crate::error::{ApiError, CatalogError};
use crate::filter::Selection;
use crate::models::UnknownVariant;

/// Parses every record of `collection` into `T`, failing on the first record
/// that does not fit the shape.
pub fn parse_collection<T: DeserializeOwned>(
    root: &Value,
    collection: &'static str,
) -> Result<Vec<T>, CatalogError> {
    let records = root
        .get(collection)
        .and_then(Value::as_array)
        .ok_or(CatalogError::MissingCollection(collection))?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record.clone()).map_err(|source| CatalogError::InvalidRecord {
                collection,
                index,
                source,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    UnknownTrainer { class_id: String, trainer_id: String },
    DuplicateId { collection: &'static str, id: String },
    DuplicateSlug(String),
    NegativeSpots { class_id: String, spots_left: i32 },
}

/// Checks cross-record expectations that do not make a catalog invalid.
pub fn check_integrity(catalog: &Catalog) -> Vec<IntegrityWarning> {
    let mut warnings = Vec::new();

    let trainer_ids: HashSet<&str> = catalog.trainers.iter().map(|t| t.id.as_str()).collect();
    warnings.extend(duplicates("trainers", catalog.trainers.iter().map(|t| t.id.as_str())));
    warnings.extend(duplicates("classes", catalog.classes.iter().map(|c| c.id.as_str())));
    warnings.extend(duplicates("programs", catalog.programs.iter().map(|p| p.id.as_str())));
    warnings.extend(duplicates("pricing", catalog.pricing.iter().map(|p| p.id.as_str())));

    let mut slugs = HashSet::new();
    for class in &catalog.classes {
        if !trainer_ids.contains(class.trainer_id.as_str()) {
            warnings.push(IntegrityWarning::UnknownTrainer {
                class_id: class.id.clone(),
                trainer_id: class.trainer_id.clone(),
            });
        }
        if !slugs.insert(class.slug.as_str()) {
            warnings.push(IntegrityWarning::DuplicateSlug(class.slug.clone()));
        }
        if class.spots_left < 0 {
            warnings.push(IntegrityWarning::NegativeSpots {
                class_id: class.id.clone(),
                spots_left: class.spots_left,
            });
        }
    }

    for warning in &warnings {
        warn!(?warning, "catalog integrity");
    }
    warnings
}

fn duplicates<'a>(
    collection: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Vec<IntegrityWarning> {
    let mut seen = HashSet::new();
    ids.filter(|id| !seen.insert(*id))
        .map(|id| IntegrityWarning::DuplicateId {
            collection,
            id: id.to_string(),
        })
        .collect()
}

/// Reads an optional query value into a selector. Absent or empty means `All`.
pub fn parse_selection<T>(value: Option<&str>) -> Result<Selection<T>, ApiError>
where
    T: FromStr<Err = UnknownVariant>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(Selection::All),
        Some(raw) => Ok(raw.parse()?),
    }
}
