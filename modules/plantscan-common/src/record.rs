use serde::{Deserialize, Serialize};

/// Placeholder for any field whose label never appeared in the response.
pub const NOT_FOUND: &str = "information not found";

/// No label sets difficulty, so every record carries this value.
pub const DEFAULT_DIFFICULTY: &str = "beginner";

/// Structured description of a plant, built from the service's prose.
///
/// Scalar fields always hold either extracted text (possibly empty) or a
/// default; lists are always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub name: String,
    pub scientific_name: String,
    pub difficulty: String,
    pub water_frequency: String,
    pub temperature: String,
    pub humidity: String,
    pub features: Vec<String>,
    pub precautions: Vec<String>,
}

impl Default for PlantRecord {
    fn default() -> Self {
        Self {
            name: NOT_FOUND.to_string(),
            scientific_name: NOT_FOUND.to_string(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            water_frequency: NOT_FOUND.to_string(),
            temperature: NOT_FOUND.to_string(),
            humidity: NOT_FOUND.to_string(),
            features: Vec::new(),
            precautions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fills_every_scalar() {
        let record = PlantRecord::default();
        assert_eq!(record.name, NOT_FOUND);
        assert_eq!(record.scientific_name, NOT_FOUND);
        assert_eq!(record.difficulty, "beginner");
        assert_eq!(record.water_frequency, NOT_FOUND);
        assert_eq!(record.temperature, NOT_FOUND);
        assert_eq!(record.humidity, NOT_FOUND);
        assert!(record.features.is_empty());
        assert!(record.precautions.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(PlantRecord::default()).unwrap();
        assert_eq!(json["scientificName"], NOT_FOUND);
        assert_eq!(json["waterFrequency"], NOT_FOUND);
        assert_eq!(json["features"], serde_json::json!([]));
    }
}
