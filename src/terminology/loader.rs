//! Terminology loader with TOML parsing
//!
//! Code dictionaries ship as data files so deployments can revise coded
//! descriptions without rebuilding. The loader reads the TOML file, parses
//! it into a [`Terminology`], and validates the entries before any run
//! starts; the resulting set is read-only from then on.

use super::tables::Terminology;
use crate::domain::errors::CaduceusError;
use crate::domain::result::Result;
use std::fs;
use std::path::Path;

/// Loads a terminology set from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Parses the TOML into a [`Terminology`]
/// 3. Validates that no entry carries an empty code or display
///
/// Missing tables deserialize as empty, which is valid: a record that never
/// touches a family never consults its table.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the TOML fails to parse, or
/// an entry is blank.
///
/// # Examples
///
/// ```no_run
/// use caduceus::terminology::loader::load_terminology;
///
/// let terminology = load_terminology("terminology.toml").expect("failed to load terminology");
/// ```
pub fn load_terminology(path: impl AsRef<Path>) -> Result<Terminology> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CaduceusError::Configuration(format!(
            "Terminology file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CaduceusError::Configuration(format!(
            "Failed to read terminology file {}: {}",
            path.display(),
            e
        ))
    })?;

    let terminology: Terminology = toml::from_str(&contents)?;
    validate(&terminology)?;

    tracing::debug!(
        path = %path.display(),
        conditions = terminology.conditions.len(),
        observations = terminology.observations.len(),
        encounters = terminology.encounters.len(),
        "Loaded terminology tables"
    );

    Ok(terminology)
}

/// Rejects blank codes and displays anywhere in the set
fn validate(terminology: &Terminology) -> Result<()> {
    let mut blanks: Vec<String> = Vec::new();

    let mut check = |table: &str, key: &str, code: &str, display: &str| {
        if code.trim().is_empty() || display.trim().is_empty() {
            blanks.push(format!("{table}.{key}"));
        }
    };

    for (key, e) in &terminology.conditions {
        check("conditions", key, &e.code, &e.display);
    }
    for (key, e) in &terminology.observations {
        check("observations", key, &e.code, &e.display);
    }
    for (key, e) in &terminology.encounters {
        check("encounters", key, &e.code, &e.display);
    }
    for (key, e) in &terminology.procedures {
        check("procedures", key, &e.code, &e.display);
    }
    for (key, e) in &terminology.immunizations {
        check("immunizations", key, &e.code, &e.display);
    }
    for (key, e) in &terminology.careplans {
        check("careplans", key, &e.code, &e.display);
    }
    for (key, e) in &terminology.medications {
        check("medications", key, &e.code, &e.display);
    }
    for (key, e) in &terminology.instructions {
        check("instructions", key, &e.code, &e.display);
    }

    if blanks.is_empty() {
        Ok(())
    } else {
        blanks.sort();
        Err(CaduceusError::Configuration(format!(
            "Terminology entries with blank code or display: {}",
            blanks.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_toml(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_file() {
        let file = write_toml(
            r#"
            [conditions.bronchitis]
            code = "32398004"
            display = "Bronchitis"

            [observations.height]
            code = "8302-2"
            display = "Body Height"
            unit = "cm"

            [observations.cause_of_death]
            code = "69453-9"
            display = "Cause of Death [US Standard Certificate of Death]"
            value_type = "condition"

            [encounters.wellness]
            code = "170258001"
            display = "Outpatient Encounter"
            class = "outpatient"
            "#,
        );

        let terminology = load_terminology(file.path()).unwrap();
        assert_eq!(terminology.condition("bronchitis").unwrap().code, "32398004");
        assert_eq!(terminology.observation("height").unwrap().unit, "cm");
        assert_eq!(terminology.encounter("wellness").unwrap().class, "outpatient");
        assert!(terminology.medications.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_terminology("/nonexistent/terminology.toml").unwrap_err();
        assert!(matches!(err, CaduceusError::Configuration(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = write_toml("conditions = not toml");
        let err = load_terminology(file.path()).unwrap_err();
        assert!(matches!(err, CaduceusError::Configuration(_)));
    }

    #[test]
    fn test_load_rejects_blank_display() {
        let file = write_toml(
            r#"
            [conditions.bronchitis]
            code = "32398004"
            display = ""
            "#,
        );
        let err = load_terminology(file.path()).unwrap_err();
        assert!(err.to_string().contains("conditions.bronchitis"));
    }
}
