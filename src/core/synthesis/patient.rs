//! Patient synthesizer
//!
//! Emits the demographic anchor of the document. Runs exactly once, before
//! any encounter, so every later resource can reference the patient entry.

use crate::core::bundle::{Bundle, Entry};
use crate::core::datetime::{to_wire_date, to_wire_timestamp};
use crate::domain::ids::IdGenerator;
use crate::domain::patient::{PatientRecord, PostalAddress};
use crate::domain::result::Result;
use crate::fhir::systems;
use crate::fhir::{
    Address, CodeableConcept, Coding, Communication, ContactPoint, Extension, HumanName,
    Identifier, Narrative, Patient, Resource,
};
use chrono::{DateTime, Utc};

/// Synthesizes the Patient resource and appends it as the first entry
///
/// Returns the entry's `fullUrl`, which the scheduler threads through every
/// subsequent synthesizer call.
pub fn synthesize_patient(
    record: &PatientRecord,
    horizon: DateTime<Utc>,
    bundle: &mut Bundle,
    ids: &mut dyn IdGenerator,
) -> Result<String> {
    let demo = &record.demographics;
    let id = ids.next_id();

    let mut name = vec![HumanName {
        name_use: Some("official".to_string()),
        given: vec![demo.first_name.clone()],
        family: Some(demo.last_name.clone()),
        prefix: demo.name_prefix.clone().into_iter().collect(),
        suffix: demo.name_suffix.clone().into_iter().collect(),
    }];
    if let Some(maiden) = &demo.maiden_name {
        name.push(HumanName {
            name_use: Some("maiden".to_string()),
            given: vec![demo.first_name.clone()],
            family: Some(maiden.clone()),
            prefix: Vec::new(),
            suffix: Vec::new(),
        });
    }

    let mut identifier = vec![Identifier::new(systems::SOURCE_RECORD, record.uuid.clone())];
    if let Some(ssn) = &demo.ssn {
        identifier.push(
            Identifier::new(systems::US_SSN, ssn.replace('-', "")).with_kind(
                CodeableConcept::from_coding(Coding::new(systems::IDENTIFIER_TYPE, "SB")),
            ),
        );
    }
    if let Some(license) = &demo.drivers_license {
        identifier.push(
            Identifier::new(systems::US_DRIVERS_LICENSE, license.clone()).with_kind(
                CodeableConcept::from_coding(Coding::new(systems::V2_IDENTIFIER_TYPE, "DL")),
            ),
        );
    }
    if let Some(passport) = &demo.passport {
        identifier.push(
            Identifier::new(systems::US_PASSPORT, passport.clone()).with_kind(
                CodeableConcept::from_coding(Coding::new(systems::V2_IDENTIFIER_TYPE, "PPN")),
            ),
        );
    }

    let telecom = demo
        .phone
        .iter()
        .map(|phone| ContactPoint {
            system: "phone".to_string(),
            value: phone.clone(),
            contact_use: Some("home".to_string()),
        })
        .collect();

    let mut home = wire_address(&demo.address);
    if let Some(point) = demo.coordinates {
        home.extension.push(Extension::nested(
            systems::EXT_GEOLOCATION,
            vec![
                Extension::decimal("latitude", point.latitude),
                Extension::decimal("longitude", point.longitude),
            ],
        ));
    }

    let mut extension = vec![
        Extension::codeable_concept(
            systems::EXT_RACE,
            CodeableConcept::from_coding(
                Coding::new(systems::RACE, demo.race.code.clone())
                    .with_display(demo.race.display.clone()),
            )
            .with_text("race"),
        ),
        Extension::codeable_concept(
            systems::EXT_ETHNICITY,
            CodeableConcept::from_coding(
                Coding::new(systems::ETHNICITY, demo.ethnicity.code.clone())
                    .with_display(demo.ethnicity.display.clone()),
            )
            .with_text("ethnicity"),
        ),
        Extension::code(systems::EXT_BIRTH_SEX, demo.gender.birth_sex_code()),
        Extension::boolean(systems::EXT_INTERPRETER_REQUIRED, false),
    ];
    if let Some(birth_place) = &demo.birth_place {
        extension.push(Extension::address(
            systems::EXT_BIRTH_PLACE,
            wire_address(birth_place),
        ));
    }
    if let Some(maiden) = &demo.mothers_maiden_name {
        extension.push(Extension::string(systems::EXT_MOTHERS_MAIDEN_NAME, maiden.clone()));
    }

    let marital_status = match &demo.marital_status {
        Some(code) => CodeableConcept::from_coding(Coding::new(
            systems::MARITAL_STATUS,
            code.clone(),
        ))
        .with_text(code.clone()),
        None => CodeableConcept::from_coding(Coding::new(systems::MARITAL_STATUS, "S"))
            .with_text("Never Married"),
    };

    // death is only surfaced when it falls inside the export horizon
    let deceased_date_time = record
        .death_time
        .filter(|death| *death <= horizon)
        .map(to_wire_timestamp);

    let resource = Resource::Patient(Patient {
        id: id.as_str().to_string(),
        identifier,
        name,
        telecom,
        gender: demo.gender.as_wire().to_string(),
        birth_date: to_wire_date(record.birth_time),
        address: vec![home],
        communication: demo.language.as_ref().map(|language| Communication {
            language: CodeableConcept::from_coding(
                Coding::new(language.system.clone(), language.code.clone())
                    .with_display(language.display.clone()),
            ),
        }),
        text: Some(Narrative {
            status: "generated".to_string(),
            div: format!(
                "<div>Generated by <a href=\"{}\">Caduceus</a>. Version identifier: {}</div>",
                systems::SOURCE_RECORD,
                env!("CARGO_PKG_VERSION")
            ),
        }),
        extension,
        marital_status: Some(marital_status),
        multiple_birth_integer: demo.multiple_birth,
        multiple_birth_boolean: demo.multiple_birth.is_none().then_some(false),
        deceased_date_time,
    });

    let entry = Entry::new(id, resource);
    let full_url = entry.full_url().to_string();
    bundle.append(entry);
    Ok(full_url)
}

fn wire_address(address: &PostalAddress) -> Address {
    Address {
        line: address.line.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        postal_code: address.postal_code.clone(),
        extension: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SequenceGenerator;
    use crate::domain::patient::{CodedText, Demographics, Gender, GeoPoint};
    use chrono::TimeZone;

    fn record() -> PatientRecord {
        let mut demo = Demographics::new(
            "Ada",
            "Lovelace",
            Gender::Female,
            CodedText::new("2106-3", "White"),
            CodedText::new("2186-5", "Nonhispanic"),
        );
        demo.phone = Some("555-1234".to_string());
        demo.ssn = Some("999-12-3456".to_string());
        demo.coordinates = Some(GeoPoint {
            latitude: 42.3601,
            longitude: -71.0589,
        });
        PatientRecord::new(
            "rec-1",
            demo,
            Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_patient_is_appended_with_reference() {
        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("p");
        let horizon = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let full_url = synthesize_patient(&record(), horizon, &mut bundle, &mut ids).unwrap();
        assert_eq!(full_url, "urn:uuid:p-1");
        assert_eq!(bundle.len(), 1);

        let json = bundle.to_json().unwrap();
        let patient = &json["entry"][0]["resource"];
        assert_eq!(patient["resourceType"], "Patient");
        assert_eq!(patient["gender"], "female");
        assert_eq!(patient["birthDate"], "1990-01-01");
        assert_eq!(patient["multipleBirthBoolean"], false);
        assert_eq!(patient["maritalStatus"]["text"], "Never Married");
        // dashes are stripped from the SSN value
        assert_eq!(patient["identifier"][1]["value"], "999123456");
        assert!(patient.get("deceasedDateTime").is_none());
    }

    #[test]
    fn test_deceased_before_horizon() {
        let mut patient_record = record();
        let death = Utc.with_ymd_and_hms(2010, 5, 5, 8, 0, 0).unwrap();
        patient_record.death_time = Some(death);

        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("p");
        let horizon = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        synthesize_patient(&patient_record, horizon, &mut bundle, &mut ids).unwrap();

        let json = bundle.to_json().unwrap();
        assert_eq!(
            json["entry"][0]["resource"]["deceasedDateTime"],
            "2010-05-05T08:00:00+00:00"
        );
        assert!(json["entry"][0]["resource"].get("multipleBirthInteger").is_none());
    }

    #[test]
    fn test_death_after_horizon_not_surfaced() {
        let mut patient_record = record();
        patient_record.death_time = Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());

        let mut bundle = Bundle::new();
        let mut ids = SequenceGenerator::new("p");
        let horizon = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        synthesize_patient(&patient_record, horizon, &mut bundle, &mut ids).unwrap();

        let json = bundle.to_json().unwrap();
        assert!(json["entry"][0]["resource"].get("deceasedDateTime").is_none());
    }
}
