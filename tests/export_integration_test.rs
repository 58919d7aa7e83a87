//! End-to-end export scenarios
//!
//! Each test drives a full run through the exporter with deterministic
//! identities and asserts over the serialized bundle.

use caduceus::core::export::Exporter;
use caduceus::domain::{
    CodedText, ConditionEvent, ConditionHandler, Demographics, EncounterData, Gender,
    ImmunizationEvent, MedicationEvent, ObservationEvent, PatientRecord, SequenceGenerator,
};
use caduceus::fhir::ResourceKind;
use caduceus::terminology::Terminology;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn terminology() -> Terminology {
    Terminology::new()
        .insert_encounter("wellness", "170258001", "Outpatient Encounter", "outpatient")
        .insert_encounter("emergency", "50849002", "Emergency Encounter", "emergency")
        .insert_condition("bronchitis", "32398004", "Bronchitis")
        .insert_condition("diabetes", "44054006", "Diabetes")
        .insert_condition("peanut_allergy", "91935009", "Allergy to peanuts")
        .insert_observation("systolic_blood_pressure", "8480-6", "Systolic Blood Pressure", "mmHg")
        .insert_observation("diastolic_blood_pressure", "8462-4", "Diastolic Blood Pressure", "mmHg")
        .insert_observation("blood_pressure", "55284-4", "Blood Pressure", "")
        .insert_observation("hdl_cholesterol", "2085-9", "HDL Cholesterol", "mg/dL")
        .insert_observation("ldl_cholesterol", "18262-6", "LDL Cholesterol", "mg/dL")
        .insert_observation("triglycerides", "2571-8", "Triglycerides", "mg/dL")
        .insert_observation("lipid_panel", "57698-3", "Lipid Panel", "")
        .insert_immunization("flu", "140", "Influenza, seasonal")
        .insert_medication("metformin", "860975", "Metformin 500 MG")
}

fn base_record() -> PatientRecord {
    let demographics = Demographics::new(
        "Ada",
        "Lovelace",
        Gender::Female,
        CodedText::new("2106-3", "White"),
        CodedText::new("2186-5", "Nonhispanic"),
    );
    PatientRecord::new(
        "11111111-2222-3333-4444-555555555555",
        demographics,
        Utc.with_ymd_and_hms(1985, 4, 12, 0, 0, 0).unwrap(),
    )
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 6, 1, 9, 0, 0).unwrap()
}

fn horizon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

fn export(record: &PatientRecord) -> caduceus::Bundle {
    let mut exporter =
        Exporter::with_id_generator(terminology(), Box::new(SequenceGenerator::new("res")));
    exporter.export(record, horizon()).unwrap()
}

fn kinds(bundle: &caduceus::Bundle) -> Vec<ResourceKind> {
    bundle.entries().iter().map(|e| e.resource.kind()).collect()
}

#[test]
fn boundary_exclusion_is_strict() {
    // one encounter spanning [t0, t0+30m], conditions at t0+5m and t0+40m,
    // death at t0+60m: only the first condition is exported
    let mut record = base_record();
    record.death_time = Some(t0() + Duration::minutes(60));
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::minutes(30)));
    record
        .conditions
        .push(ConditionEvent::new(t0() + Duration::minutes(5), "bronchitis"));
    record
        .conditions
        .push(ConditionEvent::new(t0() + Duration::minutes(40), "bronchitis"));

    let bundle = export(&record);
    let condition_count = kinds(&bundle)
        .into_iter()
        .filter(|k| *k == ResourceKind::Condition)
        .count();
    assert_eq!(condition_count, 1);

    let json = bundle.to_json().unwrap();
    assert_eq!(
        json["entry"][3]["resource"]["onsetDateTime"],
        "2015-06-01T09:05:00+00:00"
    );
}

#[test]
fn report_references_last_three_without_removing() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    for (kind, value) in [
        ("hdl_cholesterol", 60.0),
        ("ldl_cholesterol", 110.0),
        ("triglycerides", 130.0),
    ] {
        record
            .observations
            .push(ObservationEvent::quantity(t0(), kind, "laboratory", value));
    }
    record
        .observations
        .push(ObservationEvent::report(t0() + Duration::minutes(1), "lipid_panel", 3));

    let bundle = export(&record);
    // Patient, Org, Encounter, 3 observations, report
    assert_eq!(bundle.len(), 7);

    let json = bundle.to_json().unwrap();
    let report = &json["entry"][6]["resource"];
    assert_eq!(report["resourceType"], "DiagnosticReport");
    let results = report["result"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["reference"], json["entry"][3]["fullUrl"]);
    assert_eq!(results[1]["reference"], json["entry"][4]["fullUrl"]);
    assert_eq!(results[2]["reference"], json["entry"][5]["fullUrl"]);
    // the referenced observations are still present
    assert_eq!(json["entry"][3]["resource"]["resourceType"], "Observation");
}

#[test]
fn composite_shrinks_bundle_by_members_minus_one() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    record.observations.push(ObservationEvent::quantity(
        t0(),
        "systolic_blood_pressure",
        "vital-signs",
        120.0,
    ));
    record.observations.push(ObservationEvent::quantity(
        t0(),
        "diastolic_blood_pressure",
        "vital-signs",
        80.0,
    ));
    record.observations.push(ObservationEvent::composite(
        t0() + Duration::minutes(1),
        "blood_pressure",
        "vital-signs",
        2,
    ));

    let bundle = export(&record);
    // Patient, Org, Encounter, panel (two members consumed, one appended)
    assert_eq!(bundle.len(), 4);

    let json = bundle.to_json().unwrap();
    let panel = &json["entry"][3]["resource"];
    let components = panel["component"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["code"]["coding"][0]["code"], "8480-6");
    assert_eq!(components[0]["valueQuantity"]["value"], 120.0);
    assert_eq!(components[1]["code"]["coding"][0]["code"], "8462-4");
    assert_eq!(components[1]["valueQuantity"]["value"], 80.0);
}

#[test]
fn medication_with_unemitted_reason_has_no_references() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    // the diabetes condition is in the dictionary but never emitted
    record
        .medications
        .push(MedicationEvent::new(t0(), "metformin").with_reason("diabetes"));

    let bundle = export(&record);
    let json = bundle.to_json().unwrap();
    let order = &json["entry"][3]["resource"];
    assert_eq!(order["resourceType"], "MedicationRequest");
    assert!(order.get("reasonReference").is_none());
}

#[test]
fn duplicate_condition_codes_resolve_to_the_earliest() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    let t1 = t0() + Duration::days(30);
    record
        .encounters
        .push(EncounterData::new(t1, "wellness").with_end_time(t1 + Duration::hours(1)));
    record.conditions.push(ConditionEvent::new(t0(), "diabetes"));
    record.conditions.push(ConditionEvent::new(t1, "diabetes"));
    record
        .medications
        .push(MedicationEvent::new(t1 + Duration::minutes(5), "metformin").with_reason("diabetes"));

    let bundle = export(&record);
    let json = bundle.to_json().unwrap();

    // first diabetes entry sits under the first encounter
    let first_condition_url = json["entry"][3]["fullUrl"].as_str().unwrap();
    assert_eq!(json["entry"][3]["resource"]["resourceType"], "Condition");

    let order = bundle
        .entries()
        .iter()
        .find(|e| e.resource.kind() == ResourceKind::MedicationRequest)
        .unwrap();
    let order_json = serde_json::to_value(&order.resource).unwrap();
    assert_eq!(order_json["reasonReference"][0]["reference"], first_condition_url);
}

#[test]
fn allergy_override_changes_resource_kind() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    record.conditions.push(
        ConditionEvent::new(t0(), "peanut_allergy").with_handler(ConditionHandler::Allergy),
    );
    record
        .conditions
        .push(ConditionEvent::new(t0() + Duration::minutes(1), "bronchitis"));

    let bundle = export(&record);
    let all = kinds(&bundle);
    assert!(all.contains(&ResourceKind::AllergyIntolerance));
    assert!(all.contains(&ResourceKind::Condition));
}

#[test]
fn every_event_appears_exactly_once_across_encounters() {
    let mut record = base_record();
    let t1 = t0() + Duration::days(10);
    let t2 = t0() + Duration::days(20);
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    record
        .encounters
        .push(EncounterData::new(t1, "emergency").with_end_time(t1 + Duration::hours(4)));
    record
        .encounters
        .push(EncounterData::new(t2, "wellness").with_end_time(t2 + Duration::hours(1)));

    // spread events across all three windows
    for offset in [0i64, 10, 20] {
        record.conditions.push(ConditionEvent::new(
            t0() + Duration::days(offset) + Duration::minutes(5),
            "bronchitis",
        ));
        record.immunizations.push(ImmunizationEvent::new(
            t0() + Duration::days(offset) + Duration::minutes(10),
            "flu",
        ));
    }

    let bundle = export(&record);
    let all = kinds(&bundle);
    let count = |k: ResourceKind| all.iter().filter(|x| **x == k).count();
    assert_eq!(count(ResourceKind::Condition), 3);
    assert_eq!(count(ResourceKind::Immunization), 3);
    assert_eq!(count(ResourceKind::Encounter), 3);
    // one fresh provider per encounter, never pooled
    assert_eq!(count(ResourceKind::Organization), 3);

    // conditions appear in non-decreasing time order
    let onsets: Vec<String> = bundle
        .entries()
        .iter()
        .filter_map(|e| {
            let v = serde_json::to_value(&e.resource).unwrap();
            (v["resourceType"] == "Condition")
                .then(|| v["onsetDateTime"].as_str().unwrap().to_string())
        })
        .collect();
    let mut sorted = onsets.clone();
    sorted.sort();
    assert_eq!(onsets, sorted);
}

#[test]
fn cross_references_point_backwards() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    record.conditions.push(ConditionEvent::new(t0(), "diabetes"));
    record
        .medications
        .push(MedicationEvent::new(t0() + Duration::minutes(5), "metformin").with_reason("diabetes"));

    let bundle = export(&record);
    let urls: Vec<&str> = bundle.entries().iter().map(|e| e.full_url()).collect();

    for (position, entry) in bundle.entries().iter().enumerate() {
        let value = serde_json::to_value(&entry.resource).unwrap();
        let mut referenced = Vec::new();
        collect_references(&value, &mut referenced);
        for target in referenced {
            let target_position = urls.iter().position(|u| *u == target).unwrap();
            assert!(
                target_position < position,
                "{} references {} which was appended later",
                entry.full_url(),
                target
            );
        }
    }
}

fn collect_references(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(reference)) = map.get("reference") {
                out.push(reference.clone());
            }
            for nested in map.values() {
                collect_references(nested, out);
            }
        }
        serde_json::Value::Array(items) => {
            for nested in items {
                collect_references(nested, out);
            }
        }
        _ => {}
    }
}

#[test]
fn wire_timestamps_match_interchange_grammar() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    record.conditions.push(ConditionEvent::new(t0(), "bronchitis"));

    let bundle = export(&record);
    let json = bundle.to_json().unwrap();

    let timestamp = json["entry"][3]["resource"]["onsetDateTime"].as_str().unwrap();
    // fixed-width date-time with a colon-separated offset
    assert_eq!(timestamp.len(), "2015-06-01T09:00:00+00:00".len());
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());

    let date = json["entry"][0]["resource"]["birthDate"].as_str().unwrap();
    assert_eq!(date, "1985-04-12");
}

#[test]
fn exports_are_deterministic_given_the_same_identity_sequence() {
    let mut record = base_record();
    record
        .encounters
        .push(EncounterData::new(t0(), "wellness").with_end_time(t0() + Duration::hours(1)));
    record.conditions.push(ConditionEvent::new(t0(), "diabetes"));
    record
        .medications
        .push(MedicationEvent::new(t0() + Duration::minutes(5), "metformin").with_reason("diabetes"));

    let first = export(&record).to_json_string().unwrap();
    let second = export(&record).to_json_string().unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_record_yields_patient_only_bundle() {
    let bundle = export(&base_record());
    assert_eq!(bundle.len(), 1);

    let json = bundle.to_json().unwrap();
    assert_eq!(json["resourceType"], "Bundle");
    assert_eq!(json["type"], "collection");
    assert_eq!(json["entry"][0]["resource"]["resourceType"], "Patient");
    assert_eq!(json["entry"][0]["fullUrl"], "urn:uuid:res-1");
}
