//! Clinic records as stored in the table store.

pub mod dates;
pub mod forms;
pub mod lenient;
pub mod patient;
pub mod records;
pub mod status;

pub use patient::Patient;
pub use records::{
    Appointment, DiseaseHistory, LabResult, Medication, Message, Prescription, SoapNote, Vitals,
};
pub use status::{
    AdherenceLevel, AppointmentStatus, DiseaseStatus, LabStatus, MedicationStatus, MessageStatus,
    Severity,
};

use crate::store::Resource;

/// A row of one table store resource.
pub trait Record: Send + Sync {
    const RESOURCE: Resource;

    fn id(&self) -> &str;

    /// Owning patient; `None` for the patient rows themselves.
    fn patient_id(&self) -> Option<&str>;
}

impl Record for Patient {
    const RESOURCE: Resource = Resource::Patients;

    fn id(&self) -> &str {
        &self.id
    }

    fn patient_id(&self) -> Option<&str> {
        None
    }
}

macro_rules! child_record {
    ($($ty:ty => $resource:ident),+ $(,)?) => {
        $(
            impl Record for $ty {
                const RESOURCE: Resource = Resource::$resource;

                fn id(&self) -> &str {
                    &self.id
                }

                fn patient_id(&self) -> Option<&str> {
                    Some(&self.patient_id)
                }
            }
        )+
    };
}

child_record!(
    DiseaseHistory => DiseaseHistory,
    Appointment => Appointments,
    Vitals => Vitals,
    Medication => Medications,
    LabResult => LabResults,
    SoapNote => SoapNotes,
    Message => Messages,
    Prescription => Prescriptions,
);

/// Rows of `records` owned by `patient_id`.
pub fn owned_by<'a, R: Record>(records: &'a [R], patient_id: &'a str) -> impl Iterator<Item = &'a R> {
    records
        .iter()
        .filter(move |r| r.patient_id() == Some(patient_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_decode_from_form_written_json() {
        let vitals: Vitals = serde_json::from_value(json!({
            "id": "v1",
            "patient_id": "p1",
            "recorded_date": "2026-10-01T08:00:00",
            "heart_rate": "88",
            "blood_pressure_systolic": 120,
            "temperature": "",
            "recorded_by": null
        }))
        .unwrap();
        assert_eq!(vitals.heart_rate, Some(88.0));
        assert_eq!(vitals.blood_pressure_systolic, Some(120.0));
        assert_eq!(vitals.temperature, None);
        assert_eq!(vitals.recorded_by, None);
        assert!(vitals.recorded_date.is_some());
    }

    #[test]
    fn child_records_are_filtered_by_owner() {
        let rows = vec![
            DiseaseHistory {
                id: "d1".into(),
                patient_id: "p1".into(),
                ..Default::default()
            },
            DiseaseHistory {
                id: "d2".into(),
                patient_id: "p2".into(),
                ..Default::default()
            },
        ];
        let ids: Vec<_> = owned_by(&rows, "p1").map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["d1"]);
    }

    #[test]
    fn patients_decode_with_missing_columns() {
        let patient: Patient = serde_json::from_value(json!({
            "id": "p1",
            "first_name": "Grace",
            "last_name": "Hopper",
            "date_of_birth": "1906-12-09T00:00:00.000"
        }))
        .unwrap();
        assert_eq!(patient.full_name(), "Grace Hopper");
        assert!(patient.date_of_birth.is_some());
        assert_eq!(patient.email, None);
    }
}
