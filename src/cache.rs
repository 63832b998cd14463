//! In-memory mirror of every table.
//!
//! The cache is replaced table-by-table from the store; it never patches
//! rows in place. Mutations go to the store, then the cache is reloaded.

use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::models::{
    owned_by, Appointment, DiseaseHistory, LabResult, Medication, Message, Patient, Prescription,
    Record, SoapNote, Vitals,
};
use crate::store::{fetch_all, Resource, TableStore};

pub const UNKNOWN_PATIENT: &str = "Unknown Patient";

#[derive(Debug, Clone, Default)]
pub struct DataCache {
    pub patients: Vec<Patient>,
    pub disease_history: Vec<DiseaseHistory>,
    pub appointments: Vec<Appointment>,
    pub vitals: Vec<Vitals>,
    pub medications: Vec<Medication>,
    pub lab_results: Vec<LabResult>,
    pub soap_notes: Vec<SoapNote>,
    pub messages: Vec<Message>,
    pub prescriptions: Vec<Prescription>,
}

/// Tables that could not be loaded during a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub failed: Vec<Resource>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

async fn load<R>(store: &dyn TableStore) -> (Vec<R>, Option<Resource>)
where
    R: Record + DeserializeOwned,
{
    match fetch_all::<R>(store).await {
        Ok(rows) => (rows, None),
        Err(e) => {
            warn!(resource = %R::RESOURCE, error = %e, "table load failed, showing it empty");
            (Vec::new(), Some(R::RESOURCE))
        }
    }
}

impl DataCache {
    /// Fetch every table concurrently. A table that fails to load is cached
    /// empty and listed in the report; the others are still replaced.
    #[instrument(skip_all)]
    pub async fn load_all(store: &dyn TableStore) -> (Self, RefreshReport) {
        let (
            (patients, e1),
            (disease_history, e2),
            (appointments, e3),
            (vitals, e4),
            (medications, e5),
            (lab_results, e6),
            (soap_notes, e7),
            (messages, e8),
            (prescriptions, e9),
        ) = futures::join!(
            load::<Patient>(store),
            load::<DiseaseHistory>(store),
            load::<Appointment>(store),
            load::<Vitals>(store),
            load::<Medication>(store),
            load::<LabResult>(store),
            load::<SoapNote>(store),
            load::<Message>(store),
            load::<Prescription>(store),
        );

        let failed: Vec<Resource> = [e1, e2, e3, e4, e5, e6, e7, e8, e9]
            .into_iter()
            .flatten()
            .collect();
        let cache = Self {
            patients,
            disease_history,
            appointments,
            vitals,
            medications,
            lab_results,
            soap_notes,
            messages,
            prescriptions,
        };
        info!(
            patients = cache.patients.len(),
            appointments = cache.appointments.len(),
            failed = failed.len(),
            "cache refreshed"
        );
        (cache, RefreshReport { failed })
    }

    /// Reload one table. On failure the cached rows are left untouched.
    #[instrument(skip(self, store))]
    pub async fn refresh(&mut self, store: &dyn TableStore, resource: Resource) -> Result<()> {
        match resource {
            Resource::Patients => self.patients = fetch_all(store).await?,
            Resource::DiseaseHistory => self.disease_history = fetch_all(store).await?,
            Resource::Appointments => self.appointments = fetch_all(store).await?,
            Resource::Vitals => self.vitals = fetch_all(store).await?,
            Resource::Medications => self.medications = fetch_all(store).await?,
            Resource::LabResults => self.lab_results = fetch_all(store).await?,
            Resource::SoapNotes => self.soap_notes = fetch_all(store).await?,
            Resource::Messages => self.messages = fetch_all(store).await?,
            Resource::Prescriptions => self.prescriptions = fetch_all(store).await?,
        }
        Ok(())
    }

    pub fn len(&self, resource: Resource) -> usize {
        match resource {
            Resource::Patients => self.patients.len(),
            Resource::DiseaseHistory => self.disease_history.len(),
            Resource::Appointments => self.appointments.len(),
            Resource::Vitals => self.vitals.len(),
            Resource::Medications => self.medications.len(),
            Resource::LabResults => self.lab_results.len(),
            Resource::SoapNotes => self.soap_notes.len(),
            Resource::Messages => self.messages.len(),
            Resource::Prescriptions => self.prescriptions.len(),
        }
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn patient_name(&self, id: &str) -> String {
        self.patient(id)
            .map(Patient::full_name)
            .unwrap_or_else(|| UNKNOWN_PATIENT.to_string())
    }

    pub fn disease(&self, id: &str) -> Option<&DiseaseHistory> {
        self.disease_history.iter().find(|d| d.id == id)
    }

    pub fn disease_history_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a DiseaseHistory> {
        owned_by(&self.disease_history, patient_id).collect()
    }

    pub fn appointments_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a Appointment> {
        owned_by(&self.appointments, patient_id).collect()
    }

    pub fn vitals_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a Vitals> {
        owned_by(&self.vitals, patient_id).collect()
    }

    pub fn medications_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a Medication> {
        owned_by(&self.medications, patient_id).collect()
    }

    pub fn lab_results_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a LabResult> {
        owned_by(&self.lab_results, patient_id).collect()
    }

    pub fn soap_notes_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a SoapNote> {
        owned_by(&self.soap_notes, patient_id).collect()
    }

    pub fn messages_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a Message> {
        owned_by(&self.messages, patient_id).collect()
    }

    pub fn prescriptions_for<'a>(&'a self, patient_id: &'a str) -> Vec<&'a Prescription> {
        owned_by(&self.prescriptions, patient_id).collect()
    }
}
