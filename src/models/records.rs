//! Child records of a patient, one struct per table.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::lenient;
use super::status::{
    AdherenceLevel, AppointmentStatus, DiseaseStatus, LabStatus, MedicationStatus, MessageStatus,
    Severity,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiseaseHistory {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub disease_name: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub diagnosis_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub status: Option<DiseaseStatus>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub symptoms: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub treatment: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub medication: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doctor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
}

impl DiseaseHistory {
    pub fn is_active_case(&self) -> bool {
        self.status.as_ref().is_some_and(DiseaseStatus::is_active_case)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub appointment_date: Option<NaiveDateTime>,
    /// Minutes.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub appointment_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doctor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub chief_complaint: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub reminder_sent: bool,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_by: Option<String>,
}

impl Appointment {
    pub fn has_status(&self, status: &AppointmentStatus) -> bool {
        self.status.as_ref() == Some(status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub recorded_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub blood_pressure_systolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub blood_pressure_diastolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub heart_rate: Option<f64>,
    /// Degrees Fahrenheit.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub temperature: Option<f64>,
    /// Pounds.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub weight: Option<f64>,
    /// Inches.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub bmi: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub respiratory_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub oxygen_saturation: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub blood_sugar: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub pain_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub recorded_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub medication_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub dosage: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub status: Option<MedicationStatus>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub adherence_level: Option<AdherenceLevel>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub refills_remaining: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub prescribed_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
}

impl Medication {
    pub fn is_active(&self) -> bool {
        self.status == Some(MedicationStatus::Active)
    }

    /// Missing adherence counts as `Unknown`.
    pub fn adherence(&self) -> AdherenceLevel {
        self.adherence_level
            .clone()
            .unwrap_or(AdherenceLevel::Unknown)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabResult {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub test_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub result_value: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub reference_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub status: Option<LabStatus>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub test_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ordered_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub recipient: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub status: Option<MessageStatus>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub sent_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoapNote {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub visit_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub subjective: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub objective: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub assessment: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub plan: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub medication_name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub dosage: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub quantity: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub refills: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub prescribed_by: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub prescribed_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
}
