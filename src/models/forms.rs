//! Submitted forms and the JSON bodies they become.
//!
//! Field names match the table columns so a posted form decodes straight
//! into these structs. Blank inputs are sent as `null`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};

use super::dates;
use super::status::{AdherenceLevel, AppointmentStatus, LabStatus, MedicationStatus, MessageStatus};
use crate::error::{ClinicError, Result};

const LBS_TO_KG: f64 = 0.453592;
const INCHES_TO_METERS: f64 = 0.0254;

fn blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn text(value: &Option<String>) -> Value {
    blank(value).map_or(Value::Null, |s| Value::String(s.to_string()))
}

fn number(value: &Option<String>) -> Option<f64> {
    blank(value)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn number_value(value: &Option<String>) -> Value {
    number(value).map_or(Value::Null, |n| json!(n))
}

fn date_value(value: &Option<String>, field: &str) -> Result<Value> {
    match blank(value) {
        None => Ok(Value::Null),
        Some(raw) => dates::parse_date(raw)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| ClinicError::Validation(format!("{} is not a date: {}", field, raw))),
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClinicError::Validation(format!("{} is required", field)));
    }
    Ok(value)
}

/// BMI from imperial weight and height, rounded to one decimal.
pub fn bmi(weight_lbs: f64, height_in: f64) -> Option<f64> {
    if weight_lbs <= 0.0 || height_in <= 0.0 {
        return None;
    }
    let meters = height_in * INCHES_TO_METERS;
    let kg = weight_lbs * LBS_TO_KG;
    Some((kg / (meters * meters) * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub insurance_info: Option<String>,
    pub allergies: Option<String>,
    pub notes: Option<String>,
}

impl PatientForm {
    pub fn to_body(&self) -> Result<Value> {
        Ok(json!({
            "first_name": required(&self.first_name, "first_name")?,
            "last_name": required(&self.last_name, "last_name")?,
            "date_of_birth": date_value(&self.date_of_birth, "date_of_birth")?,
            "gender": text(&self.gender),
            "phone": text(&self.phone),
            "email": text(&self.email),
            "address": text(&self.address),
            "blood_type": text(&self.blood_type),
            "emergency_contact": text(&self.emergency_contact),
            "insurance_info": text(&self.insurance_info),
            "allergies": text(&self.allergies),
            "notes": text(&self.notes),
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiseaseForm {
    #[serde(default)]
    pub disease_name: String,
    pub diagnosis_date: Option<String>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    pub medication: Option<String>,
    pub doctor_name: Option<String>,
    pub follow_up_date: Option<String>,
    pub notes: Option<String>,
}

impl DiseaseForm {
    pub fn to_body(&self, patient_id: &str) -> Result<Value> {
        Ok(json!({
            "patient_id": required(patient_id, "patient_id")?,
            "disease_name": required(&self.disease_name, "disease_name")?,
            "diagnosis_date": date_value(&self.diagnosis_date, "diagnosis_date")?,
            "status": text(&self.status),
            "severity": text(&self.severity),
            "symptoms": text(&self.symptoms),
            "treatment": text(&self.treatment),
            "medication": text(&self.medication),
            "doctor_name": text(&self.doctor_name),
            "follow_up_date": date_value(&self.follow_up_date, "follow_up_date")?,
            "notes": text(&self.notes),
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VitalsForm {
    pub blood_pressure_systolic: Option<String>,
    pub blood_pressure_diastolic: Option<String>,
    pub heart_rate: Option<String>,
    pub temperature: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub respiratory_rate: Option<String>,
    pub oxygen_saturation: Option<String>,
    pub blood_sugar: Option<String>,
    pub pain_level: Option<String>,
    pub recorded_by: Option<String>,
    pub notes: Option<String>,
}

impl VitalsForm {
    pub fn bmi(&self) -> Option<f64> {
        bmi(number(&self.weight)?, number(&self.height)?)
    }

    pub fn to_body(&self, patient_id: &str, recorded: NaiveDateTime) -> Result<Value> {
        Ok(json!({
            "patient_id": required(patient_id, "patient_id")?,
            "recorded_date": recorded.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "blood_pressure_systolic": number_value(&self.blood_pressure_systolic),
            "blood_pressure_diastolic": number_value(&self.blood_pressure_diastolic),
            "heart_rate": number_value(&self.heart_rate),
            "temperature": number_value(&self.temperature),
            "weight": number_value(&self.weight),
            "height": number_value(&self.height),
            "bmi": self.bmi(),
            "respiratory_rate": number_value(&self.respiratory_rate),
            "oxygen_saturation": number_value(&self.oxygen_saturation),
            "blood_sugar": number_value(&self.blood_sugar),
            "pain_level": number_value(&self.pain_level),
            "recorded_by": text(&self.recorded_by),
            "notes": text(&self.notes),
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentForm {
    #[serde(default)]
    pub patient_id: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// `HH:MM`; midnight when blank.
    pub time: Option<String>,
    pub duration: Option<String>,
    pub appointment_type: Option<String>,
    pub doctor_name: Option<String>,
    pub chief_complaint: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentForm {
    pub fn scheduled_for(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(required(&self.date, "date")?, "%Y-%m-%d")
            .map_err(|_| ClinicError::Validation(format!("date is not a date: {}", self.date)))?;
        let time = match blank(&self.time) {
            None => NaiveTime::MIN,
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
                .map_err(|_| ClinicError::Validation(format!("time is not a time: {}", raw)))?,
        };
        Ok(date.and_time(time))
    }

    pub fn to_body(&self, created_by: &str) -> Result<Value> {
        let when = self.scheduled_for()?;
        Ok(json!({
            "patient_id": required(&self.patient_id, "patient_id")?,
            "appointment_date": when.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "duration": number(&self.duration).map(|n| n.round() as i64),
            "appointment_type": text(&self.appointment_type),
            "doctor_name": text(&self.doctor_name),
            "chief_complaint": text(&self.chief_complaint),
            "notes": text(&self.notes),
            "status": AppointmentStatus::Scheduled.as_str(),
            "reminder_sent": false,
            "created_by": created_by,
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationForm {
    #[serde(default)]
    pub medication_name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub status: Option<String>,
    pub adherence_level: Option<String>,
    pub refills_remaining: Option<String>,
    pub prescribed_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

impl MedicationForm {
    pub fn to_body(&self, patient_id: &str) -> Result<Value> {
        Ok(json!({
            "patient_id": required(patient_id, "patient_id")?,
            "medication_name": required(&self.medication_name, "medication_name")?,
            "dosage": text(&self.dosage),
            "frequency": text(&self.frequency),
            "status": blank(&self.status).unwrap_or(MedicationStatus::Active.as_str()),
            "adherence_level": blank(&self.adherence_level).unwrap_or(AdherenceLevel::Unknown.as_str()),
            "refills_remaining": number(&self.refills_remaining).map(|n| n.max(0.0).round() as i64),
            "prescribed_by": text(&self.prescribed_by),
            "start_date": date_value(&self.start_date, "start_date")?,
            "end_date": date_value(&self.end_date, "end_date")?,
            "notes": text(&self.notes),
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabResultForm {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub test_name: String,
    pub result_value: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub status: Option<String>,
    pub test_date: Option<String>,
    pub ordered_by: Option<String>,
    pub notes: Option<String>,
}

impl LabResultForm {
    pub fn to_body(&self) -> Result<Value> {
        Ok(json!({
            "patient_id": required(&self.patient_id, "patient_id")?,
            "test_name": required(&self.test_name, "test_name")?,
            "result_value": text(&self.result_value),
            "unit": text(&self.unit),
            "reference_range": text(&self.reference_range),
            "status": blank(&self.status).unwrap_or(LabStatus::Pending.as_str()),
            "test_date": date_value(&self.test_date, "test_date")?,
            "ordered_by": text(&self.ordered_by),
            "notes": text(&self.notes),
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub patient_id: String,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    #[serde(default)]
    pub subject: String,
    pub body: Option<String>,
    pub priority: Option<String>,
}

impl MessageForm {
    pub fn to_body(&self, sent: NaiveDateTime) -> Result<Value> {
        Ok(json!({
            "patient_id": required(&self.patient_id, "patient_id")?,
            "sender": text(&self.sender),
            "recipient": text(&self.recipient),
            "subject": required(&self.subject, "subject")?,
            "body": text(&self.body),
            "status": MessageStatus::Unread.as_str(),
            "priority": blank(&self.priority).unwrap_or("Normal"),
            "sent_date": sent.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn bmi_uses_imperial_units_and_rounds_to_a_tenth() {
        // 154 lbs, 70 in -> 22.1
        assert_eq!(bmi(154.0, 70.0), Some(22.1));
        assert_eq!(bmi(154.0, 0.0), None);
    }

    #[test]
    fn vitals_body_carries_numbers_and_bmi() {
        let form = VitalsForm {
            heart_rate: some("72"),
            weight: some("154"),
            height: some("70"),
            temperature: some(""),
            ..Default::default()
        };
        let recorded = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let body = form.to_body("p1", recorded).unwrap();
        assert_eq!(body["heart_rate"], json!(72.0));
        assert_eq!(body["temperature"], Value::Null);
        assert_eq!(body["bmi"], json!(22.1));
        assert_eq!(body["recorded_date"], "2026-01-02T08:15:00");
    }

    #[test]
    fn vitals_without_height_have_no_bmi() {
        let form = VitalsForm {
            weight: some("154"),
            ..Default::default()
        };
        assert_eq!(form.bmi(), None);
    }

    #[test]
    fn patient_names_are_required() {
        let form = PatientForm {
            first_name: "  ".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        assert!(matches!(form.to_body(), Err(ClinicError::Validation(_))));
    }

    #[test]
    fn patient_body_normalizes_blanks_to_null() {
        let form = PatientForm {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            date_of_birth: some("1815-12-10"),
            email: some(""),
            ..Default::default()
        };
        let body = form.to_body().unwrap();
        assert_eq!(body["first_name"], "Ada");
        assert_eq!(body["date_of_birth"], "1815-12-10");
        assert_eq!(body["email"], Value::Null);
    }

    #[test]
    fn appointments_are_created_scheduled() {
        let form = AppointmentForm {
            patient_id: "p1".into(),
            date: "2026-10-19".into(),
            time: some("14:30"),
            duration: some("30"),
            ..Default::default()
        };
        let body = form.to_body("Front Desk").unwrap();
        assert_eq!(body["appointment_date"], "2026-10-19T14:30:00");
        assert_eq!(body["status"], "Scheduled");
        assert_eq!(body["reminder_sent"], false);
        assert_eq!(body["duration"], 30);
    }

    #[test]
    fn appointment_dates_are_validated() {
        let form = AppointmentForm {
            patient_id: "p1".into(),
            date: "19/10/2026".into(),
            ..Default::default()
        };
        assert!(form.to_body("x").is_err());
    }

    #[test]
    fn medications_default_to_active_with_unknown_adherence() {
        let form = MedicationForm {
            medication_name: "Metformin".into(),
            ..Default::default()
        };
        let body = form.to_body("p1").unwrap();
        assert_eq!(body["status"], "Active");
        assert_eq!(body["adherence_level"], "Unknown");
    }
}
