//! Derived views over the cached tables.
//!
//! Everything here is a pure function of the cache and a reference clock,
//! so callers pass `today`/`now` explicitly.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::cache::DataCache;
use crate::models::{
    AdherenceLevel, Appointment, AppointmentStatus, DiseaseHistory, LabStatus, Medication,
    MessageStatus, Patient, Vitals,
};

/// Days ahead (inclusive) a follow-up counts as due.
pub const FOLLOW_UP_WINDOW_DAYS: i64 = 7;
pub const TOP_CONDITIONS: usize = 10;

/// Whole years between `birth` and `today`.
///
/// `None` when the birth date is missing or lies after `today`.
pub fn calculate_age(birth: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    let birth = birth?;
    if birth > today {
        return None;
    }
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

pub fn age_label(age: Option<u32>) -> String {
    age.map_or_else(|| "Unknown".to_string(), |a| a.to_string())
}

/// Follow-up falls between today and today + 7 days, both ends included.
pub fn is_follow_up_due(follow_up: Option<NaiveDate>, today: NaiveDate) -> bool {
    follow_up.is_some_and(|date| (0..=FOLLOW_UP_WINDOW_DAYS).contains(&(date - today).num_days()))
}

fn is_on(appointment: &Appointment, day: NaiveDate) -> bool {
    appointment.appointment_date.is_some_and(|ts| ts.date() == day)
}

/// Still `Scheduled` although its time has passed.
pub fn is_overdue(appointment: &Appointment, now: NaiveDateTime) -> bool {
    appointment.has_status(&AppointmentStatus::Scheduled)
        && appointment.appointment_date.is_some_and(|ts| ts < now)
}

pub fn is_poor_adherence(medication: &Medication) -> bool {
    medication.is_active() && medication.adherence_level == Some(AdherenceLevel::Poor)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_patients: usize,
    pub today_appointments: usize,
    pub active_cases: usize,
    pub follow_ups_due: usize,
    pub active_medications: usize,
    pub pending_labs: usize,
    pub unread_messages: usize,
    pub critical_labs: usize,
    pub poor_adherence: usize,
}

pub fn dashboard_stats(cache: &DataCache, now: NaiveDateTime) -> DashboardStats {
    let today = now.date();
    DashboardStats {
        total_patients: cache.patients.len(),
        today_appointments: cache.appointments.iter().filter(|a| is_on(a, today)).count(),
        active_cases: cache
            .disease_history
            .iter()
            .filter(|d| d.is_active_case())
            .count(),
        follow_ups_due: cache
            .disease_history
            .iter()
            .filter(|d| is_follow_up_due(d.follow_up_date, today))
            .count(),
        active_medications: cache.medications.iter().filter(|m| m.is_active()).count(),
        pending_labs: cache
            .lab_results
            .iter()
            .filter(|l| l.status == Some(LabStatus::Pending))
            .count(),
        unread_messages: cache
            .messages
            .iter()
            .filter(|m| m.status == Some(MessageStatus::Unread))
            .count(),
        critical_labs: cache
            .lab_results
            .iter()
            .filter(|l| l.status == Some(LabStatus::Critical))
            .count(),
        poor_adherence: cache
            .medications
            .iter()
            .filter(|m| is_poor_adherence(m))
            .count(),
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleEntry<'a> {
    pub at: NaiveDateTime,
    pub patient_name: String,
    pub appointment: &'a Appointment,
}

/// Today's appointments, earliest first.
pub fn todays_schedule(cache: &DataCache, today: NaiveDate) -> Vec<ScheduleEntry<'_>> {
    let mut entries: Vec<_> = cache
        .appointments
        .iter()
        .filter_map(|a| {
            let at = a.appointment_date.filter(|ts| ts.date() == today)?;
            Some(ScheduleEntry {
                at,
                patient_name: cache.patient_name(&a.patient_id),
                appointment: a,
            })
        })
        .collect();
    entries.sort_by_key(|e| e.at);
    entries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub icon: &'static str,
}

/// Critical labs, then overdue appointments, then poor adherence.
pub fn critical_alerts(cache: &DataCache, now: NaiveDateTime) -> Vec<Alert> {
    let critical_labs = cache
        .lab_results
        .iter()
        .filter(|l| l.status == Some(LabStatus::Critical))
        .map(|l| Alert {
            kind: AlertKind::Critical,
            message: format!(
                "Critical lab result: {} for {}",
                l.test_name,
                cache.patient_name(&l.patient_id)
            ),
            icon: "fa-flask",
        });

    let overdue = cache
        .appointments
        .iter()
        .filter(|a| is_overdue(a, now))
        .map(|a| Alert {
            kind: AlertKind::Warning,
            message: format!("Overdue appointment: {}", cache.patient_name(&a.patient_id)),
            icon: "fa-calendar-times",
        });

    let adherence = cache
        .medications
        .iter()
        .filter(|m| is_poor_adherence(m))
        .map(|m| Alert {
            kind: AlertKind::Warning,
            message: format!(
                "Poor medication adherence: {} for {}",
                m.medication_name,
                cache.patient_name(&m.patient_id)
            ),
            icon: "fa-pills",
        });

    critical_labs.chain(overdue).chain(adherence).collect()
}

/// Case-insensitive substring match on names, email and phone.
pub fn search_patients<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return patients.iter().collect();
    }
    let hit = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&query));
    patients
        .iter()
        .filter(|p| {
            hit(Some(p.first_name.as_str()))
                || hit(Some(p.last_name.as_str()))
                || hit(p.email.as_deref())
                || hit(p.phone.as_deref())
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub patient_id: Option<String>,
}

/// Appointments matching every set criterion, earliest first; undated last.
pub fn filter_appointments<'a>(
    appointments: &'a [Appointment],
    filter: &AppointmentFilter,
) -> Vec<&'a Appointment> {
    let mut matched: Vec<_> = appointments
        .iter()
        .filter(|a| filter.status.as_ref().map_or(true, |s| a.has_status(s)))
        .filter(|a| filter.date.map_or(true, |d| is_on(a, d)))
        .filter(|a| {
            filter
                .patient_id
                .as_deref()
                .map_or(true, |p| a.patient_id == p)
        })
        .collect();
    matched.sort_by_key(|a| (a.appointment_date.is_none(), a.appointment_date));
    matched
}

/// Date of the most recent completed appointment.
pub fn last_visit(appointments: &[Appointment], patient_id: &str) -> Option<NaiveDateTime> {
    appointments
        .iter()
        .filter(|a| a.patient_id == patient_id && a.has_status(&AppointmentStatus::Completed))
        .filter_map(|a| a.appointment_date)
        .max()
}

/// Vitals of one patient, newest first.
pub fn vitals_history<'a>(cache: &'a DataCache, patient_id: &str) -> Vec<&'a Vitals> {
    let mut rows: Vec<_> = cache
        .vitals
        .iter()
        .filter(|v| v.patient_id == patient_id)
        .collect();
    rows.sort_by(|a, b| b.recorded_date.cmp(&a.recorded_date));
    rows
}

pub fn latest_vitals<'a>(cache: &'a DataCache, patient_id: &str) -> Option<&'a Vitals> {
    vitals_history(cache, patient_id).into_iter().next()
}

pub fn active_conditions<'a>(cache: &'a DataCache, patient_id: &str) -> Vec<&'a DiseaseHistory> {
    cache
        .disease_history
        .iter()
        .filter(|d| d.patient_id == patient_id && d.is_active_case())
        .collect()
}

pub fn current_medications<'a>(cache: &'a DataCache, patient_id: &str) -> Vec<&'a Medication> {
    cache
        .medications
        .iter()
        .filter(|m| m.patient_id == patient_id && m.is_active())
        .collect()
}

fn tally<I: IntoIterator<Item = String>>(labels: I) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    counts.into_iter().collect()
}

pub fn gender_breakdown(patients: &[Patient]) -> Vec<(String, usize)> {
    tally(
        patients
            .iter()
            .map(|p| p.gender.clone().unwrap_or_else(|| "Unspecified".into())),
    )
}

/// Most frequent diagnoses, ties broken alphabetically.
pub fn top_conditions(history: &[DiseaseHistory], limit: usize) -> Vec<(String, usize)> {
    let mut counts = tally(
        history
            .iter()
            .filter(|d| !d.disease_name.trim().is_empty())
            .map(|d| d.disease_name.clone()),
    );
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(limit);
    counts
}

pub fn adherence_breakdown(medications: &[Medication]) -> Vec<(String, usize)> {
    tally(medications.iter().map(|m| m.adherence().to_string()))
}

pub fn appointment_status_breakdown(appointments: &[Appointment]) -> Vec<(String, usize)> {
    tally(appointments.iter().map(|a| {
        a.status
            .as_ref()
            .map_or_else(|| "Unspecified".to_string(), |s| s.to_string())
    }))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Analytics {
    pub gender: Vec<(String, usize)>,
    pub conditions: Vec<(String, usize)>,
    pub adherence: Vec<(String, usize)>,
    pub appointment_status: Vec<(String, usize)>,
}

pub fn analytics(cache: &DataCache) -> Analytics {
    Analytics {
        gender: gender_breakdown(&cache.patients),
        conditions: top_conditions(&cache.disease_history, TOP_CONDITIONS),
        adherence: adherence_breakdown(&cache.medications),
        appointment_status: appointment_status_breakdown(&cache.appointments),
    }
}
