use chrono::NaiveDate;

use super::{
    adherence_style, badge, date_or, day_or, empty_state, escape, input, label, label_or,
    number_or, select, status_style, text_or, textarea,
};
use crate::cache::DataCache;
use crate::core::aggregate::{
    active_conditions, age_label, calculate_age, current_medications, latest_vitals, vitals_history,
};
use crate::core::view::EhrTab;
use crate::models::{
    dates, Appointment, LabResult, Medication, Message, Patient, Prescription, SoapNote, Vitals,
};

/// Tab strip with `active` highlighted. Each tab swaps the whole record
/// view so the highlight follows the selection.
pub fn ehr_tabs(patient_id: &str, active: EhrTab) -> String {
    let id = escape(patient_id);
    let buttons: String = EhrTab::ALL
        .iter()
        .map(|&tab| {
            let class = if tab == active {
                "border-medical-blue text-medical-blue"
            } else {
                "border-transparent text-gray-500"
            };
            format!(
                r##"<button class="ehr-tab py-2 px-1 border-b-2 font-medium text-sm {class}" data-tab="{slug}" hx-get="/patients/{id}/ehr/{slug}" hx-target="#ehr" hx-swap="outerHTML">{title}</button>"##,
                class = class,
                slug = tab.slug(),
                id = id,
                title = tab.title(),
            )
        })
        .collect();
    format!(r#"<nav class="flex space-x-8 border-b" id="ehr-tabs">{}</nav>"#, buttons)
}

/// Record view of one patient: tab strip plus the active tab's content.
pub fn patient_ehr(cache: &DataCache, patient: &Patient, tab: EhrTab, today: NaiveDate) -> String {
    format!(
        r#"<div class="ehr" id="ehr" data-patient="{id}"><h3 class="text-xl font-semibold mb-4">{name}</h3>{tabs}<div id="ehr-content" class="mt-6">{content}</div></div>"#,
        id = escape(&patient.id),
        name = escape(&patient.full_name()),
        tabs = ehr_tabs(&patient.id, tab),
        content = ehr_tab(cache, patient, tab, today),
    )
}

pub fn ehr_tab(cache: &DataCache, patient: &Patient, tab: EhrTab, today: NaiveDate) -> String {
    match tab {
        EhrTab::Overview => overview(cache, patient, today),
        EhrTab::Vitals => vitals_tab(&patient.id, &vitals_history(cache, &patient.id)),
        EhrTab::Medications => medications_tab(
            &patient.id,
            &cache.medications_for(&patient.id),
            &cache.prescriptions_for(&patient.id),
        ),
        EhrTab::LabResults => lab_results_tab(&cache.lab_results_for(&patient.id)),
        EhrTab::Appointments => appointments_tab(&cache.appointments_for(&patient.id)),
        EhrTab::Notes => notes_tab(
            &cache.soap_notes_for(&patient.id),
            &cache.messages_for(&patient.id),
        ),
    }
}

fn row(name: &str, value: &str) -> String {
    format!(
        r#"<div class="flex justify-between"><span class="font-medium text-gray-700">{}:</span><span>{}</span></div>"#,
        name, value
    )
}

fn card(title: &str, body: &str) -> String {
    format!(
        r#"<div class="bg-gray-50 rounded-lg p-6"><h4 class="text-lg font-semibold text-gray-800 mb-4">{}</h4>{}</div>"#,
        title, body
    )
}

pub fn overview(cache: &DataCache, patient: &Patient, today: NaiveDate) -> String {
    let age = age_label(calculate_age(patient.date_of_birth, today));
    let personal = [
        row("Name", &escape(&patient.full_name())),
        row("Date of Birth", &date_or(patient.date_of_birth, "N/A")),
        row("Age", &format!("{} years", escape(&age))),
        row("Gender", &text_or(patient.gender.as_deref(), "N/A")),
        row("Blood Type", &text_or(patient.blood_type.as_deref(), "Unknown")),
        row("Phone", &text_or(patient.phone.as_deref(), "N/A")),
        row("Email", &text_or(patient.email.as_deref(), "N/A")),
    ]
    .concat();

    let vitals = match latest_vitals(cache, &patient.id) {
        Some(v) => [
            row(
                "Blood Pressure",
                &format!(
                    "{}/{} mmHg",
                    number_or(v.blood_pressure_systolic, "N/A"),
                    number_or(v.blood_pressure_diastolic, "N/A")
                ),
            ),
            row("Heart Rate", &format!("{} BPM", number_or(v.heart_rate, "N/A"))),
            row("Temperature", &format!("{}°F", number_or(v.temperature, "N/A"))),
            row("Weight", &format!("{} lbs", number_or(v.weight, "N/A"))),
            row("BMI", &number_or(v.bmi, "N/A")),
            format!(
                r#"<div class="text-xs text-gray-500 mt-2">Recorded: {}</div>"#,
                day_or(v.recorded_date, "N/A")
            ),
        ]
        .concat(),
        None => empty_state("No vital signs recorded"),
    };

    let conditions = active_conditions(cache, &patient.id);
    let conditions = if conditions.is_empty() {
        empty_state("No active conditions")
    } else {
        conditions
            .iter()
            .map(|d| {
                let status = label(d.status.as_ref());
                format!(
                    r#"<div class="flex justify-between items-center p-2 bg-white rounded border"><div><div class="font-medium text-sm">{name}</div><div class="text-xs text-gray-500">{status} • {severity}</div></div>{badge}</div>"#,
                    name = escape(&d.disease_name),
                    status = escape(status),
                    severity = label_or(d.severity.as_ref(), "N/A"),
                    badge = badge(status_style(status), status),
                )
            })
            .collect()
    };

    format!(
        r#"<div class="grid grid-cols-1 lg:grid-cols-2 gap-6">{}{}{}{}</div>"#,
        card("Personal Information", &format!(r#"<div class="space-y-3 text-sm">{}</div>"#, personal)),
        card("Recent Vitals", &format!(r#"<div class="space-y-3 text-sm">{}</div>"#, vitals)),
        card("Active Conditions", &conditions),
        card("Current Medications", &current_medications_list(&current_medications(cache, &patient.id))),
    )
}

pub fn current_medications_list(medications: &[&Medication]) -> String {
    if medications.is_empty() {
        return empty_state("No current medications");
    }
    let items: String = medications
        .iter()
        .map(|m| {
            let adherence = m.adherence();
            format!(
                r#"<div class="flex justify-between items-center p-2 bg-white rounded border"><div><div class="font-medium text-sm">{name}</div><div class="text-xs text-gray-500">{dosage} • {frequency}</div></div><div class="text-right"><div class="text-xs {style}">{adherence}</div><div class="text-xs text-gray-500">{refills} refills</div></div></div>"#,
                name = escape(&m.medication_name),
                dosage = text_or(m.dosage.as_deref(), "N/A"),
                frequency = text_or(m.frequency.as_deref(), "N/A"),
                style = adherence_style(adherence.as_str()),
                adherence = escape(adherence.as_str()),
                refills = m.refills_remaining.unwrap_or(0),
            )
        })
        .collect();
    format!(r#"<div class="space-y-2 max-h-40 overflow-y-auto">{}</div>"#, items)
}

fn table(headers: &[&str], rows: String) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!(r#"<th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase">{}</th>"#, h))
        .collect();
    format!(
        r#"<div class="overflow-x-auto"><table class="min-w-full divide-y divide-gray-200"><thead class="bg-gray-50"><tr>{}</tr></thead><tbody class="bg-white divide-y divide-gray-200">{}</tbody></table></div>"#,
        head, rows
    )
}

fn cell(value: &str) -> String {
    format!(r#"<td class="px-4 py-3 text-sm">{}</td>"#, value)
}

/// Vitals history, newest first as given.
pub fn vitals_tab(patient_id: &str, vitals: &[&Vitals]) -> String {
    let header = format!(
        r#"<div class="mb-6"><h4 class="text-lg font-semibold text-gray-800">Vital Signs History</h4>{}</div>"#,
        vitals_form(patient_id)
    );
    if vitals.is_empty() {
        return header + r#"<div class="text-center py-8"><p class="text-gray-500">No vital signs recorded for this patient.</p></div>"#;
    }
    let rows: String = vitals
        .iter()
        .map(|v| {
            [
                "<tr>".to_string(),
                cell(&day_or(v.recorded_date, "-")),
                cell(&format!(
                    "{}/{}",
                    number_or(v.blood_pressure_systolic, "-"),
                    number_or(v.blood_pressure_diastolic, "-")
                )),
                cell(&number_or(v.heart_rate, "-")),
                cell(&format!("{}°F", number_or(v.temperature, "-"))),
                cell(&format!("{} lbs", number_or(v.weight, "-"))),
                cell(&number_or(v.bmi, "-")),
                cell(&format!("{}%", number_or(v.oxygen_saturation, "-"))),
                cell(&format!(
                    r##"<button hx-delete="/vitals/{}" hx-target="#notices" class="text-medical-red"><i class="fas fa-trash"></i></button>"##,
                    escape(&v.id)
                )),
                "</tr>".to_string(),
            ]
            .concat()
        })
        .collect();
    header + &table(&["Date", "BP", "HR", "Temp", "Weight", "BMI", "O2 Sat", "Actions"], rows)
}

const VITALS_INPUTS: [(&str, &str); 12] = [
    ("blood_pressure_systolic", "Systolic"),
    ("blood_pressure_diastolic", "Diastolic"),
    ("heart_rate", "Heart Rate"),
    ("temperature", "Temperature (°F)"),
    ("weight", "Weight (lbs)"),
    ("height", "Height (in)"),
    ("respiratory_rate", "Respiratory Rate"),
    ("oxygen_saturation", "O2 Saturation"),
    ("blood_sugar", "Blood Sugar"),
    ("pain_level", "Pain Level"),
    ("recorded_by", "Recorded By"),
    ("notes", "Notes"),
];

pub fn vitals_form(patient_id: &str) -> String {
    let inputs: String = VITALS_INPUTS
        .iter()
        .map(|(name, title)| {
            format!(
                r#"<label class="text-sm">{title}<input name="{name}" class="w-full border rounded px-2 py-1"></label>"#,
                title = title,
                name = name,
            )
        })
        .collect();
    format!(
        r##"<form class="grid grid-cols-2 md:grid-cols-4 gap-3 mt-4" hx-post="/patients/{}/vitals" hx-target="#notices">{}<button type="submit" class="bg-medical-red text-white px-4 py-2 rounded">Record New Vitals</button></form>"##,
        escape(patient_id),
        inputs
    )
}

const MEDICATION_STATUSES: [&str; 4] = ["Active", "Discontinued", "Completed", "On Hold"];
const ADHERENCE_LEVELS: [&str; 5] = ["Excellent", "Good", "Fair", "Poor", "Unknown"];

pub fn medication_form(patient_id: &str) -> String {
    let fields = [
        input("medication_name", "Medication", "text", ""),
        input("dosage", "Dosage", "text", ""),
        input("frequency", "Frequency", "text", ""),
        select("status", "Status", &MEDICATION_STATUSES, "Active"),
        select("adherence_level", "Adherence", &ADHERENCE_LEVELS, ""),
        input("refills_remaining", "Refills", "number", ""),
        input("prescribed_by", "Prescribed By", "text", ""),
        input("start_date", "Start Date", "date", ""),
        input("end_date", "End Date", "date", ""),
        textarea("notes", "Notes", ""),
    ]
    .concat();
    format!(
        r##"<form class="grid grid-cols-2 md:grid-cols-4 gap-3 mb-6" hx-post="/patients/{}/medications" hx-target="#notices">{}<button type="submit" class="bg-medical-purple text-white px-4 py-2 rounded">Add Medication</button></form>"##,
        escape(patient_id),
        fields
    )
}

/// Every medication of the patient, current or not, then prescriptions.
pub fn medications_tab(
    patient_id: &str,
    medications: &[&Medication],
    prescriptions: &[&Prescription],
) -> String {
    let list = if medications.is_empty() {
        empty_state("No medications on file")
    } else {
        let rows: String = medications
            .iter()
            .map(|m| {
                let status = label(m.status.as_ref());
                let adherence = m.adherence();
                [
                    "<tr>".to_string(),
                    cell(&escape(&m.medication_name)),
                    cell(&text_or(m.dosage.as_deref(), "-")),
                    cell(&text_or(m.frequency.as_deref(), "-")),
                    cell(&badge(status_style(status), status)),
                    cell(&format!(
                        r#"<span class="{}">{}</span>"#,
                        adherence_style(adherence.as_str()),
                        escape(adherence.as_str())
                    )),
                    cell(&m.refills_remaining.unwrap_or(0).to_string()),
                    cell(&text_or(m.prescribed_by.as_deref(), "-")),
                    cell(&date_or(m.start_date, "-")),
                    "</tr>".to_string(),
                ]
                .concat()
            })
            .collect();
        table(
            &["Medication", "Dosage", "Frequency", "Status", "Adherence", "Refills", "Prescriber", "Start"],
            rows,
        )
    };
    format!(
        r#"{}{}<h4 class="text-lg font-semibold text-gray-800 mt-8 mb-4">Prescriptions</h4>{}"#,
        medication_form(patient_id),
        list,
        prescriptions_list(prescriptions)
    )
}

/// Prescriptions, most recently written first.
pub fn prescriptions_list(prescriptions: &[&Prescription]) -> String {
    if prescriptions.is_empty() {
        return empty_state("No prescriptions on file");
    }
    let mut sorted = prescriptions.to_vec();
    sorted.sort_by(|a, b| b.prescribed_date.cmp(&a.prescribed_date));
    let rows: String = sorted
        .iter()
        .map(|p| {
            let status = p.status.as_deref().unwrap_or("");
            [
                "<tr>".to_string(),
                cell(&date_or(p.prescribed_date, "-")),
                cell(&escape(&p.medication_name)),
                cell(&text_or(p.dosage.as_deref(), "-")),
                cell(&p.quantity.map_or_else(|| "-".to_string(), |q| q.to_string())),
                cell(&p.refills.unwrap_or(0).to_string()),
                cell(&text_or(p.prescribed_by.as_deref(), "-")),
                cell(&badge(status_style(status), status)),
                "</tr>".to_string(),
            ]
            .concat()
        })
        .collect();
    table(
        &["Written", "Medication", "Dosage", "Quantity", "Refills", "Prescriber", "Status"],
        rows,
    )
}

pub fn lab_results_tab(results: &[&LabResult]) -> String {
    if results.is_empty() {
        return empty_state("No lab results on file");
    }
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| b.test_date.cmp(&a.test_date));
    let rows: String = sorted
        .iter()
        .map(|l| {
            let status = label(l.status.as_ref());
            let value = match (&l.result_value, &l.unit) {
                (Some(value), Some(unit)) => format!("{} {}", escape(value), escape(unit)),
                (Some(value), None) => escape(value),
                _ => "-".to_string(),
            };
            [
                "<tr>".to_string(),
                cell(&escape(&l.test_name)),
                cell(&value),
                cell(&text_or(l.reference_range.as_deref(), "-")),
                cell(&badge(status_style(status), status)),
                cell(&day_or(l.test_date, "-")),
                "</tr>".to_string(),
            ]
            .concat()
        })
        .collect();
    table(&["Test", "Result", "Reference", "Status", "Date"], rows)
}

pub fn appointments_tab(appointments: &[&Appointment]) -> String {
    if appointments.is_empty() {
        return empty_state("No appointments on file");
    }
    let mut sorted = appointments.to_vec();
    sorted.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
    let rows: String = sorted
        .iter()
        .map(|a| {
            let status = label(a.status.as_ref());
            let when = a.appointment_date.map_or_else(
                || "-".to_string(),
                |ts| format!("{} {}", dates::format_date(ts.date()), dates::format_time(ts)),
            );
            [
                "<tr>".to_string(),
                cell(&when),
                cell(&text_or(a.appointment_type.as_deref(), "-")),
                cell(&text_or(a.doctor_name.as_deref(), "Dr. TBD")),
                cell(&text_or(a.chief_complaint.as_deref(), "-")),
                cell(&badge(status_style(status), status)),
                "</tr>".to_string(),
            ]
            .concat()
        })
        .collect();
    table(&["When", "Type", "Doctor", "Complaint", "Status"], rows)
}

/// SOAP notes, newest visit first, then the patient's messages.
pub fn notes_tab(notes: &[&SoapNote], messages: &[&Message]) -> String {
    let notes = if notes.is_empty() {
        empty_state("No clinical notes recorded")
    } else {
        let mut sorted = notes.to_vec();
        sorted.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
        let items: String = sorted
            .iter()
            .map(|note| {
                format!(
                    r#"<div class="border rounded-lg p-4"><div class="flex justify-between text-sm text-gray-600 mb-2"><span>{date}</span><span>{provider}</span></div>{s}{o}{a}{p}</div>"#,
                    date = day_or(note.visit_date, "No date"),
                    provider = text_or(note.provider.as_deref(), ""),
                    s = row("Subjective", &text_or(note.subjective.as_deref(), "-")),
                    o = row("Objective", &text_or(note.objective.as_deref(), "-")),
                    a = row("Assessment", &text_or(note.assessment.as_deref(), "-")),
                    p = row("Plan", &text_or(note.plan.as_deref(), "-")),
                )
            })
            .collect();
        format!(r#"<div class="space-y-4">{}</div>"#, items)
    };
    format!(
        r#"{}<h4 class="text-lg font-semibold text-gray-800 mt-8 mb-4">Messages</h4>{}"#,
        notes,
        patient_messages(messages)
    )
}

fn patient_messages(messages: &[&Message]) -> String {
    if messages.is_empty() {
        return empty_state("No messages for this patient");
    }
    let mut sorted = messages.to_vec();
    sorted.sort_by(|a, b| b.sent_date.cmp(&a.sent_date));
    let items: String = sorted
        .iter()
        .map(|m| {
            let status = label(m.status.as_ref());
            format!(
                r#"<div class="border rounded p-3 text-sm"><div class="flex justify-between"><span class="font-medium">{subject}</span>{badge}</div><div class="text-gray-600">{sender} • {sent}</div><p class="mt-1">{body}</p></div>"#,
                subject = text_or(m.subject.as_deref(), "(no subject)"),
                badge = badge(status_style(status), status),
                sender = text_or(m.sender.as_deref(), "Unknown"),
                sent = day_or(m.sent_date, "-"),
                body = text_or(m.body.as_deref(), ""),
            )
        })
        .collect();
    format!(r#"<div class="space-y-2">{}</div>"#, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdherenceLevel, DiseaseStatus, MedicationStatus, MessageStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn cache() -> DataCache {
        let at = |d: u32| NaiveDate::from_ymd_opt(2026, 10, d).unwrap().and_hms_opt(9, 0, 0);
        DataCache {
            patients: vec![Patient {
                id: "p1".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                ..Default::default()
            }],
            vitals: vec![
                Vitals {
                    id: "v1".into(),
                    patient_id: "p1".into(),
                    recorded_date: at(1),
                    heart_rate: Some(90.0),
                    ..Default::default()
                },
                Vitals {
                    id: "v2".into(),
                    patient_id: "p1".into(),
                    recorded_date: at(15),
                    heart_rate: Some(72.0),
                    bmi: Some(22.1),
                    ..Default::default()
                },
            ],
            disease_history: vec![crate::models::DiseaseHistory {
                id: "d1".into(),
                patient_id: "p1".into(),
                disease_name: "Hypertension".into(),
                status: Some(DiseaseStatus::UnderTreatment),
                ..Default::default()
            }],
            medications: vec![Medication {
                id: "m1".into(),
                patient_id: "p1".into(),
                medication_name: "Lisinopril".into(),
                status: Some(MedicationStatus::Active),
                adherence_level: Some(AdherenceLevel::Poor),
                ..Default::default()
            }],
            prescriptions: vec![
                Prescription {
                    id: "rx1".into(),
                    patient_id: "p1".into(),
                    medication_name: "Metformin".into(),
                    prescribed_date: NaiveDate::from_ymd_opt(2026, 9, 1),
                    quantity: Some(60),
                    ..Default::default()
                },
                Prescription {
                    id: "rx2".into(),
                    patient_id: "p1".into(),
                    medication_name: "Lisinopril".into(),
                    prescribed_date: NaiveDate::from_ymd_opt(2026, 10, 1),
                    ..Default::default()
                },
            ],
            messages: vec![Message {
                id: "msg1".into(),
                patient_id: "p1".into(),
                subject: Some("Lab follow-up".into()),
                status: Some(MessageStatus::Unread),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn overview_shows_the_latest_vitals() {
        let cache = cache();
        let html = overview(&cache, &cache.patients[0], today());
        assert!(html.contains("72 BPM"));
        assert!(!html.contains("90 BPM"));
        assert!(html.contains("22.1"));
        assert!(html.contains("Hypertension"));
        assert!(html.contains("text-red-600"));
        assert!(html.contains("Unknown years"));
    }

    #[test]
    fn vitals_tab_lists_newest_first() {
        let cache = cache();
        let html = ehr_tab(&cache, &cache.patients[0], EhrTab::Vitals, today());
        let newest = html.find("10/15/2026").unwrap();
        let oldest = html.find("10/01/2026").unwrap();
        assert!(newest < oldest);
        assert!(html.contains(r#"hx-delete="/vitals/v2""#));
    }

    #[test]
    fn empty_tabs_say_so() {
        let cache = cache();
        let patient = &cache.patients[0];
        assert!(ehr_tab(&cache, patient, EhrTab::Notes, today()).contains("No clinical notes"));
        assert!(notes_tab(&[], &[]).contains("No messages for this patient"));
        assert!(medications_tab("p1", &[], &[]).contains("No prescriptions on file"));
        assert!(ehr_tab(&cache, patient, EhrTab::LabResults, today()).contains("No lab results"));
        assert!(vitals_tab("p2", &[]).contains("No vital signs recorded for this patient."));
    }

    #[test]
    fn tab_strip_marks_the_active_tab() {
        let html = ehr_tabs("p1", EhrTab::Medications);
        assert!(html.contains(
            r#"border-medical-blue text-medical-blue" data-tab="medications""#
        ));
        assert!(html.contains(r#"data-tab="lab-results""#));
    }

    #[test]
    fn tabs_replace_the_whole_record_view() {
        let cache = cache();
        let html = patient_ehr(&cache, &cache.patients[0], EhrTab::Vitals, today());
        assert!(html.starts_with(r#"<div class="ehr" id="ehr""#));
        assert_eq!(html.matches(r#"id="ehr-tabs""#).count(), 1);
        assert_eq!(html.matches(r#"id="ehr-content""#).count(), 1);
        assert_eq!(
            html.matches(r##"hx-target="#ehr" hx-swap="outerHTML""##).count(),
            EhrTab::ALL.len()
        );
        assert!(!html.contains(r##"hx-target="#ehr-content""##));
    }

    #[test]
    fn medications_tab_offers_a_form_and_lists_prescriptions() {
        let cache = cache();
        let html = ehr_tab(&cache, &cache.patients[0], EhrTab::Medications, today());
        assert!(html.contains(r#"hx-post="/patients/p1/medications""#));
        assert!(html.contains(r#"name="adherence_level""#));
        assert!(html.contains("Prescriptions"));
        let newest = html.find("10/01/2026").unwrap();
        let oldest = html.find("09/01/2026").unwrap();
        assert!(newest < oldest);
        assert!(html.contains("<td class=\"px-4 py-3 text-sm\">60</td>"));
    }

    #[test]
    fn notes_tab_shows_the_patients_messages() {
        let cache = cache();
        let html = ehr_tab(&cache, &cache.patients[0], EhrTab::Notes, today());
        assert!(html.contains("No clinical notes recorded"));
        assert!(html.contains("Lab follow-up"));
        assert!(html.contains(r#"bg-blue-100 text-blue-800">Unread"#));
    }
}
