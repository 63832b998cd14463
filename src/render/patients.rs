//! Patient registry: table, details card, disease history, forms and pickers.

use chrono::NaiveDate;

use super::{
    badge, date_or, day_or, empty_state, escape, input, label, label_or, select, severity_style,
    status_style, text_or, textarea,
};
use crate::core::aggregate::{age_label, calculate_age, last_visit};
use crate::models::{dates, Appointment, DiseaseHistory, Patient};

const HEADERS: [&str; 6] = ["Patient", "Contact", "Blood Type", "Age", "Last Visit", "Actions"];

const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
const DISEASE_STATUSES: [&str; 5] = ["Active", "Recovered", "Chronic", "Under Treatment", "Remission"];
const SEVERITIES: [&str; 4] = ["Mild", "Moderate", "Severe", "Critical"];

/// Patients section body: toolbar, then the table the search box swaps.
pub fn patient_registry(
    patients: &[&Patient],
    appointments: &[Appointment],
    today: NaiveDate,
    query: &str,
) -> String {
    format!(
        r##"<div class="flex justify-between items-center mb-4">
    <input type="search" name="q" value="{query}" placeholder="Search patients..." class="border rounded-lg px-4 py-2 w-80" hx-get="/patients" hx-trigger="keyup changed delay:300ms, search" hx-target="#patient-table">
    <button hx-get="/patients/new" hx-target="#modal" class="bg-medical-green text-white px-4 py-2 rounded-lg"><i class="fas fa-user-plus mr-2"></i>Add Patient</button>
</div>
<div id="patient-table">{table}</div>"##,
        query = escape(query),
        table = patient_table(patients, appointments, today),
    )
}

/// Registry table; `appointments` supplies each row's last visit.
pub fn patient_table(patients: &[&Patient], appointments: &[Appointment], today: NaiveDate) -> String {
    if patients.is_empty() {
        return r#"<div class="text-center py-8">
    <i class="fas fa-user-md text-gray-400 text-4xl mb-4"></i>
    <p class="text-gray-600">No patients found. Click "Add Patient" to get started.</p>
</div>"#
            .to_string();
    }

    let head: String = HEADERS
        .iter()
        .map(|header| {
            format!(
                r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{}</th>"#,
                header
            )
        })
        .collect();
    let rows: String = patients
        .iter()
        .map(|patient| patient_row(patient, appointments, today))
        .collect();
    format!(
        r#"<div class="overflow-x-auto"><table class="min-w-full divide-y divide-gray-200"><thead class="bg-gray-50"><tr>{}</tr></thead><tbody class="bg-white divide-y divide-gray-200">{}</tbody></table></div>"#,
        head, rows
    )
}

pub fn patient_row(patient: &Patient, appointments: &[Appointment], today: NaiveDate) -> String {
    let id = escape(&patient.id);
    let age = age_label(calculate_age(patient.date_of_birth, today));
    let visit = day_or(last_visit(appointments, &patient.id), "No visits");
    format!(
        r##"<tr class="hover:bg-gray-50" id="patient-{id}">
    <td class="px-6 py-4 whitespace-nowrap">
        <div class="text-sm font-medium text-gray-900">{name}</div>
        <div class="text-sm text-gray-500">{gender}</div>
    </td>
    <td class="px-6 py-4 whitespace-nowrap">
        <div class="text-sm text-gray-900">{phone}</div>
        <div class="text-sm text-gray-500">{email}</div>
    </td>
    <td class="px-6 py-4 whitespace-nowrap"><span class="inline-flex px-2 py-1 text-xs font-semibold rounded-full bg-red-100 text-red-800">{blood}</span></td>
    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{age} years</td>
    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{visit}</td>
    <td class="px-6 py-4 whitespace-nowrap text-sm font-medium space-x-2">
        <button hx-get="/patients/{id}/ehr" hx-target="#modal" class="text-medical-blue"><i class="fas fa-file-medical"></i> EHR</button>
        <button hx-get="/patients/{id}/edit" hx-target="#modal" class="text-medical-green"><i class="fas fa-edit"></i> Edit</button>
        <button hx-get="/patients/{id}/disease-history" hx-target="#modal" class="text-purple-600"><i class="fas fa-clipboard-list"></i> History</button>
        <button hx-delete="/patients/{id}" hx-confirm="Are you sure you want to delete this patient? This action cannot be undone." hx-target="#notices" class="text-medical-red"><i class="fas fa-trash"></i> Delete</button>
    </td>
</tr>"##,
        id = id,
        name = escape(&patient.full_name()),
        gender = text_or(patient.gender.as_deref(), ""),
        phone = text_or(patient.phone.as_deref(), "N/A"),
        email = text_or(patient.email.as_deref(), "N/A"),
        blood = text_or(patient.blood_type.as_deref(), "Unknown"),
        age = escape(&age),
        visit = visit,
    )
}

fn field(label: &str, value: &str) -> String {
    format!(
        r#"<div><span class="font-medium">{}:</span> {}</div>"#,
        label, value
    )
}

/// Personal, contact and medical cards plus a disease history summary.
pub fn patient_details(patient: &Patient, diseases: &[&DiseaseHistory], today: NaiveDate) -> String {
    let age = age_label(calculate_age(patient.date_of_birth, today));
    let personal = [
        field("Name", &escape(&patient.full_name())),
        field("Date of Birth", &date_or(patient.date_of_birth, "N/A")),
        field("Age", &format!("{} years", escape(&age))),
        field("Gender", &text_or(patient.gender.as_deref(), "N/A")),
        field("Blood Type", &text_or(patient.blood_type.as_deref(), "Unknown")),
    ]
    .concat();
    let contact = [
        field("Phone", &text_or(patient.phone.as_deref(), "N/A")),
        field("Email", &text_or(patient.email.as_deref(), "N/A")),
        field("Address", &text_or(patient.address.as_deref(), "N/A")),
        field(
            "Emergency Contact",
            &text_or(patient.emergency_contact.as_deref(), "N/A"),
        ),
    ]
    .concat();
    let medical = [
        field("Insurance", &text_or(patient.insurance_info.as_deref(), "N/A")),
        field("Allergies", &text_or(patient.allergies.as_deref(), "None reported")),
        field("Notes", &text_or(patient.notes.as_deref(), "No additional notes")),
    ]
    .concat();

    let history = if diseases.is_empty() {
        empty_state("No disease history recorded")
    } else {
        diseases
            .iter()
            .map(|d| {
                format!(
                    r#"<div class="border-l-4 border-medical-blue pl-3"><div class="text-sm font-medium">{}</div><div class="text-xs text-gray-500">{} • {}</div></div>"#,
                    escape(&d.disease_name),
                    label_or(d.status.as_ref(), "N/A"),
                    date_or(d.diagnosis_date, "No date"),
                )
            })
            .collect()
    };

    format!(
        r#"<div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
    <div class="bg-gray-50 rounded-lg p-4"><h4 class="text-lg font-semibold text-gray-800 mb-4">Personal Information</h4><div class="space-y-2 text-sm">{personal}</div></div>
    <div class="bg-gray-50 rounded-lg p-4"><h4 class="text-lg font-semibold text-gray-800 mb-4">Contact Information</h4><div class="space-y-2 text-sm">{contact}</div></div>
    <div class="bg-gray-50 rounded-lg p-4"><h4 class="text-lg font-semibold text-gray-800 mb-4">Medical Information</h4><div class="space-y-2 text-sm">{medical}</div></div>
    <div class="bg-gray-50 rounded-lg p-4"><h4 class="text-lg font-semibold text-gray-800 mb-4">Disease History ({count})</h4><div class="space-y-2 max-h-40 overflow-y-auto">{history}</div></div>
</div>"#,
        personal = personal,
        contact = contact,
        medical = medical,
        count = diseases.len(),
        history = history,
    )
}

/// Full disease history of one patient with add, edit and delete controls.
pub fn disease_history(patient: &Patient, diseases: &[&DiseaseHistory]) -> String {
    let header = format!(
        r##"<div class="flex justify-between items-center mb-4"><h4 class="text-lg font-semibold text-gray-800">Disease History for {name}</h4><button hx-get="/patients/{id}/disease-history/new" hx-target="#modal" class="bg-medical-green text-white px-4 py-2 rounded-lg"><i class="fas fa-plus mr-2"></i>Add Condition</button></div>"##,
        name = escape(&patient.full_name()),
        id = escape(&patient.id),
    );
    if diseases.is_empty() {
        return header
            + r#"<div class="text-center py-8"><p class="text-gray-500">No disease history recorded for this patient.</p></div>"#;
    }
    let cards: String = diseases.iter().map(|disease| disease_card(disease)).collect();
    format!(r#"{}<div class="space-y-4">{}</div>"#, header, cards)
}

fn disease_card(disease: &DiseaseHistory) -> String {
    let status = label(disease.status.as_ref());
    let severity = disease
        .severity
        .as_ref()
        .map(|s| badge(severity_style(s.as_str()), s.as_str()))
        .unwrap_or_default();

    let optional = [
        ("Symptoms", disease.symptoms.as_deref()),
        ("Treatment", disease.treatment.as_deref()),
        ("Medication", disease.medication.as_deref()),
        ("Doctor", disease.doctor_name.as_deref()),
    ];
    let mut details: String = optional
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(|v| field(name, &escape(v)))
        })
        .collect();
    if let Some(date) = disease.follow_up_date {
        details.push_str(&field("Follow-up", &date_or(Some(date), "")));
    }
    let notes = disease
        .notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(|n| format!(r#"<div class="mt-3 text-sm">{}</div>"#, field("Notes", &escape(n))))
        .unwrap_or_default();

    format!(
        r##"<div class="border rounded-lg p-4" id="disease-{id}">
    <div class="flex justify-between items-start mb-3">
        <div>
            <h5 class="font-semibold text-lg text-gray-800">{name}</h5>
            <div class="flex items-center space-x-4 text-sm text-gray-600 mt-1"><span><i class="fas fa-calendar mr-1"></i>{diagnosed}</span>{status}{severity}</div>
        </div>
        <div class="space-x-2">
            <button hx-get="/disease-history/{id}/edit" hx-target="#modal" class="text-medical-blue"><i class="fas fa-edit"></i></button>
            <button hx-delete="/disease-history/{id}" hx-confirm="Are you sure you want to delete this disease history record?" hx-target="#notices" class="text-medical-red"><i class="fas fa-trash"></i></button>
        </div>
    </div>
    <div class="grid grid-cols-1 md:grid-cols-2 gap-4 text-sm">{details}</div>{notes}
</div>"##,
        id = escape(&disease.id),
        name = escape(&disease.disease_name),
        diagnosed = date_or(disease.diagnosis_date, "No date"),
        status = badge(status_style(status), status),
        severity = severity,
        details = details,
        notes = notes,
    )
}

/// `<option>` list for patient pickers, sorted by last then first name.
pub fn patient_options(patients: &[Patient], selected: Option<&str>) -> String {
    let mut sorted: Vec<&Patient> = patients.iter().collect();
    sorted.sort_by(|a, b| {
        (a.last_name.as_str(), a.first_name.as_str()).cmp(&(b.last_name.as_str(), b.first_name.as_str()))
    });
    let options: String = sorted
        .iter()
        .map(|patient| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&patient.id),
                if selected == Some(patient.id.as_str()) { " selected" } else { "" },
                escape(&patient.full_name())
            )
        })
        .collect();
    format!(r#"<option value="">Select Patient</option>{}"#, options)
}

fn modal_form(title: &str, action: &str, fields: &str, submit: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-lg shadow-lg p-6">
    <h3 class="text-xl font-semibold mb-4">{title}</h3>
    <form class="grid grid-cols-1 md:grid-cols-2 gap-4" hx-post="{action}" hx-target="#notices">{fields}
        <div class="md:col-span-2 flex justify-end space-x-2"><button type="submit" class="bg-medical-blue text-white px-4 py-2 rounded-lg">{submit}</button></div>
    </form>
</div>"##,
        title = title,
        action = action,
        fields = fields,
        submit = submit,
    )
}

/// Add form, or the edit form prefilled from `patient`.
pub fn patient_form(patient: Option<&Patient>) -> String {
    let blank = Patient::default();
    let p = patient.unwrap_or(&blank);
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let fields = [
        input("first_name", "First Name", "text", &p.first_name),
        input("last_name", "Last Name", "text", &p.last_name),
        input("date_of_birth", "Date of Birth", "date", &dates::input_value(p.date_of_birth)),
        select("gender", "Gender", &GENDERS, &opt(&p.gender)),
        input("phone", "Phone", "tel", &opt(&p.phone)),
        input("email", "Email", "email", &opt(&p.email)),
        input("address", "Address", "text", &opt(&p.address)),
        select("blood_type", "Blood Type", &BLOOD_TYPES, &opt(&p.blood_type)),
        input("emergency_contact", "Emergency Contact", "text", &opt(&p.emergency_contact)),
        input("insurance_info", "Insurance", "text", &opt(&p.insurance_info)),
        textarea("allergies", "Allergies", &opt(&p.allergies)),
        textarea("notes", "Notes", &opt(&p.notes)),
    ]
    .concat();
    match patient {
        Some(p) => modal_form(
            "Edit Patient",
            &format!("/patients/{}", escape(&p.id)),
            &fields,
            "Save Patient",
        ),
        None => modal_form("Add New Patient", "/patients", &fields, "Save Patient"),
    }
}

/// Add form for `patient_id`, or the edit form prefilled from `disease`.
pub fn disease_form(patient_id: &str, disease: Option<&DiseaseHistory>) -> String {
    let blank = DiseaseHistory::default();
    let d = disease.unwrap_or(&blank);
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let fields = [
        input("disease_name", "Disease/Condition", "text", &d.disease_name),
        input("diagnosis_date", "Diagnosis Date", "date", &dates::input_value(d.diagnosis_date)),
        select("status", "Status", &DISEASE_STATUSES, label(d.status.as_ref())),
        select("severity", "Severity", &SEVERITIES, label(d.severity.as_ref())),
        textarea("symptoms", "Symptoms", &opt(&d.symptoms)),
        textarea("treatment", "Treatment", &opt(&d.treatment)),
        input("medication", "Medication", "text", &opt(&d.medication)),
        input("doctor_name", "Doctor", "text", &opt(&d.doctor_name)),
        input("follow_up_date", "Follow-up Date", "date", &dates::input_value(d.follow_up_date)),
        textarea("notes", "Notes", &opt(&d.notes)),
    ]
    .concat();
    match disease {
        Some(d) => modal_form(
            "Edit Disease History",
            &format!("/disease-history/{}", escape(&d.id)),
            &fields,
            "Save Condition",
        ),
        None => modal_form(
            "Add Disease History",
            &format!("/patients/{}/disease-history", escape(patient_id)),
            &fields,
            "Save Condition",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, DiseaseStatus, Severity};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ada() -> Patient {
        Patient {
            id: "p1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 10, 20),
            email: Some("ada@example.org".into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_registry_prompts_to_add() {
        assert!(patient_table(&[], &[], today()).contains("No patients found"));
    }

    #[test]
    fn rows_show_age_and_last_visit() {
        let visit = Appointment {
            id: "a1".into(),
            patient_id: "p1".into(),
            appointment_date: NaiveDate::from_ymd_opt(2026, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0),
            status: Some(AppointmentStatus::Completed),
            ..Default::default()
        };
        let patient = ada();
        let html = patient_table(&[&patient], &[visit], today());
        // Birthday is tomorrow.
        assert!(html.contains("35 years"));
        assert!(html.contains("03/04/2026"));
        assert!(html.contains("N/A"));
        assert!(html.contains("Unknown</span>"));
    }

    #[test]
    fn patients_without_visits_say_so() {
        let patient = Patient {
            date_of_birth: None,
            ..ada()
        };
        let html = patient_row(&patient, &[], today());
        assert!(html.contains("No visits"));
        assert!(html.contains("Unknown years"));
    }

    #[test]
    fn names_are_escaped() {
        let patient = Patient {
            first_name: "<img src=x>".into(),
            ..ada()
        };
        let html = patient_row(&patient, &[], today());
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x&gt;"));
    }

    #[test]
    fn disease_cards_style_status_and_severity() {
        let disease = DiseaseHistory {
            id: "d1".into(),
            patient_id: "p1".into(),
            disease_name: "Asthma".into(),
            status: Some(DiseaseStatus::Chronic),
            severity: Some(Severity::Other("Unusual".into())),
            symptoms: Some("Wheezing".into()),
            ..Default::default()
        };
        let html = disease_history(&ada(), &[&disease]);
        assert!(html.contains("bg-yellow-100 text-yellow-800"));
        assert!(html.contains("bg-gray-100 text-gray-800\">Unusual"));
        assert!(html.contains("Wheezing"));
        assert!(html.contains("No date"));
        assert!(!html.contains("Treatment"));
    }

    #[test]
    fn registry_search_keeps_the_query_and_targets_the_table() {
        let patient = ada();
        let html = patient_registry(&[&patient], &[], today(), "love\"lace");
        assert!(html.contains(r#"value="love&quot;lace""#));
        assert!(html.contains(r##"hx-get="/patients" hx-trigger="keyup changed delay:300ms, search" hx-target="#patient-table""##));
        assert!(html.contains(r#"hx-get="/patients/new""#));
        assert!(html.contains(r#"<div id="patient-table">"#));
        assert!(html.contains(r#"hx-get="/patients/p1/edit""#));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let patient = Patient {
            gender: Some("Female".into()),
            blood_type: Some("AB-".into()),
            allergies: Some("Penicillin".into()),
            ..ada()
        };
        let html = patient_form(Some(&patient));
        assert!(html.contains("Edit Patient"));
        assert!(html.contains(r#"hx-post="/patients/p1""#));
        assert!(html.contains(r#"name="first_name" value="Ada""#));
        assert!(html.contains(r#"name="date_of_birth" value="1990-10-20""#));
        assert!(html.contains("<option selected>Female</option>"));
        assert!(html.contains("<option selected>AB-</option>"));
        assert!(html.contains(">Penicillin</textarea>"));

        let html = patient_form(None);
        assert!(html.contains("Add New Patient"));
        assert!(html.contains(r#"hx-post="/patients""#));
        assert!(html.contains(r#"name="date_of_birth" value="""#));
    }

    #[test]
    fn disease_forms_post_to_the_right_route() {
        let disease = DiseaseHistory {
            id: "d1".into(),
            patient_id: "p1".into(),
            disease_name: "Asthma".into(),
            diagnosis_date: NaiveDate::from_ymd_opt(2024, 2, 29),
            status: Some(DiseaseStatus::UnderTreatment),
            severity: Some(Severity::Mild),
            ..Default::default()
        };
        let html = disease_form("p1", Some(&disease));
        assert!(html.contains(r#"hx-post="/disease-history/d1""#));
        assert!(html.contains(r#"name="diagnosis_date" value="2024-02-29""#));
        assert!(html.contains("<option selected>Under Treatment</option>"));
        assert!(html.contains("<option selected>Mild</option>"));

        let html = disease_form("p1", None);
        assert!(html.contains(r#"hx-post="/patients/p1/disease-history""#));
        assert!(html.contains(r#"name="disease_name" value="""#));
    }

    #[test]
    fn history_offers_add_and_edit() {
        let disease = DiseaseHistory {
            id: "d1".into(),
            patient_id: "p1".into(),
            disease_name: "Asthma".into(),
            ..Default::default()
        };
        let html = disease_history(&ada(), &[&disease]);
        assert!(html.contains(r#"hx-get="/patients/p1/disease-history/new""#));
        assert!(html.contains(r#"hx-get="/disease-history/d1/edit""#));
        assert!(disease_history(&ada(), &[]).contains("Add Condition"));
    }

    #[test]
    fn options_mark_the_selected_patient() {
        let html = patient_options(&[ada()], Some("p1"));
        assert!(html.contains(r#"<option value="p1" selected>Ada Lovelace</option>"#));
    }
}
