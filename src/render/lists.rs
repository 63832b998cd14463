//! Appointment, lab result and message sections.

use super::patients::patient_options;
use super::{badge, day_or, empty_state, escape, input, label, status_style, text_or};
use crate::cache::DataCache;
use crate::models::{dates, Appointment, LabResult, Message, Patient};

fn section_table(headers: &[&str], rows: &str) -> String {
    let head: String = headers
        .iter()
        .map(|h| {
            format!(
                r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{}</th>"#,
                h
            )
        })
        .collect();
    format!(
        r#"<div class="overflow-x-auto"><table class="min-w-full divide-y divide-gray-200"><thead class="bg-gray-50"><tr>{}</tr></thead><tbody class="bg-white divide-y divide-gray-200">{}</tbody></table></div>"#,
        head, rows
    )
}

fn td(value: &str) -> String {
    format!(r#"<td class="px-6 py-4 whitespace-nowrap text-sm">{}</td>"#, value)
}

fn form(action: &str, fields: &[(&str, &str, &str)], leading: &str, submit: &str) -> String {
    let inputs: String = fields
        .iter()
        .map(|(name, title, kind)| input(name, title, kind, ""))
        .collect();
    format!(
        r##"<form class="grid grid-cols-1 md:grid-cols-3 gap-3 mb-6" hx-post="{}" hx-target="#notices">{}{}<button type="submit" class="bg-medical-blue text-white px-4 py-2 rounded">{}</button></form>"##,
        action, leading, inputs, submit
    )
}

fn patient_picker(patients: &[Patient]) -> String {
    format!(
        r#"<label class="text-sm">Patient<select name="patient_id" class="w-full border rounded px-2 py-1" required>{}</select></label>"#,
        patient_options(patients, None)
    )
}

pub fn appointment_form(patients: &[Patient]) -> String {
    form(
        "/appointments",
        &[
            ("date", "Date", "date"),
            ("time", "Time", "time"),
            ("duration", "Duration (min)", "number"),
            ("appointment_type", "Type", "text"),
            ("doctor_name", "Doctor", "text"),
            ("chief_complaint", "Chief Complaint", "text"),
            ("notes", "Notes", "text"),
        ],
        &patient_picker(patients),
        "Schedule Appointment",
    )
}

/// Appointments as given, with patient names resolved from the cache.
pub fn appointment_list(cache: &DataCache, appointments: &[&Appointment]) -> String {
    if appointments.is_empty() {
        return empty_state("No appointments found");
    }
    let rows: String = appointments
        .iter()
        .map(|a| {
            let status = label(a.status.as_ref());
            let (date, time) = a.appointment_date.map_or_else(
                || ("-".to_string(), String::new()),
                |ts| (dates::format_date(ts.date()), dates::format_time(ts)),
            );
            [
                "<tr>".to_string(),
                td(&format!("{} {}", date, time)),
                td(&escape(&cache.patient_name(&a.patient_id))),
                td(&text_or(a.appointment_type.as_deref(), "-")),
                td(&text_or(a.doctor_name.as_deref(), "Dr. TBD")),
                td(&a.duration.map_or_else(|| "-".to_string(), |d| format!("{} min", d))),
                td(&badge(status_style(status), status)),
                "</tr>".to_string(),
            ]
            .concat()
        })
        .collect();
    section_table(&["When", "Patient", "Type", "Doctor", "Duration", "Status"], &rows)
}

pub fn lab_result_form(patients: &[Patient]) -> String {
    form(
        "/lab-results",
        &[
            ("test_name", "Test", "text"),
            ("result_value", "Result", "text"),
            ("unit", "Unit", "text"),
            ("reference_range", "Reference Range", "text"),
            ("status", "Status", "text"),
            ("test_date", "Test Date", "date"),
            ("ordered_by", "Ordered By", "text"),
        ],
        &patient_picker(patients),
        "Add Lab Result",
    )
}

/// Lab results, most recent test first.
pub fn lab_result_list(cache: &DataCache, results: &[LabResult]) -> String {
    if results.is_empty() {
        return empty_state("No lab results found");
    }
    let mut sorted: Vec<&LabResult> = results.iter().collect();
    sorted.sort_by(|a, b| b.test_date.cmp(&a.test_date));
    let rows: String = sorted
        .iter()
        .map(|l| {
            let status = label(l.status.as_ref());
            let value = [l.result_value.as_deref(), l.unit.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            [
                "<tr>".to_string(),
                td(&day_or(l.test_date, "-")),
                td(&escape(&cache.patient_name(&l.patient_id))),
                td(&escape(&l.test_name)),
                td(&text_or(Some(value.as_str()), "-")),
                td(&text_or(l.reference_range.as_deref(), "-")),
                td(&badge(status_style(status), status)),
                "</tr>".to_string(),
            ]
            .concat()
        })
        .collect();
    section_table(&["Date", "Patient", "Test", "Result", "Reference", "Status"], &rows)
}

pub fn message_form(patients: &[Patient]) -> String {
    form(
        "/messages",
        &[
            ("sender", "From", "text"),
            ("recipient", "To", "text"),
            ("subject", "Subject", "text"),
            ("body", "Message", "text"),
            ("priority", "Priority", "text"),
        ],
        &patient_picker(patients),
        "Send Message",
    )
}

/// Messages, newest first; unread ones are bold.
pub fn message_list(cache: &DataCache, messages: &[Message]) -> String {
    if messages.is_empty() {
        return empty_state("No messages");
    }
    let mut sorted: Vec<&Message> = messages.iter().collect();
    sorted.sort_by(|a, b| b.sent_date.cmp(&a.sent_date));
    let items: String = sorted
        .iter()
        .map(|message| {
            let status = label(message.status.as_ref());
            let weight = if status == "Unread" { "font-semibold" } else { "" };
            format!(
                r#"<div class="border rounded-lg p-4 {weight}"><div class="flex justify-between"><span>{subject}</span>{badge}</div><div class="text-sm text-gray-600">{sender} → {recipient} • {patient} • {sent}</div><p class="text-sm mt-2">{body}</p></div>"#,
                weight = weight,
                subject = text_or(message.subject.as_deref(), "(no subject)"),
                badge = badge(status_style(status), status),
                sender = text_or(message.sender.as_deref(), "Unknown"),
                recipient = text_or(message.recipient.as_deref(), "Unknown"),
                patient = escape(&cache.patient_name(&message.patient_id)),
                sent = day_or(message.sent_date, "-"),
                body = text_or(message.body.as_deref(), ""),
            )
        })
        .collect();
    format!(r#"<div class="space-y-3">{}</div>"#, items)
}
