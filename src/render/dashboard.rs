//! Dashboard section: stat cards, today's schedule, alerts, analytics.

use super::{badge, empty_state, escape, label, status_style, text_or};
use crate::core::aggregate::{Alert, AlertKind, Analytics, DashboardStats, ScheduleEntry};
use crate::models::dates;

/// Alerts shown on the dashboard; the rest are dropped.
pub const MAX_ALERTS: usize = 5;

pub fn stat_cards(stats: &DashboardStats) -> String {
    let cards = [
        ("Total Patients", stats.total_patients, "fa-users", "text-medical-blue"),
        ("Today's Appointments", stats.today_appointments, "fa-calendar-day", "text-medical-green"),
        ("Active Cases", stats.active_cases, "fa-procedures", "text-medical-red"),
        ("Follow-ups Due", stats.follow_ups_due, "fa-calendar-check", "text-yellow-600"),
        ("Active Medications", stats.active_medications, "fa-pills", "text-medical-purple"),
        ("Pending Labs", stats.pending_labs, "fa-flask", "text-orange-600"),
        ("Unread Messages", stats.unread_messages, "fa-envelope", "text-blue-600"),
    ];
    let cards: String = cards
        .iter()
        .map(|(title, value, icon, color)| {
            format!(
                r#"<div class="bg-white rounded-lg shadow p-4"><div class="flex items-center"><i class="fas {icon} {color} text-2xl mr-3"></i><div><p class="text-sm text-gray-600">{title}</p><p class="text-2xl font-semibold">{value}</p></div></div></div>"#,
                icon = icon,
                color = color,
                title = title,
                value = value,
            )
        })
        .collect();
    format!(
        r#"<div class="grid grid-cols-2 md:grid-cols-4 lg:grid-cols-7 gap-4" id="stats">{}</div>"#,
        cards
    )
}

pub fn todays_schedule(entries: &[ScheduleEntry<'_>]) -> String {
    if entries.is_empty() {
        return empty_state("No appointments scheduled for today");
    }
    entries
        .iter()
        .map(|entry| {
            let status = label(entry.appointment.status.as_ref());
            format!(
                r#"<div class="flex items-center justify-between p-3 bg-gray-50 rounded-lg"><div><div class="font-medium">{time} - {name}</div><div class="text-sm text-gray-600">{kind} • {doctor}</div></div>{badge}</div>"#,
                time = dates::format_time(entry.at),
                name = escape(&entry.patient_name),
                kind = text_or(entry.appointment.appointment_type.as_deref(), "Visit"),
                doctor = text_or(entry.appointment.doctor_name.as_deref(), "Dr. TBD"),
                badge = badge(status_style(status), status),
            )
        })
        .collect()
}

/// The first [`MAX_ALERTS`] alerts.
pub fn alerts(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return empty_state("No critical alerts at this time");
    }
    alerts
        .iter()
        .take(MAX_ALERTS)
        .map(|alert| {
            let (frame, text) = match alert.kind {
                AlertKind::Critical => ("bg-red-50 border-red-400", "text-red-800"),
                AlertKind::Warning => ("bg-yellow-50 border-yellow-400", "text-yellow-800"),
            };
            format!(
                r#"<div class="flex items-center p-3 border-l-4 rounded {frame}"><i class="fas {icon} mr-3 {text}"></i><span class="text-sm {text}">{message}</span></div>"#,
                frame = frame,
                icon = alert.icon,
                text = text,
                message = escape(&alert.message),
            )
        })
        .collect()
}

fn breakdown(title: &str, rows: &[(String, usize)]) -> String {
    let body = if rows.is_empty() {
        r#"<tr><td class="px-4 py-2 text-sm text-gray-500" colspan="2">No data</td></tr>"#.to_string()
    } else {
        rows.iter()
            .map(|(name, count)| {
                format!(
                    r#"<tr><td class="px-4 py-2 text-sm">{}</td><td class="px-4 py-2 text-sm text-right">{}</td></tr>"#,
                    escape(name),
                    count
                )
            })
            .collect()
    };
    format!(
        r#"<div class="bg-white rounded-lg shadow p-6"><h3 class="text-lg font-semibold mb-4">{}</h3><table class="min-w-full"><tbody>{}</tbody></table></div>"#,
        title, body
    )
}

pub fn analytics(analytics: &Analytics) -> String {
    format!(
        r#"<div class="grid grid-cols-1 lg:grid-cols-2 gap-6">{}{}{}{}</div>"#,
        breakdown("Patient Demographics", &analytics.gender),
        breakdown("Top Conditions", &analytics.conditions),
        breakdown("Medication Adherence", &analytics.adherence),
        breakdown("Appointment Status", &analytics.appointment_status),
    )
}

/// The whole dashboard section.
pub fn dashboard(stats: &DashboardStats, schedule: &[ScheduleEntry<'_>], alert_list: &[Alert]) -> String {
    format!(
        r#"{stats}<div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mt-6"><div class="bg-white rounded-lg shadow p-6"><h3 class="text-lg font-semibold mb-4">Today's Schedule</h3><div id="todays-schedule" class="space-y-3">{schedule}</div></div><div class="bg-white rounded-lg shadow p-6"><h3 class="text-lg font-semibold mb-4">Critical Alerts</h3><div id="critical-alerts" class="space-y-3">{alerts}</div></div></div>"#,
        stats = stat_cards(stats),
        schedule = todays_schedule(schedule),
        alerts = alerts(alert_list),
    )
}
