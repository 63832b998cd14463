//! Badge and text classes for categorical values.
//!
//! Lookups never fail: anything unrecognized, including an empty string,
//! gets the neutral style.

pub const NEUTRAL_BADGE: &str = "bg-gray-100 text-gray-800";
pub const NEUTRAL_TEXT: &str = "text-gray-600";

/// Badge classes for disease, appointment, medication, lab and message
/// statuses.
pub fn status_style(status: &str) -> &'static str {
    match status {
        "Active" | "Cancelled" | "Critical" => "bg-red-100 text-red-800",
        "Recovered" | "Confirmed" | "Normal" => "bg-green-100 text-green-800",
        "Chronic" | "In Progress" | "Pending" | "On Hold" => "bg-yellow-100 text-yellow-800",
        "Under Treatment" | "Scheduled" | "Unread" => "bg-blue-100 text-blue-800",
        "Remission" | "Replied" => "bg-purple-100 text-purple-800",
        "No Show" | "Abnormal" => "bg-orange-100 text-orange-800",
        _ => NEUTRAL_BADGE,
    }
}

pub fn severity_style(severity: &str) -> &'static str {
    match severity {
        "Mild" => "bg-green-100 text-green-800",
        "Moderate" => "bg-yellow-100 text-yellow-800",
        "Severe" => "bg-orange-100 text-orange-800",
        "Critical" => "bg-red-100 text-red-800",
        _ => NEUTRAL_BADGE,
    }
}

pub fn adherence_style(adherence: &str) -> &'static str {
    match adherence {
        "Excellent" => "text-green-600",
        "Good" => "text-blue-600",
        "Fair" => "text-yellow-600",
        "Poor" => "text-red-600",
        _ => NEUTRAL_TEXT,
    }
}
