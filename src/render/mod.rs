//! HTML fragments for the dashboard.
//!
//! Renderers are pure: they take cached records (and a reference date where
//! age or "today" matters) and return markup. Every interpolated value goes
//! through [`escape`].

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::controller::{Notice, NoticeKind};
use crate::models::dates;

pub mod dashboard;
pub mod ehr;
pub mod lists;
pub mod patients;
pub mod styles;

pub use styles::{adherence_style, severity_style, status_style};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn text_or(value: Option<&str>, fallback: &str) -> String {
    escape(value.filter(|v| !v.trim().is_empty()).unwrap_or(fallback))
}

/// Raw label of an open enumeration, empty when absent.
pub(crate) fn label<T: AsRef<str>>(value: Option<&T>) -> &str {
    value.map_or("", AsRef::as_ref)
}

pub(crate) fn label_or<T: AsRef<str>>(value: Option<&T>, fallback: &str) -> String {
    text_or(value.map(AsRef::as_ref), fallback)
}

pub(crate) fn number_or(value: Option<f64>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |n| n.to_string())
}

pub(crate) fn date_or(value: Option<NaiveDate>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), dates::format_date)
}

pub(crate) fn day_or(value: Option<NaiveDateTime>, fallback: &str) -> String {
    date_or(value.map(|ts| ts.date()), fallback)
}

pub(crate) fn empty_state(message: &str) -> String {
    format!(
        r#"<p class="text-gray-500 text-sm">{}</p>"#,
        escape(message)
    )
}

pub(crate) fn badge(class: &str, text: &str) -> String {
    format!(
        r#"<span class="px-2 py-1 text-xs rounded-full {}">{}</span>"#,
        class,
        escape(text)
    )
}

pub(crate) fn input(name: &str, title: &str, kind: &str, value: &str) -> String {
    format!(
        r#"<label class="text-sm">{title}<input type="{kind}" name="{name}" value="{value}" class="w-full border rounded px-2 py-1"></label>"#,
        title = title,
        kind = kind,
        name = name,
        value = escape(value),
    )
}

pub(crate) fn textarea(name: &str, title: &str, value: &str) -> String {
    format!(
        r#"<label class="text-sm md:col-span-2">{title}<textarea name="{name}" rows="2" class="w-full border rounded px-2 py-1">{value}</textarea></label>"#,
        title = title,
        name = name,
        value = escape(value),
    )
}

/// `<select>` over fixed labels. A stored value outside `choices` is kept
/// as an extra option so editing does not silently change it.
pub(crate) fn select(name: &str, title: &str, choices: &[&str], selected: &str) -> String {
    let mut options = String::from(r#"<option value="">Select</option>"#);
    if !selected.is_empty() && !choices.contains(&selected) {
        options.push_str(&format!(r#"<option selected>{}</option>"#, escape(selected)));
    }
    options.extend(choices.iter().map(|choice| {
        format!(
            r#"<option{}>{}</option>"#,
            if *choice == selected { " selected" } else { "" },
            choice
        )
    }));
    format!(
        r#"<label class="text-sm">{}<select name="{}" class="w-full border rounded px-2 py-1">{}</select></label>"#,
        title, name, options
    )
}

/// Transient notice shown after a mutation.
pub fn notice(notice: &Notice) -> String {
    let (class, icon) = match notice.kind {
        NoticeKind::Success => ("bg-green-500", "fa-check-circle"),
        NoticeKind::Error => ("bg-red-500", "fa-exclamation-circle"),
    };
    format!(
        r#"<div class="notice fixed top-4 right-4 z-50 px-6 py-3 rounded-lg shadow-lg text-white {class}" role="status">
    <div class="flex items-center space-x-2"><i class="fas {icon}"></i><span>{message}</span></div>
</div>"#,
        class = class,
        icon = icon,
        message = escape(&notice.message),
    )
}
