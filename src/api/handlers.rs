//! Request handlers. Each one delegates to the shared [`Dashboard`] and
//! answers an HTML fragment, except `/api/stats` and `/metrics`.

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::core::aggregate::AppointmentFilter;
use crate::core::controller::{Dashboard, Notice};
use crate::core::view::{EhrTab, Section};
use crate::error::{ClinicError, Result};
use crate::models::forms::{
    AppointmentForm, DiseaseForm, LabResultForm, MedicationForm, MessageForm, PatientForm,
    VitalsForm,
};
use crate::models::AppointmentStatus;
use crate::render;
use crate::store::Resource;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Notice fragment; successful mutations also ask the shell to reload.
fn notice(notice: Notice) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::html());
    if notice.is_success() {
        response.insert_header(("HX-Trigger", "clinic-refresh"));
    }
    response.body(render::notice(&notice))
}

const SHELL: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Clinic EHR</title>
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
<script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-100">
<nav class="bg-white shadow px-6 py-4 flex space-x-6">{nav}</nav>
<div id="notices"></div>
<main id="main" class="p-6" hx-get="/sections/current" hx-trigger="clinic-refresh from:body">{main}</main>
<div id="modal" class="p-6"></div>
</body>
</html>"##;

pub async fn shell(dashboard: web::Data<Dashboard>) -> HttpResponse {
    let nav: String = Section::ALL
        .iter()
        .map(|s| {
            format!(
                r##"<button hx-get="/sections/{}" hx-target="#main" class="text-gray-700 hover:text-medical-blue">{}</button>"##,
                s.slug(),
                s.title()
            )
        })
        .collect();
    let main = dashboard.render_section(Section::Dashboard).await;
    html(SHELL.replace("{nav}", &nav).replace("{main}", &main))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn metrics() -> HttpResponse {
    let body = super::PROMETHEUS
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body)
}

pub async fn stats(dashboard: web::Data<Dashboard>) -> HttpResponse {
    HttpResponse::Ok().json(dashboard.stats().await)
}

pub async fn refresh(dashboard: web::Data<Dashboard>) -> HttpResponse {
    notice(dashboard.refresh().await)
}

pub async fn section(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let section: Section = path.parse()?;
    Ok(html(dashboard.render_section(section).await))
}

/// Re-render of the showing section after a mutation.
pub async fn current_section(dashboard: web::Data<Dashboard>) -> HttpResponse {
    html(dashboard.render_current().await)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search_patients(
    dashboard: web::Data<Dashboard>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    html(dashboard.search(&query.q).await)
}

pub async fn patient_details(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(html(dashboard.render_patient_details(&path).await?))
}

pub async fn new_patient_form(dashboard: web::Data<Dashboard>) -> Result<HttpResponse> {
    Ok(html(dashboard.render_patient_form(None).await?))
}

pub async fn edit_patient_form(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(html(dashboard.render_patient_form(Some(path.as_str())).await?))
}

pub async fn create_patient(
    dashboard: web::Data<Dashboard>,
    form: web::Form<PatientForm>,
) -> HttpResponse {
    notice(dashboard.save_patient(None, &form).await)
}

pub async fn update_patient(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
    form: web::Form<PatientForm>,
) -> HttpResponse {
    notice(dashboard.save_patient(Some(path.as_str()), &form).await)
}

pub async fn delete_patient(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> HttpResponse {
    notice(dashboard.delete_patient(&path).await)
}

pub async fn patient_ehr(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(html(dashboard.render_ehr(&path, None).await?))
}

pub async fn patient_ehr_tab(
    dashboard: web::Data<Dashboard>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (id, tab) = path.into_inner();
    let tab: EhrTab = tab.parse()?;
    Ok(html(dashboard.render_ehr(&id, Some(tab)).await?))
}

pub async fn disease_history(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(html(dashboard.render_disease_history(&path).await?))
}

pub async fn new_disease_form(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(html(dashboard.render_add_disease(&path).await?))
}

pub async fn edit_disease_form(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(html(dashboard.render_edit_disease(&path).await?))
}

pub async fn create_disease(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
    form: web::Form<DiseaseForm>,
) -> HttpResponse {
    notice(dashboard.save_disease(&path, None, &form).await)
}

pub async fn update_disease(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
    form: web::Form<DiseaseForm>,
) -> Result<HttpResponse> {
    let owner = dashboard
        .cache()
        .await
        .disease(&path)
        .map(|d| d.patient_id.clone())
        .ok_or_else(|| ClinicError::not_found(Resource::DiseaseHistory, path.as_str()))?;
    Ok(notice(dashboard.save_disease(&owner, Some(path.as_str()), &form).await))
}

pub async fn delete_disease(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> HttpResponse {
    notice(dashboard.delete_disease(&path).await)
}

pub async fn record_vitals(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
    form: web::Form<VitalsForm>,
) -> HttpResponse {
    notice(dashboard.record_vitals(&path, &form).await)
}

pub async fn delete_vitals(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
) -> HttpResponse {
    notice(dashboard.delete_vitals(&path).await)
}

pub async fn add_medication(
    dashboard: web::Data<Dashboard>,
    path: web::Path<String>,
    form: web::Form<MedicationForm>,
) -> HttpResponse {
    notice(dashboard.save_medication(&path, &form).await)
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub status: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub patient_id: Option<String>,
}

impl AppointmentQuery {
    pub fn to_filter(&self) -> Result<AppointmentFilter> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let date = match present(&self.date) {
            None => None,
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                ClinicError::Validation(format!("date is not a date: {}", raw))
            })?),
        };
        Ok(AppointmentFilter {
            status: present(&self.status).map(AppointmentStatus::from),
            date,
            patient_id: present(&self.patient_id),
        })
    }
}

pub async fn appointments(
    dashboard: web::Data<Dashboard>,
    query: web::Query<AppointmentQuery>,
) -> Result<HttpResponse> {
    let filter = query.to_filter()?;
    Ok(html(dashboard.render_appointments(&filter).await))
}

pub async fn schedule_appointment(
    dashboard: web::Data<Dashboard>,
    form: web::Form<AppointmentForm>,
) -> HttpResponse {
    notice(dashboard.schedule_appointment(&form).await)
}

pub async fn add_lab_result(
    dashboard: web::Data<Dashboard>,
    form: web::Form<LabResultForm>,
) -> HttpResponse {
    notice(dashboard.save_lab_result(&form).await)
}

pub async fn send_message(
    dashboard: web::Data<Dashboard>,
    form: web::Form<MessageForm>,
) -> HttpResponse {
    notice(dashboard.send_message(&form).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_fields_do_not_filter() {
        let query = AppointmentQuery {
            status: Some("".into()),
            date: Some(" ".into()),
            patient_id: None,
        };
        let filter = query.to_filter().unwrap();
        assert!(filter.status.is_none() && filter.date.is_none() && filter.patient_id.is_none());
    }

    #[test]
    fn unknown_statuses_filter_verbatim() {
        let query = AppointmentQuery {
            status: Some("Rescheduled".into()),
            ..Default::default()
        };
        assert_eq!(
            query.to_filter().unwrap().status,
            Some(AppointmentStatus::Other("Rescheduled".into()))
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let query = AppointmentQuery {
            date: Some("10/19/2026".into()),
            ..Default::default()
        };
        assert!(matches!(query.to_filter(), Err(ClinicError::Validation(_))));
    }
}
