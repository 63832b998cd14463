//! Dashboard controller
//!
//! Owns the table store handle, the cache and the view state. Every
//! mutation goes to the store first and, once it succeeds, reloads the whole
//! cache. Failures are logged with their cause and reported to the user as
//! a generic notice.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{error, info, instrument, warn};

use crate::cache::{DataCache, RefreshReport};
use crate::core::aggregate::{
    analytics, critical_alerts, dashboard_stats, filter_appointments, search_patients,
    todays_schedule, AppointmentFilter, DashboardStats,
};
use crate::core::view::{EhrTab, Section, Upsert, ViewState};
use crate::error::{ClinicError, Result};
use crate::models::forms::{
    AppointmentForm, DiseaseForm, LabResultForm, MedicationForm, MessageForm, PatientForm,
    VitalsForm,
};
use crate::models::DiseaseHistory;
use crate::render;
use crate::store::{fetch_all, upsert, Resource, TableStore};

/// Author recorded on appointments when none is configured.
pub const DEFAULT_AUTHOR: &str = "Current User";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Outcome of a user action, shown as a transient banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn count_mutation(action: &'static str, notice: &Notice) {
    let outcome = if notice.is_success() { "success" } else { "error" };
    metrics::increment_counter!(
        "clinic_mutations_total",
        "action" => action,
        "outcome" => outcome
    );
}

/// Lock order is view state first, then cache.
pub struct Dashboard {
    store: Arc<dyn TableStore>,
    cache: RwLock<DataCache>,
    view: Mutex<ViewState>,
    created_by: String,
}

impl Dashboard {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(DataCache::default()),
            view: Mutex::new(ViewState::default()),
            created_by: DEFAULT_AUTHOR.to_string(),
        }
    }

    pub fn with_author(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Replace the cache with a fresh copy of every table.
    pub async fn load_all(&self) -> RefreshReport {
        let (fresh, report) = DataCache::load_all(self.store.as_ref()).await;
        *self.cache.write().await = fresh;
        if !report.is_complete() {
            warn!(failed = ?report.failed, "some tables could not be loaded");
        }
        report
    }

    /// `load_all` as a user action.
    pub async fn refresh(&self) -> Notice {
        let report = self.load_all().await;
        let notice = if report.is_complete() {
            Notice::success("Data refreshed")
        } else {
            Notice::error("Error loading application data")
        };
        count_mutation("refresh", &notice);
        notice
    }

    pub async fn cache(&self) -> RwLockReadGuard<'_, DataCache> {
        self.cache.read().await
    }

    pub async fn view(&self) -> ViewState {
        self.view.lock().await.clone()
    }

    pub async fn stats(&self) -> DashboardStats {
        dashboard_stats(&*self.cache.read().await, now())
    }

    pub async fn render_section(&self, section: Section) -> String {
        let query = {
            let mut view = self.view.lock().await;
            view.show_section(section);
            view.search_query.clone()
        };
        let cache = self.cache.read().await;
        let now = now();
        let today = now.date();

        let body = match section {
            Section::Dashboard => render::dashboard::dashboard(
                &dashboard_stats(&cache, now),
                &todays_schedule(&cache, today),
                &critical_alerts(&cache, now),
            ),
            Section::Patients => {
                let hits = search_patients(&cache.patients, &query);
                render::patients::patient_registry(&hits, &cache.appointments, today, &query)
            }
            Section::Appointments => {
                let all = filter_appointments(&cache.appointments, &AppointmentFilter::default());
                render::lists::appointment_form(&cache.patients)
                    + &render::lists::appointment_list(&cache, &all)
            }
            Section::LabResults => {
                render::lists::lab_result_form(&cache.patients)
                    + &render::lists::lab_result_list(&cache, &cache.lab_results)
            }
            Section::Messages => {
                render::lists::message_form(&cache.patients)
                    + &render::lists::message_list(&cache, &cache.messages)
            }
            Section::Analytics => render::dashboard::analytics(&analytics(&cache)),
        };
        format!(
            r#"<section id="{}"><h2 class="text-2xl font-bold text-gray-800 mb-6">{}</h2>{}</section>"#,
            section.slug(),
            section.title(),
            body
        )
    }

    /// Whichever section is showing, with its search query intact.
    pub async fn render_current(&self) -> String {
        let section = self.view.lock().await.section;
        self.render_section(section).await
    }

    /// Patient table filtered by `query`; a blank query lists everyone.
    pub async fn search(&self, query: &str) -> String {
        {
            let mut view = self.view.lock().await;
            view.show_section(Section::Patients);
            view.search_query = query.trim().to_string();
        }
        let cache = self.cache.read().await;
        let hits = search_patients(&cache.patients, query);
        render::patients::patient_table(&hits, &cache.appointments, now().date())
    }

    /// Record view of a patient. Without a tab the view opens on the overview.
    pub async fn render_ehr(&self, patient_id: &str, tab: Option<EhrTab>) -> Result<String> {
        let mut view = self.view.lock().await;
        let cache = self.cache.read().await;
        let patient = cache
            .patient(patient_id)
            .ok_or_else(|| ClinicError::not_found(Resource::Patients, patient_id))?;

        if tab.is_none() || view.current_patient_id.as_deref() != Some(patient_id) {
            view.open_patient_ehr(patient_id);
        }
        if let Some(tab) = tab {
            view.switch_tab(tab);
        }
        Ok(render::ehr::patient_ehr(&cache, patient, view.ehr_tab, now().date()))
    }

    pub async fn render_patient_details(&self, patient_id: &str) -> Result<String> {
        let cache = self.cache.read().await;
        let patient = cache
            .patient(patient_id)
            .ok_or_else(|| ClinicError::not_found(Resource::Patients, patient_id))?;
        Ok(render::patients::patient_details(
            patient,
            &cache.disease_history_for(patient_id),
            now().date(),
        ))
    }

    pub async fn render_disease_history(&self, patient_id: &str) -> Result<String> {
        let mut view = self.view.lock().await;
        let cache = self.cache.read().await;
        let patient = cache
            .patient(patient_id)
            .ok_or_else(|| ClinicError::not_found(Resource::Patients, patient_id))?;
        view.view_disease_history(patient_id);
        Ok(render::patients::disease_history(
            patient,
            &cache.disease_history_for(patient_id),
        ))
    }

    /// Add form when `patient_id` is `None`, otherwise the prefilled edit form.
    pub async fn render_patient_form(&self, patient_id: Option<&str>) -> Result<String> {
        let mut view = self.view.lock().await;
        let cache = self.cache.read().await;
        match patient_id {
            None => {
                view.begin_add_patient();
                Ok(render::patients::patient_form(None))
            }
            Some(id) => {
                let patient = cache
                    .patient(id)
                    .ok_or_else(|| ClinicError::not_found(Resource::Patients, id))?;
                view.begin_edit_patient(id);
                Ok(render::patients::patient_form(Some(patient)))
            }
        }
    }

    pub async fn render_add_disease(&self, patient_id: &str) -> Result<String> {
        let mut view = self.view.lock().await;
        let cache = self.cache.read().await;
        cache
            .patient(patient_id)
            .ok_or_else(|| ClinicError::not_found(Resource::Patients, patient_id))?;
        view.begin_add_disease(patient_id);
        Ok(render::patients::disease_form(patient_id, None))
    }

    pub async fn render_edit_disease(&self, disease_id: &str) -> Result<String> {
        let mut view = self.view.lock().await;
        let cache = self.cache.read().await;
        let disease = cache
            .disease(disease_id)
            .ok_or_else(|| ClinicError::not_found(Resource::DiseaseHistory, disease_id))?;
        view.begin_edit_disease(disease_id, &disease.patient_id);
        Ok(render::patients::disease_form(&disease.patient_id, Some(disease)))
    }

    pub async fn render_appointments(&self, filter: &AppointmentFilter) -> String {
        let cache = self.cache.read().await;
        render::lists::appointment_list(&cache, &filter_appointments(&cache.appointments, filter))
    }

    /// Create a patient, or update `editing` when given.
    #[instrument(skip(self, form), fields(editing = ?editing))]
    pub async fn save_patient(&self, editing: Option<&str>, form: &PatientForm) -> Notice {
        let mut view = self.view.lock().await;
        match editing {
            Some(id) => view.begin_edit_patient(id),
            None => view.begin_add_patient(),
        }
        let target = view.patient_upsert();

        let result = match form.to_body() {
            Ok(body) => upsert(self.store.as_ref(), Resource::Patients, target.id(), &body).await,
            Err(e) => Err(e),
        };
        let notice = match result {
            Ok(_) => {
                view.close_modal();
                drop(view);
                self.load_all().await;
                Notice::success(match target {
                    Upsert::Create => "Patient added successfully",
                    Upsert::Update(_) => "Patient updated successfully",
                })
            }
            Err(e) => {
                error!(error = %e, "Error saving patient");
                Notice::error("Error saving patient")
            }
        };
        count_mutation("save_patient", &notice);
        notice
    }

    /// Delete a patient, then each of its disease history records in turn.
    ///
    /// A failure part-way leaves the remaining records in place; the cache is
    /// reloaded either way so the view shows what the store actually holds.
    #[instrument(skip(self), fields(patient_id = %patient_id))]
    pub async fn delete_patient(&self, patient_id: &str) -> Notice {
        let mut view = self.view.lock().await;
        let outcome = self.delete_patient_cascade(patient_id).await;
        if view.current_patient_id.as_deref() == Some(patient_id) {
            view.close_modal();
            view.current_patient_id = None;
        }
        drop(view);
        self.load_all().await;

        let notice = match outcome {
            Ok(()) => Notice::success("Patient deleted successfully"),
            Err(e) => {
                error!(error = %e, "Error deleting patient");
                Notice::error("Error deleting patient")
            }
        };
        count_mutation("delete_patient", &notice);
        notice
    }

    async fn delete_patient_cascade(&self, patient_id: &str) -> Result<()> {
        let fresh = fetch_all::<DiseaseHistory>(self.store.as_ref()).await;
        let disease_ids: Vec<String> = match fresh {
            Ok(rows) => {
                let ids = rows
                    .iter()
                    .filter(|d| d.patient_id == patient_id)
                    .map(|d| d.id.clone())
                    .collect();
                self.cache.write().await.disease_history = rows;
                ids
            }
            Err(e) => {
                warn!(error = %e, "using cached disease history for cascade");
                self.cache
                    .read()
                    .await
                    .disease_history_for(patient_id)
                    .iter()
                    .map(|d| d.id.clone())
                    .collect()
            }
        };

        self.store.delete(Resource::Patients, patient_id).await?;

        let mut removed = 0usize;
        for disease_id in &disease_ids {
            if let Err(e) = self.store.delete(Resource::DiseaseHistory, disease_id).await {
                warn!(
                    removed,
                    remaining = disease_ids.len() - removed,
                    "disease history cascade stopped part-way"
                );
                return Err(e);
            }
            removed += 1;
        }
        info!(removed, "patient deleted with disease history");
        Ok(())
    }

    /// Create a condition for `patient_id`, or update `editing` when given.
    #[instrument(skip(self, form), fields(patient_id = %patient_id, editing = ?editing))]
    pub async fn save_disease(
        &self,
        patient_id: &str,
        editing: Option<&str>,
        form: &DiseaseForm,
    ) -> Notice {
        let mut view = self.view.lock().await;
        match editing {
            Some(id) => view.begin_edit_disease(id, patient_id),
            None => view.begin_add_disease(patient_id),
        }
        let target = view.disease_upsert();
        let owner = view.current_patient_id.clone().unwrap_or_default();

        let result = match form.to_body(&owner) {
            Ok(body) => {
                upsert(self.store.as_ref(), Resource::DiseaseHistory, target.id(), &body).await
            }
            Err(e) => Err(e),
        };
        let notice = match result {
            Ok(_) => {
                view.close_modal();
                drop(view);
                self.load_all().await;
                Notice::success(match target {
                    Upsert::Create => "Disease history added successfully",
                    Upsert::Update(_) => "Disease history updated successfully",
                })
            }
            Err(e) => {
                error!(error = %e, "Error saving disease history");
                Notice::error("Error saving disease history")
            }
        };
        count_mutation("save_disease", &notice);
        notice
    }

    #[instrument(skip(self), fields(disease_id = %disease_id))]
    pub async fn delete_disease(&self, disease_id: &str) -> Notice {
        let result = self.store.delete(Resource::DiseaseHistory, disease_id).await;
        self.finish("delete_disease", result, "Disease history deleted successfully", "Error deleting disease history")
            .await
    }

    /// Record vitals taken now, with BMI derived from weight and height.
    #[instrument(skip(self, form), fields(patient_id = %patient_id))]
    pub async fn record_vitals(&self, patient_id: &str, form: &VitalsForm) -> Notice {
        let mut view = self.view.lock().await;
        view.begin_record_vitals(patient_id);
        let result = match form.to_body(patient_id, now()) {
            Ok(body) => self.store.create(Resource::Vitals, body).await.map(drop),
            Err(e) => Err(e),
        };
        if result.is_ok() {
            view.close_modal();
        }
        drop(view);
        self.finish("record_vitals", result, "Vital signs recorded successfully", "Error recording vital signs")
            .await
    }

    #[instrument(skip(self), fields(vitals_id = %vitals_id))]
    pub async fn delete_vitals(&self, vitals_id: &str) -> Notice {
        let result = self.store.delete(Resource::Vitals, vitals_id).await;
        self.finish("delete_vitals", result, "Vital signs deleted successfully", "Error deleting vital signs")
            .await
    }

    #[instrument(skip(self, form), fields(patient_id = %form.patient_id))]
    pub async fn schedule_appointment(&self, form: &AppointmentForm) -> Notice {
        let mut view = self.view.lock().await;
        view.begin_schedule_appointment();
        let result = match form.to_body(&self.created_by) {
            Ok(body) => self.store.create(Resource::Appointments, body).await.map(drop),
            Err(e) => Err(e),
        };
        if result.is_ok() {
            view.close_modal();
        }
        drop(view);
        self.finish("schedule_appointment", result, "Appointment scheduled successfully", "Error scheduling appointment")
            .await
    }

    #[instrument(skip(self, form), fields(patient_id = %patient_id))]
    pub async fn save_medication(&self, patient_id: &str, form: &MedicationForm) -> Notice {
        let result = match form.to_body(patient_id) {
            Ok(body) => self.store.create(Resource::Medications, body).await.map(drop),
            Err(e) => Err(e),
        };
        self.finish("save_medication", result, "Medication added successfully", "Error saving medication")
            .await
    }

    #[instrument(skip(self, form), fields(patient_id = %form.patient_id))]
    pub async fn save_lab_result(&self, form: &LabResultForm) -> Notice {
        let result = match form.to_body() {
            Ok(body) => self.store.create(Resource::LabResults, body).await.map(drop),
            Err(e) => Err(e),
        };
        self.finish("save_lab_result", result, "Lab result added successfully", "Error saving lab result")
            .await
    }

    #[instrument(skip(self, form), fields(patient_id = %form.patient_id))]
    pub async fn send_message(&self, form: &MessageForm) -> Notice {
        let result = match form.to_body(now()) {
            Ok(body) => self.store.create(Resource::Messages, body).await.map(drop),
            Err(e) => Err(e),
        };
        self.finish("send_message", result, "Message sent successfully", "Error sending message")
            .await
    }

    /// Reload after a successful mutation; log and report a failed one.
    async fn finish(
        &self,
        action: &'static str,
        result: Result<()>,
        success: &str,
        failure: &str,
    ) -> Notice {
        let notice = match result {
            Ok(()) => {
                self.load_all().await;
                Notice::success(success)
            }
            Err(e) => {
                error!(error = %e, action, "{}", failure);
                Notice::error(failure)
            }
        };
        count_mutation(action, &notice);
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::Modal;
    use crate::store::MemoryTableStore;
    use serde_json::json;

    fn seeded() -> Arc<MemoryTableStore> {
        let store = MemoryTableStore::new();
        store.seed(
            Resource::Patients,
            [
                json!({ "id": "p1", "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.org" }),
                json!({ "id": "p2", "first_name": "Alan", "last_name": "Turing", "phone": "555-0199" }),
            ],
        );
        store.seed(
            Resource::DiseaseHistory,
            [
                json!({ "id": "d1", "patient_id": "p1", "disease_name": "Asthma", "status": "Chronic" }),
                json!({ "id": "d2", "patient_id": "p1", "disease_name": "Flu", "status": "Active" }),
                json!({ "id": "d3", "patient_id": "p2", "disease_name": "Flu", "status": "Recovered" }),
            ],
        );
        Arc::new(store)
    }

    async fn dashboard(store: &Arc<MemoryTableStore>) -> Dashboard {
        let dashboard = Dashboard::new(store.clone());
        dashboard.load_all().await;
        dashboard
    }

    fn patient_form(first: &str, last: &str) -> PatientForm {
        PatientForm {
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn adding_a_patient_posts_and_refreshes() {
        let store = seeded();
        let dashboard = dashboard(&store).await;

        let notice = dashboard.save_patient(None, &patient_form("Grace", "Hopper")).await;
        assert_eq!(notice, Notice::success("Patient added successfully"));
        assert_eq!(store.len(Resource::Patients), 3);
        assert_eq!(dashboard.cache().await.patients.len(), 3);
        assert_eq!(dashboard.view().await.current_patient_id, None);
    }

    #[tokio::test]
    async fn editing_a_patient_puts_to_its_id() {
        let store = seeded();
        let dashboard = dashboard(&store).await;

        let notice = dashboard
            .save_patient(Some("p2"), &patient_form("Alan", "Mathison"))
            .await;
        assert_eq!(notice.message, "Patient updated successfully");
        assert_eq!(store.len(Resource::Patients), 2);
        assert_eq!(dashboard.cache().await.patient_name("p2"), "Alan Mathison");
    }

    #[tokio::test]
    async fn store_failures_become_generic_notices() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        store.fail(Resource::Patients);

        let notice = dashboard.save_patient(None, &patient_form("Grace", "Hopper")).await;
        assert_eq!(notice, Notice::error("Error saving patient"));
        // The form stays open.
        assert!(dashboard.view().await.is_open(Modal::PatientForm));
    }

    #[tokio::test]
    async fn invalid_forms_never_reach_the_store() {
        let store = seeded();
        let dashboard = dashboard(&store).await;

        let notice = dashboard.save_patient(None, &patient_form("", "Hopper")).await;
        assert!(!notice.is_success());
        assert_eq!(store.len(Resource::Patients), 2);
    }

    #[tokio::test]
    async fn deleting_a_patient_cascades_to_its_history() {
        let store = seeded();
        let dashboard = dashboard(&store).await;

        let notice = dashboard.delete_patient("p1").await;
        assert_eq!(notice, Notice::success("Patient deleted successfully"));
        assert_eq!(store.len(Resource::Patients), 1);
        assert_eq!(store.len(Resource::DiseaseHistory), 1);
        let cache = dashboard.cache().await;
        assert!(cache.disease_history_for("p1").is_empty());
        assert_eq!(cache.disease_history_for("p2").len(), 1);
    }

    #[tokio::test]
    async fn a_failed_cascade_leaves_a_partial_deletion() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        store.fail(Resource::DiseaseHistory);

        let notice = dashboard.delete_patient("p1").await;
        assert_eq!(notice, Notice::error("Error deleting patient"));
        assert_eq!(store.len(Resource::Patients), 1);
        assert_eq!(store.len(Resource::DiseaseHistory), 3);
        assert!(dashboard.cache().await.patient("p1").is_none());
    }

    #[tokio::test]
    async fn a_cascade_failing_mid_way_keeps_what_it_removed() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        store.fail_row(Resource::DiseaseHistory, "d2");

        let notice = dashboard.delete_patient("p1").await;
        assert_eq!(notice, Notice::error("Error deleting patient"));
        assert_eq!(store.len(Resource::Patients), 1);
        assert_eq!(store.len(Resource::DiseaseHistory), 2);

        let cache = dashboard.cache().await;
        assert!(cache.patient("p1").is_none());
        assert!(cache.disease("d1").is_none());
        assert!(cache.disease("d2").is_some());
    }

    #[tokio::test]
    async fn the_cascade_sees_history_added_behind_the_cache() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        store.seed(
            Resource::DiseaseHistory,
            [json!({ "id": "d4", "patient_id": "p1", "disease_name": "Gout" })],
        );

        let notice = dashboard.delete_patient("p1").await;
        assert!(notice.is_success());
        assert_eq!(store.len(Resource::DiseaseHistory), 1);
    }

    #[tokio::test]
    async fn disease_upsert_follows_the_edited_record() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        let form = DiseaseForm {
            disease_name: "Bronchitis".into(),
            status: Some("Under Treatment".into()),
            ..Default::default()
        };

        let added = dashboard.save_disease("p2", None, &form).await;
        assert_eq!(added.message, "Disease history added successfully");
        assert_eq!(store.len(Resource::DiseaseHistory), 4);

        let updated = dashboard.save_disease("p1", Some("d1"), &form).await;
        assert_eq!(updated.message, "Disease history updated successfully");
        let cache = dashboard.cache().await;
        assert_eq!(cache.disease("d1").unwrap().disease_name, "Bronchitis");
        assert_eq!(cache.disease("d1").unwrap().patient_id, "p1");
    }

    #[tokio::test]
    async fn vitals_are_recorded_with_bmi_and_can_be_deleted() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        let form = VitalsForm {
            weight: Some("154".into()),
            height: Some("70".into()),
            ..Default::default()
        };

        let notice = dashboard.record_vitals("p1", &form).await;
        assert!(notice.is_success());
        let id = {
            let cache = dashboard.cache().await;
            let vitals = cache.vitals_for("p1");
            assert_eq!(vitals.len(), 1);
            assert_eq!(vitals[0].bmi, Some(22.1));
            assert!(vitals[0].recorded_date.is_some());
            vitals[0].id.clone()
        };

        let notice = dashboard.delete_vitals(&id).await;
        assert_eq!(notice.message, "Vital signs deleted successfully");
        assert!(dashboard.cache().await.vitals.is_empty());
    }

    #[tokio::test]
    async fn appointments_carry_the_configured_author() {
        let store = seeded();
        let dashboard = Dashboard::new(store.clone()).with_author("Front Desk");
        dashboard.load_all().await;
        let form = AppointmentForm {
            patient_id: "p1".into(),
            date: "2030-01-15".into(),
            time: Some("09:30".into()),
            ..Default::default()
        };

        let notice = dashboard.schedule_appointment(&form).await;
        assert_eq!(notice.message, "Appointment scheduled successfully");
        let cache = dashboard.cache().await;
        assert_eq!(cache.appointments[0].created_by.as_deref(), Some("Front Desk"));
        assert!(!cache.appointments[0].reminder_sent);
    }

    #[tokio::test]
    async fn search_filters_and_remembers_the_query() {
        let store = seeded();
        let dashboard = dashboard(&store).await;

        let html = dashboard.search("555-01").await;
        assert!(html.contains("Alan Turing"));
        assert!(!html.contains("Ada Lovelace"));
        assert_eq!(dashboard.view().await.search_query, "555-01");

        let html = dashboard.render_section(Section::Patients).await;
        assert!(!html.contains("Ada Lovelace"));

        dashboard.render_section(Section::Dashboard).await;
        let html = dashboard.search("   ").await;
        assert!(html.contains("Ada Lovelace") && html.contains("Alan Turing"));
    }

    #[tokio::test]
    async fn unknown_patients_are_not_found() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        assert!(matches!(
            dashboard.render_ehr("ghost", None).await,
            Err(ClinicError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn the_record_view_tracks_its_tab() {
        let store = seeded();
        let dashboard = dashboard(&store).await;

        let html = dashboard.render_ehr("p1", None).await.unwrap();
        assert!(html.contains("Personal Information"));
        dashboard.render_ehr("p1", Some(EhrTab::Vitals)).await.unwrap();
        let view = dashboard.view().await;
        assert_eq!(view.ehr_tab, EhrTab::Vitals);
        assert_eq!(view.current_patient_id.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn every_section_renders() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        for section in Section::ALL {
            let html = dashboard.render_section(section).await;
            assert!(html.starts_with(&format!(r#"<section id="{}">"#, section.slug())));
        }
        assert_eq!(dashboard.view().await.section, Section::Analytics);
    }

    #[tokio::test]
    async fn a_partial_refresh_is_reported() {
        let store = seeded();
        let dashboard = dashboard(&store).await;
        store.fail(Resource::Messages);
        assert_eq!(dashboard.refresh().await, Notice::error("Error loading application data"));
        assert_eq!(dashboard.stats().await.total_patients, 2);
    }
}
