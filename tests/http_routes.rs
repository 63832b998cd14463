#![cfg(feature = "http")]

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use clinic_ehr::{api, Dashboard, MemoryTableStore, Resource};
use serde_json::{json, Value};

async fn state() -> (Arc<MemoryTableStore>, web::Data<Dashboard>) {
    let store = Arc::new(MemoryTableStore::new());
    store.seed(
        Resource::Patients,
        [json!({ "id": "p1", "first_name": "Ada", "last_name": "Lovelace", "phone": "555-0100" })],
    );
    store.seed(
        Resource::DiseaseHistory,
        [json!({ "id": "d1", "patient_id": "p1", "disease_name": "Asthma", "status": "Active" })],
    );
    let dashboard = Dashboard::new(store.clone());
    dashboard.load_all().await;
    (store, web::Data::new(dashboard))
}

macro_rules! app {
    ($data:expr) => {
        test::init_service(App::new().app_data($data.clone()).configure(api::configure)).await
    };
}

#[actix_web::test]
async fn shell_and_health() {
    let (_, data) = state().await;
    let app = app!(data);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(r#"id="notices""#));
    assert!(body.contains(r#"hx-get="/sections/lab-results""#));

    let health: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(health["status"], "ok");
}

#[actix_web::test]
async fn stats_are_json() {
    let (_, data) = state().await;
    let app = app!(data);
    let stats: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/stats").to_request()).await;
    assert_eq!(stats["total_patients"], 1);
    assert_eq!(stats["active_cases"], 1);
}

#[actix_web::test]
async fn unknown_sections_and_patients_are_client_errors() {
    let (_, data) = state().await;
    let app = app!(data);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/sections/billing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/patients/nope/ehr").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/appointments?date=tomorrow").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn search_filters_the_patient_table() {
    let (_, data) = state().await;
    let app = app!(data);

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/patients?q=0100").to_request()).await;
    assert!(String::from_utf8_lossy(&body).contains("Ada Lovelace"));

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/patients?q=zzz").to_request()).await;
    assert!(String::from_utf8_lossy(&body).contains("No patients found"));
}

#[actix_web::test]
async fn creating_a_patient_triggers_a_refresh() {
    let (store, data) = state().await;
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/patients")
        .set_form([("first_name", "Grace"), ("last_name", "Hopper"), ("gender", "Female")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("HX-Trigger"));
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Patient added successfully"));
    assert_eq!(store.len(Resource::Patients), 2);
}

#[actix_web::test]
async fn failed_saves_answer_an_error_notice() {
    let (store, data) = state().await;
    store.fail(Resource::Patients);
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/patients/p1")
        .set_form([("first_name", "Ada"), ("last_name", "King")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(!resp.headers().contains_key("HX-Trigger"));
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Error saving patient"));
    assert!(body.contains("bg-red-500"));
}

#[actix_web::test]
async fn disease_updates_resolve_their_owner() {
    let (store, data) = state().await;
    let app = app!(data);

    let req = test::TestRequest::post()
        .uri("/disease-history/d1")
        .set_form([("disease_name", "Asthma"), ("status", "Resolved")])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Disease history updated successfully"));

    let history = test::call_and_read_body(
        &app,
        test::TestRequest::get().uri("/patients/p1/disease-history").to_request(),
    )
    .await;
    assert!(String::from_utf8_lossy(&history).contains("Resolved"));

    let req = test::TestRequest::delete().uri("/patients/p1").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(String::from_utf8_lossy(&body).contains("Patient deleted successfully"));
    assert!(store.is_empty(Resource::DiseaseHistory));
}

#[actix_web::test]
async fn ehr_tabs_are_addressable() {
    let (_, data) = state().await;
    let app = app!(data);

    let body = test::call_and_read_body(
        &app,
        test::TestRequest::get().uri("/patients/p1/ehr/vitals").to_request(),
    )
    .await;
    assert!(String::from_utf8_lossy(&body).contains(r#"hx-post="/patients/p1/vitals""#));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/patients/p1/ehr/billing").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

macro_rules! get {
    ($app:expr, $uri:expr) => {{
        let resp = test::call_service(&$app, test::TestRequest::get().uri($uri).to_request()).await;
        let status = resp.status();
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        (status, body)
    }};
}

#[actix_web::test]
async fn switching_tabs_replaces_the_record_view() {
    let (_, data) = state().await;
    let app = app!(data);

    let (status, body) = get!(app, "/patients/p1/ehr/medications");
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(r#"<div class="ehr" id="ehr""#));
    assert_eq!(body.matches(r#"id="ehr-tabs""#).count(), 1);
    assert_eq!(body.matches(r#"id="ehr-content""#).count(), 1);
    assert!(body.contains(r##"hx-get="/patients/p1/ehr/vitals" hx-target="#ehr" hx-swap="outerHTML""##));
    assert!(body.contains(r#"border-medical-blue text-medical-blue" data-tab="medications""#));
    assert!(body.contains(r#"hx-post="/patients/p1/medications""#));
}

#[actix_web::test]
async fn patient_forms_are_reachable_from_the_registry() {
    let (_, data) = state().await;
    let app = app!(data);

    let (_, registry) = get!(app, "/sections/patients");
    assert!(registry.contains(r#"hx-get="/patients/new""#));
    assert!(registry.contains(r#"hx-get="/patients/p1/edit""#));
    assert!(registry.contains(r#"name="q""#));

    let (status, form) = get!(app, "/patients/new");
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains("Add New Patient"));
    assert!(form.contains(r#"hx-post="/patients""#));

    let (status, form) = get!(app, "/patients/p1/edit");
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains(r#"hx-post="/patients/p1""#));
    assert!(form.contains(r#"name="last_name" value="Lovelace""#));
    assert!(form.contains(r#"name="phone" value="555-0100""#));
    assert_eq!(data.view().await.current_patient_id.as_deref(), Some("p1"));

    let (status, _) = get!(app, "/patients/nope/edit");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn disease_forms_are_reachable_from_the_history() {
    let (_, data) = state().await;
    let app = app!(data);

    let (_, history) = get!(app, "/patients/p1/disease-history");
    assert!(history.contains(r#"hx-get="/patients/p1/disease-history/new""#));
    assert!(history.contains(r#"hx-get="/disease-history/d1/edit""#));

    let (status, form) = get!(app, "/patients/p1/disease-history/new");
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains(r#"hx-post="/patients/p1/disease-history""#));

    let (status, form) = get!(app, "/disease-history/d1/edit");
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains(r#"hx-post="/disease-history/d1""#));
    assert!(form.contains(r#"name="disease_name" value="Asthma""#));
    assert!(form.contains("<option selected>Active</option>"));
    assert_eq!(data.view().await.current_disease_id.as_deref(), Some("d1"));

    let (status, _) = get!(app, "/disease-history/zz/edit");
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get!(app, "/patients/nope/disease-history/new");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn refresh_rerenders_the_section_being_shown() {
    let (_, data) = state().await;
    let app = app!(data);

    let (_, shell) = get!(app, "/");
    assert!(shell.contains(r#"hx-get="/sections/current" hx-trigger="clinic-refresh from:body""#));

    get!(app, "/patients?q=0100");
    let req = test::TestRequest::post()
        .uri("/patients")
        .set_form([("first_name", "Grace"), ("last_name", "Hopper")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().contains_key("HX-Trigger"));

    let (status, body) = get!(app, "/sections/current");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<section id="patients">"#));
    assert!(body.contains(r#"value="0100""#));
    assert!(body.contains("Ada Lovelace"));
    assert!(!body.contains("Grace Hopper"));
}
