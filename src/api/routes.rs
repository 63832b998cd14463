use actix_web::web;

use super::handlers;

/// Register every dashboard route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::shell))
        .route("/health", web::get().to(handlers::health))
        .route("/metrics", web::get().to(handlers::metrics))
        .route("/api/stats", web::get().to(handlers::stats))
        .route("/refresh", web::post().to(handlers::refresh))
        // Fixed segments go before the `{..}` routes they would otherwise match.
        .route("/sections/current", web::get().to(handlers::current_section))
        .route("/sections/{section}", web::get().to(handlers::section))
        .service(
            web::resource("/patients")
                .route(web::get().to(handlers::search_patients))
                .route(web::post().to(handlers::create_patient)),
        )
        .route("/patients/new", web::get().to(handlers::new_patient_form))
        .service(
            web::resource("/patients/{id}")
                .route(web::get().to(handlers::patient_details))
                .route(web::post().to(handlers::update_patient))
                .route(web::delete().to(handlers::delete_patient)),
        )
        .route("/patients/{id}/edit", web::get().to(handlers::edit_patient_form))
        .route("/patients/{id}/ehr", web::get().to(handlers::patient_ehr))
        .route("/patients/{id}/ehr/{tab}", web::get().to(handlers::patient_ehr_tab))
        .service(
            web::resource("/patients/{id}/disease-history")
                .route(web::get().to(handlers::disease_history))
                .route(web::post().to(handlers::create_disease)),
        )
        .route(
            "/patients/{id}/disease-history/new",
            web::get().to(handlers::new_disease_form),
        )
        .route("/disease-history/{id}/edit", web::get().to(handlers::edit_disease_form))
        .service(
            web::resource("/disease-history/{id}")
                .route(web::post().to(handlers::update_disease))
                .route(web::delete().to(handlers::delete_disease)),
        )
        .route("/patients/{id}/vitals", web::post().to(handlers::record_vitals))
        .route("/vitals/{id}", web::delete().to(handlers::delete_vitals))
        .route("/patients/{id}/medications", web::post().to(handlers::add_medication))
        .service(
            web::resource("/appointments")
                .route(web::get().to(handlers::appointments))
                .route(web::post().to(handlers::schedule_appointment)),
        )
        .route("/lab-results", web::post().to(handlers::add_lab_result))
        .route("/messages", web::post().to(handlers::send_message));
}
