//! Clinic EHR dashboard
//!
//! Serves the dashboard over HTTP, or answers one-off questions about the
//! table store from the command line.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use chrono::{Duration as Days, Local};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clinic_ehr::config::{self, Config};
use clinic_ehr::core::aggregate;
use clinic_ehr::core::view::EhrTab;
use clinic_ehr::store::HttpTableStore;
use clinic_ehr::{api, Dashboard, MemoryTableStore, Resource, TableStore};

#[derive(Parser)]
#[command(name = "clinic-ehr", about = "Clinic record-keeping dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Table store root; overrides `store.base_url`
    #[arg(long, global = true, env = "CLINIC_BASE_URL")]
    base_url: Option<String>,
    /// Use a seeded in-process store instead of the REST backend
    #[arg(long, global = true)]
    memory: bool,
    /// Configuration file (without extension)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP dashboard
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the dashboard counters as JSON
    Stats,
    /// List patients matching a name, phone or email fragment
    Search { query: String },
    /// Today's appointments in time order
    Schedule,
    /// Critical alerts across all patients
    Alerts,
    /// Render one patient's record
    Patient {
        id: String,
        #[arg(long, default_value = "overview")]
        tab: EhrTab,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.as_str()));
    if config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_store(cli: &Cli, config: &Config) -> Result<Arc<dyn TableStore>> {
    if cli.memory {
        let store = MemoryTableStore::new();
        seed_demo(&store);
        return Ok(Arc::new(store));
    }
    let base_url = cli.base_url.as_deref().unwrap_or(&config.store.base_url);
    let store = HttpTableStore::new(base_url, Duration::from_secs(config.store.timeout_secs))
        .context("failed to build table store client")?;
    Ok(Arc::new(store))
}

/// A small clinic day for `--memory` runs.
fn seed_demo(store: &MemoryTableStore) {
    let today = Local::now().date_naive();
    let day = |offset: i64| (today + Days::days(offset)).format("%Y-%m-%d").to_string();
    let at = |offset: i64, time: &str| format!("{}T{}", day(offset), time);

    store.seed(
        Resource::Patients,
        [
            json!({"id": "p-1", "first_name": "Maria", "last_name": "Lopez", "date_of_birth": "1968-04-12",
                   "gender": "Female", "phone": "555-0101", "email": "maria.lopez@example.com", "blood_type": "A+",
                   "allergies": "Penicillin"}),
            json!({"id": "p-2", "first_name": "James", "last_name": "Okafor", "date_of_birth": "1981-11-03",
                   "gender": "Male", "phone": "555-0144", "email": "j.okafor@example.com"}),
            json!({"id": "p-3", "first_name": "Hannah", "last_name": "Berg", "date_of_birth": "2001-07-28",
                   "gender": "Female", "phone": "555-0190"}),
        ],
    );
    store.seed(
        Resource::DiseaseHistory,
        [
            json!({"id": "d-1", "patient_id": "p-1", "disease_name": "Type 2 Diabetes", "diagnosis_date": "2019-02-01",
                   "status": "Active", "severity": "Moderate", "follow_up_date": day(3), "doctor_name": "Dr. Patel"}),
            json!({"id": "d-2", "patient_id": "p-1", "disease_name": "Hypertension", "diagnosis_date": "2020-06-15",
                   "status": "Chronic", "severity": "Mild"}),
            json!({"id": "d-3", "patient_id": "p-2", "disease_name": "Asthma", "diagnosis_date": "2010-09-09",
                   "status": "Active", "severity": "Critical", "follow_up_date": day(1)}),
        ],
    );
    store.seed(
        Resource::Appointments,
        [
            json!({"id": "a-1", "patient_id": "p-1", "appointment_date": at(0, "09:30:00"), "duration": 30,
                   "appointment_type": "Follow-up", "doctor_name": "Dr. Patel", "status": "Confirmed"}),
            json!({"id": "a-2", "patient_id": "p-3", "appointment_date": at(0, "14:00:00"), "duration": 45,
                   "appointment_type": "Consultation", "status": "Scheduled"}),
            json!({"id": "a-3", "patient_id": "p-2", "appointment_date": at(-2, "10:00:00"), "duration": 30,
                   "appointment_type": "Check-up", "doctor_name": "Dr. Chen", "status": "Scheduled"}),
        ],
    );
    store.seed(
        Resource::Vitals,
        [json!({"id": "v-1", "patient_id": "p-1", "recorded_date": at(-7, "09:40:00"),
                "blood_pressure_systolic": 142, "blood_pressure_diastolic": 91, "heart_rate": 78,
                "temperature": 98.4, "weight": 176, "height": 64, "oxygen_saturation": 97})],
    );
    store.seed(
        Resource::Medications,
        [
            json!({"id": "m-1", "patient_id": "p-1", "medication_name": "Metformin", "dosage": "500 mg",
                   "frequency": "Twice daily", "status": "Active", "adherence_level": "Poor"}),
            json!({"id": "m-2", "patient_id": "p-2", "medication_name": "Albuterol", "dosage": "90 mcg",
                   "frequency": "As needed", "status": "Active", "adherence_level": "Good"}),
        ],
    );
    store.seed(
        Resource::LabResults,
        [
            json!({"id": "l-1", "patient_id": "p-1", "test_name": "HbA1c", "result_value": "9.2", "unit": "%",
                   "reference_range": "4.0-5.6", "status": "Critical", "test_date": at(-1, "08:00:00")}),
            json!({"id": "l-2", "patient_id": "p-3", "test_name": "CBC", "status": "Pending",
                   "test_date": at(0, "08:15:00")}),
        ],
    );
    store.seed(
        Resource::Messages,
        [json!({"id": "msg-1", "patient_id": "p-2", "sender": "James Okafor", "recipient": "Dr. Chen",
                "subject": "Inhaler refill", "body": "Running low, can I get a refill?", "status": "Unread",
                "priority": "Normal", "sent_date": at(0, "07:50:00")})],
    );
}

async fn serve(dashboard: Dashboard, config: &Config, port: Option<u16>) -> Result<()> {
    if let Err(e) = api::install_metrics() {
        warn!(error = %e, "prometheus recorder not installed");
    }
    let report = dashboard.load_all().await;
    if !report.is_complete() {
        warn!(failed = ?report.failed, "starting with partial data");
    }

    let addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    info!(%addr, "dashboard listening");

    let dashboard = web::Data::new(dashboard);
    HttpServer::new(move || {
        App::new()
            .app_data(dashboard.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {}", addr))?
    .run()
    .await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config);

    let dashboard = Dashboard::new(open_store(&cli, &config)?);

    match cli.command {
        Commands::Serve { port } => serve(dashboard, &config, port).await?,
        Commands::Stats => {
            dashboard.load_all().await;
            println!("{}", serde_json::to_string_pretty(&dashboard.stats().await)?);
        }
        Commands::Search { query } => {
            dashboard.load_all().await;
            let cache = dashboard.cache().await;
            let matches = aggregate::search_patients(&cache.patients, &query);
            if matches.is_empty() {
                println!("No patients found");
            }
            for patient in matches {
                println!(
                    "{}\t{}\t{}",
                    patient.id,
                    patient.full_name(),
                    patient.phone.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Schedule => {
            dashboard.load_all().await;
            let cache = dashboard.cache().await;
            let entries = aggregate::todays_schedule(&cache, Local::now().date_naive());
            if entries.is_empty() {
                println!("No appointments scheduled for today");
            }
            for entry in entries {
                println!(
                    "{}\t{}\t{}",
                    entry.at.format("%I:%M %p"),
                    entry.patient_name,
                    entry.appointment.doctor_name.as_deref().unwrap_or("Dr. TBD")
                );
            }
        }
        Commands::Alerts => {
            dashboard.load_all().await;
            let cache = dashboard.cache().await;
            for alert in aggregate::critical_alerts(&cache, Local::now().naive_local()) {
                println!("{} {}", alert.icon, alert.message);
            }
        }
        Commands::Patient { id, tab } => {
            dashboard.load_all().await;
            println!("{}", dashboard.render_ehr(&id, Some(tab)).await?);
        }
    }
    Ok(())
}
