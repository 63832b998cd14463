//! Which section, tab and modal are showing, and which record a form edits.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ClinicError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    #[default]
    Dashboard,
    Patients,
    Appointments,
    LabResults,
    Messages,
    Analytics,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dashboard,
        Section::Patients,
        Section::Appointments,
        Section::LabResults,
        Section::Messages,
        Section::Analytics,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Patients => "patients",
            Section::Appointments => "appointments",
            Section::LabResults => "lab-results",
            Section::Messages => "messages",
            Section::Analytics => "analytics",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Patients => "Patients",
            Section::Appointments => "Appointments",
            Section::LabResults => "Lab Results",
            Section::Messages => "Messages",
            Section::Analytics => "Analytics",
        }
    }
}

impl FromStr for Section {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Also accept the camelCase form `labResults`.
        let s = if s == "labResults" { "lab-results" } else { s };
        Section::ALL
            .into_iter()
            .find(|section| section.slug() == s)
            .ok_or_else(|| ClinicError::Validation(format!("unknown section: {}", s)))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Tabs of the patient record view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EhrTab {
    #[default]
    Overview,
    Vitals,
    Medications,
    LabResults,
    Appointments,
    Notes,
}

impl EhrTab {
    pub const ALL: [EhrTab; 6] = [
        EhrTab::Overview,
        EhrTab::Vitals,
        EhrTab::Medications,
        EhrTab::LabResults,
        EhrTab::Appointments,
        EhrTab::Notes,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            EhrTab::Overview => "overview",
            EhrTab::Vitals => "vitals",
            EhrTab::Medications => "medications",
            EhrTab::LabResults => "lab-results",
            EhrTab::Appointments => "appointments",
            EhrTab::Notes => "notes",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EhrTab::Overview => "Overview",
            EhrTab::Vitals => "Vitals",
            EhrTab::Medications => "Medications",
            EhrTab::LabResults => "Lab Results",
            EhrTab::Appointments => "Appointments",
            EhrTab::Notes => "Notes",
        }
    }
}

impl FromStr for EhrTab {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EhrTab::ALL
            .into_iter()
            .find(|tab| tab.slug() == s)
            .ok_or_else(|| ClinicError::Validation(format!("unknown record tab: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modal {
    PatientDetails,
    PatientForm,
    DiseaseHistory,
    DiseaseForm,
    AppointmentForm,
    VitalsForm,
}

/// Create or update, decided by whether a record is being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    Create,
    Update(String),
}

impl Upsert {
    pub fn from_current(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() => Upsert::Update(id.to_string()),
            _ => Upsert::Create,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Upsert::Create => None,
            Upsert::Update(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub section: Section,
    pub ehr_tab: EhrTab,
    pub modal: Option<Modal>,
    pub current_patient_id: Option<String>,
    pub current_disease_id: Option<String>,
    pub search_query: String,
}

impl ViewState {
    pub fn show_section(&mut self, section: Section) {
        self.section = section;
        if section != Section::Patients {
            self.search_query.clear();
        }
    }

    /// Open the record view of a patient on its overview tab.
    pub fn open_patient_ehr(&mut self, patient_id: &str) {
        self.current_patient_id = Some(patient_id.to_string());
        self.ehr_tab = EhrTab::Overview;
        self.modal = Some(Modal::PatientDetails);
    }

    pub fn switch_tab(&mut self, tab: EhrTab) {
        self.ehr_tab = tab;
    }

    pub fn begin_add_patient(&mut self) {
        self.current_patient_id = None;
        self.modal = Some(Modal::PatientForm);
    }

    pub fn begin_edit_patient(&mut self, patient_id: &str) {
        self.current_patient_id = Some(patient_id.to_string());
        self.modal = Some(Modal::PatientForm);
    }

    pub fn view_disease_history(&mut self, patient_id: &str) {
        self.current_patient_id = Some(patient_id.to_string());
        self.modal = Some(Modal::DiseaseHistory);
    }

    pub fn begin_add_disease(&mut self, patient_id: &str) {
        self.current_patient_id = Some(patient_id.to_string());
        self.current_disease_id = None;
        self.modal = Some(Modal::DiseaseForm);
    }

    pub fn begin_edit_disease(&mut self, disease_id: &str, patient_id: &str) {
        self.current_disease_id = Some(disease_id.to_string());
        self.current_patient_id = Some(patient_id.to_string());
        self.modal = Some(Modal::DiseaseForm);
    }

    pub fn begin_record_vitals(&mut self, patient_id: &str) {
        self.current_patient_id = Some(patient_id.to_string());
        self.modal = Some(Modal::VitalsForm);
    }

    pub fn begin_schedule_appointment(&mut self) {
        self.modal = Some(Modal::AppointmentForm);
    }

    /// Closing a form forgets the record it was editing.
    pub fn close_modal(&mut self) {
        match self.modal.take() {
            Some(Modal::PatientForm) => self.current_patient_id = None,
            Some(Modal::DiseaseForm) => self.current_disease_id = None,
            _ => {}
        }
    }

    pub fn patient_upsert(&self) -> Upsert {
        Upsert::from_current(self.current_patient_id.as_deref())
    }

    pub fn disease_upsert(&self) -> Upsert {
        Upsert::from_current(self.current_disease_id.as_deref())
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.modal == Some(modal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_parse_back() {
        for section in Section::ALL {
            assert_eq!(section.slug().parse::<Section>().unwrap(), section);
        }
        for tab in EhrTab::ALL {
            assert_eq!(tab.slug().parse::<EhrTab>().unwrap(), tab);
        }
        assert_eq!("labResults".parse::<Section>().unwrap(), Section::LabResults);
        assert!("billing".parse::<Section>().is_err());
    }

    #[test]
    fn current_id_selects_create_or_update() {
        let mut view = ViewState::default();
        view.begin_add_patient();
        assert_eq!(view.patient_upsert(), Upsert::Create);

        view.begin_edit_patient("p1");
        assert_eq!(view.patient_upsert(), Upsert::Update("p1".into()));

        view.close_modal();
        assert_eq!(view.patient_upsert(), Upsert::Create);
        assert_eq!(view.modal, None);
    }

    #[test]
    fn editing_a_disease_tracks_its_patient() {
        let mut view = ViewState::default();
        view.begin_edit_disease("d1", "p9");
        assert_eq!(view.disease_upsert(), Upsert::Update("d1".into()));
        assert_eq!(view.current_patient_id.as_deref(), Some("p9"));

        view.close_modal();
        assert_eq!(view.disease_upsert(), Upsert::Create);
        assert_eq!(view.current_patient_id.as_deref(), Some("p9"));
    }

    #[test]
    fn opening_a_record_resets_to_overview() {
        let mut view = ViewState::default();
        view.switch_tab(EhrTab::Vitals);
        view.open_patient_ehr("p1");
        assert_eq!(view.ehr_tab, EhrTab::Overview);
        assert!(view.is_open(Modal::PatientDetails));
    }

    #[test]
    fn blank_ids_never_update() {
        assert_eq!(Upsert::from_current(Some("")), Upsert::Create);
        assert_eq!(Upsert::from_current(None).id(), None);
    }
}
