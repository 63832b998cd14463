//! Categorical fields of the clinic tables.
//!
//! The table store is schemaless, so each enumeration is open: values the
//! dashboard does not know are carried verbatim in `Other`.

use std::fmt;

macro_rules! open_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($label => $name::$variant,)+
                    _ => $name::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                $name::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum!(
    /// Course of a recorded condition.
    DiseaseStatus {
        Active => "Active",
        Recovered => "Recovered",
        Chronic => "Chronic",
        UnderTreatment => "Under Treatment",
        Remission => "Remission",
    }
);

open_enum!(
    Severity {
        Mild => "Mild",
        Moderate => "Moderate",
        Severe => "Severe",
        Critical => "Critical",
    }
);

open_enum!(
    AppointmentStatus {
        Scheduled => "Scheduled",
        Confirmed => "Confirmed",
        Completed => "Completed",
        Cancelled => "Cancelled",
        InProgress => "In Progress",
        NoShow => "No Show",
    }
);

open_enum!(
    MedicationStatus {
        Active => "Active",
        Discontinued => "Discontinued",
        Completed => "Completed",
        OnHold => "On Hold",
    }
);

open_enum!(
    /// How consistently a patient takes a medication.
    AdherenceLevel {
        Excellent => "Excellent",
        Good => "Good",
        Fair => "Fair",
        Poor => "Poor",
        Unknown => "Unknown",
    }
);

open_enum!(
    LabStatus {
        Pending => "Pending",
        Normal => "Normal",
        Abnormal => "Abnormal",
        Critical => "Critical",
    }
);

open_enum!(
    MessageStatus {
        Unread => "Unread",
        Read => "Read",
        Replied => "Replied",
        Archived => "Archived",
    }
);

impl DiseaseStatus {
    /// Conditions counted as active cases on the dashboard.
    pub fn is_active_case(&self) -> bool {
        matches!(self, DiseaseStatus::Active | DiseaseStatus::UnderTreatment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_with_spaces_map_to_variants() {
        assert_eq!(DiseaseStatus::from("Under Treatment"), DiseaseStatus::UnderTreatment);
        assert_eq!(AppointmentStatus::from("No Show"), AppointmentStatus::NoShow);
        assert_eq!(AppointmentStatus::InProgress.as_str(), "In Progress");
    }

    #[test]
    fn unknown_values_are_kept_verbatim() {
        let status: LabStatus = serde_json::from_str("\"Hemolyzed\"").unwrap();
        assert_eq!(status, LabStatus::Other("Hemolyzed".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Hemolyzed\"");
    }

    #[test]
    fn matching_is_case_sensitive_like_the_backend() {
        assert_eq!(Severity::from("mild"), Severity::Other("mild".into()));
    }

    #[test]
    fn active_cases_are_active_or_under_treatment() {
        let active: Vec<_> = DiseaseStatus::KNOWN
            .iter()
            .filter(|s| s.is_active_case())
            .collect();
        assert_eq!(active, [&DiseaseStatus::Active, &DiseaseStatus::UnderTreatment]);
    }
}
