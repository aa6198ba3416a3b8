//! Label registry - the expected fields for each document type

use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Errors raised while building a label registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    /// A doctype key was empty
    #[error("Doctype name cannot be empty")]
    EmptyDoctype,

    /// The same field name appears twice in one label set
    #[error("Duplicate label '{label}' for doctype '{doctype}'")]
    DuplicateLabel {
        /// Doctype owning the label set
        doctype: String,
        /// Repeated field name
        label: String,
    },
}

/// Static table of doctype -> ordered field names
///
/// Built once at start-up and never mutated. Unknown doctypes resolve to an
/// empty label set, which callers treat as "skip this record".
///
/// # Examples
///
/// ```
/// use docfields_domain::LabelRegistry;
///
/// let registry = LabelRegistry::builtin();
/// assert_eq!(registry.get_labels("passport")[0], "dob");
/// assert!(registry.get_labels("unknown_type").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRegistry {
    sets: BTreeMap<String, Vec<String>>,
}

const BUILTIN_LABELS: &[(&str, &[&str])] = &[
    (
        "birth_certificate",
        &[
            "dob",
            "father_name",
            "gender",
            "issue_date",
            "mother_name",
            "name",
            "Birth_place",
            "registration_number",
        ],
    ),
    (
        "id_card",
        &[
            "address",
            "cnic_number",
            "dob",
            "expiry_date",
            "name_of_father",
            "gender",
            "issue_date",
            "name",
            "name_of_mother",
            "name_of_spouse",
        ],
    ),
    (
        "license",
        &[
            "address",
            "blood_group",
            "dob",
            "expiry_date",
            "issue_date",
            "license_number",
            "name",
            "vehicle_class",
        ],
    ),
    (
        "passport",
        &[
            "dob",
            "expiry_date",
            "gender",
            "issue_date",
            "name",
            "nationality",
            "passport_number",
            "place_of_birth",
        ],
    ),
];

impl LabelRegistry {
    /// The default table covering birth certificates, ID cards, driving
    /// licenses and passports
    pub fn builtin() -> Self {
        let sets = BUILTIN_LABELS
            .iter()
            .map(|(doctype, labels)| {
                (
                    doctype.to_string(),
                    labels.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect();
        Self { sets }
    }

    /// Build a registry from an arbitrary mapping
    ///
    /// # Errors
    /// Returns error if a doctype is empty or a label set repeats a name
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Result<Self, LabelError> {
        for (doctype, labels) in &map {
            if doctype.is_empty() {
                return Err(LabelError::EmptyDoctype);
            }
            let mut seen = HashSet::new();
            for label in labels {
                if !seen.insert(label.as_str()) {
                    return Err(LabelError::DuplicateLabel {
                        doctype: doctype.clone(),
                        label: label.clone(),
                    });
                }
            }
        }
        Ok(Self { sets: map })
    }

    /// Labels expected for `doctype`, or an empty slice if unknown
    pub fn get_labels(&self, doctype: &str) -> &[String] {
        self.sets.get(doctype).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registered doctypes in sorted order
    pub fn doctypes(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Number of registered doctypes
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True if no doctype is registered
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
