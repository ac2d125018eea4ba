use serde::{Deserialize, Serialize};

use crate::profile::models::StructuredCVRecord;
use crate::profile::scoring::is_present;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldTier {
    Critical,
    HighValue,
    Enhanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    pub present: Vec<String>,
    pub missing_critical: Vec<String>,
    pub missing_high_value: Vec<String>,
    pub missing_enhanced: Vec<String>,
    pub overall_completeness: u8,
}

impl CompletenessReport {
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.missing_critical
            .iter()
            .chain(&self.missing_high_value)
            .chain(&self.missing_enhanced)
            .map(String::as_str)
    }
}

/// One catalogue entry: serialized field name, tier and presence check.
#[derive(Clone, Copy)]
pub struct CatalogueField {
    pub name: &'static str,
    pub tier: FieldTier,
    pub is_present: fn(&StructuredCVRecord) -> bool,
}

const fn field(
    name: &'static str,
    tier: FieldTier,
    is_present: fn(&StructuredCVRecord) -> bool,
) -> CatalogueField {
    CatalogueField {
        name,
        tier,
        is_present,
    }
}

/// The fixed field catalogue.
pub const FIELD_CATALOGUE: &[CatalogueField] = &[
    field("firstName", FieldTier::Critical, |r| is_present(&r.first_name)),
    field("lastName", FieldTier::Critical, |r| is_present(&r.last_name)),
    field("email", FieldTier::Critical, |r| is_present(&r.email)),
    field("phone", FieldTier::Critical, |r| is_present(&r.phone)),
    field("location", FieldTier::Critical, |r| is_present(&r.location)),
    field("title", FieldTier::Critical, |r| is_present(&r.title)),
    field("bio", FieldTier::Critical, |r| is_present(&r.bio)),
    field("workExperience", FieldTier::HighValue, |r| !r.work_experience.is_empty()),
    field("education", FieldTier::HighValue, |r| !r.education.is_empty()),
    field("skills", FieldTier::HighValue, |r| !r.skills.is_empty()),
    field("languages", FieldTier::HighValue, |r| !r.languages.is_empty()),
    field("certifications", FieldTier::Enhanced, |r| !r.certifications.is_empty()),
    field("achievements", FieldTier::Enhanced, |r| !r.achievements.is_empty()),
    field("linkedinUrl", FieldTier::Enhanced, |r| is_present(&r.linkedin_url)),
    field("professionalMemberships", FieldTier::Enhanced, |r| {
        !r.professional_memberships.is_empty()
    }),
];

/// Tiered present/missing analysis, independent of the confidence score.
pub fn compute_completeness_report(record: &StructuredCVRecord) -> CompletenessReport {
    let mut present = Vec::new();
    let mut missing_critical = Vec::new();
    let mut missing_high_value = Vec::new();
    let mut missing_enhanced = Vec::new();

    for field in FIELD_CATALOGUE {
        let name = field.name.to_string();
        if (field.is_present)(record) {
            present.push(name);
            continue;
        }
        match field.tier {
            FieldTier::Critical => missing_critical.push(name),
            FieldTier::HighValue => missing_high_value.push(name),
            FieldTier::Enhanced => missing_enhanced.push(name),
        }
    }

    let overall_completeness =
        (100.0 * present.len() as f64 / FIELD_CATALOGUE.len() as f64).round() as u8;

    CompletenessReport {
        present,
        missing_critical,
        missing_high_value,
        missing_enhanced,
        overall_completeness,
    }
}
