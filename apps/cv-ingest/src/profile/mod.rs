pub mod completeness;
pub mod enrichment;
pub mod models;
pub mod prompts;
pub mod scoring;

pub use completeness::{
    compute_completeness_report, CatalogueField, CompletenessReport, FieldTier, FIELD_CATALOGUE,
};
pub use enrichment::{derive_fields, enrich_profile, generate_bio, BioOptions, EnrichedProfile};
pub use models::{EducationEntry, StructuredCVRecord, WorkExperienceEntry};
pub use scoring::compute_confidence_score;
