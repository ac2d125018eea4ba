use tracing::{debug, warn};

use crate::llm_client::{ChatMessage, ChatRequest, CompletionClient, LlmError};
use crate::profile::models::StructuredCVRecord;
use crate::profile::prompts::{build_bio_prompt, BIO_SYSTEM};
use crate::profile::scoring::is_present;

const BIO_TEMPERATURE: f32 = 0.7;
const BIO_TOP_SKILLS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct BioOptions<'a> {
    pub enabled: bool,
    pub model: &'a str,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedProfile {
    pub record: StructuredCVRecord,
    pub bio_generated: bool,
    pub warnings: Vec<String>,
}

/// Pure derivations: `fullName`, `currentRole` and `currentCompany`.
/// Fields the record already carries are left alone.
pub fn derive_fields(record: &StructuredCVRecord) -> StructuredCVRecord {
    let mut derived = record.clone();

    if !is_present(&derived.full_name) {
        let parts: Vec<&str> = [&derived.first_name, &derived.last_name]
            .into_iter()
            .filter_map(|p| p.as_deref().map(str::trim))
            .filter(|p| !p.is_empty())
            .collect();
        if !parts.is_empty() {
            derived.full_name = Some(parts.join(" "));
        }
    }

    if !is_present(&derived.current_role) || !is_present(&derived.current_company) {
        if let Some(current) = derived.work_experience.iter().find(|e| e.is_current()) {
            let (position, company) = (current.position.clone(), current.company.clone());
            if !is_present(&derived.current_role) {
                derived.current_role = position;
            }
            if !is_present(&derived.current_company) {
                derived.current_company = company;
            }
        }
    }

    if !is_present(&derived.current_role) {
        derived.current_role = derived.title.clone();
    }

    derived
}

/// Facts handed to the bio prompt, or `None` when there is nothing to write about.
pub fn bio_facts(record: &StructuredCVRecord) -> Option<String> {
    let mut facts = Vec::new();

    if let Some(name) = record.full_name.as_deref() {
        facts.push(format!("Name: {name}"));
    }
    if let Some(role) = record.current_role.as_deref() {
        facts.push(format!("Current role: {role}"));
    }
    if let Some(company) = record.current_company.as_deref() {
        facts.push(format!("Current company: {company}"));
    }
    if let Some(education) = record.education.first() {
        let summary: Vec<&str> = [
            &education.degree,
            &education.field_of_study,
            &education.institution,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect();
        if !summary.is_empty() {
            facts.push(format!("Education: {}", summary.join(", ")));
        }
    }
    if !record.skills.is_empty() {
        let top: Vec<&str> = record
            .skills
            .iter()
            .take(BIO_TOP_SKILLS)
            .map(String::as_str)
            .collect();
        facts.push(format!("Key skills: {}", top.join(", ")));
    }

    // A name alone is not enough to write a biography.
    let has_substance = facts.iter().any(|f| !f.starts_with("Name:"));
    has_substance.then(|| facts.join("\n"))
}

/// One creative completion producing a short third-person biography.
pub async fn generate_bio(
    llm: &dyn CompletionClient,
    facts: &str,
    model: &str,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let request = ChatRequest::new(model)
        .message(ChatMessage::system(BIO_SYSTEM))
        .message(ChatMessage::user(build_bio_prompt(facts)))
        .max_tokens(max_tokens)
        .temperature(BIO_TEMPERATURE);

    let bio = llm.complete(&request).await?;
    let bio = bio.trim().trim_matches('"').trim();
    if bio.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(bio.to_string())
}

/// Derivations plus the optional bio. Never fails: a bio failure becomes a warning.
pub async fn enrich_profile(
    llm: &dyn CompletionClient,
    record: &StructuredCVRecord,
    options: BioOptions<'_>,
) -> EnrichedProfile {
    let mut record = derive_fields(record);
    let mut warnings = Vec::new();
    let mut bio_generated = false;

    if options.enabled && !is_present(&record.bio) {
        match bio_facts(&record) {
            Some(facts) => {
                match generate_bio(llm, &facts, options.model, options.max_tokens).await {
                    Ok(bio) => {
                        debug!(chars = bio.chars().count(), "Generated biography");
                        record.bio = Some(bio);
                        bio_generated = true;
                    }
                    Err(e) => {
                        warn!(error = %e, "Biography generation failed; continuing without bio");
                        warnings.push("A biography could not be generated.".to_string());
                    }
                }
            }
            None => {
                warnings.push("Not enough detail to generate a biography.".to_string());
            }
        }
    }

    EnrichedProfile {
        record,
        bio_generated,
        warnings,
    }
}
