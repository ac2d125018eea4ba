use crate::profile::models::StructuredCVRecord;

/// Rubric points, out of 100. Presence only: a one-line bio scores the same
/// as a ten-line one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubricWeights {
    pub first_name: u32,
    pub last_name: u32,
    pub email: u32,
    pub phone: u32,
    pub location: u32,
    pub title: u32,
    pub bio: u32,
    pub work_experience: u32,
    pub education: u32,
    pub skills: u32,
    pub languages: u32,
    pub certifications: u32,
}

impl Default for RubricWeights {
    fn default() -> Self {
        Self {
            // personal info: 30
            first_name: 5,
            last_name: 5,
            email: 10,
            phone: 5,
            location: 5,
            // professional info: 40
            title: 10,
            bio: 10,
            work_experience: 20,
            // education: 20
            education: 20,
            // extras: 10
            skills: 5,
            languages: 2,
            certifications: 3,
        }
    }
}

impl RubricWeights {
    pub fn total(&self) -> u32 {
        self.first_name
            + self.last_name
            + self.email
            + self.phone
            + self.location
            + self.title
            + self.bio
            + self.work_experience
            + self.education
            + self.skills
            + self.languages
            + self.certifications
    }
}

/// Rubric points earned by a record.
pub fn rubric_points(record: &StructuredCVRecord, weights: &RubricWeights) -> u32 {
    let scalars = [
        (&record.first_name, weights.first_name),
        (&record.last_name, weights.last_name),
        (&record.email, weights.email),
        (&record.phone, weights.phone),
        (&record.location, weights.location),
        (&record.title, weights.title),
        (&record.bio, weights.bio),
    ];
    let collections = [
        (!record.work_experience.is_empty(), weights.work_experience),
        (!record.education.is_empty(), weights.education),
        (!record.skills.is_empty(), weights.skills),
        (!record.languages.is_empty(), weights.languages),
        (!record.certifications.is_empty(), weights.certifications),
    ];

    let scalar_points: u32 = scalars
        .iter()
        .filter(|(field, _)| is_present(field))
        .map(|(_, points)| points)
        .sum();
    let collection_points: u32 = collections
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| points)
        .sum();

    scalar_points + collection_points
}

/// Confidence score in [0, 1]: rubric points divided by 100.
/// A pure function of the record, never a model-reported probability.
pub fn compute_confidence_score(record: &StructuredCVRecord) -> f64 {
    let weights = RubricWeights::default();
    let points = rubric_points(record, &weights);
    (points as f64 / weights.total() as f64).clamp(0.0, 1.0)
}

pub(crate) fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{EducationEntry, WorkExperienceEntry};

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn full_record() -> StructuredCVRecord {
        StructuredCVRecord {
            first_name: some("Ana"),
            last_name: some("Silva"),
            email: some("ana@example.com"),
            phone: some("+351 912 345 678"),
            location: some("Lisbon"),
            title: some("Product Designer"),
            bio: some("Designer."),
            work_experience: vec![WorkExperienceEntry {
                company: some("Figma"),
                ..Default::default()
            }],
            education: vec![EducationEntry {
                institution: some("FAUP"),
                ..Default::default()
            }],
            skills: vec!["Figma".to_string()],
            languages: vec!["English".to_string()],
            certifications: vec!["NN/g UX".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_weights_sum_to_one_hundred() {
        assert_eq!(RubricWeights::default().total(), 100);
    }

    #[test]
    fn test_empty_record_scores_zero() {
        assert_eq!(compute_confidence_score(&StructuredCVRecord::default()), 0.0);
    }

    #[test]
    fn test_email_only_scores_ten_percent() {
        let record = StructuredCVRecord {
            email: some("john@x.com"),
            ..Default::default()
        };
        assert!((compute_confidence_score(&record) - 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn test_name_email_phone_scores_quarter() {
        let record = StructuredCVRecord {
            first_name: some("John"),
            last_name: some("Smith"),
            email: some("john@x.com"),
            phone: some("+1-555-0100"),
            ..Default::default()
        };
        assert!((compute_confidence_score(&record) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_record_scores_one() {
        assert!((compute_confidence_score(&full_record()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_experience_is_flat_not_per_entry() {
        let mut record = StructuredCVRecord {
            work_experience: vec![WorkExperienceEntry {
                company: some("A"),
                ..Default::default()
            }],
            ..Default::default()
        };
        let one = compute_confidence_score(&record);
        record.work_experience.push(WorkExperienceEntry {
            company: some("B"),
            ..Default::default()
        });
        assert_eq!(one, compute_confidence_score(&record));
        assert!((one - 0.20).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bio_length_does_not_matter() {
        let short = StructuredCVRecord {
            bio: some("Designer."),
            ..Default::default()
        };
        let long = StructuredCVRecord {
            bio: some(&"Designer with many years of experience. ".repeat(10)),
            ..Default::default()
        };
        assert_eq!(
            compute_confidence_score(&short),
            compute_confidence_score(&long)
        );
    }

    #[test]
    fn test_identical_records_identical_scores() {
        assert_eq!(
            compute_confidence_score(&full_record()),
            compute_confidence_score(&full_record().clone())
        );
    }

    #[test]
    fn test_unscored_fields_do_not_count() {
        let record = StructuredCVRecord {
            linkedin_url: some("https://linkedin.com/in/ana"),
            achievements: vec!["Award".to_string()],
            full_name: some("Ana Silva"),
            ..Default::default()
        };
        assert_eq!(compute_confidence_score(&record), 0.0);
    }
}
