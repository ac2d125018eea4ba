use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The structured profile extracted from a CV.
///
/// Every field is optional. `None` / empty collections mean "not found in the
/// document"; nothing is ever filled in with a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredCVRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub linkedin_url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub portfolio_url: Option<String>,
    /// Professional headline.
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub bio: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_role: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_company: Option<String>,
    #[serde(deserialize_with = "lenient_entries")]
    pub work_experience: Vec<WorkExperienceEntry>,
    #[serde(deserialize_with = "lenient_entries")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "lenient_strings")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub achievements: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub professional_memberships: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperienceEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub position: Option<String>,
    /// Free-form ("2022", "Mar 2023"); never normalised to a calendar date.
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    /// `None` means the position is current.
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub institution: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub field_of_study: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub honors: Option<String>,
}

impl WorkExperienceEntry {
    pub fn is_empty(&self) -> bool {
        [
            &self.company,
            &self.position,
            &self.start_date,
            &self.end_date,
            &self.location,
            &self.description,
        ]
        .iter()
        .all(|f| f.is_none())
            && self.achievements.is_empty()
    }

    /// Ongoing if the end marker is absent or reads "Present" / "Current".
    pub fn is_current(&self) -> bool {
        match self.end_date.as_deref() {
            None => true,
            Some(end) => {
                let end = end.trim();
                end.eq_ignore_ascii_case("present") || end.eq_ignore_ascii_case("current")
            }
        }
    }
}

impl EducationEntry {
    pub fn is_empty(&self) -> bool {
        [
            &self.institution,
            &self.degree,
            &self.field_of_study,
            &self.end_date,
            &self.honors,
        ]
        .iter()
        .all(|f| f.is_none())
    }
}

impl StructuredCVRecord {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        *self == StructuredCVRecord::default()
    }

    /// Decodes a JSON object leniently. Never fails on a JSON object.
    pub fn from_json_object(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Scalar that tolerates numbers, booleans, blank strings and nulls.
/// Anything that is not a usable scalar becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// String list that tolerates `null`, a single string, and object items
/// (flattened to their scalar values joined with " - ").
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => vec![other],
    };

    Ok(items.iter().filter_map(item_text).collect())
}

/// Entry list that skips items which are not objects or carry nothing.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default + PartialEq,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<T>(item).ok())
        .filter(|entry| *entry != T::default())
        .collect())
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(text)
    }
}

fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let parts: Vec<String> = map.values().filter_map(scalar_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" - "))
            }
        }
        other => scalar_text(other),
    }
}
