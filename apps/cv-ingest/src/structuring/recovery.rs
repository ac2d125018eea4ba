use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::profile::models::StructuredCVRecord;

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap()
});
// Digits with common separators, at least 7 digits overall.
static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\s().\-]{5,}\d").unwrap());
static RE_YEAR_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\s*[-–/]\s*(?:19|20)\d{2}\b").unwrap());
static RE_FIRST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"?first[ _]?name"?\s*[:=]\s*"?([^",\n}]+)"#).unwrap()
});
static RE_LAST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"?last[ _]?name"?\s*[:=]\s*"?([^",\n}]+)"#).unwrap()
});
static RE_SKILLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)"?skills"?\s*[:=]\s*\[([^\]]*)\]"#).unwrap());
static RE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

const MIN_PHONE_DIGITS: usize = 7;

#[derive(Debug, Error, PartialEq)]
pub enum RecoveryError {
    #[error("no JSON object and no recognisable fields in the response")]
    Unrecoverable,
}

/// How a record was obtained from the model's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// A JSON object was parsed.
    Structured,
    /// Only a handful of fields were scraped with patterns. Lower confidence.
    RegexFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredRecord {
    pub record: StructuredCVRecord,
    pub provenance: Provenance,
}

/// Fields scraped from an unparseable response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
}

impl PartialRecord {
    pub fn scan(text: &str) -> Self {
        Self {
            first_name: capture(&RE_FIRST_NAME, text),
            last_name: capture(&RE_LAST_NAME, text),
            email: RE_EMAIL.find(text).map(|m| m.as_str().to_string()),
            phone: RE_PHONE
                .find_iter(text)
                .map(|m| m.as_str().trim().to_string())
                .find(|p| looks_like_phone(p)),
            skills: RE_SKILLS
                .captures(text)
                .map(|caps| {
                    RE_QUOTED
                        .captures_iter(&caps[1])
                        .map(|c| c[1].trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PartialRecord::default()
    }
}

impl From<PartialRecord> for StructuredCVRecord {
    fn from(partial: PartialRecord) -> Self {
        StructuredCVRecord {
            first_name: partial.first_name,
            last_name: partial.last_name,
            email: partial.email,
            phone: partial.phone,
            skills: partial.skills,
            ..Default::default()
        }
    }
}

/// Enough digits, and not a span of years such as "2015 - 2019".
fn looks_like_phone(candidate: &str) -> bool {
    candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
        && !RE_YEAR_RANGE.is_match(candidate)
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(value.to_string())
    }
}

/// Strips a leading ```json / ``` fence and the closing fence, if any.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// The span from the first `{` to the last `}`.
pub fn slice_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_object(text: &str) -> Option<StructuredCVRecord> {
    let candidate = slice_json_object(text)?;
    let value: Value = serde_json::from_str(candidate).ok()?;
    StructuredCVRecord::from_json_object(&value)
}

/// Recovers a record from raw model output.
///
/// Prose around the object and code fences are tolerated. When no object can
/// be parsed the regex scan runs over the whole response; an empty scan is an
/// error.
pub fn recover_record(raw: &str) -> Result<RecoveredRecord, RecoveryError> {
    let unfenced = strip_code_fences(raw);

    if let Some(record) = parse_object(unfenced).or_else(|| parse_object(raw)) {
        return Ok(RecoveredRecord {
            record,
            provenance: Provenance::Structured,
        });
    }

    let partial = PartialRecord::scan(raw);
    if partial.is_empty() {
        return Err(RecoveryError::Unrecoverable);
    }
    tracing::warn!("model output was not valid JSON; recovered fields with pattern scan");
    Ok(RecoveredRecord {
        record: partial.into(),
        provenance: Provenance::RegexFallback,
    })
}
