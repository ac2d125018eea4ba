// Structuring prompt templates.

pub const STRUCTURING_SYSTEM: &str = "\
You are a precise CV data extractor. \
Turn the text of a CV or résumé into a single structured JSON object. \
Extract ONLY information that is explicitly present in the text. \
Never invent, guess or embellish names, dates, employers, contact details or skills. \
When a field is not present, use null for single values and [] for lists.";

pub const STRUCTURING_PROMPT: &str = r#"Extract the candidate profile from the CV text below.

CV TEXT:
{cv_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "firstName": "string" | null,
  "lastName": "string" | null,
  "email": "string" | null,
  "phone": "string" | null,
  "location": "string" | null,
  "linkedinUrl": "string" | null,
  "portfolioUrl": "string" | null,
  "title": "string" | null,
  "bio": "string" | null,
  "workExperience": [
    {
      "company": "string" | null,
      "position": "string" | null,
      "startDate": "string" | null,
      "endDate": "string" | null,
      "location": "string" | null,
      "description": "string" | null,
      "achievements": ["string"]
    }
  ],
  "education": [
    {
      "institution": "string" | null,
      "degree": "string" | null,
      "fieldOfStudy": "string" | null,
      "endDate": "string" | null,
      "honors": "string" | null
    }
  ],
  "skills": ["string"],
  "languages": ["string"],
  "certifications": ["string"],
  "achievements": ["string"],
  "professionalMemberships": ["string"]
}

RULES:
1. Dates: copy them as written ("2019", "Mar 2021", "03/2021"). Do not convert formats.
2. A role that is ongoing has endDate null, or "Present" if the CV says so.
3. "title" is the candidate's professional headline, usually under the name. Otherwise use the most recent position.
4. "bio" is the summary/profile/about paragraph only if the CV has one. Never write one yourself.
5. Languages: list every spoken language with its level if given, e.g. "Spanish (native)", "English (C1)". Sections may be headed Languages, Idiomas, Langues or Sprachen.
6. Certifications: list each certificate or licence separately. Look for Certifications, Licenses, Courses, Credentials.
7. Skills: individual tools, technologies and competencies. Look for Skills, Technical Skills, Competencies, Tech Stack.
8. Professional memberships: associations, societies, boards, chartered bodies.
9. Keep the language of the CV; do not translate values.
10. Return ONLY the JSON object: no code fences, no commentary."#;

pub fn build_structuring_prompt(cv_text: &str) -> String {
    STRUCTURING_PROMPT.replace("{cv_text}", cv_text)
}
