// Enrichment prompt templates.

pub const BIO_SYSTEM: &str = "\
You write short professional biographies for candidate profiles. \
Use only the facts you are given. Do not add employers, years, numbers or achievements \
that are not listed. Respond with the biography text only.";

pub const BIO_PROMPT: &str = "Write a 2-3 sentence executive biography in the third person \
for the candidate described below.

{profile_facts}

Keep it factual and concise. No headings, no bullet points, no quotation marks.";

pub fn build_bio_prompt(profile_facts: &str) -> String {
    BIO_PROMPT.replace("{profile_facts}", profile_facts)
}
