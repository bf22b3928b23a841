//! Humanization prompt for the Gemini rewriter.

use crate::domain::models::CitationSet;
use crate::infrastructure::gemini::GenerateContentRequest;

/// System instruction sent with every rewrite request.
pub const HUMANIZE_INSTRUCTION: &str = "\
You are an expert in academic writing. Rewrite the text so that it reads naturally and \
sounds like it was written by a human academic, while keeping ALL factual information \
and citations.

Rules that must never be broken:
1. Never remove citations or footnotes (^1, ^2, [^1], (Author, Year)). Keep them exactly as written.
2. Never change factual claims, data, numbers or statistics.
3. Never change the structure of the document (chapters, sections, headings).
4. Never change author names, years or page numbers inside citations.
5. Never change the scientific content or meaning.

What to improve:
1. Sentence burstiness: mix short (5-10 words), medium (15-20 words) and long (25-35 words) sentences.
2. Variation: vary synonyms and sentence openings.
3. Flow: improve transitions between sentences and paragraphs.
4. Remove robotic patterns such as repetitive phrases and predictable structures.
5. Avoid stock discourse markers (\"furthermore\", \"moreover\", \"in conclusion\", \"it is important to note\").
6. Prefer impersonal academic constructions over first-person plural.

Output requirements:
- Keep the length within 5% of the input word count.
- Every footnote and citation of the input must be present in the output.
- Answer in the language of the input text.
- Return only the rewritten text, without commentary or code fences.";

/// User message carrying the text and the citations to protect.
pub fn user_message(text: &str, citations: &CitationSet) -> String {
    format!(
        "Citation metadata that MUST be preserved exactly (JSON):\n{}\n\nText to humanize:\n{}",
        citations.to_prompt_json(),
        text
    )
}

/// Full `generateContent` request for one rewrite
pub fn build_request(text: &str, citations: &CitationSet) -> GenerateContentRequest {
    GenerateContentRequest::single_turn(
        Some(HUMANIZE_INSTRUCTION.to_string()),
        user_message(text, citations),
    )
}

/// Remove a markdown code fence wrapped around the whole answer.
pub fn strip_code_fence(output: &str) -> &str {
    let trimmed = output.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "markdown") on the opening line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}
