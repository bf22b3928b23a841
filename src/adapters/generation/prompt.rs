//! Drafting and extraction prompts for the Gemini generator.

use serde_json::Value;
use std::fmt::Write as _;

use crate::adapters::rewriter::prompt::strip_code_fence;
use crate::domain::models::GenerationRequest;
use crate::infrastructure::gemini::GenerateContentRequest;

/// Share above the target length the draft may reach.
pub const DRAFT_LENGTH_TOLERANCE: f64 = 0.10;

/// Words per expected citation when sizing the source count.
pub const WORDS_PER_CITATION: u64 = 150;

/// Longest abstract excerpt quoted per source, in characters.
pub const ABSTRACT_EXCERPT_CHARS: usize = 300;

/// System instruction for drafting a thesis.
pub const WRITE_INSTRUCTION: &str = "\
You are an academic writing assistant. Write academic text based ONLY on the sources provided.

Sources:
- Cite ONLY sources from the list of available sources. Never invent sources, authors, titles or years.
- Use authors, titles and years exactly as listed.
- Every mandatory source must be cited.

Structure:
1. Write the COMPLETE text for every chapter of the outline, following its structure exactly.
2. Start directly with the first chapter heading (for example \"## 1. Introduction\"). The first character must be \"#\".
3. No table of contents, title page, abstract or bibliography.
4. No tables, images, charts, appendices or other visual elements. Plain prose only.
5. Never mention limitations of an AI assistant.

Citations:
- Use the requested citation style consistently. Every citation includes page numbers.
- APA and Harvard: in-text citations such as (Author, Year, p. XX).
- deutsche-zitierweise: footnote markers ^1, ^2 in the text, and all definitions such as
  [^1]: Author, Title, Place: Publisher, Year, S. XX. collected at the very end. Use \"S.\" for pages.

Style:
- Academic register without personal pronouns; prefer impersonal constructions.
- Mix short, medium and long sentences and vary sentence openings.
- Avoid stock discourse markers and filler words.
- Stay within the target word count; exceeding it by more than 10% is unacceptable.

Answer in the requested language, in Markdown.";

/// System instruction for citation extraction.
pub const EXTRACT_INSTRUCTION: &str = "\
Analyze the thesis text and extract EVERY source it cites, as footnotes (^1, [^1]:) \
or in-text citations ((Author, Year, p. XX) or (Author XX)).

Rules:
- Include only sources that are actually cited in the text.
- Never invent sources or metadata; use empty strings for missing information.
- Page numbers are critical; extract them whenever present.

Return ONLY a JSON array. Each entry has this shape:
{\"id\": \"cite1\", \"authors\": [\"Müller, J.\"], \"year\": 2023, \"title\": \"...\", \
\"journal\": \"...\", \"doi\": \"...\", \"pages\": \"45-67\", \"url\": \"...\"}";

/// Highest draft length accepted for `target_words`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn max_draft_words(target_words: f64) -> u64 {
    (target_words * (1.0 + DRAFT_LENGTH_TOLERANCE)).floor() as u64
}

fn specifications_block(request: &GenerationRequest) -> String {
    let specs = &request.specifications;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let target = specs.drafting_target_words().round() as u64;
    let max = max_draft_words(specs.drafting_target_words());

    format!(
        "Thesis:\n\
         - Title: {}\n\
         - Field: {}\n\
         - Type: {}\n\
         - Citation style: {}\n\
         - Language: {}\n\
         - Target length: {target} words, absolute maximum {max} words (bibliography not counted)\n\
         - At least {} citations (about one per {WORDS_PER_CITATION} words)",
        specs.text("title").unwrap_or("Unknown"),
        specs.text("field").unwrap_or("Unknown"),
        specs.text("thesisType").unwrap_or("Unknown"),
        specs.citation_style(),
        specs.text("language").unwrap_or("german"),
        target / WORDS_PER_CITATION,
    )
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn authors_of(source: &Value) -> String {
    match source.get("authors") {
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .filter_map(|item| text_of(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        other => text_of(other).unwrap_or_else(|| "Unknown".to_string()),
    }
}

fn abstract_excerpt(source: &Value) -> Option<String> {
    let text = text_of(source.get("abstract"))?;
    if text.chars().count() > ABSTRACT_EXCERPT_CHARS {
        let excerpt: String = text.chars().take(ABSTRACT_EXCERPT_CHARS).collect();
        Some(format!("{excerpt}..."))
    } else {
        Some(text)
    }
}

/// The numbered source list the writer may cite from.
pub fn sources_block(sources: &[Value]) -> String {
    if sources.is_empty() {
        return "WARNING: no sources available. The thesis cannot be grounded in research."
            .to_string();
    }

    let mut block = String::from("AVAILABLE SOURCES (use only these):\n");
    for (index, source) in sources.iter().enumerate() {
        let chapter = text_of(source.get("chapterTitle"))
            .map(|title| {
                let number = text_of(source.get("chapterNumber")).unwrap_or_else(|| "?".into());
                format!(" (for chapter {number}: {title})")
            })
            .unwrap_or_default();
        let venue = text_of(source.get("journal"))
            .or_else(|| text_of(source.get("publisher")))
            .unwrap_or_else(|| "Unknown".to_string());

        let _ = write!(
            block,
            "\nSource {}:{chapter}\n\
             - Authors: {}\n\
             - Title: {}\n\
             - Year: {}\n\
             - Journal/Publisher: {venue}\n\
             - DOI: {}\n\
             - Abstract: {}\n",
            index + 1,
            authors_of(source),
            text_of(source.get("title")).unwrap_or_else(|| "Untitled".to_string()),
            text_of(source.get("year")).unwrap_or_else(|| "n.d.".to_string()),
            text_of(source.get("doi")).unwrap_or_else(|| "not available".to_string()),
            abstract_excerpt(source).unwrap_or_else(|| "not available".to_string()),
        );
    }
    block
}

/// User message for drafting a thesis
pub fn write_message(request: &GenerationRequest) -> String {
    let outline =
        serde_json::to_string_pretty(&request.outline).unwrap_or_else(|_| "[]".to_string());
    let mandatory = if request.mandatory_sources.is_empty() {
        "none".to_string()
    } else {
        request
            .mandatory_sources
            .iter()
            .map(|source| format!("- {source}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Research question: {}\n\n{}\n\nOutline (JSON):\n{outline}\n\nMandatory sources:\n{mandatory}\n\n{}",
        request.research_question,
        specifications_block(request),
        sources_block(&request.available_sources),
    )
}

/// Full `generateContent` request for drafting
pub fn build_write_request(request: &GenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest::single_turn(
        Some(WRITE_INSTRUCTION.to_string()),
        write_message(request),
    )
}

/// Full `generateContent` request for citation extraction
pub fn build_extract_request(thesis_text: &str, citation_style: &str) -> GenerateContentRequest {
    GenerateContentRequest::single_turn(
        Some(EXTRACT_INSTRUCTION.to_string()),
        format!("Citation style: {citation_style}\n\nThesis text:\n{thesis_text}"),
    )
}

/// Read the model's citation list, repairing a missing opening bracket or
/// a list cut off after its last complete entry.
pub fn parse_citation_array(raw: &str) -> serde_json::Result<Vec<Value>> {
    let mut json = strip_code_fence(raw).to_string();
    if !json.starts_with('[') {
        json.insert(0, '[');
    }
    if !json.ends_with(']') {
        if let Some(last_brace) = json.rfind('}') {
            json.truncate(last_brace + 1);
            json.push(']');
        }
    }
    serde_json::from_str(&json)
}
