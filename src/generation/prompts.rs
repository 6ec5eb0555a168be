//! Prompt templates for grounded answer generation.
//!
//! Centralized so the grounding rules can be tuned without touching the
//! client code. The rules enforce the generation constraints: answer only
//! from supplied context, refuse out-of-context questions with a fixed
//! sentinel phrase, and never emit inline citations (sources are attached
//! separately by the pipeline).

use crate::retrieval::RetrievedCandidate;

/// Sentinel the model must use when the context lacks the answer.
pub const NOT_IN_DOCUMENTS: &str =
    "This information is not available in the provided documents";

/// Sentinel the model must use for questions outside the document scope.
pub const OFF_TOPIC: &str = "I can only answer questions about the provided medical documents";

/// Fixed answer when retrieval finds nothing to ground on.
pub const NO_GROUNDING_ANSWER: &str =
    "I could not find any relevant information in the documents to answer your question.";

pub const SYSTEM_PROMPT: &str = "\
You are a focused medical assistant for document-based queries ONLY.

KEY RULES:
- Answer ONLY from the provided medical documents
- Extract exact values, numbers, measurements, and dates
- Do NOT include source references (provided separately)
- Do NOT discuss general medical topics not in documents
- Do NOT answer non-medical or off-topic questions
- Be precise: include dates, units, reference ranges when present
- For unclear or off-topic questions, politely redirect to document-related queries";

/// Renders retrieved passages into the context block, one labelled source
/// section per passage.
pub fn build_context(passages: &[RetrievedCandidate]) -> String {
    let mut sections = Vec::with_capacity(passages.len());

    for (i, passage) in passages.iter().enumerate() {
        let text = passage.metadata.text.trim();
        if text.is_empty() {
            continue;
        }
        sections.push(format!(
            "[Source {}: {} (Page {})]\n{}",
            i + 1,
            passage.metadata.document_name,
            passage.metadata.page_number,
            text
        ));
    }

    sections.join("\n---\n")
}

/// The grounded-answer user prompt.
pub fn build_user_prompt(query: &str, context: &str) -> String {
    format!(
        "ANSWER USING ONLY PROVIDED CONTEXT:\n\n\
         INSTRUCTIONS:\n\
         1. Answer ONLY using information from the context below\n\
         2. Do NOT include source names or page numbers in your answer\n\
         3. Extract exact values, numbers, dates, and measurements when available\n\
         4. If the question is about topics NOT in the context, say: \"{OFF_TOPIC}\"\n\
         5. If information is NOT in the context, say: \"{NOT_IN_DOCUMENTS}\"\n\
         6. Do NOT provide general medical knowledge or external information\n\
         7. Be specific: include dates, units, and reference ranges when present\n\n\
         PROVIDED MEDICAL CONTEXT:\n\
         {context}\n\n\
         QUESTION: {query}\n\n\
         ANSWER: Provide a precise answer using ONLY the above context. \
         Do not include sources or citations."
    )
}
