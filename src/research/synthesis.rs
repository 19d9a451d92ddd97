//! Citation / synthesis pipeline
//!
//! Formats aggregated records into a structured prompt, runs one model
//! completion, and projects the citation list positionally from the input
//! records: bracket numbers in the narrative are index-aligned with the
//! order records were embedded in the prompt, not content-addressed, so
//! reordering records renumbers citations.

use crate::llm::{ChatMessage, LLMClient};
use crate::types::{Citation, DocumentContext, ResearchRecord, Result, SynthesizedResponse};

const SYSTEM_PROMPT: &str = "\
You are a commercial real estate research analyst. Write a well-structured \
markdown briefing that answers the research question using only the numbered \
evidence records provided.

Format rules:
- Open with an '## Executive Summary' section of 2-4 sentences.
- Follow with clearly headed sections covering the key themes.
- Cite evidence inline with bracket numbers matching the record numbering, \
e.g. [1] or [2][4].
- Close with a '## Sources' section that lists each cited record number.
- Do not invent sources or cite numbers outside the provided range.";

pub struct Synthesizer {
    llm: Box<dyn LLMClient>,
}

impl Synthesizer {
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Run the synthesis call and return the narrative plus the
    /// positionally aligned citation list.
    ///
    /// The document context, when present, is rendered into the prompt
    /// after every adapter-derived record but is not a citable source, so
    /// it never appears in the citation list.
    pub async fn synthesize(
        &self,
        query: &str,
        records: &[ResearchRecord],
        document: Option<&DocumentContext>,
    ) -> Result<SynthesizedResponse> {
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(query, records, document)),
        ];

        tracing::debug!(
            model = self.llm.model_name(),
            records = records.len(),
            "running synthesis"
        );
        let response = self.llm.complete(&messages).await?;

        let citations: Vec<Citation> = records.iter().map(Citation::from).collect();

        Ok(SynthesizedResponse {
            response,
            citations,
        })
    }
}

fn build_user_prompt(
    query: &str,
    records: &[ResearchRecord],
    document: Option<&DocumentContext>,
) -> String {
    let mut prompt = format!("Research question: {}\n\nEvidence records:\n", query);

    for (i, record) in records.iter().enumerate() {
        let authors = if record.authors.is_empty() {
            "Unknown authors"
        } else {
            &record.authors
        };
        prompt.push_str(&format!(
            "\n{}. \"{}\" - {} ({}). {}. {}\n   {}\n",
            i + 1,
            record.title,
            authors,
            record.date,
            record.source,
            record.link,
            record.summary
        ));
    }

    if let Some(doc) = document {
        prompt.push_str(&format!(
            "\n{}. Document Analysis - context supplied by the requester \
             (not a citable source)\n   Summary: {}\n   Topics: {}\n   Word count: {}\n",
            records.len() + 1,
            doc.summary,
            doc.topics.join(", "),
            doc.word_count
        ));
    }

    prompt
}
