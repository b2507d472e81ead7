use std::path::Path;

use tracing::warn;

use docqa_core::traits::Generator;
use docqa_core::Result;

use crate::retriever::{Retriever, NO_INFORMATION};

/// Fill the answer template with the retrieved context and the question.
pub fn render_prompt(context: &str, question: &str, max_words: usize) -> String {
    format!(
        "You are answering a question using only the provided context.\n\
         \n\
         Rules:\n\
         - Use only information from the context\n\
         - Be concise and directly answer the question\n\
         - Do NOT speculate or infer beyond the context\n\
         - Do NOT cite external authors, studies, or references\n\
         - If the answer is not in the context, say:\n\
         \x20 \"{NO_INFORMATION}\"\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question:\n\
         {question}\n\
         \n\
         Answer in no more than {max_words} words.\n"
    )
}

/// Question answering over the ingested document.
pub struct Assistant<G: Generator> {
    retriever: Retriever,
    generator: G,
}

impl<G: Generator> Assistant<G> {
    pub fn new(retriever: Retriever, generator: G) -> Self { Self { retriever, generator } }

    pub fn retriever(&self) -> &Retriever { &self.retriever }

    pub fn ingest_file(&mut self, path: &Path) -> Result<usize> { self.retriever.ingest_file(path) }

    pub fn ingest(&mut self, raw_text: &str) -> Result<usize> { self.retriever.ingest(raw_text) }

    /// Answer `question` from the document. The generator is not called when
    /// retrieval finds nothing; a generator failure comes back as the answer
    /// text `Error generating response: ...`.
    pub fn ask(&self, question: &str) -> Result<String> {
        let settings = self.retriever.retrieval();
        let Some(context) = self.retriever.assemble_context(question, settings.top_k, settings.context_size)? else {
            return Ok(NO_INFORMATION.to_string());
        };
        let prompt = render_prompt(&context, question, settings.max_words);
        match self.generator.generate(&prompt) {
            Ok(answer) => Ok(answer.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "generation failed");
                Ok(format!("Error generating response: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_context_question_and_budget() {
        let prompt = render_prompt("ctx line", "why?", 42);
        assert!(prompt.contains("Context:\nctx line\n"));
        assert!(prompt.contains("Question:\nwhy?\n"));
        assert!(prompt.contains("Answer in no more than 42 words."));
        assert!(prompt.contains("  \"The document does not provide this information.\""));
    }
}
