use std::sync::Arc;

use chrono::{DateTime, Utc};
use nw_core::{CitedArticle, CompletionModel, Result};
use tracing::debug;

/// Builds the answer prompt and runs one completion. The citation legend is
/// rendered in `cited` order, so the model's bracket numerals line up with
/// the retriever's citation list downstream.
pub struct AnswerSynthesizer {
    model: Arc<dyn CompletionModel>,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub async fn synthesize(
        &self,
        query: &str,
        context: &str,
        cited: &[CitedArticle],
    ) -> Result<String> {
        let prompt = build_prompt(query, context, cited);
        debug!("Synthesizing answer with {}", self.model.name());
        self.model.complete(&prompt).await
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => "Unknown Date".to_string(),
    }
}

/// `[n] "title" - source (date)` followed by the link, one entry per cited
/// article, blank line between entries.
pub fn format_citations(cited: &[CitedArticle]) -> String {
    cited
        .iter()
        .enumerate()
        .map(|(index, article)| {
            format!(
                "[{}] \"{}\" - {} ({})\n{}",
                index + 1,
                article.title,
                article.source,
                format_date(article.publish_date),
                article.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(query: &str, context: &str, cited: &[CitedArticle]) -> String {
    format!(
        "You are a helpful news assistant that answers questions based on recent news articles.\n\
         \n\
         Question: {}\n\
         \n\
         Below are relevant passages from news articles to help answer this question:\n\
         \n\
         {}\n\
         \n\
         Sources for citation:\n\
         {}\n\
         \n\
         Instructions:\n\
         1. Answer the question accurately based ONLY on the provided article passages.\n\
         2. If the provided passages don't contain enough information to answer, acknowledge this limitation.\n\
         3. When referring to information from articles, cite the source using numbers in square brackets [1], [2], etc.\n\
         4. Make your response conversational and helpful.\n\
         5. Keep your answer concise but comprehensive.\n\
         \n\
         Please provide a well-formed answer with appropriate citations:",
        query,
        context,
        format_citations(cited)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nw_inference::MockCompletion;

    fn cited(id: &str, title: &str) -> CitedArticle {
        CitedArticle {
            id: id.to_string(),
            title: title.to_string(),
            link: format!("http://news.test/{}", id),
            source: "Test Wire".to_string(),
            publish_date: Some(Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_citation_legend_numbering_matches_list_order() {
        let legend = format_citations(&[cited("a1", "First"), cited("a2", "Second")]);
        let first = legend.find("[1] \"First\"").unwrap();
        let second = legend.find("[2] \"Second\"").unwrap();
        assert!(first < second);
        assert!(legend.contains("Test Wire (Mar 5, 2026)"));
        assert!(legend.contains("http://news.test/a2"));
    }

    #[test]
    fn test_missing_date_renders_as_unknown() {
        let mut article = cited("a1", "Dateless");
        article.publish_date = None;
        let legend = format_citations(&[article]);
        assert!(legend.contains("(Unknown Date)"));
    }

    #[test]
    fn test_prompt_carries_question_context_and_legend() {
        let prompt = build_prompt("What happened?", "[1] Article: \"First\"\nbody\n", &[
            cited("a1", "First"),
        ]);
        assert!(prompt.contains("Question: What happened?"));
        assert!(prompt.contains("[1] Article: \"First\""));
        assert!(prompt.contains("[1] \"First\" - Test Wire"));
        assert!(prompt.contains("ONLY on the provided article passages"));
    }

    #[tokio::test]
    async fn test_synthesize_returns_model_answer() {
        let synthesizer = AnswerSynthesizer::new(Arc::new(MockCompletion::new(
            "Here is the answer [1].",
        )));
        let answer = synthesizer
            .synthesize("What happened?", "context", &[cited("a1", "First")])
            .await
            .unwrap();
        assert_eq!(answer, "Here is the answer [1].");
    }
}
