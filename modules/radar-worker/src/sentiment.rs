//! Sentiment classification for short Hebrew venue chatter.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use ai_client::{ChatMessage, ChatRequest, OpenAiClient};

use crate::traits::SentimentClassifier;

const MODEL: &str = "gpt-4o-mini";

/// The classifier answers with a bare number; slang guidance matters more
/// than grammar for this corpus.
const SYSTEM_PROMPT: &str = "אתה מסווג סנטימנט של טקסטים קצרים בעברית על מסעדות ודוכני אוכל. \
ענה במספר אחד בלבד בין -1.0 (שלילי מאוד) ל-1.0 (חיובי מאוד), כאשר 0 הוא ניטרלי. \
קח בחשבון סלנג ישראלי: 'פצצה', 'אש', 'סוף הדרך', 'מטורף' הם חיוביים מאוד.";

pub struct SentimentScorer {
    client: Option<OpenAiClient>,
}

impl SentimentScorer {
    /// An empty API key disables the scorer for the lifetime of the
    /// process; every text then classifies as neutral.
    pub fn new(api_key: &str) -> Self {
        let client = if api_key.is_empty() {
            warn!("OPENAI_API_KEY not set; sentiment disabled, all texts score neutral");
            None
        } else {
            Some(OpenAiClient::new(api_key))
        };
        Self { client }
    }

    async fn score(&self, text: &str) -> Result<f64> {
        let Some(client) = &self.client else {
            return Ok(0.0);
        };
        let request = ChatRequest {
            model: MODEL.to_string(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(text),
            ],
            temperature: Some(0.0),
            max_tokens: Some(10),
        };
        let raw = client.chat_text(&request).await?;
        parse_score(&raw)
    }
}

fn parse_score(raw: &str) -> Result<f64> {
    let parsed: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Unparseable sentiment reply: {raw:?}"))?;
    Ok(parsed.clamp(-1.0, 1.0))
}

#[async_trait]
impl SentimentClassifier for SentimentScorer {
    async fn classify(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        match self.score(text).await {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, "Sentiment classification failed, scoring neutral");
                0.0
            }
        }
    }
}
