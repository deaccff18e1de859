//! Narrative analysis of recent transactions.
//!
//! The text itself comes from an external generator behind [`TextGenerator`]; this
//! module only renders the prompt and folds generator failures into the result.

use crate::{
    core::transaction::recent_transactions,
    entities::{TransactionKind, transaction},
    errors::Result,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// How many recent transactions an analysis covers unless the caller asks otherwise.
pub const DEFAULT_TRANSACTION_LIMIT: u64 = 50;

const PROMPT_PREFIX: &str = "Analyze the following transactions and provide useful insights, \
including identifying potentially useless transactions or suggesting alternatives:\n\n";

/// Failure reported by a [`TextGenerator`].
#[derive(Debug, thiserror::Error)]
#[error("Text generation failed: {message}")]
pub struct GenerationError {
    pub message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An opaque prompt-in, text-out service.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

/// Outcome of [`analyze_transactions`], serialized as `{"analysis": ..}` or
/// `{"error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAnalysis {
    Analysis(String),
    Error(String),
}

fn describe(transaction: &transaction::Model) -> String {
    let kind = match transaction.kind {
        TransactionKind::Income => "Income",
        TransactionKind::Expense => "Expense",
    };
    format!(
        "Date: {}, Description: {}, Category: {}, Amount: ${:.2}, Type: {kind}",
        transaction.date.format("%Y-%m-%d"),
        transaction.description,
        transaction.category,
        transaction.amount.trunc().abs(),
    )
}

/// Renders the generator prompt, one line per transaction in the given order.
#[must_use]
pub fn build_analysis_prompt(transactions: &[transaction::Model]) -> String {
    let lines: Vec<String> = transactions.iter().map(describe).collect();
    format!("{PROMPT_PREFIX}{}", lines.join("\n"))
}

/// Asks `generator` to analyze the owner's `limit` most recent transactions.
///
/// Store failures are returned as errors. A generator failure is not: it is
/// logged and reported as [`TransactionAnalysis::Error`].
#[instrument(skip(db, generator))]
pub async fn analyze_transactions<C, G>(
    db: &C,
    generator: &G,
    owner_id: &str,
    limit: u64,
) -> Result<TransactionAnalysis>
where
    C: ConnectionTrait,
    G: TextGenerator,
{
    let transactions = recent_transactions(db, owner_id, limit).await?;
    debug!(count = transactions.len(), "Building analysis prompt");
    let prompt = build_analysis_prompt(&transactions);

    match generator.generate(&prompt).await {
        Ok(text) => Ok(TransactionAnalysis::Analysis(text)),
        Err(e) => {
            warn!(error = %e, "Transaction analysis failed");
            Ok(TransactionAnalysis::Error(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use std::sync::Mutex;

    /// Echoes the prompt back and remembers it.
    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("Cut back on takeaway".to_string())
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            Err(GenerationError::new("quota exceeded"))
        }
    }

    #[tokio::test]
    async fn test_build_analysis_prompt_format() -> Result<()> {
        let (db, _owner) = setup_with_owner().await?;
        create_test_transaction(&db, "income", 2500.0, date(2024, 6, 1)).await?;
        create_test_transaction(&db, "food", 42.99, date(2024, 6, 3)).await?;

        let transactions = recent_transactions(&db, TEST_OWNER, 50).await?;
        let prompt = build_analysis_prompt(&transactions);

        let expected = format!(
            "{PROMPT_PREFIX}\
             Date: 2024-06-03, Description: Test transaction, Category: food, Amount: $42.00, Type: Expense\n\
             Date: 2024-06-01, Description: Test transaction, Category: income, Amount: $2500.00, Type: Income"
        );
        assert_eq!(prompt, expected);
        Ok(())
    }

    #[test]
    fn test_build_analysis_prompt_empty() {
        assert_eq!(build_analysis_prompt(&[]), PROMPT_PREFIX);
    }

    #[tokio::test]
    async fn test_analyze_transactions_respects_limit() -> Result<()> {
        let (db, _owner) = setup_with_owner().await?;
        for day in 1..=5 {
            create_test_transaction(&db, "food", 10.0, date(2024, 6, day)).await?;
        }

        let generator = RecordingGenerator::default();
        let result = analyze_transactions(&db, &generator, TEST_OWNER, 3).await?;
        assert_eq!(
            result,
            TransactionAnalysis::Analysis("Cut back on takeaway".to_string())
        );

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].matches("Date: ").count(), 3);
        assert!(prompts[0].contains("Date: 2024-06-05"));
        assert!(!prompts[0].contains("Date: 2024-06-02"));
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze_transactions_generator_failure() -> Result<()> {
        init_test_tracing();
        let (db, _owner) = setup_with_owner().await?;
        create_test_transaction(&db, "food", 10.0, date(2024, 6, 1)).await?;

        let result =
            analyze_transactions(&db, &FailingGenerator, TEST_OWNER, DEFAULT_TRANSACTION_LIMIT)
                .await?;
        assert_eq!(
            result,
            TransactionAnalysis::Error("Text generation failed: quota exceeded".to_string())
        );
        Ok(())
    }
}
