//! Classifier gateway.
//!
//! Wraps the single language model call per request with the fallback
//! policy: any runtime failure yields an empty mapping.

use super::error::ClassifierError;
use super::prompt::build_prompt;
use super::response::parse_classifications;
use super::LanguageModel;
use crate::models::Classification;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Boundary between the pipeline and the external language model.
#[derive(Clone)]
pub struct ClassifierGateway {
    model: Arc<dyn LanguageModel>,
}

impl ClassifierGateway {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Fails only when the backend is missing configuration.
    pub fn ensure_configured(&self) -> Result<(), ClassifierError> {
        self.model.ensure_configured()
    }

    /// Description of the backend for logs.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.model.provider_name(), self.model.model_name())
    }

    /// Classify distinct titles with one model call.
    ///
    /// Never fails: on any error the cause is logged and an empty mapping is
    /// returned, so every title falls back to Distracting downstream.
    pub async fn classify(&self, titles: &[String]) -> HashMap<String, Classification> {
        if titles.is_empty() {
            return HashMap::new();
        }

        match self.try_classify(titles).await {
            Ok(classifications) => {
                let missing = titles
                    .iter()
                    .filter(|t| !classifications.contains_key(*t))
                    .count();
                if missing > 0 {
                    debug!("Model left {} of {} titles unclassified", missing, titles.len());
                }
                classifications
            }
            Err(e) => {
                warn!(
                    "Classification via {} failed, defaulting {} titles to Distracting: {}",
                    self.describe(),
                    titles.len(),
                    e
                );
                HashMap::new()
            }
        }
    }

    async fn try_classify(
        &self,
        titles: &[String],
    ) -> Result<HashMap<String, Classification>, ClassifierError> {
        let prompt = build_prompt(titles);
        info!("Classifying {} titles via {}", titles.len(), self.describe());

        let raw = self.model.complete(&prompt).await?;
        debug!("Model response: {}", raw);

        parse_classifications(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::testing::{Reply, ScriptedModel};

    fn titles() -> Vec<String> {
        vec!["Docs".to_string(), "Cat Videos".to_string()]
    }

    #[tokio::test]
    async fn test_classify_parses_model_output() {
        let model = Arc::new(ScriptedModel::new(Reply::Text(
            "```json\n{\"Docs\": \"Productive\", \"Cat Videos\": \"Distracting\"}\n```".to_string(),
        )));
        let gateway = ClassifierGateway::new(model.clone());

        let result = gateway.classify(&titles()).await;
        assert_eq!(result["Docs"], Classification::Productive);
        assert_eq!(result["Cat Videos"], Classification::Distracting);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_single_call_regardless_of_batch_size() {
        let model = Arc::new(ScriptedModel::new(Reply::Text("{}".to_string())));
        let gateway = ClassifierGateway::new(model.clone());

        let many: Vec<String> = (0..250).map(|i| format!("Page {}", i)).collect();
        gateway.classify(&many).await;
        assert_eq!(model.calls(), 1);
        assert_eq!(model.last_prompt().unwrap().matches("Page ").count(), 250);
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty_mapping() {
        for reply in [
            Reply::Timeout,
            Reply::ApiError,
            Reply::Text("I think Docs is productive".to_string()),
            Reply::Text(String::new()),
        ] {
            let gateway = ClassifierGateway::new(Arc::new(ScriptedModel::new(reply)));
            assert!(gateway.classify(&titles()).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_empty_titles_skip_model_call() {
        let model = Arc::new(ScriptedModel::new(Reply::Text("{}".to_string())));
        let gateway = ClassifierGateway::new(model.clone());

        assert!(gateway.classify(&[]).await.is_empty());
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_ensure_configured_reports_missing_credential() {
        let gateway = ClassifierGateway::new(Arc::new(ScriptedModel::unconfigured()));
        assert!(matches!(
            gateway.ensure_configured(),
            Err(ClassifierError::MissingCredential("GOOGLE_API_KEY"))
        ));
    }
}
