//! Brief translation client.

use std::sync::Arc;

use async_trait::async_trait;
use deconstruct_models::BriefField;
use tracing::debug;

use crate::error::AiResult;
use crate::gemini::{GenerateRequest, GenerativeModel};
use crate::prompt::build_translation_prompt;

/// Translates one brief section into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Returns the trimmed translation. An empty answer is a success with an
    /// empty string, not an error.
    async fn translate(&self, text: &str, target_lang: &str, field: BriefField) -> AiResult<String>;
}

/// Translator backed by a generative model, free-text output.
pub struct TranslationClient {
    model: Arc<dyn GenerativeModel>,
}

impl TranslationClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn translate(&self, text: &str, target_lang: &str, field: BriefField) -> AiResult<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let prompt = build_translation_prompt(text, target_lang, field);
        let output = self
            .model
            .generate(GenerateRequest::new().with_text(prompt))
            .await?;

        let translated = output.map(|t| t.trim().to_string()).unwrap_or_default();
        debug!(
            field = %field,
            target_lang,
            chars = translated.chars().count(),
            "Translation received"
        );
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use crate::gemini::MockGenerativeModel;

    #[tokio::test]
    async fn test_translate_trims_output() {
        let mut model = MockGenerativeModel::new();
        model
            .expect_generate()
            .withf(|req| {
                req.response_schema.is_none()
                    && req.media().is_none()
                    && req
                        .prompt()
                        .is_some_and(|p| p.contains("sellingPoints") && p.contains("Japanese"))
            })
            .times(1)
            .returning(|_| Ok(Some("  安い\n便利  \n".to_string())));

        let client = TranslationClient::new(Arc::new(model));
        let out = client
            .translate("便宜\n方便", "Japanese", BriefField::SellingPoints)
            .await
            .unwrap();
        assert_eq!(out, "安い\n便利");
    }

    #[tokio::test]
    async fn test_empty_input_is_empty_success() {
        let mut model = MockGenerativeModel::new();
        model.expect_generate().times(0);

        let client = TranslationClient::new(Arc::new(model));
        let out = client
            .translate("", "English", BriefField::ShootingGuide)
            .await;
        tokio_test::assert_ok!(&out);
        assert_eq!(out.unwrap(), "");
    }

    #[tokio::test]
    async fn test_no_text_is_empty_success() {
        let mut model = MockGenerativeModel::new();
        model.expect_generate().times(1).returning(|_| Ok(None));

        let client = TranslationClient::new(Arc::new(model));
        let out = client
            .translate("镜头", "English", BriefField::ShootingGuide)
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let mut model = MockGenerativeModel::new();
        model
            .expect_generate()
            .returning(|_| Err(AiError::transport("connection reset")));

        let client = TranslationClient::new(Arc::new(model));
        let out = client
            .translate("镜头", "English", BriefField::ScriptReference)
            .await;
        tokio_test::assert_err!(out);
    }
}
