use crate::llm::LLMClient;
use crate::providers::SynthesisProvider;
use crate::types::ProviderError;
use async_trait::async_trait;

const ANALYST_SYSTEM_PROMPT: &str = "You are an expert risk analyst specializing in cross-market comparative analysis.

You will receive search results gathered from multiple markets/regions. Your task is to:

1. Synthesize the findings from each market
2. Identify common patterns and themes across regions
3. Highlight regional differences and unique concerns
4. Assess the overall global risk profile

Provide a well-structured analysis with clear sections. Be objective and cite specific findings from the market data provided.
Do not try to search for more information. Work only with the market data provided to you.";

/// Synthesis provider that asks an LLM for a cross-market analysis
pub struct LlmSynthesisProvider {
    llm: Box<dyn LLMClient>,
}

impl LlmSynthesisProvider {
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }
}

/// Wrap the engine's per-region context in the analysis request
fn analysis_prompt(subject: &str, context: &str) -> String {
    format!(
        r#"# Cross-Market Risk Analysis Request

## Company: {subject}

{context}

---

## Your Analysis Task

Based on the market-specific findings above, provide a comprehensive cross-market risk analysis:

### 1. Market-by-Market Summary
Summarize the key findings from each successful market search.

### 2. Cross-Market Patterns
What themes, concerns, or findings appear consistently across multiple markets?

### 3. Regional Differences
How does the company's perception or risk profile vary between regions?

### 4. Global Risk Assessment
Provide an overall risk assessment considering all markets. Rate the risk level and explain.

### 5. Data Gaps
Note any limitations due to failed market searches or missing information.

---

IMPORTANT: Base your analysis ONLY on the search results provided above. Do not use external knowledge."#
    )
}

#[async_trait]
impl SynthesisProvider for LlmSynthesisProvider {
    async fn synthesize(&self, subject: &str, context: &str) -> Result<String, ProviderError> {
        let prompt = analysis_prompt(subject, context);
        let text = self
            .llm
            .generate_with_system(ANALYST_SYSTEM_PROMPT, &prompt)
            .await?;

        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse(
                "model returned an empty analysis".to_string(),
            ));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "llm"
    }
}
