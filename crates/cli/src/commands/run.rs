//! Run command handler: render a session and submit it to the LLM.

use clap::Args;
use futures::StreamExt;
use promptcraft_core::{config::AppConfig, AppResult};
use promptcraft_llm::{create_client, LlmRequest};
use promptcraft_prompt::{get_template, render};
use promptcraft_session::SessionStore;
use std::io::Write;

/// Render a session and send it to the configured LLM
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Session to render and run
    pub session: String,

    /// Print the full response at once instead of streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Maximum tokens in the response
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0-2.0)
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl RunCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        config.validate()?;

        let store = SessionStore::new(&config.state_dir())?;
        let spec = store.load(&self.session)?;
        let template = get_template(&spec.template)?;
        let prompt = render(template, &spec, None, None)?;

        tracing::info!(
            "Running session '{}' with {}/{}",
            self.session,
            config.provider,
            config.model
        );

        let client = create_client(&config.provider, None, config.api_key.as_deref())?;
        let mut request = LlmRequest::new(prompt, &config.model);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        if self.no_stream {
            let response = client.complete(&request).await?;
            println!("{}", response.content);
            tracing::debug!(
                "Token usage - prompt: {}, completion: {}",
                response.usage.prompt_tokens,
                response.usage.completion_tokens
            );
            return Ok(());
        }

        let request = request.with_streaming();
        let mut stream = client.stream(&request).await?;
        let mut stdout = std::io::stdout();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            write!(stdout, "{}", chunk.content)?;
            stdout.flush()?;
            if chunk.done {
                if let Some(usage) = chunk.usage {
                    tracing::debug!(
                        "Token usage - prompt: {}, completion: {}",
                        usage.prompt_tokens,
                        usage.completion_tokens
                    );
                }
            }
        }
        println!();

        Ok(())
    }
}
