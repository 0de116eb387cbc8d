//! Cliente del proxy LLM (API compatible con OpenAI).
//!
//! Se usa para el endpoint /agent (chat completions sin clasificar nada
//! localmente) y para transcribir audio.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::ActionError;

pub const CHAT_MODEL: &str = "gpt-4o-mini";
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

const SYSTEM_PROMPT: &str = "You are an assistant who has to do a variety of tasks. \
If your task involves running a script, you can use the script_runner tool.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Value,
    tool_choice: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl LlmClient {
    pub fn new(http: reqwest::Client, settings: &Settings) -> Self {
        Self {
            http,
            base_url: settings.aiproxy_url.clone(),
            token: settings.aiproxy_token.clone(),
        }
    }

    fn token(&self) -> Result<&str, ActionError> {
        self.token
            .as_deref()
            .ok_or_else(|| ActionError::Unconfigured("AIPROXY_TOKEN no está definido".to_string()))
    }

    /// Manda la tarea tal cual al chat completions y devuelve el JSON del proxy.
    pub async fn chat(&self, task: &str) -> Result<Value, ActionError> {
        let token = self.token()?;
        let url = format!("{}/chat/completions", self.base_url);

        let payload = ChatCompletionRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: task.to_string(),
                },
            ],
            tools: script_runner_tools(),
            tool_choice: "auto",
        };

        debug!(model = %payload.model, "enviando tarea al proxy LLM");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, %body, "el proxy LLM devolvió error");
            return Err(ActionError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(resp.json::<Value>().await?)
    }

    /// Sube un WAV al endpoint de transcripción y devuelve el texto.
    pub async fn transcribe(&self, wav: Vec<u8>) -> Result<String, ActionError> {
        let token = self.token()?;
        let url = format!("{}/audio/transcriptions", self.base_url);

        let part = Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: TranscriptionResponse = resp.json().await?;
        Ok(body.text)
    }
}

/// Definición de la herramienta `script_runner` que se ofrece al modelo.
pub fn script_runner_tools() -> Value {
    json!([
        {
            "type": "function",
            "function": {
                "name": "script_runner",
                "description": "Install a package and run a script from a url with provided arguments",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "script_url": {
                            "type": "string",
                            "description": "URL of the script to be executed."
                        },
                        "args": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Arguments to be passed to the script."
                        }
                    },
                    "required": ["script_url", "args"]
                }
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chat_sin_token_es_error_de_configuracion() {
        let client = LlmClient::new(reqwest::Client::new(), &Settings::default());
        let res = client.chat("hola").await;
        assert!(matches!(res, Err(ActionError::Unconfigured(_))));
    }

    #[tokio::test]
    async fn transcribe_sin_token_es_error_de_configuracion() {
        let client = LlmClient::new(reqwest::Client::new(), &Settings::default());
        let res = client.transcribe(vec![0u8; 4]).await;
        assert!(matches!(res, Err(ActionError::Unconfigured(_))));
    }

    #[test]
    fn script_runner_tools_declara_parametros_requeridos() {
        let tools = script_runner_tools();
        let f = &tools[0]["function"];
        assert_eq!(f["name"], "script_runner");
        assert_eq!(f["parameters"]["required"], json!(["script_url", "args"]));
    }
}
