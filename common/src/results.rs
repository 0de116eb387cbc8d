use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::ActionKind;

/// Mensaje que devuelve /run cuando ningún trigger coincide.
pub const TASK_NOT_RECOGNIZED: &str = "Task is not recognized";

/// Resultado exitoso de una acción.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutput {
    pub kind: ActionKind,
    /// Archivo (o directorio) que dejó escrita la acción
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Campos descriptivos, ej: {"count": 2}
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl ActionOutput {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            output_path: None,
            details: Map::new(),
        }
    }

    pub fn with_output(mut self, path: impl Into<String>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Respuesta simple `{"message": "..."}` (liveness y tarea no reconocida).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
