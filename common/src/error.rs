use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Clasificación gruesa de fallos, la que ve el cliente HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Forbidden,
    NotFound,
    #[serde(rename = "internal_error")]
    Internal,
}

/// Error tipado de una acción.
///
/// Separa entrada inválida, herramienta/entorno no disponible y fallos
/// transitorios, para poder decidir reintentos más adelante.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("ruta fuera del directorio permitido: {0}")]
    Forbidden(String),

    #[error("archivo no encontrado: {0}")]
    NotFound(String),

    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    #[error("herramienta no disponible: {0}")]
    ToolUnavailable(String),

    #[error("{tool} terminó con error ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("falta configuración: {0}")]
    Unconfigured(String),

    #[error("tiempo agotado: {0}")]
    Timeout(String),

    #[error("error de red: {0}")]
    Network(String),

    #[error("{url} respondió {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("error de base de datos: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("error de E/S: {0}")]
    Io(#[from] io::Error),

    #[error("la tarea se interrumpió: {0}")]
    Aborted(String),
}

impl ActionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ActionError::Forbidden(_) => FailureKind::Forbidden,
            ActionError::NotFound(_) => FailureKind::NotFound,
            _ => FailureKind::Internal,
        }
    }

    /// Fallos que podrían salir bien si se reintenta igual.
    /// Un 4xx o un permiso denegado no cambian con reintentos.
    pub fn is_transient(&self) -> bool {
        match self {
            ActionError::Timeout(_) | ActionError::Network(_) => true,
            ActionError::HttpStatus { status, .. } => *status >= 500,
            ActionError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    /// Convierte un io::Error de lectura, separando el NotFound del resto.
    pub fn from_read(path: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            ActionError::NotFound(path.to_string())
        } else {
            ActionError::Io(err)
        }
    }
}

impl From<reqwest::Error> for ActionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ActionError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            // error_for_status()
            ActionError::HttpStatus {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            }
        } else {
            ActionError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::InvalidInput(err.to_string())
    }
}

impl From<image::ImageError> for ActionError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => ActionError::Io(e),
            other => ActionError::InvalidInput(other.to_string()),
        }
    }
}

/// Cuerpo JSON de error que devuelve el servidor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: FailureKind,
    pub message: String,
}

impl From<&ActionError> for ErrorBody {
    fn from(err: &ActionError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mapea_forbidden_not_found_y_resto_interno() {
        assert_eq!(
            ActionError::Forbidden("/etc".into()).kind(),
            FailureKind::Forbidden
        );
        assert_eq!(
            ActionError::NotFound("x".into()).kind(),
            FailureKind::NotFound
        );
        assert_eq!(
            ActionError::InvalidInput("json".into()).kind(),
            FailureKind::Internal
        );
        assert_eq!(
            ActionError::ToolUnavailable("git".into()).kind(),
            FailureKind::Internal
        );
    }

    #[test]
    fn from_read_distingue_not_found() {
        let nf = io::Error::new(io::ErrorKind::NotFound, "nope");
        assert!(matches!(
            ActionError::from_read("/data/a.txt", nf),
            ActionError::NotFound(p) if p == "/data/a.txt"
        ));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            ActionError::from_read("/data/a.txt", denied),
            ActionError::Io(_)
        ));
    }

    #[test]
    fn transitorios_solo_red_tiempo_y_io() {
        assert!(ActionError::Timeout("git".into()).is_transient());
        assert!(ActionError::Network("dns".into()).is_transient());
        assert!(!ActionError::InvalidInput("x".into()).is_transient());
        assert!(!ActionError::Unconfigured("token".into()).is_transient());
    }

    #[test]
    fn http_status_solo_5xx_es_transitorio() {
        let status = |status| ActionError::HttpStatus {
            url: "http://api/x".into(),
            status,
        };
        assert!(!status(400).is_transient());
        assert!(!status(404).is_transient());
        assert!(status(503).is_transient());
        assert_eq!(status(404).kind(), FailureKind::Internal);
        assert_eq!(status(404).to_string(), "http://api/x respondió 404");
    }

    #[test]
    fn io_transitorio_solo_para_errores_reintentables() {
        let io_err = |kind| ActionError::Io(io::Error::new(kind, "x"));
        assert!(io_err(io::ErrorKind::Interrupted).is_transient());
        assert!(io_err(io::ErrorKind::TimedOut).is_transient());
        assert!(io_err(io::ErrorKind::WouldBlock).is_transient());
        assert!(!io_err(io::ErrorKind::PermissionDenied).is_transient());
        assert!(!io_err(io::ErrorKind::InvalidData).is_transient());
    }

    #[test]
    fn error_body_serializa_snake_case() {
        let body = ErrorBody::from(&ActionError::Timeout("clone".into()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["message"], "tiempo agotado: clone");

        let body = ErrorBody::from(&ActionError::NotFound("a".into()));
        assert_eq!(serde_json::to_value(&body).unwrap()["error"], "not_found");
    }
}
