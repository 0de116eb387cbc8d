use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_DATA_ROOT: &str = "/data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_AIPROXY_URL: &str = "https://aiproxy.sanand.workers.dev/openai/v1";
pub const DEFAULT_USER_EMAIL: &str = "user@example.com";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 300;

/// Configuración del proceso.
/// Se carga una sola vez al arrancar y después se comparte en modo lectura (Arc).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directorio raíz permitido: /read no sale de aquí y todas las
    /// acciones leen/escriben debajo de él.
    pub data_root: PathBuf,
    pub bind_addr: String,
    /// Token bearer del proxy LLM (AIPROXY_TOKEN). Sin token, /agent y la
    /// transcripción fallan con error de configuración.
    pub aiproxy_token: Option<String>,
    pub aiproxy_url: String,
    /// Email que se pasa como argumento al script de datagen
    pub user_email: String,
    /// Límite para subprocesos y llamadas HTTP
    pub command_timeout: Duration,
}

impl Settings {
    /// Lee la configuración de las variables de entorno.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env`, pero con una función de búsqueda arbitraria
    /// (para tests sin tocar el entorno del proceso).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let command_timeout_secs = non_empty("COMMAND_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);

        Self {
            data_root: non_empty("DATA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT)),
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            aiproxy_token: non_empty("AIPROXY_TOKEN"),
            aiproxy_url: non_empty("AIPROXY_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_AIPROXY_URL.to_string()),
            user_email: non_empty("USER_EMAIL").unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()),
            command_timeout: Duration::from_secs(command_timeout_secs),
        }
    }

    /// Configuración apuntando a otro directorio de datos (útil en tests).
    pub fn with_data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_root = root.into();
        self
    }

    /// Ruta `<data_root>/<name>` como String, que es como viajan en las acciones.
    pub fn data_path(&self, name: &str) -> String {
        self.data_root.join(name).to_string_lossy().to_string()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn settings_usa_defaults_sin_variables() {
        let s = Settings::default();
        assert_eq!(s.data_root, PathBuf::from("/data"));
        assert_eq!(s.bind_addr, "0.0.0.0:8000");
        assert!(s.aiproxy_token.is_none());
        assert_eq!(s.aiproxy_url, DEFAULT_AIPROXY_URL);
        assert_eq!(s.command_timeout, Duration::from_secs(300));
    }

    #[test]
    fn settings_respeta_variables_definidas() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATA_ROOT", "/tmp/datos"),
            ("AIPROXY_TOKEN", "secreto"),
            ("AIPROXY_URL", "http://proxy.local/v1/"),
            ("USER_EMAIL", "yo@example.com"),
            ("COMMAND_TIMEOUT_SECS", "12"),
        ]);
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(s.data_root, PathBuf::from("/tmp/datos"));
        assert_eq!(s.aiproxy_token.as_deref(), Some("secreto"));
        // sin la barra final
        assert_eq!(s.aiproxy_url, "http://proxy.local/v1");
        assert_eq!(s.user_email, "yo@example.com");
        assert_eq!(s.command_timeout, Duration::from_secs(12));
        assert_eq!(s.data_path("dates.txt"), "/tmp/datos/dates.txt");
    }

    #[test]
    fn settings_ignora_valores_vacios_o_invalidos() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("AIPROXY_TOKEN", "  "), ("COMMAND_TIMEOUT_SECS", "mucho")]);
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert!(s.aiproxy_token.is_none());
        assert_eq!(s.command_timeout, Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS));
    }
}
