use serde::{Deserialize, Serialize};
use std::fmt;

/// Conjunto cerrado de operaciones soportadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ReadFile,
    CountWeekday,
    FormatFile,
    SortContacts,
    FindSimilarComments,
    QuerySqlite,
    RunScript,
    FetchApi,
    CloneRepo,
    CompressImage,
    TranscribeAudio,
    ConvertMarkdown,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ReadFile => "read_file",
            ActionKind::CountWeekday => "count_weekday",
            ActionKind::FormatFile => "format_file",
            ActionKind::SortContacts => "sort_contacts",
            ActionKind::FindSimilarComments => "find_similar_comments",
            ActionKind::QuerySqlite => "query_sqlite",
            ActionKind::RunScript => "run_script",
            ActionKind::FetchApi => "fetch_api",
            ActionKind::CloneRepo => "clone_repo",
            ActionKind::CompressImage => "compress_image",
            ActionKind::TranscribeAudio => "transcribe_audio",
            ActionKind::ConvertMarkdown => "convert_markdown",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Una acción concreta: el tipo más sus parámetros.
/// En JSON: `{"kind": "sort_contacts", "input": "...", "output": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    ReadFile {
        path: String,
    },
    CountWeekday {
        input: String,
        output: String,
        /// Nombre en inglés, ej: "Wednesday"
        weekday: String,
    },
    FormatFile {
        path: String,
        /// Paquete npm con versión, ej: "prettier@3.4.2"
        formatter: String,
    },
    SortContacts {
        input: String,
        output: String,
    },
    FindSimilarComments {
        input: String,
        output: String,
    },
    QuerySqlite {
        db: String,
        ticket_type: String,
        output: String,
    },
    RunScript {
        package: String,
        script_url: String,
        args: Vec<String>,
    },
    FetchApi {
        url: String,
        output: String,
    },
    CloneRepo {
        url: String,
        target: String,
    },
    CompressImage {
        input: String,
        output: String,
        quality: u8,
    },
    TranscribeAudio {
        input: String,
        output: String,
    },
    ConvertMarkdown {
        input: String,
        output: String,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ReadFile { .. } => ActionKind::ReadFile,
            Action::CountWeekday { .. } => ActionKind::CountWeekday,
            Action::FormatFile { .. } => ActionKind::FormatFile,
            Action::SortContacts { .. } => ActionKind::SortContacts,
            Action::FindSimilarComments { .. } => ActionKind::FindSimilarComments,
            Action::QuerySqlite { .. } => ActionKind::QuerySqlite,
            Action::RunScript { .. } => ActionKind::RunScript,
            Action::FetchApi { .. } => ActionKind::FetchApi,
            Action::CloneRepo { .. } => ActionKind::CloneRepo,
            Action::CompressImage { .. } => ActionKind::CompressImage,
            Action::TranscribeAudio { .. } => ActionKind::TranscribeAudio,
            Action::ConvertMarkdown { .. } => ActionKind::ConvertMarkdown,
        }
    }

    /// Ruta de salida declarada, si la acción escribe un archivo/directorio.
    pub fn output_path(&self) -> Option<&str> {
        match self {
            Action::ReadFile { .. } | Action::RunScript { .. } => None,
            Action::FormatFile { path, .. } => Some(path.as_str()),
            Action::CloneRepo { target, .. } => Some(target.as_str()),
            Action::QuerySqlite { output, .. }
            | Action::CountWeekday { output, .. }
            | Action::SortContacts { output, .. }
            | Action::FindSimilarComments { output, .. }
            | Action::FetchApi { output, .. }
            | Action::CompressImage { output, .. }
            | Action::TranscribeAudio { output, .. }
            | Action::ConvertMarkdown { output, .. } => Some(output.as_str()),
        }
    }
}
