//! Clasificador de tareas: texto libre -> acción.
//!
//! Cada tabla es una lista ordenada de triggers. Se recorre en orden y gana
//! el primero con alguna frase presente en la tarea como palabra completa
//! (sin distinguir mayúsculas). El orden de la tabla es parte del contrato.

use chrono::Weekday;

use crate::action::{Action, ActionKind};
use crate::config::Settings;
use crate::files::weekday_name;

pub const DATAGEN_URL: &str =
    "https://raw.githubusercontent.com/sanand0/tools-in-data-science-public/tds-2025-01/project-1/datagen.py";
pub const SCRIPT_PACKAGE: &str = "uv";
pub const FORMATTER: &str = "prettier@3.4.2";
pub const TICKET_TYPE: &str = "Gold";
pub const SAMPLE_API_URL: &str = "https://jsonplaceholder.typicode.com/posts";
pub const SAMPLE_REPO_URL: &str = "https://github.com/octocat/Hello-World.git";
pub const IMAGE_QUALITY: u8 = 50;

/// Arma los parámetros de la acción a partir de la tarea (ya en minúscula).
pub type Extractor = fn(task: &str, settings: &Settings) -> Action;

pub struct Trigger {
    pub phrases: &'static [&'static str],
    pub kind: ActionKind,
    pub extract: Extractor,
}

impl Trigger {
    pub fn matches(&self, task_lower: &str) -> bool {
        self.phrases.iter().any(|p| contains_word(task_lower, p))
    }
}

/// `phrase` aparece en `text` sin letras ni dígitos pegados a los lados:
/// "format" está en "format.md" pero no en "information".
fn contains_word(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(i, _)| {
        let before = text[..i].chars().next_back();
        let after = text[i + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Tabla de /run.
pub const RUN_TRIGGERS: &[Trigger] = &[
    Trigger {
        phrases: &["datagen"],
        kind: ActionKind::RunScript,
        extract: extract_datagen,
    },
    Trigger {
        phrases: &["prettier", "format"],
        kind: ActionKind::FormatFile,
        extract: extract_format,
    },
    Trigger {
        phrases: &[
            "mondays",
            "tuesdays",
            "wednesdays",
            "thursdays",
            "fridays",
            "saturdays",
            "sundays",
        ],
        kind: ActionKind::CountWeekday,
        extract: extract_count_weekday,
    },
    Trigger {
        phrases: &["contacts"],
        kind: ActionKind::SortContacts,
        extract: extract_sort_contacts,
    },
    Trigger {
        phrases: &["similar"],
        kind: ActionKind::FindSimilarComments,
        extract: extract_similar_comments,
    },
    Trigger {
        phrases: &["ticket"],
        kind: ActionKind::QuerySqlite,
        extract: extract_ticket_sales,
    },
];

/// Tabla de /run-business.
pub const BUSINESS_TRIGGERS: &[Trigger] = &[
    Trigger {
        phrases: &["fetch", "api"],
        kind: ActionKind::FetchApi,
        extract: extract_fetch_api,
    },
    Trigger {
        phrases: &["clone"],
        kind: ActionKind::CloneRepo,
        extract: extract_clone_repo,
    },
    Trigger {
        phrases: &["compress"],
        kind: ActionKind::CompressImage,
        extract: extract_compress_image,
    },
    Trigger {
        phrases: &["transcribe"],
        kind: ActionKind::TranscribeAudio,
        extract: extract_transcribe_audio,
    },
    Trigger {
        phrases: &["markdown"],
        kind: ActionKind::ConvertMarkdown,
        extract: extract_convert_markdown,
    },
];

/// Devuelve la acción del primer trigger que coincide, o None si ninguno.
pub fn classify(task: &str, table: &[Trigger], settings: &Settings) -> Option<Action> {
    let lower = task.to_lowercase();
    table
        .iter()
        .find(|t| t.matches(&lower))
        .map(|t| (t.extract)(&lower, settings))
}

/* ---------------- extractores ---------------- */

fn extract_datagen(_task: &str, s: &Settings) -> Action {
    Action::RunScript {
        package: SCRIPT_PACKAGE.to_string(),
        script_url: DATAGEN_URL.to_string(),
        args: vec![
            s.user_email.clone(),
            format!("--root={}", s.data_root.to_string_lossy()),
        ],
    }
}

fn extract_format(_task: &str, s: &Settings) -> Action {
    Action::FormatFile {
        path: s.data_path("format.md"),
        formatter: FORMATTER.to_string(),
    }
}

/// El único extractor que mira el texto: toma el día nombrado en la tarea.
fn extract_count_weekday(task: &str, s: &Settings) -> Action {
    const DAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    let day = DAYS
        .into_iter()
        .find(|d| task.contains(&weekday_name(*d).to_lowercase()))
        .unwrap_or(Weekday::Wed);
    let name = weekday_name(day);

    Action::CountWeekday {
        input: s.data_path("dates.txt"),
        output: s.data_path(&format!("dates-{}s.txt", name.to_lowercase())),
        weekday: name.to_string(),
    }
}

fn extract_sort_contacts(_task: &str, s: &Settings) -> Action {
    Action::SortContacts {
        input: s.data_path("contacts.json"),
        output: s.data_path("contacts-sorted.json"),
    }
}

fn extract_similar_comments(_task: &str, s: &Settings) -> Action {
    Action::FindSimilarComments {
        input: s.data_path("comments.txt"),
        output: s.data_path("comments-similar.txt"),
    }
}

fn extract_ticket_sales(_task: &str, s: &Settings) -> Action {
    Action::QuerySqlite {
        db: s.data_path("ticket-sales.db"),
        ticket_type: TICKET_TYPE.to_string(),
        output: s.data_path("ticket-sales-gold.txt"),
    }
}

fn extract_fetch_api(_task: &str, s: &Settings) -> Action {
    Action::FetchApi {
        url: SAMPLE_API_URL.to_string(),
        output: s.data_path("api-data.json"),
    }
}

fn extract_clone_repo(_task: &str, s: &Settings) -> Action {
    Action::CloneRepo {
        url: SAMPLE_REPO_URL.to_string(),
        target: s.data_path("repo"),
    }
}

fn extract_compress_image(_task: &str, s: &Settings) -> Action {
    Action::CompressImage {
        input: s.data_path("image.png"),
        output: s.data_path("image-compressed.jpg"),
        quality: IMAGE_QUALITY,
    }
}

fn extract_transcribe_audio(_task: &str, s: &Settings) -> Action {
    Action::TranscribeAudio {
        input: s.data_path("audio.mp3"),
        output: s.data_path("transcript.txt"),
    }
}

fn extract_convert_markdown(_task: &str, s: &Settings) -> Action {
    Action::ConvertMarkdown {
        input: s.data_path("docs.md"),
        output: s.data_path("docs.html"),
    }
}
