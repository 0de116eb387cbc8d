use std::sync::Arc;
use tracing::{info, warn};

use crate::action::{Action, ActionKind};
use crate::config::Settings;
use crate::error::ActionError;
use crate::llm::LlmClient;
use crate::results::ActionOutput;
use crate::{fetch, files, markdown, media, process, sqlite};

/// Ejecuta acciones. Barato de clonar: comparte Settings y el cliente HTTP.
#[derive(Clone)]
pub struct Executor {
    settings: Arc<Settings>,
    http: reqwest::Client,
    llm: LlmClient,
}

impl Executor {
    pub fn new(settings: Arc<Settings>) -> Result<Self, ActionError> {
        let http = reqwest::Client::builder()
            .timeout(settings.command_timeout)
            .build()?;
        let llm = LlmClient::new(http.clone(), &settings);
        Ok(Self {
            settings,
            http,
            llm,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    /// Ejecuta la acción y registra el resultado.
    pub async fn execute(&self, action: &Action) -> Result<ActionOutput, ActionError> {
        let kind = action.kind();
        info!(%kind, output = ?action.output_path(), "ejecutando acción");

        let res = self.dispatch(action).await;
        match &res {
            Ok(out) => info!(%kind, output = ?out.output_path, "acción terminada"),
            Err(e) => warn!(%kind, error = %e, transient = e.is_transient(), "acción falló"),
        }
        res
    }

    async fn dispatch(&self, action: &Action) -> Result<ActionOutput, ActionError> {
        let timeout = self.settings.command_timeout;

        match action.clone() {
            Action::ReadFile { path } => {
                let root = self.settings.data_root.clone();
                blocking(move || {
                    let content = files::read_file(&root, &path)?;
                    Ok(ActionOutput::new(ActionKind::ReadFile)
                        .with("path", path)
                        .with("content", content))
                })
                .await
            }
            Action::CountWeekday {
                input,
                output,
                weekday,
            } => blocking(move || files::count_weekday(&input, &output, &weekday)).await,
            Action::SortContacts { input, output } => {
                blocking(move || files::sort_contacts(&input, &output)).await
            }
            Action::FindSimilarComments { input, output } => {
                blocking(move || files::find_similar_comments(&input, &output)).await
            }
            Action::QuerySqlite {
                db,
                ticket_type,
                output,
            } => blocking(move || sqlite::query_ticket_sales(&db, &ticket_type, &output)).await,
            Action::CompressImage {
                input,
                output,
                quality,
            } => blocking(move || media::compress_image(&input, &output, quality)).await,
            Action::ConvertMarkdown { input, output } => {
                blocking(move || markdown::convert_markdown(&input, &output)).await
            }
            Action::FormatFile { path, formatter } => {
                process::format_file(&path, &formatter, timeout).await
            }
            Action::CloneRepo { url, target } => process::clone_repo(&url, &target, timeout).await,
            Action::RunScript {
                package,
                script_url,
                args,
            } => process::run_script(&package, &script_url, &args, timeout).await,
            Action::FetchApi { url, output } => fetch::fetch_api(&self.http, &url, &output).await,
            Action::TranscribeAudio { input, output } => {
                media::transcribe_audio(&self.llm, &input, &output, timeout).await
            }
        }
    }
}

/// Corre trabajo de disco/CPU fuera del runtime async.
async fn blocking<F>(f: F) -> Result<ActionOutput, ActionError>
where
    F: FnOnce() -> Result<ActionOutput, ActionError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(res) => res,
        Err(e) => Err(ActionError::Aborted(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, BUSINESS_TRIGGERS, RUN_TRIGGERS};
    use crate::error::FailureKind;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(sub: &str) -> PathBuf {
        let base = std::env::temp_dir().join("executor_tests").join(sub);
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(&base).unwrap();
        base
    }

    fn executor(root: &PathBuf) -> Executor {
        Executor::new(Arc::new(Settings::default().with_data_root(root))).unwrap()
    }

    #[tokio::test]
    async fn execute_count_weekday_desde_la_tarea() {
        let root = temp_dir("weekday");
        fs::write(root.join("dates.txt"), "2024-01-03\n2024-01-10\nnotadate\n").unwrap();
        let exec = executor(&root);

        let action = classify("count the wednesdays", RUN_TRIGGERS, exec.settings()).unwrap();
        let out = exec.execute(&action).await.unwrap();

        assert_eq!(out.detail("count").and_then(|v| v.as_u64()), Some(2));
        assert_eq!(
            fs::read_to_string(root.join("dates-wednesdays.txt")).unwrap(),
            "2"
        );
    }

    #[tokio::test]
    async fn execute_convert_markdown_desde_la_tarea() {
        let root = temp_dir("markdown");
        fs::write(root.join("docs.md"), "# Hola\n").unwrap();
        let exec = executor(&root);

        let action = classify("convert markdown to html", BUSINESS_TRIGGERS, exec.settings()).unwrap();
        exec.execute(&action).await.unwrap();

        let html = fs::read_to_string(root.join("docs.html")).unwrap();
        assert!(html.contains("<h1>Hola</h1>"));
    }

    #[tokio::test]
    async fn execute_read_file_respeta_el_root() {
        let root = temp_dir("read");
        fs::write(root.join("a.txt"), "contenido").unwrap();
        let exec = executor(&root);

        let ok = exec
            .execute(&Action::ReadFile {
                path: "a.txt".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(ok.detail("content").and_then(|v| v.as_str()), Some("contenido"));

        let err = exec
            .execute(&Action::ReadFile {
                path: "/etc/hostname".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Forbidden);
    }

    #[tokio::test]
    async fn execute_sort_contacts_con_input_faltante_es_not_found() {
        let root = temp_dir("contacts_faltante");
        let exec = executor(&root);

        let action = classify("sort contacts", RUN_TRIGGERS, exec.settings()).unwrap();
        let err = exec.execute(&action).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::NotFound);
        assert!(!root.join("contacts-sorted.json").exists());
    }
}
