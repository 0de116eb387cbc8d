use std::{io, process::Stdio, time::Duration};
use tokio::process::Command;
use tracing::{debug, info};

use crate::action::ActionKind;
use crate::error::ActionError;
use crate::results::ActionOutput;

/// Salida capturada de un subproceso que terminó bien.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Ejecuta `program args...` sin stdin (nunca se queda esperando entrada),
/// capturando stdout/stderr y con límite de tiempo.
/// Si se vence el tiempo el proceso se mata (kill_on_drop).
pub async fn run_command(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<CommandOutput, ActionError> {
    debug!("ejecutando {} {:?}", program, args);

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ActionError::ToolUnavailable(program.to_string()),
            _ => ActionError::Io(e),
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(res) => res?,
        Err(_) => {
            return Err(ActionError::Timeout(format!(
                "{} no terminó en {}s",
                program,
                timeout.as_secs_f64()
            )))
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(ActionError::ToolFailed {
            tool: program.to_string(),
            status: output.status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

/// Formatea un archivo in-place con el formateador de npm indicado
/// (ej: "prettier@3.4.2").
pub async fn format_file(
    path: &str,
    formatter: &str,
    timeout: Duration,
) -> Result<ActionOutput, ActionError> {
    if !std::path::Path::new(path).is_file() {
        return Err(ActionError::NotFound(path.to_string()));
    }

    run_command("npx", &["--yes", formatter, "--write", path], timeout).await?;
    info!("archivo {} formateado con {}", path, formatter);

    Ok(ActionOutput::new(ActionKind::FormatFile)
        .with_output(path)
        .with("formatter", formatter))
}

/// git clone superficial de `url` en `target`.
pub async fn clone_repo(
    url: &str,
    target: &str,
    timeout: Duration,
) -> Result<ActionOutput, ActionError> {
    if let Some(parent) = std::path::Path::new(target).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    run_command("git", &["clone", "--depth", "1", url, target], timeout).await?;
    info!("repo {} clonado en {}", url, target);

    Ok(ActionOutput::new(ActionKind::CloneRepo)
        .with_output(target)
        .with("url", url))
}

/// Instala `package` con pip y luego corre el script remoto con `uv run`.
/// Devuelve el stdout del script.
pub async fn run_script(
    package: &str,
    script_url: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ActionOutput, ActionError> {
    run_command("pip", &["install", "--quiet", package], timeout).await?;

    let mut uv_args: Vec<&str> = vec!["run", script_url];
    uv_args.extend(args.iter().map(String::as_str));
    let out = run_command("uv", &uv_args, timeout).await?;

    info!("script {} ejecutado ({} bytes de stdout)", script_url, out.stdout.len());

    Ok(ActionOutput::new(ActionKind::RunScript)
        .with("script_url", script_url)
        .with("stdout", out.stdout))
}
