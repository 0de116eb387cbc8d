use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use common::{classify, ActionOutput, ErrorBody, Executor, Settings, BUSINESS_TRIGGERS, RUN_TRIGGERS};
use reqwest::{Client, Response};
use serde_json::Value;
use std::{env, sync::Arc};

/// - En Docker: SERVER_URL=http://server:8000
/// - Local: default http://localhost:8000
fn server_base_url() -> String {
    env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "CLI simple para hablar con el servidor de tareas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lee un archivo a través de /read
    Read {
        #[arg(value_name = "RUTA")]
        path: String,
    },
    /// Ejecuta una tarea con /run
    Run {
        #[arg(value_name = "TAREA")]
        task: String,
    },
    /// Ejecuta una tarea de negocio con /run-business
    Business {
        #[arg(value_name = "TAREA")]
        task: String,
    },
    /// Manda la tarea al proxy LLM con /agent
    Agent {
        #[arg(value_name = "TAREA")]
        task: String,
    },
    /// Clasifica y ejecuta la tarea localmente, sin servidor
    Exec {
        #[arg(value_name = "TAREA")]
        task: String,

        /// Tabla de triggers a usar
        #[arg(long, value_enum, default_value_t = Table::Run)]
        table: Table,

        /// Sólo mostrar la acción elegida, sin ejecutarla
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Run,
    Business,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let base_url = server_base_url();

    match cli.command {
        Commands::Read { path } => {
            let url = format!("{}/read", base_url);
            let resp = client.get(&url).query(&[("path", &path)]).send().await?;
            if resp.status().is_success() {
                print!("{}", resp.text().await?);
            } else {
                print_error(resp).await?;
            }
        }

        Commands::Run { task } => {
            let url = format!("{}/run", base_url);
            let resp = client.post(&url).query(&[("task", &task)]).send().await?;
            print_task_response(resp).await?;
        }

        Commands::Business { task } => {
            let url = format!("{}/run-business", base_url);
            let resp = client.post(&url).query(&[("task", &task)]).send().await?;
            print_task_response(resp).await?;
        }

        Commands::Agent { task } => {
            let url = format!("{}/agent", base_url);
            let resp = client.post(&url).query(&[("task", &task)]).send().await?;
            if resp.status().is_success() {
                let reply: Value = resp.json().await?;
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                print_error(resp).await?;
            }
        }

        Commands::Exec {
            task,
            table,
            dry_run,
        } => {
            let settings = Arc::new(Settings::from_env());
            let triggers = match table {
                Table::Run => RUN_TRIGGERS,
                Table::Business => BUSINESS_TRIGGERS,
            };

            let Some(action) = classify(&task, triggers, &settings) else {
                println!("{}", common::TASK_NOT_RECOGNIZED);
                return Ok(());
            };

            println!("Acción: {}", serde_json::to_string_pretty(&action)?);
            if dry_run {
                return Ok(());
            }

            let executor = Executor::new(settings)?;
            match executor.execute(&action).await {
                Ok(out) => print_output(&out),
                Err(e) => bail!("la acción falló ({:?}): {}", e.kind(), e),
            }
        }
    }

    Ok(())
}

async fn print_task_response(resp: Response) -> Result<()> {
    if !resp.status().is_success() {
        return print_error(resp).await;
    }

    let body: Value = resp.json().await?;
    // tarea no reconocida: {"message": "..."}
    if let Some(msg) = body.get("message").and_then(Value::as_str) {
        println!("{}", msg);
        return Ok(());
    }

    let out: ActionOutput = serde_json::from_value(body)?;
    print_output(&out);
    Ok(())
}

fn print_output(out: &ActionOutput) {
    println!("Resultado:");
    println!("  acción: {}", out.kind);
    if let Some(ref path) = out.output_path {
        println!("  salida: {}", path);
    }
    for (k, v) in &out.details {
        match v.as_str() {
            Some(s) => println!("  {}: {}", k, s),
            None => println!("  {}: {}", k, v),
        }
    }
}

async fn print_error(resp: Response) -> Result<()> {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => bail!("error {} ({:?}): {}", status, body.error, body.message),
        Err(_) => bail!("error {}: {}", status, text),
    }
}
