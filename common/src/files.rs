use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::Value;
use std::{
    cmp::Ordering,
    collections::HashMap,
    fs,
    path::Path,
};

use crate::action::ActionKind;
use crate::error::ActionError;
use crate::fsutil::{read_input, resolve_in_root, write_atomic};
use crate::results::ActionOutput;

/// Formato fijo de las fechas de entrada.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lee un archivo de texto dentro de `root`.
/// Forbidden si la ruta se escapa, NotFound si no existe.
pub fn read_file(root: &Path, path: &str) -> Result<String, ActionError> {
    let resolved = resolve_in_root(root, path)?;
    fs::read_to_string(&resolved).map_err(|e| ActionError::from_read(path, e))
}

/// Cuenta cuántas líneas de `input_path` caen en `weekday` y escribe el conteo.
/// Las líneas que no parsean como fecha se ignoran.
pub fn count_weekday(
    input_path: &str,
    output_path: &str,
    weekday: &str,
) -> Result<ActionOutput, ActionError> {
    let target: Weekday = weekday
        .trim()
        .parse()
        .map_err(|_| ActionError::InvalidInput(format!("día de la semana inválido: {weekday}")))?;

    let content = read_input(input_path)?;

    let mut count: u64 = 0;
    let mut skipped: u64 = 0;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match NaiveDate::parse_from_str(line, DATE_FORMAT) {
            Ok(date) if date.weekday() == target => count += 1,
            Ok(_) => {}
            Err(_) => skipped += 1,
        }
    }

    write_atomic(output_path, count.to_string().as_bytes())?;

    Ok(ActionOutput::new(ActionKind::CountWeekday)
        .with_output(output_path)
        .with("weekday", weekday_name(target))
        .with("count", count)
        .with("skipped_lines", skipped))
}

/// Ordena un arreglo JSON de contactos por (last_name, first_name), orden estable.
pub fn sort_contacts(input_path: &str, output_path: &str) -> Result<ActionOutput, ActionError> {
    let content = read_input(input_path)?;
    let parsed: Value = serde_json::from_str(&content)?;

    let Value::Array(mut contacts) = parsed else {
        return Err(ActionError::InvalidInput(
            "se esperaba un arreglo JSON de contactos".to_string(),
        ));
    };

    // validar antes de ordenar para no comparar registros incompletos
    for (i, c) in contacts.iter().enumerate() {
        for field in ["last_name", "first_name"] {
            if c.get(field).and_then(Value::as_str).is_none() {
                return Err(ActionError::InvalidInput(format!(
                    "contacto {i} sin campo de texto '{field}'"
                )));
            }
        }
    }

    contacts.sort_by(|a, b| contact_key(a).cmp(&contact_key(b)));

    let pretty = serde_json::to_vec_pretty(&contacts)?;
    write_atomic(output_path, &pretty)?;

    Ok(ActionOutput::new(ActionKind::SortContacts)
        .with_output(output_path)
        .with("contacts", contacts.len()))
}

/// Nombre completo en inglés, como se usa en los parámetros y en los archivos.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn contact_key(c: &Value) -> (&str, &str) {
    let field = |name: &str| c.get(name).and_then(Value::as_str).unwrap_or("");
    (field("last_name"), field("first_name"))
}

/// Busca el par de líneas más parecidas (coseno sobre frecuencia de palabras).
/// Empates: gana el par que aparece primero en el archivo.
pub fn find_similar_comments(
    input_path: &str,
    output_path: &str,
) -> Result<ActionOutput, ActionError> {
    let content = read_input(input_path)?;
    let comments: Vec<&str> = content
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();

    if comments.len() < 2 {
        return Err(ActionError::InvalidInput(format!(
            "se necesitan al menos dos comentarios, hay {}",
            comments.len()
        )));
    }

    let vectors: Vec<HashMap<String, f64>> = comments.iter().map(|c| term_frequencies(c)).collect();

    let mut best = (0usize, 1usize);
    let mut best_score = f64::NEG_INFINITY;
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            let score = cosine(&vectors[i], &vectors[j]);
            if score.partial_cmp(&best_score) == Some(Ordering::Greater) {
                best_score = score;
                best = (i, j);
            }
        }
    }

    let (a, b) = (comments[best.0], comments[best.1]);
    write_atomic(output_path, format!("{a}\n{b}").as_bytes())?;

    Ok(ActionOutput::new(ActionKind::FindSimilarComments)
        .with_output(output_path)
        .with("first", a)
        .with("second", b)
        .with("similarity", best_score))
}

/// Tokeniza igual que el wordcount: alfanumérico y '_', en minúscula.
fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut tf: HashMap<String, f64> = HashMap::new();
    for raw in text.split_whitespace() {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase();
        if !cleaned.is_empty() {
            *tf.entry(cleaned).or_insert(0.0) += 1.0;
        }
    }
    tf
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(k, va)| b.get(k).map(|vb| va * vb))
        .sum();
    let norm = |v: &HashMap<String, f64>| v.values().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
