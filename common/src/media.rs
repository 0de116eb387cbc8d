use image::{codecs::jpeg::JpegEncoder, ColorType};
use std::time::Duration;
use tracing::info;

use crate::action::ActionKind;
use crate::error::ActionError;
use crate::fsutil::write_atomic;
use crate::llm::LlmClient;
use crate::process::run_command;
use crate::results::ActionOutput;

/// Re-codifica una imagen como JPEG con la calidad dada (1-100).
pub fn compress_image(
    input_path: &str,
    output_path: &str,
    quality: u8,
) -> Result<ActionOutput, ActionError> {
    let quality = quality.clamp(1, 100);

    let original_bytes = std::fs::metadata(input_path)
        .map_err(|e| ActionError::from_read(input_path, e))?
        .len();
    let img = image::open(input_path)?;
    let rgb = img.to_rgb8();

    let mut buf: Vec<u8> = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;

    write_atomic(output_path, &buf)?;

    Ok(ActionOutput::new(ActionKind::CompressImage)
        .with_output(output_path)
        .with("quality", quality)
        .with("original_bytes", original_bytes)
        .with("compressed_bytes", buf.len()))
}

/// Pasa el audio a WAV mono 16 kHz con ffmpeg y lo manda a transcribir.
/// El texto se escribe en `output_path`.
pub async fn transcribe_audio(
    llm: &LlmClient,
    input_path: &str,
    output_path: &str,
    timeout: Duration,
) -> Result<ActionOutput, ActionError> {
    if !std::path::Path::new(input_path).is_file() {
        return Err(ActionError::NotFound(input_path.to_string()));
    }

    let wav_path = std::env::temp_dir().join(format!("transcribe-{}.wav", uuid::Uuid::new_v4()));
    let wav_str = wav_path.to_string_lossy().to_string();

    let converted = run_command(
        "ffmpeg",
        &[
            "-y", "-loglevel", "error", "-i", input_path, "-ar", "16000", "-ac", "1", wav_str.as_str(),
        ],
        timeout,
    )
    .await;

    let result = match converted {
        Ok(_) => match tokio::fs::read(&wav_path).await {
            Ok(wav) => llm.transcribe(wav).await,
            Err(e) => Err(ActionError::Io(e)),
        },
        Err(e) => Err(e),
    };
    let _ = tokio::fs::remove_file(&wav_path).await;

    let transcript = result?;
    write_atomic(output_path, transcript.as_bytes())?;
    info!("audio {} transcrito en {}", input_path, output_path);

    Ok(ActionOutput::new(ActionKind::TranscribeAudio)
        .with_output(output_path)
        .with("chars", transcript.chars().count()))
}
