use serde_json::Value;
use tracing::info;

use crate::action::ActionKind;
use crate::error::ActionError;
use crate::fsutil::write_atomic;
use crate::results::ActionOutput;

/// GET a `url`, exige 2xx y guarda el JSON de respuesta con indentación.
pub async fn fetch_api(
    http: &reqwest::Client,
    url: &str,
    output_path: &str,
) -> Result<ActionOutput, ActionError> {
    let resp = http.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ActionError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await?;
    let data: Value = serde_json::from_str(&body)?;
    let pretty = serde_json::to_vec_pretty(&data)?;
    write_atomic(output_path, &pretty)?;

    info!("respuesta de {} guardada en {}", url, output_path);

    Ok(ActionOutput::new(ActionKind::FetchApi)
        .with_output(output_path)
        .with("url", url)
        .with("status", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::PathBuf;

    fn temp_dir(sub: &str) -> PathBuf {
        let base = std::env::temp_dir().join("fetch_tests").join(sub);
        let _ = std::fs::remove_dir_all(&base);
        std::fs::create_dir_all(&base).unwrap();
        base
    }

    /// Servidor HTTP de una sola respuesta en un puerto libre; devuelve su URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let resp = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(resp.as_bytes());
            }
        });
        format!("http://{addr}/datos")
    }

    #[tokio::test]
    async fn fetch_api_guarda_json_indentado() {
        let tmp = temp_dir("ok");
        let out = tmp.join("api-data.json");
        let url = serve_once("200 OK", r#"{"id":1,"tags":["a","b"]}"#);

        let res = fetch_api(&reqwest::Client::new(), &url, out.to_str().unwrap())
            .await
            .unwrap();

        let escrito = std::fs::read_to_string(&out).unwrap();
        let esperado =
            serde_json::to_string_pretty(&serde_json::json!({"id": 1, "tags": ["a", "b"]}))
                .unwrap();
        assert_eq!(escrito, esperado);
        assert!(escrito.contains('\n'));
        assert_eq!(res.detail("status").and_then(|v| v.as_u64()), Some(200));
    }

    #[tokio::test]
    async fn fetch_api_404_no_es_transitorio_ni_escribe_salida() {
        let tmp = temp_dir("404");
        let out = tmp.join("api-data.json");
        let url = serve_once("404 Not Found", "{}");

        let err = fetch_api(&reqwest::Client::new(), &url, out.to_str().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::HttpStatus { status: 404, .. }));
        assert!(!err.is_transient());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn fetch_api_500_es_transitorio() {
        let tmp = temp_dir("500");
        let out = tmp.join("api-data.json");
        let url = serve_once("500 Internal Server Error", "{}");

        let err = fetch_api(&reqwest::Client::new(), &url, out.to_str().unwrap())
            .await
            .unwrap_err();

        assert!(err.is_transient());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn fetch_api_conexion_rechazada_no_escribe_salida() {
        let out = std::env::temp_dir()
            .join("fetch_tests")
            .join("rechazada.json");
        let _ = std::fs::remove_file(&out);

        // puerto 1: nadie escucha
        let res = fetch_api(
            &reqwest::Client::new(),
            "http://127.0.0.1:1/datos",
            out.to_str().unwrap(),
        )
        .await;

        let err = res.unwrap_err();
        assert!(matches!(err, ActionError::Network(_)));
        assert!(err.is_transient());
        assert!(!out.exists());
    }
}
