use pulldown_cmark::{html, Options, Parser};

use crate::action::ActionKind;
use crate::error::ActionError;
use crate::fsutil::{read_input, write_atomic};
use crate::results::ActionOutput;

/// Markdown -> HTML. Transformación pura: misma entrada, mismos bytes.
pub fn render_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub fn convert_markdown(input_path: &str, output_path: &str) -> Result<ActionOutput, ActionError> {
    let source = read_input(input_path)?;
    let rendered = render_html(&source);
    write_atomic(output_path, rendered.as_bytes())?;

    Ok(ActionOutput::new(ActionKind::ConvertMarkdown)
        .with_output(output_path)
        .with("bytes", rendered.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(sub: &str) -> PathBuf {
        let base = std::env::temp_dir().join("markdown_tests").join(sub);
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(&base).unwrap();
        base
    }

    #[test]
    fn render_html_basico() {
        let html = render_html("# Título\n\nTexto con **negrita**.\n");
        assert!(html.contains("<h1>Título</h1>"));
        assert!(html.contains("<strong>negrita</strong>"));
    }

    #[test]
    fn render_html_soporta_tablas() {
        let html = render_html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn render_html_tachado_si_listas_de_tareas_no() {
        let html = render_html("~~viejo~~\n\n- [x] hecho\n");
        assert!(html.contains("<del>viejo</del>"));
        assert!(!html.contains("<input"));
        assert!(html.contains("[x] hecho"));
    }

    #[test]
    fn convert_markdown_dos_veces_da_los_mismos_bytes() {
        let tmp = temp_dir("idempotente");
        let input = tmp.join("docs.md");
        let out1 = tmp.join("uno.html");
        let out2 = tmp.join("dos.html");
        fs::write(&input, "# Doc\n\n- [x] hecho\n- ~~tachado~~\n").unwrap();

        convert_markdown(input.to_str().unwrap(), out1.to_str().unwrap()).unwrap();
        convert_markdown(input.to_str().unwrap(), out2.to_str().unwrap()).unwrap();

        let a = fs::read(&out1).unwrap();
        let b = fs::read(&out2).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn convert_markdown_input_inexistente() {
        let tmp = temp_dir("inexistente");
        let out = tmp.join("docs.html");
        let res = convert_markdown(tmp.join("no.md").to_str().unwrap(), out.to_str().unwrap());
        assert!(matches!(res, Err(ActionError::NotFound(_))));
        assert!(!out.exists());
    }
}
