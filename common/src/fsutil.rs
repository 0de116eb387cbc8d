use std::{
    fs,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use crate::error::ActionError;

/// Resuelve `path` contra `root` y verifica que no se salga de él.
///
/// 1. chequeo léxico (rutas relativas se anclan en root, `..` se colapsa)
/// 2. si existe, chequeo canónico para no escapar por symlinks
pub fn resolve_in_root(root: &Path, path: &str) -> Result<PathBuf, ActionError> {
    let root_norm = normalize(root);
    let candidate = normalize(&root_norm.join(path));

    if !candidate.starts_with(&root_norm) {
        return Err(ActionError::Forbidden(path.to_string()));
    }

    match candidate.canonicalize() {
        Ok(real) => {
            let real_root = root_norm.canonicalize().unwrap_or(root_norm);
            if real.starts_with(&real_root) {
                Ok(real)
            } else {
                Err(ActionError::Forbidden(path.to_string()))
            }
        }
        Err(e) => Err(ActionError::from_read(path, e)),
    }
}

/// Normalización léxica: quita `.` y resuelve `..` sin tocar el disco.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Lee un archivo de texto completo; NotFound si no existe.
pub fn read_input(path: &str) -> Result<String, ActionError> {
    fs::read_to_string(path).map_err(|e| ActionError::from_read(path, e))
}

/// Escribe `contents` en `output_path` de forma atómica:
/// primero a un temporal hermano y luego rename.
/// Si algo falla, el archivo destino queda como estaba.
pub fn write_atomic(output_path: &str, contents: &[u8]) -> io::Result<()> {
    let out = Path::new(output_path);

    // Crear carpeta de salida si hace falta
    let parent = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => {
            fs::create_dir_all(p)?;
            p.to_path_buf()
        }
        _ => PathBuf::from("."),
    };

    let file_name = out
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let tmp = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let result = (|| {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(contents)?;
        f.sync_all()?;
        fs::rename(&tmp, out)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
