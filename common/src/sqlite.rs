use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::action::ActionKind;
use crate::error::ActionError;
use crate::fsutil::write_atomic;
use crate::results::ActionOutput;

const TOTAL_SALES_SQL: &str =
    "SELECT COALESCE(SUM(units * price), 0) FROM tickets WHERE type = ?1";

/// Total de ventas (units * price) de un tipo de ticket.
/// Sin filas que coincidan el total es 0, no un error.
pub fn query_ticket_sales(
    db_path: &str,
    ticket_type: &str,
    output_path: &str,
) -> Result<ActionOutput, ActionError> {
    // abrir en solo lectura: si no existe, no queremos crear una base vacía
    if !Path::new(db_path).exists() {
        return Err(ActionError::NotFound(db_path.to_string()));
    }
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let total: f64 = conn.query_row(TOTAL_SALES_SQL, [ticket_type], |row| row.get(0))?;

    write_atomic(output_path, format_total(total).as_bytes())?;

    Ok(ActionOutput::new(ActionKind::QuerySqlite)
        .with_output(output_path)
        .with("ticket_type", ticket_type)
        .with("total", total))
}

/// 0.0 -> "0", 1234.5 -> "1234.5"
fn format_total(total: f64) -> String {
    format!("{}", total)
}
