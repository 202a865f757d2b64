//! SQL column types to IR types

use crate::error::{TranslateError, TranslateResult};
use dl_ir::Type;
use sqlparser::ast::DataType;

/// Map a column's declared SQL type to its IR type.
///
/// Every integer type becomes the `signed<64>` alias; precision and length
/// arguments are ignored.
pub(crate) fn lower_data_type(data_type: &DataType, nullable: bool) -> TranslateResult<Type> {
    let rendered = data_type.to_string().to_uppercase();
    let base = rendered
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    map_type_name(&base, nullable)
        .ok_or_else(|| TranslateError::unsupported(format!("column type {rendered}")))
}

fn map_type_name(name: &str, nullable: bool) -> Option<Type> {
    let ty = match name {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" | "INT2"
        | "INT4" | "INT8" | "INT16" | "INT32" | "INT64" | "SIGNED" | "SIGNED INTEGER" => {
            Type::signed64(nullable)
        }
        "VARCHAR" | "CHAR" | "CHARACTER" | "CHARACTER VARYING" | "CHAR VARYING" | "NVARCHAR"
        | "NCHAR" | "TEXT" | "STRING" => Type::string(nullable),
        "BOOL" | "BOOLEAN" => Type::boolean(nullable),
        "REAL" | "FLOAT" | "FLOAT4" | "FLOAT8" | "FLOAT32" | "FLOAT64" | "DOUBLE"
        | "DOUBLE PRECISION" => Type::double(nullable),
        "DATE" => Type::date(nullable),
        "TIME" => Type::time(nullable),
        "DATETIME" | "TIMESTAMP" => Type::date_time(nullable),
        // TIME WITH TIME ZONE and friends
        other if other.starts_with("TIMESTAMP") => Type::date_time(nullable),
        other if other.starts_with("TIME ") => Type::time(nullable),
        _ => return None,
    };
    Some(ty)
}
