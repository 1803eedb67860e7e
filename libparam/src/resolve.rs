//! Phase 2: Resolver
//!
//! Turns each scanned declaration into a value according to its declared
//! type and collects the results into a parameter table.

use tracing::debug;

use crate::convert::{parse_bool_literal, parse_float_literal, parse_int_literal, DeclaredType};
use crate::error::{LoadError, ParseContext, Result};
use crate::list::parse_list;
use crate::scanner::Declaration;
use crate::{ParameterTable, Value};

/// Convert one declaration.
///
/// `list*` values never fail; `int` and `float` values that do not parse
/// fail the whole load.
pub fn resolve(decl: &Declaration, ctx: &ParseContext) -> Result<Value> {
    let raw = decl.raw_value.as_str();
    match DeclaredType::from_tag(&decl.type_tag) {
        DeclaredType::List(_) => Ok(parse_list(raw)),
        DeclaredType::Int => parse_int_literal(raw)
            .map(Value::Integer)
            .ok_or_else(|| LoadError::InvalidInt {
                name: decl.name.clone(),
                value: raw.to_string(),
                location: ctx.loc_suffix(decl.line_num),
            }),
        DeclaredType::Float => parse_float_literal(raw)
            .map(Value::Float)
            .ok_or_else(|| LoadError::InvalidFloat {
                name: decl.name.clone(),
                value: raw.to_string(),
                location: ctx.loc_suffix(decl.line_num),
            }),
        DeclaredType::Bool => Ok(Value::Bool(parse_bool_literal(raw))),
        DeclaredType::Text(_) => Ok(Value::String(raw.to_string())),
    }
}

/// Resolve a declaration and store it, replacing any earlier value of the
/// same name.
pub fn insert(table: &mut ParameterTable, decl: Declaration, ctx: &ParseContext) -> Result<()> {
    let value = resolve(&decl, ctx)?;
    debug!(
        name = %decl.name,
        type_tag = %decl.type_tag,
        line = decl.line_num + 1,
        "loaded parameter"
    );
    if table.insert(decl.name, value).is_some() {
        debug!(line = decl.line_num + 1, "parameter redeclared, keeping the later value");
    }
    Ok(())
}
