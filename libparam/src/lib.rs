//! PARAM file loader.
//!
//! A PARAM file is line oriented. Each declaration line reads
//!
//! ```text
//! PARAM <name> <type> <value...>
//! ```
//!
//! where `<type>` is `int`, `float`, `bool`, a tag starting with `list`, or
//! anything else (kept as a string). List values use a bracketed syntax that
//! nests: `[1,2,[3,4]]`. All other lines are ignored.
//!
//! # Loading Pipeline
//!
//! 1. **Scanner**: Picks declaration lines and splits them into name, type
//!    tag and raw value.
//!
//! 2. **Resolver**: Converts each raw value according to its type tag,
//!    parsing list literals recursively, and stores it by name.
//!
//! The crate also carries the helpers a run needs around its parameters:
//! saving a result document as JSON with binary fields in base64, creating
//! and cleaning result files, and running shell commands in a directory.

mod convert;
mod encode;
mod error;
mod list;
mod resolve;
mod results;
mod scanner;
mod value;
mod workspace;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use convert::{convert_type, DeclaredType};
pub use encode::format_parameters;
pub use error::{LoadError, ParseContext, Result, WorkspaceError};
pub use list::parse_list;
pub use results::{save_results, ResultValue, RESULT_FILE_NAME};
pub use scanner::{scan as scan_declarations, Declaration, MARKER};
pub use value::{sorted, ParameterTable, Value};
pub use workspace::{clean_files, make_file, run_in_dir};

/// Load the parameters declared in a PARAM file.
///
/// The file is read line by line; `\n`, `\r\n` and a bare `\r` all end a
/// line. A missing or unreadable file, or an `int`
/// or `float` declaration whose value does not parse, fails the load.
///
/// # Example
///
/// ```no_run
/// use libparam::fetch_parameters;
///
/// let params = fetch_parameters("run.param").unwrap();
/// let rate = params["rate"].as_float();
/// ```
pub fn fetch_parameters(path: impl AsRef<Path>) -> Result<ParameterTable> {
    let path = path.as_ref();
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let ctx = ParseContext::new(Some(&filename));

    let mut table = ParameterTable::new();
    let mut line_num = 0;
    for chunk in BufReader::new(file).lines() {
        let chunk = chunk.map_err(io_error)?;
        for line in scanner::split_bare_cr(&chunk) {
            if let Some(decl) = scanner::scan_line(line, line_num) {
                resolve::insert(&mut table, decl, &ctx)?;
            }
            line_num += 1;
        }
    }
    Ok(table)
}

/// Load the parameters declared in PARAM source text.
///
/// `filename` only appears in error messages.
///
/// # Example
///
/// ```
/// use libparam::{parse_parameters, Value};
///
/// let params = parse_parameters("PARAM count int 7\n", None).unwrap();
/// assert_eq!(params["count"], Value::from(7));
/// ```
pub fn parse_parameters(source: &str, filename: Option<&str>) -> Result<ParameterTable> {
    let ctx = ParseContext::new(filename);
    let mut table = ParameterTable::new();
    for decl in scanner::scan(source) {
        resolve::insert(&mut table, decl, &ctx)?;
    }
    Ok(table)
}
