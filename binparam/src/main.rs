//! PARAM command-line tool for checking and transcoding PARAM files.
//!
//! Usage: param [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>            Output format (json, yaml, toml, cbor, diag, param)
//!   -w, --write                  Write output to a file next to the input
//!   -o, --output <FILE>          Write output to the given file
//!       --check                  Only check that the input loads
//!       --save-results <DIR>     Also save the parameters as DIR/result.json
//!   -h, --help                   Print help
//!   -V, --version                Print version

use clap::{Parser, ValueEnum};
use libparam::{
    fetch_parameters, format_parameters, parse_parameters, save_results, sorted, ParameterTable,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

mod transcode;

/// Load PARAM files and print them in another format.
#[derive(Parser, Debug)]
#[command(name = "param", version, about)]
struct Cli {
    /// Input file or directory (reads stdin when omitted or `-`).
    /// A directory is processed file by file, for every `.param` file in it.
    input: Option<PathBuf>,

    /// Output format.
    #[arg(short = 't', long = "to", value_enum, default_value_t = OutputFormat::Json)]
    to: OutputFormat,

    /// Write output to a file next to the input, with the format's extension.
    #[arg(short, long, conflicts_with = "output")]
    write: bool,

    /// Write output to the given file.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Check that the input loads, without printing it.
    #[arg(long)]
    check: bool,

    /// Also save the loaded parameters as `result.json` in this directory.
    #[arg(long, value_name = "DIR")]
    save_results: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Yaml,
    Toml,
    Cbor,
    Diag,
    Param,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Toml => "toml",
            OutputFormat::Cbor => "cbor",
            OutputFormat::Diag => "diag",
            OutputFormat::Param => "param",
        }
    }
}

/// Encoded output, either printable text or raw bytes.
enum Output {
    Text(String),
    Binary(Vec<u8>),
}

impl Output {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Output::Text(s) => s.as_bytes(),
            Output::Binary(b) => b,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let input_path = cli.input.as_deref().filter(|p| p != &Path::new("-"));

    if let Some(path) = input_path {
        if path.is_dir() {
            if cli.output.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process::exit(process_directory(path, &cli));
        }
    }

    if cli.write && input_path.is_none() {
        eprintln!("Error: --write requires an input file");
        process::exit(1);
    }

    process::exit(process_input(input_path, cli.save_results.as_deref(), &cli));
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Process every `.param` file in a directory, in name order. Results for
/// each file are saved under a subdirectory named after the file.
fn process_directory(dir_path: &Path, cli: &Cli) -> i32 {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path.display(), e);
            return 1;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "param").unwrap_or(false))
        .collect();
    paths.sort();
    tracing::debug!(dir = %dir_path.display(), files = paths.len(), "processing directory");

    let mut had_errors = false;
    for path in &paths {
        let save_dir = cli
            .save_results
            .as_ref()
            .zip(path.file_stem())
            .map(|(dir, stem)| dir.join(stem));
        if process_input(Some(path), save_dir.as_deref(), cli) != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_input(input_path: Option<&Path>, save_dir: Option<&Path>, cli: &Cli) -> i32 {
    let label = input_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let table = match load(input_path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{}: {}", label, e);
            return 1;
        }
    };

    if let Some(dir) = save_dir {
        if let Err(e) = save_results(dir, &sorted(&table)) {
            eprintln!("{}: {}", label, e);
            return 1;
        }
    }

    if cli.check {
        println!("{}: ok", label);
        return 0;
    }

    let output = match encode(&table, cli.to) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}: Cannot convert to {}: {}", label, cli.to.extension(), e);
            return 1;
        }
    };

    match write_output(&output, input_path, cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn load(input_path: Option<&Path>) -> Result<ParameterTable, String> {
    match input_path {
        Some(path) => fetch_parameters(path).map_err(|e| e.to_string()),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("Error reading stdin: {}", e))?;
            parse_parameters(&source, None).map_err(|e| e.to_string())
        }
    }
}

/// Deepest list nesting handed to the recursive encoders. PARAM text is
/// written without recursion and has no limit.
const MAX_ENCODE_DEPTH: usize = 128;

fn encode(table: &ParameterTable, format: OutputFormat) -> Result<Output, String> {
    if format != OutputFormat::Param {
        if let Some((name, depth)) = table
            .iter()
            .map(|(name, value)| (name, value.depth()))
            .find(|&(_, depth)| depth > MAX_ENCODE_DEPTH)
        {
            return Err(format!(
                "parameter '{}' nests {} levels deep, more than {}",
                name, depth, MAX_ENCODE_DEPTH
            ));
        }
    }

    match format {
        OutputFormat::Json => transcode::json::encode(table).map(Output::Text),
        OutputFormat::Yaml => transcode::yaml::encode(table).map(Output::Text),
        OutputFormat::Toml => transcode::toml::encode(table).map(Output::Text),
        OutputFormat::Cbor => transcode::cbor::encode(table).map(Output::Binary),
        OutputFormat::Diag => {
            // Render from the encoded bytes so the notation shows the wire form.
            let bytes = transcode::cbor::encode(table)?;
            transcode::cbor::diagnostic(&bytes).map(Output::Text)
        }
        OutputFormat::Param => Ok(Output::Text(format_parameters(table))),
    }
}

fn write_output(output: &Output, input_path: Option<&Path>, cli: &Cli) -> Result<(), String> {
    let target = match (&cli.output, input_path) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(input)) if cli.write => Some(input.with_extension(cli.to.extension())),
        _ => None,
    };

    if let Some(path) = target {
        if input_path.is_some_and(|input| same_file(input, &path)) {
            return Err(format!("refusing to overwrite input file {}", path.display()));
        }
        return fs::write(&path, output.as_bytes())
            .map_err(|e| format!("writing {}: {}", path.display(), e));
    }

    match output {
        Output::Text(text) => {
            print!("{}", text);
            // Ensure output ends with newline
            if !text.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        Output::Binary(bytes) => io::stdout()
            .lock()
            .write_all(bytes)
            .map_err(|e| format!("writing to stdout: {}", e)),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse_args(&["param", "run.param"]);
        assert_eq!(cli.to, OutputFormat::Json);
        assert_eq!(cli.input, Some(PathBuf::from("run.param")));
        assert!(!cli.check && !cli.write);
    }

    #[test]
    fn test_write_conflicts_with_output() {
        assert!(Cli::try_parse_from(["param", "-w", "-o", "out.json", "run.param"]).is_err());
    }

    #[test]
    fn test_format_names() {
        assert_eq!(parse_args(&["param", "-t", "yaml"]).to, OutputFormat::Yaml);
        assert_eq!(parse_args(&["param", "--to", "param"]).to, OutputFormat::Param);
        assert!(Cli::try_parse_from(["param", "-t", "xml"]).is_err());
    }

    #[test]
    fn test_write_uses_format_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run.param");
        fs::write(&input, "PARAM count int 7\n").unwrap();

        let cli = Cli::try_parse_from(["param", "-w", input.to_str().unwrap()]).unwrap();
        assert_eq!(process_input(Some(&input), None, &cli), 0);

        let written = fs::read_to_string(dir.path().join("run.json")).unwrap();
        assert_eq!(written, "{\n  \"count\": 7\n}");
    }

    #[test]
    fn test_save_results_and_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run.param");
        let output = dir.path().join("out.json");
        let results = dir.path().join("results");
        fs::write(&input, "PARAM rate float 0.5\n").unwrap();

        let cli = Cli::try_parse_from([
            "param",
            "-o",
            output.to_str().unwrap(),
            "--save-results",
            results.to_str().unwrap(),
            input.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(process_input(Some(&input), cli.save_results.as_deref(), &cli), 0);

        assert_eq!(fs::read_to_string(&output).unwrap(), "{\n  \"rate\": 0.5\n}");
        assert_eq!(
            fs::read_to_string(results.join("result.json")).unwrap(),
            r#"{"rate":0.5}"#
        );
    }

    #[test]
    fn test_load_failure_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.param");
        fs::write(&input, "PARAM n int many\n").unwrap();
        let cli = Cli::try_parse_from(["param", "--check", input.to_str().unwrap()]).unwrap();
        assert_eq!(process_input(Some(&input), None, &cli), 1);
    }

    #[test]
    fn test_directory_processing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.param"), "PARAM x int 1\n").unwrap();
        fs::write(dir.path().join("b.param"), "PARAM y bool true\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "PARAM z int oops\n").unwrap();

        let cli = Cli::try_parse_from(["param", "-w", "-t", "yaml", dir.path().to_str().unwrap()])
            .unwrap();
        assert_eq!(process_directory(dir.path(), &cli), 0);
        assert_eq!(fs::read_to_string(dir.path().join("a.yaml")).unwrap(), "x: 1\n");
        assert_eq!(fs::read_to_string(dir.path().join("b.yaml")).unwrap(), "y: true\n");
    }

    #[test]
    fn test_write_never_replaces_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run.param");
        let original = "# keep me\nPARAM count int 7\nnotes for humans\n";
        fs::write(&input, original).unwrap();

        let cli = Cli::try_parse_from(["param", "-w", "-t", "param", input.to_str().unwrap()])
            .unwrap();
        assert_eq!(process_input(Some(&input), None, &cli), 1);
        assert_eq!(fs::read_to_string(&input).unwrap(), original);

        let cli = Cli::try_parse_from(["param", "-o", input.to_str().unwrap(), input.to_str().unwrap()])
            .unwrap();
        assert_eq!(process_input(Some(&input), None, &cli), 1);
        assert_eq!(fs::read_to_string(&input).unwrap(), original);
    }

    #[test]
    fn test_directory_write_as_param_keeps_sources() {
        let dir = tempfile::tempdir().unwrap();
        let source = "PARAM x int 1\n# note\n";
        fs::write(dir.path().join("a.param"), source).unwrap();

        let cli = Cli::try_parse_from(["param", "-w", "-t", "param", dir.path().to_str().unwrap()])
            .unwrap();
        assert_eq!(process_directory(dir.path(), &cli), 1);
        assert_eq!(fs::read_to_string(dir.path().join("a.param")).unwrap(), source);
    }

    #[test]
    fn test_deep_list_rejected_except_as_param() {
        let depth = 50_000;
        let source = format!("PARAM deep list {}1{}\n", "[".repeat(depth), "]".repeat(depth));
        let table = parse_parameters(&source, None).unwrap();

        let err = encode(&table, OutputFormat::Json).err().unwrap();
        assert!(err.contains("nests 50000 levels deep"), "{}", err);
        assert!(encode(&table, OutputFormat::Cbor).is_err());

        match encode(&table, OutputFormat::Param).unwrap() {
            Output::Text(text) => assert_eq!(text, source),
            Output::Binary(_) => panic!("PARAM output is text"),
        }
    }
}
