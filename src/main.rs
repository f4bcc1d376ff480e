use std::{
    ffi::OsStr,
    ffi::OsString,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process,
};

use clap::{ArgGroup, Parser as ClapParser};
use oxc_span::SourceType;
use tracing_subscriber::EnvFilter;

use modules_commonjs::{ModuleTransformer, RunOptions, TransformOptions};

#[derive(Debug, ClapParser)]
#[command(name = "modules-commonjs", about = "Rewrite ES module syntax into CommonJS")]
#[command(group(
    ArgGroup::new("verbosity")
        .args(["quiet", "verbose"])
        .multiple(false)
))]
struct Cli {
    /// The JS/TS module to rewrite
    input_filename: PathBuf,

    /// Resolve namespace imports to the raw require binding and use a plain module flag
    #[arg(long = "strict")]
    strict: bool,

    /// Set the module flag with a plain assignment
    #[arg(long = "loose")]
    loose: bool,

    /// Append `module.exports = exports['default']` when the module only has a default export
    #[arg(long = "add-exports")]
    add_exports: bool,

    /// JSON file with transform options. Flags given on the command line take precedence
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Suppress status messages
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Show debug messages while rewriting
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Write the result to output filename. <input_stem>.cjs is used if no filename is provided
    #[arg(short = 'o', long = "output", num_args = 0..=1, default_missing_value = "")]
    output: Option<OsString>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == clap::error::ErrorKind::ArgumentConflict => {
            eprintln!("[-] Critical Error: Don't set both -q and -v at the same time");
            process::exit(2);
        }
        Err(e) => e.exit(),
    };

    init_tracing(&cli);

    let mut options = match cli.config.as_deref() {
        Some(path) => match TransformOptions::from_json_file(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("[-] Critical Error: {e}");
                process::exit(1);
            }
        },
        None => TransformOptions::default(),
    };
    options.strict |= cli.strict;
    options.loose |= cli.loose;
    options.add_exports |= cli.add_exports;

    let input_path = cli.input_filename;
    let source_text = match read_file_to_string_with_capacity(&input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[-] Critical Error: Failed to read {}: {e}", input_path.display());
            process::exit(1);
        }
    };

    let source_type = match SourceType::from_path(&input_path) {
        Ok(st) => st.with_module(true),
        Err(e) => {
            eprintln!("[-] Critical Error: Failed to determine source type for {}: {e}", input_path.display());
            process::exit(1);
        }
    };

    if !cli.quiet {
        eprintln!("[!] Rewriting {}...", input_path.display());
        if options.strict {
            eprintln!("[!] Strict mode enabled");
        }
    }

    let transformer = ModuleTransformer::new(options);
    let result = match transformer.transform(
        &source_text,
        RunOptions { source_type: Some(source_type), filename_for_source_type: None },
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[-] Critical Error: {e}");
            process::exit(1);
        }
    };

    if !cli.quiet && !result.modified {
        eprintln!("[!] No module syntax found");
    }

    let output_text = result.code;

    match cli.output.as_deref() {
        Some(output) => {
            let output_path = resolve_output_path(&input_path, output);
            if let Err(e) = fs::write(&output_path, output_text.as_bytes()) {
                eprintln!("[-] Critical Error: Failed to write {}: {e}", output_path.display());
                process::exit(1);
            }
            if !cli.quiet {
                eprintln!("[+] Saved {}", output_path.display());
            }
        }
        None => print!("{output_text}"),
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn read_file_to_string_with_capacity(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let cap = file.metadata().ok().and_then(|m| usize::try_from(m.len()).ok()).unwrap_or(0);
    let mut s = String::with_capacity(cap.saturating_add(1));
    file.read_to_string(&mut s)?;
    Ok(s)
}

fn resolve_output_path(input_path: &Path, output: &OsStr) -> PathBuf {
    if !output.is_empty() {
        return PathBuf::from(output);
    }
    let stem = input_path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    input_path.with_file_name(format!("{stem}.cjs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_output_flag_writes_next_to_input() {
        let path = resolve_output_path(Path::new("src/app.mjs"), OsStr::new(""));
        assert_eq!(path, PathBuf::from("src/app.cjs"));
    }

    #[test]
    fn explicit_output_is_used_verbatim() {
        let path = resolve_output_path(Path::new("src/app.mjs"), OsStr::new("out/app.js"));
        assert_eq!(path, PathBuf::from("out/app.js"));
    }
}
