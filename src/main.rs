//! forge – command-line HTML → PDF converter backed by wkhtmltopdf.
//!
//! Usage:
//!   forge <input> [output.pdf|-] [--landscape] [--title "My Report"] [--toc]
//!         [--bin /path/to/wkhtmltopdf] [--config forge.json]
//!
//! `<input>` is a file path, URL, or `-` for stdin. If `output.pdf` is
//! omitted the PDF is written next to the input file with the same stem
//! (e.g. `report.html` → `report.pdf`), or for a URL into the current
//! directory named after its last path segment. An output of `-` writes the
//! PDF to stdout.

use std::{env, fs, path::PathBuf, process};

use wkhtml_forge::config::ForgeConfig;
use wkhtml_forge::document::{Document, Orientation};
use wkhtml_forge::page::default_output_path;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input: Option<String> = None;
    let mut output: Option<String> = None;
    let mut landscape = false;
    let mut toc = false;
    let mut title: Option<String> = None;
    let mut executable: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1).peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--landscape" | "-l" => landscape = true,
            "--toc" => toc = true,
            "--title" | "-t" => title = Some(expect_value(&mut iter, arg, &args[0])),
            "--bin" => executable = Some(expect_value(&mut iter, arg, &args[0])),
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(expect_value(&mut iter, arg, &args[0])))
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') && other != "-" => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            value => {
                if positional == 0 {
                    input = Some(value.to_string());
                } else if positional == 1 {
                    output = Some(value.to_string());
                } else {
                    eprintln!("Unexpected argument: {value}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input {
        Some(i) => i,
        None => {
            eprintln!("Error: no input specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let config = match config_path {
        Some(path) => match ForgeConfig::from_file(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => ForgeConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if executable.is_some() {
        config.executable = executable;
    }

    let mut doc = Document::from_config(&config);
    if landscape {
        doc.options.orientation = Orientation::Landscape;
    }
    if title.is_some() {
        doc.options.title = title;
    }
    if toc {
        doc.add_toc();
    }
    doc.add_page(input.as_str());

    let output = match output.or_else(|| {
        default_output_path(&input).map(|p| p.to_string_lossy().into_owned())
    }) {
        Some(o) => o,
        None => {
            eprintln!("Error: an output path is required when reading from stdin.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if output == "-" {
        if let Err(e) = doc.print() {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
        return;
    }

    let output = PathBuf::from(output);
    // Create output directory if necessary.
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating output directory: {e}");
                process::exit(1);
            }
        }
    }

    match doc.save(&output) {
        Ok(bytes) => eprintln!("Wrote '{}' ({bytes} bytes)", output.display()),
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    }
}

fn expect_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str, prog: &str) -> String {
    match iter.next() {
        Some(v) => v.clone(),
        None => {
            eprintln!("Missing value for {flag}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("forge – HTML to PDF converter (wkhtml-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <input> [output.pdf|-] [--landscape] [--title \"My Report\"] [--toc]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <input>        HTML file, URL, or `-` for stdin");
    eprintln!("  [output.pdf]   Output path, `-` for stdout (default: input stem or last URL segment + .pdf;");
    eprintln!("                 required when <input> is `-`)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --title, -t    Document title in PDF metadata");
    eprintln!("  --landscape    Use landscape page orientation");
    eprintln!("  --toc          Insert a table of contents before the page");
    eprintln!("  --bin PATH     wkhtmltopdf executable (default: autodetect, or $FORGE_WKHTMLTOPDF)");
    eprintln!("  --config FILE  JSON config with executable, candidates and document options");
    eprintln!("  --help         Print this message");
}
