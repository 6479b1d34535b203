pub mod cli;
pub mod config;
pub mod correction;
pub mod diagnostic;
pub mod formatter;
pub mod fs;
pub mod linter;
pub mod parse;
pub mod rule;

use std::io::Read;
use std::io::Write;

use anyhow::Result;

use cli::Args;
use config::load_options;
use formatter::create_formatter;
use fs::discover_files;
use linter::{lint_source, run_linter};
use parse::source::SourceFile;
use rule::OrderRule;

/// Run the linter. Returns the exit code: 0 = clean, 1 = offenses found.
pub fn run(args: Args) -> Result<i32> {
    let options = load_options(args.config.as_deref())?;
    let rule = OrderRule::new(options);

    if args.debug {
        if let Some(error) = rule.config_error() {
            eprintln!("debug: configuration error: {error}");
        }
    }

    // --stdin: lint a single source from stdin. With --fix the corrected
    // source is written to stdout instead of a report.
    if let Some(ref display_path) = args.stdin {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        let source = SourceFile::from_string(display_path.clone(), input);
        let (diagnostics, corrected) = lint_source(&source, &rule, args.fix);
        if args.fix {
            let bytes = corrected.unwrap_or_else(|| source.as_bytes().to_vec());
            std::io::stdout().write_all(&bytes)?;
        } else {
            let formatter = create_formatter(&args.format);
            formatter.print(&diagnostics, 1);
        }
        return Ok(i32::from(!diagnostics.is_empty()));
    }

    let files = discover_files(&args.paths)?;

    if args.list_target_files {
        for file in &files {
            println!("{}", file.display());
        }
        return Ok(0);
    }

    if args.debug {
        eprintln!("debug: {} files to lint", files.len());
    }

    let result = run_linter(&files, &rule, args.fix);
    let formatter = create_formatter(&args.format);
    formatter.print(&result.diagnostics, result.file_count);

    Ok(i32::from(!result.diagnostics.is_empty()))
}
