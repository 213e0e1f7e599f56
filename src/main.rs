use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use termcolor::Color;

use sqlsplit::binds::bind_variables;
use sqlsplit::parser::parse_script_file;
use sqlsplit::script::ParsedStatement;
use sqlsplit::{cprint, cprintln, println};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script files to split.
    #[arg(value_hint = clap::ValueHint::FilePath, required = true)]
    scripts: Vec<PathBuf>,

    /// Allow statements other than anonymous blocks to end with a semi-colon.
    #[arg(long)]
    allow_semicolon_terminators: bool,

    /// Dump the parsed statements to JSON.
    #[arg(long)]
    dump: bool,

    /// List the bind variables used by each statement.
    #[arg(long)]
    binds: bool,

    /// Only print per-file status lines.
    #[arg(long, short)]
    quiet: bool,
}

fn print_statements(statements: &[ParsedStatement], binds: bool) {
    for statement in statements {
        cprintln!(
            fg = Color::Cyan,
            dimmed = true,
            "-- {}",
            statement.location()
        );
        println!("{statement}");
        cprintln!(fg = Color::Cyan, "/");
        if binds {
            let names = bind_variables(statement);
            if !names.is_empty() {
                cprintln!(dimmed = true, "-- binds: {}", names.join(", "));
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.dump {
        let mut parsed = Vec::new();
        for path in &args.scripts {
            parsed.push(parse_script_file(path, args.allow_semicolon_terminators)?);
        }
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    let mut failed = 0;
    let total = args.scripts.len();

    for path in &args.scripts {
        let start = Instant::now();
        cprint!(fg = Color::Cyan, "{} ... ", path.display());
        match parse_script_file(path, args.allow_semicolon_terminators) {
            Ok(statements) => {
                cprint!(fg = Color::Green, "OK");
                cprintln!(
                    dimmed = true,
                    " ({} statement(s), {:?})",
                    statements.len(),
                    start.elapsed()
                );
                if !args.quiet {
                    print_statements(&statements, args.binds);
                }
            }
            Err(e) => {
                cprintln!(fg = Color::Red, "FAILED");
                cprintln!("{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        cprintln!(fg = Color::Red, "{failed}/{total} file(s) failed");
        std::process::exit(1);
    }

    Ok(())
}
