use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use anyhow::Context;
use log::info;

use egrep::{LineMatch, SearchEngine, Strategy, StrategyKind, parse};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pattern to search for
    #[arg(value_name = "REGEX")]
    regex: String,

    /// File to search (standard input if absent)
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Matching algorithm
    #[arg(short = 's', long, value_enum, default_value_t = StrategyArg::Auto)]
    strategy: StrategyArg,

    /// Prefix each matching line with its line number
    #[arg(short = 'n', long)]
    line_number: bool,

    /// Print only the number of matching lines
    #[arg(short = 'c', long)]
    count: bool,

    /// Dump the parsed tree and the compiled automaton to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    /// KMP for literal patterns, the automaton otherwise
    Auto,
    /// Determinized automaton retried from every offset
    Automaton,
    /// Knuth-Morris-Pratt, literal patterns only
    Kmp,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => StrategyKind::Auto,
            StrategyArg::Automaton => StrategyKind::Automaton,
            StrategyArg::Kmp => StrategyKind::Kmp,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut engine =
        SearchEngine::with_strategy(&args.regex, args.strategy.into()).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(2);
        });

    if args.verbose {
        dump(&args.regex, engine.strategy());
    }

    let matches = search(&mut engine, args.file.as_deref()).unwrap_or_else(|err| {
        eprintln!("{:#}", err);
        std::process::exit(2);
    });
    info!("{} matching line(s)", matches.len());

    if args.count {
        println!("{}", matches.len());
    } else {
        for LineMatch { number, line } in &matches {
            if args.line_number {
                println!("{}:{}", number, line);
            } else {
                println!("{}", line);
            }
        }
    }

    if matches.is_empty() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn search(engine: &mut SearchEngine, path: Option<&str>) -> anyhow::Result<Vec<LineMatch>> {
    match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
            engine
                .search_lines(BufReader::new(file))
                .with_context(|| format!("Failed to search {}", path))
        }
        None => engine.search_lines(io::stdin().lock()),
    }
}

fn dump(pattern: &str, strategy: &Strategy) {
    // The strategy was built from this pattern, so it parses.
    if let Ok(tree) = parse(pattern) {
        eprintln!("Tree: {}", tree);
    }
    match strategy {
        Strategy::Automaton(automaton) => {
            eprintln!(
                "DFA ({} states):\n{}",
                automaton.automaton().state_count(),
                automaton.automaton()
            );
        }
        Strategy::Kmp(kmp) => {
            eprintln!("KMP factor {:?}, carry-over {:?}", kmp.factor(), kmp.carry_over());
        }
    }
}
