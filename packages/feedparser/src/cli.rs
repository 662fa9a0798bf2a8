//! Command-line interface for the feed parser.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::FeedConfig;
use crate::error::Result;
use crate::pipeline::{check, parse_path, CheckedNotice};
use crate::source::{CharSource, DEFAULT_ENCODING_LABEL};
use crate::tokenizer::Tokenizer;
use crate::types::{notice_label, Element};

/// FBO feed parser - Recover structured procurement notices from the legacy
/// FedBizOpps flat-file feed.
#[derive(Parser)]
#[command(name = "fbofeed-parser")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dump the token stream of a feed file.
    Lex {
        /// Feed file to tokenize.
        file: PathBuf,

        /// Source encoding label (e.g., iso-8859-2, utf-8).
        #[arg(short, long, default_value = DEFAULT_ENCODING_LABEL)]
        encoding: String,
    },

    /// Parse a feed file and emit the notice forest.
    Parse {
        /// Feed file to parse.
        file: PathBuf,

        /// Render an indented tree instead of JSON.
        #[arg(long)]
        ast: bool,

        /// Source encoding label.
        #[arg(short, long, default_value = DEFAULT_ENCODING_LABEL)]
        encoding: String,
    },

    /// Validate every notice in one or more feed files.
    Validate {
        /// Feed files to validate.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Source encoding label.
        #[arg(short, long, default_value = DEFAULT_ENCODING_LABEL)]
        encoding: String,
    },

    /// Print the notice-type frequency table of a feed file.
    Freq {
        /// Feed file to count.
        file: PathBuf,

        /// Source encoding label.
        #[arg(short, long, default_value = DEFAULT_ENCODING_LABEL)]
        encoding: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lex { file, encoding } => lex_command(&file, &encoding),
        Commands::Parse {
            file,
            ast,
            encoding,
        } => parse_command(&file, ast, &encoding),
        Commands::Validate { files, encoding } => validate_command(&files, &encoding),
        Commands::Freq { file, encoding } => freq_command(&file, &encoding),
    }
}

fn lex_command(file: &Path, encoding: &str) -> Result<()> {
    let config = FeedConfig::with_encoding_label(encoding)?;
    let reader = std::io::BufReader::new(std::fs::File::open(file)?);
    let chars = CharSource::new(reader, config.encoding);
    let tokens = Tokenizer::new(chars, config.vocabulary);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for token in tokens {
        writeln!(out, "{}", token?)?;
    }
    Ok(())
}

fn parse_command(file: &Path, ast: bool, encoding: &str) -> Result<()> {
    let config = FeedConfig::with_encoding_label(encoding)?;
    let notices: Vec<Element> = parse_path(file, &config)?.collect::<Result<_>>()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if ast {
        for notice in &notices {
            notice.render_tree(&mut out, 0)?;
        }
    } else {
        serde_json::to_writer_pretty(&mut out, &notices)?;
        writeln!(out)?;
    }
    Ok(())
}

fn validate_command(files: &[PathBuf], encoding: &str) -> Result<()> {
    let config = FeedConfig::with_encoding_label(encoding)?;

    let progress = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.green} {pos}/{len} {msg}")
                .expect("valid template"),
        );
        Some(pb)
    } else {
        None
    };

    let mut validated: Vec<String> = Vec::new();
    let mut failures = 0usize;

    for file in files {
        if let Some(pb) = &progress {
            pb.set_message(file.display().to_string());
        }

        for notice in parse_path(file, &config)? {
            let checked = check(notice?, &config.schemas);
            if checked.is_valid() {
                validated.push(checked.notice.name.clone());
            } else if checked.recognized {
                failures += 1;
                report_failure(&checked)?;
            } else {
                println!(
                    "{} unrecognized notice: {}",
                    style("Warning:").yellow().bold(),
                    checked.notice.name
                );
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    println!();
    println!(
        "{} {} validated, {} failed",
        style("Summary:").bold(),
        style(validated.len()).green(),
        if failures > 0 {
            style(failures).red()
        } else {
            style(failures).green()
        }
    );
    println!();
    println!("Frequency of validated notices:");
    print_frequency(validated.iter().map(String::as_str));

    Ok(())
}

fn freq_command(file: &Path, encoding: &str) -> Result<()> {
    let config = FeedConfig::with_encoding_label(encoding)?;
    let names: Vec<String> = parse_path(file, &config)?
        .map(|notice| notice.map(|n| n.name))
        .collect::<Result<_>>()?;

    print_frequency(names.iter().map(String::as_str));
    Ok(())
}

/// Print a most-common-first frequency table of notice names.
fn print_frequency<'a>(names: impl Iterator<Item = &'a str>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }

    let mut rows: Vec<(&str, usize)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    for (name, count) in rows {
        match notice_label(name) {
            Some(label) => println!("{name:<9} {count:>7}  {label}"),
            None => println!("{name:<9} {count:>7}"),
        }
    }
}

/// Print one notice's validation failure, with the offending subtree.
fn report_failure(checked: &CheckedNotice) -> Result<()> {
    let notice = &checked.notice;
    eprintln!(
        "{}",
        style(format!(
            "Failed to validate <{}> from lines {}-{} because:",
            notice.name, notice.begin_line, notice.end_line
        ))
        .red()
        .bold()
    );
    for violation in &checked.violations {
        eprintln!("    {violation}");
    }

    let mut rendered = Vec::new();
    notice.render_tree(&mut rendered, 4)?;
    eprint!("{}", style(String::from_utf8_lossy(&rendered)).yellow());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::parse_from(["fbofeed-parser", "lex", "feed.txt"]);

        let Commands::Lex { file, encoding } = cli.command else {
            panic!("expected lex command");
        };
        assert_eq!(file, PathBuf::from("feed.txt"));
        assert_eq!(encoding, DEFAULT_ENCODING_LABEL);
    }

    #[test]
    fn test_cli_parse_with_ast_and_encoding() {
        let cli = Cli::parse_from([
            "fbofeed-parser",
            "parse",
            "feed.txt",
            "--ast",
            "--encoding",
            "utf-8",
        ]);

        let Commands::Parse {
            file,
            ast,
            encoding,
        } = cli.command
        else {
            panic!("expected parse command");
        };
        assert_eq!(file, PathBuf::from("feed.txt"));
        assert!(ast);
        assert_eq!(encoding, "utf-8");
    }

    #[test]
    fn test_cli_validate_requires_files() {
        assert!(Cli::try_parse_from(["fbofeed-parser", "validate"]).is_err());

        let cli = Cli::parse_from(["fbofeed-parser", "validate", "a.txt", "b.txt"]);
        let Commands::Validate { files, .. } = cli.command else {
            panic!("expected validate command");
        };
        assert_eq!(files.len(), 2);
    }
}
