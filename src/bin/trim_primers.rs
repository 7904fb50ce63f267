use std::fs;
use std::path::PathBuf;
use std::process::exit;

use clap::ValueHint;
use indicatif::{ProgressBar, ProgressStyle};

use primerseq::trim::TrimOptions;
use primerseq::trim_primers;

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message(message.to_string());
    spinner
}

fn main() {
    env_logger::init();

    let cmd = clap::command!("trim-primers")
        .about("Trim primer sequences from the ends of fastq reads")
        .arg(
            clap::arg!(--fastq <path> "fastq file to trim primers from")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            clap::arg!(-l --leftprimers <path> "fasta file of left (5') primers")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath)
                .required(false),
        )
        .arg(
            clap::arg!(-r --rightprimers <path> "fasta file of right (3') primers")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath)
                .required(false),
        )
        .arg(
            clap::arg!(--"max-mismatches" <int> "mismatches tolerated in a primer match")
                .value_parser(clap::value_parser!(u32))
                .required(false)
                .default_value("2"),
        )
        .arg(clap::arg!(--"trim-poly" "also trim homopolymer runs off the 3' end"))
        .arg(
            clap::arg!(-o --output <path> "write trimmed reads here instead of stdout")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath)
                .required(false),
        );

    let args = cmd.get_matches();

    let fastq = args.get_one::<PathBuf>("fastq").unwrap();
    let left = args.get_one::<PathBuf>("leftprimers");
    let right = args.get_one::<PathBuf>("rightprimers");

    if left.is_none() && right.is_none() {
        eprintln!("ERROR: Either left or right primers must be specified. Try -h for more options");
        exit(1);
    }

    let options = TrimOptions {
        max_mismatches: *args.get_one::<u32>("max-mismatches").unwrap(),
        trim_poly: args.get_flag("trim-poly"),
    };

    let progress = spinner("Trimming primers...");
    let results = match trim_primers(
        fastq,
        left.map(|p| p.as_path()),
        right.map(|p| p.as_path()),
        options,
    ) {
        Ok(results) => results,
        Err(e) => {
            progress.finish_and_clear();
            eprintln!("ERROR: {e}");
            exit(1);
        }
    };
    progress.finish_with_message(format!(
        "Trimmed {} of {} reads.",
        results.trimmed_count(),
        results.results.len()
    ));

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            if let Err(e) = fs::write(path, results.get_trimmed_text()) {
                eprintln!("ERROR: could not write {}: {e}", path.display());
                exit(1);
            }
        }
        None => print!("{}", results.get_trimmed_text()),
    }
}
