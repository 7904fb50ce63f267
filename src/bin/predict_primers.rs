use std::path::PathBuf;
use std::process::exit;

use clap::ValueHint;
use indicatif::{ProgressBar, ProgressStyle};

use primerseq::predict::PredictParams;
use primerseq::predict_primers;
use primerseq::types::ReadEnd;

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

    let cmd = clap::command!("predict-primers")
        .about("Predict the primer sequences in a fasta/fastq file")
        .arg(
            clap::arg!(-f --file <path> "fasta or fastq file of reads (optionally gzipped)")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            clap::arg!(-k --kmerlen <int> "kmer length to seed primer searching")
                .value_parser(clap::value_parser!(usize))
                .required(false)
                .default_value("10"),
        )
        .arg(
            clap::arg!(-m --minpercent <float> "minimum percent of reads a kmer should be in to be considered")
                .value_parser(clap::value_parser!(f64))
                .required(false)
                .default_value("1.0"),
        )
        .arg(clap::arg!(-t --threeprime "predict primers at the 3' end of the reads"))
        .arg(clap::arg!(--"fasta-output" "print the predicted primers as fasta"))
        .arg(clap::arg!(--"print-abundance" "print the abundance of each predicted primer"))
        .arg(clap::arg!(--"print-kmer-counts" "print the count of every end kmer"));

    let args = cmd.get_matches();

    let file = args.get_one::<PathBuf>("file").unwrap();
    let kmerlen = *args.get_one::<usize>("kmerlen").unwrap();
    let minpercent = *args.get_one::<f64>("minpercent").unwrap();
    let end = if args.get_flag("threeprime") {
        ReadEnd::ThreePrime
    } else {
        ReadEnd::FivePrime
    };

    let params = PredictParams::new(kmerlen, minpercent, end);

    let progress = spinner("Predicting primers...");
    let results = match predict_primers(file, &params) {
        Ok(results) => results,
        Err(e) => {
            progress.finish_and_clear();
            eprintln!("ERROR: {e}");
            exit(1);
        }
    };
    progress.finish_with_message(format!(
        "Searched {} reads ({} eligible).",
        results.total_reads, results.table.eligible
    ));

    if args.get_flag("print-kmer-counts") {
        print!("{}", results.get_kmer_count_text());
    }

    if args.get_flag("fasta-output") {
        print!("{}", results.get_fasta_text());
    } else {
        println!("There are {} primers", results.candidates.len());
        for (i, candidate) in results.candidates.iter().enumerate() {
            println!(
                "Primer {}: {} ({} reads, {:.2}%)",
                i, candidate.seq, candidate.support, candidate.percent
            );
        }
    }

    if args.get_flag("print-abundance") {
        print!("{}", results.get_abundance_text());
    }
}
