// a3mx: Reconstruct multiple sequence alignments from compressed A3M data.
//
// Copyright 2026 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;

use clap::Parser;

use a3mx::Format;
use a3mx::store::ffindex::FlatFileStore;

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

fn main() {
    let cli = cli::Cli::parse();

    // Subcommands:
    match &cli.command {
        // Extract
        Some(cli::Commands::Extract {
            input_files,
            sequence_data,
            sequence_index,
            header_data,
            header_index,
            format,
            write_to_stdout,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let out_format = format.parse::<Format>().expect("Valid output format");
            let extension = match out_format {
                Format::A3M => "a3m",
                _ => "fasta",
            };

            let sequences = FlatFileStore::open(sequence_data, sequence_index)
                .expect("Valid ffindex sequence database");
            let headers = FlatFileStore::open(header_data, header_index)
                .expect("Valid ffindex header database");

            input_files.iter().for_each(|file| {
                let mut conn_in = File::open(file).unwrap();

                if *write_to_stdout {
                    let mut conn_out = std::io::stdout();
                    a3mx::extract_from_read_to_write(&sequences, &headers, out_format.clone(), &mut conn_in, &mut conn_out).unwrap();
                } else {
                    let f = File::create(file.with_extension(extension)).unwrap();
                    let mut conn_out = BufWriter::new(f);
                    a3mx::extract_from_read_to_write(&sequences, &headers, out_format.clone(), &mut conn_in, &mut conn_out).unwrap();
                    conn_out.flush().unwrap();
                }
            });

        },

        // Convert
        Some(cli::Commands::Convert {
            input_files,
            write_to_stdout,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            input_files.iter().for_each(|file| {
                let mut conn_in = File::open(file).unwrap();

                if *write_to_stdout {
                    let mut conn_out = std::io::stdout();
                    a3mx::convert_from_read_to_write(&mut conn_in, &mut conn_out).unwrap();
                } else {
                    let f = File::create(file.with_extension("fasta")).unwrap();
                    let mut conn_out = BufWriter::new(f);
                    a3mx::convert_from_read_to_write(&mut conn_in, &mut conn_out).unwrap();
                    conn_out.flush().unwrap();
                }
            });

        },
        None => { todo!("Print help message.")},
    }
}
