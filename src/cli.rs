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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Extract ca3m archives to A3M or FASTA
    Extract {
        // Input ca3m file(s)
        #[arg(group = "input", required = true, help = "Input file(s)")]
        input_files: Vec<PathBuf>,

        // ffindex data file with the stored sequences
        #[arg(long = "sequences", required = true)]
        sequence_data: PathBuf,

        // ffindex index file for the stored sequences
        #[arg(long = "sequence-index", required = true)]
        sequence_index: PathBuf,

        // ffindex data file with the stored headers
        #[arg(long = "headers", required = true)]
        header_data: PathBuf,

        // ffindex index file for the stored headers
        #[arg(long = "header-index", required = true)]
        header_index: PathBuf,

        // Output format, defaults to A3M
        #[arg(long = "format", default_value = "a3m")]
        format: String,

        // Write to stdout instead of a file
        #[arg(short = 'c', long = "stdout", default_value_t = false)]
        write_to_stdout: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Convert A3M text to FASTA
    Convert {
        // Input A3M file(s)
        #[arg(group = "input", required = true, help = "Input file(s)")]
        input_files: Vec<PathBuf>,

        // Write to stdout instead of a file
        #[arg(short = 'c', long = "stdout", default_value_t = false)]
        write_to_stdout: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
