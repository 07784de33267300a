// randvcf: Random generation of syntactically valid VCF documents.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
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
use clap::{CommandFactory, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;

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
        // Generate
        Some(cli::Commands::Generate {
            shape,
            seed,
            out_file,
            gzip,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let config = match shape.to_config() {
                Ok(config) => config,
                Err(e) => {
                    log::error!("{}", e);
                    std::process::exit(2);
                },
            };

            let seed = (*seed).unwrap_or_else(rand::random::<u64>);
            log::info!("Using seed {}", seed);
            let mut rng = StdRng::seed_from_u64(seed);

            let mut conn_out = match randvcf::compression::open_output(out_file.as_deref(), *gzip) {
                Ok(conn) => conn,
                Err(e) => {
                    log::error!("Could not open output: {}", e);
                    std::process::exit(1);
                },
            };

            if let Err(e) = randvcf::generate_vcf_to_write(&config, &mut rng, &mut conn_out) {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },

        // Check
        Some(cli::Commands::Check {
            input_file,
            min_ploidy,
            max_ploidy,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let mut conn_in = match randvcf::compression::open_input(input_file) {
                Ok(conn) => conn,
                Err(e) => {
                    log::error!("Could not open {}: {}", input_file.display(), e);
                    std::process::exit(1);
                },
            };

            match randvcf::parser::validate::validate(&mut conn_in, *min_ploidy..=*max_ploidy) {
                Ok(summary) => {
                    println!("{}\tOK\t{} records\t{} samples", input_file.display(), summary.n_records, summary.n_samples);
                },
                Err(e) => {
                    log::error!("{}: {}", input_file.display(), e);
                    std::process::exit(1);
                },
            }
        },
        None => {
            init_log(1);
            if let Err(e) = cli::Cli::command().print_help() {
                log::error!("Could not print help: {}", e);
                std::process::exit(1);
            }
        },
    }
}
