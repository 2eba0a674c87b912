#[macro_use]
extern crate log;

use std::{fs, io, path};
use crate::sample::{ExtensionPolicy, GeneratorSettings, LogMonitor, Sample, SampleRequest};

pub mod cnf;
pub mod error;
pub mod sample;
pub mod sat;

pub use crate::cnf::{Cnf, LiteralSet, Order, Variables};
pub use crate::error::{Error, Result};
pub use crate::sample::{generate, CancelToken, Completion};


pub struct MainOptions {
    pub strict: bool,
    pub in_path: path::PathBuf,
    pub out_path: Option<path::PathBuf>,
    pub request: SampleRequest,
    pub settings: GeneratorSettings,
    pub policy: ExtensionPolicy,
}


/// Reads the formula, samples it and writes the configurations to the output
/// file, or to stdout when there is none.
pub fn run(options: MainOptions, cancel: CancelToken) -> Result<Sample> {
    let initial_time = time::precise_time_s();

    info!("============================[ Problem Statistics ]=============================");
    info!("|                                                                             |");

    let cnf = cnf::dimacs::parse_file(&options.in_path, options.strict)?;

    info!("|  Number of variables:  {:12}                                         |", cnf.n_vars());
    info!("|  Number of clauses:    {:12}                                         |", cnf.clauses().len());

    let parsed_time = time::precise_time_s();
    info!("|  Parse time:           {:12.2} s                                       |", parsed_time - initial_time);
    info!("|                                                                             |");
    info!("===============================================================================");

    let mut monitor = LogMonitor::new(cancel);
    let sample = generate(&cnf, &options.request, &options.settings, options.policy, &mut monitor)?;

    let sampled_time = time::precise_time_s();
    info!("===============================================================================");
    info!("|  Configurations:       {:12}                                         |", sample.len());
    info!("|  Status:               {:>12}                                         |", format!("{:?}", sample.completion));
    if let Some(ref coverage) = sample.coverage {
        info!(
            "|  Coverage:             {:12.2} % ({} of {}, {} infeasible)",
            coverage.ratio() * 100.0,
            coverage.covered,
            coverage.candidates,
            coverage.infeasible
        );
    }
    info!("|  Sampling time:        {:12.2} s                                       |", sampled_time - parsed_time);
    info!("===============================================================================");
    sample.stats.log(sampled_time - parsed_time);

    match options.out_path {
        Some(ref path) => {
            let mut file = io::BufWriter::new(fs::File::create(path)?);
            cnf::dimacs::write_sample(&mut file, cnf.variables(), &sample.configurations)?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            cnf::dimacs::write_sample(&mut out, cnf.variables(), &sample.configurations)?;
        }
    }

    Ok(sample)
}
