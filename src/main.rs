#[macro_use]
extern crate clap;

use std::io::Write;
use std::{path, process};
use feature_sampler::sample::{ExtensionPolicy, GeneratorSettings, SampleRequest};
use feature_sampler::CancelToken;


fn is_number(s: String) -> Result<(), String> {
    s.parse::<u64>().map(|_| ()).map_err(|_| format!("'{}' is not a non-negative number", s))
}


fn app() -> clap::App<'static, 'static> {
    clap::App::new("feature-sampler")
        .version(crate_version!())
        .about("Samples valid configurations of a feature model given as DIMACS CNF")
        .arg(clap::Arg::with_name("verb").long("verb").takes_value(true).possible_values(&["0", "1", "2"]).help("Verbosity level (0=silent, 1=some, 2=more)"))
        .arg(clap::Arg::with_name("strict").long("strict").help("Validate DIMACS header during parsing"))
        .arg(clap::Arg::with_name("random").long("random").takes_value(true).validator(is_number).help("Number of random configurations"))
        .arg(clap::Arg::with_name("twise").long("twise").takes_value(true).validator(is_number).help("Interaction strength of a covering sample"))
        .arg(clap::Arg::with_name("module").long("module").takes_value(true).help("Feature to sample with and without"))
        .group(clap::ArgGroup::with_name("mode").args(&["random", "twise", "module"]).required(true))
        .arg(clap::Arg::with_name("limit").long("limit").takes_value(true).validator(is_number).help("Maximal number of configurations"))
        .arg(clap::Arg::with_name("seed").long("seed").takes_value(true).validator(is_number).help("Seed of the run's random source"))
        .arg(clap::Arg::with_name("allow-duplicates").long("allow-duplicates").help("Do not forbid configurations already in the sample"))
        .arg(clap::Arg::with_name("policy").long("policy").takes_value(true).possible_values(&["first", "last", "shuffled"]).help("Which configuration a t-wise run tries to extend first"))
        .arg(clap::Arg::with_name("input").required(true))
        .arg(clap::Arg::with_name("output").required(false))
}


fn main() {
    let matches = app().get_matches();

    {
        let mut builder = env_logger::Builder::new();
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
        builder.filter(
            None,
            matches
                .value_of("verb")
                .map(|v| match v {
                    "1" => log::LevelFilter::Info,
                    "2" => log::LevelFilter::Trace,
                    _ => log::LevelFilter::Off,
                })
                .unwrap_or(log::LevelFilter::Info),
        );
        builder.init();
    }

    let settings = {
        let mut s = GeneratorSettings::default();

        if matches.is_present("limit") {
            s.max_sample_size = value_t!(matches, "limit", usize).unwrap_or_else(|e| e.exit());
        }

        if matches.is_present("seed") {
            s.seed = value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit());
        }

        if matches.is_present("allow-duplicates") {
            s.allow_duplicates = true;
        }

        s
    };

    let policy = match matches.value_of("policy") {
        Some("first") => ExtensionPolicy::FirstFit,
        Some("last") => ExtensionPolicy::LastFit,
        _ => ExtensionPolicy::Shuffled,
    };

    let request = if let Some(feature) = matches.value_of("module") {
        SampleRequest::Module { feature: feature.to_string() }
    } else if matches.is_present("twise") {
        SampleRequest::TWise {
            t: value_t!(matches, "twise", usize).unwrap_or_else(|e| e.exit()),
            groups: None,
            max: settings.max_sample_size,
        }
    } else {
        SampleRequest::Random {
            count: value_t!(matches, "random", usize).unwrap_or_else(|e| e.exit()),
        }
    };

    let main = feature_sampler::MainOptions {
        strict: matches.is_present("strict"),
        in_path: path::PathBuf::from(matches.value_of("input").unwrap_or_default()),
        out_path: matches.value_of("output").map(path::PathBuf::from),
        request,
        settings,
        policy,
    };

    if let Err(e) = feature_sampler::run(main, CancelToken::new()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}


#[cfg(test)]
mod tests {
    use super::app;

    fn parses(args: &[&str]) -> bool {
        let mut argv = vec!["feature-sampler"];
        argv.extend_from_slice(args);
        app().get_matches_from_safe(argv).is_ok()
    }

    #[test]
    fn counts_must_be_numbers() {
        assert!(parses(&["--random", "12", "model.cnf"]));
        assert!(parses(&["--twise", "2", "--limit", "5", "--seed", "9", "model.cnf"]));

        assert!(!parses(&["--random", "abc", "model.cnf"]));
        assert!(!parses(&["--random", "-3", "model.cnf"]));
        assert!(!parses(&["--twise", "two", "model.cnf"]));
        assert!(!parses(&["--random", "4", "--limit", "many", "model.cnf"]));
        assert!(!parses(&["--random", "4", "--seed", "x1", "model.cnf"]));
    }

    #[test]
    fn one_mode_is_required() {
        assert!(!parses(&["model.cnf"]));
        assert!(!parses(&["--random", "1", "--twise", "2", "model.cnf"]));
        assert!(parses(&["--module", "a", "model.cnf"]));
    }
}
