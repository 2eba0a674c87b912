use std::io::{Read, Write};
use std::path;
use flate2::write::GzEncoder;
use flate2::Compression;
use feature_sampler::sample::{ExtensionPolicy, GeneratorSettings, SampleRequest};
use feature_sampler::{CancelToken, Completion, Error, MainOptions};


const MODEL: &str = "c 1 Root\nc 2 Base\nc 3 Extra\np cnf 3 2\n1 0\n-1 2 0\n";


fn options(input: &path::Path, output: &path::Path, request: SampleRequest) -> MainOptions {
    MainOptions {
        strict: true,
        in_path: input.to_path_buf(),
        out_path: Some(output.to_path_buf()),
        request,
        settings: GeneratorSettings::default(),
        policy: ExtensionPolicy::FirstFit,
    }
}

fn read_output(output: &path::Path) -> Vec<String> {
    let mut buf = String::new();
    std::fs::File::open(output).unwrap().read_to_string(&mut buf).unwrap();
    buf.lines().map(|line| line.to_string()).collect()
}

fn check_models(lines: &[String]) {
    assert_eq!(&lines[..4], &["c 1 Root", "c 2 Base", "c 3 Extra", "p sample 3 2"]);
    let mut configs = lines[4..].to_vec();
    configs.sort();
    assert_eq!(configs, vec!["1 2 -3 0", "1 2 3 0"]);
}


#[test]
fn plain_formula_is_sampled_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model.cnf");
    let output = dir.path().join("model.sample");
    std::fs::write(&input, MODEL).unwrap();

    let sample = feature_sampler::run(
        options(&input, &output, SampleRequest::Random { count: 5 }),
        CancelToken::new(),
    )
    .unwrap();
    assert_eq!(sample.len(), 2);
    assert_eq!(sample.completion, Completion::Exhausted);

    check_models(&read_output(&output));
}

#[test]
fn gzipped_formula_is_read() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    {
        let mut enc = GzEncoder::new(input.as_file_mut(), Compression::default());
        enc.write_all(MODEL.as_bytes()).unwrap();
        enc.finish().unwrap();
    }
    let output = tempfile::NamedTempFile::new().unwrap();

    let request = SampleRequest::TWise {
        t: 1,
        groups: None,
        max: usize::MAX,
    };
    let sample = feature_sampler::run(options(input.path(), output.path(), request), CancelToken::new()).unwrap();

    // -1 and -2 are dead, -3 and 3 need a configuration each.
    let coverage = sample.coverage.unwrap();
    assert_eq!(coverage.candidates, 6);
    assert_eq!(coverage.infeasible, 2);
    assert_eq!(coverage.uncovered, 0);

    check_models(&read_output(output.path()));
}

#[test]
fn header_mismatch_is_reported_in_strict_mode() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    write!(input, "p cnf 3 5\n1 0\n").unwrap();
    let output = tempfile::NamedTempFile::new().unwrap();

    let res = feature_sampler::run(
        options(input.path(), output.path(), SampleRequest::Random { count: 1 }),
        CancelToken::new(),
    );
    match res {
        Err(Error::Parse { .. }) => {}
        other => panic!("unexpected {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let res = feature_sampler::run(
        options(&dir.path().join("absent.cnf"), &dir.path().join("out"), SampleRequest::Random { count: 1 }),
        CancelToken::new(),
    );
    assert!(matches!(res, Err(Error::Io(_))));
}
