use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use audiosplit_core::{
    plan_windows, AudioSplitError, CancellationToken, ChunkSplitter, DurationProbe,
    ProgressReporter, SplitRequest, TranscodeJob, Transcoder,
};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tempfile::TempDir;

struct Input {
    _dir: TempDir,
    path: PathBuf,
}

impl Input {
    fn new(file_name: &str) -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(file_name);
        File::create(&path)?;
        Ok(Self { _dir: dir, path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

struct FixedProbe(f64);

impl DurationProbe for FixedProbe {
    fn probe(&self, _path: &Path) -> Result<f64, AudioSplitError> {
        Ok(self.0)
    }
}

struct NullTranscoder;

impl Transcoder for NullTranscoder {
    fn transcode(&self, _job: &TranscodeJob) -> Result<(), AudioSplitError> {
        Ok(())
    }
}

struct SilentProgress;

impl ProgressReporter for SilentProgress {}

struct Scenario {
    name: &'static str,
    total_secs: f64,
    chunk_minutes: u32,
}

const SCENARIOS: [Scenario; 3] = [
    Scenario {
        name: "podcast_1h_in_10m",
        total_secs: 3_600.0,
        chunk_minutes: 10,
    },
    Scenario {
        name: "audiobook_20h_in_1m",
        total_secs: 72_000.5,
        chunk_minutes: 1,
    },
    Scenario {
        name: "archive_30d_in_1m",
        total_secs: 2_592_000.25,
        chunk_minutes: 1,
    },
];

fn plan_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_windows");

    for scenario in &SCENARIOS {
        group.bench_with_input(
            BenchmarkId::from_parameter(scenario.name),
            scenario,
            |b, scenario| {
                let chunk_secs = f64::from(scenario.chunk_minutes) * 60.0;
                b.iter(|| plan_windows(scenario.total_secs, chunk_secs).expect("valid plan"));
            },
        );
    }

    group.finish();
}

fn split_benchmarks(c: &mut Criterion) {
    let input = Input::new("synthetic.wav").expect("failed to create input fixture");
    let mut group = c.benchmark_group("split_bookkeeping");

    for scenario in SCENARIOS.iter().take(2) {
        group.bench_with_input(
            BenchmarkId::from_parameter(scenario.name),
            scenario,
            |b, scenario| {
                b.iter_batched(
                    || {
                        let output = tempfile::tempdir().expect("failed to create output dir");
                        let request = SplitRequest::builder(input.path(), scenario.chunk_minutes)
                            .output_folder(output.path())
                            .build()
                            .expect("failed to build request");
                        (request, output)
                    },
                    |(request, _output)| {
                        let splitter =
                            ChunkSplitter::new(FixedProbe(scenario.total_secs), NullTranscoder);
                        splitter
                            .split(&request, &mut SilentProgress, &CancellationToken::new())
                            .expect("split run failed");
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, plan_benchmarks, split_benchmarks);
criterion_main!(benches);
