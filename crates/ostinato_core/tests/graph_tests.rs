//! End-to-end graph behavior: block processing, live edits, and the
//! boundary between an edit and the block that first observes it.

use approx::assert_relative_eq;
use ostinato_core::{
    GraphBuilder, OscillatorParams, Params, ScalarParams, Waveform,
};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK_SIZE: usize = 128;

/// Mirror of the oscillator's phase arithmetic, used to predict bus
/// contents sample by sample.
struct PhaseModel {
    phase: f32,
}

impl PhaseModel {
    fn new() -> Self {
        Self { phase: 0.0 }
    }

    fn advance(&mut self, frequency: f32) -> f32 {
        let value = (std::f32::consts::TAU * self.phase).sin();
        self.phase += frequency / SAMPLE_RATE;
        while self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        value
    }
}

#[test]
fn oscillator_block_follows_expected_phase_progression() {
    let mut builder = GraphBuilder::new(BLOCK_SIZE).unwrap();
    let out = builder.bus("main");
    builder
        .oscillator(
            "osc",
            out,
            OscillatorParams {
                waveform: Waveform::Sine,
                frequency: 440.0,
                amplitude: 1.0,
            },
        )
        .unwrap();
    let (mut graph, _) = builder.build();

    graph.process_block(SAMPLE_RATE);

    let mut model = PhaseModel::new();
    for (i, &sample) in graph.bus_samples(out).iter().enumerate() {
        let expected = model.advance(440.0);
        assert_relative_eq!(sample, expected, epsilon = 1e-5, max_relative = 1e-4);
        assert!(sample.abs() <= 1.0, "sample {i} out of range: {sample}");
    }
}

#[test]
fn frequency_edit_applies_next_block_with_phase_continuity() {
    let mut builder = GraphBuilder::new(BLOCK_SIZE).unwrap();
    let out = builder.bus("main");
    let module = builder
        .oscillator(
            "osc",
            out,
            OscillatorParams {
                waveform: Waveform::Sine,
                frequency: 440.0,
                amplitude: 1.0,
            },
        )
        .unwrap();
    let (mut graph, _) = builder.build();

    let mut model = PhaseModel::new();

    graph.process_block(SAMPLE_RATE);
    for &sample in graph.bus_samples(out) {
        assert_relative_eq!(
            sample,
            model.advance(440.0),
            epsilon = 1e-5,
            max_relative = 1e-4
        );
    }

    // Edit between blocks: the rate of advance changes, the phase does
    // not. The second block continues from wherever block one left off.
    module
        .edit(Params::Oscillator(OscillatorParams {
            waveform: Waveform::Sine,
            frequency: 880.0,
            amplitude: 1.0,
        }))
        .unwrap();

    graph.process_block(SAMPLE_RATE);
    for &sample in graph.bus_samples(out) {
        assert_relative_eq!(
            sample,
            model.advance(880.0),
            epsilon = 1e-5,
            max_relative = 1e-4
        );
    }
}

#[test]
fn edit_never_rewrites_an_already_processed_block() {
    let mut builder = GraphBuilder::new(BLOCK_SIZE).unwrap();
    let out = builder.bus("main");
    let module = builder
        .scalar("level", out, ScalarParams { value: 0.5 })
        .unwrap();
    let (mut graph, _) = builder.build();

    graph.process_block(SAMPLE_RATE);
    let before: Vec<f32> = graph.bus_samples(out).to_vec();

    module
        .edit(Params::Scalar(ScalarParams { value: 0.25 }))
        .unwrap();

    // The processed block is immutable; only the next pass sees the new
    // value.
    assert_eq!(graph.bus_samples(out), before.as_slice());
    assert!(graph.bus_samples(out).iter().all(|&s| s == 0.5));

    graph.process_block(SAMPLE_RATE);
    assert!(graph.bus_samples(out).iter().all(|&s| s == 0.25));
}

#[test]
fn scalar_writes_its_value_until_edited() {
    let mut builder = GraphBuilder::new(BLOCK_SIZE).unwrap();
    let out = builder.bus("cv");
    let module = builder
        .scalar("level", out, ScalarParams { value: 0.5 })
        .unwrap();
    let (mut graph, _) = builder.build();

    for _ in 0..5 {
        graph.process_block(SAMPLE_RATE);
        assert!(graph.bus_samples(out).iter().all(|&s| s == 0.5));
    }

    module
        .edit(Params::Scalar(ScalarParams { value: -1.5 }))
        .unwrap();

    graph.process_block(SAMPLE_RATE);
    assert!(graph.bus_samples(out).iter().all(|&s| s == -1.5));
}

#[test]
fn registry_edits_flow_through_to_processing() {
    let mut builder = GraphBuilder::new(BLOCK_SIZE).unwrap();
    let out = builder.bus("cv");
    builder
        .scalar("level", out, ScalarParams { value: 0.0 })
        .unwrap();
    let (mut graph, registry) = builder.build();

    let module = registry.resolve("level").unwrap();
    module
        .edit(Params::Scalar(ScalarParams { value: 2.0 }))
        .unwrap();

    graph.process_block(SAMPLE_RATE);
    assert!(graph.bus_samples(out).iter().all(|&s| s == 2.0));
}

#[test]
fn phase_does_not_drift_over_many_blocks() {
    let mut builder = GraphBuilder::new(BLOCK_SIZE).unwrap();
    let out = builder.bus("main");
    builder
        .oscillator(
            "osc",
            out,
            OscillatorParams {
                waveform: Waveform::Triangle,
                frequency: 440.0,
                amplitude: 1.0,
            },
        )
        .unwrap();
    let (mut graph, _) = builder.build();

    // 1000 blocks; the model and the graph accumulate identically, so
    // any divergence would be a wrap bug rather than fp rounding.
    let mut model = PhaseModel::new();
    for _ in 0..1_000 {
        graph.process_block(SAMPLE_RATE);
        for _ in 0..BLOCK_SIZE {
            model.advance(440.0);
        }
    }
    graph.process_block(SAMPLE_RATE);
    let first = graph.bus_samples(out)[0];
    let expected_phase = model.phase;
    let expected = 4.0 * (expected_phase - (expected_phase + 0.5).floor()).abs() - 1.0;
    assert_relative_eq!(first, expected, epsilon = 1e-3);
}
