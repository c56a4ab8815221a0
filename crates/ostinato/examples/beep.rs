// Minimal playback demo: a triangle oscillator through a bandpass
// filter on the default output device, with a live frequency edit while
// the stream runs.
//
// Run with: cargo run --example beep

use std::thread;
use std::time::Duration;

use ostinato::{
    BandpassParams, ControlMessage, Engine, EngineConfig, GraphBuilder, OscillatorParams, Params,
    Waveform,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = EngineConfig::default();

    let mut builder = GraphBuilder::new(config.block_size)?;
    let raw = builder.bus("raw");
    let main_out = builder.bus("main");
    builder.oscillator(
        "osc",
        raw,
        OscillatorParams {
            waveform: Waveform::Triangle,
            frequency: 220.0,
            amplitude: 0.4,
        },
    )?;
    builder.bandpass(
        "bpf",
        main_out,
        raw,
        BandpassParams {
            center: 440.0,
            resonance: 1.2,
            amplitude: 0.8,
        },
    )?;
    let (graph, registry) = builder.build();

    let mut engine = Engine::new(config, graph, registry, main_out)?;
    let control = engine.control_sender();
    engine.start()?;

    thread::sleep(Duration::from_secs(1));

    // An octave up, applied at the next block boundary.
    control.send(ControlMessage {
        target: "osc".into(),
        edit: Params::Oscillator(OscillatorParams {
            waveform: Waveform::Triangle,
            frequency: 440.0,
            amplitude: 0.4,
        }),
    })?;

    thread::sleep(Duration::from_secs(1));

    drop(control);
    engine.shutdown();
    Ok(())
}
