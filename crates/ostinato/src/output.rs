//! Audio I/O boundary: a thin cpal output stream around the block
//! runner. The device supplies the callback cadence; the engine supplies
//! exactly one entry point ("process one block") and consumes exactly
//! one value (the sample rate carried by the runner).

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use tracing::error;

use crate::config::EngineConfig;
use crate::engine::BlockRunner;
use crate::error::EngineError;

/// Open the default output device and register the per-block callback.
/// Any failure here aborts startup; no callback is ever registered on a
/// partially configured device.
pub(crate) fn start_output(
    config: &EngineConfig,
    runner: BlockRunner,
) -> Result<cpal::Stream, EngineError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(EngineError::NoOutputDevice)?;
    let device_config = device.default_output_config()?;

    let stream_config = cpal::StreamConfig {
        channels: config.channels.min(device_config.channels()).max(1),
        sample_rate: config.sample_rate,
        buffer_size: cpal::BufferSize::Fixed(config.block_size as u32),
    };

    let stream = match device_config.sample_format() {
        cpal::SampleFormat::I8 => make_stream::<i8>(&device, &stream_config, runner),
        cpal::SampleFormat::I16 => make_stream::<i16>(&device, &stream_config, runner),
        cpal::SampleFormat::I32 => make_stream::<i32>(&device, &stream_config, runner),
        cpal::SampleFormat::F32 => make_stream::<f32>(&device, &stream_config, runner),
        other => Err(EngineError::UnsupportedSampleFormat(other)),
    }?;

    stream.play()?;
    Ok(stream)
}

fn make_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut runner: BlockRunner,
) -> Result<cpal::Stream, EngineError>
where
    T: SizedSample + FromSample<f32>,
{
    let num_channels = config.channels as usize;
    let block_size = runner.block_size();

    let err_fn = |err| error!(%err, "output stream error");

    // The device may ask for any number of frames per callback; render
    // whole engine blocks and carry the cursor across callbacks.
    let mut cursor = block_size;

    let stream = device.build_output_stream(
        config,
        move |output: &mut [T], _info: &cpal::OutputCallbackInfo| {
            for frame in output.chunks_mut(num_channels) {
                if cursor == block_size {
                    runner.process_block();
                    cursor = 0;
                }
                let sample = T::from_sample(runner.output()[cursor]);
                cursor += 1;

                for s in frame.iter_mut() {
                    *s = sample;
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
