//! Audio session: the cpal stream that owns the engine

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use fmbank::{EngineConfig, FmEngine, FmPatch, MAX_BLOCK_SIZE};
use ratatui::DefaultTerminal;
use rtrb::{Producer, RingBuffer};

use crate::ui::{
    state::{EngineSnapshot, SessionInfo},
    UiApp,
};

/// Samples buffered for the oscilloscope
const SCOPE_RING_SIZE: usize = 8192;
/// Snapshots buffered for the UI; it only ever reads the latest
const SNAPSHOT_RING_SIZE: usize = 16;
/// UI parameter changes glide over this many blocks
const DEZIPPER_BLOCKS: u32 = 8;

pub struct Session {
    // Dropping the stream stops audio
    _stream: cpal::Stream,
    ui: UiApp,
}

impl Session {
    /// Open the default output device and start rendering.
    pub fn start() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let device_name = device.name().unwrap_or_else(|_| "unknown device".into());

        let engine_config = EngineConfig {
            sample_rate,
            channels: channels.max(2),
            dezipper_steps: DEZIPPER_BLOCKS,
            ..EngineConfig::default()
        };
        let (mut engine, handle) =
            FmEngine::with_handle(engine_config).wrap_err("failed to build the FM engine")?;

        let patch = FmPatch::electric_piano();
        patch.apply(&mut engine);

        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
        let (mut state_tx, state_rx) = RingBuffer::<EngineSnapshot>::new(SNAPSHOT_RING_SIZE);

        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let peak = render_interleaved(
                    &mut engine,
                    data,
                    channels,
                    &mut left,
                    &mut right,
                    &mut scope_tx,
                );
                // A full ring means the UI is behind; it only wants the latest
                let _ = state_tx.push(EngineSnapshot::capture(&engine, peak));
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        let info = SessionInfo {
            device_name,
            sample_rate,
            channels,
        };

        Ok(Self {
            _stream: stream,
            ui: UiApp::new(handle, scope_rx, state_rx, info, patch),
        })
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> EyreResult<()> {
        self.ui.run(&mut terminal)
    }
}

/// Render one device callback in engine-sized blocks and interleave it.
/// Returns the block peak. Runs on the audio thread: no allocation.
fn render_interleaved(
    engine: &mut FmEngine,
    data: &mut [f32],
    channels: usize,
    left: &mut [f32],
    right: &mut [f32],
    scope: &mut Producer<f32>,
) -> f32 {
    if channels == 0 {
        return 0.0;
    }

    let total_frames = data.len() / channels;
    let mut frames_written = 0;
    let mut peak = 0.0f32;

    while frames_written < total_frames {
        let frames = (total_frames - frames_written).min(left.len());
        engine.render(&mut left[..frames], &mut right[..frames]);

        let out = &mut data[frames_written * channels..(frames_written + frames) * channels];
        for (i, frame) in out.chunks_exact_mut(channels).enumerate() {
            frame[0] = left[i];
            if let Some(sample) = frame.get_mut(1) {
                *sample = right[i];
            }
            for extra in frame.iter_mut().skip(2) {
                *extra = 0.0;
            }

            peak = peak.max(left[i].abs());
            let _ = scope.push(left[i]);
        }

        frames_written += frames;
    }

    peak
}
