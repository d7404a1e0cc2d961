//! TUI module for fmbank
//!
//! Turns key presses into engine messages and shows what the audio thread
//! reports back.

mod panels;
pub mod state;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use fmbank::{EngineError, EngineHandle, FmPatch, GlobalParams, ParamAddress};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::{Duration, Instant};

use self::{
    panels::{render_params, render_voices},
    state::{EngineSnapshot, SessionInfo},
    waveform::render_waveform,
};
use crate::keyboard::Keyboard;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;
/// Terminals rarely report key releases, so notes let go on their own
const HOLD_TIME: Duration = Duration::from_millis(400);
/// Up/Down glides take this many blocks
const RAMP_BLOCKS: u32 = 16;
const VELOCITY: u8 = 100;

struct HeldNote {
    note: u8,
    release_at: Instant,
}

/// UI application state
pub struct UiApp {
    handle: EngineHandle,
    audio_rx: Consumer<f32>,
    state_rx: Consumer<EngineSnapshot>,
    snapshot: EngineSnapshot,
    info: SessionInfo,
    audio_buffer: Vec<f32>,
    keyboard: Keyboard,
    held: Vec<HeldNote>,
    selected: ParamAddress,
    /// Values the UI last asked for; the handle is one-way
    requested: GlobalParams,
    presets: Vec<FmPatch>,
    preset: usize,
    patch_name: String,
    status: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: EngineHandle,
        audio_rx: Consumer<f32>,
        state_rx: Consumer<EngineSnapshot>,
        info: SessionInfo,
        patch: FmPatch,
    ) -> Self {
        let presets = FmPatch::presets();
        let preset = presets
            .iter()
            .position(|p| p.name == patch.name)
            .unwrap_or(0);

        let mut app = Self {
            handle,
            audio_rx,
            state_rx,
            snapshot: EngineSnapshot::default(),
            info,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            keyboard: Keyboard::new(),
            held: Vec::new(),
            selected: ParamAddress::ModulationIndex,
            requested: GlobalParams::default(),
            presets,
            preset,
            patch_name: patch.name.clone(),
            status: None,
            should_quit: false,
        };
        app.mirror_patch(&patch);
        app
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_state();
            self.release_expired(Instant::now());

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        // Leave nothing ringing once the UI is gone
        let _ = self.handle.all_notes_off();
        Ok(())
    }

    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn poll_state(&mut self) {
        // Keep only the latest snapshot
        while let Ok(snapshot) = self.state_rx.pop() {
            self.snapshot = snapshot;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.held.clear();
                self.report(|handle| handle.all_notes_off());
            }
            KeyCode::Char('r') => {
                self.held.clear();
                self.requested = GlobalParams::default();
                self.patch_name = FmPatch::default().name;
                self.report(|handle| handle.reset());
            }
            KeyCode::Char('p') => self.next_preset(),
            KeyCode::Char('z') => self.keyboard.octave_down(),
            KeyCode::Char('x') => self.keyboard.octave_up(),
            KeyCode::Char(digit @ '1'..='7') => {
                let index = digit as usize - '1' as usize;
                self.selected = ParamAddress::ALL[index];
            }
            KeyCode::Up => self.nudge(1.0),
            KeyCode::Down => self.nudge(-1.0),
            KeyCode::Char(key) => {
                if let Some(note) = self.keyboard.note_for(key) {
                    self.play(note);
                }
            }
            _ => {}
        }
    }

    /// Start (or retrigger) a note and push its auto-release back.
    fn play(&mut self, note: u8) {
        let release_at = Instant::now() + HOLD_TIME;
        match self.held.iter_mut().find(|held| held.note == note) {
            Some(held) => held.release_at = release_at,
            None => self.held.push(HeldNote { note, release_at }),
        }
        self.report(|handle| handle.note_on(note, VELOCITY));
    }

    fn release_expired(&mut self, now: Instant) {
        let mut index = 0;
        while index < self.held.len() {
            if self.held[index].release_at <= now {
                let note = self.held.swap_remove(index).note;
                self.report(|handle| handle.note_off(note));
            } else {
                index += 1;
            }
        }
    }

    /// Glide the selected parameter one step up or down.
    fn nudge(&mut self, direction: f32) {
        let address = self.selected;
        let value = address.clamp(self.requested.get(address) + direction * step_size(address));
        self.requested.set(address, value);
        self.report(|handle| handle.start_ramp(address, value, RAMP_BLOCKS));
    }

    fn next_preset(&mut self) {
        self.preset = (self.preset + 1) % self.presets.len();
        let patch = self.presets[self.preset].clone();
        for address in ParamAddress::ALL {
            let value = patch.get(address);
            self.report(|handle| handle.set_parameter(address, value));
        }
        self.patch_name = patch.name.clone();
        self.mirror_patch(&patch);
    }

    fn mirror_patch(&mut self, patch: &FmPatch) {
        for address in ParamAddress::ALL {
            self.requested.set(address, address.clamp(patch.get(address)));
        }
    }

    /// Send through the handle; a full queue shows up in the help bar.
    fn report(&mut self, send: impl FnOnce(&mut EngineHandle) -> Result<(), EngineError>) {
        self.status = send(&mut self.handle).err().map(|err| err.to_string());
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // Parameters and voices
                Constraint::Min(8),    // Oscilloscope
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        render_params(
            frame,
            top[0],
            &self.requested,
            &self.snapshot,
            self.selected,
            &self.patch_name,
        );
        render_voices(frame, top[1], &self.snapshot, &self.info, self.keyboard.octave());
        render_waveform(frame, rows[1], &self.audio_buffer, self.snapshot.peak);

        let (text, color) = match &self.status {
            Some(status) => (format!(" {status}"), Color::Red),
            None => (
                " [a-k] Play  [z/x] Octave  [1-7] Select  [↑/↓] Adjust  [P] Preset  [Space] Panic  [R] Reset  [Q] Quit"
                    .to_string(),
                Color::DarkGray,
            ),
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(color)),
            rows[2],
        );
    }
}

/// How far one Up/Down press moves a parameter.
fn step_size(address: ParamAddress) -> f32 {
    match address {
        ParamAddress::CarrierMultiplier | ParamAddress::ModulatingMultiplier => 0.5,
        ParamAddress::ModulationIndex => 0.25,
        ParamAddress::AttackDuration => 0.01,
        ParamAddress::ReleaseDuration => 0.05,
        ParamAddress::DetuningOffset => 0.5,
        ParamAddress::DetuningMultiplier => 0.005,
    }
}
