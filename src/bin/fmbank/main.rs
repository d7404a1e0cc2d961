//! fmbank - play the FM oscillator bank from the computer keyboard
//!
//! Run with: cargo run --bin fmbank

mod app;
mod keyboard;
mod logging;
mod ui;

use app::Session;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;

    // Open the audio device before the terminal switches to raw mode, so a
    // missing device reports as a plain error
    let session = Session::start()?;

    let terminal = ratatui::init();
    let result = session.run(terminal);
    ratatui::restore();
    result
}
