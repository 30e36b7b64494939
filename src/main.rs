use clap::Parser;
use defrag_bar::{app, ui};
use std::io::Result;

fn main() -> Result<()> {
    let args = app::Args::parse();

    // Setup terminal
    let mut tui = ui::TuiWrapper::new()?;

    // Setup Ctrl+C handler
    let (tx, rx) = std::sync::mpsc::channel();
    ctrlc::set_handler(move || {
        tx.send(()).expect("Could not send signal on channel.");
    })
    .expect("Error setting Ctrl-C handler");

    let mut app = app::App::new(&args);
    app.run(&mut tui, rx)?;

    // Restore terminal
    tui.cleanup()?;
    Ok(())
}
