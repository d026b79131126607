//! # Echo console example
//!
//! A keyboard controller reads one line per tick and echoes it back;
//! typing `quit` (or closing stdin) stops the application loop.
//!
//! ## Run
//! ```bash
//! RUST_LOG=evbus=debug cargo run --example echo --features logging
//! ```

use std::cell::Cell;
use std::io::{self, BufRead, Write};

use evbus::{listener_table, Attached, EventManager, LogWriter, Quit, Tick};
use tracing_subscriber::EnvFilter;

/// Controller responsible for keyboard input.
struct KeyboardController {
    events: EventManager,
}

impl KeyboardController {
    fn on_tick(&self, _: &Tick) -> io::Result<()> {
        print!("Say something or enter quit: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return self.quit("stdin closed");
        }

        match line.trim().to_lowercase().as_str() {
            "quit" => self.quit("user"),
            _ => {
                println!("{}", line.trim_end());
                Ok(())
            }
        }
    }

    fn quit(&self, reason: &str) -> io::Result<()> {
        self.events
            .send(Quit::new().with_reason(reason))
            .map_err(io::Error::other)
    }
}

listener_table! {
    KeyboardController {
        Tick => on_tick,
    }
}

/// The application itself.
struct EchoApplication {
    running: Cell<bool>,
}

impl EchoApplication {
    fn on_quit(&self, _: &Quit) {
        self.running.set(false);
    }
}

listener_table! {
    EchoApplication {
        Quit => on_quit,
    }
}

fn run(events: &EventManager, app: &Attached<EchoApplication>) -> Result<(), evbus::DispatchError> {
    let mut frame = 0;
    app.running.set(true);
    while app.running.get() {
        frame += 1;
        events.send(Tick::new(frame))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let events = EventManager::default();
    let _log = events.attach(LogWriter::new())?;
    let app = events.attach(EchoApplication {
        running: Cell::new(false),
    })?;
    let _controller = events.attach(KeyboardController {
        events: events.clone(),
    })?;

    run(&events, &app)?;
    Ok(())
}
