//! # Periodic ticker example
//!
//! Drives the event loop with a fixed-rate [`Tick`] from `tokio::time::interval`
//! on a current-thread runtime. Work reported between ticks is queued and
//! delivered by the next tick's drain; the loop stops on [`Quit`].
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example ticker
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use evbus::{listener_table, Event, EventManager, Quit, Tick};
use tracing_subscriber::EnvFilter;

/// A unit of simulated work finishing between two ticks.
#[derive(Debug)]
struct JobDone {
    id: u32,
}

impl Event for JobDone {}

/// Counts completed jobs and asks to stop once enough are done.
struct Scheduler {
    events: EventManager,
    done: Cell<u32>,
    target: u32,
}

impl Scheduler {
    fn on_job_done(&self, job: &JobDone) -> Result<(), evbus::DispatchError> {
        self.done.set(self.done.get() + 1);
        tracing::info!(job = job.id, done = self.done.get(), "job completed");
        if self.done.get() == self.target {
            self.events.queue(Quit::new().with_reason("all jobs done"))?;
        }
        Ok(())
    }

    fn on_tick(&self, tick: &Tick) {
        tracing::debug!(frame = tick.frame, done = self.done.get(), "tick");
    }
}

listener_table! {
    Scheduler {
        Tick => on_tick,
        JobDone => on_job_done,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let events = EventManager::default();
    let running = Rc::new(Cell::new(true));

    let r = Rc::clone(&running);
    events.subscribe(move |quit: &Quit| {
        tracing::info!(reason = ?quit.reason, "quit requested");
        r.set(false);
    });
    let scheduler = events.attach(Scheduler {
        events: events.clone(),
        done: Cell::new(0),
        target: 5,
    })?;

    let mut interval = tokio::time::interval(Duration::from_millis(100));
    let mut frame = 0;
    while running.get() {
        interval.tick().await;
        frame += 1;
        if frame % 2 == 0 {
            events.queue(JobDone { id: frame as u32 })?;
        }
        events.send(Tick::new(frame))?;
    }

    println!("finished after {frame} ticks, {} jobs", scheduler.done.get());
    Ok(())
}
