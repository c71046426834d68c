//! Poll whatever controllers are plugged in and print the host inputs they map to.
//!
//! ```text
//! cargo run --example poll --features hid -- [config.toml]
//! ```
//! Set `RUST_LOG=joyframe=debug` to see every raw event as well.

use std::thread;
use std::time::Duration;

use joyframe::backends::discover;
use joyframe::{Config, EventBus, EventFilter, EventSink, HostBinding, Logger};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).expect("load config"),
        None => Config::default(),
    };

    let mut set = discover(&config);
    println!("Attached {} controller(s)", set.len());
    for slot in 0..joyframe::MAX_CONTROLLERS {
        let info = set.controller_info(slot);
        if !info.is_empty() {
            println!("  jack {slot}: {info}");
        }
    }

    let mut bus = EventBus::new();
    bus.add_listener(Logger::new("poll"), EventFilter::All);

    let mut binding = HostBinding::new(&config.calibration);
    binding.sync(&set);
    let frame = Duration::from_millis(16);

    loop {
        for ev in set.poll_all() {
            bus.on_event(&ev.event);
            for input in binding.translate(&ev) {
                println!("{input:?}");
            }
        }
        thread::sleep(frame);
    }
}
