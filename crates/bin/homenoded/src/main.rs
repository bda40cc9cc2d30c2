//! # homenoded — home automation node daemon
//!
//! Composition root that wires the automation nodes together and starts the
//! management server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Construct the simulated pin backend shared by all nodes
//! - Register each node's settings schema in a config channel
//! - Spawn one scheduler task per node
//! - Serve the management HTTP API over the channels
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod management;
mod reporter;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use homenode_adapter_gpio_sim::SimBoard;
use homenode_adapter_telemetry_http::HttpTelemetrySink;
use homenode_app::config_channel::ConfigChannel;
use homenode_app::nodes::door_light::{self, DoorLightNode, DoorLightPins};
use homenode_app::nodes::morning::{self, MorningPins, MorningRoutineNode};
use homenode_app::nodes::thermostat::{self, ThermostatNode};
use homenode_app::scheduler::{Scheduler, SystemClock};
use homenode_app::telemetry_forwarder::TelemetryForwarder;
use homenode_domain::climate::{RoomClimate, RoomPins};
use homenode_domain::light::LightLatch;
use homenode_domain::morning::MorningRoutine;
use homenode_domain::pin::{AnalogPin, Pin};
use homenode_domain::time::HourWindow;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::management::ManagementState;
use crate::reporter::TracingStateReporter;

const THERMOSTAT_ROOMS: [(&str, RoomPins, f64, f64); 2] = [
    (
        "Living room",
        RoomPins {
            heating: Pin(0),
            cooling: Pin(1),
            display: Pin(2),
            sensor: AnalogPin(0),
        },
        18.0,
        25.0,
    ),
    (
        "Bedroom",
        RoomPins {
            heating: Pin(3),
            cooling: Pin(4),
            display: Pin(5),
            sensor: AnalogPin(1),
        },
        21.0,
        28.0,
    ),
];

const DOOR_LIGHT_PINS: DoorLightPins = DoorLightPins {
    light: Pin(6),
    motion: Pin(7),
    door: Pin(8),
};

const MORNING_PINS: MorningPins = MorningPins {
    coffee: Pin(9),
    light: Pin(10),
    heating: Pin(11),
    sensor: AnalogPin(2),
};

/// Seed the simulated sensors so the first polls read plausible values.
fn seed_board(board: &SimBoard) {
    for (_, pins, _, _) in &THERMOSTAT_ROOMS {
        board.set_celsius(pins.sensor, 21.0);
    }
    board.set_celsius(MORNING_PINS.sensor, 19.0);
    board.set_custom(DOOR_LIGHT_PINS.door, "0");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let board = SimBoard::new();
    seed_board(&board);

    let period = Duration::from_secs(config.schedule.period_secs);
    let mut channels = BTreeMap::new();

    // Thermostat
    let rooms: Vec<RoomClimate> = THERMOSTAT_ROOMS
        .iter()
        .map(|(name, pins, t_min, t_max)| RoomClimate::new(*name, *pins, *t_min, *t_max))
        .collect();
    let thermostat_channel = Arc::new(ConfigChannel::new(thermostat::settings(&rooms)));
    channels.insert("thermostat".to_string(), Arc::clone(&thermostat_channel));
    let forwarder = if config.telemetry.enabled {
        let sink = HttpTelemetrySink::new(reqwest::Client::new(), &config.telemetry.url);
        Some(TelemetryForwarder::new(sink, config.telemetry.batch_size))
    } else {
        None
    };
    let thermostat = ThermostatNode::new(
        board.clone(),
        TracingStateReporter::new("thermostat"),
        thermostat_channel,
        rooms,
        forwarder,
    );
    tokio::spawn(Scheduler::new(SystemClock, period).run(thermostat));

    // Door light
    let scheduler = Scheduler::new(SystemClock, period);
    let latch = LightLatch::new(HourWindow::new(20, 8), 15);
    let door_light_channel = Arc::new(ConfigChannel::new(door_light::settings(&latch)));
    channels.insert("door-light".to_string(), Arc::clone(&door_light_channel));
    let door_light = DoorLightNode::new(
        board.clone(),
        TracingStateReporter::new("door-light"),
        door_light_channel,
        DOOR_LIGHT_PINS,
        latch,
        scheduler.tick_secs(),
    );
    tokio::spawn(scheduler.run(door_light));

    // Morning routine
    let scheduler = Scheduler::new(SystemClock, period);
    let routine = MorningRoutine::new(7, 21.0, 10);
    let morning_channel = Arc::new(ConfigChannel::new(morning::settings(&routine)));
    channels.insert("morning-routine".to_string(), Arc::clone(&morning_channel));
    let morning = MorningRoutineNode::new(
        board.clone(),
        TracingStateReporter::new("morning-routine"),
        morning_channel,
        MORNING_PINS,
        routine,
        scheduler.tick_secs(),
    );
    tokio::spawn(scheduler.run(morning));

    // Management HTTP
    let app = management::router(ManagementState::new(channels));
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "management server listening");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
