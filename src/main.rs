/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::info;
use std::thread::sleep;
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use elevator_sim::config;
use elevator_sim::shared::structs::names;
use elevator_sim::unwrap_or_exit;
use elevator_sim::{Elevator, ElevatorEvent, Person};

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("elevator_sim")
        .about("Simulates a single elevator car servicing floor calls")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .default_value("config.toml")
                .help("Configuration file"),
        )
        .arg(
            Arg::new("no-demo")
                .long("no-demo")
                .help("Do not enqueue the calls listed in the configuration"),
        )
        .arg(
            Arg::new("run-for")
                .long("run-for")
                .value_name("SECONDS")
                .takes_value(true)
                .help("Stop the elevator and exit after this many seconds"),
        )
        .get_matches();

    // Load the configuration
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let config = unwrap_or_exit!(config::load_config(config_path));

    // Create the elevator and the thread reporting what it does
    let (elevator, event_rx) = unwrap_or_exit!(Elevator::new(&config.elevator));

    let monitor_thread = Builder::new().name("elevator_monitor".into());
    let monitor_handle = unwrap_or_exit!(monitor_thread.spawn(move || monitor(event_rx)));

    // Start the elevator module
    unwrap_or_exit!(elevator.start());

    if !matches.is_present("no-demo") {
        for call in config.demo_calls() {
            unwrap_or_exit!(elevator.enqueue(call));
        }
    }

    if !matches.is_present("run-for") {
        loop {
            sleep(Duration::from_secs(1));
        }
    }

    let run_for = unwrap_or_exit!(matches.value_of_t::<u64>("run-for"));
    sleep(Duration::from_secs(run_for));

    info!("Stopping elevator");
    unwrap_or_exit!(elevator.stop());
    drop(elevator);

    if monitor_handle.join().is_err() {
        log::error!("Monitor thread panicked");
        std::process::exit(1);
    }
}

// Who has been delivered, who is still riding and who was left on a floor
#[derive(Default)]
struct Tally {
    delivered: usize,
    aboard: Vec<Person>,
    left_behind: Vec<Person>,
}

impl Tally {
    fn record(&mut self, event: ElevatorEvent) {
        match event {
            ElevatorEvent::PickedUp { people, .. } => self.aboard.extend(people),
            ElevatorEvent::DroppedOff { person, .. } => {
                self.delivered += 1;
                // Names are not unique, so only one matching rider leaves
                if let Some(index) = self.aboard.iter().position(|p| p == &person) {
                    self.aboard.remove(index);
                }
            }
            ElevatorEvent::CallServiced(call) => self.left_behind.extend(call.people_waiting),
            ElevatorEvent::Moved { to, at, .. } => {
                log::debug!("Arrived at floor {} after {:.1}s", to, at.as_secs_f64())
            }
            ElevatorEvent::BehaviourChanged(behaviour) => {
                log::debug!("Behaviour: {:?}", behaviour)
            }
        }
    }
}

// Tallies events until the engine goes away, then reports who never arrived
fn monitor(event_rx: cbc::Receiver<ElevatorEvent>) {
    let mut tally = Tally::default();
    for event in event_rx.iter() {
        tally.record(event);
    }

    info!("Delivered {} people", tally.delivered);
    if !tally.aboard.is_empty() {
        info!("Still aboard: {}", names(&tally.aboard));
    }
    if !tally.left_behind.is_empty() {
        info!("Left behind: {}", names(&tally.left_behind));
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
