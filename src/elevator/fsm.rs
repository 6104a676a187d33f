use crate::config::ElevatorConfig;
use crate::elevator::clock::Clock;
use crate::error::ElevatorError;
use crate::shared::structs::names;
use crate::shared::{Behaviour, Direction, ElevatorEvent, ElevatorState, FloorCall, Person};
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::time::Duration;

/**
 * Runs the single elevator car.
 *
 * The `ElevatorFSM` drains the pending-call queue one call at a time. For every call it
 * travels to the call floor, boards as many waiting people as fit, and then sweeps in
 * the call direction dropping people off until the car is empty or the building ends.
 * With nothing queued it idles, waking as soon as a call arrives.
 *
 * # Fields
 * - `call_rx`:             Consumer end of the pending-call queue.
 * - `terminate_rx`:        Stop signal, checked before every dequeue.
 * - `event_tx`:            Reports moves, pickups, drop-offs and serviced calls.
 * - `clock`:               Time source used to simulate travel.
 * - `state`:               Behaviour, current floor and occupants.
 * - `reported_behaviour`:  Last behaviour sent on `event_tx`. `None` until the first one.
 * - `max_floor`:           Highest floor served. Floor 0 is the lowest.
 * - `max_capacity`:        Occupants never exceed this.
 * - `floor_travel_time`:   Time to travel one floor.
 * - `idle_poll_time`:      How long one idle wait lasts before polling again.
 *
 */

enum Event {
    CallReceived(FloorCall),
    NoEvent,
    Terminate,
}

pub struct ElevatorFSM {
    // Queue and control channels
    call_rx: cbc::Receiver<FloorCall>,
    terminate_rx: cbc::Receiver<()>,
    event_tx: cbc::Sender<ElevatorEvent>,

    // Private fields
    clock: Box<dyn Clock>,
    state: ElevatorState,
    reported_behaviour: Option<Behaviour>,
    max_floor: u8,
    max_capacity: usize,
    floor_travel_time: Duration,
    idle_poll_time: Duration,
}

impl ElevatorFSM {
    pub fn new(
        config: &ElevatorConfig,
        clock: Box<dyn Clock>,
        call_rx: cbc::Receiver<FloorCall>,
        terminate_rx: cbc::Receiver<()>,
        event_tx: cbc::Sender<ElevatorEvent>,
    ) -> Result<ElevatorFSM, ElevatorError> {
        config.validate()?;

        Ok(ElevatorFSM {
            call_rx,
            terminate_rx,
            event_tx,
            clock,
            state: ElevatorState::new(config.start_floor),
            reported_behaviour: None,
            max_floor: config.max_floor,
            max_capacity: config.max_capacity,
            floor_travel_time: config.floor_travel_time(),
            idle_poll_time: config.idle_poll_time(),
        })
    }

    pub fn state(&self) -> &ElevatorState {
        &self.state
    }

    /// Services calls until the terminate signal is raised or every producer is gone.
    pub fn run(&mut self) {
        info!("Elevator started at floor {}", self.state.floor);

        // Main loop
        loop {
            match self.wait_for_event() {
                Event::CallReceived(call) => self.service_call(call),
                Event::NoEvent => debug!("Elevator idling at floor {}", self.state.floor),
                Event::Terminate => break,
            }
        }

        info!("Elevator stopped at floor {}", self.state.floor);
    }

    fn wait_for_event(&mut self) -> Event {
        match self.terminate_rx.try_recv() {
            Ok(()) | Err(cbc::TryRecvError::Disconnected) => return Event::Terminate,
            Err(cbc::TryRecvError::Empty) => {}
        }

        // Calls already queued are taken without idling in between
        match self.call_rx.try_recv() {
            Ok(call) => return Event::CallReceived(call),
            Err(cbc::TryRecvError::Disconnected) => return Event::Terminate,
            Err(cbc::TryRecvError::Empty) => {}
        }

        self.set_behaviour(Behaviour::Idle);

        cbc::select! {
            recv(self.call_rx) -> call => {
                match call {
                    Ok(call) => Event::CallReceived(call),
                    Err(_) => Event::Terminate,
                }
            }
            recv(self.terminate_rx) -> _ => Event::Terminate,
            default(self.idle_poll_time) => Event::NoEvent,
        }
    }

    fn service_call(&mut self, mut call: FloorCall) {
        self.set_behaviour(Behaviour::Servicing);
        info!(
            "Servicing call at floor {} going {} ({} waiting)",
            call.floor,
            call.direction,
            call.people_waiting.len()
        );

        self.move_to(call.floor);
        self.pick_up(&mut call);

        let sweep: Vec<u8> = match call.direction {
            Direction::Up => (self.state.floor..=self.max_floor).skip(1).collect(),
            Direction::Down => (0..self.state.floor).rev().collect(),
        };
        for floor in sweep {
            if self.state.occupants.is_empty() {
                break;
            }
            self.drop_off_at(floor);
        }

        if !self.state.occupants.is_empty() {
            debug!("Still aboard after call: {}", self.state.occupant_names());
        }
        if !call.people_waiting.is_empty() {
            info!("Left behind at floor {}: {}", call.floor, call.waiting_names());
        }
        debug!("{}", serde_json::to_string(&self.state).unwrap_or_default());

        let _ = self.event_tx.send(ElevatorEvent::CallServiced(call));
    }

    fn move_to(&mut self, floor: u8) {
        if floor == self.state.floor {
            debug!("Already on floor {}", floor);
            return;
        }

        info!("Elevator going to floor {}", floor);
        let distance = u32::from(floor.abs_diff(self.state.floor));
        if let Err(e) = self.clock.sleep(self.floor_travel_time * distance) {
            warn!("{} on the way to floor {}, arriving anyway", e, floor);
        }

        let from = self.state.floor;
        self.state.floor = floor;
        let _ = self.event_tx.send(ElevatorEvent::Moved {
            from,
            to: floor,
            at: self.clock.elapsed(),
        });
    }

    fn pick_up(&mut self, call: &mut FloorCall) {
        let free = self.max_capacity.saturating_sub(self.state.occupants.len());
        let boarding_count = free.min(call.people_waiting.len());
        let boarding: Vec<Person> = call.people_waiting.drain(..boarding_count).collect();
        self.state.occupants.extend(boarding.iter().cloned());

        info!("Picked up {}", names(&boarding));
        let _ = self.event_tx.send(ElevatorEvent::PickedUp {
            floor: self.state.floor,
            people: boarding,
            occupants: self.state.occupants.len(),
        });
    }

    fn drop_off_at(&mut self, floor: u8) {
        self.move_to(floor);

        let (leaving, staying): (Vec<Person>, Vec<Person>) = self
            .state
            .occupants
            .drain(..)
            .partition(|person| person.destination_floor == floor);
        self.state.occupants = staying;

        for person in leaving {
            info!("Dropping off {} at floor {}", person.name, floor);
            let _ = self.event_tx.send(ElevatorEvent::DroppedOff { floor, person });
        }
    }

    // The car starts out idle, but the first idle period is still reported
    fn set_behaviour(&mut self, behaviour: Behaviour) {
        self.state.behaviour = behaviour;
        if self.reported_behaviour == Some(behaviour) {
            return;
        }
        if behaviour == Behaviour::Idle {
            info!("Elevator idling");
        }
        self.reported_behaviour = Some(behaviour);
        let _ = self.event_tx.send(ElevatorEvent::BehaviourChanged(behaviour));
    }
}
