/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::info;
use std::sync::{Mutex, PoisonError};
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::elevator::clock::{Clock, ThreadClock};
use crate::elevator::fsm::ElevatorFSM;
use crate::error::ElevatorError;
use crate::shared::{ElevatorEvent, FloorCall};

/***************************************/
/*             Public API              */
/***************************************/
/**
 * Producer handle for the pending-call queue.
 *
 * Clones can be handed to any number of threads. Calls are checked against the
 * building before they are queued, so the engine never sees an unreachable floor.
 */
#[derive(Clone)]
pub struct CallSender {
    call_tx: cbc::Sender<FloorCall>,
    max_floor: u8,
}

impl CallSender {
    pub fn enqueue(&self, call: FloorCall) -> Result<(), ElevatorError> {
        self.check_floor(call.floor)?;
        for person in call.people_waiting.iter() {
            self.check_floor(person.destination_floor)?;
        }

        info!("Elevator called to floor {}", call.floor);
        self.call_tx.send(call).map_err(|_| ElevatorError::Stopped)
    }

    fn check_floor(&self, floor: u8) -> Result<(), ElevatorError> {
        if floor > self.max_floor {
            return Err(ElevatorError::InvalidFloor {
                floor,
                max_floor: self.max_floor,
            });
        }
        Ok(())
    }
}

/**
 * # Elevator
 * Owns the engine until it is started, then the thread it runs on.
 *
 * `start` moves the engine onto a thread named `elevator_fsm` and may only succeed
 * once. `stop` raises the terminate signal and joins; the engine finishes the call
 * it is servicing first.
 */
pub struct Elevator {
    calls: CallSender,
    terminate_tx: cbc::Sender<()>,
    fsm: Mutex<Option<ElevatorFSM>>,
    fsm_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Elevator {
    pub fn new(
        config: &ElevatorConfig,
    ) -> Result<(Elevator, cbc::Receiver<ElevatorEvent>), ElevatorError> {
        Elevator::with_clock(config, Box::new(ThreadClock::new()))
    }

    pub fn with_clock(
        config: &ElevatorConfig,
        clock: Box<dyn Clock>,
    ) -> Result<(Elevator, cbc::Receiver<ElevatorEvent>), ElevatorError> {
        let (call_tx, call_rx) = cbc::unbounded::<FloorCall>();
        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
        let (event_tx, event_rx) = cbc::unbounded::<ElevatorEvent>();

        let fsm = ElevatorFSM::new(config, clock, call_rx, terminate_rx, event_tx)?;

        let elevator = Elevator {
            calls: CallSender {
                call_tx,
                max_floor: config.max_floor,
            },
            terminate_tx,
            fsm: Mutex::new(Some(fsm)),
            fsm_thread: Mutex::new(None),
        };
        Ok((elevator, event_rx))
    }

    /// Holds both locks until the thread handle is stored. The engine leaves `fsm`
    /// only after the thread has been spawned.
    pub fn start(&self) -> Result<(), ElevatorError> {
        let mut fsm = self.fsm.lock().unwrap_or_else(PoisonError::into_inner);
        let mut fsm_thread = self.fsm_thread.lock().unwrap_or_else(PoisonError::into_inner);
        if fsm.is_none() {
            return Err(ElevatorError::AlreadyStarted);
        }

        let (handoff_tx, handoff_rx) = cbc::bounded::<ElevatorFSM>(1);
        let handle = Builder::new().name("elevator_fsm".into()).spawn(move || {
            if let Ok(mut fsm) = handoff_rx.recv() {
                fsm.run();
            }
        })?;

        if let Some(engine) = fsm.take() {
            handoff_tx
                .send(engine)
                .map_err(|_| ElevatorError::EnginePanicked)?;
        }
        *fsm_thread = Some(handle);
        Ok(())
    }

    pub fn enqueue(&self, call: FloorCall) -> Result<(), ElevatorError> {
        self.calls.enqueue(call)
    }

    pub fn sender(&self) -> CallSender {
        self.calls.clone()
    }

    pub fn stop(&self) -> Result<(), ElevatorError> {
        let fsm_thread = self
            .fsm_thread
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match fsm_thread {
            Some(fsm_thread) => {
                let _ = self.terminate_tx.send(());
                fsm_thread.join().map_err(|_| ElevatorError::EnginePanicked)
            }
            None => Ok(()),
        }
    }
}
