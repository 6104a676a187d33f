pub mod clock;
pub mod controller;
pub mod fsm;
pub mod fsm_tests;

pub use clock::{Clock, SimulatedClock, ThreadClock};
pub use controller::{CallSender, Elevator};
pub use fsm::ElevatorFSM;
