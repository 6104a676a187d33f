pub mod config;
pub mod elevator;
pub mod error;
pub mod shared;

pub use elevator::{Elevator, ElevatorFSM};
pub use error::{ConfigError, ElevatorError};
pub use shared::{Behaviour, Direction, ElevatorEvent, ElevatorState, FloorCall, Person};
