pub mod macros;
pub mod structs;

pub use structs::Behaviour;
pub use structs::Direction;
pub use structs::ElevatorEvent;
pub use structs::ElevatorState;
pub use structs::FloorCall;
pub use structs::Person;
