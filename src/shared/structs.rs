/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "servicing")]
    Servicing,
}

/// Someone waiting for, or riding in, the car.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    #[serde(rename = "currentFloor")]
    pub current_floor: u8,
    #[serde(rename = "destinationFloor")]
    pub destination_floor: u8,
}

impl Person {
    pub fn new(name: impl Into<String>, current_floor: u8, destination_floor: u8) -> Person {
        Person {
            name: name.into(),
            current_floor,
            destination_floor,
        }
    }
}

/**
 * A request for service at one floor.
 *
 * People board from the front of `people_waiting`. Whoever does not fit in the car
 * stays in the list, and the engine hands the call back once it has been serviced.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FloorCall {
    #[serde(rename = "peopleWaiting")]
    pub people_waiting: Vec<Person>,
    pub floor: u8,
    pub direction: Direction,
}

impl FloorCall {
    pub fn new(people_waiting: Vec<Person>, floor: u8, direction: Direction) -> FloorCall {
        FloorCall {
            people_waiting,
            floor,
            direction,
        }
    }

    pub fn people_waiting(&self) -> &[Person] {
        &self.people_waiting
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn waiting_names(&self) -> String {
        names(&self.people_waiting)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorState {
    pub behaviour: Behaviour,
    pub floor: u8,
    pub occupants: Vec<Person>,
}

impl ElevatorState {
    pub fn new(floor: u8) -> ElevatorState {
        ElevatorState {
            behaviour: Behaviour::Idle,
            floor,
            occupants: Vec::new(),
        }
    }

    pub fn occupant_names(&self) -> String {
        names(&self.occupants)
    }
}

/// Everything the engine reports while it runs. Nothing in the engine depends on
/// anyone listening.
#[derive(Debug, Clone, PartialEq)]
pub enum ElevatorEvent {
    BehaviourChanged(Behaviour),
    Moved {
        from: u8,
        to: u8,
        at: std::time::Duration,
    },
    PickedUp {
        floor: u8,
        people: Vec<Person>,
        occupants: usize,
    },
    DroppedOff {
        floor: u8,
        person: Person,
    },
    CallServiced(FloorCall),
}

/***************************************/
/*              Helpers                */
/***************************************/
pub fn names(people: &[Person]) -> String {
    people
        .iter()
        .map(|person| person.name.as_str())
        .collect::<Vec<&str>>()
        .join(",")
}

/***************************************/
/*             Unit tests              */
/***************************************/
