/*
 * Unit tests for the elevator engine
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * The engine runs on the test thread with a simulated clock. Calls are queued, the
 * sender is dropped, and `run` returns once the queue is drained, so every test is
 * deterministic.
 *
 * Tests:
 * - test_fsm_init
 * - test_fsm_pickup_and_drop_off_going_up
 * - test_fsm_capacity_leaves_people_behind
 * - test_fsm_wrong_direction_stays_aboard
 * - test_fsm_wrong_direction_stays_aboard_going_down
 * - test_fsm_stuck_passenger_leaves_on_later_call
 * - test_fsm_calls_serviced_in_order
 * - test_fsm_capacity_never_exceeded
 * - test_fsm_interrupted_travel_still_arrives
 * - test_fsm_call_at_current_floor
 * - test_fsm_terminate_before_queued_calls
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use crate::config::ElevatorConfig;
    use crate::elevator::{Clock, ElevatorFSM, SimulatedClock};
    use crate::shared::Direction::{Down, Up};
    use crate::shared::{Behaviour, ElevatorEvent, FloorCall, Person};
    use crossbeam_channel::{unbounded, Receiver, Sender};
    use std::time::Duration;

    fn config(start_floor: u8, max_floor: u8, max_capacity: usize) -> ElevatorConfig {
        ElevatorConfig {
            start_floor,
            max_floor,
            max_capacity,
            floor_travel_time: 1000,
            idle_poll_time: 10,
        }
    }

    fn setup_fsm(
        config: &ElevatorConfig,
    ) -> (
        ElevatorFSM,
        SimulatedClock,
        Sender<FloorCall>,
        Sender<()>,
        Receiver<ElevatorEvent>,
    ) {
        // Arrange mock channels
        let (call_tx, call_rx) = unbounded::<FloorCall>();
        let (terminate_tx, terminate_rx) = unbounded::<()>();
        let (event_tx, event_rx) = unbounded::<ElevatorEvent>();
        let clock = SimulatedClock::new();

        let fsm = ElevatorFSM::new(config, Box::new(clock.clone()), call_rx, terminate_rx, event_tx)
            .unwrap();

        (fsm, clock, call_tx, terminate_tx, event_rx)
    }

    // Queues the calls, closes the queue and runs the engine until it is drained
    fn run_calls(fsm: &mut ElevatorFSM, call_tx: Sender<FloorCall>, calls: Vec<FloorCall>) {
        for call in calls {
            call_tx.send(call).unwrap();
        }
        drop(call_tx);
        fsm.run();
    }

    fn moves(events: &[ElevatorEvent]) -> Vec<(u8, u8)> {
        events
            .iter()
            .filter_map(|event| match event {
                ElevatorEvent::Moved { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    fn drop_offs(events: &[ElevatorEvent]) -> Vec<(String, u8)> {
        events
            .iter()
            .filter_map(|event| match event {
                ElevatorEvent::DroppedOff { floor, person } => Some((person.name.clone(), *floor)),
                _ => None,
            })
            .collect()
    }

    fn serviced(events: &[ElevatorEvent]) -> Vec<FloorCall> {
        events
            .iter()
            .filter_map(|event| match event {
                ElevatorEvent::CallServiced(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    fn names(people: &[Person]) -> Vec<&str> {
        people.iter().map(|person| person.name.as_str()).collect()
    }

    #[test]
    fn test_fsm_init() {
        // Purpose: Verify that the FSM is in the expected initial state after creation

        // Arrange & Act
        let (fsm, _clock, _call_tx, _terminate_tx, event_rx) = setup_fsm(&config(3, 10, 5));

        // Assert
        assert_eq!(fsm.state().floor, 3);
        assert_eq!(fsm.state().behaviour, Behaviour::Idle);
        assert!(fsm.state().occupants.is_empty());
        assert!(event_rx.try_recv().is_err());
    }

    #[test]
    fn test_fsm_pickup_and_drop_off_going_up() {
        // Purpose: Verify travel, boarding in order and drop-offs on the way up for one call

        // Arrange
        let (mut fsm, clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(3, 10, 5));
        let call = FloorCall::new(
            vec![Person::new("Jim", 1, 7), Person::new("Mark", 1, 5)],
            1,
            Up,
        );

        // Act
        run_calls(&mut fsm, call_tx, vec![call]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        assert_eq!(events[0], ElevatorEvent::BehaviourChanged(Behaviour::Servicing));
        assert_eq!(
            moves(&events),
            vec![(3, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7)]
        );
        assert!(events.contains(&ElevatorEvent::PickedUp {
            floor: 1,
            people: vec![Person::new("Jim", 1, 7), Person::new("Mark", 1, 5)],
            occupants: 2,
        }));
        assert_eq!(
            drop_offs(&events),
            vec![("Mark".to_string(), 5), ("Jim".to_string(), 7)]
        );
        assert!(serviced(&events)[0].people_waiting.is_empty());

        assert_eq!(fsm.state().floor, 7);
        assert!(fsm.state().occupants.is_empty());
        // Two floors down to the call, six floors up to Jim
        assert_eq!(clock.elapsed(), Duration::from_secs(8));
    }

    #[test]
    fn test_fsm_capacity_leaves_people_behind() {
        // Purpose: Verify that people beyond capacity stay on the call's waiting list

        // Arrange
        let (mut fsm, _clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(3, 10, 1));
        let call = FloorCall::new(vec![Person::new("A", 2, 0), Person::new("B", 2, 0)], 2, Down);

        // Act
        run_calls(&mut fsm, call_tx, vec![call]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        assert_eq!(moves(&events), vec![(3, 2), (2, 1), (1, 0)]);
        assert_eq!(drop_offs(&events), vec![("A".to_string(), 0)]);

        let serviced = serviced(&events);
        assert_eq!(serviced.len(), 1);
        assert_eq!(names(&serviced[0].people_waiting), vec!["B"]);
        assert!(fsm.state().occupants.is_empty());
    }

    #[test]
    fn test_fsm_wrong_direction_stays_aboard() {
        // Purpose: Verify that someone heading down on an up call rides to the top and stays aboard

        // Arrange
        let (mut fsm, _clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(4, 10, 5));
        let call = FloorCall::new(vec![Person::new("C", 4, 2), Person::new("D", 4, 6)], 4, Up);

        // Act
        run_calls(&mut fsm, call_tx, vec![call]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        assert_eq!(drop_offs(&events), vec![("D".to_string(), 6)]);
        assert_eq!(moves(&events).last(), Some(&(9, 10)));
        assert_eq!(fsm.state().floor, 10);
        assert_eq!(names(&fsm.state().occupants), vec!["C"]);
    }

    #[test]
    fn test_fsm_wrong_direction_stays_aboard_going_down() {
        // Purpose: Verify that someone heading up on a down call rides to floor 0 and stays aboard

        // Arrange
        let (mut fsm, _clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(5, 10, 5));
        let call = FloorCall::new(vec![Person::new("U", 5, 8), Person::new("L", 5, 2)], 5, Down);

        // Act
        run_calls(&mut fsm, call_tx, vec![call]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        assert_eq!(moves(&events), vec![(5, 4), (4, 3), (3, 2), (2, 1), (1, 0)]);
        assert_eq!(drop_offs(&events), vec![("L".to_string(), 2)]);
        assert_eq!(fsm.state().floor, 0);
        assert_eq!(names(&fsm.state().occupants), vec!["U"]);
    }

    #[test]
    fn test_fsm_stuck_passenger_leaves_on_later_call() {
        // Purpose: Verify that a passenger left aboard gets off when a later call sweeps past

        // Arrange
        let (mut fsm, _clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(4, 10, 5));
        let first = FloorCall::new(vec![Person::new("C", 4, 2)], 4, Up);
        let second = FloorCall::new(vec![], 10, Down);

        // Act
        run_calls(&mut fsm, call_tx, vec![first, second]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        assert_eq!(drop_offs(&events), vec![("C".to_string(), 2)]);
        assert_eq!(fsm.state().floor, 2);
        assert!(fsm.state().occupants.is_empty());
    }

    #[test]
    fn test_fsm_calls_serviced_in_order() {
        // Purpose: Verify that calls are serviced in arrival order, not by distance

        // Arrange
        let (mut fsm, _clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(3, 10, 5));
        let calls = vec![
            FloorCall::new(vec![], 8, Up),
            FloorCall::new(vec![], 2, Down),
            FloorCall::new(vec![], 5, Up),
        ];

        // Act
        run_calls(&mut fsm, call_tx, calls);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        let timestamps: Vec<(u8, Duration)> = events
            .iter()
            .filter_map(|event| match event {
                ElevatorEvent::Moved { to, at, .. } => Some((*to, *at)),
                _ => None,
            })
            .collect();
        assert_eq!(
            timestamps,
            vec![
                (8, Duration::from_secs(5)),
                (2, Duration::from_secs(11)),
                (5, Duration::from_secs(14)),
            ]
        );
        let floors: Vec<u8> = serviced(&events).iter().map(|call| call.floor).collect();
        assert_eq!(floors, vec![8, 2, 5]);
    }

    #[test]
    fn test_fsm_capacity_never_exceeded() {
        // Purpose: Verify that a full car boards nobody, and occupancy never goes above capacity

        // Arrange
        let (mut fsm, _clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(0, 10, 2));
        let first = FloorCall::new(
            vec![Person::new("A", 5, 1), Person::new("B", 5, 1), Person::new("C", 5, 1)],
            5,
            Up,
        );
        let second = FloorCall::new(vec![Person::new("D", 10, 0)], 10, Down);

        // Act
        run_calls(&mut fsm, call_tx, vec![first, second]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        for event in events.iter() {
            if let ElevatorEvent::PickedUp { occupants, .. } = event {
                assert!(*occupants <= 2);
            }
        }

        let serviced = serviced(&events);
        assert_eq!(names(&serviced[0].people_waiting), vec!["C"]);
        assert_eq!(names(&serviced[1].people_waiting), vec!["D"]);
        assert_eq!(
            drop_offs(&events),
            vec![("A".to_string(), 1), ("B".to_string(), 1)]
        );
        assert_eq!(fsm.state().floor, 1);
    }

    #[test]
    fn test_fsm_interrupted_travel_still_arrives() {
        // Purpose: Verify that an interrupted trip is logged and the floor is still updated

        // Arrange
        let (mut fsm, clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(3, 10, 5));
        clock.interrupt_next(1);

        // Act
        run_calls(&mut fsm, call_tx, vec![FloorCall::new(vec![], 0, Down)]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        assert_eq!(moves(&events), vec![(3, 0)]);
        assert_eq!(fsm.state().floor, 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_fsm_call_at_current_floor() {
        // Purpose: Verify that a call at the current floor boards without moving first

        // Arrange
        let (mut fsm, clock, call_tx, _terminate_tx, event_rx) = setup_fsm(&config(3, 10, 5));
        let call = FloorCall::new(vec![Person::new("E", 3, 4)], 3, Up);

        // Act
        run_calls(&mut fsm, call_tx, vec![call]);
        let events: Vec<ElevatorEvent> = event_rx.try_iter().collect();

        // Assert
        assert_eq!(moves(&events), vec![(3, 4)]);
        assert_eq!(drop_offs(&events), vec![("E".to_string(), 4)]);
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_fsm_terminate_before_queued_calls() {
        // Purpose: Verify that a raised stop signal ends the loop before the next call is taken

        // Arrange
        let (mut fsm, _clock, call_tx, terminate_tx, event_rx) = setup_fsm(&config(3, 10, 5));
        terminate_tx.send(()).unwrap();
        call_tx.send(FloorCall::new(vec![], 8, Up)).unwrap();

        // Act
        fsm.run();

        // Assert
        assert!(event_rx.try_recv().is_err());
        assert_eq!(fsm.state().floor, 3);
    }
}
