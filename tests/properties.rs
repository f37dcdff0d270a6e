//! Property-based tests for the engine.
//!
//! These use proptest to check the stepping invariants and the library
//! machines against reference predicates over random inputs.

use proptest::prelude::*;
use turing_engine::library;
use turing_engine::{Configuration, Outcome, Status, TuringMachine, MACHINES};

const STEP_LIMIT: usize = 10_000;

/// Steps until a terminal status, returning every configuration along the way.
fn trajectory(machine: &mut TuringMachine) -> (Status, Vec<Configuration>) {
    let mut configurations = vec![machine.snapshot()];

    for _ in 0..STEP_LIMIT {
        let status = machine.step();
        configurations.push(machine.snapshot());
        if status.is_terminal() {
            return (status, configurations);
        }
    }

    panic!("machine did not halt within {STEP_LIMIT} steps");
}

fn outcome(mut machine: TuringMachine, input: &str) -> Outcome {
    machine.load(input);
    trajectory(&mut machine);
    machine.outcome().unwrap_or(Outcome::Undetermined)
}

fn is_an_bn(input: &str) -> bool {
    let n = input.len() / 2;
    n >= 1 && input.len() == 2 * n && input == format!("{}{}", "a".repeat(n), "b".repeat(n))
}

fn verdict(accepted: bool) -> Outcome {
    if accepted {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    }
}

prop_compose! {
    fn machine_and_input()(index in 0..MACHINES.len(), input in "[ab01c]{0,10}") -> (usize, String) {
        (index, input)
    }
}

proptest! {
    #[test]
    fn halted_machine_is_frozen((index, input) in machine_and_input(), extra in 1..5usize) {
        let mut machine = MACHINES[index].build().unwrap();
        machine.load(&input);
        let (status, _) = trajectory(&mut machine);
        prop_assert!(matches!(status, Status::Accept | Status::Reject));

        let frozen = machine.snapshot();
        for _ in 0..extra {
            prop_assert_eq!(machine.step(), Status::Halt);
            prop_assert_eq!(machine.snapshot(), frozen.clone());
        }
    }

    #[test]
    fn tape_grows_by_at_most_one_cell((index, input) in machine_and_input()) {
        let mut machine = MACHINES[index].build().unwrap();
        machine.load(&input);
        let (_, configurations) = trajectory(&mut machine);

        for pair in configurations.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            let old: Vec<char> = before.tape.chars().collect();
            let new: Vec<char> = after.tape.chars().collect();

            prop_assert!(after.head < new.len());
            prop_assert!(new.len() == old.len() || new.len() == old.len() + 1);

            // A left move off cell 0 prepends; any other growth appends.
            let prepended = new.len() > old.len() && after.head == 0;
            let kept = if prepended { &new[1..] } else { &new[..old.len()] };

            let changed: Vec<usize> = (0..old.len()).filter(|&i| old[i] != kept[i]).collect();
            prop_assert!(changed.is_empty() || changed == vec![before.head]);
        }
    }

    #[test]
    fn reset_reproduces_fresh_trajectory((index, input) in machine_and_input(), warmup in "[ab01]{0,6}") {
        let mut fresh = MACHINES[index].build().unwrap();
        fresh.load(&input);
        let expected = trajectory(&mut fresh);

        let mut reused = MACHINES[index].build().unwrap();
        reused.load(&warmup);
        for _ in 0..7 {
            reused.step();
        }
        reused.load(&input);
        let actual = trajectory(&mut reused);

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn ends_with_abb_matches_suffix(input in "[ab]{0,12}") {
        let machine = library::ends_with_abb().unwrap();
        prop_assert_eq!(outcome(machine, &input), verdict(input.ends_with("abb")));
    }

    #[test]
    fn even_ones_matches_parity(input in "[01]{0,16}") {
        let machine = library::even_ones().unwrap();
        let ones = input.chars().filter(|&c| c == '1').count();
        prop_assert_eq!(outcome(machine, &input), verdict(ones % 2 == 0));
    }

    #[test]
    fn an_bn_matches_language(input in "[ab]{0,12}") {
        let machine = library::an_bn().unwrap();
        prop_assert_eq!(outcome(machine, &input), verdict(is_an_bn(&input)));
    }

    #[test]
    fn an_bn_accepts_balanced(n in 1..8usize) {
        let input = format!("{}{}", "a".repeat(n), "b".repeat(n));
        let machine = library::an_bn().unwrap();
        prop_assert_eq!(outcome(machine, &input), Outcome::Accepted);
    }

    #[test]
    fn undefined_symbol_stops_scan(prefix in "[01]{0,8}", suffix in "[01]{0,8}") {
        let mut machine = library::even_ones().unwrap();
        machine.load(&format!("{prefix}c{suffix}"));

        let (status, _) = trajectory(&mut machine);

        prop_assert_eq!(status, Status::Reject);
        prop_assert_eq!(machine.step_count(), prefix.len());
        prop_assert_eq!(machine.head(), prefix.len());
        prop_assert_eq!(machine.symbol(), 'c');
    }
}
