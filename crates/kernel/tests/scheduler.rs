use std::num::NonZeroU8;

use compiler::{assemble, ImageBuilder};
use kernel::Runtime;
use loader::{LoadError, ReadStream};
use types::TaskId;
use vm::Status;

fn image(source: &str, error_displacement: u64) -> Vec<u8> {
    let code = assemble(source).expect("test program assembles");
    ImageBuilder::new(code)
        .error_displacement(error_displacement)
        .build()
        .expect("test image is valid")
}

fn launch(rt: &mut Runtime, source: &str, error_displacement: u64) -> TaskId {
    let bytes = image(source, error_displacement);
    rt.launch(&mut ReadStream::new(bytes.as_slice()))
        .expect("launch succeeds")
}

fn priority(n: u8) -> NonZeroU8 {
    NonZeroU8::new(n).unwrap()
}

#[test]
fn priority_bounds_the_steps_per_pass() {
    let mut rt = Runtime::new();
    let source = "PUSH 1\nPOP\n".repeat(5) + "HLT";
    let id = launch(&mut rt, &source, 0);
    assert!(rt.set_priority(id, priority(3)));

    let report = rt.run_pass();
    assert_eq!(report.stepped, 3);
    assert!(report.reaped.is_empty());

    let vm = rt.task(id).unwrap();
    assert_eq!(vm.stats().steps, 3);
    assert_eq!(vm.current(), vm.start() + 9 + 1 + 9);
    assert_eq!(vm.stack().as_slice(), &[1]);
}

#[test]
fn halted_task_is_reaped_after_one_pass() {
    let mut rt = Runtime::new();
    let id = launch(&mut rt, "HLT", 0);
    assert_eq!(rt.task_count(), 1);

    let report = rt.run_pass();
    assert_eq!(report.reaped, vec![id]);
    assert_eq!(rt.task_count(), 0);
    assert!(rt.task(id).is_none());
}

#[test]
fn halt_ends_the_slice_early() {
    let mut rt = Runtime::new();
    let id = launch(&mut rt, "PUSH 2\nHLT\nPUSH 3", 0);
    rt.set_priority(id, priority(10));

    let report = rt.run_pass();
    assert_eq!(report.stepped, 2);
    assert_eq!(report.reaped, vec![id]);
}

#[test]
fn yield_goes_idle_until_resumed() {
    let mut rt = Runtime::new();
    let id = launch(&mut rt, "BRK\nPUSH 7\nHLT", 0);
    rt.set_priority(id, priority(5));

    let report = rt.run_pass();
    assert_eq!(report.stepped, 1);
    assert_eq!(rt.task(id).unwrap().status(), Status::Idle);
    assert!(rt.is_wedged());

    // an idle task is skipped, not stepped
    assert_eq!(rt.run_pass().stepped, 0);
    assert_eq!(rt.task_count(), 1);

    assert!(rt.resume(id));
    assert!(!rt.resume(id));
    assert!(!rt.is_wedged());

    let report = rt.run_pass();
    assert_eq!(report.stepped, 2);
    assert_eq!(report.reaped, vec![id]);
    assert!(rt.is_empty());
}

#[test]
fn fault_redirects_to_the_handler_inside_the_same_slice() {
    let mut rt = Runtime::new();
    // POP on an empty stack lands on the HLT one byte past the entry point
    let id = launch(&mut rt, "POP\nHLT", 1);
    rt.set_priority(id, priority(2));

    let report = rt.run_pass();
    assert_eq!(report.stepped, 2);
    assert_eq!(report.reaped, vec![id]);
}

#[test]
fn ids_are_monotonic_and_failed_launches_consume_none() {
    let mut rt = Runtime::new();
    let first = launch(&mut rt, "HLT", 0);

    let broken = [0u8; 5];
    let err = rt.launch(&mut ReadStream::new(&broken[..])).unwrap_err();
    assert!(matches!(err, LoadError::UnexpectedEndOfStream { .. }));
    assert_eq!(rt.task_count(), 1);

    let second = launch(&mut rt, "HLT", 0);
    assert_eq!(first, TaskId(0));
    assert_eq!(second, TaskId(1));

    rt.run_pass();
    let third = launch(&mut rt, "HLT", 0);
    assert_eq!(third, TaskId(2));
}

#[test]
fn removal_keeps_order_and_visits_shifted_tasks() {
    let mut rt = Runtime::new();
    let a = launch(&mut rt, "HLT", 0);
    let b = launch(&mut rt, "PUSH 1\nPUSH 2\nPUSH 3\nHLT", 0);
    let c = launch(&mut rt, "HLT", 0);
    let d = launch(&mut rt, "PUSH 4\nHLT", 0);

    let report = rt.run_pass();
    assert_eq!(report.reaped, vec![a, c]);
    let order: Vec<TaskId> = rt.tasks().map(|vm| vm.id()).collect();
    assert_eq!(order, vec![b, d]);

    for vm in rt.tasks() {
        assert_eq!(vm.stats().steps, 1);
    }

    let report = rt.run_pass();
    assert_eq!(report.reaped, vec![d]);
    assert_eq!(rt.tasks().map(|vm| vm.id()).collect::<Vec<_>>(), vec![b]);
}

#[test]
fn settles_when_all_tasks_finish_or_wedge() {
    let mut rt = Runtime::new();
    launch(&mut rt, "PUSH 1\nPUSH 2\nADD\nHLT", 0);
    assert_eq!(rt.run_until_settled(100), 4);
    assert!(rt.is_empty());

    let idle = launch(&mut rt, "BRK\nHLT", 0);
    assert_eq!(rt.run_until_settled(100), 1);
    assert!(rt.is_wedged());
    assert_eq!(rt.task(idle).unwrap().status(), Status::Idle);
}

#[test]
fn endless_loop_is_bounded_by_the_pass_limit() {
    let mut rt = Runtime::new();
    // PUSH 1; PUSH -19; JIF jumps back to the entry point forever
    let id = launch(&mut rt, "PUSH 1\nPUSH -19\nJIF", 0);
    assert_eq!(rt.run_until_settled(30), 30);
    let vm = rt.task(id).unwrap();
    assert_eq!(vm.stats().steps, 30);
    assert_eq!(vm.stats().faults, 0);
}

#[test]
fn unknown_ids_are_rejected() {
    let mut rt = Runtime::new();
    let id = launch(&mut rt, "HLT", 0);
    assert!(!rt.set_priority(TaskId(99), priority(2)));
    assert!(!rt.resume(TaskId(99)));
    // active tasks cannot be resumed
    assert!(!rt.resume(id));
}
