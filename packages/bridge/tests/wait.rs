use std::time::{Duration, Instant};

use cu_bridge::pre::*;
use cu_bridge::{Bridge, Cancelled, CancellationToken, Operation, PreconditionError};

mod common;
use common::{Counting, Oops};

#[test]
fn test_completed_returns_without_relay() {
    cu_bridge::log_init();
    let executor = Counting::new();
    let bridge = Bridge::new(&executor);
    assert_eq!(bridge.wait(Operation::completed(42)).unwrap(), 42);
    assert_eq!(executor.scheduled(), 0);
}

#[test]
fn test_faulted_returns_error_without_relay() {
    let executor = Counting::new();
    let bridge = Bridge::new(&executor);
    let err = bridge
        .wait(Operation::<u32>::faulted(Oops { code: 1 }))
        .unwrap_err();
    assert_eq!(err.downcast_ref::<Oops>(), Some(&Oops { code: 1 }));
    assert_eq!(executor.scheduled(), 0);
}

#[test]
fn test_cancelled_returns_cancelled_without_relay() {
    let executor = Counting::new();
    let bridge = Bridge::new(&executor);
    let err = bridge.wait(Operation::<u32>::cancelled()).unwrap_err();
    assert!(err.is::<Cancelled>());
    assert_eq!(executor.scheduled(), 0);
}

#[test]
fn test_absent_operation_fails_immediately() {
    let executor = Counting::new();
    let bridge = Bridge::new(&executor);
    let err = bridge.wait(Operation::<u32>::default()).unwrap_err();
    assert!(err.is::<PreconditionError>());

    let token = CancellationToken::new();
    let mut op = Operation::completed(1);
    let _moved = op.take();
    let err = bridge.wait_cancellable(op, &token).unwrap_err();
    assert!(err.is::<PreconditionError>());
    assert_eq!(executor.scheduled(), 0);
}

#[test]
fn test_pending_schedules_one_relay() {
    let executor = Counting::new();
    let bridge = Bridge::new(&executor);
    let op = Operation::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(42)
    });
    assert_eq!(bridge.wait(op).unwrap(), 42);
    assert_eq!(executor.scheduled(), 1);
}

#[test]
fn test_fault_keeps_kind_and_message() {
    let op = Operation::<u32>::new(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Err(Oops { code: 7 }.into())
    });
    let err = cu_bridge::wait(op).unwrap_err();
    assert_eq!(err.to_string(), "Oops!");
    assert_eq!(err.downcast_ref::<Oops>(), Some(&Oops { code: 7 }));
    assert!(!err.is::<cu_bridge::Fault>());
}

#[test]
fn test_fault_with_context_is_returned_as_is() {
    let op = Operation::<u32>::new(async {
        Err(cu_bridge::Error::new(Oops { code: 2 })).context("while loading")
    });
    let err = cu_bridge::wait(op).unwrap_err();
    assert_eq!(err.to_string(), "while loading");
    assert_eq!(err.root_cause().to_string(), "Oops!");
    assert!(err.is::<Oops>());
}

#[test]
fn test_multiple_errors_return_primary() {
    let (completer, op) = Operation::<u32>::promise();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(10));
        completer.fault_many([
            cu_bridge::Error::new(Oops { code: 1 }),
            cu_bridge::fmterr!("second"),
        ]);
    });
    let err = cu_bridge::wait(op).unwrap_err();
    assert_eq!(err.downcast_ref::<Oops>(), Some(&Oops { code: 1 }));
}

#[test]
fn test_unit_operation() {
    let op = Operation::new(async {
        tokio::task::yield_now().await;
        Ok(())
    });
    cu_bridge::wait(op).unwrap();
}

#[test]
fn test_cancel_while_pending() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        trigger.cancel();
    });
    let op = Operation::new(async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(42)
    });
    let start = Instant::now();
    let err = cu_bridge::wait_cancellable(op, &token).unwrap_err();
    assert!(err.is::<Cancelled>());
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_cancelled_token_does_not_schedule() {
    let executor = Counting::new();
    let bridge = Bridge::new(&executor);
    let token = CancellationToken::new();
    token.cancel();
    let op = Operation::new(async { Ok(1) });
    let err = bridge.wait_cancellable(op, &token).unwrap_err();
    assert!(err.is::<Cancelled>());
    assert_eq!(executor.scheduled(), 0);
}

#[test]
fn test_finished_operation_wins_over_cancelled_token() {
    let token = CancellationToken::new();
    token.cancel();
    assert_eq!(
        cu_bridge::wait_cancellable(Operation::completed(5), &token).unwrap(),
        5
    );
}

#[test]
fn test_cancelled_error_from_operation() {
    let op = Operation::<u32>::new(async { Err(Cancelled).context("shutting down") });
    let err = cu_bridge::wait(op).unwrap_err();
    assert!(err.is::<Cancelled>());
}

async fn explode() -> cu_bridge::Result<u32> {
    panic!("boom")
}

#[test]
fn test_panic_is_a_fault() {
    let err = cu_bridge::wait(Operation::new(explode())).unwrap_err();
    assert_eq!(err.to_string(), "operation panicked: boom");
}

#[test]
fn test_promise_completed_from_thread() {
    let (completer, op) = Operation::promise();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(10));
        assert!(completer.complete(String::from("hello")));
    });
    assert_eq!(cu_bridge::wait(op).unwrap(), "hello");
}

#[test]
fn test_dropped_completer_cancels() {
    let (completer, op) = Operation::<u32>::promise();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(10));
        drop(completer);
    });
    let err = cu_bridge::wait(op).unwrap_err();
    assert!(err.is::<Cancelled>());
}

#[test]
fn test_task_operation() {
    let executor = Counting::new();
    let bridge = Bridge::new(&executor);
    let task = executor.runtime().spawn(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(3)
    });
    assert_eq!(bridge.wait(Operation::from_task(task)).unwrap(), 3);
}

#[test]
fn test_aborted_task_is_cancelled() {
    let executor = Counting::new();
    let task = executor.runtime().spawn(async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(3)
    });
    task.abort();
    let err = Bridge::new(&executor)
        .wait(Operation::from_task(task))
        .unwrap_err();
    assert!(err.is::<Cancelled>());
}

#[test]
fn test_finished_task_takes_fast_path() {
    let executor = Counting::new();
    let task = executor.runtime().spawn(async { Ok(9) });
    while !task.is_finished() {
        std::thread::sleep(Duration::from_millis(1));
    }
    let bridge = Bridge::new(&executor);
    assert_eq!(bridge.wait(Operation::from_task(task)).unwrap(), 9);
    assert_eq!(executor.scheduled(), 0);
}

#[test]
fn test_many_concurrent_waits() {
    let threads: Vec<_> = (0..8u32)
        .map(|i| {
            std::thread::spawn(move || {
                cu_bridge::wait(Operation::new(async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok(i * 2)
                }))
            })
        })
        .collect();
    for (i, thread) in threads.into_iter().enumerate() {
        assert_eq!(thread.join().unwrap().unwrap(), i as u32 * 2);
    }
}
