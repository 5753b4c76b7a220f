//! Integration tests for `FailStream` over `MockStream`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fail_stream::prelude::*;
use parking_lot::Mutex;

fn mock(ctx: &IoContext) -> MockStream {
    MockStream::new(ctx.clone())
        .with_input(&[42u8; 256])
        .read_limit(10)
}

/// The budget is shared by every operation kind on one counter.
#[test]
fn test_nth_operation_fails_regardless_of_kind() {
    let ctx = IoContext::new();

    for n in 1..=8u64 {
        let mut stream = FailStream::new(n, mock(&ctx));
        let mut buf = [0u8; 16];
        let mut results = Vec::new();

        results.push(stream.read_some(&mut buf).map(|_| ()));
        results.push(stream.write_some(b"hello").map(|_| ()));

        let mut ec = None;
        stream.read_some_ec(&mut buf, &mut ec);
        results.push(ec.map_or(Ok(()), Err));

        let mut ec = None;
        stream.write_some_ec(b"world", &mut ec);
        results.push(ec.map_or(Ok(()), Err));

        let slot = Arc::new(Mutex::new(None));
        let done = Arc::clone(&slot);
        stream.async_read_some(vec![0u8; 16], move |result, _| {
            *done.lock() = Some(result.map(|_| ()));
        });
        ctx.run();
        results.push(slot.lock().take().unwrap());

        let done = Arc::clone(&slot);
        stream.async_write_some(b"async".to_vec(), move |result, _| {
            *done.lock() = Some(result.map(|_| ()));
        });
        ctx.run();
        results.push(slot.lock().take().unwrap());

        let mut ec = None;
        teardown(Role::Client, &mut stream, &mut ec);
        results.push(ec.map_or(Ok(()), Err));

        // The budget always runs out by this call, so the closed mock
        // never answers
        let done = Arc::clone(&slot);
        async_teardown(Role::Client, &mut stream, move |result| {
            *done.lock() = Some(result);
        });
        ctx.run();
        results.push(slot.lock().take().unwrap());

        let first_failure = results.iter().position(Result::is_err);
        assert_eq!(
            first_failure,
            Some(usize::try_from(n - 1).unwrap()),
            "n = {n}: {results:?}"
        );
        for err in results.iter().skip(first_failure.unwrap()) {
            assert_eq!(err, &Err(Error::TestFailure), "n = {n}");
        }
    }
}

#[test]
fn test_explicit_read_scenario_from_two_call_budget() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(2, mock(&ctx));
    let mut buf = [0u8; 32];

    let mut ec = None;
    assert_eq!(stream.read_some_ec(&mut buf, &mut ec), 10);
    assert!(ec.is_none());

    let mut ec = None;
    assert_eq!(stream.read_some_ec(&mut buf, &mut ec), 0);
    assert_eq!(ec, Some(Error::TestFailure));

    assert_eq!(stream.next_layer().stats().reads, 1);
    assert_eq!(stream.next_layer().remaining_input(), 246);
}

#[test]
fn test_explicit_failure_has_no_side_effect_on_wrapped_stream() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(1, mock(&ctx));
    let mut ec = None;

    assert_eq!(stream.write_some_ec(b"dropped", &mut ec), 0);
    assert_eq!(ec, Some(Error::TestFailure));

    let inner = stream.next_layer();
    assert!(inner.written().is_empty());
    assert_eq!(inner.stats(), MockStats::default());
}

#[test]
fn test_failure_stays_sticky_after_threshold() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(2, mock(&ctx));
    let mut buf = [0u8; 8];

    assert!(stream.read_some(&mut buf).is_ok());
    for _ in 0..4 {
        assert_eq!(stream.read_some(&mut buf), Err(Error::TestFailure));
    }

    assert_eq!(stream.counter().failures(), 4);
    assert_eq!(stream.next_layer().stats().reads, 1);
}

/// Deferred completions run exactly once and only when the executor runs.
#[test]
fn test_async_completions_are_never_inline() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(3, mock(&ctx));
    let calls = Arc::new(AtomicUsize::new(0));
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let (count, log) = (Arc::clone(&calls), Arc::clone(&outcomes));
    stream.async_read_some(vec![0u8; 16], move |result, _| {
        count.fetch_add(1, Ordering::SeqCst);
        log.lock().push(result.map(|_| ()));
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (count, log) = (Arc::clone(&calls), Arc::clone(&outcomes));
    stream.async_write_some(b"abc".to_vec(), move |result, _| {
        count.fetch_add(1, Ordering::SeqCst);
        log.lock().push(result.map(|_| ()));
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (count, log) = (Arc::clone(&calls), Arc::clone(&outcomes));
    async_teardown(Role::Server, &mut stream, move |result| {
        count.fetch_add(1, Ordering::SeqCst);
        log.lock().push(result);
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(ctx.pending_count(), 3);

    assert_eq!(ctx.run(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        *outcomes.lock(),
        vec![Ok(()), Ok(()), Err(Error::TestFailure)]
    );

    // Nothing left to deliver twice
    assert_eq!(ctx.run(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(stream.next_layer().teardowns().is_empty());
}

#[test]
fn test_async_read_returns_buffer_with_data() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(5, MockStream::new(ctx.clone()).with_input(b"frame"));
    let received = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&received);
    stream.async_read_some(vec![0u8; 8], move |result, buf| {
        if let Ok(n) = result {
            sink.lock().extend_from_slice(&buf[..n]);
        }
    });

    ctx.run();
    assert_eq!(*received.lock(), b"frame".to_vec());
}

#[test]
fn test_shared_counter_spans_two_streams() {
    let ctx = IoContext::new();
    let counter = FaultCounter::new(3);
    let mut a = FailStream::with_counter(&counter, mock(&ctx));
    let mut b = FailStream::with_counter(&counter, mock(&ctx));

    assert!(!a.owns_counter());
    assert!(a.write_some(b"one").is_ok());
    assert!(b.write_some(b"two").is_ok());
    assert_eq!(a.write_some(b"three"), Err(Error::TestFailure));

    assert_eq!(counter.calls(), 3);
    assert_eq!(a.next_layer().written(), b"one");
    assert_eq!(b.next_layer().written(), b"two");
}

#[test]
fn test_shared_counter_across_read_and_write_legs() {
    let ctx = IoContext::new();
    let counter = FaultCounter::new(2).error(Error::injected_failure("leg down"));
    let mut reader = FailStream::with_counter(&counter, mock(&ctx));
    let mut writer = FailStream::with_counter(&counter, mock(&ctx));

    let mut buf = [0u8; 4];
    assert_eq!(reader.read_some(&mut buf), Ok(4));
    assert_eq!(
        writer.write_some(b"data"),
        Err(Error::injected_failure("leg down"))
    );
    assert_eq!(
        reader.read_some(&mut buf),
        Err(Error::injected_failure("leg down"))
    );
}

#[test]
fn test_lowest_layer_identity_through_nested_wrappers() {
    let ctx = IoContext::new();
    let inner = FailStream::new(10, mock(&ctx));
    let mut outer = FailStream::new(10, inner);

    let via_outer: *const MockStream = outer.lowest_layer();
    let via_inner: *const MockStream = outer.next_layer().lowest_layer();
    let raw: *const MockStream = outer.next_layer().next_layer();
    assert!(std::ptr::eq(via_outer, via_inner));
    assert!(std::ptr::eq(via_outer, raw));

    outer.lowest_layer_mut().push_input(b"!");
    assert_eq!(outer.lowest_layer().remaining_input(), 257);
    assert!(outer.executor().same_context(&ctx));
}

#[test]
fn test_nested_wrappers_each_consult_their_counter() {
    let ctx = IoContext::new();
    let inner_counter = FaultCounter::new(2);
    let inner = FailStream::with_counter(&inner_counter, mock(&ctx));
    let mut outer = FailStream::new(5, inner);
    let mut buf = [0u8; 4];

    assert!(outer.read_some(&mut buf).is_ok());
    // Outer passes the call on, the inner wrapper fails it
    assert_eq!(outer.read_some(&mut buf), Err(Error::TestFailure));
    assert_eq!(outer.counter().calls(), 2);
    assert_eq!(inner_counter.calls(), 2);
    assert_eq!(outer.lowest_layer().stats().reads, 1);
}

#[test]
fn test_teardown_delegates_when_not_failing() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(2, mock(&ctx));
    let mut ec = None;

    teardown(Role::Client, &mut stream, &mut ec);

    assert!(ec.is_none());
    assert_eq!(stream.next_layer().teardowns(), &[Role::Client]);
    assert!(stream.next_layer().is_closed());
}

#[test]
fn test_teardown_never_touches_wrapped_stream_when_failing() {
    let ctx = IoContext::new();
    let counter = FaultCounter::new(1);
    let mut stream = FailStream::with_counter(&counter, mock(&ctx));
    let mut ec = None;

    teardown(Role::Server, &mut stream, &mut ec);
    assert_eq!(ec, Some(Error::TestFailure));

    let done = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&done);
    async_teardown(Role::Server, &mut stream, move |result| {
        *slot.lock() = Some(result);
    });
    assert!(done.lock().is_none());
    ctx.run();
    assert_eq!(*done.lock(), Some(Err(Error::TestFailure)));

    let stats = stream.next_layer().stats();
    assert_eq!(stats.teardowns, 0);
    assert_eq!(stats.async_teardowns, 0);
    assert!(!stream.next_layer().is_closed());
}

#[test]
fn test_wrapped_stream_errors_pass_through_unchanged() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(10, mock(&ctx));
    let mut ec = None;

    teardown(Role::Client, &mut stream, &mut ec);
    assert!(ec.is_none());

    let mut buf = [0u8; 4];
    assert_eq!(stream.read_some(&mut buf), Err(Error::Closed));
    assert_eq!(stream.read_some_ec(&mut buf, &mut ec), 0);
    assert_eq!(ec, Some(Error::Closed));
    assert!(!stream.counter().is_triggered());
}

#[test]
fn test_async_teardown_delegates_when_not_failing() {
    let ctx = IoContext::new();
    let mut stream = FailStream::new(2, mock(&ctx));
    let done = Arc::new(Mutex::new(Vec::new()));

    let slot = Arc::clone(&done);
    async_teardown(Role::Server, &mut stream, move |result| {
        slot.lock().push(result);
    });

    // Forwarded to the wrapped stream, but the handler waits for the context
    assert!(done.lock().is_empty());
    assert_eq!(stream.next_layer().stats().async_teardowns, 1);

    assert_eq!(ctx.run(), 1);
    assert_eq!(*done.lock(), vec![Ok(())]);
    assert_eq!(stream.next_layer().teardowns(), &[Role::Server]);
    assert!(stream.next_layer().is_closed());
    assert!(!stream.counter().is_triggered());
}
