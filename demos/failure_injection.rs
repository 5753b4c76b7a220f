//! Example: Walking a failure through a handshake
//!
//! This example runs a tiny request/response/teardown exchange over a
//! `FailStream`, moving the injected failure one call later on every pass
//! until the exchange finally succeeds.

use std::sync::Arc;

use fail_stream::prelude::*;
use fail_stream::stream::into_result;
use parking_lot::Mutex;

/// The protocol under test: send a greeting, read the reply, then tear down.
fn exchange<S>(stream: &mut S) -> Result<Vec<u8>>
where
    S: ReadStream + WriteStream + Teardown,
{
    stream.write_some(b"HELLO\r\n")?;

    let mut buf = [0u8; 64];
    let n = stream.read_some(&mut buf)?;

    let mut ec = None;
    teardown(Role::Client, stream, &mut ec);

    into_result(buf[..n].to_vec(), ec)
}

fn main() {
    println!("fail-stream - walking a failure through a handshake\n");

    example_sync_exchange();
    example_async_completion();

    println!("\nDone.");
}

fn example_sync_exchange() {
    println!("Example 1: strict and explicit calls");

    let ctx = IoContext::new();
    for n in 1.. {
        let mut stream = FailStream::new(n, MockStream::new(ctx.clone()).with_input(b"WELCOME"));

        match exchange(&mut stream) {
            Ok(reply) => {
                println!(
                    "   n = {n}: succeeded, reply {:?}",
                    String::from_utf8_lossy(&reply)
                );
                break;
            }
            Err(err) => {
                let touched = stream.next_layer().stats().total();
                println!("   n = {n}: failed with '{err}' after {touched} real calls");
            }
        }
    }

    println!();
}

fn example_async_completion() {
    println!("Example 2: deferred completion of an injected failure");

    let ctx = IoContext::new();
    let mut stream = FailStream::new(1, MockStream::new(ctx.clone()));
    let outcome = Arc::new(Mutex::new(None));

    let slot = Arc::clone(&outcome);
    stream.async_write_some(b"PING".to_vec(), move |result, _buf| {
        *slot.lock() = Some(result);
    });

    println!("   after submit: {:?}", *outcome.lock());
    println!("   handlers run: {}", ctx.run());
    println!("   after run:    {:?}", *outcome.lock());
}
