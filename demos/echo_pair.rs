//! Two channels over an in-memory transport pair: one binds a calculator
//! object, the other invokes it.
//!
//! Run with: `cargo run --example echo_pair`

use std::sync::Arc;
use std::time::Duration;

use function_channel::transport::memory;
use function_channel::{FunctionChannel, MethodResult, MethodTable};
use serde_json::json;

#[tokio::main]
async fn main() -> function_channel::Result<()> {
    tracing_subscriber::fmt::init();

    let ((ta, ra), (tb, rb)) = memory::pair();
    let caller = FunctionChannel::new(ta, ra);
    let callee = FunctionChannel::new(tb, rb);

    callee.bind(
        "calc",
        Arc::new(
            MethodTable::new()
                .method("add", |args| {
                    let sum: i64 = args.iter().filter_map(|a| a.as_i64()).sum();
                    Ok(MethodResult::Value(json!(sum)))
                })
                .method("add_later", |args| {
                    let sum: i64 = args.iter().filter_map(|a| a.as_i64()).sum();
                    Ok(MethodResult::deferred(move |resolver| {
                        // Resolve from a background task once the work is done.
                        tokio::spawn(async move {
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            resolver.resolve(json!(sum));
                        });
                    }))
                }),
        ),
    );

    let sum = caller
        .invoke_with_result("calc", "add", vec![json!(1), json!(2), json!(3)], None)
        .await?;
    println!("add(1, 2, 3) = {sum}");

    let sum = caller
        .invoke_with_result(
            "calc",
            "add_later",
            vec![json!(4), json!(5)],
            Some(Duration::from_secs(1)),
        )
        .await?;
    println!("add_later(4, 5) = {sum}");

    caller.destroy();
    callee.destroy();
    Ok(())
}
