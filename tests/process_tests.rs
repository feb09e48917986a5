#![cfg(unix)]

use std::{ffi::OsString, time::Duration};

use automark::process::{RunOutcome, ServerGuard, run_inherited};

fn args(items: &[&str]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

#[tokio::test]
async fn finished_process_reports_its_status() {
    let outcome = run_inherited("sh", &args(&["-c", "exit 3"]), None, Some(Duration::from_secs(10)))
        .await
        .expect("run sh");

    match outcome {
        RunOutcome::Exited(status) => assert_eq!(status.code(), Some(3)),
        RunOutcome::TimedOut => panic!("sh should not time out"),
    }
    assert!(!outcome.success());
}

#[tokio::test]
async fn slow_process_times_out() {
    let outcome = run_inherited("sleep", &args(&["30"]), None, Some(Duration::from_millis(200)))
        .await
        .expect("run sleep");

    assert_eq!(outcome, RunOutcome::TimedOut);
}

#[tokio::test]
async fn missing_program_is_an_error() {
    let result = run_inherited("automark-no-such-tool", &[], None, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn server_is_stopped_after_its_stage() {
    let mut server = ServerGuard::start("sleep", &args(&["30"]), None).expect("start server");
    server
        .await_ready(Duration::from_millis(100))
        .await
        .expect("boot delay");

    tokio::time::timeout(Duration::from_secs(10), server.stop(Duration::from_millis(200)))
        .await
        .expect("stop should not hang")
        .expect("stop server");
}

#[tokio::test]
async fn server_that_exits_early_does_not_block_boot() {
    let mut server = ServerGuard::start("true", &[], None).expect("start server");

    tokio::time::timeout(Duration::from_secs(5), server.await_ready(Duration::from_secs(60)))
        .await
        .expect("early exit ends the boot wait")
        .expect("boot delay");

    server.stop(Duration::from_millis(10)).await.expect("stop server");
}
