//! Engine lifecycle: termination handshake and the frequency-response sampler

mod common;

use common::*;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use wavecho_core::{BoundedBlockingQueue, StereoFrame};
use wavecho_dsp::EqGains;
use wavecho_engine::{Engine, QueueSinkOpener, RenderState};

#[test]
fn shutdown_releases_worker_parked_on_full_output_queue() {
    let queue = Arc::new(BoundedBlockingQueue::new(StereoFrame::BYTES, 8).unwrap());
    let sinks = QueueSinkOpener::new(Arc::clone(&queue));
    let mut engine = Engine::start(test_config(4), EndlessSourceOpener, sinks).unwrap();

    engine.register().set_input_path("endless");
    engine.register().set_play(true);

    // nobody drains the queue, so the third block blocks the worker
    wait_until("queue full", || queue.is_full());
    wait_until("two blocks", || engine.status().blocks_written == 2);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(engine.status().state, RenderState::Streaming);

    let (done_tx, done_rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        let result = engine.shutdown();
        done_tx.send(()).unwrap();
        (engine, result)
    });

    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("shutdown hung on a parked worker");
    let (engine, result) = handle.join().unwrap();
    result.unwrap();

    assert!(queue.is_unblocked());
    assert_eq!(engine.status().state, RenderState::Terminated);
    assert_eq!(engine.status().blocks_written, 2);
}

#[test]
fn shutdown_is_idempotent() {
    let mut engine = Engine::start(
        test_config(4),
        MemorySourceOpener::new(ramp(4)),
        CollectingSinkOpener::default(),
    )
    .unwrap();
    assert!(engine.is_running());

    engine.shutdown().unwrap();
    assert!(!engine.is_running());
    assert!(engine.register().is_shutdown_requested());

    engine.shutdown().unwrap();
    assert_eq!(engine.status().state, RenderState::Terminated);
}

#[test]
fn idle_engine_shuts_down_promptly() {
    let mut config = test_config(4);
    // a long period must not delay shutdown
    config.sampler_period_ms = 60_000;
    config.idle_poll_ms = 10;
    let mut engine = Engine::start(
        config,
        MemorySourceOpener::new(ramp(4)),
        CollectingSinkOpener::default(),
    )
    .unwrap();

    let started = std::time::Instant::now();
    engine.shutdown().unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn dropping_engine_stops_workers() {
    let sources = MemorySourceOpener::new(ramp(4));
    let engine = Engine::start(
        test_config(4),
        sources.clone(),
        CollectingSinkOpener::default(),
    )
    .unwrap();
    let register = Arc::clone(engine.register());

    drop(engine);
    assert!(register.is_shutdown_requested());
}

// ============================================================================
// SAMPLER
// ============================================================================

#[test]
fn sampler_republishes_response_after_gain_change() {
    let engine = Engine::start(
        test_config(4),
        MemorySourceOpener::new(ramp(4)),
        CollectingSinkOpener::default(),
    )
    .unwrap();
    let plot = Arc::clone(engine.plot_buffer());

    wait_until("first publish", || plot.updates() >= 1);
    let flat = engine.plot();
    assert_eq!(flat.len(), engine.config().plot_points);
    assert!(flat.iter().all(|p| p.magnitude_db.abs() < 1e-9));
    assert!((flat[0].frequency_hz - engine.config().plot_min_hz).abs() < 1e-9);

    engine
        .register()
        .set_eq_gains(EqGains {
            low: 1.0,
            band: 0.0,
            high: 0.0,
        })
        .unwrap();

    // low band doubles the signal well below its cutoff
    wait_until("boosted curve", || {
        (engine.plot()[0].magnitude_db - 6.0206).abs() < 0.01
    });
    let last = engine.plot().last().copied().unwrap();
    assert!(last.magnitude_db.abs() < 0.1);
}

#[test]
fn plot_follows_output_gain_even_with_equalizer_disabled() {
    let engine = Engine::start(
        test_config(4),
        MemorySourceOpener::new(ramp(4)),
        CollectingSinkOpener::default(),
    )
    .unwrap();

    engine.register().set_eq_output_gain(0.5).unwrap();
    wait_until("attenuated curve", || {
        engine
            .plot()
            .iter()
            .all(|p| (p.magnitude_db + 6.0206).abs() < 0.01)
    });
}
