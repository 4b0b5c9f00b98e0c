//! Integration tests for sessions shared by several worker threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use tickline::progress::{EmulatedTerminal, Output, Session, SessionBuilder};

const THREADS: u64 = 8;
const PER_THREAD: u64 = 200_000;

fn run_workers(session: &Session, body: fn(&Session, &mut tickline::progress::Worker)) {
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let mut worker = session.init_worker(PER_THREAD);
            let session = session.clone();
            thread::spawn(move || body(&session, &mut worker))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_aggregate_of_all_workers() {
    let session = SessionBuilder::new()
        .output(Output::Writer(Box::new(std::io::sink())))
        .interval(Duration::from_millis(5))
        .build();
    let _main = session.init(0);

    run_workers(&session, |_, worker| {
        for _ in 0..PER_THREAD {
            worker.record(1);
        }
    });

    assert_eq!(session.total(), THREADS * PER_THREAD);
    assert_eq!(session.count(), THREADS * PER_THREAD);
    assert_eq!(session.snapshot().progress, 1.0);
}

#[test]
fn test_concurrent_status_lines() {
    let term = EmulatedTerminal::new(80);
    let session = SessionBuilder::new()
        .output(Output::Emulated(term.clone()))
        .interval(Duration::from_millis(1))
        .build();
    let _main = session.init(0);

    run_workers(&session, |session, worker| {
        for _ in 0..PER_THREAD {
            if worker.record(1) {
                session
                    .write_status("{{ percent() }} [{{ bar() }}] {{ rate() }}")
                    .unwrap();
            }
        }
    });

    let contents = term.contents();
    assert!(!contents.is_empty());
    // Every status line is parked at the last column
    for line in contents.split("\x1b[80G").filter(|l| !l.is_empty()) {
        let line = line.trim_start_matches('\n');
        let line = line.rsplit("\x1b[K").next().unwrap();
        assert!(tickline::text::printable_width(line) <= 78, "{line:?}");
    }
    assert_eq!(session.snapshot().progress, 1.0);
}

#[test]
fn test_hold_lock_keeps_lines_together() {
    let term = EmulatedTerminal::new(80);
    let session = SessionBuilder::new()
        .output(Output::Emulated(term.clone()))
        .interval(Duration::from_millis(1))
        .hold_lock_on_publish(true)
        .build();
    let _main = session.init(0);
    let publishes = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let mut worker = session.init_worker(PER_THREAD);
            let session = session.clone();
            let publishes = publishes.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    if worker.record(1) {
                        publishes.fetch_add(1, Ordering::Relaxed);
                        session.write_raw("first").unwrap();
                        session.write_raw("second").unwrap();
                        session.release_lock();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Each publish erased exactly the two lines of the previous one
    let contents = term.contents();
    let cycle = "first\x1b[80G\nsecond\x1b[80G";
    let erase = "\r\x1b[K\x1b[A\x1b[K";
    let expected = vec![cycle; publishes.load(Ordering::Relaxed)].join(erase);
    assert_eq!(contents, expected);
    assert_eq!(session.count(), THREADS * PER_THREAD);
}
