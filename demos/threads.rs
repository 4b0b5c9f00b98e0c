//! Sums the Basel series on four threads, each reporting its own share.
//!
//! Run with: cargo run --release --example threads -- [terms]

use std::thread;

use tickline::progress::Session;

fn partial_sum(session: &Session, mut worker: tickline::progress::Worker, n0: u64, n1: u64) -> f64 {
    // Kahan summation of 1/n^2
    let (mut s, mut c) = (0.0f64, 0.0f64);
    for n in n0..=n1 {
        let f = n as f64;
        let y = 1.0 / (f * f) + c;
        let t = s + y;
        c = y - (t - s);
        s = t;

        if worker.record(1) {
            let _ = session.write_status(
                "{{ percent() }} {{ throbber() }} [{{ bar() }}] Remaining: {{ remaining() }}, Speed: {{ rate() }} terms/s",
            );
        }
    }
    s
}

fn main() {
    let n: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(400_000_000);
    println!("Summing {n} terms on 4 threads\n");

    let session = Session::default();
    let _main = session.init(0);

    let quarter = n / 4;
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let n0 = i * quarter + 1;
            let n1 = if i == 3 { n } else { (i + 1) * quarter };
            let worker = session.init_worker(n1 - n0 + 1);
            let session = session.clone();
            thread::spawn(move || partial_sum(&session, worker, n0, n1))
        })
        .collect();

    let s: f64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    session
        .write_status("Elapsed: {{ elapsed() }}, Mean speed: {{ mean_rate() }} terms/s")
        .unwrap();
    println!("\npi = {:.14}\n", (6.0 * s).sqrt());
}
