//! A three-line status, printed without interference from other output.
//!
//! Run with: cargo run --release --example multiline -- [terms]

use tera::Context;
use tickline::progress::Session;

fn main() {
    let n: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(200_000_000);
    println!("Summing {n} terms\n");

    let session = Session::default();
    let mut worker = session.init(n);

    let (mut s, mut c) = (0.0f64, 0.0f64);
    for k in 1..=n {
        let f = k as f64;
        let y = 1.0 / (f * f) + c;
        let t = s + y;
        c = y - (t - s);
        s = t;

        if worker.record(1) {
            let mut ctx = Context::new();
            ctx.insert("s", &format!("{s:.14}"));
            ctx.insert("pi", &format!("{:.14}", (6.0 * s).sqrt()));
            let _ = session.write_status_with("s = {{ s }}, pi = {{ pi }}", &ctx);
            let _ = session.write_status("[{{ bar() }}] {{ percent() }} {{ throbber() }}");
            let _ = session.write_status("Remaining: {{ remaining() }}, Speed: {{ rate() }} terms/s");
        }
    }
    session
        .write_status("Elapsed time: {{ elapsed() }}, Mean speed: {{ mean_rate() }} terms/s")
        .unwrap();

    println!("\ns = {s:.14}, pi = {:.14}\n", (6.0 * s).sqrt());
}
