//! Status line composition and terminal output.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tera::Context;

use crate::{Result, style, text};

use super::config::Config;
use super::diagnostics;
use super::session::Shared;
use super::tera_setup::{BarPass, TemplateState, add_tera_functions};

/// Name of the template slot every status line is compiled into. Templates
/// are often built per publish, so only the latest one is kept.
const STATUS_TEMPLATE: &str = "status";

/// Erases every line printed since the last erase and leaves the cursor at
/// the start of the topmost one.
pub(crate) fn erase(s: &mut Shared) -> io::Result<()> {
    if s.printed_lines == 0 {
        return Ok(());
    }
    if !s.is_usable() {
        s.printed_lines = 0;
        return Ok(());
    }
    let mut seq = String::from(style::ERASE_CURRENT_LINE);
    for _ in 1..s.printed_lines {
        seq.push_str(style::ERASE_LINE_ABOVE);
    }
    s.target.write_str(&seq)?;
    s.target.flush()?;
    s.printed_lines = 0;
    Ok(())
}

/// Prints one status line below the ones already printed this cycle.
///
/// The line is cut to the rendering width and the cursor is parked in the
/// last column, so whatever the program prints next starts on a fresh line.
pub(crate) fn write_line(s: &mut Shared, line: &str) -> io::Result<()> {
    if !s.is_usable() {
        return Ok(());
    }
    let terminal_width = s.snapshot.terminal_width.unwrap_or_default();
    let mut out = String::with_capacity(line.len() + 16);
    if s.printed_lines > 0 {
        out.push('\n');
    }
    out.push_str(&text::truncate(line, s.width));
    out.push_str(&style::cursor_to_column(terminal_width));
    s.target.write_str(&out)?;
    s.target.flush()?;
    s.printed_lines += 1;
    diagnostics::log_line(line);
    Ok(())
}

/// Renders `template` against the current snapshot.
///
/// Auto-sized bars cannot know their length before the rest of the line is
/// known, so a template containing any is rendered twice: first with those
/// bars empty to measure the line, then with the leftover width shared
/// evenly among them.
pub(crate) fn compose(
    config: &Config,
    s: &mut Shared,
    template: &str,
    extra: &Context,
) -> Result<String> {
    s.tera.add_raw_template(STATUS_TEMPLATE, template)?;

    let snapshot = s.snapshot;
    let mut ctx = extra.clone();
    ctx.insert("progress", &snapshot.progress);
    ctx.insert("elapsed", &snapshot.elapsed);
    ctx.insert("remaining", &snapshot.remaining);
    ctx.insert("rate", &snapshot.instant_rate);
    ctx.insert("mean_rate", &snapshot.mean_rate);
    ctx.insert("width", &s.width);

    let pending = Arc::new(AtomicUsize::new(0));
    let mut state = TemplateState {
        snapshot,
        limits: config.bar_limits,
        pass: BarPass::Measure(pending.clone()),
        throbber_base: s.throbber,
        throbber_calls: Arc::new(AtomicUsize::new(0)),
        complete: s.count == s.total,
    };
    add_tera_functions(&mut s.tera, &state);
    let mut line = s.tera.render(STATUS_TEMPLATE, &ctx)?;

    let pending = pending.load(Ordering::Relaxed);
    if pending > 0 {
        let avail = s.width.saturating_sub(text::printable_width(&line));
        let expand = if avail > pending { avail / pending } else { 1 };
        // The second pass must show the same throbber frames as the first.
        state.pass = BarPass::Resolved(expand);
        state.throbber_calls = Arc::new(AtomicUsize::new(0));
        add_tera_functions(&mut s.tera, &state);
        line = s.tera.render(STATUS_TEMPLATE, &ctx)?;
    }

    s.throbber = state.throbber_base + state.throbber_calls.load(Ordering::Relaxed);
    Ok(line)
}

/// Returns frame `index` of `anim`, or a blank once the work is complete.
pub(crate) fn throbber_frame(anim: &str, index: usize, complete: bool) -> char {
    if complete {
        return ' ';
    }
    let frames = anim.chars().count();
    if frames == 0 {
        return ' ';
    }
    anim.chars().nth(index % frames).unwrap_or(' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{EmulatedTerminal, ManualClock, Output, Session, SessionBuilder};

    fn session(width: usize) -> (Session, EmulatedTerminal, ManualClock) {
        let term = EmulatedTerminal::new(width);
        let clock = ManualClock::new();
        let session = SessionBuilder::new()
            .output(Output::Emulated(term.clone()))
            .clock(clock.clone())
            .build();
        (session, term, clock)
    }

    /// Inits with `total` and publishes once at 1/total.
    fn published(width: usize, total: u64) -> (Session, EmulatedTerminal, ManualClock) {
        let (session, term, clock) = session(width);
        let mut w = session.init(total);
        clock.advance_secs(1.0);
        assert!(w.record(1));
        (session, term, clock)
    }

    #[test]
    fn test_throbber_frame() {
        assert_eq!(throbber_frame("|/-\\", 0, false), '|');
        assert_eq!(throbber_frame("|/-\\", 5, false), '/');
        assert_eq!(throbber_frame("|/-\\", 5, true), ' ');
        assert_eq!(throbber_frame("", 3, false), ' ');
    }

    #[test]
    fn test_write_line_parks_cursor() {
        let (session, term, _) = published(40, 4);
        session.write_raw("hello").unwrap();
        assert_eq!(term.take(), "hello\x1b[40G");
    }

    #[test]
    fn test_second_line_starts_with_newline() {
        let (session, term, _) = published(40, 4);
        session.write_raw("one").unwrap();
        session.write_raw("two").unwrap();
        assert_eq!(term.take(), "one\x1b[40G\ntwo\x1b[40G");
        assert_eq!(session.inner.lock().printed_lines, 2);
    }

    #[test]
    fn test_erase_moves_up_per_extra_line() {
        let (session, term, _) = published(40, 4);
        session.write_raw("one").unwrap();
        session.write_raw("two").unwrap();
        session.write_raw("three").unwrap();
        term.take();
        session.clear().unwrap();
        assert_eq!(term.take(), "\r\x1b[K\x1b[A\x1b[K\x1b[A\x1b[K");
        // Nothing left to erase
        session.clear().unwrap();
        assert_eq!(term.take(), "");
    }

    #[test]
    fn test_long_line_truncated_to_rendering_width() {
        let (session, term, _) = published(12, 4);
        session.write_raw("abcdefghijklmnop").unwrap();
        assert_eq!(term.take(), "abcdefg>>>\x1b[0m\x1b[12G");
    }

    #[test]
    fn test_rendering_width_capped() {
        let term = EmulatedTerminal::new(300);
        let clock = ManualClock::new();
        let session = SessionBuilder::new()
            .output(Output::Emulated(term.clone()))
            .clock(clock.clone())
            .max_line_len(100)
            .build();
        let mut w = session.init(4);
        clock.advance_secs(1.0);
        assert!(w.record(1));
        assert_eq!(session.inner.lock().width, 100);
    }

    #[test]
    fn test_narrow_terminal_is_unusable() {
        let (session, term, _) = published(2, 4);
        session.write_raw("hi").unwrap();
        assert_eq!(term.contents(), "");
    }

    #[test]
    fn test_compose_context_variables() {
        let (session, _, _) = published(80, 4);
        let mut s = session.inner.lock();
        let line = compose(
            &session.inner.config,
            &mut s,
            "{{ progress }} {{ width }} {{ percent() }} {{ elapsed() }}",
            &Context::new(),
        )
        .unwrap();
        assert_eq!(line, "0.25 78 25% 1s");
    }

    #[test]
    fn test_compose_extra_context() {
        let (session, _, _) = published(80, 4);
        let mut ctx = Context::new();
        ctx.insert("name", "copy");
        let mut s = session.inner.lock();
        let line = compose(&session.inner.config, &mut s, "{{ name }}: {{ percent() }}", &ctx)
            .unwrap();
        assert_eq!(line, "copy: 25%");
    }

    #[test]
    fn test_compose_auto_bar_fills_line() {
        let (session, _, _) = published(80, 4);
        let mut s = session.inner.lock();
        let line = compose(&session.inner.config, &mut s, "[{{ bar() }}]", &Context::new())
            .unwrap();
        assert_eq!(text::printable_width(&line), 78);
        assert_eq!(line, format!("[{}{}]", "#".repeat(19), ".".repeat(57)));
    }

    #[test]
    fn test_compose_auto_bars_share_width() {
        let (session, _, _) = published(80, 4);
        let mut s = session.inner.lock();
        let line = compose(
            &session.inner.config,
            &mut s,
            "{{ bar() }}|{{ bar(fill='=-') }}",
            &Context::new(),
        )
        .unwrap();
        // 77 columns left for two bars
        assert_eq!(line, format!("{}{}|{}{}", "#".repeat(10), ".".repeat(28), "=".repeat(10), "-".repeat(28)));
    }

    #[test]
    fn test_compose_auto_bar_never_below_minimum() {
        let (session, _, _) = published(20, 4);
        let mut s = session.inner.lock();
        let line = compose(
            &session.inner.config,
            &mut s,
            "a long prefix here {{ bar() }}",
            &Context::new(),
        )
        .unwrap();
        assert!(line.ends_with(&format!("{}{}", "#".repeat(3), ".".repeat(7))));
    }

    #[test]
    fn test_compose_fixed_bar_with_text() {
        let (session, _, _) = published(80, 4);
        let mut s = session.inner.lock();
        let line = compose(
            &session.inner.config,
            &mut s,
            "{{ bar(len=12, text='ab') }}",
            &Context::new(),
        )
        .unwrap();
        assert_eq!(line, "###..ab.....");
    }

    #[test]
    fn test_compose_invalid_fill() {
        let (session, _, _) = published(80, 4);
        let mut s = session.inner.lock();
        let err = compose(
            &session.inner.config,
            &mut s,
            "{{ bar(fill='abc') }}",
            &Context::new(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_compose_keeps_one_compiled_template() {
        let (session, _, _) = published(80, 4);
        let mut s = session.inner.lock();
        for i in 0..500 {
            let template = format!("item {i} {{{{ percent() }}}}");
            let line =
                compose(&session.inner.config, &mut s, &template, &Context::new()).unwrap();
            assert_eq!(line, format!("item {i} 25%"));
        }
        assert_eq!(s.tera.get_template_names().count(), 1);
    }

    #[test]
    fn test_compose_throbber_advances_once_per_call() {
        let (session, _, _) = published(80, 4);
        let mut s = session.inner.lock();
        let template = "{{ throbber() }}{{ throbber() }} {{ bar() }}";
        let first = compose(&session.inner.config, &mut s, template, &Context::new()).unwrap();
        assert!(first.starts_with("|/ "));
        let second = compose(&session.inner.config, &mut s, template, &Context::new()).unwrap();
        assert!(second.starts_with("-\\ "));
        assert_eq!(s.throbber, 4);
    }
}
