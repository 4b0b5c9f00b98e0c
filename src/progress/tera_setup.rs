//! Tera template function and filter registration.
//!
//! This module registers all the custom functions and filters available
//! in status templates.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tera::Tera;

use crate::progress_bar::{Bar, BarLimits, Fill};
use crate::style;

use super::render::throbber_frame;
use super::snapshot::Snapshot;

/// Animation used by `throbber()` without an `anim` argument.
pub const DEFAULT_THROBBER: &str = "|/-\\";

/// How auto-sized bars render in the current pass.
#[derive(Debug, Clone)]
pub(crate) enum BarPass {
    /// Render as nothing, counting each one.
    Measure(Arc<AtomicUsize>),
    /// Render at the given length.
    Resolved(usize),
}

/// Everything template functions read during one pass.
pub(crate) struct TemplateState {
    pub snapshot: Snapshot,
    pub limits: BarLimits,
    pub pass: BarPass,
    /// Session throbber index when composing started.
    pub throbber_base: usize,
    /// `throbber()` calls made in this pass.
    pub throbber_calls: Arc<AtomicUsize>,
    pub complete: bool,
}

/// Registers all Tera functions and filters for one rendering pass.
pub(crate) fn add_tera_functions(tera: &mut Tera, state: &TemplateState) {
    register_snapshot_functions(tera, &state.snapshot);
    register_bar_function(tera, state);
    register_throbber_function(tera, state);
    register_style_filters(tera);
}

/// Registers percent(), elapsed(), remaining(), rate() and mean_rate().
fn register_snapshot_functions(tera: &mut Tera, snapshot: &Snapshot) {
    let functions = [
        ("percent", snapshot.percent()),
        ("elapsed", snapshot.elapsed_text()),
        ("remaining", snapshot.remaining_text()),
        ("rate", snapshot.rate_text()),
        ("mean_rate", snapshot.mean_rate_text()),
    ];
    for (name, text) in functions {
        tera.register_function(name, move |_: &HashMap<String, tera::Value>| {
            Ok(text.clone().into())
        });
    }
}

/// Registers the bar() function.
///
/// Options:
///   len: int - bar length, 0 (default) to fill the leftover width
///   fill: string - "#." style pair, or a single glyph drawn in reverse video
///   text: string - label centered in the bar
fn register_bar_function(tera: &mut Tera, state: &TemplateState) {
    let progress = state.snapshot.progress;
    let limits = state.limits;
    let pass = state.pass.clone();
    tera.register_function("bar", move |props: &HashMap<String, tera::Value>| {
        let len = props.get("len").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        let fill = match props.get("fill").and_then(|v| v.as_str()) {
            Some(s) => Fill::parse(s).map_err(|e| tera::Error::msg(e.to_string()))?,
            None => Fill::default(),
        };
        let mut bar = Bar::new(fill).length(len);
        if let Some(text) = props.get("text") {
            let text = text
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| text.to_string());
            bar = bar.text(text);
        }

        if !bar.is_expandable() {
            return Ok(bar.render(progress, &limits).into());
        }
        match &pass {
            BarPass::Measure(pending) => {
                pending.fetch_add(1, Ordering::Relaxed);
                Ok("".to_string().into())
            }
            BarPass::Resolved(len) => Ok(bar.render_with_len(*len, progress, &limits).into()),
        }
    });
}

/// Registers the throbber() function.
fn register_throbber_function(tera: &mut Tera, state: &TemplateState) {
    let base = state.throbber_base;
    let calls = state.throbber_calls.clone();
    let complete = state.complete;
    tera.register_function("throbber", move |props: &HashMap<String, tera::Value>| {
        let anim = props
            .get("anim")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_THROBBER);
        let index = base + calls.fetch_add(1, Ordering::Relaxed);
        Ok(throbber_frame(anim, index, complete).to_string().into())
    });
}

/// Registers style filters.
fn register_style_filters(tera: &mut Tera) {
    tera.register_filter(
        "inverse",
        |value: &tera::Value, _: &HashMap<String, tera::Value>| {
            let content = value
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| value.to_string());
            Ok(style::reverse(content).to_string().into())
        },
    );
}
