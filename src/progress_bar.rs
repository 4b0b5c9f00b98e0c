//! Bar layout: fixed or auto-sized progress bars with optional centered text.

use std::str::FromStr;

use crate::{Error, Result, style};

/// How the cells of a bar are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIs)]
pub enum Fill {
    /// Filled cells use the first glyph, empty cells the second (`"#."`).
    Pair { filled: char, empty: char },
    /// Every cell uses the same glyph; the filled part is shown in reverse
    /// video (`" "`). This reads best with a label inside the bar.
    Reverse(char),
}

impl Fill {
    /// Parses a fill from a string of one or two characters.
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(filled), Some(empty), None) => Ok(Self::Pair { filled, empty }),
            (Some(glyph), None, None) => Ok(Self::Reverse(glyph)),
            _ => Err(Error::InvalidFill(s.to_string())),
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self::Pair {
            filled: '#',
            empty: '.',
        }
    }
}

impl FromStr for Fill {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Length bounds applied to every bar with a concrete length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLimits {
    /// Shortest bar ever drawn (default: 10).
    pub min: usize,
    /// Longest bar ever drawn, and the capacity for an oversized label
    /// (default: 256).
    pub max: usize,
}

impl Default for BarLimits {
    fn default() -> Self {
        Self { min: 10, max: 256 }
    }
}

impl BarLimits {
    /// Clamps a requested length into `[min, max]`.
    pub fn clamp(&self, len: usize) -> usize {
        len.max(self.min).min(self.max.max(self.min))
    }
}

/// A progress bar specification.
///
/// A length of zero asks for an auto-sized bar: it renders as an empty
/// placeholder until the status line it belongs to has been measured, after
/// which it is rendered again with the leftover width (see
/// [`Session::write_status`](crate::progress::Session::write_status)).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bar {
    fill: Fill,
    text: Option<String>,
    len: usize,
}

impl Bar {
    /// Creates an auto-sized bar with the given fill.
    pub fn new(fill: Fill) -> Self {
        Self {
            fill,
            text: None,
            len: 0,
        }
    }

    /// Sets the requested length (0 = auto).
    pub fn length(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Places `text` in the middle of the bar.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.is_empty()).then_some(text);
        self
    }

    /// Returns the fill of this bar.
    pub fn fill(&self) -> Fill {
        self.fill
    }

    /// Returns `true` if the bar is sized from the leftover line width.
    pub fn is_expandable(&self) -> bool {
        self.len == 0
    }

    /// Renders the bar at its requested length.
    ///
    /// Auto-sized bars render as an empty placeholder.
    pub fn render(&self, progress: f64, limits: &BarLimits) -> String {
        if self.is_expandable() {
            return String::new();
        }
        self.render_with_len(self.len, progress, limits)
    }

    /// Renders the bar at `len` cells, clamped to `limits`.
    pub fn render_with_len(&self, len: usize, progress: f64, limits: &BarLimits) -> String {
        let len = limits.clamp(len);
        // Never show more than 100%, whatever the rounding did.
        let filled = ((len as f64 * progress).round() as usize).min(len);

        match self.fill {
            Fill::Pair {
                filled: on,
                empty: off,
            } => {
                let mut cells = vec![off; len];
                cells[..filled].fill(on);
                self.overlay_text(&mut cells, limits.max);
                cells.into_iter().collect()
            }
            Fill::Reverse(glyph) => {
                let mut cells = vec![glyph; len];
                self.overlay_text(&mut cells, limits.max);
                let split = filled.min(cells.len());
                let head: String = cells[..split].iter().collect();
                let tail: String = cells[split..].iter().collect();
                format!("{}{tail}", style::reverse(head))
            }
        }
    }

    /// Writes the label over the middle of `cells`. A label at least as long
    /// as the bar replaces it, cut to `capacity` cells.
    fn overlay_text(&self, cells: &mut Vec<char>, capacity: usize) {
        let Some(text) = &self.text else {
            return;
        };
        let label: Vec<char> = text.chars().collect();
        if cells.len() > label.len() {
            let start = (cells.len() - label.len()) / 2;
            cells[start..start + label.len()].copy_from_slice(&label);
        } else {
            cells.clear();
            cells.extend(label.into_iter().take(capacity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> BarLimits {
        BarLimits::default()
    }

    #[test]
    fn test_fill_parse() {
        assert_eq!(
            Fill::parse("#.").unwrap(),
            Fill::Pair {
                filled: '#',
                empty: '.'
            }
        );
        assert_eq!(Fill::parse(" ").unwrap(), Fill::Reverse(' '));
        assert!(Fill::parse("█░").unwrap().is_pair());
        assert!(Fill::parse("").is_err());
        assert!(Fill::parse("abc").is_err());
        assert_eq!("=-".parse::<Fill>().unwrap(), Fill::parse("=-").unwrap());
    }

    #[test]
    fn test_short_length_clamps_to_minimum() {
        let bar = Bar::new(Fill::parse("#.").unwrap()).length(5);
        assert_eq!(bar.render(0.5, &limits()), "#####.....");
    }

    #[test]
    fn test_long_length_clamps_to_maximum() {
        let bar = Bar::new(Fill::default()).length(1000);
        assert_eq!(bar.render(0.0, &limits()).chars().count(), 256);
    }

    #[test]
    fn test_overshoot_never_exceeds_length() {
        let bar = Bar::new(Fill::default()).length(20);
        assert_eq!(bar.render(1.000_001, &limits()), "#".repeat(20));
        assert_eq!(bar.render(7.0, &limits()), "#".repeat(20));
    }

    #[test]
    fn test_rounding() {
        let bar = Bar::new(Fill::default()).length(10);
        assert_eq!(bar.render(0.26, &limits()), "###.......");
        assert_eq!(bar.render(0.0, &limits()), "..........");
        assert_eq!(bar.render(f64::NAN, &limits()), "..........");
    }

    #[test]
    fn test_reverse_video_fill() {
        let bar = Bar::new(Fill::Reverse(' ')).length(10);
        assert_eq!(bar.render(0.3, &limits()), "\x1b[7m   \x1b[0m       ");
        assert_eq!(bar.render(0.0, &limits()), "\x1b[7m\x1b[0m          ");
    }

    #[test]
    fn test_centered_text() {
        let bar = Bar::new(Fill::default()).length(10).text("50%");
        assert_eq!(bar.render(0.5, &limits()), "###50%....");

        let bar = Bar::new(Fill::Reverse('-')).length(12).text("ab");
        assert_eq!(bar.render(0.5, &limits()), "\x1b[7m-----a\x1b[0mb-----");
    }

    #[test]
    fn test_text_longer_than_bar() {
        let bar = Bar::new(Fill::default()).length(10).text("0123456789AB");
        assert_eq!(bar.render(0.5, &limits()), "0123456789AB");

        let tight = BarLimits { min: 10, max: 11 };
        assert_eq!(bar.render(0.5, &tight), "0123456789A");
    }

    #[test]
    fn test_expandable_placeholder() {
        let bar = Bar::new(Fill::default());
        assert!(bar.is_expandable());
        assert_eq!(bar.render(0.5, &limits()), "");
        assert_eq!(bar.render_with_len(12, 0.5, &limits()), "######......");
    }

    #[test]
    fn test_empty_text_is_no_text() {
        let bar = Bar::new(Fill::default()).length(10).text("");
        assert_eq!(bar.render(0.0, &limits()), "..........");
    }
}
