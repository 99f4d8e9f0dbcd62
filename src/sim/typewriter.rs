//! Typewriter message reveal
//!
//! Lines appear one character at a time; each line waits for the previous
//! one to finish plus a short pause. Characters are Unicode scalar values,
//! so combining marks count as their own keystroke.

/// Milliseconds per revealed character
pub const DEFAULT_CHAR_MS: f64 = 45.0;
/// Pause between finishing one line and starting the next
pub const DEFAULT_LINE_PAUSE_MS: f64 = 350.0;

#[derive(Debug, Clone)]
pub struct Typewriter {
    lines: Vec<String>,
    char_counts: Vec<usize>,
    char_ms: f64,
    line_pause_ms: f64,
    /// Line being typed
    line: usize,
    /// Characters of `line` shown
    shown: usize,
    budget_ms: f64,
    running: bool,
    finished: bool,
}

impl Typewriter {
    pub fn new(lines: Vec<String>, char_ms: f64, line_pause_ms: f64) -> Self {
        let char_counts = lines.iter().map(|l| l.chars().count()).collect();
        Self {
            lines,
            char_counts,
            char_ms: char_ms.max(1.0),
            line_pause_ms: line_pause_ms.max(0.0),
            line: 0,
            shown: 0,
            budget_ms: 0.0,
            running: false,
            finished: false,
        }
    }

    pub fn start(&mut self) {
        if !self.running && !self.finished {
            self.running = true;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt_ms`. Returns true on the call that completes the message.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        self.budget_ms += dt_ms;
        loop {
            let Some(&total) = self.char_counts.get(self.line) else {
                return self.finish();
            };
            if self.shown < total {
                if self.budget_ms < self.char_ms {
                    return false;
                }
                self.budget_ms -= self.char_ms;
                self.shown += 1;
                continue;
            }
            if self.line + 1 >= self.lines.len() {
                return self.finish();
            }
            if self.budget_ms < self.line_pause_ms {
                return false;
            }
            self.budget_ms -= self.line_pause_ms;
            self.line += 1;
            self.shown = 0;
        }
    }

    fn finish(&mut self) -> bool {
        self.running = false;
        self.finished = true;
        self.line = self.lines.len().saturating_sub(1);
        self.shown = self.char_counts.last().copied().unwrap_or(0);
        true
    }

    /// Text shown so far: finished lines in full, then the partial line
    pub fn visible_lines(&self) -> Vec<&str> {
        if !self.running && !self.finished {
            return Vec::new();
        }
        let mut out: Vec<&str> = self.lines[..self.line.min(self.lines.len())]
            .iter()
            .map(String::as_str)
            .collect();
        if let Some(current) = self.lines.get(self.line) {
            let end = current
                .char_indices()
                .nth(self.shown)
                .map(|(i, _)| i)
                .unwrap_or(current.len());
            out.push(&current[..end]);
        }
        out
    }

    /// Visible text joined with newlines
    pub fn visible_text(&self) -> String {
        self.visible_lines().join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(lines: &[&str]) -> Typewriter {
        Typewriter::new(
            lines.iter().map(|s| s.to_string()).collect(),
            10.0,
            50.0,
        )
    }

    #[test]
    fn test_nothing_before_start() {
        let mut tw = writer(&["hello"]);
        assert!(!tw.advance(1000.0));
        assert!(tw.visible_lines().is_empty());
    }

    #[test]
    fn test_types_characters_over_time() {
        let mut tw = writer(&["abc", "de"]);
        tw.start();
        tw.advance(0.0);
        assert_eq!(tw.visible_lines(), vec![""]);
        tw.advance(25.0);
        assert_eq!(tw.visible_lines(), vec!["ab"]);
        tw.advance(10.0);
        assert_eq!(tw.visible_lines(), vec!["abc"]);
        // Second line waits for the pause
        tw.advance(40.0);
        assert_eq!(tw.visible_lines(), vec!["abc"]);
        tw.advance(10.0);
        assert_eq!(tw.visible_lines(), vec!["abc", ""]);
        assert!(!tw.advance(10.0));
        assert_eq!(tw.visible_text(), "abc\nd");
        assert!(tw.advance(10.0), "completes on the final character");
        assert!(tw.is_finished());
        assert!(!tw.advance(100.0), "completion reported once");
        assert_eq!(tw.visible_text(), "abc\nde");
    }

    #[test]
    fn test_large_step_completes_in_order() {
        let mut tw = writer(&["one", "two", "three"]);
        tw.start();
        assert!(tw.advance(10_000.0));
        assert_eq!(tw.visible_lines(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_multibyte_text_slices_on_char_boundaries() {
        let mut tw = writer(&["รักนะ ❤"]);
        tw.start();
        tw.advance(30.0);
        assert_eq!(tw.visible_text(), "รัก");
        tw.advance(1000.0);
        assert_eq!(tw.visible_text(), "รักนะ ❤");
    }

    #[test]
    fn test_empty_message_finishes_immediately() {
        let mut tw = writer(&[]);
        tw.start();
        assert!(tw.advance(0.0));
        assert!(tw.visible_lines().is_empty());
    }
}
