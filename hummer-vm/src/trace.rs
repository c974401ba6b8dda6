//! Deterministic text trace of issue events.
//!
//! One line per event: `"[%2d] <payload>"` with the issue cycle, where the
//! payload is an instruction's canonical form or a stall diagnostic prefixed
//! with `-- `. The sink is separate from the `tracing` events the executor
//! emits; `Buffer` captures lines for inspection in tests.

/// Destination for trace lines.
#[derive(Debug, Clone, Default)]
pub enum TraceSink {
    /// Discard everything.
    #[default]
    Silent,
    /// Print each line to standard output.
    Stdout,
    /// Collect lines for later inspection.
    Buffer(Vec<String>),
}

impl TraceSink {
    /// Record an instruction issue at `cycle`.
    pub fn instruction(&mut self, cycle: u64, payload: impl std::fmt::Display) {
        self.push(cycle, format_args!("{payload}"));
    }

    /// Record a stall or debug diagnostic at `cycle`.
    pub fn diagnostic(&mut self, cycle: u64, payload: impl std::fmt::Display) {
        self.push(cycle, format_args!("-- {payload}"));
    }

    fn push(&mut self, cycle: u64, payload: std::fmt::Arguments<'_>) {
        match self {
            Self::Silent => {}
            Self::Stdout => println!("[{cycle:2}] {payload}"),
            Self::Buffer(lines) => lines.push(format!("[{cycle:2}] {payload}")),
        }
    }

    /// Collected lines; empty unless this is a `Buffer`.
    pub fn lines(&self) -> &[String] {
        match self {
            Self::Buffer(lines) => lines,
            _ => &[],
        }
    }

    /// Whether recording is a no-op, letting callers skip formatting work.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Silent)
    }
}
