use tracing::debug;

/// Trading-session state controlling whether live quotes reach the strategy
///
/// Starts closed. Session-start opens it and session-end closes it; only
/// quote updates are held back while closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionGate {
    opened: bool,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        if !self.opened {
            debug!("market session opened");
        }
        self.opened = true;
    }

    pub fn close(&mut self) {
        if self.opened {
            debug!("market session closed");
        }
        self.opened = false;
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Whether a quote update may be forwarded right now
    pub fn admits_quotes(&self) -> bool {
        self.opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_transitions() {
        let mut gate = SessionGate::new();
        assert!(!gate.admits_quotes());

        gate.open();
        gate.open();
        assert!(gate.is_open());

        gate.close();
        assert!(!gate.admits_quotes());
    }
}
