use std::collections::VecDeque;

/// Time-stamped amounts over a trailing window, for rolling DPS / HPS.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputWindow {
    window: f32,
    records: VecDeque<(f32, f32)>,
}

impl ThroughputWindow {
    pub fn new(window_seconds: f32) -> Self {
        Self {
            window: window_seconds.max(f32::EPSILON),
            records: VecDeque::new(),
        }
    }

    pub fn window(&self) -> f32 {
        self.window
    }

    pub fn record(&mut self, now: f32, amount: f32) {
        self.records.push_back((now, amount));
    }

    /// Drop everything older than the window relative to `now`.
    pub fn prune(&mut self, now: f32) {
        while let Some(&(t, _)) = self.records.front() {
            if now - t > self.window {
                self.records.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn total(&self) -> f32 {
        self.records.iter().map(|&(_, amount)| amount).sum()
    }

    /// Amount per second over the window.
    pub fn rate(&self) -> f32 {
        self.total() / self.window
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_keeps_records_on_the_window_edge() {
        let mut w = ThroughputWindow::new(5.0);
        w.record(0.0, 10.0);
        w.record(2.0, 20.0);
        w.prune(5.0);
        assert_eq!(w.len(), 2);
        w.prune(6.5);
        assert_eq!(w.len(), 1);
        assert!((w.rate() - 4.0).abs() < 1e-6);
    }
}
