/// Bounded ring buffer of recent instantaneous frame rates.
///
/// Once full, each push overwrites the oldest sample.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    samples: Vec<f32>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameHistory {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: vec![0.0; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn push(&mut self, fps: f32) {
        self.samples[self.index] = fps;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn len(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let (older, newer) = if self.filled {
            (&self.samples[self.index..], &self.samples[..self.index])
        } else {
            (&self.samples[..self.index], &self.samples[..0])
        };
        older.iter().chain(newer).copied()
    }

    /// Ascending copy of the samples.
    pub fn sorted_snapshot(&self) -> Vec<f32> {
        let mut sorted: Vec<f32> = self.iter().collect();
        sorted.sort_by(f32::total_cmp);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_history() {
        let mut h = FrameHistory::new(3);
        h.push(10.0);
        h.push(20.0);
        h.push(30.0);
        assert_eq!(h.len(), 3);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let capacity = 500;
        let mut h = FrameHistory::new(capacity);
        for i in 0..=capacity {
            h.push(i as f32 + 1.0);
        }
        assert_eq!(h.len(), capacity);
        let samples: Vec<f32> = h.iter().collect();
        assert_eq!(samples.first(), Some(&2.0));
        assert_eq!(samples.last(), Some(&(capacity as f32 + 1.0)));
    }

    #[test]
    fn iterates_oldest_first_after_wrap() {
        let mut h = FrameHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            h.push(v);
        }
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn sorted_snapshot_is_ascending() {
        let mut h = FrameHistory::new(8);
        for v in [60.0, 30.0, 144.0, 59.0] {
            h.push(v);
        }
        assert_eq!(h.sorted_snapshot(), vec![30.0, 59.0, 60.0, 144.0]);
    }

    #[test]
    fn empty_history() {
        let mut h = FrameHistory::new(0);
        assert!(h.is_empty());
        assert!(h.sorted_snapshot().is_empty());
        h.push(5.0);
        h.push(6.0);
        assert_eq!(h.len(), 1);
        assert_eq!(h.sorted_snapshot(), vec![6.0]);
    }
}
