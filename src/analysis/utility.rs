/// Running sum and count for an arithmetic mean.
///
/// Values are summed in the order they are pushed, so the same input always
/// yields the same bits.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the pushed values. Returns `None` when nothing was pushed.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }
}
