/// Aggregated view of quiz progress, useful for progress bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl QuizProgress {
    /// Fraction of the quiz reached so far, counting the question on screen.
    #[must_use]
    pub fn position_ratio(&self, current_index: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = (current_index + 1).min(self.total) as f64 / self.total as f64;
        ratio
    }
}
