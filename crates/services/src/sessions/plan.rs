use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

/// Play order for one attempt, as indices into the quiz's question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPlan {
    order: Vec<usize>,
}

impl QuizPlan {
    /// Questions in authored order.
    #[must_use]
    pub fn sequential(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
        }
    }

    /// A random permutation drawn from `rng`.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.as_mut_slice().shuffle(rng);
        Self { order }
    }

    /// Sequential order, or a thread-rng shuffle when `shuffle` is set.
    #[must_use]
    pub fn build(len: usize, shuffle: bool) -> Self {
        if shuffle {
            let mut rng = rng();
            Self::shuffled(len, &mut rng)
        } else {
            Self::sequential(len)
        }
    }

    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn into_order(self) -> Vec<usize> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn sequential_keeps_authored_order() {
        assert_eq!(QuizPlan::sequential(4).order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn shuffled_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = QuizPlan::shuffled(10, &mut rng);
        let mut sorted = plan.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_gives_same_order() {
        let a = QuizPlan::shuffled(8, &mut StdRng::seed_from_u64(42));
        let b = QuizPlan::shuffled(8, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn build_without_shuffle_is_sequential() {
        assert_eq!(QuizPlan::build(3, false), QuizPlan::sequential(3));
        assert_eq!(QuizPlan::build(3, true).len(), 3);
    }
}
