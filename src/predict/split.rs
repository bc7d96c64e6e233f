use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row positions of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub held_out: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out the first
/// `ceil(n * test_fraction)` positions (at least one, leaving at least one
/// for training). Positions index the caller's filtered row list.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Partition {
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let n_test = held_out_len(n, test_fraction);
    let train = order.split_off(n_test);
    Partition {
        train,
        held_out: order,
    }
}

fn held_out_len(n: usize, test_fraction: f64) -> usize {
    if n < 2 {
        return 0;
    }
    let wanted = (n as f64 * test_fraction).ceil() as usize;
    wanted.clamp(1, n - 1)
}
