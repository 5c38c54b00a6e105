//! Integer sequence helpers: gcd/lcm and difference-table extrapolation

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Least common multiple of every value; `1` for none
pub fn lcm_all<I>(values: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    values.into_iter().fold(1, lcm)
}

/// Endless continuation of a sequence by its difference table.
///
/// Exact whenever the samples come from a polynomial of degree lower than
/// their count. Only the last entry of each difference row is kept, so each
/// step costs one addition per row.
///
/// ```
/// use lavafall_solutions::utils::sequence::Extrapolation;
///
/// let squares: Vec<i64> = Extrapolation::new(&[0, 1, 4]).take(3).collect();
/// assert_eq!(squares, vec![9, 16, 25]);
/// ```
#[derive(Debug, Clone)]
pub struct Extrapolation {
    tails: Vec<i64>,
}

impl Extrapolation {
    pub fn new(values: &[i64]) -> Self {
        let mut tails = Vec::new();
        let mut row = values.to_vec();

        while let Some(&last) = row.last() {
            tails.push(last);
            if row.iter().all(|&v| v == 0) {
                break;
            }
            row = row.windows(2).map(|pair| pair[1] - pair[0]).collect();
        }

        Self { tails }
    }
}

impl Iterator for Extrapolation {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        for i in (0..self.tails.len().saturating_sub(1)).rev() {
            self.tails[i] += self.tails[i + 1];
        }
        Some(self.tails.first().copied().unwrap_or(0))
    }
}

/// Value `steps` positions past the last sample; the last sample for `0`
pub fn extrapolate(values: &[i64], steps: usize) -> i64 {
    match steps {
        0 => values.last().copied().unwrap_or(0),
        n => Extrapolation::new(values).nth(n - 1).unwrap_or(0),
    }
}

pub fn extrapolate_next(values: &[i64]) -> i64 {
    extrapolate(values, 1)
}

/// Value one position before the first sample
pub fn extrapolate_previous(values: &[i64]) -> i64 {
    let reversed: Vec<i64> = values.iter().rev().copied().collect();
    extrapolate_next(&reversed)
}
