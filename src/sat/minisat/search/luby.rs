// Finite subsequences of the Luby sequence: 1 1 2 1 1 2 4 1 1 2 1 1 2 4 8 ...
// scaled as powers of `y`.
pub fn luby(y: f64, mut x: u32) -> f64 {
    // Find the finite subsequence that contains index 'x', and the
    // size of that subsequence:
    let mut size = 1;
    let mut seq = 0;

    while size < x + 1 {
        seq += 1;
        size = 2 * size + 1;
    }

    while size - 1 != x {
        size = (size - 1) >> 1;
        seq -= 1;
        x %= size;
    }

    y.powi(seq)
}


#[cfg(test)]
mod tests {
    use super::luby;

    #[test]
    fn prefix_of_the_sequence() {
        let seq: Vec<f64> = (0..15).map(|i| luby(2.0, i)).collect();
        assert_eq!(seq, vec![1., 1., 2., 1., 1., 2., 4., 1., 1., 2., 1., 1., 2., 4., 8.]);
    }
}
