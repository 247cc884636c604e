use rand::distr::Alphanumeric;
use rand::Rng;

/// Random string of `len` ASCII letters and digits.
pub fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
