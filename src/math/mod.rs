pub mod matrix;

pub use matrix::Matrix;

/// Sign with `sign(0) == 0`, unlike `f64::signum`.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
