//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value between the given minimum and maximum.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Apply polynomial coefficients to a value.
///
/// The order of the coefficients is highest power first, i.e. if there are 3
/// coefficients it's a 2nd order polynomial with c[0]*x^2 + c[1]*x + c[2].
pub fn poly_val<T>(value: T, coeffs: &[T]) -> T
where
    T: Float + std::ops::AddAssign
{
    let mut res = T::from(0).unwrap();

    for i in 0..(coeffs.len() as i32) {
        res += value.powi(coeffs.len() as i32 - 1 - i) * coeffs[i as usize];
    }

    res
}

/// Wrap an angle into the canonical range (-pi, pi].
pub fn wrap_angle_pi<T>(angle: T) -> T
where
    T: Float + std::ops::Rem
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid can land exactly on the open end of the range
    if wrapped <= -pi_t {
        wrapped + tau_t
    }
    else {
        wrapped
    }
}

/// Get the signed shortest angular distance from `a` to `b`.
///
/// The result is in (-pi, pi], positive when the shortest rotation from `a`
/// to `b` is anticlockwise.
pub fn ang_dist<T>(a: T, b: T) -> T
where
    T: Float + std::ops::Rem
{
    wrap_angle_pi(b - a)
}

/// The cardinal sine `sin(x)/x`, with the limit value of 1 at `x = 0`.
///
/// Near zero the quotient is replaced by its Taylor expansion to avoid the
/// 0/0 form.
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-9 {
        1.0 - x * x / 6.0
    }
    else {
        x.sin() / x
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Rem
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() { r + rhs.abs() } else { r }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_wrap_angle_pi() {
        assert!((wrap_angle_pi(0f64)).abs() < 1e-12);
        assert!((wrap_angle_pi(TAU)).abs() < 1e-12);
        assert!((wrap_angle_pi(PI) - PI).abs() < 1e-12);
        assert!((wrap_angle_pi(-PI) - PI).abs() < 1e-12);
        assert!((wrap_angle_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_ang_dist() {
        assert!((ang_dist(1f64, 2f64) - 1f64).abs() < 1e-12);
        assert!((ang_dist(2f64, 1f64) + 1f64).abs() < 1e-12);
        assert!((ang_dist(0f64, TAU)).abs() < 1e-12);
        // Shortest way from +170 deg to -170 deg is +20 deg through the wrap
        let a = 170f64.to_radians();
        let b = -170f64.to_radians();
        assert!((ang_dist(a, b) - 20f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_sinc() {
        assert_eq!(sinc(0.0), 1.0);
        assert!((sinc(1.0) - 1f64.sin()).abs() < 1e-12);
        assert!((sinc(1e-12) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lin_map() {
        assert!((lin_map((0.0, 1.0), (0.0, 10.0), 0.5) - 5.0).abs() < 1e-12);
        assert!((lin_map((-1.0, 1.0), (0.0, 1.0), 0.0) - 0.5).abs() < 1e-12);
    }
}
