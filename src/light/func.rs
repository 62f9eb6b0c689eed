//! Surface brightness formulas

use crate::float_trait::Float;

/// Sersic `b_n` from the asymptotic expansion of Ciotti & Bertin (1999)
///
/// `b_n` makes the effective radius enclose half of the total light.
pub fn k_sersic<T: Float>(n: T) -> T {
    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n3 * n;
    T::two() * n - T::cast(1.0 / 3.0) + T::cast(4.0 / 405.0) / n + T::cast(46.0 / 25515.0) / n2
        + T::cast(131.0 / 1148175.0) / n3
        - T::cast(2194697.0 / 30690717750.0) / n4
}

/// Linear approximation of `b_n` used by lenstronomy
pub fn k_lenstronomy<T: Float>(n: T) -> T {
    T::cast(1.9992) * n - T::cast(0.3271)
}

/// Sersic brightness at the elliptical radius `radius`
///
/// `I = Ie exp(-k ((R / Re)^(1/n) - 1))`
#[inline]
pub fn brightness_sersic<T: Float>(radius: T, n: T, re: T, ie: T, k: T) -> T {
    ie * (-k * ((radius / re).powf(n.recip()) - T::one())).exp()
}
