use crate::geometry::translate_rotate;
use crate::light::func::{brightness_sersic, k_lenstronomy, k_sersic};
use crate::light::light::*;

macro_const! {
    const DOC: &str = r"
Elliptical Sersic profile

$$
I(R) = I_e \exp\left(-b_n \left[\left(\frac{R}{R_e}\right)^{1/n} - 1\right]\right),
\quad R = \sqrt{x^2 + (y / q)^2} + s,
$$

where $(x, y)$ are aligned with the major axis rotated by `phi`. $b_n$ is the asymptotic
expansion of Ciotti & Bertin (1999), or the linear fit $1.9992 n - 0.3271$ used by lenstronomy.

- Parameters: `x0`, `y0`, `q` in $(0, 1]$, `phi` in $[0, \pi)$, `n`, `Re` (arcsec), `Ie`
- Configuration: softening `s`, choice of $b_n$
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Sersic<T> {
    name: String,
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub q: Parameter<T>,
    pub phi: Parameter<T>,
    pub n: Parameter<T>,
    pub re: Parameter<T>,
    pub ie: Parameter<T>,
    s: T,
    lenstronomy_k: bool,
}

impl<T> Sersic<T>
where
    T: Float,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x0: Parameter::new("x0", "arcsec", None),
            y0: Parameter::new("y0", "arcsec", None),
            q: Parameter::new("q", "unitless", None).with_valid(Valid::left_open(0.0, 1.0)),
            phi: Parameter::new("phi", "radians", None)
                .with_valid(Valid::cyclic(0.0, std::f64::consts::PI)),
            n: Parameter::new("n", "unitless", None).with_valid(Valid::greater_than(0.0)),
            re: Parameter::new("Re", "arcsec", None).with_valid(Valid::greater_than(0.0)),
            ie: Parameter::new("Ie", "flux", None).with_valid(Valid::at_least(0.0)),
            s: T::zero(),
            lenstronomy_k: false,
        }
    }

    pub fn with_softening(mut self, s: T) -> Self {
        self.s = s;
        self
    }

    /// Use the linear `b_n` approximation of lenstronomy
    pub fn with_lenstronomy_k(mut self, lenstronomy_k: bool) -> Self {
        self.lenstronomy_k = lenstronomy_k;
        self
    }

    pub fn k(&self, n: T) -> T {
        if self.lenstronomy_k {
            k_lenstronomy(n)
        } else {
            k_sersic(n)
        }
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> LightTrait<T> for Sersic<T>
where
    T: Float,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![
            &self.x0, &self.y0, &self.q, &self.phi, &self.n, &self.re, &self.ie,
        ]
    }

    fn brightness(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        check_shapes(&x, &y)?;
        let module = self.name.as_str();
        let x0 = self.x0.resolve_scalar(module, pack)?;
        let y0 = self.y0.resolve_scalar(module, pack)?;
        let q = self.q.resolve_scalar(module, pack)?;
        let phi = self.phi.resolve_scalar(module, pack)?;
        let n = self.n.resolve_scalar(module, pack)?;
        let re = self.re.resolve_scalar(module, pack)?;
        let ie = self.ie.resolve_scalar(module, pack)?;
        let k = self.k(n);
        Ok(Zip::from(&x).and(&y).map_collect(|&x, &y| {
            let (x, y) = translate_rotate(x, y, x0, y0, phi);
            let radius = x.hypot(y / q) + self.s;
            brightness_sersic(radius, n, re, ie, k)
        }))
    }
}
