use crate::interp::Bilinear;
use crate::light::light::*;

macro_const! {
    const DOC: &str = r"
Source brightness given on a pixel grid

The image is placed with its centre at `(x0, y0)` and interpolated bilinearly between the pixel
centres. The brightness outside the image is zero.

- Parameters: `x0`, `y0`, `image` (a map parameter)
- Configuration: `pixelscale`, image shape
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct PixelatedSource<T> {
    name: String,
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub image: Parameter<T>,
    pixelscale: T,
    shape: (usize, usize),
}

impl<T> PixelatedSource<T>
where
    T: Float,
{
    /// `shape` is `(ny, nx)` of the images supplied at evaluation time
    pub fn new(
        name: impl Into<String>,
        pixelscale: T,
        shape: (usize, usize),
    ) -> Result<Self, LensError> {
        if shape.0 < 2 || shape.1 < 2 {
            return Err(LensError::InvalidConfiguration(format!(
                "pixelated source needs at least 2 pixels per side, got {shape:?}"
            )));
        }
        if !(pixelscale > T::zero()) {
            return Err(LensError::InvalidConfiguration(format!(
                "pixelscale must be positive, got {pixelscale}"
            )));
        }
        Ok(Self {
            name: name.into(),
            x0: Parameter::new("x0", "arcsec", None),
            y0: Parameter::new("y0", "arcsec", None),
            image: Parameter::new_map("image", "flux", None),
            pixelscale,
            shape,
        })
    }

    pub fn pixelscale(&self) -> T {
        self.pixelscale
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> LightTrait<T> for PixelatedSource<T>
where
    T: Float,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.image]
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
        let image = self.image.resolve_map(module, pack)?;
        if image.dim() != self.shape {
            return Err(LensError::ShapeMismatch {
                actual: image.dim(),
                expected: self.shape,
            });
        }
        let interp = Bilinear::new(image.view(), self.pixelscale, x0, y0)?;
        Ok(interp.eval_grid(x, y))
    }
}
