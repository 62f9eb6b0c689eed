use criterion::Criterion;
use std::hint::black_box;
use std::sync::Arc;
use strong_lensing::lenses::profiles::{Epl, Sie};
use strong_lensing::light::Sersic;
use strong_lensing::prelude::*;
use strong_lensing::{
    ConvolutionMode, FlatLambdaCdm, ForwardFlags, LensSource, LensSourceConfig, ParamPack, Profile,
    ThinLens,
};
use strong_lensing_test_util::gaussian_kernel;

fn pack() -> ParamPack<f64> {
    let mut pack = ParamPack::new();
    for (name, value) in [
        ("x0", 0.0),
        ("y0", 0.0),
        ("q", 0.8),
        ("phi", 0.4),
        ("Rein", 1.0),
        ("t", 1.1),
    ] {
        pack.insert("lens", name, value);
    }
    for (name, value) in [
        ("x0", 0.1),
        ("y0", -0.05),
        ("q", 0.6),
        ("phi", 1.0),
        ("n", 1.5),
        ("Re", 0.3),
        ("Ie", 1.0),
    ] {
        pack.insert("source", name, value);
    }
    pack
}

pub fn bench_forward(c: &mut Criterion) {
    let cosmology: Arc<dyn Cosmology<f64>> = Arc::new(FlatLambdaCdm::<f64>::default());
    let profiles: [(&str, Profile<f64>); 2] = [("SIE", Sie::new().into()), ("EPL", Epl::new().into())];
    let pack = pack();

    for (profile_name, profile) in profiles {
        let lens = ThinLens::new("lens", cosmology.clone(), profile).with_z_l(0.5);
        for (psf_mode, upsample_factor) in [
            (ConvolutionMode::Fft, 1),
            (ConvolutionMode::Fft, 4),
            (ConvolutionMode::Conv2d, 4),
        ] {
            let config = LensSourceConfig::new(0.05, 100)
                .with_z_s(1.5)
                .with_upsample_factor(upsample_factor)
                .with_psf(gaussian_kernel(11, 2.0))
                .with_psf_mode(psf_mode);
            let sim = LensSource::new("sim", lens.clone(), config)
                .unwrap()
                .with_source(Sersic::new("source"));
            c.bench_function(
                format!("LensSource {profile_name}: 100x100, upsample {upsample_factor}, {psf_mode:?}")
                    .as_str(),
                |b| b.iter(|| sim.forward(black_box(&pack), ForwardFlags::default())),
            );
        }
        let sim = LensSource::new(
            "sim",
            lens.clone(),
            LensSourceConfig::new(0.05, 100).with_z_s(1.5),
        )
        .unwrap()
        .with_source(Sersic::new("source"));
        let flags = ForwardFlags {
            quad_level: Some(3),
            ..Default::default()
        };
        c.bench_function(
            format!("LensSource {profile_name}: 100x100, quadrature level 3").as_str(),
            |b| b.iter(|| sim.forward(black_box(&pack), flags)),
        );
    }
}
