mod common;
use common::*;

use agroscan::InvalidInputError;
use agroscan::screening::{rgb_from_dynamic, rgb_from_raw};
use image::{DynamicImage, Rgba, RgbaImage, RgbImage};

fn rejected_by(verdict: Verdict) -> Option<Check> {
    verdict.rejection().map(|r| r.check)
}

#[test]
fn test_all_black_is_underexposed() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();
    let img = solid(32, 24, BLACK);

    let report = filter.measure(&img)?;
    assert_eq!(report.underexposed_ratio, 1.0);
    assert!(!report.verdict.is_accept());
    assert!(!filter.is_plausible(&img)?);
    Ok(())
}

#[test]
fn test_all_white_is_overexposed() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();
    let img = solid(32, 24, WHITE);

    let report = filter.measure(&img)?;
    assert_eq!(report.overexposed_ratio, 1.0);
    assert_eq!(report.gray_ratio, 0.0);
    assert!(!filter.is_plausible(&img)?);
    Ok(())
}

#[test]
fn test_all_gray_is_metallic() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();
    let img = solid(16, 16, MID_GRAY);

    let report = filter.measure(&img)?;
    assert_eq!(report.gray_ratio, 1.0);
    assert_eq!(report.plant_ratio, 0.0);
    assert!(!filter.is_plausible(&img)?);
    Ok(())
}

#[test]
fn test_little_green_on_gray_fails_gray_test() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();
    let img = percent_mix(&[(10, MID_GREEN), (90, MID_GRAY)]);

    let verdict = filter.evaluate(&img)?;
    let rejection = verdict.rejection().expect("image should be rejected");
    assert_eq!(rejection.check, Check::Metallic);
    assert_eq!(rejection.ratio, 0.90);

    let report = filter.measure(&img)?;
    assert_eq!(report.plant_ratio, 0.10);
    Ok(())
}

#[test]
fn test_half_green_half_blue_is_accepted() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();
    let img = percent_mix(&[(50, MID_GREEN), (50, MID_BLUE)]);

    assert_eq!(filter.evaluate(&img)?, Verdict::Accept);

    let report = filter.measure(&img)?;
    assert_eq!(report.plant_ratio, 0.50);
    assert_eq!(report.gray_ratio, 0.0);
    assert_eq!(report.skin_ratio, 0.0);
    assert_eq!(report.overexposed_ratio, 0.0);
    assert_eq!(report.underexposed_ratio, 0.0);
    Ok(())
}

#[test]
fn test_same_image_same_verdict() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();
    let samples = [
        percent_mix(&[(50, MID_GREEN), (50, MID_BLUE)]),
        percent_mix(&[(10, MID_GREEN), (90, MID_GRAY)]),
        solid(8, 8, BLACK),
    ];

    for img in &samples {
        let before = img.clone();
        let first = filter.evaluate(img)?;
        let second = filter.evaluate(img)?;
        assert_eq!(first, second);
        assert_eq!(img, &before, "filter must not touch its input");
    }
    Ok(())
}

#[test]
fn test_plant_ratio_at_cutoff_is_accepted() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();

    let at_cutoff = percent_mix(&[(8, MID_GREEN), (92, MID_BLUE)]);
    assert_eq!(filter.measure(&at_cutoff)?.plant_ratio, 0.08);
    assert!(filter.is_plausible(&at_cutoff)?);

    let below = percent_mix(&[(7, MID_GREEN), (93, MID_BLUE)]);
    assert_eq!(rejected_by(filter.evaluate(&below)?), Some(Check::Vegetation));
    Ok(())
}

#[test]
fn test_gray_ratio_at_cutoff_is_accepted() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();

    let at_cutoff = percent_mix(&[(40, MID_GRAY), (60, MID_GREEN)]);
    assert!(filter.is_plausible(&at_cutoff)?);

    let above = percent_mix(&[(41, MID_GRAY), (59, MID_GREEN)]);
    assert_eq!(rejected_by(filter.evaluate(&above)?), Some(Check::Metallic));
    Ok(())
}

#[test]
fn test_skin_ratio_at_cutoff_is_accepted() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();

    let at_cutoff = percent_mix(&[(12, SKIN), (88, MID_GREEN)]);
    assert_eq!(filter.measure(&at_cutoff)?.skin_ratio, 0.12);
    assert!(filter.is_plausible(&at_cutoff)?);

    let above = percent_mix(&[(13, SKIN), (87, MID_GREEN)]);
    assert_eq!(rejected_by(filter.evaluate(&above)?), Some(Check::Skin));
    Ok(())
}

#[test]
fn test_overexposure_at_cutoff_is_accepted() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();

    let at_cutoff = percent_mix(&[(45, WHITE), (55, MID_GREEN)]);
    assert!(filter.is_plausible(&at_cutoff)?);

    let above = percent_mix(&[(46, WHITE), (54, MID_GREEN)]);
    assert_eq!(rejected_by(filter.evaluate(&above)?), Some(Check::Overexposure));
    Ok(())
}

#[test]
fn test_underexposure_at_cutoff_is_accepted() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();

    let at_cutoff = percent_mix(&[(55, BLACK), (45, MID_GREEN)]);
    assert!(filter.is_plausible(&at_cutoff)?);

    let above = percent_mix(&[(56, BLACK), (44, MID_GREEN)]);
    assert_eq!(rejected_by(filter.evaluate(&above)?), Some(Check::Underexposure));
    Ok(())
}

#[test]
fn test_first_failing_check_wins() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();

    // Fails vegetation and underexposure; vegetation is checked first
    let img = solid(4, 4, BLACK);
    assert_eq!(rejected_by(filter.evaluate(&img)?), Some(Check::Vegetation));

    // Enough plant color and little gray; only underexposure fails
    let img = percent_mix(&[(20, MID_GREEN), (20, MID_GRAY), (60, BLACK)]);
    let report = filter.measure(&img)?;
    assert!(report.plant_ratio >= filter.config().min_plant_ratio);
    assert!(report.gray_ratio <= filter.config().max_gray_ratio);
    assert!(report.underexposed_ratio > filter.config().max_underexposed_ratio);
    assert_eq!(rejected_by(filter.evaluate(&img)?), Some(Check::Underexposure));

    // Fails gray and overexposure; gray is checked first
    let img = percent_mix(&[(10, MID_GREEN), (42, MID_GRAY), (48, WHITE)]);
    let report = filter.measure(&img)?;
    assert!(report.gray_ratio > filter.config().max_gray_ratio);
    assert!(report.overexposed_ratio > filter.config().max_overexposed_ratio);
    assert_eq!(rejected_by(filter.evaluate(&img)?), Some(Check::Metallic));
    Ok(())
}

#[test]
fn test_measure_agrees_with_evaluate() -> anyhow::Result<()> {
    let filter = PlausibilityFilter::default();
    let samples = [
        solid(3, 3, WHITE),
        solid(3, 3, MID_GRAY),
        percent_mix(&[(30, SKIN), (70, MID_GREEN)]),
        percent_mix(&[(50, MID_GREEN), (50, MID_BLUE)]),
        percent_mix(&[(10, MID_GREEN), (90, MID_GRAY)]),
    ];

    for img in &samples {
        assert_eq!(filter.measure(img)?.verdict, filter.evaluate(img)?);
    }
    Ok(())
}

#[test]
fn test_thresholds_come_from_config() -> anyhow::Result<()> {
    let img = percent_mix(&[(50, MID_GREEN), (50, MID_BLUE)]);

    let strict = PlausibilityFilter::new(FilterConfig {
        min_plant_ratio: 0.6,
        ..FilterConfig::default()
    });
    let verdict = strict.evaluate(&img)?;
    let rejection = verdict.rejection().expect("stricter cutoff should reject");
    assert_eq!(rejection.check, Check::Vegetation);
    assert_eq!(rejection.cutoff, 0.6);

    // Widening the green band to cover blue hues counts every pixel as plant
    let mut config = FilterConfig::default();
    config.green_band.upper[0] = 125;
    let report = PlausibilityFilter::new(config).measure(&img)?;
    assert_eq!(report.plant_ratio, 1.0);
    Ok(())
}

#[test]
fn test_empty_image_is_invalid_input() {
    let filter = PlausibilityFilter::default();

    let err = filter.evaluate(&RgbImage::new(0, 0)).unwrap_err();
    assert_eq!(err, InvalidInputError::EmptyImage { width: 0, height: 0 });

    let err = filter.measure(&RgbImage::new(12, 0)).unwrap_err();
    assert!(matches!(err, InvalidInputError::EmptyImage { width: 12, height: 0 }));
}

#[test]
fn test_raw_buffer_must_match_dimensions() {
    let err = rgb_from_raw(2, 2, vec![0u8; 11]).unwrap_err();
    assert_eq!(
        err,
        InvalidInputError::BufferSize { width: 2, height: 2, expected: 12, actual: 11 }
    );

    let img = rgb_from_raw(2, 1, vec![64, 160, 64, 64, 64, 160]).expect("valid buffer");
    assert_eq!(img.dimensions(), (2, 1));

    assert!(matches!(
        rgb_from_raw(0, 5, Vec::new()),
        Err(InvalidInputError::EmptyImage { .. })
    ));
}

#[test]
fn test_alpha_is_flattened() -> anyhow::Result<()> {
    let rgba = RgbaImage::from_pixel(4, 4, Rgba([64, 160, 64, 10]));
    let rgb = rgb_from_dynamic(&DynamicImage::ImageRgba8(rgba))?;

    assert_eq!(rgb.get_pixel(0, 0).0, MID_GREEN);
    assert!(PlausibilityFilter::default().is_plausible(&rgb)?);
    Ok(())
}

#[test]
fn test_filter_is_shareable_across_threads() {
    let filter = PlausibilityFilter::default();
    let accepted = percent_mix(&[(50, MID_GREEN), (50, MID_BLUE)]);
    let rejected = solid(10, 10, MID_GRAY);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let filter = &filter;
                let img = if i % 2 == 0 { &accepted } else { &rejected };
                scope.spawn(move || filter.is_plausible(img).map(|ok| (i, ok)))
            })
            .collect();

        for handle in handles {
            let (i, ok) = handle.join().expect("thread panicked").expect("valid input");
            assert_eq!(ok, i % 2 == 0);
        }
    });
}
