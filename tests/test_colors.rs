//! Color model conversions and the number format used for color operands.

use proptest::prelude::*;
use quire::color::{Cmyk, Grayscale, Hsv, Rgb};
use quire::writer::{format_real, ContentStreamBuilder};
use quire::Color;

#[test]
fn test_cmyk_and_hsv_to_rgb() {
    assert_eq!(Cmyk::new(0.0, 1.0, 1.0, 0.0).unwrap().to_rgb(), Rgb::new(255, 0, 0));
    assert_eq!(Hsv::new(0.0, 1.0, 1.0).unwrap().to_rgb(), Rgb::new(255, 0, 0));
    assert_eq!(Hsv::new(120.0, 1.0, 1.0).unwrap().to_rgb(), Rgb::new(0, 255, 0));
    assert_eq!(Grayscale::new(0.0).unwrap().to_rgb(), Rgb::new(0, 0, 0));
}

#[test]
fn test_out_of_range_components() {
    assert!(Cmyk::new(1.5, 0.0, 0.0, 0.0).is_err());
    assert!(Hsv::new(400.0, 0.5, 0.5).is_err());
    assert!(Grayscale::new(-0.1).is_err());
}

#[test]
fn test_fill_color_operands() {
    let mut ops = ContentStreamBuilder::new();
    ops.set_fill_color(Color::Cmyk(Cmyk::new(0.0, 1.0, 1.0, 0.0).unwrap()));
    let text = String::from_utf8(ops.build().unwrap()).unwrap();
    assert_eq!(text, "1 0 0 rg\n");
}

proptest! {
    #[test]
    fn prop_rgb_survives_hsv(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let rgb = Rgb::new(r, g, b);
        prop_assert_eq!(rgb.to_hsv().to_rgb(), rgb);
    }

    #[test]
    fn prop_real_format_is_close_and_trimmed(value in -1.0e6f64..1.0e6) {
        let text = format_real(value);
        let parsed: f64 = text.parse().unwrap();
        prop_assert!((parsed - value).abs() <= 5e-8 + 1e-15 * value.abs());
        prop_assert!(!text.ends_with('.'));
        if text.contains('.') {
            prop_assert!(!text.ends_with('0'));
            prop_assert!(text.split('.').nth(1).unwrap().len() <= 7);
        }
        prop_assert!(!text.contains('e'));
    }
}
