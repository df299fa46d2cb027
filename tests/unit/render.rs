use super::*;
use crate::color::BlendingMode;
use crate::raster::Raster;

fn checker(extents: Rect) -> Raster {
    Raster::from_fn(extents, |x, y| {
        if (x + y) % 2 == 0 { Color::WHITE } else { Color::TRANSPARENT }
    })
}

#[test]
fn rectangle_fill_paints_background_under_transparent_pixels() {
    let mut off = Offscreen::with_size(4, 4, Color(0xFF11_1111)).unwrap();
    let src = checker(Rect::new(0, 0, 1, 1));
    {
        let mut s = Surface::new(&mut off, Rect::new(0, 0, 3, 3))
            .with_offset(1, 1)
            .with_bgcolor(Color::BLACK)
            .with_fill_mode(FillMode::Rectangle)
            .with_blending_mode(BlendingMode::Source);
        draw_stream(&mut s, &src);
    }
    assert_eq!(off.pixel(1, 1), Color::WHITE);
    assert_eq!(off.pixel(2, 1), Color::BLACK);
    assert_eq!(off.pixel(1, 2), Color::BLACK);
    assert_eq!(off.pixel(2, 2), Color::WHITE);
    assert_eq!(off.pixel(0, 0), Color(0xFF11_1111));
    assert_eq!(off.pixel(3, 3), Color(0xFF11_1111));
}

#[test]
fn visible_fill_leaves_transparent_pixels_alone() {
    let mut off = Offscreen::with_size(4, 4, Color(0xFF11_1111)).unwrap();
    let src = checker(Rect::new(0, 0, 3, 3));
    {
        let mut s = Surface::new(&mut off, Rect::new(0, 0, 3, 1));
        draw_stream(&mut s, &src);
    }
    assert_eq!(off.pixel(0, 0), Color::WHITE);
    assert_eq!(off.pixel(1, 0), Color(0xFF11_1111));
    assert_eq!(off.pixel(1, 1), Color::WHITE);
    // Clipped away.
    assert_eq!(off.pixel(0, 2), Color(0xFF11_1111));
}

#[test]
fn draw_object_skips_invisible_objects() {
    let mut off = Offscreen::with_size(2, 2, Color::TRANSPARENT).unwrap();
    let src = Raster::from_fn(Rect::new(5, 5, 6, 6), |_, _| Color::WHITE);
    let mut s = Surface::new(&mut off, Rect::new(0, 0, 1, 1));
    s.draw_object(&src);
    drop(s);
    assert!(off.pixels().iter().all(|c| c.is_transparent()));
}
