use super::*;
use crate::raster::Raster;

fn numbered(extents: Rect) -> Raster {
    Raster::from_fn(extents, |x, y| {
        Color(0xFF00_0000 | ((y as u16 as u32) << 8) | (x as u8 as u32))
    })
}

#[test]
fn stream_matches_random_reads_in_row_major_order() {
    let r = numbered(Rect::new(-2, 3, 1, 5));
    let rect = Rect::new(-1, 4, 1, 5);
    let mut s = rasterizable_stream(&r, rect);
    let mut buf = [Color::TRANSPARENT; 6];
    s.read(&mut buf);
    let mut expected = [Color::TRANSPARENT; 6];
    r.read_colors(&[-1, 0, 1, -1, 0, 1], &[4, 4, 4, 5, 5, 5], &mut expected);
    assert_eq!(buf, expected);
}

#[test]
fn stream_skip_moves_across_rows() {
    let r = numbered(Rect::new(0, 0, 2, 2));
    let mut s = rasterizable_stream(&r, Rect::new(0, 0, 2, 2));
    s.skip(4);
    let mut one = [Color::TRANSPARENT];
    s.read(&mut one);
    assert_eq!(one[0], Color(0xFF00_0101));
}

#[test]
fn default_read_color_rect_detects_uniformity() {
    let r = Raster::from_fn(Rect::new(0, 0, 3, 3), |x, _| {
        if x < 2 { Color::WHITE } else { Color::BLACK }
    });
    let mut out = [Color::TRANSPARENT; 16];
    assert!(r.read_color_rect(Rect::new(0, 0, 1, 3), &mut out));
    assert_eq!(out[0], Color::WHITE);
    assert!(!r.read_color_rect(Rect::new(1, 0, 2, 1), &mut out));
    assert_eq!(&out[..4], &[Color::WHITE, Color::BLACK, Color::WHITE, Color::BLACK]);
}
