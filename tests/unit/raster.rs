use super::*;

#[test]
fn raster_validates_pixel_count() {
    let err = Raster::new(Rect::new(0, 0, 1, 1), vec![Color::WHITE; 3]).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
    assert!(Raster::new(Rect::new(0, 0, 1, 1), vec![Color::WHITE; 4]).is_ok());
}

#[test]
fn raster_reads_transparent_outside_extents() {
    let r = Raster::from_fn(Rect::new(1, 1, 2, 2), |_, _| Color::WHITE);
    let mut out = [Color::BLACK; 3];
    r.read_colors(&[0, 1, 3], &[1, 1, 2], &mut out);
    assert_eq!(out, [Color::TRANSPARENT, Color::WHITE, Color::TRANSPARENT]);
}

#[test]
fn clipped_raster_stream_yields_sub_rectangle() {
    let r = Raster::from_fn(Rect::new(0, 0, 3, 3), |x, y| Color((y * 4 + x) as u32 | 0xFF00_0000));
    let mut s = r.create_stream_clipped(Rect::new(2, 1, 9, 2));
    let mut buf = [Color::TRANSPARENT; 4];
    s.read(&mut buf);
    let low: Vec<u32> = buf.iter().map(|c| c.0 & 0xFF).collect();
    assert_eq!(low, vec![6, 7, 10, 11]);
}

#[test]
fn solid_color_fast_path_reports_uniform() {
    let s = SolidColor::new(Rect::new(0, 0, 9, 9), Color::WHITE);
    let mut out = [Color::TRANSPARENT; 4];
    assert!(s.read_color_rect(Rect::new(2, 2, 3, 3), &mut out));
    assert_eq!(out[0], Color::WHITE);
    assert!(!s.read_color_rect(Rect::new(9, 9, 10, 10), &mut out));
    assert_eq!(out, [Color::WHITE, Color::TRANSPARENT, Color::TRANSPARENT, Color::TRANSPARENT]);
}
