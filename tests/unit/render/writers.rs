use super::*;
use crate::foundation::geometry::Rect;

#[derive(Default)]
struct Recorder {
    writes: Vec<usize>,
    colors: Vec<Color>,
    pixels: Vec<(i16, i16, Color)>,
}

impl DisplayOutput for Recorder {
    fn set_address(&mut self, _window: Rect, _mode: BlendingMode) {}

    fn write(&mut self, colors: &[Color]) {
        self.writes.push(colors.len());
        self.colors.extend_from_slice(colors);
    }

    fn write_pixels(&mut self, _mode: BlendingMode, xs: &[i16], ys: &[i16], colors: &[Color]) {
        self.writes.push(colors.len());
        for i in 0..colors.len() {
            self.pixels.push((xs[i], ys[i], colors[i]));
        }
    }
}

#[test]
fn color_writer_batches_and_flushes_on_finish() {
    let mut rec = Recorder::default();
    let mut w = ColorWriter::new(&mut rec);
    w.push(Color::WHITE);
    w.push_n(Color::BLACK, 100);
    w.finish();
    assert_eq!(rec.writes, vec![PIXEL_BUFFER_SIZE, 101 - PIXEL_BUFFER_SIZE]);
    assert_eq!(rec.colors.len(), 101);
    assert_eq!(rec.colors[0], Color::WHITE);
    assert!(rec.colors[1..].iter().all(|&c| c == Color::BLACK));
}

#[test]
fn color_writer_flushes_on_drop() {
    let mut rec = Recorder::default();
    {
        let mut w = ColorWriter::new(&mut rec);
        w.write(&[Color::WHITE; 3]);
    }
    assert_eq!(rec.writes, vec![3]);
}

#[test]
fn pixel_writer_keeps_coordinates_in_order() {
    let mut rec = Recorder::default();
    let mut w = PixelWriter::new(&mut rec, BlendingMode::Source);
    for i in 0..70i16 {
        w.write(i, -i, Color(i as u32));
    }
    w.finish();
    assert_eq!(rec.writes, vec![PIXEL_BUFFER_SIZE, 70 - PIXEL_BUFFER_SIZE]);
    assert_eq!(rec.pixels[65], (65, -65, Color(65)));
}
