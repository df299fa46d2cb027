use super::*;

fn ramp(n: u32) -> Vec<Color> {
    (0..n).map(|i| Color(0xFF00_0000 | i)).collect()
}

fn drain(stream: &mut dyn PixelStream, n: usize) -> Vec<u32> {
    let mut buf = vec![Color::TRANSPARENT; n];
    stream.read(&mut buf);
    buf.into_iter().map(|c| c.0 & 0xFFFF).collect()
}

#[test]
fn sub_rectangle_walks_clipped_rows() {
    // 5x4 source at (10, 20); clip to columns 11..=12, rows 21..=22.
    let pixels = ramp(20);
    let extents = Rect::new(10, 20, 14, 23);
    let mut sub = SubRectangle::new(SliceStream::new(&pixels), extents, Rect::new(11, 21, 12, 22));
    assert_eq!(drain(&mut sub, 4), vec![6, 7, 11, 12]);
}

#[test]
fn sub_rectangle_skip_crosses_lines() {
    let pixels = ramp(20);
    let extents = Rect::new(0, 0, 4, 3);
    let mut sub = SubRectangle::new(SliceStream::new(&pixels), extents, Rect::new(1, 0, 3, 3));
    sub.skip(4);
    assert_eq!(drain(&mut sub, 3), vec![7, 8, 11]);
}

#[test]
fn sub_rectangle_clip_larger_than_extents_is_identity() {
    let pixels = ramp(6);
    let extents = Rect::new(0, 0, 2, 1);
    let mut sub = SubRectangle::new(SliceStream::new(&pixels), extents, Rect::new(-5, -5, 50, 50));
    assert_eq!(drain(&mut sub, 6), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn buffering_stream_tracks_position_across_batches() {
    let pixels = ramp(200);
    let mut s = BufferingStream::new(Box::new(SliceStream::new(&pixels)), 200);
    assert_eq!(s.next().0 & 0xFFFF, 0);
    s.skip(10);
    let mut out = [Color::TRANSPARENT; 70];
    s.read(&mut out);
    assert_eq!(out[0].0 & 0xFFFF, 11);
    assert_eq!(out[69].0 & 0xFFFF, 80);
    s.skip(100);
    assert_eq!(s.next().0 & 0xFFFF, 181);
    assert_eq!(s.position(), 182);
}

#[test]
fn buffering_stream_canonicalizes_transparent_pixels() {
    let pixels = [Color(0x00FF_FFFF), Color(0x80FF_FFFF)];
    let mut s = BufferingStream::new(Box::new(SliceStream::new(&pixels)), 2);
    assert_eq!(s.next(), Color::TRANSPARENT);
    assert_eq!(s.next(), Color(0x80FF_FFFF));
}

#[test]
fn buffering_stream_blend_applies_mode() {
    let pixels = [Color(0xFF11_2233); 3];
    let mut s = BufferingStream::new(Box::new(SliceStream::new(&pixels)), 3);
    let mut out = [Color::WHITE, Color::TRANSPARENT, Color::BLACK];
    s.blend(&mut out, BlendingMode::DestinationOver);
    assert_eq!(out, [Color::WHITE, Color(0xFF11_2233), Color::BLACK]);
    assert_eq!(s.position(), 3);
}

#[test]
fn default_skip_reads_through() {
    struct Counter(u32);
    impl PixelStream for Counter {
        fn read(&mut self, buf: &mut [Color]) {
            for c in buf {
                *c = Color(self.0);
                self.0 += 1;
            }
        }
    }
    let mut s = Counter(0);
    s.skip(130);
    let mut one = [Color::TRANSPARENT];
    s.read(&mut one);
    assert_eq!(one[0], Color(130));
}
