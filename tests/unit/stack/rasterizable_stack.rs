use super::*;
use crate::raster::{Raster, SolidColor};

#[test]
fn inputs_are_placed_in_stack_coordinates() {
    let a = SolidColor::new(Rect::new(0, 0, 9, 9), Color::WHITE);
    let mut stack = RasterizableStack::new(Rect::new(0, 0, 20, 20));
    stack
        .add_input_clipped_offset(&a, Rect::new(5, 5, 30, 30), 2, 3)
        .unwrap()
        .with_mode(BlendingMode::SourceIn);
    let input = &stack.inputs()[0];
    assert_eq!(input.extents(), Rect::new(7, 8, 11, 12));
    assert_eq!((input.dx(), input.dy()), (2, 3));
    assert_eq!(input.blending_mode(), BlendingMode::SourceIn);
    assert_eq!(stack.natural_extents(), Rect::new(7, 8, 11, 12));
}

#[test]
fn read_colors_canonicalizes_sources() {
    let a = Raster::from_fn(Rect::new(0, 0, 1, 0), |x, _| {
        if x == 0 { Color(0x00FF_FFFF) } else { Color(0x4010_2030) }
    });
    let mut stack = RasterizableStack::new(Rect::new(0, 0, 1, 0));
    stack.add_input(&a).unwrap();
    let mut out = [Color::WHITE; 3];
    stack.read_colors(&[0, 1, 5], &[0, 0, 0], &mut out);
    assert_eq!(out, [Color::TRANSPARENT, Color(0x4010_2030), Color::TRANSPARENT]);
}

#[test]
fn read_colors_handles_more_than_one_batch() {
    let a = Raster::from_fn(Rect::new(0, 0, 199, 0), |x, _| Color(0xFF00_0000 | x as u32));
    let mut stack = RasterizableStack::new(Rect::new(0, 0, 199, 0));
    stack.add_input(&a).unwrap();
    let xs: Vec<i16> = (0..200).rev().collect();
    let ys = vec![0i16; 200];
    let mut out = vec![Color::TRANSPARENT; 200];
    stack.read_colors(&xs, &ys, &mut out);
    for (i, c) in out.iter().enumerate() {
        assert_eq!(c.0 & 0xFF_FFFF, 199 - i as u32);
    }
}

#[test]
fn empty_rect_is_not_uniform() {
    let stack = RasterizableStack::new(Rect::new(0, 0, 3, 3));
    let mut out = [Color::WHITE; 1];
    assert!(!stack.read_color_rect(Rect::empty(), &mut out));
}

#[test]
fn rect_outside_every_input_is_transparent() {
    let a = SolidColor::new(Rect::new(0, 0, 3, 3), Color::WHITE);
    let mut stack = RasterizableStack::new(Rect::new(0, 0, 20, 20));
    stack.add_input(&a).unwrap();
    let mut out = [Color::WHITE; 4];
    assert!(stack.read_color_rect(Rect::new(10, 10, 11, 11), &mut out));
    assert_eq!(out[0], Color::TRANSPARENT);
}

#[test]
fn read_color_rect_reuses_scratch_buffer() {
    let a = Raster::from_fn(Rect::new(0, 0, 7, 7), |x, y| Color(0xFF00_0000 | (x * 8 + y) as u32));
    let mut stack = RasterizableStack::new(Rect::new(0, 0, 7, 7));
    stack.add_input(&a).unwrap();

    let mut out = [Color::TRANSPARENT; 64];
    assert!(!stack.read_color_rect(Rect::new(0, 0, 7, 7), &mut out));
    let buf = stack.scratch.take();
    assert!(buf.len() >= 64);
    let capacity = buf.capacity();
    stack.scratch.set(buf);

    let mut small = [Color::TRANSPARENT; 4];
    assert!(!stack.read_color_rect(Rect::new(2, 3, 3, 4), &mut small));
    assert_eq!(small, [out[26], out[27], out[34], out[35]]);
    assert_eq!(stack.scratch.take().capacity(), capacity);
}

#[test]
fn oversized_input_is_rejected() {
    let full = SolidColor::new(Rect::new(i16::MIN, i16::MIN, i16::MAX, i16::MAX), Color::WHITE);
    let mut stack = RasterizableStack::new(Rect::new(0, 0, 3, 3));
    assert!(matches!(stack.add_input(&full), Err(StackError::Validation(_))));
    assert_eq!(stack.input_count(), 0);

    stack
        .add_input_clipped(&full, Rect::new(i16::MIN + 1, i16::MIN, i16::MAX, i16::MAX))
        .unwrap();
    let mut out = [Color::TRANSPARENT; 16];
    assert!(stack.read_color_rect(Rect::new(0, 0, 3, 3), &mut out));
    assert_eq!(out[0], Color::WHITE);
}
