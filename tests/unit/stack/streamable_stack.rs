use super::*;
use crate::color::Color;
use crate::raster::SolidColor;
use crate::render::Offscreen;

#[test]
fn draw_reuses_program_buffer() {
    let a = SolidColor::new(Rect::new(0, 0, 3, 3), Color::WHITE);
    let b = SolidColor::new(Rect::new(2, 2, 5, 5), Color(0x8000_0000));
    let mut stack = StreamableStack::new(Rect::new(0, 0, 5, 5));
    stack.add_input(&a).unwrap();
    stack.add_input(&b).unwrap();

    let mut screen = Offscreen::with_size(6, 6, Color::TRANSPARENT).unwrap();
    stack.draw_to(&mut Surface::new(&mut screen, Rect::new(0, 0, 5, 5)));
    let words = stack.scratch.take();
    assert_eq!(words, stack.compile_for(Rect::new(0, 0, 5, 5)).words());
    let capacity = words.capacity();
    stack.scratch.set(words);

    stack.draw_to(&mut Surface::new(&mut screen, Rect::new(0, 0, 5, 5)));
    let words = stack.scratch.take();
    assert_eq!(words.capacity(), capacity);
}

#[test]
fn prepare_opens_streams_only_for_overlapping_inputs() {
    let inside = SolidColor::new(Rect::new(0, 0, 3, 3), Color::WHITE);
    let outside = SolidColor::new(Rect::new(40, 40, 43, 43), Color::WHITE);
    let mut stack = StreamableStack::new(Rect::new(0, 0, 9, 9));
    stack.add_input(&inside).unwrap();
    stack
        .add_input(&outside)
        .unwrap()
        .with_mode(BlendingMode::Xor);

    let (composition, streams, modes) = stack.prepare(Rect::new(0, 0, 9, 9));
    assert_eq!(streams.len(), 2);
    assert_eq!(modes, vec![BlendingMode::SourceOver, BlendingMode::Xor]);
    assert_eq!(composition.block_count(), 2);
}

#[test]
fn clipped_input_streams_only_its_clip() {
    let a = crate::raster::Raster::from_fn(Rect::new(0, 0, 3, 3), |x, y| {
        Color(0xFF00_0000 | (y as u32) << 4 | x as u32)
    });
    let mut stack = StreamableStack::new(Rect::new(0, 0, 9, 9));
    stack
        .add_input_clipped_offset(&a, Rect::new(1, 1, 2, 2), 5, 0)
        .unwrap();
    assert_eq!(stack.inputs()[0].extents(), Rect::new(6, 1, 7, 2));

    let mut stream = stack.create_stream_clipped(Rect::new(6, 1, 7, 2));
    let mut out = [Color::TRANSPARENT; 4];
    stream.read(&mut out);
    assert_eq!(
        out.map(|c| c.0 & 0xFF),
        [0x11, 0x12, 0x21, 0x22]
    );
}

#[test]
fn opts_round_trip_through_builder() {
    let stack = StreamableStack::new(Rect::new(0, 0, 1, 1)).with_opts(StackOpts {
        eliminate_dead_layers: false,
    });
    assert!(!stack.opts().eliminate_dead_layers);
    assert!(StreamableStack::new(Rect::empty()).opts().eliminate_dead_layers);
}
