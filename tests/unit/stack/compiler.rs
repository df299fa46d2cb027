use super::*;
use crate::stack::bytecode::Instruction::{self, *};

fn compile(bounds: Rect, inputs: &[(Rect, BlendingMode)], eliminate: bool) -> Vec<Instruction> {
    let opts = StackOpts {
        eliminate_dead_layers: eliminate,
    };
    let mut c = Composition::new(bounds, opts);
    for &(extents, mode) in inputs {
        c.add(extents, mode);
    }
    c.compile().instructions()
}

fn mask(bits: u16) -> InputMask {
    InputMask::from_bits(bits)
}

#[test]
fn single_input_inside_bounds() {
    let prg = compile(
        Rect::new(0, 0, 9, 9),
        &[(Rect::new(2, 3, 5, 6), BlendingMode::SourceOver)],
        true,
    );
    assert_eq!(
        prg,
        vec![
            Loop { height: 3 },
            Blank { count: 10 },
            Ret,
            Loop { height: 4 },
            Blank { count: 2 },
            WriteSingle { input: 0, count: 4 },
            Blank { count: 4 },
            Ret,
            Loop { height: 3 },
            Blank { count: 10 },
            Ret,
            Exit,
        ]
    );
}

#[test]
fn overhanging_input_gets_edge_skips() {
    let prg = compile(
        Rect::new(2, 2, 5, 5),
        &[(Rect::new(0, 0, 7, 3), BlendingMode::SourceOver)],
        true,
    );
    assert_eq!(
        prg,
        vec![
            Skip { input: 0, count: 16 },
            Loop { height: 2 },
            Skip { input: 0, count: 2 },
            WriteSingle { input: 0, count: 4 },
            Skip { input: 0, count: 2 },
            Ret,
            Loop { height: 2 },
            Blank { count: 4 },
            Ret,
            Exit,
        ]
    );
}

#[test]
fn input_outside_bounds_is_never_referenced() {
    let prg = compile(
        Rect::new(0, 0, 3, 3),
        &[
            (Rect::new(-10, -10, -5, -5), BlendingMode::SourceOver),
            (Rect::new(0, 0, 3, 3), BlendingMode::SourceOver),
        ],
        true,
    );
    assert_eq!(
        prg,
        vec![Loop { height: 4 }, WriteSingle { input: 1, count: 4 }, Ret, Exit]
    );
}

#[test]
fn source_mode_kills_inputs_below_it() {
    let inputs = [
        (Rect::new(0, 0, 3, 0), BlendingMode::SourceOver),
        (Rect::new(2, 0, 5, 0), BlendingMode::Source),
    ];
    let bounds = Rect::new(0, 0, 5, 0);
    assert_eq!(
        compile(bounds, &inputs, true),
        vec![
            Loop { height: 1 },
            WriteSingle { input: 0, count: 2 },
            Skip { input: 0, count: 2 },
            WriteSingle { input: 1, count: 2 },
            WriteSingle { input: 1, count: 2 },
            Ret,
            Exit,
        ]
    );
    assert_eq!(
        compile(bounds, &inputs, false),
        vec![
            Loop { height: 1 },
            WriteSingle { input: 0, count: 2 },
            Write { inputs: mask(0b11), count: 2 },
            WriteSingle { input: 1, count: 2 },
            Ret,
            Exit,
        ]
    );
}

#[test]
fn destination_clearing_inputs_over_nothing_are_dropped() {
    let r = Rect::new(0, 0, 1, 0);
    assert_eq!(
        compile(
            r,
            &[(r, BlendingMode::DestinationIn), (r, BlendingMode::SourceOver)],
            true
        ),
        vec![
            Loop { height: 1 },
            Skip { input: 0, count: 2 },
            WriteSingle { input: 1, count: 2 },
            Ret,
            Exit,
        ]
    );
    // Once something opaque-or-not is below, a clearing mode must stay.
    assert_eq!(
        compile(
            r,
            &[(r, BlendingMode::SourceOver), (r, BlendingMode::DestinationIn)],
            true
        ),
        vec![
            Loop { height: 1 },
            Write { inputs: mask(0b11), count: 2 },
            Ret,
            Exit,
        ]
    );
}

#[test]
fn clear_on_top_blanks_the_chunk() {
    let r = Rect::new(0, 0, 2, 0);
    assert_eq!(
        compile(
            r,
            &[
                (r, BlendingMode::SourceOver),
                (r, BlendingMode::Clear),
                (Rect::new(0, 0, 0, 0), BlendingMode::Xor),
            ],
            true
        ),
        vec![
            Loop { height: 1 },
            Skip { input: 0, count: 1 },
            Skip { input: 1, count: 1 },
            WriteSingle { input: 2, count: 1 },
            Skip { input: 0, count: 2 },
            Skip { input: 1, count: 2 },
            Blank { count: 2 },
            Ret,
            Exit,
        ]
    );
}

#[test]
fn program_size_ignores_destination_area() {
    let inputs = [
        (Rect::new(10, 10, 40, 40), BlendingMode::SourceOver),
        (Rect::new(30, 5, 90, 25), BlendingMode::SourceAtop),
        (Rect::new(-5, 35, 60, 70), BlendingMode::Source),
    ];
    let small = compile(Rect::new(0, 0, 99, 99), &inputs, true);
    let large_inputs: Vec<_> = inputs
        .iter()
        .map(|&(r, m)| {
            (
                Rect::new(r.x_min() * 4, r.y_min() * 4, r.x_max() * 4, r.y_max() * 4),
                m,
            )
        })
        .collect();
    let large = compile(Rect::new(0, 0, 399, 399), &large_inputs, true);
    assert_eq!(small.len(), large.len());
}
