use super::*;

#[test]
fn empty_rect_has_no_area() {
    let r = Rect::default();
    assert!(r.is_empty());
    assert_eq!(r.width(), 0);
    assert_eq!(r.height(), 0);
    assert_eq!(r.area(), 0);
    assert!(Rect::new(5, 5, 4, 9).is_empty());
}

#[test]
fn dimensions_are_inclusive() {
    let r = Rect::new(3, 4, 9, 10);
    assert_eq!(r.width(), 7);
    assert_eq!(r.height(), 7);
    assert_eq!(r.area(), 49);
}

#[test]
fn intersect_of_disjoint_is_empty() {
    let a = Rect::new(0, 0, 2, 2);
    let b = Rect::new(5, 5, 8, 8);
    assert!(a.intersect(b).is_empty());
    assert_eq!(
        Rect::new(0, 0, 5, 5).intersect(Rect::new(3, -2, 9, 4)),
        Rect::new(3, 0, 5, 4)
    );
}

#[test]
fn extent_ignores_empty_operands() {
    let a = Rect::new(2, 2, 4, 4);
    assert_eq!(a.extent(Rect::empty()), a);
    assert_eq!(Rect::empty().extent(a), a);
    assert_eq!(a.extent(Rect::new(6, 6, 8, 8)), Rect::new(2, 2, 8, 8));
}

#[test]
fn translate_and_contains() {
    let r = Rect::new(0, 0, 3, 3).translate(5, 6);
    assert_eq!(r, Rect::new(5, 6, 8, 9));
    assert!(r.contains(5, 6));
    assert!(r.contains(8, 9));
    assert!(!r.contains(9, 9));
    assert!(r.contains_rect(Rect::new(6, 7, 7, 8)));
    assert!(!r.contains_rect(Rect::new(6, 7, 9, 8)));
    assert!(r.contains_rect(Rect::empty()));
}

#[test]
fn full_range_area_saturates() {
    let full = Rect::new(i16::MIN, i16::MIN, i16::MAX, i16::MAX);
    assert_eq!(full.width(), 65536);
    assert_eq!(full.checked_area(), None);
    assert_eq!(full.area(), u32::MAX);

    let almost = Rect::new(i16::MIN + 1, i16::MIN, i16::MAX, i16::MAX);
    assert_eq!(almost.checked_area(), Some(65535 * 65536));
    assert_eq!(Rect::empty().checked_area(), Some(0));
}

#[test]
fn translate_clamps_at_range_ends() {
    let r = Rect::new(32760, -5, 32767, 5);
    assert_eq!(r.translate(10, 0), Rect::new(32767, -5, 32767, 5));
    assert_eq!(
        Rect::new(-32760, 0, -32750, 0).translate(-20, 0),
        Rect::new(i16::MIN, 0, i16::MIN, 0)
    );
}

#[test]
fn untranslate_inverts_extreme_offsets() {
    let r = Rect::new(0, 0, 3, 2);
    let moved = r.translate(i16::MIN, i16::MIN);
    assert_eq!(moved, Rect::new(i16::MIN, i16::MIN, i16::MIN + 3, i16::MIN + 2));
    assert_eq!(moved.untranslate(i16::MIN, i16::MIN), r);
    assert_eq!(
        Rect::new(-3, 1, 0, 1).untranslate(i16::MAX, 0),
        Rect::new(i16::MIN, 1, i16::MIN + 1, 1)
    );
}
