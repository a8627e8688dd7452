use super::*;

#[test]
fn debug_shows_byte_range() {
    let span = Span { start: 2, end: 7 };
    assert_eq!(format!("{span:?}"), "2..7");
    assert_eq!(Span::default(), Span::DUMMY);
}
