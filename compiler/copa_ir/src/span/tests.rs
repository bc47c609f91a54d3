use super::*;

#[test]
fn locations_order_by_file_then_span() {
    let a = Location::at(FileId::from_raw(0), 40);
    let b = Location::at(FileId::from_raw(1), 2);
    let c = Location::at(FileId::from_raw(0), 10);

    let mut all = vec![a, b, c];
    all.sort();
    assert_eq!(all, vec![c, a, b]);
}

#[test]
fn synthetic_location_sorts_last() {
    let real = Location::at(FileId::from_raw(7), 1_000);
    assert!(real < Location::SYNTHETIC);
    assert!(Location::SYNTHETIC.is_synthetic());
    assert!(!real.is_synthetic());
}

#[test]
fn span_from_oversized_range_is_an_error() {
    let too_big = (u32::MAX as usize) + 1;
    assert_eq!(
        Span::try_from_range(0..too_big),
        Err(SpanError::EndTooLarge(too_big))
    );
    assert_eq!(Span::try_from_range(3..9), Ok(Span::new(3, 9)));
}

#[test]
fn merge_covers_both_spans() {
    let merged = Span::new(5, 8).merge(Span::new(2, 6));
    assert_eq!(merged, Span::new(2, 8));
    assert!(merged.contains_span(Span::new(3, 4)));
    assert_eq!(merged.len(), 6);
}
