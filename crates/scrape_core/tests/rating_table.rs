use scrape_core::rating_from_text;

#[test]
fn lookup_is_total_over_known_labels() {
    let known = [
        ("it was amazing", Some(5)),
        ("really liked it", Some(4)),
        ("liked it", Some(3)),
        ("it was ok", Some(2)),
        ("did not like it", Some(1)),
        ("", None),
    ];
    for (label, expected) in known {
        assert_eq!(rating_from_text(label), expected, "label {label:?}");
    }
}

#[test]
fn unrecognized_labels_fail_closed() {
    assert_eq!(rating_from_text("loved it"), None);
    assert_eq!(rating_from_text("It Was Amazing"), None);
    assert_eq!(rating_from_text("it was amazing "), None);
    assert_eq!(rating_from_text("5 stars"), None);
}
