/// Textual star labels and their numeric values, as rendered on review pages.
const RATING_STARS: [(&str, u8); 5] = [
    ("it was amazing", 5),
    ("really liked it", 4),
    ("liked it", 3),
    ("it was ok", 2),
    ("did not like it", 1),
];

/// Maps a rendered rating label to its star value.
///
/// Total over the six known inputs (five labels plus the empty string) and
/// fails closed: anything unrecognized is "no rating", never an error.
pub fn rating_from_text(label: &str) -> Option<u8> {
    RATING_STARS
        .iter()
        .find(|(text, _)| *text == label)
        .map(|(_, stars)| *stars)
}
