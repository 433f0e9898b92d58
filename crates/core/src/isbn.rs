//! ISBN selection: pick the single ISBN to publish for an object.

/// Strip the separators catalogues put in ISBNs (spaces and hyphens).
pub fn normalize(isbn: &str) -> String {
    isbn.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// True when the candidate is ISBN-13 shaped after normalization.
pub fn is_isbn13(isbn: &str) -> bool {
    normalize(isbn).len() == 13
}

/// First ISBN-13 candidate in list order, else the first candidate.
/// The original (un-normalized) text is returned.
pub fn select_preferred(isbns: &[String]) -> Option<&str> {
    isbns
        .iter()
        .find(|isbn| is_isbn13(isbn))
        .or_else(|| isbns.first())
        .map(String::as_str)
}
