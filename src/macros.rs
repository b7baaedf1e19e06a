#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`GrammemeSet`](crate::GrammemeSet) from string literals.
///
/// ```
/// use morphrules::grammemes;
///
/// let set = grammemes!["NOUN", "sing"];
/// assert!(set.contains("sing"));
/// ```
#[macro_export]
macro_rules! grammemes {
    () => {
        $crate::GrammemeSet::new()
    };
    ($($g:expr),+ $(,)?) => {
        <$crate::GrammemeSet as ::core::iter::FromIterator<&str>>::from_iter([$($g),+])
    };
}
