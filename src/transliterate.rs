//! ASCII-safe file name normalization.
//!
//! Ukrainian letters in the base name are transliterated to Latin, anything
//! else outside `[A-Za-z0-9_]` becomes `_`. The extension chain after the
//! first dot is kept verbatim.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

const ALPHABET: [(char, &str); 34] = [
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('ґ', "g"),
    ('д', "d"),
    ('е', "e"),
    ('є', "je"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "y"),
    ('і', "i"),
    ('ї', "ji"),
    ('й', "j"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "h"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ь', ""),
    ('ю', "ju"),
    ('я', "ja"),
    // Modifier-letter apostrophe (U+02BC) from Ukrainian orthography
    ('ʼ', ""),
];

static TRANSLATION: LazyLock<HashMap<char, String>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(ALPHABET.len() * 2);
    for (letter, latin) in ALPHABET {
        table.insert(letter, latin.to_string());
        if let Some(upper) = letter.to_uppercase().next()
            && upper != letter
        {
            table.insert(upper, latin.to_uppercase());
        }
    }
    table
});

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static pattern is valid"));

const ARCHIVE_SUFFIXES: [&str; 3] = [".zip", ".tar", ".gz"];

/// Transliterates a single string through the alphabet table.
///
/// Characters outside the table are passed through unchanged.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match TRANSLATION.get(&c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Produces the ASCII-safe form of a file name.
///
/// # Examples
///
/// ```
/// use clean_folder::transliterate::normalize;
///
/// assert_eq!(normalize("photo.JPG"), "photo.JPG");
/// assert_eq!(normalize("Привіт світ.txt"), "Pryvit_svit.txt");
/// assert_eq!(normalize("архів.tar.gz"), "arhiv.tar.gz");
/// assert_eq!(normalize("README"), "README");
/// ```
pub fn normalize(name: &str) -> String {
    let (base, extension) = match name.split_once('.') {
        Some((base, extension)) => (base, Some(extension)),
        None => (name, None),
    };

    let transliterated = transliterate(base);
    let sanitized = NON_WORD.replace_all(&transliterated, "_");

    match extension {
        Some(extension) => format!("{}.{}", sanitized, extension),
        None => sanitized.into_owned(),
    }
}

/// Strips trailing `.zip`, `.tar` and `.gz` suffixes, ignoring case.
///
/// Only suffixes are removed, so `a.tar.gz` becomes `a` while `zip_codes.zip`
/// keeps its base intact. A name that consists of nothing but a suffix is
/// returned unchanged.
pub fn strip_archive_suffixes(name: &str) -> &str {
    let mut stem = name;
    while let Some(stripped) = ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| strip_suffix_ignore_ascii_case(stem, suffix))
    {
        stem = stripped;
    }
    stem
}

fn strip_suffix_ignore_ascii_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if name.len() <= suffix.len() {
        return None;
    }
    let split = name.len() - suffix.len();
    if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(suffix) {
        Some(&name[..split])
    } else {
        None
    }
}

/// Name of the folder an archive is unpacked into.
///
/// # Examples
///
/// ```
/// use clean_folder::transliterate::archive_dir_name;
///
/// assert_eq!(archive_dir_name("a.zip"), "a");
/// assert_eq!(archive_dir_name("Фото 2020.tar.gz"), "Foto_2020");
/// ```
pub fn archive_dir_name(file_name: &str) -> String {
    normalize(strip_archive_suffixes(file_name))
}
