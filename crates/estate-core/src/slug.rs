// URL slugs from Vietnamese titles

/// Precomposed lowercase Vietnamese vowels (and `đ`) by ASCII base letter.
const FOLDS: [(&str, char); 7] = [
    ("àáạảãâầấậẩẫăằắặẳẵ", 'a'),
    ("èéẹẻẽêềếệểễ", 'e'),
    ("ìíịỉĩ", 'i'),
    ("òóọỏõôồốộổỗơờớợởỡ", 'o'),
    ("ùúụủũưừứựửữ", 'u'),
    ("ỳýỵỷỹ", 'y'),
    ("đ", 'd'),
];

fn fold(c: char) -> char {
    FOLDS
        .iter()
        .find(|(set, _)| set.contains(c))
        .map_or(c, |&(_, base)| base)
}

/// Combining diacritical marks, present when input arrives decomposed.
fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}')
}

/// Lowercase ASCII slug: diacritics folded, every run of other characters
/// collapsed to a single `-`, no leading or trailing `-`.
///
/// `"Căn hộ Đà Nẵng – Block A"` becomes `"can-ho-da-nang-block-a"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase).map(fold) {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_vietnamese_names() {
        assert_eq!(slugify("Căn hộ Đà Nẵng – Block A"), "can-ho-da-nang-block-a");
        assert_eq!(slugify("Khu đô thị Phú Mỹ Hưng"), "khu-do-thi-phu-my-hung");
        assert_eq!(slugify("Biệt thự Thảo Điền"), "biet-thu-thao-dien");
    }

    #[test]
    fn collapses_and_trims_separators() {
        assert_eq!(slugify("  --Sunrise   City!! 2024-- "), "sunrise-city-2024");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn decomposed_input_folds_too() {
        // "Hưng" with the horn as a combining mark.
        assert_eq!(slugify("Hu\u{031b}ng"), "hung");
    }
}
