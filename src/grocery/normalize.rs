/// Canonicalize a free-text ingredient name for comparison.
///
/// Lowercases, turns anything other than `a-z`, `0-9`, whitespace and `-`
/// into a space, drops single-character tokens and joins the rest with single
/// spaces. This has to stay identical to the normalizer that generated the
/// reference index, since exact lookups compare normalized strings.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize("Ground Beef"), "ground beef");
        assert_eq!(normalize("  2% Milk!! "), "milk");
        assert_eq!(normalize("Half-and-Half"), "half-and-half");
        assert_eq!(normalize("Chicken, breast (boneless)"), "chicken breast boneless");
    }

    #[test]
    fn test_drops_single_char_tokens() {
        assert_eq!(normalize("a b cd e"), "cd");
        assert_eq!(normalize("x"), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t"), "");
        assert_eq!(normalize("%%%"), "");
    }

    #[test]
    fn test_non_ascii_letters_become_separators() {
        assert_eq!(normalize("Jalapeño peppers"), "jalape peppers");
        assert_eq!(normalize("crème fraîche"), "cr me fra che");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Ground Beef",
            "  2% Milk!! ",
            "Jalapeño peppers",
            "a-b c_d",
            "ÉCLAIR x yz",
            "",
            "tomatoes, diced (14.5 oz can)",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
