//! String utilities.

/// Length of `s` in UTF-8 bytes, which is also the number of bytes before
/// the terminator in its C representation.
pub fn string_length(s: &str) -> usize {
    s.len()
}

/// Reverse `s` by Unicode scalar value.
///
/// Combining sequences are not kept together, but the result is always
/// valid UTF-8 and reversing twice yields the input.
pub fn reverse_string(s: &str) -> String {
    s.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn length_counts_bytes() {
        assert_eq!(string_length("Hello, World!"), 13);
        assert_eq!(string_length(""), 0);
        assert_eq!(string_length("héllo"), 6);
    }

    #[test]
    fn reverse_greeting() {
        assert_eq!(reverse_string("Hello, World!"), "!dlroW ,olleH");
        assert_eq!(reverse_string("hello"), "olleh");
        assert_eq!(reverse_string(""), "");
    }

    #[test]
    fn reverse_multibyte() {
        assert_eq!(reverse_string("añb"), "bña");
        assert_eq!(reverse_string("日本"), "本日");
    }

    proptest! {
        #[test]
        fn reverse_is_an_involution(s in ".*") {
            prop_assert_eq!(reverse_string(&reverse_string(&s)), s);
        }

        #[test]
        fn reverse_preserves_length(s in ".*") {
            prop_assert_eq!(string_length(&reverse_string(&s)), string_length(&s));
        }
    }
}
