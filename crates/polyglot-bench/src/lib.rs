//! Benchmark inputs for the Polyglot boundary.
//!
//! - [`int_array`]: deterministic array whose sum never overflows
//! - [`text_of_len`]: mixed ASCII / multi-byte text of a given char count

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// `len` integers in `-500..500`, sum bounded by `500 * len`.
pub fn int_array(len: usize) -> Vec<i32> {
    (0..len).map(|i| (i % 1000) as i32 - 500).collect()
}

/// `chars` characters cycling through ASCII and two-byte letters.
pub fn text_of_len(chars: usize) -> String {
    const ALPHABET: [char; 8] = ['a', 'b', 'é', 'c', 'ø', 'd', 'ß', ' '];
    (0..chars).map(|i| ALPHABET[i % ALPHABET.len()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_core::{sum_array, OverflowPolicy};

    #[test]
    fn inputs_are_well_formed() {
        let items = int_array(100_000);
        assert!(sum_array(&items, OverflowPolicy::Reject).is_ok());
        assert_eq!(text_of_len(80).chars().count(), 80);
        assert!(text_of_len(80).len() > 80);
    }
}
