//! Base substitution matrix from the CRAM compression header
//!
//! CRAM records a mismatching base not as the base itself but as a
//! 2-bit substitution code relative to the reference base. The mapping
//! from code to base is carried in the compression header as five
//! packed bytes, one per reference base in the order A, C, G, T, N.
//!
//! # Packed Layout
//!
//! Each byte holds four 2-bit codes, MSB first. The i-th 2-bit group
//! (i = 0..3) stores the code assigned to the i-th entry of that
//! reference base's fixed substitution order:
//!
//! ```text
//! reference A:  C G T N
//! reference C:  A G T N
//! reference G:  A C T N
//! reference T:  A C G N
//! reference N:  A C G T
//! ```
//!
//! # Example
//!
//! ```
//! use crambit::SubstitutionMatrix;
//!
//! # fn main() -> crambit::Result<()> {
//! // 0b00_01_10_11 assigns codes 0..3 in substitution order.
//! let matrix = SubstitutionMatrix::from_bytes(&[0x1B; 5])?;
//! assert_eq!(matrix.substitute(b'A', 0b01)?, b'G');
//! assert_eq!(matrix.substitute(b'T', 0b00)?, b'A');
//! # Ok(())
//! # }
//! ```

use crate::error::{CrambitError, Result};

/// Substitution targets per reference base, ascending nucleotide order
/// with the reference itself excluded.
const REPLACEMENTS: [&[u8; 4]; 5] = [b"CGTN", b"AGTN", b"ACTN", b"ACGN", b"ACGT"];

/// Decoded 2-bit-code → nucleotide lookup per reference base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    /// `rows[reference][code]` = substituted nucleotide
    rows: [[u8; 4]; 5],
}

impl SubstitutionMatrix {
    /// Decode the five packed bytes of a compression header `SM` entry.
    ///
    /// Each reference base must assign all four codes to distinct
    /// targets; a byte reusing a code is
    /// [`CrambitError::InvalidFormat`].
    pub fn from_bytes(bytes: &[u8; 5]) -> Result<Self> {
        let mut rows = [[0u8; 4]; 5];
        for (row, (&byte, replacements)) in bytes.iter().zip(REPLACEMENTS).enumerate() {
            let mut assigned = [false; 4];
            for slot in 0..4 {
                let code = ((byte >> (2 * (3 - slot))) & 0x3) as usize;
                if assigned[code] {
                    return Err(CrambitError::InvalidFormat {
                        msg: format!(
                            "substitution matrix byte {byte:#010b} assigns code {code} twice"
                        ),
                    });
                }
                assigned[code] = true;
                rows[row][code] = replacements[slot];
            }
        }
        Ok(Self { rows })
    }

    /// Reverse a recorded substitution code back to a nucleotide.
    ///
    /// The reference base is case-insensitive; an unrecognized base or
    /// a code above 3 is [`CrambitError::InvalidInput`].
    pub fn substitute(&self, reference_base: u8, code: u8) -> Result<u8> {
        if code > 3 {
            return Err(CrambitError::InvalidInput {
                msg: format!("substitution code {code} is outside 0..=3"),
            });
        }
        let row = match reference_base.to_ascii_uppercase() {
            b'A' => 0,
            b'C' => 1,
            b'G' => 2,
            b'T' => 3,
            b'N' => 4,
            other => {
                return Err(CrambitError::InvalidInput {
                    msg: format!(
                        "invalid reference base '{}', supported: ACGTN",
                        other as char
                    ),
                })
            }
        };
        Ok(self.rows[row][code as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A, C, G, T rows assign codes in order; the N row scrambles them
    /// (A=00, C=10, G=01, T=11).
    fn fixture() -> SubstitutionMatrix {
        SubstitutionMatrix::from_bytes(&[0x1B, 0x1B, 0x1B, 0x1B, 0b0010_0111]).unwrap()
    }

    #[test]
    fn substitutes_known_fixture_codes() {
        let matrix = fixture();
        assert_eq!(matrix.substitute(b'A', 0b01).unwrap(), b'G');
        assert_eq!(matrix.substitute(b'A', 0b11).unwrap(), b'N');
        assert_eq!(matrix.substitute(b'N', 0b01).unwrap(), b'G');
    }

    #[test]
    fn each_reference_covers_all_four_targets() {
        let matrix = fixture();
        for (reference, targets) in [
            (b'A', *b"CGTN"),
            (b'C', *b"AGTN"),
            (b'G', *b"ACTN"),
            (b'T', *b"ACGN"),
            (b'N', *b"ACGT"),
        ] {
            let mut decoded: Vec<u8> = (0..4)
                .map(|code| matrix.substitute(reference, code).unwrap())
                .collect();
            decoded.sort_unstable();
            let mut expected = targets.to_vec();
            expected.sort_unstable();
            assert_eq!(decoded, expected, "reference {}", reference as char);
        }
    }

    #[test]
    fn reference_base_is_case_insensitive() {
        let matrix = fixture();
        assert_eq!(
            matrix.substitute(b'a', 0b01).unwrap(),
            matrix.substitute(b'A', 0b01).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_reference_base() {
        let matrix = fixture();
        assert!(matches!(
            matrix.substitute(b'X', 0),
            Err(CrambitError::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_code_above_three() {
        let matrix = fixture();
        assert!(matches!(
            matrix.substitute(b'A', 4),
            Err(CrambitError::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_byte_reusing_a_code() {
        // 0x00 assigns code 0 to every slot.
        assert!(matches!(
            SubstitutionMatrix::from_bytes(&[0x00, 0x1B, 0x1B, 0x1B, 0x1B]),
            Err(CrambitError::InvalidFormat { .. })
        ));
    }
}
