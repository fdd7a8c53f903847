use std::collections::BTreeMap;

use bitvec::prelude::*;
use tracing::debug;

use crate::error::CodecError;
use crate::hufftree::{Bits, HuffmanTree, Node};

/// Encoder/decoder pair over one learned code tree.
///
/// The tree doubles as the decoder automaton; the code table derived from it
/// drives encoding. Both are read-only after construction, so concurrent
/// `encode`/`decode` calls need no synchronization.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: HuffmanTree,
    code_table: BTreeMap<u8, Bits>,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let code_table = tree.code_table();
        HuffmanCodec { tree, code_table }
    }

    /// Learns the code from sample text. Fails on empty input.
    pub fn from_text(text: &[u8]) -> Result<Self, CodecError> {
        let tree = HuffmanTree::from_bytes(text)?;
        Ok(Self::new(tree))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &BTreeMap<u8, Bits> {
        &self.code_table
    }

    /// Code bits for one symbol. An empty result means the symbol is absent
    /// from the learned alphabet.
    pub fn code_for(&self, symbol: u8) -> Bits {
        self.tree.code_for(symbol)
    }

    /// Concatenates each input symbol's code, in input order.
    ///
    /// Symbols absent from the learned alphabet contribute no bits and are
    /// skipped silently, matching the degenerate single-leaf behavior.
    /// Callers that need round-trip fidelity must check membership first
    /// (via [`Self::code_for`] emptiness) before encoding.
    pub fn encode(&self, text: &[u8]) -> Bits {
        let mut bits = Bits::new();
        let mut skipped = 0usize;
        for byte in text {
            match self.code_table.get(byte) {
                Some(code) => bits.extend_from_bitslice(code),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "encode dropped symbols outside the learned alphabet");
        }
        bits
    }

    /// Reconstructs plaintext by repeated root-to-leaf traversal: `0`
    /// descends left, `1` right; each leaf reached emits its symbol and
    /// resets the walk to the root.
    ///
    /// Trailing bits that do not complete a root-to-leaf path are discarded
    /// and contribute no output. On the degenerate single-leaf tree each `0`
    /// emits the sole symbol and `1` bits are ignored, mirroring what the
    /// degenerate encoder produces.
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<Vec<u8>, CodecError> {
        if let Node::Leaf { symbol, .. } = self.tree.root() {
            let symbol = *symbol;
            return Ok(bits.iter().by_vals().filter(|&bit| !bit).map(|_| symbol).collect());
        }

        let mut plaintext = Vec::new();
        let mut node = self.tree.root();
        for (position, bit) in bits.iter().by_vals().enumerate() {
            node = match node {
                Node::Internal { left, right, .. } => {
                    if bit {
                        right.as_ref()
                    } else {
                        left.as_ref()
                    }
                }
                // A walk never rests on a leaf (it resets to the root), but
                // the guard keeps arbitrary input from descending past one.
                Node::Leaf { .. } => {
                    return Err(CodecError::MalformedBitstream { position });
                }
            };
            if let Node::Leaf { symbol, .. } = node {
                plaintext.push(*symbol);
                node = self.tree.root();
            }
        }
        Ok(plaintext)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"aab".as_slice())]
    #[case(b"mississippi".as_slice())]
    #[case(b"the quick brown fox jumps over the lazy dog".as_slice())]
    #[case(&[0u8, 1, 1, 2, 2, 2, 3, 3, 3, 3, 255])]
    fn round_trip_recovers_input(#[case] text: &[u8]) {
        let codec = HuffmanCodec::from_text(text).unwrap();
        let bits = codec.encode(text);
        assert_eq!(codec.decode(&bits).unwrap(), text);
    }

    #[test]
    fn degenerate_alphabet_codes_as_zeros() {
        let codec = HuffmanCodec::from_text(b"aaaa").unwrap();
        assert_eq!(codec.code_for(b'a'), bitvec![u8, Msb0; 0]);
        assert_eq!(codec.encode(b"aaaa"), bitvec![u8, Msb0; 0, 0, 0, 0]);
        assert_eq!(
            codec.decode(bits![u8, Msb0; 0, 0, 0, 0]).unwrap(),
            b"aaaa"
        );
    }

    #[test]
    fn degenerate_decode_ignores_one_bits() {
        let codec = HuffmanCodec::from_text(b"xxx").unwrap();
        assert_eq!(codec.decode(bits![u8, Msb0; 0, 1, 0, 1, 1]).unwrap(), b"xx");
    }

    #[test]
    fn degenerate_encode_drops_foreign_symbols() {
        let codec = HuffmanCodec::from_text(b"aaaa").unwrap();
        assert_eq!(codec.encode(b"aba"), bitvec![u8, Msb0; 0, 0]);
    }

    #[test]
    fn encode_skips_symbols_outside_alphabet() {
        let codec = HuffmanCodec::from_text(b"aab").unwrap();
        assert_eq!(codec.encode(b"azb"), codec.encode(b"ab"));
    }

    #[test]
    fn decode_drops_trailing_incomplete_path() {
        // a:3 b:2 c:1 gives a one-bit code for 'a' and two-bit codes for
        // 'b' and 'c', so a lone bit of a two-bit code ends mid-traversal.
        let codec = HuffmanCodec::from_text(b"aaabbc").unwrap();
        let mut bits = codec.encode(b"aab");
        let before = codec.decode(&bits).unwrap();
        assert_eq!(before, b"aab");

        bits.push(true);
        assert_eq!(codec.decode(&bits).unwrap(), b"aab");
    }

    #[test]
    fn decode_of_empty_bits_is_empty() {
        let codec = HuffmanCodec::from_text(b"abc").unwrap();
        assert_eq!(codec.decode(&Bits::new()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn empty_input_fails_construction() {
        assert_eq!(
            HuffmanCodec::from_text(b"").unwrap_err(),
            CodecError::EmptyInput
        );
    }

    #[test]
    fn code_table_agrees_with_per_symbol_lookup() {
        let codec = HuffmanCodec::from_text(b"abracadabra").unwrap();
        for (&symbol, code) in codec.code_table() {
            assert_eq!(&codec.code_for(symbol), code);
        }
        assert!(codec.code_for(b'z').is_empty());
    }
}
