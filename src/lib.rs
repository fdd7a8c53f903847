//! # huffcode
//!
//! Prefix-free Huffman coding over byte alphabets: learn a code from sample
//! text, then encode text into code bits and decode bits back into text.
//!
//! The code tree is built once from observed symbol frequencies and is
//! immutable afterwards; it serves as both the encoder's code table and the
//! decoder's traversal automaton. Persisting the tree or packing bits for
//! storage is left to the caller (the bit sequences are already dense,
//! byte-backed `bitvec` storage).
//!
//! ## Quick Start
//!
//! ```rust
//! use huffcode::HuffmanCodec;
//!
//! let codec = HuffmanCodec::from_text(b"the quick brown fox")?;
//!
//! let bits = codec.encode(b"quick fox");
//! let text = codec.decode(&bits)?;
//! assert_eq!(text, b"quick fox");
//!
//! // Symbols never seen during construction have no code.
//! assert!(codec.code_for(b'z').is_empty());
//! # Ok::<(), huffcode::CodecError>(())
//! ```

pub mod error;
pub mod huffman_codec;
pub mod hufftree;

// Internal modules - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use error::CodecError;
pub use huffman_codec::HuffmanCodec;
pub use hufftree::{Bits, HuffmanTree, Node};
