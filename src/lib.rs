//! # huffman-rs - Huffman Coding with a Resumable Decoder
//!
//! Builds a Huffman tree from symbol frequencies, derives a prefix-free code
//! table, encodes symbol sequences into bits and decodes them back one bit at
//! a time.
//!
//! Symbols can be any `Hash + Eq + Clone` type. Encoded data is a `Vec<u8>` of
//! the binary digits 0 and 1; it is not packed into bytes.
//!
//! ## Example
//!
//! ```
//! use huffman_rs::{Codec, DecodeStep};
//!
//! let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
//! let bits = codec.encode_sequence("MISSISSIPPI".chars()).unwrap();
//!
//! // Feed bits as they arrive
//! let mut decoded = String::new();
//! for &bit in &bits {
//!     if let DecodeStep::Symbol(c) = codec.decode(bit).unwrap() {
//!         decoded.push(c);
//!     }
//! }
//! assert_eq!(decoded, "MISSISSIPPI");
//!
//! println!("{} bits for {} symbols", bits.len(), decoded.len());
//! ```
//!
//! ## Determinism
//!
//! Ties between equal frequencies are broken by insertion order: leaves are
//! numbered in the order the frequencies are supplied (or first appear in a
//! sequence), merged nodes are numbered after them, and lower numbers pop
//! first. Building twice from the same ordered input yields the same codes.
//!
//! ## Performance
//!
//! - O(n log n) tree construction for n distinct symbols
//! - O(1) per encoded symbol (table lookup) and per decoded bit
//! - Nodes stored in a generational arena (SlotMap); decoders hold only a key

pub mod bits;
mod code_table;
mod codec;
mod decoder;
mod error;
mod node;
mod tree;
mod view;


pub use code_table::{CodeTable, EncodingStats};
pub use codec::Codec;
pub use decoder::{DecodeStep, Decoder};
pub use error::{Error, Result};
pub use tree::HuffmanTree;
pub use view::{NodeRef, TreeNode};
