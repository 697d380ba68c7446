use crate::bits::check_bit;
use crate::code_table::{CodeTable, EncodingStats};
use crate::decoder::{DecodeStep, Decoder};
use crate::error::{Error, Result};
use crate::node::NodeKey;
use crate::tree::HuffmanTree;
use std::borrow::Borrow;
use std::hash::Hash;

/// Everything that exists once a tree has been built.
#[derive(Debug, Clone)]
struct Built<T> {
    tree: HuffmanTree<T>,
    table: CodeTable<T>,
    cursor: NodeKey,
}

/// Main Huffman codec.
///
/// Owns a tree, its cached code table and one decoder cursor. Encoding is a
/// table lookup and never touches the cursor. A codec starts uninitialized;
/// encode and decode fail with [`Error::UninitializedTree`] until a tree is
/// built or supplied.
#[derive(Debug, Clone)]
pub struct Codec<T> {
    built: Option<Built<T>>,
}

impl<T: Hash + Eq + Clone> Codec<T> {
    /// Creates a codec with no tree.
    pub fn new() -> Self {
        Self { built: None }
    }

    /// Creates a codec around an existing tree.
    pub fn from_tree(tree: HuffmanTree<T>) -> Self {
        let mut codec = Self::new();
        codec.set_tree(tree);
        codec
    }

    /// Builds a codec from `(symbol, count)` pairs.
    pub fn from_frequencies<I>(frequencies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        HuffmanTree::from_frequencies(frequencies).map(Self::from_tree)
    }

    /// Builds a codec from the symbol counts of a sequence.
    pub fn from_symbols<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        HuffmanTree::from_symbols(symbols).map(Self::from_tree)
    }

    /// Replaces the tree with one built from `(symbol, count)` pairs.
    ///
    /// On error the previous tree, table and cursor are kept.
    pub fn build_from_frequencies<I>(&mut self, frequencies: I) -> Result<()>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let tree = HuffmanTree::from_frequencies(frequencies)?;
        self.set_tree(tree);
        Ok(())
    }

    /// Replaces the tree with one built from the counts of `symbols`.
    ///
    /// On error the previous tree, table and cursor are kept.
    pub fn build_from_symbols<I>(&mut self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let tree = HuffmanTree::from_symbols(symbols)?;
        self.set_tree(tree);
        Ok(())
    }

    /// Installs `tree`, rebuilds the code table and resets the cursor.
    pub fn set_tree(&mut self, tree: HuffmanTree<T>) {
        let table = tree.code_table();
        let cursor = tree.root;
        self.built = Some(Built {
            tree,
            table,
            cursor,
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.built.is_some()
    }

    pub fn tree(&self) -> Option<&HuffmanTree<T>> {
        self.built.as_ref().map(|b| &b.tree)
    }

    /// Returns the cached code table.
    pub fn code_table(&self) -> Result<&CodeTable<T>> {
        self.built().map(|b| &b.table)
    }

    /// Returns the code for one symbol.
    pub fn encode(&self, symbol: &T) -> Result<&[u8]> {
        self.built()?.table.encode(symbol)
    }

    /// Concatenates the codes of `symbols`, failing on the first unknown one.
    pub fn encode_sequence<I>(&self, symbols: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.built()?.table.encode_sequence(symbols)
    }

    /// Computes size figures for encoding `symbols`.
    pub fn stats<I>(&self, symbols: I) -> Result<EncodingStats>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.built()?.table.stats(symbols)
    }

    /// Feeds one bit to the codec's own decoder cursor.
    ///
    /// The bit is validated before the tree is checked, and a failing call
    /// leaves the cursor unchanged.
    pub fn decode(&mut self, bit: u8) -> Result<DecodeStep<T>> {
        check_bit(bit)?;
        let built = self.built.as_mut().ok_or(Error::UninitializedTree)?;

        let mut decoder = Decoder::resume(&built.tree, built.cursor);
        let step = decoder.decode(bit)?.cloned();
        built.cursor = decoder.cursor();

        if let DecodeStep::Symbol(_) = step {
            tracing::trace!("decoded symbol");
        }

        Ok(step)
    }

    /// Resets the cursor and decodes a whole bit sequence.
    ///
    /// Like [`Codec::decode`], the bits are validated before the tree is
    /// checked.
    pub fn decode_sequence(&mut self, bits: &[u8]) -> Result<Vec<T>> {
        for &bit in bits {
            check_bit(bit)?;
        }
        let built = self.built.as_mut().ok_or(Error::UninitializedTree)?;

        let mut decoder = Decoder::resume(&built.tree, built.cursor);
        let symbols = decoder.decode_sequence(bits)?;
        built.cursor = decoder.cursor();

        Ok(symbols)
    }

    /// Moves the cursor back to the root, discarding any partial code.
    ///
    /// Does nothing before a tree is built.
    pub fn reset_decoder(&mut self) {
        if let Some(built) = self.built.as_mut() {
            tracing::trace!(pending = built.cursor != built.tree.root, "decoder reset");
            built.cursor = built.tree.root;
        }
    }

    /// Starts a decode session independent of the codec's own cursor.
    pub fn decoder(&self) -> Result<Decoder<'_, T>> {
        self.built().map(|b| b.tree.decoder())
    }

    fn built(&self) -> Result<&Built<T>> {
        self.built.as_ref().ok_or(Error::UninitializedTree)
    }
}

impl<T: Hash + Eq + Clone> Default for Codec<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized() {
        let mut codec = Codec::<char>::new();
        assert!(!codec.is_initialized());
        assert_eq!(codec.encode(&'a'), Err(Error::UninitializedTree));
        assert_eq!(codec.encode_sequence("ab".chars()), Err(Error::UninitializedTree));
        assert_eq!(codec.decode(0), Err(Error::UninitializedTree));
        assert_eq!(codec.decode_sequence(&[0, 1]), Err(Error::UninitializedTree));
        assert!(codec.code_table().is_err());
        assert!(codec.decoder().is_err());
        codec.reset_decoder();
    }

    #[test]
    fn test_mississippi_roundtrip() {
        let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        let bits = codec.encode_sequence("MISSISSIPPI".chars()).unwrap();
        assert_eq!(bits.len(), 21);
        assert!(bits.len() <= 44);

        let mut decoded = String::new();
        for &bit in &bits {
            if let DecodeStep::Symbol(c) = codec.decode(bit).unwrap() {
                decoded.push(c);
            }
        }
        assert_eq!(decoded, "MISSISSIPPI");

        let decoded: String = codec.decode_sequence(&bits).unwrap().into_iter().collect();
        assert_eq!(decoded, "MISSISSIPPI");
    }

    #[test]
    fn test_single_symbol() {
        let mut codec = Codec::from_frequencies(vec![("A", 1)]).unwrap();
        assert_eq!(codec.encode(&"A"), Ok(&[0u8][..]));
        assert_eq!(codec.decode(0), Ok(DecodeStep::Symbol("A")));
        assert_eq!(codec.decode(1), Ok(DecodeStep::Symbol("A")));
        assert_eq!(codec.decode_sequence(&[0, 0, 1]), Ok(vec!["A", "A", "A"]));
    }

    #[test]
    fn test_invalid_bit_keeps_cursor() {
        let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        assert_eq!(codec.decode(1), Ok(DecodeStep::Pending));
        assert!(matches!(codec.decode(2), Err(Error::InvalidInput(_))));
        assert_eq!(codec.decode(1), Ok(DecodeStep::Symbol('I')));
    }

    #[test]
    fn test_unknown_symbol_leaves_state() {
        let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        codec.decode(1).unwrap();
        assert_eq!(codec.encode(&'Q'), Err(Error::UnknownSymbol));
        assert_eq!(codec.decode(0), Ok(DecodeStep::Pending));
        assert_eq!(codec.decode(1), Ok(DecodeStep::Symbol('P')));
    }

    #[test]
    fn test_reset_decoder() {
        let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        codec.decode(1).unwrap();
        codec.reset_decoder();
        assert_eq!(codec.decode(0), Ok(DecodeStep::Symbol('S')));
    }

    #[test]
    fn test_decode_sequence_resets_first() {
        let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        codec.decode(1).unwrap();
        assert_eq!(codec.decode_sequence(&[0]), Ok(vec!['S']));
    }

    #[test]
    fn test_rebuild_replaces_table() {
        let mut codec = Codec::from_symbols("aab".chars()).unwrap();
        codec.decode(0).unwrap();
        codec.build_from_frequencies(vec![('x', 1), ('y', 1), ('z', 5)]).unwrap();

        assert_eq!(codec.encode(&'a'), Err(Error::UnknownSymbol));
        assert_eq!(codec.code_table().unwrap().len(), 3);
        assert_eq!(codec.decode(1), Ok(DecodeStep::Symbol('z')));
    }

    #[test]
    fn test_failed_build_keeps_previous() {
        let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        let before = codec.code_table().unwrap().clone();

        // Leave the cursor inside the 1-subtree
        assert_eq!(codec.decode(1), Ok(DecodeStep::Pending));

        assert!(matches!(
            codec.build_from_symbols(std::iter::empty()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            codec.build_from_frequencies(Vec::new()),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(codec.code_table().unwrap(), &before);

        // 1 then 1 completes I = 11
        assert_eq!(codec.decode(1), Ok(DecodeStep::Symbol('I')));
    }

    #[test]
    fn test_invalid_bits_checked_before_tree() {
        let mut codec = Codec::<char>::new();
        assert!(matches!(codec.decode(2), Err(Error::InvalidInput(_))));
        assert!(matches!(
            codec.decode_sequence(&[0, 2]),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(codec.decode_sequence(&[0, 1]), Err(Error::UninitializedTree));
    }

    #[test]
    fn test_independent_decoder() {
        let mut codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        codec.decode(1).unwrap();

        {
            let mut session = codec.decoder().unwrap();
            assert_eq!(session.decode(0), Ok(DecodeStep::Symbol(&'S')));
        }

        assert_eq!(codec.decode(1), Ok(DecodeStep::Symbol('I')));
    }

    #[test]
    fn test_stats() {
        let codec = Codec::from_symbols("MISSISSIPPI".chars()).unwrap();
        let stats = codec.stats("MISSISSIPPI".chars()).unwrap();
        assert_eq!(stats.encoded_bits, 21);
        assert!(stats.encoded_bits <= stats.raw_bits(4));
    }

    #[test]
    fn test_default() {
        let codec: Codec<u8> = Codec::default();
        assert!(codec.tree().is_none());
    }
}
