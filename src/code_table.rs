use crate::error::{Error, Result};
use crate::node::Node;
use crate::tree::HuffmanTree;
use ahash::AHashMap as HashMap;
use std::borrow::Borrow;
use std::hash::Hash;

/// Mapping from symbol to its bit sequence.
///
/// Entries are stored in depth-first order (left subtree first), so
/// iteration order depends only on the tree shape.
#[derive(Debug, Clone)]
pub struct CodeTable<T> {
    entries: Vec<(T, Vec<u8>)>,
    index: HashMap<T, usize>,
}

impl<T: Hash + Eq + Clone> CodeTable<T> {
    /// Walks the tree and records the path to every leaf: 0 for left,
    /// 1 for right. A single-leaf tree gets the code `[0]`.
    pub fn from_tree(tree: &HuffmanTree<T>) -> Self {
        let mut entries = Vec::with_capacity(tree.len());
        let mut stack = vec![(tree.root, Vec::new())];

        while let Some((key, prefix)) = stack.pop() {
            match &tree.nodes[key] {
                Node::Leaf { symbol, .. } => {
                    let code = if prefix.is_empty() { vec![0] } else { prefix };
                    entries.push((symbol.clone(), code));
                }
                Node::Internal { left, right, .. } => {
                    let mut left_prefix = prefix.clone();
                    left_prefix.push(0);

                    let mut right_prefix = prefix;
                    right_prefix.push(1);

                    // Right pushed first so the left subtree is visited first
                    stack.push((*right, right_prefix));
                    stack.push((*left, left_prefix));
                }
            }
        }

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (symbol, _))| (symbol.clone(), i))
            .collect();

        tracing::debug!(
            symbols = entries.len(),
            max_code_len = entries.iter().map(|(_, c)| c.len()).max().unwrap_or(0),
            "built code table"
        );

        Self { entries, index }
    }

    /// Returns the code for `symbol`, if present.
    pub fn get(&self, symbol: &T) -> Option<&[u8]> {
        self.index
            .get(symbol)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, symbol: &T) -> bool {
        self.index.contains_key(symbol)
    }

    /// Looks up the code for one symbol.
    pub fn encode(&self, symbol: &T) -> Result<&[u8]> {
        self.get(symbol).ok_or(Error::UnknownSymbol)
    }

    /// Concatenates the codes of `symbols` in order.
    ///
    /// Stops at the first unknown symbol and returns no partial output.
    pub fn encode_sequence<I>(&self, symbols: I) -> Result<Vec<u8>>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut bits = Vec::new();
        for (position, symbol) in symbols.into_iter().enumerate() {
            match self.get(symbol.borrow()) {
                Some(code) => bits.extend_from_slice(code),
                None => {
                    tracing::trace!(position, "unknown symbol in sequence");
                    return Err(Error::UnknownSymbol);
                }
            }
        }
        Ok(bits)
    }

    /// Computes size figures for encoding `symbols` with this table.
    pub fn stats<I>(&self, symbols: I) -> Result<EncodingStats>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut input_symbols = 0;
        let mut encoded_bits = 0;
        for symbol in symbols {
            encoded_bits += self.encode(symbol.borrow())?.len();
            input_symbols += 1;
        }

        Ok(EncodingStats {
            input_symbols,
            alphabet_size: self.len(),
            encoded_bits,
        })
    }

    /// Copies the table into a plain map.
    pub fn to_map(&self) -> HashMap<T, Vec<u8>> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> CodeTable<T> {
    /// Number of symbols in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(symbol, code)` pairs in depth-first order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &[u8])> {
        self.entries.iter().map(|(s, c)| (s, c.as_slice()))
    }

    /// True when no code is a prefix of another.
    ///
    /// In lexicographic order a code that prefixes any other code also
    /// prefixes its immediate successor, so adjacent pairs suffice.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&[u8]> = self.entries.iter().map(|(_, c)| c.as_slice()).collect();
        codes.sort_unstable();
        codes.windows(2).all(|w| !w[1].starts_with(w[0]))
    }
}

impl<T: PartialEq> PartialEq for CodeTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<T: Eq> Eq for CodeTable<T> {}

/// Size figures for an encoded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingStats {
    /// Number of symbols encoded
    pub input_symbols: usize,
    /// Number of symbols in the code table
    pub alphabet_size: usize,
    /// Total length of the concatenated codes
    pub encoded_bits: usize,
}

impl EncodingStats {
    /// Smallest fixed code width that can distinguish every symbol, at least 1.
    pub fn fixed_width(&self) -> usize {
        let k = self.alphabet_size.max(1);
        ((usize::BITS - (k - 1).leading_zeros()) as usize).max(1)
    }

    /// Size of the input under a fixed-width code.
    pub fn fixed_width_bits(&self) -> usize {
        self.input_symbols * self.fixed_width()
    }

    /// Size of the input at `bits_per_symbol` bits each, e.g. 8 for bytes.
    pub fn raw_bits(&self, bits_per_symbol: usize) -> usize {
        self.input_symbols * bits_per_symbol
    }

    /// Encoded size as a percentage of the fixed-width size.
    pub fn compression_ratio(&self) -> f64 {
        ratio(self.encoded_bits, self.fixed_width_bits())
    }

    /// Encoded size as a percentage of the raw size at `bits_per_symbol`.
    pub fn compression_ratio_against(&self, bits_per_symbol: usize) -> f64 {
        ratio(self.encoded_bits, self.raw_bits(bits_per_symbol))
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mississippi() -> CodeTable<char> {
        HuffmanTree::from_symbols("MISSISSIPPI".chars())
            .unwrap()
            .code_table()
    }

    #[test]
    fn test_mississippi_codes() {
        let table = mississippi();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(&'S'), Some(&[0u8][..]));
        assert_eq!(table.get(&'M'), Some(&[1u8, 0, 0][..]));
        assert_eq!(table.get(&'P'), Some(&[1u8, 0, 1][..]));
        assert_eq!(table.get(&'I'), Some(&[1u8, 1][..]));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_iteration_order() {
        let table = mississippi();
        let symbols: Vec<char> = table.iter().map(|(s, _)| *s).collect();
        assert_eq!(symbols, vec!['S', 'M', 'P', 'I']);
    }

    #[test]
    fn test_single_symbol_code() {
        let tree = HuffmanTree::from_frequencies(vec![("A", 1)]).unwrap();
        let table = tree.code_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.encode(&"A"), Ok(&[0u8][..]));
    }

    #[test]
    fn test_idempotent() {
        let tree = HuffmanTree::from_symbols("abracadabra".chars()).unwrap();
        assert_eq!(tree.code_table(), tree.code_table());
    }

    #[test]
    fn test_encode_unknown() {
        let table = mississippi();
        assert_eq!(table.encode(&'Z'), Err(Error::UnknownSymbol));
        assert!(!table.contains(&'Z'));
    }

    #[test]
    fn test_encode_sequence() {
        let table = mississippi();
        let bits = table.encode_sequence("MISSISSIPPI".chars()).unwrap();
        assert_eq!(
            crate::bits::to_bit_string(&bits),
            "100110011001110110111"
        );
        assert_eq!(bits.len(), 21);
        assert!(bits.len() <= 4 * 11);
    }

    #[test]
    fn test_encode_sequence_fails_fast() {
        let table = mississippi();
        assert_eq!(
            table.encode_sequence("MISSXISSIPPI".chars()),
            Err(Error::UnknownSymbol)
        );
        assert_eq!(table.encode_sequence(&['S', 'I']), Ok(vec![0, 1, 1]));
    }

    #[test]
    fn test_prefix_free_detects_violation() {
        let table = CodeTable {
            entries: vec![('a', vec![0]), ('b', vec![0, 1])],
            index: [('a', 0), ('b', 1)].into_iter().collect(),
        };
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_to_map() {
        let map = mississippi().to_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(&'I'), Some(&vec![1, 1]));
    }

    #[test]
    fn test_stats() {
        let table = mississippi();
        let stats = table.stats("MISSISSIPPI".chars()).unwrap();
        assert_eq!(stats.input_symbols, 11);
        assert_eq!(stats.alphabet_size, 4);
        assert_eq!(stats.encoded_bits, 21);
        assert_eq!(stats.fixed_width(), 2);
        assert_eq!(stats.fixed_width_bits(), 22);
        assert_eq!(stats.raw_bits(8), 88);
        assert!(stats.compression_ratio() < 100.0);
        assert!((stats.compression_ratio_against(8) - 21.0 / 88.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_width() {
        let stats = |alphabet_size| EncodingStats {
            input_symbols: 1,
            alphabet_size,
            encoded_bits: 0,
        };
        assert_eq!(stats(1).fixed_width(), 1);
        assert_eq!(stats(2).fixed_width(), 1);
        assert_eq!(stats(3).fixed_width(), 2);
        assert_eq!(stats(4).fixed_width(), 2);
        assert_eq!(stats(5).fixed_width(), 3);
        assert_eq!(stats(256).fixed_width(), 8);
    }
}
