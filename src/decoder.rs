use crate::bits::check_bit;
use crate::error::Result;
use crate::node::NodeKey;
use crate::tree::HuffmanTree;

/// Outcome of feeding one bit to a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStep<S> {
    /// The bit moved the cursor to an internal node; no symbol yet.
    Pending,

    /// The bit completed a code.
    Symbol(S),
}

impl<S> DecodeStep<S> {
    pub fn is_complete(&self) -> bool {
        matches!(self, DecodeStep::Symbol(_))
    }

    /// The decoded symbol, if the step completed one.
    pub fn symbol(self) -> Option<S> {
        match self {
            DecodeStep::Symbol(s) => Some(s),
            DecodeStep::Pending => None,
        }
    }
}

impl<S: Clone> DecodeStep<&S> {
    pub fn cloned(self) -> DecodeStep<S> {
        match self {
            DecodeStep::Symbol(s) => DecodeStep::Symbol(s.clone()),
            DecodeStep::Pending => DecodeStep::Pending,
        }
    }
}

/// A decode session over a borrowed tree.
///
/// The session owns only its cursor, so any number of sessions can decode
/// from the same tree independently.
#[derive(Debug)]
pub struct Decoder<'a, T> {
    tree: &'a HuffmanTree<T>,
    cursor: NodeKey,
}

impl<'a, T> Decoder<'a, T> {
    pub(crate) fn new(tree: &'a HuffmanTree<T>) -> Self {
        Self::resume(tree, tree.root)
    }

    /// Continues a session from a saved cursor.
    pub(crate) fn resume(tree: &'a HuffmanTree<T>, cursor: NodeKey) -> Self {
        Self { tree, cursor }
    }

    pub(crate) fn cursor(&self) -> NodeKey {
        self.cursor
    }

    pub fn tree(&self) -> &'a HuffmanTree<T> {
        self.tree
    }

    /// True when no partial code is pending.
    pub fn is_at_root(&self) -> bool {
        self.cursor == self.tree.root
    }

    /// Feeds one bit (0 or 1).
    ///
    /// Returns [`DecodeStep::Symbol`] when the bit completes a code, after
    /// which the cursor is back at the root. An invalid bit fails with
    /// [`Error::InvalidInput`](crate::Error::InvalidInput) and leaves the
    /// cursor where it was.
    pub fn decode(&mut self, bit: u8) -> Result<DecodeStep<&'a T>> {
        let bit = check_bit(bit)?;
        let (cursor, symbol) = self.tree.step(self.cursor, bit);
        self.cursor = cursor;

        Ok(match symbol {
            Some(symbol) => DecodeStep::Symbol(symbol),
            None => DecodeStep::Pending,
        })
    }

    /// Discards any partial code.
    pub fn reset(&mut self) {
        tracing::trace!(pending = !self.is_at_root(), "decoder reset");
        self.cursor = self.tree.root;
    }
}

impl<'a, T: Clone> Decoder<'a, T> {
    /// Resets the cursor, then decodes every bit and collects the symbols.
    ///
    /// All bits are validated first; on [`Error::InvalidInput`](crate::Error::InvalidInput)
    /// the session is left untouched. Trailing bits that do not finish a code
    /// stay pending in the cursor.
    pub fn decode_sequence(&mut self, bits: &[u8]) -> Result<Vec<T>> {
        for &bit in bits {
            check_bit(bit)?;
        }

        self.reset();
        let mut out = Vec::new();
        for &bit in bits {
            if let DecodeStep::Symbol(symbol) = self.decode(bit)? {
                out.push(symbol.clone());
            }
        }

        tracing::trace!(
            bits = bits.len(),
            symbols = out.len(),
            pending = !self.is_at_root(),
            "decoded sequence"
        );

        Ok(out)
    }
}
