use std::io::{Read, Write};

use log::{debug, info};

use super::header::write_header;
use super::huffman::{Code, CodeTable, HuffTree};
use super::BITS_PER_WORD;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::HuffError;
use crate::tools::freq_count::FreqCount;

/// Everything one compression run learns about its input: the counts, the tree built from
/// them, the code table walked from the tree and the size of the header it produced.
#[derive(Debug, Default)]
pub struct HuffModel {
    counts: FreqCount,
    tree: Option<HuffTree>,
    table: Option<CodeTable>,
    header_bits: usize,
    uncompressed_bits: usize,
}

impl HuffModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the symbols in the source and build the code tree from them. Any table made
    /// from an earlier tree is dropped.
    pub fn make_tree<R: Read>(&mut self, source: &mut BitReader<R>) -> Result<&HuffTree, HuffError> {
        self.counts = FreqCount::new();
        self.table = None;
        let symbols = self.counts.count_all(source)?;
        self.uncompressed_bits = symbols * BITS_PER_WORD;
        info!(
            "Counted {} symbols, {} distinct.",
            symbols,
            self.counts.table().len()
        );
        let tree = HuffTree::build(&self.counts);
        debug!("Built a code tree with {} leaves.", tree.root.leaf_count());
        Ok(self.tree.insert(tree))
    }

    /// Walk the tree and build the code table.
    pub fn make_table(&mut self) -> Result<&CodeTable, HuffError> {
        let tree = self
            .tree
            .as_ref()
            .ok_or(HuffError::Precondition("make_table called before make_tree"))?;
        Ok(self.table.insert(tree.code_table()))
    }

    /// Code for one symbol. Only valid once make_table has run.
    pub fn code(&self, symbol: usize) -> Result<&Code, HuffError> {
        self.table
            .as_ref()
            .ok_or(HuffError::Precondition("code requested before make_table"))?
            .get(symbol)
    }

    /// Write the header for the current tree. Returns (and remembers) its size in bits.
    pub fn write_header<W: Write>(&mut self, bw: &mut BitWriter<W>) -> Result<usize, HuffError> {
        let tree = self
            .tree
            .as_ref()
            .ok_or(HuffError::Precondition("write_header called before make_tree"))?;
        self.header_bits = write_header(&tree.root, bw)?;
        Ok(self.header_bits)
    }

    pub fn counts(&self) -> &FreqCount {
        &self.counts
    }

    pub fn tree(&self) -> Option<&HuffTree> {
        self.tree.as_ref()
    }

    /// Size in bits of the last header written, 0 if none was.
    pub fn header_size(&self) -> usize {
        self.header_bits
    }

    /// Size in bits of the input counted by make_tree.
    pub fn uncompressed_size(&self) -> usize {
        self.uncompressed_bits
    }
}

#[cfg(test)]
mod test {
    use super::HuffModel;
    use crate::bitstream::bitreader::BitReader;
    use crate::bitstream::bitwriter::BitWriter;
    use crate::error::HuffError;
    use crate::huffman_coding::PSEUDO_EOF;

    #[test]
    fn preconditions_test() {
        let mut model = HuffModel::new();
        assert!(matches!(model.code(b'a' as usize), Err(HuffError::Precondition(_))));
        assert!(matches!(model.make_table(), Err(HuffError::Precondition(_))));
        let mut bw = BitWriter::new(Vec::new());
        assert!(matches!(model.write_header(&mut bw), Err(HuffError::Precondition(_))));

        model.make_tree(&mut BitReader::new("abc".as_bytes())).unwrap();
        // A tree alone is not enough to look up codes
        assert!(matches!(model.code(b'a' as usize), Err(HuffError::Precondition(_))));
        model.make_table().unwrap();
        assert!(model.code(b'a' as usize).is_ok());
    }

    #[test]
    fn make_tree_test() {
        let mut model = HuffModel::new();
        model.make_tree(&mut BitReader::new("teststring".as_bytes())).unwrap();
        assert_eq!(model.uncompressed_size(), 80);
        assert_eq!(model.counts().get_count(b't' as usize).unwrap(), 3);
        assert_eq!(model.tree().unwrap().root.leaf_count(), 8);

        let table = model.make_table().unwrap();
        assert_eq!(table.len(), 8);
        assert!(!model.code(PSEUDO_EOF).unwrap().is_empty());
        assert!(matches!(model.code(b'z' as usize), Err(HuffError::InvalidSymbol(_))));
    }

    #[test]
    fn rebuild_drops_old_table_test() {
        let mut model = HuffModel::new();
        model.make_tree(&mut BitReader::new("abc".as_bytes())).unwrap();
        model.make_table().unwrap();
        model.make_tree(&mut BitReader::new("xyz".as_bytes())).unwrap();
        assert!(matches!(model.code(b'x' as usize), Err(HuffError::Precondition(_))));
        model.make_table().unwrap();
        assert!(model.code(b'x' as usize).is_ok());
        assert!(model.code(b'a' as usize).is_err());
    }

    #[test]
    fn header_size_test() {
        let mut model = HuffModel::new();
        model.make_tree(&mut BitReader::new("aaaa".as_bytes())).unwrap();
        assert_eq!(model.header_size(), 0);
        let mut bw = BitWriter::new(std::io::sink());
        assert_eq!(model.write_header(&mut bw).unwrap(), 53);
        assert_eq!(model.header_size(), 53);
    }
}
