//! Archive header: the magic number followed by a pre-order walk of the code tree.
//!
//! An internal node is written as a 0 bit, then its left and right subtrees. A leaf is a 1
//! bit followed by its symbol in BITS_PER_WORD + 1 bits (the end-of-stream symbol needs the
//! extra bit). Reading follows exactly the same order, so the two must be kept in step.
//!

use std::io::{self, Read, Write};

use log::{error, info, trace};

use super::huffman::{HuffTree, Node, NodeData};
use super::{ALPH_SIZE, BITS_PER_INT, BITS_PER_WORD, MAGIC_NUMBER, PSEUDO_EOF};
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::HuffError;

/// Write the magic number and tree. Returns the number of bits written.
pub fn write_header<W: Write>(root: &Node, bw: &mut BitWriter<W>) -> io::Result<usize> {
    let start = bw.bits_written();
    bw.out_bits(BITS_PER_INT as u8, MAGIC_NUMBER)?;
    write_node(root, bw)?;
    let size = bw.bits_written() - start;
    trace!("Header is {} bits.", size);
    Ok(size)
}

fn write_node<W: Write>(node: &Node, bw: &mut BitWriter<W>) -> io::Result<()> {
    match &node.node_data {
        NodeData::Leaf(symbol) => {
            bw.out_bit(true)?;
            bw.out_bits(BITS_PER_WORD as u8 + 1, *symbol as u32)
        }
        NodeData::Kids(left, right) => {
            bw.out_bit(false)?;
            write_node(left, bw)?;
            write_node(right, bw)
        }
    }
}

/// Check the magic number and rebuild the tree. Weights of the rebuilt nodes are 0.
pub fn read_header<R: Read>(br: &mut BitReader<R>) -> Result<HuffTree, HuffError> {
    let magic = br
        .bint(BITS_PER_INT)?
        .ok_or(HuffError::UnexpectedEndOfInput)?;
    if magic != MAGIC_NUMBER as usize {
        error!("Fatal error: found {:#010x} where the magic number belongs.", magic);
        return Err(HuffError::Format(format!(
            "bad magic number {:#010x}",
            magic
        )));
    }

    let mut seq = 0;
    let root = read_node(br, 0, &mut seq)?;
    if root.is_leaf() {
        return Err(HuffError::Format("code tree has a single leaf".to_string()));
    }
    info!("Read a code tree with {} leaves.", root.leaf_count());
    Ok(HuffTree { root })
}

fn read_node<R: Read>(
    br: &mut BitReader<R>,
    depth: usize,
    seq: &mut usize,
) -> Result<Node, HuffError> {
    // A tree of ALPH_SIZE + 1 leaves can be no deeper than ALPH_SIZE.
    if depth > ALPH_SIZE {
        return Err(HuffError::Format(format!(
            "code tree deeper than {} at {}",
            ALPH_SIZE,
            br.loc()
        )));
    }
    let is_leaf = br.bool_bit()?.ok_or(HuffError::UnexpectedEndOfInput)?;
    let node_data = if is_leaf {
        let symbol = br
            .bint(BITS_PER_WORD + 1)?
            .ok_or(HuffError::UnexpectedEndOfInput)?;
        if symbol > PSEUDO_EOF {
            return Err(HuffError::Format(format!("leaf symbol {} out of range", symbol)));
        }
        NodeData::Leaf(symbol as u16)
    } else {
        let left = read_node(br, depth + 1, seq)?;
        let right = read_node(br, depth + 1, seq)?;
        NodeData::Kids(Box::new(left), Box::new(right))
    };
    *seq += 1;
    Ok(Node::new(0, *seq - 1, node_data))
}

#[cfg(test)]
mod test {
    use super::{read_header, write_header};
    use crate::bitstream::bitreader::BitReader;
    use crate::bitstream::bitwriter::BitWriter;
    use crate::error::HuffError;
    use crate::huffman_coding::huffman::HuffTree;
    use crate::tools::freq_count::FreqCount;

    fn tree_for(data: &[u8]) -> HuffTree {
        let mut fc = FreqCount::new();
        fc.count_symbols(data.iter().map(|&b| b as usize));
        HuffTree::build(&fc)
    }

    fn header_bytes(tree: &HuffTree) -> (usize, Vec<u8>) {
        let mut bw = BitWriter::new(Vec::new());
        let size = write_header(&tree.root, &mut bw).unwrap();
        bw.flush().unwrap();
        (size, bw.into_inner())
    }

    #[test]
    fn header_layout_test() {
        // Two leaves: 32 bit magic, 0, 1 + 9 bit eof, 1 + 9 bit 'a'
        let tree = tree_for(b"aaaa");
        let (size, bytes) = header_bytes(&tree);
        assert_eq!(size, 32 + 1 + 10 + 10);
        assert_eq!(&bytes[0..4], &1234567873_u32.to_be_bytes());
        // 0 1 100000000 1 001100001 then padding
        assert_eq!(&bytes[4..], &[0b0110_0000, 0b0001_0011, 0b0000_1000]);
    }

    #[test]
    fn header_size_test() {
        // n leaves and n - 1 internal nodes
        let tree = tree_for(b"teststring");
        let (size, _) = header_bytes(&tree);
        assert_eq!(size, 32 + 8 * 10 + 7);
    }

    #[test]
    fn round_trip_test() {
        let inputs: [&[u8]; 5] = [b"teststring", b"a", b"", b"abcc", b"hello, world"];
        for data in inputs {
            let tree = tree_for(data);
            let (_, bytes) = header_bytes(&tree);
            let mut br = BitReader::new(bytes.as_slice());
            let read = read_header(&mut br).unwrap();
            assert!(read.root.same_shape(&tree.root));
            assert_eq!(read.root.weight, 0);
        }
    }

    #[test]
    fn bad_magic_test() {
        let tree = tree_for(b"teststring");
        let (_, mut bytes) = header_bytes(&tree);
        bytes[0] ^= 0xff;
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(HuffError::Format(_))));
    }

    #[test]
    fn truncated_header_test() {
        let tree = tree_for(b"teststring");
        let (_, bytes) = header_bytes(&tree);
        for cut in [0, 3, 6] {
            let mut br = BitReader::new(&bytes[..cut]);
            assert!(matches!(
                read_header(&mut br),
                Err(HuffError::UnexpectedEndOfInput)
            ));
        }
    }

    #[test]
    fn single_leaf_rejected_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(32, 1234567873).unwrap();
        bw.out_bit(true).unwrap();
        bw.out_bits(9, 256).unwrap();
        bw.flush().unwrap();
        let bytes = bw.into_inner();
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(HuffError::Format(_))));
    }

    #[test]
    fn out_of_range_leaf_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(32, 1234567873).unwrap();
        bw.out_bit(false).unwrap();
        bw.out_bit(true).unwrap();
        bw.out_bits(9, 300).unwrap();
        bw.flush().unwrap();
        let bytes = bw.into_inner();
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(HuffError::Format(_))));
    }

    #[test]
    fn runaway_depth_test() {
        // The magic number followed by nothing but 0 bits never reaches a leaf
        let mut bytes = 1234567873_u32.to_be_bytes().to_vec();
        bytes.extend(vec![0_u8; 64]);
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(HuffError::Format(_))));
    }
}
