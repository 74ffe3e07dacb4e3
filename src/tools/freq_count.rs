use std::io::Read;

use log::trace;
use rustc_hash::FxHashMap;

use crate::bitstream::bitreader::BitReader;
use crate::error::HuffError;
use crate::huffman_coding::{ALPH_SIZE, BITS_PER_WORD};

/// Sparse frequency count of the symbols seen in one input.
#[derive(Debug, Default, Clone)]
pub struct FreqCount {
    counts: FxHashMap<u16, usize>,
}

impl FreqCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read fixed width words from the source until it runs dry, counting each one.
    /// Returns how many symbols were counted.
    pub fn count_all<R: Read>(&mut self, source: &mut BitReader<R>) -> Result<usize, HuffError> {
        let mut counted = 0;
        while let Some(symbol) = source.bint(BITS_PER_WORD)? {
            if self.tally(symbol) {
                counted += 1;
            }
        }
        Ok(counted)
    }

    /// Count every symbol in the iterator. Symbols outside the alphabet are skipped, not
    /// reported. Returns how many symbols were counted.
    pub fn count_symbols<I: IntoIterator<Item = usize>>(&mut self, symbols: I) -> usize {
        symbols
            .into_iter()
            .filter(|&symbol| self.tally(symbol))
            .count()
    }

    fn tally(&mut self, symbol: usize) -> bool {
        if symbol >= ALPH_SIZE {
            trace!("Skipping out of range symbol {}", symbol);
            return false;
        }
        *self.counts.entry(symbol as u16).or_insert(0) += 1;
        true
    }

    /// Count for one symbol, 0 if it was never seen.
    pub fn get_count(&self, symbol: usize) -> Result<usize, HuffError> {
        check_symbol(symbol)?;
        Ok(self.counts.get(&(symbol as u16)).copied().unwrap_or(0))
    }

    /// Record one more occurrence of the symbol.
    pub fn add(&mut self, symbol: usize) -> Result<(), HuffError> {
        check_symbol(symbol)?;
        *self.counts.entry(symbol as u16).or_insert(0) += 1;
        Ok(())
    }

    /// Overwrite the count for the symbol.
    pub fn set(&mut self, symbol: usize, value: usize) -> Result<(), HuffError> {
        check_symbol(symbol)?;
        self.counts.insert(symbol as u16, value);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn table(&self) -> &FxHashMap<u16, usize> {
        &self.counts
    }

    /// Symbols with a non-zero count, in ascending symbol order.
    pub fn symbols(&self) -> Vec<(u16, usize)> {
        let mut symbols = self
            .counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&symbol, &count)| (symbol, count))
            .collect::<Vec<(u16, usize)>>();
        symbols.sort_unstable();
        symbols
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

fn check_symbol(symbol: usize) -> Result<(), HuffError> {
    if symbol >= ALPH_SIZE {
        return Err(HuffError::InvalidSymbol(symbol));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::FreqCount;
    use crate::bitstream::bitreader::BitReader;
    use crate::error::HuffError;

    #[test]
    fn count_all_test() {
        let mut fc = FreqCount::new();
        let mut br = BitReader::new("teststring".as_bytes());
        assert_eq!(fc.count_all(&mut br).unwrap(), 10);
        assert_eq!(fc.get_count(b't' as usize).unwrap(), 3);
        assert_eq!(fc.get_count(b's' as usize).unwrap(), 2);
        for c in "ering".bytes() {
            assert_eq!(fc.get_count(c as usize).unwrap(), 1);
        }
        assert_eq!(fc.table().len(), 7);
        assert_eq!(fc.total(), 10);
    }

    #[test]
    fn unseen_symbol_test() {
        let fc = FreqCount::new();
        assert_eq!(fc.get_count(0).unwrap(), 0);
        assert_eq!(fc.get_count(255).unwrap(), 0);
    }

    #[test]
    fn invalid_symbol_test() {
        let mut fc = FreqCount::new();
        assert!(matches!(fc.get_count(256), Err(HuffError::InvalidSymbol(256))));
        assert!(matches!(fc.add(300), Err(HuffError::InvalidSymbol(300))));
        assert!(matches!(fc.set(1000, 4), Err(HuffError::InvalidSymbol(1000))));
    }

    #[test]
    fn lenient_count_test() {
        let mut fc = FreqCount::new();
        let counted = fc.count_symbols(vec![1, 2, 256, 2, 9999, 255]);
        assert_eq!(counted, 4);
        assert_eq!(fc.get_count(2).unwrap(), 2);
        assert_eq!(fc.get_count(255).unwrap(), 1);
        assert_eq!(fc.table().len(), 3);
    }

    #[test]
    fn add_set_clear_test() {
        let mut fc = FreqCount::new();
        fc.add(b'a' as usize).unwrap();
        fc.add(b'a' as usize).unwrap();
        assert_eq!(fc.get_count(b'a' as usize).unwrap(), 2);
        fc.set(b'a' as usize, 7).unwrap();
        assert_eq!(fc.get_count(b'a' as usize).unwrap(), 7);
        fc.clear();
        assert_eq!(fc.get_count(b'a' as usize).unwrap(), 0);
        assert!(fc.table().is_empty());
    }

    #[test]
    fn symbols_sorted_test() {
        let mut fc = FreqCount::new();
        fc.count_symbols("zebra".bytes().map(|b| b as usize));
        fc.set(b'q' as usize, 0).unwrap();
        let syms = fc.symbols();
        assert_eq!(
            syms,
            vec![(b'a' as u16, 1), (b'b' as u16, 1), (b'e' as u16, 1), (b'r' as u16, 1), (b'z' as u16, 1)]
        );
    }
}
