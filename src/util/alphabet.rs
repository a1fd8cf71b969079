use crate::error::{IndexError, Result};

/// 哨兵字符，始终映射到 rank 0
pub const SENTINEL: u8 = b'$';

/// 未映射的字节
const UNMAPPED: u32 = u32::MAX;

/// 字节 → 稠密 rank 的映射。'$' 固定为 0，真实符号从 1 开始编号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    ranks: [u32; 256],
    symbols: Vec<u8>,
}

impl Alphabet {
    fn with_sentinel() -> Self {
        let mut ranks = [UNMAPPED; 256];
        ranks[SENTINEL as usize] = 0;
        Self { ranks, symbols: vec![SENTINEL] }
    }

    fn push(&mut self, b: u8) {
        if self.ranks[b as usize] == UNMAPPED {
            self.ranks[b as usize] = self.symbols.len() as u32;
            self.symbols.push(b);
        }
    }

    /// 隐式字母序：文本中出现过的字节按字节值升序编号。
    pub fn from_text(text: &[u8]) -> Self {
        let mut seen = [false; 256];
        for &b in text {
            seen[b as usize] = true;
        }
        let mut alpha = Self::with_sentinel();
        for b in 0..=u8::MAX {
            if seen[b as usize] {
                alpha.push(b);
            }
        }
        alpha
    }

    /// 显式字母序：按首次出现顺序编号，重复字节与 '$' 被忽略。
    pub fn from_order(order: &[u8]) -> Self {
        let mut alpha = Self::with_sentinel();
        for &b in order {
            alpha.push(b);
        }
        alpha
    }

    #[inline]
    pub fn rank(&self, b: u8) -> Option<u32> {
        match self.ranks[b as usize] {
            UNMAPPED => None,
            r => Some(r),
        }
    }

    #[inline]
    pub fn symbol(&self, rank: u32) -> u8 {
        self.symbols[rank as usize]
    }

    /// rank 的个数（含哨兵）
    pub fn sigma(&self) -> usize {
        self.symbols.len()
    }

    pub fn max_rank(&self) -> u32 {
        (self.symbols.len() - 1) as u32
    }

    /// 按 rank 顺序列出的符号（首个为 '$'）
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// 将文本整体编码为 rank 序列；遇到未映射字节时报错。
    pub fn encode(&self, text: &[u8]) -> Result<Vec<u32>> {
        text.iter()
            .enumerate()
            .map(|(pos, &b)| self.rank(b).ok_or(IndexError::UnorderedSymbol { symbol: char::from(b), pos }))
            .collect()
    }

    /// 编码查询模式；含未知字符时返回 None。
    pub fn encode_pattern(&self, pattern: &[u8]) -> Option<Vec<u32>> {
        pattern.iter().map(|&b| self.rank(b)).collect()
    }

    pub fn decode(&self, ranks: &[u32]) -> Vec<u8> {
        ranks.iter().map(|&r| self.symbol(r)).collect()
    }
}
