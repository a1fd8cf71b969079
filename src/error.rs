//! 索引构建的错误类型。
//!
//! 只有构建阶段会失败（前置条件不满足）；查询阶段遇到未知字符时返回 0 / 空结果，
//! 不视为错误。

use thiserror::Error;

/// 本 crate 的 Result 别名
pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// 文本中的符号超过了调用方给出的字母表上界
    #[error("symbol {symbol} at position {pos} exceeds alphabet bound {max}")]
    SymbolOutOfRange { pos: usize, symbol: u32, max: u32 },

    /// 文本长度超出 u32 后缀数组可寻址范围
    #[error("text of length {0} is too long for a u32 suffix array")]
    TextTooLong(usize),

    /// 哨兵 '$' 出现多次，或者不在末尾
    #[error("sentinel '$' at position {pos} must appear at most once and only as the last symbol")]
    MisplacedSentinel { pos: usize },

    /// 显式字母序中缺少文本里出现的符号
    #[error("symbol {symbol:?} at position {pos} is missing from the explicit alphabet order")]
    UnorderedSymbol { symbol: char, pos: usize },

    /// 后缀数组与文本长度不一致
    #[error("suffix array has {sa_len} entries but text has {text_len}")]
    SuffixArrayMismatch { sa_len: usize, text_len: usize },

    /// 后缀数组中的位置越界
    #[error("suffix array entry {value} at row {row} is out of range for text length {len}")]
    IndexOutOfRange { row: usize, value: u32, len: usize },
}
