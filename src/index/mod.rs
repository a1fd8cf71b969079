//! 索引构建：后缀数组（SA-IS / 倍增）、BWT、FM 索引与 LCP 数组。

pub mod bwt;
pub mod fm;
pub mod lcp;
pub mod sa;
pub mod sais;
