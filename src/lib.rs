//! # sais-fm
//!
//! 基于诱导排序（SA-IS）的后缀数组与 FM 索引全文检索。
//!
//! 本 crate 提供：
//!
//! - **后缀数组构建**：SA-IS 线性时间算法，小规模输入退化为 O(n log n) 倍增法
//! - **BWT**：由后缀数组直接导出
//! - **FM 索引**：C 表 + 采样 Occ 表，反向搜索支持 `count` / `locate`
//! - **LCP 数组**：Kasai 算法
//!
//! ## 快速示例
//!
//! ```rust
//! use sais_fm::index::fm::FMIndex;
//!
//! let seq = b"ACGTACGTACGCAACCTCGATCGATCGTACGTACGTAGCTAGCTAGCTAGCTAGCTAGCTAGCTAGC";
//! let fm = FMIndex::build(seq, Some(&b"ACGT"[..])).unwrap();
//!
//! assert_eq!(fm.count(b"GATCG"), 2);
//! let mut hits = fm.locate(b"GATCG");
//! hits.sort_unstable();
//! assert_eq!(hits, vec![18, 22]);
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 后缀数组、BWT、FM 索引、LCP 数组
//! - [`util`] — 字节到稠密 rank 的字母表映射
//! - [`error`] — 构建阶段的错误类型

pub mod error;
pub mod index;
pub mod util;

pub use error::{IndexError, Result};
pub use index::fm::{FMIndex, IndexConfig};
pub use index::lcp::build_lcp;
pub use index::sa::{build_sa, build_sa_bytes};
