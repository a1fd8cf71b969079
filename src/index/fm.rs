use log::info;
use rayon::prelude::*;

use crate::error::{IndexError, Result};
use crate::index::{bwt, lcp, sa};
use crate::util::alphabet::{Alphabet, SENTINEL};

/// FM 索引构建参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Occ 采样间隔（行数）。1 表示保存完整 Occ 表；0 按 1 处理。
    pub occ_sample_rate: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { occ_sample_rate: 32 }
    }
}

/// FM 索引：
/// - 字母以 [0..sigma) 的 rank 编码，0 预留为 '$'，文本末尾总有且仅有一个哨兵。
/// - 采用定长分块的 Occ 采样（块内顺扫补偿）。
/// - 保存完整 SA，`locate` 直接从区间取位置。
///
/// 构建完成后只读，可在多个线程间共享查询。
#[derive(Debug, Clone)]
pub struct FMIndex {
    alphabet: Alphabet,
    sigma: usize,
    block: usize,
    /// rank 编码后的文本（含末尾哨兵）
    text: Vec<u8>,
    sa: Vec<u32>,
    /// BWT 序列（rank 编码，与 SA 同长度）
    bwt: Vec<u8>,
    /// C[c] = BWT 中 rank < c 的字符总数
    c: Vec<u32>,
    /// Occ 采样（按块存储，行优先展平）：occ_samples[block_id * sigma + c]
    occ_samples: Vec<u32>,
}

impl FMIndex {
    /// 使用默认配置构建。`order` 为显式字母序；为 None 时按字节值排序。
    pub fn build(text: &[u8], order: Option<&[u8]>) -> Result<Self> {
        Self::build_with_config(text, order, &IndexConfig::default())
    }

    pub fn build_with_config(text: &[u8], order: Option<&[u8]>, config: &IndexConfig) -> Result<Self> {
        // '$' 至多出现一次，且只能在末尾
        if let Some(pos) = text.iter().position(|&b| b == SENTINEL) {
            if pos + 1 != text.len() {
                return Err(IndexError::MisplacedSentinel { pos });
            }
        }
        let body = text.strip_suffix(&[SENTINEL]).unwrap_or(text);

        let alphabet = match order {
            Some(o) => Alphabet::from_order(o),
            None => Alphabet::from_text(body),
        };
        let mut ranks = alphabet.encode(body)?;
        ranks.push(0);

        let sa = sa::build_sa(&ranks, alphabet.max_rank())?;
        let text: Vec<u8> = ranks.iter().map(|&r| r as u8).collect();
        let bwt = bwt::build_bwt(&text, &sa);

        let sigma = alphabet.sigma();
        let block = config.occ_sample_rate.max(1);
        let c = build_c(&bwt, sigma);
        let occ_samples = build_occ_samples(&bwt, sigma, block);

        info!(
            "built FM index: n={}, sigma={}, occ sample rate={}, occ samples={}",
            text.len(),
            sigma,
            block,
            occ_samples.len()
        );

        Ok(Self { alphabet, sigma, block, text, sa, bwt, c, occ_samples })
    }

    /// 索引长度（含哨兵）
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    /// 原始文本长度（不含哨兵）
    pub fn text_len(&self) -> usize {
        self.bwt.len() - 1
    }

    /// 是否为空文本构建的索引（仅含哨兵）
    pub fn is_empty(&self) -> bool {
        self.text_len() == 0
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn sample_rate(&self) -> usize {
        self.block
    }

    pub fn sa(&self) -> &[u32] {
        &self.sa
    }

    /// rank 编码的 BWT
    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    /// 还原为原字节的 BWT
    pub fn bwt_bytes(&self) -> Vec<u8> {
        self.bwt.iter().map(|&r| self.alphabet.symbol(u32::from(r))).collect()
    }

    /// 原字节文本（含末尾 '$'）
    pub fn text_bytes(&self) -> Vec<u8> {
        self.text.iter().map(|&r| self.alphabet.symbol(u32::from(r))).collect()
    }

    pub fn c_array(&self) -> &[u32] {
        &self.c
    }

    #[inline]
    pub fn occ(&self, c: u8, pos: usize) -> u32 {
        // 返回 BWT[0..pos) 中 c 的出现次数
        if pos == 0 {
            return 0;
        }
        let bi = (pos - 1) / self.block; // 所在块编号
        let base = self.occ_samples[bi * self.sigma + c as usize];
        let start = bi * self.block;
        let add = self.bwt[start..pos].iter().filter(|&&ch| ch == c).count() as u32;
        base + add
    }

    #[inline]
    pub fn rank_range(&self, c: u8, l: usize, r: usize) -> (usize, usize) {
        // 返回在区间 [l, r) 上扩展字符 c 后的新区间
        let c0 = self.c[c as usize] as usize;
        let nl = c0 + self.occ(c, l) as usize;
        let nr = c0 + self.occ(c, r) as usize;
        (nl, nr)
    }

    /// 反向搜索精确匹配，返回 SA 上的半开区间 [l, r)。
    /// 模式含字母表外字符或区间变空时返回 None；空模式匹配全部行。
    pub fn backward_search(&self, pattern: &[u8]) -> Option<(usize, usize)> {
        let pat = self.alphabet.encode_pattern(pattern)?;
        let mut l = 0usize;
        let mut r = self.bwt.len();
        for &a in pat.iter().rev() {
            let (nl, nr) = self.rank_range(a as u8, l, r);
            if nl >= nr {
                return None;
            }
            l = nl;
            r = nr;
        }
        Some((l, r))
    }

    /// 模式出现次数。空模式返回 `len()`，即包括哨兵在内的每个起点。
    pub fn count(&self, pattern: &[u8]) -> usize {
        self.backward_search(pattern).map_or(0, |(l, r)| r - l)
    }

    /// 模式所有出现位置（0 起始，按后缀数组顺序）。长度恒等于 `count`。
    pub fn locate(&self, pattern: &[u8]) -> Vec<u32> {
        self.backward_search(pattern)
            .map(|(l, r)| self.sa_interval_positions(l, r).to_vec())
            .unwrap_or_default()
    }

    /// 取出 SA 区间对应的文本位置
    pub fn sa_interval_positions(&self, l: usize, r: usize) -> &[u32] {
        &self.sa[l..r]
    }

    /// 批量计数，查询间并行（索引只读共享）
    pub fn count_many<P>(&self, patterns: &[P]) -> Vec<usize>
    where
        P: AsRef<[u8]> + Sync,
    {
        patterns.par_iter().map(|p| self.count(p.as_ref())).collect()
    }

    /// 批量定位，查询间并行
    pub fn locate_many<P>(&self, patterns: &[P]) -> Vec<Vec<u32>>
    where
        P: AsRef<[u8]> + Sync,
    {
        patterns.par_iter().map(|p| self.locate(p.as_ref())).collect()
    }

    /// LF 映射：第 i 行后缀向左扩展一个字符后所在的行
    #[inline]
    pub fn lf(&self, i: usize) -> usize {
        let c = self.bwt[i];
        self.c[c as usize] as usize + self.occ(c, i) as usize
    }

    /// 仅用 BWT、C 与 Occ 还原文本（含末尾 '$'）
    pub fn invert_bwt(&self) -> Vec<u8> {
        let n = self.bwt.len();
        let mut ranks = vec![0u8; n];
        // 第 0 行是哨兵后缀，其 BWT 字符即文本倒数第二个符号
        let mut row = 0usize;
        for k in (0..n - 1).rev() {
            ranks[k] = self.bwt[row];
            row = self.lf(row);
        }
        ranks.iter().map(|&r| self.alphabet.symbol(u32::from(r))).collect()
    }

    /// 基于自身文本与 SA 计算 LCP 数组（长度 `len() - 1`）
    pub fn lcp(&self) -> Vec<u32> {
        lcp::kasai(&self.text, &self.sa)
    }
}

fn build_c(bwt: &[u8], sigma: usize) -> Vec<u32> {
    let mut freq = vec![0u32; sigma];
    for &ch in bwt {
        freq[ch as usize] += 1;
    }
    let mut c = vec![0u32; sigma];
    let mut acc = 0u32;
    for (slot, &f) in c.iter_mut().zip(&freq) {
        *slot = acc;
        acc += f;
    }
    c
}

fn build_occ_samples(bwt: &[u8], sigma: usize, block: usize) -> Vec<u32> {
    let n = bwt.len();
    let num_blocks = if n == 0 { 0 } else { (n + block - 1) / block };
    let mut occ_samples = vec![0u32; num_blocks * sigma];
    let mut running = vec![0u32; sigma];
    for bi in 0..num_blocks {
        // 记录到块起始位置的累计
        occ_samples[bi * sigma..(bi + 1) * sigma].copy_from_slice(&running);
        // 扫描本块内容，更新 running
        let start = bi * block;
        let end = ((bi + 1) * block).min(n);
        for &ch in &bwt[start..end] {
            running[ch as usize] += 1;
        }
    }
    occ_samples
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQ: &[u8] = b"ACGTACGTACGCAACCTCGATCGATCGTACGTACGTAGCTAGCTAGCTAGCTAGCTAGCTAGCTAGC";

    fn naive_positions(text: &[u8], pat: &[u8]) -> Vec<u32> {
        if pat.len() > text.len() {
            return Vec::new();
        }
        (0..=text.len() - pat.len())
            .filter(|&i| &text[i..i + pat.len()] == pat)
            .map(|i| i as u32)
            .collect()
    }

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn build_appends_sentinel() {
        let fm = FMIndex::build(b"ACGT", None).unwrap();
        assert_eq!(fm.len(), 5);
        assert_eq!(fm.text_len(), 4);
        assert_eq!(fm.sa()[0], 4);
        assert_eq!(fm.text_bytes(), b"ACGT$".to_vec());

        let fm2 = FMIndex::build(b"ACGT$", None).unwrap();
        assert_eq!(fm2.sa(), fm.sa());
        assert_eq!(fm2.bwt(), fm.bwt());
    }

    #[test]
    fn build_rejects_misplaced_sentinel() {
        assert_eq!(FMIndex::build(b"AC$GT", None).unwrap_err(), IndexError::MisplacedSentinel { pos: 2 });
        assert_eq!(FMIndex::build(b"AC$$", None).unwrap_err(), IndexError::MisplacedSentinel { pos: 2 });
        assert_eq!(FMIndex::build(b"$", None).unwrap().len(), 1);
    }

    #[test]
    fn c_array_and_occ_tables() {
        let fm = FMIndex::build_with_config(b"banana", None, &IndexConfig { occ_sample_rate: 1 }).unwrap();
        // $ a b n -> 0 1 2 3；BWT = a n n b $ a a
        assert_eq!(fm.bwt_bytes(), b"annb$aa".to_vec());
        assert_eq!(fm.c_array(), &[0u32, 1, 4, 5]);
        let a = fm.alphabet().rank(b'a').unwrap() as u8;
        let occ_a: Vec<u32> = (0..=fm.len()).map(|i| fm.occ(a, i)).collect();
        assert_eq!(occ_a, vec![0, 1, 1, 1, 1, 1, 2, 3]);
    }

    #[test]
    fn sampled_occ_matches_full_occ() {
        let full = FMIndex::build_with_config(SEQ, None, &IndexConfig { occ_sample_rate: 1 }).unwrap();
        for rate in [0, 2, 7, 32, 1000] {
            let sampled = FMIndex::build_with_config(SEQ, None, &IndexConfig { occ_sample_rate: rate }).unwrap();
            for c in 0..full.alphabet().sigma() as u8 {
                for i in 0..=full.len() {
                    assert_eq!(sampled.occ(c, i), full.occ(c, i), "rate={} c={} i={}", rate, c, i);
                }
            }
        }
    }

    #[test]
    fn count_and_locate_with_explicit_order() {
        let fm = FMIndex::build(SEQ, Some(&b"ACGT"[..])).unwrap();
        assert_eq!(fm.count(b"GATCG"), 2);
        assert_eq!(sorted(fm.locate(b"GATCG")), vec![18, 22]);
        assert_eq!(fm.count(b"AGCT"), 7);
        assert_eq!(sorted(fm.locate(b"CG")), vec![1, 5, 9, 17, 21, 25, 29, 33]);
        assert_eq!(fm.count(b"TTTT"), 0);
        assert!(fm.locate(b"TTTT").is_empty());
    }

    #[test]
    fn unknown_symbol_yields_empty_result() {
        let fm = FMIndex::build(SEQ, None).unwrap();
        assert_eq!(fm.count(b"ACN"), 0);
        assert!(fm.locate(b"N").is_empty());
        assert_eq!(fm.backward_search(b"x"), None);
    }

    #[test]
    fn empty_pattern_matches_every_boundary() {
        let fm = FMIndex::build(b"ACGA", None).unwrap();
        assert_eq!(fm.count(b""), 5);
        assert_eq!(sorted(fm.locate(b"")), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn pattern_longer_than_text() {
        let fm = FMIndex::build(b"ACG", None).unwrap();
        assert_eq!(fm.count(b"ACGA"), 0);
        assert_eq!(fm.count(b"ACGACG"), 0);
    }

    #[test]
    fn sentinel_in_pattern_anchors_text_end() {
        let fm = FMIndex::build(b"ACGAC", None).unwrap();
        assert_eq!(fm.count(b"AC"), 2);
        assert_eq!(fm.locate(b"AC$"), vec![3]);
    }

    #[test]
    fn invert_bwt_reproduces_text() {
        for text in [&b""[..], &b"A"[..], &b"banana"[..], &b"mississippi"[..], SEQ] {
            let fm = FMIndex::build(text, None).unwrap();
            let mut expected = text.to_vec();
            expected.push(SENTINEL);
            assert_eq!(fm.invert_bwt(), expected);
        }
    }

    #[test]
    fn lcp_of_index() {
        let fm = FMIndex::build(b"banana", None).unwrap();
        // $, a$, ana$, anana$, banana$, na$, nana$
        assert_eq!(fm.lcp(), vec![0, 1, 3, 0, 0, 2]);
    }

    #[test]
    fn batch_queries_match_single_queries() {
        let fm = FMIndex::build(SEQ, None).unwrap();
        let patterns: Vec<&[u8]> = vec![&b"A"[..], &b"GATCG"[..], &b"AGCTAGC"[..], &b"N"[..], &b""[..]];
        let counts = fm.count_many(&patterns);
        let hits = fm.locate_many(&patterns);
        for (i, p) in patterns.iter().enumerate() {
            assert_eq!(counts[i], fm.count(p));
            assert_eq!(hits[i], fm.locate(p));
        }
    }

    #[test]
    fn count_matches_naive_on_generated_text() {
        let mut x: u32 = 7;
        let text: Vec<u8> = (0..500)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                b"ACGT"[(x >> 16) as usize % 4]
            })
            .collect();
        let fm = FMIndex::build(&text, None).unwrap();
        for start in (0..480).step_by(37) {
            for len in 1..=8 {
                let pat = &text[start..start + len];
                let expected = naive_positions(&text, pat);
                assert_eq!(fm.count(pat), expected.len());
                assert_eq!(sorted(fm.locate(pat)), expected);
            }
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// SA 中相邻后缀严格递增，哨兵后缀位于首位
            #[test]
            fn prop_sa_sorted(text in "[ACGT]{0,300}") {
                let fm = FMIndex::build(text.as_bytes(), None).unwrap();
                let full = fm.text_bytes();
                prop_assert_eq!(fm.sa()[0] as usize, text.len());
                for w in fm.sa().windows(2) {
                    prop_assert!(full[w[0] as usize..] < full[w[1] as usize..]);
                }
            }

            /// BWT 经 LF 映射可还原原文
            #[test]
            fn prop_bwt_invertible(text in "[ACGTN]{0,300}") {
                let fm = FMIndex::build(text.as_bytes(), None).unwrap();
                let mut expected = text.into_bytes();
                expected.push(SENTINEL);
                prop_assert_eq!(fm.invert_bwt(), expected);
            }

            /// count / locate 与朴素匹配一致
            #[test]
            fn prop_count_locate_match_naive(text in "[AC]{0,200}", pat in "[ACG]{1,6}") {
                let fm = FMIndex::build(text.as_bytes(), None).unwrap();
                let expected = naive_positions(text.as_bytes(), pat.as_bytes());
                let located = sorted(fm.locate(pat.as_bytes()));
                prop_assert_eq!(fm.count(pat.as_bytes()), located.len());
                prop_assert_eq!(located, expected);
            }

            /// LCP 与朴素公共前缀长度一致
            #[test]
            fn prop_lcp_matches_naive(text in "[AB]{0,200}") {
                let fm = FMIndex::build(text.as_bytes(), None).unwrap();
                let full = fm.text_bytes();
                let lcp = fm.lcp();
                for (i, w) in fm.sa().windows(2).enumerate() {
                    let a = &full[w[0] as usize..];
                    let b = &full[w[1] as usize..];
                    let naive = a.iter().zip(b).take_while(|(x, y)| x == y).count() as u32;
                    prop_assert_eq!(lcp[i], naive);
                }
            }
        }
    }
}
