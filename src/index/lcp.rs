use crate::error::{IndexError, Result};

/// Kasai 算法构建 LCP 数组：`lcp[i]` 为排名 i 与 i+1 的后缀的最长公共前缀长度。
///
/// 按文本位置顺序处理后缀，相邻位置的 LCP 至多减少 1，因此字符比较总次数为 O(n)。
/// 返回长度为 `n - 1`（n <= 1 时为空）。
pub fn build_lcp<T: Eq>(text: &[T], sa: &[u32]) -> Result<Vec<u32>> {
    let n = text.len();
    if sa.len() != n {
        return Err(IndexError::SuffixArrayMismatch { sa_len: sa.len(), text_len: n });
    }

    // 逆后缀数组：位置 -> 排名
    let mut rank = vec![0usize; n];
    for (row, &p) in sa.iter().enumerate() {
        if p as usize >= n {
            return Err(IndexError::IndexOutOfRange { row, value: p, len: n });
        }
        rank[p as usize] = row;
    }
    Ok(kasai_with_rank(text, sa, &rank))
}

/// 调用方保证 `sa` 是 `text` 的合法后缀数组。
pub(crate) fn kasai<T: Eq>(text: &[T], sa: &[u32]) -> Vec<u32> {
    let mut rank = vec![0usize; sa.len()];
    for (row, &p) in sa.iter().enumerate() {
        rank[p as usize] = row;
    }
    kasai_with_rank(text, sa, &rank)
}

fn kasai_with_rank<T: Eq>(text: &[T], sa: &[u32], rank: &[usize]) -> Vec<u32> {
    let n = text.len();
    if n < 2 {
        return Vec::new();
    }

    let mut lcp = vec![0u32; n - 1];
    let mut h = 0usize;
    for i in 0..n {
        let r = rank[i];
        if r + 1 == n {
            h = 0;
            continue;
        }
        let j = sa[r + 1] as usize;
        while i + h < n && j + h < n && text[i + h] == text[j + h] {
            h += 1;
        }
        lcp[r] = h as u32;
        h = h.saturating_sub(1);
    }
    lcp
}
