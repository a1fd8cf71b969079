use crate::error::{IndexError, Result};
use crate::index::sais;

/// 构建后缀数组（SA-IS，线性时间；小规模输入自动退化为倍增法）。
/// 输入为数值化的文本，每个符号取值于 `[0, max_symbol]`。
/// 文本无需以哨兵结尾；若末尾是唯一最小符号，其后缀必然位于 `SA[0]`。
pub fn build_sa(text: &[u32], max_symbol: u32) -> Result<Vec<u32>> {
    let n = text.len();
    if n >= u32::MAX as usize {
        return Err(IndexError::TextTooLong(n));
    }
    if let Some(pos) = text.iter().position(|&c| c > max_symbol) {
        return Err(IndexError::SymbolOutOfRange { pos, symbol: text[pos], max: max_symbol });
    }
    Ok(sais::sais(text, max_symbol))
}

/// 字节文本的便捷入口，字母表上界固定为 255。
pub fn build_sa_bytes(text: &[u8]) -> Result<Vec<u32>> {
    let ints: Vec<u32> = text.iter().map(|&b| u32::from(b)).collect();
    build_sa(&ints, u8::MAX as u32)
}

/// 构建后缀数组（基于倍增法，O(n log n) 排序）。
/// 先按首字符排序，之后每轮只在 rank 相同的组内按 `rank[i + k]` 重排，
/// k 依次取 1, 2, 4, ...，直到所有 rank 互不相同。
pub fn build_sa_doubling(text: &[u32]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    sa.sort_unstable_by_key(|&i| text[i]);

    let mut rank = vec![0usize; n];
    for i in 1..n {
        let (a, b) = (sa[i - 1], sa[i]);
        rank[b] = rank[a] + usize::from(text[a] != text[b]);
    }
    let mut tmp = vec![0usize; n];

    let mut k = 1usize;
    while rank[sa[n - 1]] + 1 < n {
        // 越过文本末尾的后缀视为最小（0），其余 rank 整体 +1
        let second = |i: usize| if i + k < n { rank[i + k] + 1 } else { 0 };

        let mut start = 0;
        while start < n {
            let mut end = start + 1;
            while end < n && rank[sa[end]] == rank[sa[start]] {
                end += 1;
            }
            if end - start > 1 {
                sa[start..end].sort_unstable_by_key(|&i| second(i));
            }
            start = end;
        }

        tmp[sa[0]] = 0;
        for i in 1..n {
            let a = sa[i - 1];
            let b = sa[i];
            let differs = rank[a] != rank[b] || second(a) != second(b);
            tmp[b] = tmp[a] + usize::from(differs);
        }

        // 复制回 rank
        std::mem::swap(&mut rank, &mut tmp);
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}
