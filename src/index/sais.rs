//! SA-IS 诱导排序引擎。
//!
//! 流程：S/L 分类 → 桶边界 → 定位 LMS → 第一次诱导（得到 LMS 子串的顺序）
//! → 为 LMS 子串分配等价 rank → 若 rank 有重复则对缩减序列递归 → 按真实顺序
//! 重新诱导得到最终后缀数组。
//!
//! 每一层递归只持有自己的局部数组，没有任何全局状态。

use log::debug;

use crate::index::sa::build_sa_doubling;

/// 小于该长度的输入直接使用倍增法
pub const DOUBLING_THRESHOLD: usize = 100;

/// SA 槽位未填充的标记
const EMPTY: u32 = u32::MAX;
/// 非 LMS 位置在 lms_map 中的标记
const NOT_LMS: usize = usize::MAX;

/// 调用方需保证：`s` 中所有符号 `<= max_s`，且 `s.len() < u32::MAX`。
pub(crate) fn sais(s: &[u32], max_s: u32) -> Vec<u32> {
    let n = s.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![0],
        2 => return if s[0] < s[1] { vec![0, 1] } else { vec![1, 0] },
        _ => {}
    }
    if n < DOUBLING_THRESHOLD {
        return build_sa_doubling(s);
    }

    let ls = classify_sl(s);
    let (cnt_l, cnt_s) = bucket_bounds(s, &ls, max_s);
    let (lms, lms_map) = find_lms(&ls);

    let mut sa = vec![EMPTY; n];
    induce(s, &mut sa, &cnt_l, &cnt_s, &ls, &lms);
    resolve(s, &mut sa, &cnt_l, &cnt_s, &ls, &lms, &lms_map);
    sa
}

/// S/L 分类：`true` 为 S 型。末位按约定为 L 型；相邻字符相等时继承右侧类型。
pub(crate) fn classify_sl(s: &[u32]) -> Vec<bool> {
    let n = s.len();
    let mut ls = vec![false; n];
    for i in (0..n.saturating_sub(1)).rev() {
        ls[i] = if s[i] == s[i + 1] { ls[i + 1] } else { s[i] < s[i + 1] };
    }
    ls
}

/// 计算桶边界，两张表长度均为 `max_s + 2`：
/// - `cnt_l[c]`：符号 c 的桶起点（L 型部分的起点），`cnt_l[c + 1]` 即桶终点；
/// - `cnt_s[c]`：符号 c 的 S 型部分起点。
pub(crate) fn bucket_bounds(s: &[u32], ls: &[bool], max_s: u32) -> (Vec<usize>, Vec<usize>) {
    let sigma = max_s as usize + 1;
    let mut cnt_l = vec![0usize; sigma + 1];
    let mut cnt_s = vec![0usize; sigma + 1];
    for (&c, &is_s) in s.iter().zip(ls) {
        if is_s {
            cnt_l[c as usize + 1] += 1;
        } else {
            cnt_s[c as usize] += 1;
        }
    }
    // 交错前缀和：cnt_s[c] 先吸收 c 之前所有桶，再把 c 的 L/S 总数推进到 cnt_l[c + 1]
    for c in 0..sigma {
        cnt_s[c] += cnt_l[c];
        cnt_l[c + 1] += cnt_s[c];
    }
    (cnt_l, cnt_s)
}

/// 按文本顺序返回 LMS 位置，以及 位置 → LMS 序号 的映射。
pub(crate) fn find_lms(ls: &[bool]) -> (Vec<usize>, Vec<usize>) {
    let n = ls.len();
    let mut lms = Vec::new();
    let mut lms_map = vec![NOT_LMS; n];
    for i in 1..n {
        if !ls[i - 1] && ls[i] {
            lms_map[i] = lms.len();
            lms.push(i);
        }
    }
    (lms, lms_map)
}

/// 两遍诱导：LMS 依次放入各自 S 桶，正向扫描诱导 L 型前驱，
/// 反向扫描诱导 S 型前驱（覆盖掉播种的 LMS）。
fn induce(s: &[u32], sa: &mut [u32], cnt_l: &[usize], cnt_s: &[usize], ls: &[bool], lms: &[usize]) {
    let n = s.len();
    sa.fill(EMPTY);

    let mut buf = cnt_s.to_vec();
    for &d in lms {
        let c = s[d] as usize;
        sa[buf[c]] = d as u32;
        buf[c] += 1;
    }

    buf.copy_from_slice(cnt_l);
    // 末位之后隐含一个最小的虚拟哨兵，n-1 总是第一个被诱导的 L 型后缀
    let c = s[n - 1] as usize;
    sa[buf[c]] = (n - 1) as u32;
    buf[c] += 1;
    for i in 0..n {
        let v = sa[i];
        if v != EMPTY && v >= 1 && !ls[v as usize - 1] {
            let c = s[v as usize - 1] as usize;
            sa[buf[c]] = v - 1;
            buf[c] += 1;
        }
    }

    buf.copy_from_slice(cnt_l);
    for i in (0..n).rev() {
        let v = sa[i];
        if v != EMPTY && v >= 1 && ls[v as usize - 1] {
            let c = s[v as usize - 1] as usize + 1;
            buf[c] -= 1;
            sa[buf[c]] = v - 1;
        }
    }
}

/// 判断两个相邻（按诱导顺序）的 LMS 子串是否完全相同：长度相同且内容一致，
/// 包括结尾的 LMS 字符。延伸到文本末尾的子串与任何其他子串都不相同。
fn same_lms_substring(s: &[u32], lms: &[usize], lms_map: &[usize], a: usize, b: usize) -> bool {
    let n = s.len();
    let m = lms.len();
    let end_of = |p: usize| {
        let next = lms_map[p] + 1;
        if next < m { lms[next] } else { n }
    };
    let (end_a, end_b) = (end_of(a), end_of(b));
    if end_a - a != end_b - b {
        return false;
    }
    let (mut l, mut r) = (a, b);
    while l < end_a && s[l] == s[r] {
        l += 1;
        r += 1;
    }
    l < n && r < n && s[l] == s[r]
}

/// 为 LMS 子串分配 rank；rank 有重复时递归求解 LMS 后缀的真实顺序，
/// 然后按该顺序重新诱导。
fn resolve(
    s: &[u32],
    sa: &mut [u32],
    cnt_l: &[usize],
    cnt_s: &[usize],
    ls: &[bool],
    lms: &[usize],
    lms_map: &[usize],
) {
    let m = lms.len();
    if m == 0 {
        // 全部为 L 型（非增序列），第一次诱导结果即为最终结果
        return;
    }

    let sorted_lms: Vec<usize> = sa
        .iter()
        .map(|&v| v as usize)
        .filter(|&v| lms_map[v] != NOT_LMS)
        .collect();

    let mut rec_s = vec![0u32; m];
    let mut rec_max = 0u32;
    for w in sorted_lms.windows(2) {
        if !same_lms_substring(s, lms, lms_map, w[0], w[1]) {
            rec_max += 1;
        }
        rec_s[lms_map[w[1]]] = rec_max;
    }

    debug!(
        "sa-is level: n={}, lms={}, distinct lms substrings={}",
        s.len(),
        m,
        rec_max as usize + 1
    );

    let ordered_lms: Vec<usize> = if rec_max as usize + 1 == m {
        // rank 互不相同：诱导得到的顺序已经是 LMS 后缀的真实顺序
        sorted_lms
    } else {
        let rec_sa = sais(&rec_s, rec_max);
        rec_sa.iter().map(|&r| lms[r as usize]).collect()
    };
    induce(s, sa, cnt_l, cnt_s, ls, &ordered_lms);
}
