/*
 * MIT License
 *
 * Copyright (c) 2022 Joseph Sacchini
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use std::cmp::Ordering;

/// k is often "everything", so don't reserve more than this up front
const PREALLOC_LIMIT: usize = 1024;

///
/// Keeps the best k items seen from an iterator without sorting (or even storing) all of them.
///
/// "Best" is decided by a comparator: an item that compares as Ordering::Less ranks ahead of the
/// other one, exactly like the comparator you'd hand to sort_by. Items that compare Equal keep the
/// order they were seen in, so with a total comparator the output is fully deterministic.
///
pub fn top_k_by<I, F>(iter: I, k: usize, mut cmp: F) -> Vec<I::Item>
    where
        I: Iterator,
        F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    if k == 0 {
        return Vec::new();
    }

    // always sorted from best -> worst, never longer than k
    let mut items: Vec<I::Item> = Vec::with_capacity(k.min(PREALLOC_LIMIT) + 1);
    for next in iter {
        if items.len() == k {
            if let Some(worst) = items.last() {
                if cmp(&next, worst) != Ordering::Less {
                    continue;
                }
            }
        }

        // first slot holding something strictly worse than next
        let idx = items.partition_point(|item| cmp(item, &next) != Ordering::Greater);
        items.insert(idx, next);
        items.truncate(k);
    }

    items
}

pub trait TopKExt: Iterator + Sized {
    fn top_k_by<F>(self, k: usize, cmp: F) -> Vec<Self::Item>
        where
            F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        top_k_by(self, k, cmp)
    }
}

impl<I> TopKExt for I where I: Iterator + Sized {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_largest() {
        let top = [5, 1, 9, 3, 7, 2].into_iter().top_k_by(3, |a, b| b.cmp(a));
        assert_eq!(top, vec![9, 7, 5]);
    }

    #[test]
    fn test_fewer_items_than_k() {
        let top = [2, 8].into_iter().top_k_by(5, |a, b| b.cmp(a));
        assert_eq!(top, vec![8, 2]);
        assert!(std::iter::empty::<u32>().top_k_by(3, |a, b| b.cmp(a)).is_empty());
        assert!([1, 2].into_iter().top_k_by(0, |a, b| b.cmp(a)).is_empty());
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let items = [("a", 1), ("b", 3), ("c", 3), ("d", 1), ("e", 3)];
        let top = items.into_iter().top_k_by(2, |a, b| b.1.cmp(&a.1));
        assert_eq!(top, vec![("b", 3), ("c", 3)]);
    }

    #[test]
    fn test_unbounded_k_returns_everything_sorted() {
        let top = [4, 6, 1, 8].into_iter().top_k_by(usize::MAX, |a, b| b.cmp(a));
        assert_eq!(top, vec![8, 6, 4, 1]);
    }

    #[test]
    fn test_matches_full_sort() {
        let items: Vec<u32> = (0..200).map(|i| (i * 7919) % 211).collect();
        let mut sorted = items.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        sorted.truncate(10);
        assert_eq!(items.into_iter().top_k_by(10, |a, b| b.cmp(a)), sorted);
    }
}
