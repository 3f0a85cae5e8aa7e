use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 履歴の最大件数
pub const HISTORY_CAPACITY: usize = 10;

/// 新しい順・容量固定の履歴（溢れたら最古を捨てる）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
}

impl<T> BoundedHistory<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// 先頭に追加し、容量を超えた分を末尾（最古）から捨てる
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push_front(item);
        if self.items.len() > HISTORY_CAPACITY {
            self.items.pop_back()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for BoundedHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for BoundedHistory<T> {
    /// 新しい順に並んだ要素から作成（容量を超えた古い分は捨てる）
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().take(HISTORY_CAPACITY).collect(),
        }
    }
}
