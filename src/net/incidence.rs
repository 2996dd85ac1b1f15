//! 库所 × 迁移的关联矩阵 `C = Post - Pre` 封装.
use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::net::core::Net;
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::structure::Arc;

type SmallRow<T> = SmallVec<[T; 4]>;

/// 行按库所、列按迁移，顺序与网中的声明顺序一致。
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Incidence<T> {
    places: Vec<PlaceId>,
    transitions: Vec<TransitionId>,
    rows: Vec<SmallRow<T>>,
}

impl<T> Incidence<T>
where
    T: Clone,
{
    pub fn new(places: Vec<PlaceId>, transitions: Vec<TransitionId>, default: T) -> Self {
        let rows = places
            .iter()
            .map(|_| SmallRow::from_elem(default.clone(), transitions.len()))
            .collect();
        Self {
            places,
            transitions,
            rows,
        }
    }

    pub fn places(&self) -> &[PlaceId] {
        &self.places
    }

    pub fn transitions(&self) -> &[TransitionId] {
        &self.transitions
    }

    pub fn place_index(&self, place: &str) -> Option<usize> {
        self.places.iter().position(|id| id.as_str() == place)
    }

    pub fn transition_index(&self, transition: &str) -> Option<usize> {
        self.transitions.iter().position(|id| id.as_str() == transition)
    }

    pub fn to_vecs(&self) -> Vec<Vec<T>> {
        self.rows.iter().map(|row| row.to_vec()).collect()
    }
}

impl<T> Incidence<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T>,
{
    pub fn add_assign(&mut self, place: usize, transition: usize, delta: T) {
        let entry = &mut self.rows[place][transition];
        *entry = *entry + delta;
    }

    pub fn sub_assign(&mut self, place: usize, transition: usize, delta: T) {
        let entry = &mut self.rows[place][transition];
        *entry = *entry - delta;
    }
}

impl<T> fmt::Debug for Incidence<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Incidence")
            .field("places", &self.places)
            .field("transitions", &self.transitions)
            .field("rows", &self.rows)
            .finish()
    }
}

impl Incidence<i64> {
    /// 由网的弧计算关联矩阵。
    ///
    /// 只有普通弧产生非零项；双向弧先 -1 再 +1，净效应为 0；抑制弧不计入。
    /// 端点角色按集合成员关系判定，双向弧在正向失败时尝试反向。
    pub fn from_net(net: &Net) -> Self {
        let mut matrix = Incidence::new(
            net.places.keys().cloned().collect(),
            net.transitions.iter().map(|t| t.id.clone()).collect(),
            0i64,
        );

        for arc in net.arcs.values() {
            let forward = matrix.locate(arc.incoming(), arc.outgoing());
            let backward = matrix.locate(arc.outgoing(), arc.incoming());
            match arc {
                Arc::Bidirectional(_) => {
                    if let Some((place, transition)) = forward.or(backward) {
                        matrix.sub_assign(place, transition, 1);
                        matrix.add_assign(place, transition, 1);
                    }
                }
                Arc::Regular(_) => {
                    if let Some((place, transition)) = forward {
                        matrix.sub_assign(place, transition, 1);
                    }
                    if let Some((place, transition)) = backward {
                        matrix.add_assign(place, transition, 1);
                    }
                }
                Arc::Inhibitor(_) => {}
            }
        }

        matrix
    }

    fn locate(&self, place: &str, transition: &str) -> Option<(usize, usize)> {
        Some((self.place_index(place)?, self.transition_index(transition)?))
    }
}
