//! 运行时: 可发生判定与发生语义定义.
use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::net::ids::{ArcId, PlaceId, TransitionId};
use crate::net::structure::{Arc, Marking, Place, Transition};

pub type PlaceMap = IndexMap<PlaceId, Place>;
pub type ArcMap = IndexMap<ArcId, Arc>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetError {
    #[error("unsupported arc type {kind:?} on arc {arc}")]
    UnknownArcType { arc: ArcId, kind: String },
    #[error("selected transition not found: {0}")]
    UnknownTransition(String),
    #[error("no transition selected for conflict resolution")]
    MissingSelection,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Net {
    pub places: PlaceMap,
    pub transitions: Vec<Transition>,
    pub arcs: ArcMap,
    pub deterministic_mode: Option<bool>,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("marking", &self.marking())
            .field("transitions", &self.transitions)
            .field("arcs", &self.arcs.len())
            .field("deterministic_mode", &self.deterministic_mode)
            .finish()
    }
}

impl Default for Net {
    fn default() -> Self {
        Self::empty()
    }
}

impl Net {
    pub fn empty() -> Self {
        Self {
            places: IndexMap::new(),
            transitions: Vec::new(),
            arcs: IndexMap::new(),
            deterministic_mode: None,
        }
    }

    pub fn add_place(&mut self, place: Place) -> PlaceId {
        let id = place.id.clone();
        self.places.insert(id.clone(), place);
        id
    }

    pub fn add_transition(&mut self, transition: Transition) -> TransitionId {
        let id = transition.id.clone();
        self.transitions.push(transition);
        id
    }

    /// 加入弧，并登记到与之相连的迁移的 `arc_ids` 中。
    pub fn add_arc(&mut self, arc: Arc) -> ArcId {
        let id = arc.id().clone();
        for transition in self.transitions.iter_mut() {
            let touches = arc.enters(&transition.id) || arc.leaves(&transition.id);
            if touches && !transition.arc_ids.contains(&id) {
                transition.arc_ids.push(id.clone());
            }
        }
        self.arcs.insert(id.clone(), arc);
        id
    }

    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.deterministic_mode = Some(deterministic);
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic_mode.unwrap_or(false)
    }

    pub fn get_place(&self, place: &str) -> Option<&Place> {
        self.places.get(place)
    }

    pub fn get_place_mut(&mut self, place: &str) -> Option<&mut Place> {
        self.places.get_mut(place)
    }

    pub fn position_of(&self, transition: &str) -> Option<usize> {
        self.transitions
            .iter()
            .position(|candidate| candidate.id.as_str() == transition)
    }

    pub fn marking(&self) -> Marking {
        Marking::new(
            self.places
                .iter()
                .map(|(id, place)| (id.clone(), place.tokens()))
                .collect(),
        )
    }

    pub fn state_signature(&self) -> String {
        self.marking().signature()
    }

    pub fn total_tokens(&self) -> u64 {
        self.places.values().map(Place::tokens).sum()
    }

    pub fn disable_all(&mut self) {
        for transition in self.transitions.iter_mut() {
            transition.enabled = false;
        }
    }

    /// 按给定集合重写可发生标志。
    pub fn mark_enabled(&mut self, enabled: &[TransitionId]) {
        for transition in self.transitions.iter_mut() {
            transition.enabled = enabled.contains(&transition.id);
        }
    }

    /// 在当前标识下求值第 `index` 个迁移并写回其 `enabled` 标志。
    pub fn evaluate(&mut self, index: usize) -> bool {
        let Net {
            places,
            transitions,
            arcs,
            ..
        } = self;
        match transitions.get_mut(index) {
            Some(transition) => evaluate_transition(transition, arcs, places),
            None => false,
        }
    }

    /// 对全部迁移求值（彼此独立，均基于同一标识），返回可发生集。
    pub fn evaluate_all(&mut self) -> Vec<TransitionId> {
        let mut enabled = Vec::new();
        for index in 0..self.transitions.len() {
            if self.evaluate(index) {
                enabled.push(self.transitions[index].id.clone());
            }
        }
        enabled
    }

    /// 发生第 `index` 个迁移。不检查可发生性，也不刷新任何 `enabled` 标志。
    pub fn fire(&mut self, index: usize) {
        let Net {
            places,
            transitions,
            arcs,
            ..
        } = self;
        if let Some(transition) = transitions.get(index) {
            fire_transition(transition, arcs, places);
        }
    }
}

/// 判定 `transition` 在 `places` 的当前标识下是否可发生，并写回 `transition.enabled`。
///
/// 依次检查：抑制弧、双向弧前置条件、输入 token 需求、输出库所容量。
/// 未知的弧 id 以及端点不是已知库所的弧均被忽略。
pub fn evaluate_transition(transition: &mut Transition, arcs: &ArcMap, places: &PlaceMap) -> bool {
    let enabled = is_enabled(transition, arcs, places);
    transition.enabled = enabled;
    enabled
}

fn incident_arcs<'a>(
    transition: &'a Transition,
    arcs: &'a ArcMap,
) -> impl Iterator<Item = &'a Arc> + 'a {
    transition
        .arc_ids
        .iter()
        .filter_map(move |arc_id| arcs.get(arc_id))
}

fn is_enabled(transition: &Transition, arcs: &ArcMap, places: &PlaceMap) -> bool {
    let id = &transition.id;

    for arc in incident_arcs(transition, arcs) {
        if let Arc::Inhibitor(ends) = arc {
            if arc.enters(id) && places.get(ends.incoming.as_str()).is_some_and(|p| p.tokens() > 0) {
                return false;
            }
        }
    }

    for arc in incident_arcs(transition, arcs) {
        if let Arc::Bidirectional(_) = arc {
            if places.get(arc.opposite(id)).is_some_and(|p| p.tokens() < 1) {
                return false;
            }
        }
    }

    let mut required: HashMap<&str, u64> = HashMap::new();
    for arc in incident_arcs(transition, arcs) {
        match arc {
            Arc::Regular(ends) | Arc::Bidirectional(ends) if arc.enters(id) => {
                *required.entry(ends.incoming.as_str()).or_default() += 1;
            }
            _ => {}
        }
    }
    for (place, needed) in &required {
        if places.get(*place).is_some_and(|p| p.tokens() < *needed) {
            return false;
        }
    }

    let mut delta: HashMap<&str, i64> = HashMap::new();
    for arc in incident_arcs(transition, arcs) {
        if let Arc::Regular(ends) = arc {
            if arc.leaves(id) {
                *delta.entry(ends.outgoing.as_str()).or_default() += 1;
            } else if arc.enters(id) {
                *delta.entry(ends.incoming.as_str()).or_default() -= 1;
            }
        }
    }
    for (place, change) in &delta {
        if *change <= 0 {
            continue;
        }
        if places
            .get(*place)
            .is_some_and(|p| p.would_overflow(*change as u64))
        {
            return false;
        }
    }

    true
}

/// 发生 `transition`，仅修改与其弧相连的库所。
pub fn fire_transition(transition: &Transition, arcs: &ArcMap, places: &mut PlaceMap) {
    let id = &transition.id;
    for arc in incident_arcs(transition, arcs) {
        match arc {
            Arc::Regular(ends) => {
                if arc.enters(id) {
                    if let Some(source) = places.get_mut(ends.incoming.as_str()) {
                        source.remove_token();
                    }
                } else if arc.leaves(id) {
                    if let Some(target) = places.get_mut(ends.outgoing.as_str()) {
                        target.add_token();
                    }
                }
            }
            Arc::Bidirectional(_) => {
                if let Some(place) = places.get_mut(arc.opposite(id)) {
                    place.remove_token();
                    place.add_token();
                }
            }
            Arc::Inhibitor(_) => {}
        }
    }
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("fired {} -> {}", transition.id, signature_of(places));
    }
}

fn signature_of(places: &PlaceMap) -> String {
    Marking::new(
        places
            .iter()
            .map(|(id, place)| (id.clone(), place.tokens()))
            .collect(),
    )
    .signature()
}
