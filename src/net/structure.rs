//! 网静态结构元素：库所、迁移、弧与标识。
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::net::core::NetError;
use crate::net::description::PlaceDescription;
use crate::net::ids::{ArcId, PlaceId, TransitionId};

pub type Weight = u64;

/// 库所。`bounded` 为真时 `tokens ≤ capacity` 恒成立。
///
/// 序列化形式与 [`PlaceDescription`] 相同，反序列化经 [`Place::from_raw`] 规范化。
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(from = "PlaceDescription", into = "PlaceDescription")]
pub struct Place {
    pub id: PlaceId,
    tokens: Weight,
    bounded: bool,
    capacity: Option<Weight>,
}

impl Place {
    /// 无界库所。
    pub fn new(id: impl Into<PlaceId>, tokens: Weight) -> Self {
        Self {
            id: id.into(),
            tokens,
            bounded: false,
            capacity: None,
        }
    }

    /// 有界库所，初始 token 超出容量时截断。
    pub fn new_with_tokens_and_capacity(
        id: impl Into<PlaceId>,
        tokens: Weight,
        capacity: Weight,
    ) -> Self {
        Self {
            id: id.into(),
            tokens: tokens.min(capacity),
            bounded: true,
            capacity: Some(capacity),
        }
    }

    /// 按描述中的原始值构造：负数视为 0，有界但缺失容量时容量为 0。
    pub fn from_raw(id: impl Into<PlaceId>, tokens: i64, bounded: bool, capacity: Option<i64>) -> Self {
        let tokens = tokens.max(0) as Weight;
        if bounded {
            let capacity = capacity.unwrap_or(0).max(0) as Weight;
            Self::new_with_tokens_and_capacity(id, tokens, capacity)
        } else {
            Self::new(id, tokens)
        }
    }

    pub fn tokens(&self) -> Weight {
        self.tokens
    }

    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    pub fn capacity(&self) -> Option<Weight> {
        if self.bounded { self.capacity } else { None }
    }

    pub fn set_tokens(&mut self, tokens: Weight) {
        self.tokens = match self.capacity() {
            Some(capacity) => tokens.min(capacity),
            None => tokens,
        };
    }

    /// 容量已满时无效果。
    pub fn add_token(&mut self) {
        if self.capacity().is_none_or(|capacity| self.tokens < capacity) {
            self.tokens += 1;
        }
    }

    pub fn remove_token(&mut self) {
        self.tokens = self.tokens.saturating_sub(1);
    }

    /// 增加 `delta` 个 token 后是否会超出容量。
    pub fn would_overflow(&self, delta: Weight) -> bool {
        self.capacity()
            .is_some_and(|capacity| self.tokens + delta > capacity)
    }
}

/// 迁移。`enabled` 为派生标志，每次求值时重新计算。
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Transition {
    pub id: TransitionId,
    pub enabled: bool,
    pub arc_ids: Vec<ArcId>,
}

impl Transition {
    pub fn new(id: impl Into<TransitionId>) -> Self {
        Self {
            id: id.into(),
            enabled: false,
            arc_ids: Vec::new(),
        }
    }

    pub fn with_arcs<I, A>(id: impl Into<TransitionId>, arc_ids: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArcId>,
    {
        Self {
            id: id.into(),
            enabled: false,
            arc_ids: arc_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .field("arc_ids", &self.arc_ids)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArcKind {
    Regular,
    Inhibitor,
    Bidirectional,
}

impl ArcKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArcKind::Regular => "REGULAR",
            ArcKind::Inhibitor => "INHIBITOR",
            ArcKind::Bidirectional => "BIDIRECTIONAL",
        }
    }
}

impl fmt::Display for ArcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArcKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGULAR" => Ok(ArcKind::Regular),
            "INHIBITOR" => Ok(ArcKind::Inhibitor),
            "BIDIRECTIONAL" => Ok(ArcKind::Bidirectional),
            other => Err(other.to_owned()),
        }
    }
}

/// 弧的端点，方向为 `incoming → outgoing`。端点可能是库所也可能是迁移。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArcEnds {
    pub id: ArcId,
    pub incoming: String,
    pub outgoing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arc {
    Regular(ArcEnds),
    Inhibitor(ArcEnds),
    Bidirectional(ArcEnds),
}

impl Arc {
    pub fn new(
        kind: ArcKind,
        id: impl Into<ArcId>,
        incoming: impl Into<String>,
        outgoing: impl Into<String>,
    ) -> Self {
        let ends = ArcEnds {
            id: id.into(),
            incoming: incoming.into(),
            outgoing: outgoing.into(),
        };
        match kind {
            ArcKind::Regular => Arc::Regular(ends),
            ArcKind::Inhibitor => Arc::Inhibitor(ends),
            ArcKind::Bidirectional => Arc::Bidirectional(ends),
        }
    }

    /// 由描述中的类型字符串构造，未知类型返回 [`NetError::UnknownArcType`]。
    pub fn parse(
        kind: &str,
        id: impl Into<ArcId>,
        incoming: impl Into<String>,
        outgoing: impl Into<String>,
    ) -> Result<Self, NetError> {
        let id = id.into();
        let kind = kind
            .parse::<ArcKind>()
            .map_err(|kind| NetError::UnknownArcType {
                arc: id.clone(),
                kind,
            })?;
        Ok(Self::new(kind, id, incoming, outgoing))
    }

    pub fn kind(&self) -> ArcKind {
        match self {
            Arc::Regular(_) => ArcKind::Regular,
            Arc::Inhibitor(_) => ArcKind::Inhibitor,
            Arc::Bidirectional(_) => ArcKind::Bidirectional,
        }
    }

    pub fn ends(&self) -> &ArcEnds {
        match self {
            Arc::Regular(ends) | Arc::Inhibitor(ends) | Arc::Bidirectional(ends) => ends,
        }
    }

    pub fn id(&self) -> &ArcId {
        &self.ends().id
    }

    pub fn incoming(&self) -> &str {
        &self.ends().incoming
    }

    pub fn outgoing(&self) -> &str {
        &self.ends().outgoing
    }

    /// place → transition
    pub fn enters(&self, transition: &TransitionId) -> bool {
        self.outgoing() == transition.as_str()
    }

    /// transition → place
    pub fn leaves(&self, transition: &TransitionId) -> bool {
        self.incoming() == transition.as_str()
    }

    /// 与 `transition` 相连的另一端（不论方向）。
    pub fn opposite(&self, transition: &TransitionId) -> &str {
        if self.leaves(transition) {
            self.outgoing()
        } else {
            self.incoming()
        }
    }
}

/// 标识：库所到 token 数的有序映射，按库所 id 排序。
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marking(pub BTreeMap<PlaceId, Weight>);

impl Marking {
    pub fn new(initial: BTreeMap<PlaceId, Weight>) -> Self {
        Self(initial)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlaceId, &Weight)> {
        self.0.iter()
    }

    /// 状态签名：`id:tokens` 按库所 id 排序后以逗号连接。
    pub fn signature(&self) -> String {
        self.0
            .iter()
            .map(|(place, tokens)| format!("{}:{}", place, tokens))
            .join(",")
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (place, tokens) in self.iter() {
            map.entry(&place.as_str(), tokens);
        }
        map.finish()
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}
