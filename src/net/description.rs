//! 网描述：边界层传入/传出的序列化形式，以及与 [`Net`] 之间的映射。
use serde::{Deserialize, Serialize};

use crate::net::core::{Net, NetError};
use crate::net::structure::{Arc, Place, Transition};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDescription {
    pub id: String,
    #[serde(default)]
    pub tokens: i64,
    #[serde(default)]
    pub bounded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDescription {
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub arc_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDescription {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub incoming_id: String,
    pub outgoing_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetDescription {
    #[serde(default)]
    pub places: Vec<PlaceDescription>,
    #[serde(default)]
    pub transitions: Vec<TransitionDescription>,
    #[serde(default)]
    pub arcs: Vec<ArcDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deterministic_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_transition_id: Option<String>,
}

/// 库所 id 与 token 数，用于校验请求的输入与期望输出。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceTokens {
    #[serde(alias = "placeId")]
    pub id: String,
    pub tokens: i64,
}

impl PlaceTokens {
    pub fn new(id: impl Into<String>, tokens: i64) -> Self {
        Self {
            id: id.into(),
            tokens,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    #[serde(flatten)]
    pub net: NetDescription,
    #[serde(default)]
    pub input_configs: Vec<PlaceTokens>,
    #[serde(default)]
    pub expected_outputs: Vec<PlaceTokens>,
}

impl NetDescription {
    /// 选中的迁移 id；缺失或为空时返回 [`NetError::MissingSelection`]。
    pub fn selection(&self) -> Result<&str, NetError> {
        match self.selected_transition_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(NetError::MissingSelection),
        }
    }
}

impl TryFrom<&NetDescription> for Net {
    type Error = NetError;

    fn try_from(description: &NetDescription) -> Result<Self, Self::Error> {
        let mut net = Net::empty();
        // 弧类型在任何求值之前映射
        for arc in &description.arcs {
            let arc = Arc::parse(&arc.kind, arc.id.as_str(), &arc.incoming_id, &arc.outgoing_id)?;
            net.arcs.insert(arc.id().clone(), arc);
        }
        for place in &description.places {
            net.add_place(Place::from(place));
        }
        for transition in &description.transitions {
            let mut mapped = Transition::with_arcs(
                transition.id.as_str(),
                transition.arc_ids.iter().map(String::as_str),
            );
            mapped.enabled = transition.enabled;
            net.add_transition(mapped);
        }
        net.deterministic_mode = description.deterministic_mode;
        Ok(net)
    }
}

impl TryFrom<NetDescription> for Net {
    type Error = NetError;

    fn try_from(description: NetDescription) -> Result<Self, Self::Error> {
        Net::try_from(&description)
    }
}

impl From<&PlaceDescription> for Place {
    fn from(place: &PlaceDescription) -> Self {
        Place::from_raw(place.id.as_str(), place.tokens, place.bounded, place.capacity)
    }
}

impl From<PlaceDescription> for Place {
    fn from(place: PlaceDescription) -> Self {
        Place::from(&place)
    }
}

impl From<&Place> for PlaceDescription {
    fn from(place: &Place) -> Self {
        PlaceDescription {
            id: place.id.to_string(),
            tokens: place.tokens() as i64,
            bounded: place.is_bounded(),
            capacity: place.capacity().map(|capacity| capacity as i64),
        }
    }
}

impl From<Place> for PlaceDescription {
    fn from(place: Place) -> Self {
        PlaceDescription::from(&place)
    }
}

impl From<&Net> for NetDescription {
    fn from(net: &Net) -> Self {
        Self {
            places: net
                .places
                .values()
                .map(PlaceDescription::from)
                .collect(),
            transitions: net
                .transitions
                .iter()
                .map(|transition| TransitionDescription {
                    id: transition.id.to_string(),
                    enabled: transition.enabled,
                    arc_ids: transition.arc_ids.iter().map(ToString::to_string).collect(),
                })
                .collect(),
            arcs: net
                .arcs
                .values()
                .map(|arc| ArcDescription {
                    id: arc.id().to_string(),
                    kind: arc.kind().to_string(),
                    incoming_id: arc.incoming().to_owned(),
                    outgoing_id: arc.outgoing().to_owned(),
                })
                .collect(),
            deterministic_mode: net.deterministic_mode,
            selected_transition_id: None,
        }
    }
}

impl From<Net> for NetDescription {
    fn from(net: Net) -> Self {
        NetDescription::from(&net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wire_format() {
        let value = json!({
            "places": [
                {"id": "p1", "tokens": 1},
                {"id": "p2", "tokens": 7, "bounded": true, "capacity": 2}
            ],
            "transitions": [{"id": "t1", "enabled": true, "arcIds": ["a1", "a2"]}],
            "arcs": [
                {"id": "a1", "type": "REGULAR", "incomingId": "p1", "outgoingId": "t1"},
                {"id": "a2", "type": "INHIBITOR", "incomingId": "p2", "outgoingId": "t1"}
            ],
            "deterministicMode": true
        });
        let description: NetDescription = serde_json::from_value(value).unwrap();
        let net = Net::try_from(&description).unwrap();

        assert_eq!(net.get_place("p2").map(Place::tokens), Some(2));
        assert!(net.is_deterministic());
        assert!(net.transitions[0].enabled);

        let back = NetDescription::from(&net);
        assert_eq!(back.places[1].capacity, Some(2));
        assert_eq!(back.arcs[1].kind, "INHIBITOR");
        assert_eq!(back.deterministic_mode, Some(true));
        assert_eq!(back.transitions[0].arc_ids, vec!["a1", "a2"]);
    }

    #[test]
    fn unknown_arc_type_fails_at_mapping() {
        let description = NetDescription {
            arcs: vec![ArcDescription {
                id: "a1".into(),
                kind: "WEIGHTED".into(),
                incoming_id: "p1".into(),
                outgoing_id: "t1".into(),
            }],
            ..Default::default()
        };
        let err = Net::try_from(&description).unwrap_err();
        assert_eq!(err.to_string(), "unsupported arc type \"WEIGHTED\" on arc a1");
    }

    #[test]
    fn validation_request_flattens_net() {
        let value = json!({
            "places": [{"id": "p1", "tokens": 0}],
            "transitions": [],
            "arcs": [],
            "inputConfigs": [{"id": "p1", "tokens": 2, "bounded": false}],
            "expectedOutputs": [{"id": "p1", "tokens": 2}]
        });
        let request: ValidationRequest = serde_json::from_value(value).unwrap();
        assert_eq!(request.net.places.len(), 1);
        assert_eq!(request.input_configs, vec![PlaceTokens::new("p1", 2)]);
        assert_eq!(request.expected_outputs.len(), 1);
    }

    #[test]
    fn selection_requires_non_empty_id() {
        let mut description = NetDescription::default();
        assert_eq!(description.selection(), Err(NetError::MissingSelection));
        description.selected_transition_id = Some(String::new());
        assert_eq!(description.selection(), Err(NetError::MissingSelection));
        description.selected_transition_id = Some("t2".into());
        assert_eq!(description.selection(), Ok("t2"));
    }
}
