//! 有界性统计
//!
//! 仅按输入配置统计 `bounded` 库所的数量，不验证任意发生序列下界是否成立。
use serde::{Deserialize, Serialize};

use crate::net::{Net, PlaceId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundednessReport {
    pub bounded_places_count: usize,
    pub unbounded_places_count: usize,
    pub unbounded_places: Vec<PlaceId>,
    pub details: String,
}

pub fn analyze_boundedness(net: &Net) -> BoundednessReport {
    let (bounded, unbounded): (Vec<_>, Vec<_>) =
        net.places.values().partition(|place| place.is_bounded());

    BoundednessReport {
        bounded_places_count: bounded.len(),
        unbounded_places_count: unbounded.len(),
        details: format!(
            "Found {} bounded places and {} unbounded places. Unbounded places can potentially accumulate infinite tokens.",
            bounded.len(),
            unbounded.len()
        ),
        unbounded_places: unbounded.into_iter().map(|place| place.id.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Place;

    #[test]
    fn mixed_places() {
        let mut net = Net::empty();
        net.add_place(Place::new_with_tokens_and_capacity("p1", 0, 3));
        net.add_place(Place::new("p2", 4));

        let report = analyze_boundedness(&net);
        assert_eq!(report.bounded_places_count, 1);
        assert_eq!(report.unbounded_places_count, 1);
        assert_eq!(report.unbounded_places, vec![PlaceId::from("p2")]);
        assert!(report.details.contains("1 bounded places and 1 unbounded places"));
    }

    #[test]
    fn all_unbounded() {
        let mut net = Net::empty();
        net.add_place(Place::new("p1", 0));
        net.add_place(Place::new("p2", 0));
        let report = analyze_boundedness(&net);
        assert!(report.details.contains("0 bounded places and 2 unbounded places"));
    }
}
