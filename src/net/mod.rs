//! # Petri 网核心定义
//!
//! 库所持有非负 token，迁移通过带类型的弧与库所相连：
//!
//! * **普通弧**（`REGULAR`）：`p → t` 消耗一个 token，`t → p` 产生一个 token；
//! * **抑制弧**（`INHIBITOR`）：`p → t` 时，`p` 非空则 `t` 不可发生；
//! * **双向弧**（`BIDIRECTIONAL`）：要求相连库所至少有一个 token，发生后数量不变。
//!
//! 有界库所（`bounded`）在任何时刻满足 `tokens ≤ capacity`，若发生会使其溢出，
//! 迁移不可发生。
//!
//! ## 示例
//!
//! ```rust
//! use pn_engine::net::*;
//!
//! let mut net = Net::empty();
//! net.add_place(Place::new("p1", 1));
//! net.add_place(Place::new_with_tokens_and_capacity("p2", 0, 1));
//! net.add_transition(Transition::new("t1"));
//! net.add_arc(Arc::new(ArcKind::Regular, "a1", "p1", "t1"));
//! net.add_arc(Arc::new(ArcKind::Regular, "a2", "t1", "p2"));
//!
//! assert_eq!(net.evaluate_all(), vec![TransitionId::from("t1")]);
//! net.fire(0);
//! assert_eq!(net.state_signature(), "p1:0,p2:1");
//! ```

pub mod core;
pub mod description;
pub mod ids;
pub mod incidence;
pub mod io;
pub mod structure;

pub use self::core::{ArcMap, Net, NetError, PlaceMap, evaluate_transition, fire_transition};
pub use description::{
    ArcDescription, NetDescription, PlaceDescription, PlaceTokens, TransitionDescription,
    ValidationRequest,
};
pub use ids::{ArcId, PlaceId, TransitionId};
pub use incidence::Incidence;
pub use structure::{Arc, ArcEnds, ArcKind, Marking, Place, Transition, Weight};
