//! Petri 网仿真与分析引擎。
//!
//! * [`net`]：库所、迁移、三类弧的语义，以及边界描述与读写；
//! * [`simulation`]：单步执行与冲突消解；
//! * [`analysis`]：可达性、活性、有界性、关联矩阵与结构分析；
//! * [`validate`]：确定模式下的输入/输出校验。
#![warn(non_snake_case)]

pub mod analysis;
pub mod config;
pub mod net;
pub mod options;
pub mod simulation;
pub mod validate;

pub use config::EngineConfig;
pub use net::{Net, NetDescription, NetError};
