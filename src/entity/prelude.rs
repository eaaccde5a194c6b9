//! 预导入模块
//!
//! 提供常用类型的快捷导入。

pub use super::conferences::Entity as Conferences;
pub use super::games::Entity as Games;
pub use super::teams::Entity as Teams;
