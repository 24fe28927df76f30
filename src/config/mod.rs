//! 配置管理
//!
//! 静态配置在启动时加载一次，之后通过 `AppConfig::get()` 全局只读访问。

mod r#impl;
mod structs;

pub use structs::*;
