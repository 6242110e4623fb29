//! 基础设施层
//!
//! 持有稀缺资源（Page），只向上层暴露能力。

pub mod form_driver;

pub use form_driver::FormDriver;
