//! 浏览器会话管理
//!
//! 两种获取方式：连接已运行的浏览器（调试端口），或启动无头浏览器。
//! 会话在应用初始化时获取一次，整个运行期间串行复用。

pub mod connection;
pub mod headless;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;
