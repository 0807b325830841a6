//! UI components: connection bar, command accordion, response pane, hints.

pub mod commands;
pub mod common;
pub mod component;
pub mod connection;
pub mod hint_bar;
pub mod response;

pub use commands::CommandsComponent;
pub(crate) use component::Component;
pub use connection::ConnectionComponent;
pub use hint_bar::HintBarComponent;
pub use response::ResponseComponent;
