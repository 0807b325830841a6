//! Console engine: form model, value collection, request dispatch and
//! response presentation over the command registry.
//!
//! Nothing in this crate draws to a terminal. The TUI and the CLI both drive
//! the same [`Console`], [`Dispatcher`] and [`SessionManager`].

pub mod accordion;
pub mod collect;
pub mod console;
pub mod dispatch;
pub mod form;
pub mod gate;
pub mod maps;
pub mod present;
pub mod session;
pub mod transport;
pub mod visibility;

pub use accordion::{Accordion, Transition};
pub use collect::{ProvidedValues, ValidationError, ValueSource, collect_values};
pub use console::Console;
pub use dispatch::{DispatchError, Dispatcher, build_request};
pub use form::{Choice, ChoiceEntry, Control, ControlSet, FormError, MAP_SELECT_PLACEHOLDER, Widget};
pub use gate::{ConnectionGate, GateReader};
pub use maps::{MAPS_PATH, load_maps};
pub use present::Presentation;
pub use session::{ConnectInputError, ConnectParams, SessionError, SessionManager};
pub use transport::RequestTransport;
