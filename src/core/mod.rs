//! Screen logic, independent of the terminal: each screen owns its loaded
//! state, validates input before any request, and reloads after mutating.

pub mod attendance;
pub mod forms;
pub mod inventory;
pub mod members;
pub mod notices;
pub mod plans;
pub mod scope;
pub mod templates;
