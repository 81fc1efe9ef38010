mod central_panel;
mod result_modal;
mod tools_panel;

pub use central_panel::central_panel;
pub use result_modal::{ResultAction, ResultView, result_modal};
pub use tools_panel::tools_panel;
