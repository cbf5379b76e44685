pub mod code;
pub mod docs;
pub mod test_run;

pub use code::{CodePreviews, CodeSlot, PreviewTicket};
pub use docs::render_docs;
pub use test_run::{MockTestRun, mock_test_run};
