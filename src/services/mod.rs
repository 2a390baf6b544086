pub mod cancel;
pub mod editor;
pub mod output;
pub mod poller;
pub mod render;
pub mod workspace;

pub use cancel::CancelToken;
pub use editor::{EditorRunner, ProcessEditor};
pub use output::{Printer, StdPrinter};
pub use poller::SubmissionPoller;
pub use render::{HeaderRenderer, HtmlRenderer};
pub use workspace::{FsWorkspace, Workspace, WorkspaceManager};
