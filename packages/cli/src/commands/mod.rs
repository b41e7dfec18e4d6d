pub mod apply;
pub mod check;
pub mod export;
pub mod outline;
pub mod toc;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use export::{export, ExportArgs};
pub use outline::{outline, OutlineArgs};
pub use toc::{toc, TocArgs};
