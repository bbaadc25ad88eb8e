use std::path::PathBuf;

use core_model::{HostError, ViewId};
use core_vc::VcError;

/// Every failure the file commands can surface. Declined prompts are not
/// errors; see `RenameOutcome` and `DeleteOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum FileOpError {
    #[error("no active buffer")]
    NoActiveView,
    #[error("buffer {0} is not alive")]
    ViewNotLive(ViewId),
    #[error("buffer {name} is not associated with a file")]
    NotFileBacked { name: String },
    #[error("buffer {name} is not visiting a file")]
    NotVisiting { name: String },
    #[error("file {} does not exist", .0.display())]
    FileMissing(PathBuf),
    #[error("could not locate buffer visiting {}", .0.display())]
    PrimaryNotFound(PathBuf),
    #[error("new file name must not be empty")]
    EmptyName,
    #[error("file {} already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error("failed to rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to delete {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Vc(#[from] VcError),
    #[error(transparent)]
    Hook(anyhow::Error),
}

impl FileOpError {
    /// Precondition failures are raised before anything is mutated.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            FileOpError::NoActiveView
                | FileOpError::ViewNotLive(_)
                | FileOpError::NotFileBacked { .. }
                | FileOpError::NotVisiting { .. }
                | FileOpError::FileMissing(_)
                | FileOpError::PrimaryNotFound(_)
        )
    }
}
