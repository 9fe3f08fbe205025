//! Screen navigation for the interactive session.
//!
//! Exactly one [`Screen`] is active at a time. [`transition`] is a pure
//! function from the current screen and an [`Event`] to the next screen and an
//! optional [`Effect`] for the caller to carry out. [`Navigator`] owns the
//! current screen and performs the `Execute` effect with an [`Executor`].
//!
//! | From       | Event                    | To / Effect                        |
//! |------------|--------------------------|------------------------------------|
//! | MainMenu   | SelectTask(kind)         | TaskSelect(kind)                   |
//! | MainMenu   | Quit                     | MainMenu, `Exit`                   |
//! | TaskSelect | FilesImported (≥1 file)  | FileReview                         |
//! | TaskSelect | FilesImported (0 files)  | TaskSelect                         |
//! | TaskSelect | Back                     | MainMenu                           |
//! | FileReview | RunOperation(operation)  | FileReview, `Execute(request)`     |
//! | FileReview | OperationFinished(notice)| FileReview with notice, panel out  |
//! | FileReview | Back                     | MainMenu                           |
//!
//! Any other combination leaves the screen unchanged.

use crate::error::PdfUtilsError;
use crate::manifest::FileManifest;
use crate::ops::{Executor, Operation, OperationKind, OperationRequest, OperationResult};
use crate::output::Notice;
use crate::panel::SlidePanel;
use crate::thumbnail::Thumbnail;

/// State of the file review screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewState {
    /// Task chosen in the main menu.
    pub kind: OperationKind,
    /// Imported files, in picker order.
    pub manifest: FileManifest,
    /// Thumbnails per file, indexed like the manifest.
    pub thumbnails: Vec<Vec<Thumbnail>>,
    /// Options panel.
    pub panel: SlidePanel,
    /// Outcome of the last operation.
    pub notice: Option<Notice>,
}

impl ReviewState {
    /// Fresh review screen with its panel starting to slide in.
    pub fn new(
        kind: OperationKind,
        manifest: FileManifest,
        thumbnails: Vec<Vec<Thumbnail>>,
    ) -> Self {
        let mut panel = SlidePanel::default();
        panel.animate_forward();

        Self {
            kind,
            manifest,
            thumbnails,
            panel,
            notice: None,
        }
    }
}

/// The active screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Task choice.
    MainMenu,
    /// Waiting for files for a task.
    TaskSelect(OperationKind),
    /// Imported files with the options panel.
    FileReview(ReviewState),
}

impl Screen {
    /// Task the screen belongs to, if any.
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            Self::MainMenu => None,
            Self::TaskSelect(kind) => Some(*kind),
            Self::FileReview(state) => Some(state.kind),
        }
    }
}

/// Something the user did, or an operation finishing.
#[derive(Debug)]
pub enum Event {
    /// A task button was pressed.
    SelectTask(OperationKind),
    /// The session should end.
    Quit,
    /// The file picker returned.
    FilesImported {
        /// Files that could be opened.
        manifest: FileManifest,
        /// Their thumbnails, possibly empty.
        thumbnails: Vec<Vec<Thumbnail>>,
    },
    /// The back button was pressed.
    Back,
    /// The panel's run button was pressed.
    RunOperation(Operation),
    /// An operation finished.
    OperationFinished(Notice),
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Leave the session.
    Exit,
    /// Run an operation and report back with [`Event::OperationFinished`].
    Execute(OperationRequest),
}

/// Compute the next screen.
pub fn transition(screen: Screen, event: Event) -> (Screen, Option<Effect>) {
    match (screen, event) {
        (Screen::MainMenu, Event::SelectTask(kind)) => (Screen::TaskSelect(kind), None),
        (Screen::MainMenu, Event::Quit) => (Screen::MainMenu, Some(Effect::Exit)),

        (Screen::TaskSelect(kind), Event::FilesImported { manifest, thumbnails }) => {
            if manifest.is_empty() {
                (Screen::TaskSelect(kind), None)
            } else {
                let state = ReviewState::new(kind, manifest, thumbnails);
                (Screen::FileReview(state), None)
            }
        }
        (Screen::TaskSelect(_), Event::Back) => (Screen::MainMenu, None),

        (Screen::FileReview(state), Event::RunOperation(operation))
            if operation.kind() == state.kind =>
        {
            let request = OperationRequest::new(operation, state.manifest.clone());
            (Screen::FileReview(state), Some(Effect::Execute(request)))
        }
        (Screen::FileReview(mut state), Event::OperationFinished(notice)) => {
            state.notice = Some(notice);
            state.panel.animate_backward();
            (Screen::FileReview(state), None)
        }
        // Dropping the review state releases its files and thumbnails
        (Screen::FileReview(_), Event::Back) => (Screen::MainMenu, None),

        (screen, event) => {
            tracing::debug!(?event, "event ignored on this screen");
            (screen, None)
        }
    }
}

/// Result of an operation run through the navigator.
pub type OperationOutcome = std::result::Result<OperationResult, PdfUtilsError>;

/// Owns the active screen and runs requested operations.
#[derive(Debug)]
pub struct Navigator {
    screen: Screen,
    executor: Executor,
    exit_requested: bool,
}

impl Navigator {
    /// Start at the main menu.
    pub fn new(executor: Executor) -> Self {
        Self {
            screen: Screen::MainMenu,
            executor,
            exit_requested: false,
        }
    }

    /// The active screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Mutable access, for advancing the panel animation.
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Directory operations write into.
    pub fn workdir(&self) -> &std::path::Path {
        self.executor.workdir()
    }

    /// Whether a `Quit` was accepted.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Apply `event`, running any operation it requests.
    ///
    /// Returns the outcome when an operation ran. Failures are also recorded
    /// as the review screen's notice; the screen stays on FileReview either
    /// way.
    pub async fn dispatch(&mut self, event: Event) -> Option<OperationOutcome> {
        let screen = std::mem::replace(&mut self.screen, Screen::MainMenu);
        let (next, effect) = transition(screen, event);
        self.screen = next;

        match effect? {
            Effect::Exit => {
                self.exit_requested = true;
                None
            }
            Effect::Execute(request) => {
                let kind = request.operation.kind();
                let outcome = self.executor.execute(&request).await;

                match &outcome {
                    Ok(result) => {
                        tracing::info!(%kind, outputs = result.outputs.len(), "operation finished")
                    }
                    Err(error) => tracing::warn!(%kind, %error, "operation failed"),
                }

                let notice = Notice::from_outcome(kind, &outcome, self.executor.workdir());
                let (next, _) = transition(
                    std::mem::replace(&mut self.screen, Screen::MainMenu),
                    Event::OperationFinished(notice),
                );
                self.screen = next;

                Some(outcome)
            }
        }
    }
}
