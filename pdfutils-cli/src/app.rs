//! The interactive session.
//!
//! [`App`] draws the active screen, reads one answer and turns it into a
//! navigation [`Event`]. All state changes go through the [`Navigator`].

use anyhow::Result;

use pdfutils::Config;
use pdfutils::manifest::FileManifest;
use pdfutils::nav::{Event, Navigator, OperationOutcome, ReviewState, Screen};
use pdfutils::ops::{Executor, Operation, OperationKind};
use pdfutils::output::{OutputFormatter, display_import_outcome};
use pdfutils::panel::SlidePanel;
use pdfutils::thumbnail::ThumbnailCache;

use crate::picker::{self, Prompt, Selection, is_back};

/// A menu-driven session over stdin and stdout.
pub struct App {
    config: Config,
    formatter: OutputFormatter,
    navigator: Navigator,
    cache: ThumbnailCache,
    prompt: Prompt,
}

impl App {
    /// Prepare a session. Purges the thumbnail cache.
    pub async fn new(config: Config, formatter: OutputFormatter) -> Result<Self> {
        let cache = ThumbnailCache::from_config(&config).await?;
        tracing::debug!(
            dir = %cache.dir().display(),
            renderer = cache.renderer_name(),
            "thumbnail cache ready"
        );

        Ok(Self {
            navigator: Navigator::new(Executor::from_config(&config)),
            config,
            formatter,
            cache,
            prompt: Prompt::stdin(),
        })
    }

    /// Run until the user quits or stdin closes.
    pub async fn run(mut self) -> Result<()> {
        self.formatter
            .section(&format!("{} v{}", pdfutils::NAME, pdfutils::VERSION));
        self.formatter.info(&format!(
            "Outputs are saved to {}",
            self.navigator.workdir().display()
        ));

        while !self.navigator.exit_requested() {
            let event = match self.navigator.screen() {
                Screen::MainMenu => self.main_menu().await?,
                Screen::TaskSelect(kind) => {
                    let kind = *kind;
                    self.task_select(kind).await?
                }
                Screen::FileReview(_) => self.file_review().await?,
            };

            let Some(event) = event else {
                break;
            };
            let running = match &event {
                Event::RunOperation(operation) => Some(operation.kind()),
                _ => None,
            };
            if let Some(kind) = running {
                self.formatter.info(&format!("Running {}...", kind.title().to_lowercase()));
            }

            let outcome = self.navigator.dispatch(event).await;
            if running.is_some() {
                self.show_outcome(outcome.as_ref()).await;
            }
        }

        self.cache.purge().await?;
        Ok(())
    }

    async fn main_menu(&mut self) -> Result<Option<Event>> {
        self.formatter.section("What would you like to do?");
        for (index, kind) in OperationKind::ALL.iter().enumerate() {
            self.formatter.list_item(index + 1, kind.title());
        }
        self.formatter.info("q. Quit");

        loop {
            let Some(answer) = self.prompt.ask(">").await? else {
                return Ok(None);
            };
            match parse_menu_choice(&answer) {
                Some(MenuChoice::Task(kind)) => return Ok(Some(Event::SelectTask(kind))),
                Some(MenuChoice::Quit) => return Ok(Some(Event::Quit)),
                None => self.formatter.warning(&format!("Unknown choice: {answer}")),
            }
        }
    }

    async fn task_select(&mut self, kind: OperationKind) -> Result<Option<Event>> {
        self.formatter.section(&format!("{}: select files", kind.title()));

        let paths = match picker::pick_files(&mut self.prompt, &self.formatter).await? {
            Selection::Files(paths) => paths,
            Selection::Back => return Ok(Some(Event::Back)),
            Selection::Closed => return Ok(None),
        };

        let outcome = FileManifest::import(&paths).await;
        display_import_outcome(&self.formatter, &outcome);

        let thumbnails = if self.config.thumbnails && !outcome.manifest.is_empty() {
            match self.cache.rasterize_all(&outcome.manifest).await {
                Ok(thumbnails) => thumbnails,
                Err(err) => {
                    self.formatter
                        .warning(&format!("Thumbnails unavailable: {err}"));
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(Some(Event::FilesImported {
            manifest: outcome.manifest,
            thumbnails,
        }))
    }

    async fn file_review(&mut self) -> Result<Option<Event>> {
        let Screen::FileReview(state) = self.navigator.screen_mut() else {
            return Ok(Some(Event::Back));
        };

        // Reopen the panel after it slid out for a notice
        if state.panel.in_start_pos() && !state.panel.is_animating() {
            state.panel.trigger();
        }
        animate(&mut state.panel, self.config.animate, &self.formatter).await;

        let state = state.clone();
        self.show_review(&state);

        self.ask_options(&state).await
    }

    async fn show_outcome(&mut self, outcome: Option<&OperationOutcome>) {
        if let Screen::FileReview(state) = self.navigator.screen_mut() {
            animate(&mut state.panel, self.config.animate, &self.formatter).await;
            if let Some(notice) = &state.notice {
                self.formatter.notice(notice);
            }
        }
        if let Some(Ok(result)) = outcome {
            self.formatter.operation_details(result);
        }
    }

    fn show_review(&self, state: &ReviewState) {
        self.formatter.section(&format!("{}: review", state.kind.title()));
        self.formatter.review_table(&state.manifest);

        let rendered: usize = state.thumbnails.iter().map(Vec::len).sum();
        if rendered > 0 {
            self.formatter.detail(
                "Thumbnails",
                &format!("{rendered} in {}", self.cache.dir().display()),
            );
        }
    }

    async fn ask_options(&mut self, state: &ReviewState) -> Result<Option<Event>> {
        let question = match state.kind {
            OperationKind::Merge => "Order: [n]ormal or [r]everse (b to go back):".to_string(),
            OperationKind::Split => {
                let pages = state.manifest.get(0).map_or(0, |file| file.page_count());
                format!(
                    "Split after page (1-{}) (b to go back):",
                    pages.saturating_sub(1)
                )
            }
            OperationKind::Compress => format!(
                "Press Enter to compress ({}), or b to go back:",
                self.config.compression
            ),
        };

        loop {
            let Some(answer) = self.prompt.ask(&question).await? else {
                return Ok(None);
            };
            if is_back(&answer) {
                return Ok(Some(Event::Back));
            }
            match parse_options(state.kind, &answer, &self.config) {
                Some(operation) => return Ok(Some(Event::RunOperation(operation))),
                None => self.formatter.warning(&format!("Unknown answer: {answer}")),
            }
        }
    }
}

async fn animate(panel: &mut SlidePanel, enabled: bool, formatter: &OutputFormatter) {
    if !panel.is_animating() {
        return;
    }
    if enabled && formatter.should_print() {
        panel.play(|frame| formatter.panel_frame(frame)).await;
        formatter.end_frames();
    } else {
        panel.settle();
    }
}

/// A main menu answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Start a task.
    Task(OperationKind),
    /// Leave.
    Quit,
}

/// Parse a main menu answer: a number, a task name or `q`.
pub fn parse_menu_choice(answer: &str) -> Option<MenuChoice> {
    let answer = answer.trim().to_lowercase();
    if matches!(answer.as_str(), "q" | "quit" | "exit") {
        return Some(MenuChoice::Quit);
    }

    OperationKind::ALL
        .iter()
        .enumerate()
        .find(|(index, kind)| answer == (index + 1).to_string() || answer == kind.title().to_lowercase())
        .map(|(_, kind)| MenuChoice::Task(*kind))
}

/// Turn an options answer into an operation.
///
/// Split pivots are not range-checked here; an out-of-range pivot is
/// reported by the operation itself.
pub fn parse_options(kind: OperationKind, answer: &str, config: &Config) -> Option<Operation> {
    let answer = answer.trim().to_lowercase();
    match kind {
        OperationKind::Merge => match answer.as_str() {
            "" | "n" | "normal" => Some(Operation::Merge { reverse: false }),
            "r" | "reverse" => Some(Operation::Merge { reverse: true }),
            _ => None,
        },
        OperationKind::Split => answer
            .parse()
            .ok()
            .map(|pivot| Operation::Split { pivot }),
        OperationKind::Compress => answer.is_empty().then_some(Operation::Compress {
            level: config.compression,
        }),
    }
}
