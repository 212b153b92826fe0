//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - HubClient for all state changes
//! - DisplayState for rendering
//!
//! The App:
//! 1. Converts key presses to [`Intent`]s, then to SurfaceEvents
//! 2. Sends events to the embedded Hub via HubClient
//! 3. Receives HubMessages and updates DisplayState
//! 4. Renders based on DisplayState

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;

use greenhero_core::GreenConfig;

use crate::display::DisplayState;
use crate::hub_client::HubClient;
use crate::input::{map_key, InputMode, Intent, Tab};
use crate::ui::{self, View};

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Hub Integration ===
    /// Client for communicating with the embedded Hub
    client: HubClient,
    /// Display state derived from HubMessages
    display: DisplayState,

    // === View State ===
    /// Active tab
    tab: Tab,
    /// Selected row per tab
    selection: [usize; Tab::ALL.len()],
    /// Normal navigation or path prompt
    mode: InputMode,

    // === Misc State ===
    /// Last frame time (for notification timers)
    last_frame: Instant,
}

impl App {
    /// Create a new App and connect it to a fresh Hub
    pub async fn new(config: GreenConfig) -> anyhow::Result<Self> {
        let mut client = HubClient::new(config);
        client.connect().await?;

        let mut app = Self {
            running: true,
            client,
            display: DisplayState::new(),
            tab: Tab::default(),
            selection: [0; Tab::ALL.len()],
            mode: InputMode::Normal,
            last_frame: Instant::now(),
        };
        app.process_hub_messages();
        Ok(app)
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        // ~30 FPS is plenty for a dashboard
        let frame_duration = Duration::from_millis(33);

        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            let intent = map_key(&self.mode, key);
                            self.apply_intent(intent).await?;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                    }
                }

                // Idle frame tick so analysis results and toasts still update
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            self.client.poll_analysis().await;
            self.process_hub_messages();
            self.update();
            self.render(terminal)?;

            if self.display.quit {
                self.running = false;
            }

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Apply one intent
    ///
    /// # Errors
    ///
    /// Propagates Hub errors; rejected actions are not errors.
    pub async fn apply_intent(&mut self, intent: Intent) -> anyhow::Result<()> {
        match intent {
            Intent::Quit => {
                self.client.request_quit().await?;
                self.running = false;
            }

            Intent::SelectTab(tab) => self.tab = tab,
            Intent::NextTab => self.tab = self.tab.next(),
            Intent::PrevTab => self.tab = self.tab.prev(),

            Intent::Up => {
                let slot = &mut self.selection[self.tab.index()];
                *slot = slot.saturating_sub(1);
            }
            Intent::Down => {
                let rows = self.row_count();
                let slot = &mut self.selection[self.tab.index()];
                if *slot + 1 < rows {
                    *slot += 1;
                }
            }

            Intent::Activate => self.activate_selection().await?,

            Intent::Confirm => {
                if let Some(quote) = self.display.take_quote() {
                    self.client.confirm_redemption(quote.quote_id).await?;
                }
            }
            Intent::Decline => {
                if let Some(quote) = self.display.take_quote() {
                    self.client.cancel_quote(quote.quote_id).await?;
                }
            }
            Intent::Dismiss => {
                if let Some(quote) = self.display.take_quote() {
                    self.client.cancel_quote(quote.quote_id).await?;
                }
                self.display.notification = None;
            }

            Intent::OpenImagePrompt => {
                self.tab = Tab::Analysis;
                self.mode = InputMode::ImagePath(String::new());
            }
            Intent::Analyze => {
                self.tab = Tab::Analysis;
                self.client.start_analysis().await?;
            }
            Intent::CancelAnalysis => self.client.cancel_analysis().await?,

            Intent::PromptChar(c) => {
                if let InputMode::ImagePath(buf) = &mut self.mode {
                    buf.push(c);
                }
            }
            Intent::PromptBackspace => {
                if let InputMode::ImagePath(buf) = &mut self.mode {
                    buf.pop();
                }
            }
            Intent::PromptSubmit => {
                if let InputMode::ImagePath(buf) = std::mem::take(&mut self.mode) {
                    let path = clean_path(&buf);
                    if !path.as_os_str().is_empty() {
                        self.client.select_image(path).await?;
                    }
                }
            }
            Intent::PromptCancel => self.mode = InputMode::Normal,

            Intent::Ignore => {}
        }

        self.process_hub_messages();
        Ok(())
    }

    /// Wait for the analysis in flight, then refresh display state
    pub async fn settle_analysis(&mut self) -> bool {
        let settled = self.client.await_analysis().await;
        self.process_hub_messages();
        settled
    }

    /// Display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Active tab
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Current input mode
    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    /// Selected row on the active tab
    pub fn selected(&self) -> usize {
        self.selection[self.tab.index()]
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Line printed after the terminal is restored
    pub fn farewell(&self) -> String {
        format!(
            "You finished with {} Green Coins. Keep it green!",
            self.display.balance
        )
    }

    /// Draw one frame
    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let view = View {
            tab: self.tab,
            selected: self.selected(),
            mode: &self.mode,
        };
        let display = &self.display;
        terminal.draw(|frame| ui::draw(frame, display, &view))?;
        Ok(())
    }

    async fn activate_selection(&mut self) -> anyhow::Result<()> {
        let selected = self.selected();
        match self.tab {
            Tab::Tasks => {
                if let Some(task) = self.display.tasks().get(selected) {
                    let id = task.id;
                    self.client.complete_task(id).await?;
                }
            }
            Tab::Rewards => {
                if let Some(view) = self.display.rewards().get(selected) {
                    let id = view.reward.id;
                    if let Some(displaced) = self.display.take_quote() {
                        self.client.cancel_quote(displaced.quote_id).await?;
                    }
                    self.client.quote_redemption(id).await?;
                }
            }
            Tab::Achievements | Tab::Social | Tab::Analysis => {}
        }
        Ok(())
    }

    fn row_count(&self) -> usize {
        match self.tab {
            Tab::Tasks => self.display.tasks().len(),
            Tab::Achievements => self.display.achievements().len(),
            Tab::Social => self.display.leaderboard().len(),
            Tab::Rewards => self.display.rewards().len(),
            Tab::Analysis => 0,
        }
    }

    /// Process all pending messages from the Hub
    fn process_hub_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.display.update(delta);
    }
}

/// Trim whitespace and the quotes terminals add to dropped paths
fn clean_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches(|c| c == '\'' || c == '"'))
}
