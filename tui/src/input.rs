//! Key Mapping
//!
//! Turns crossterm key events into [`Intent`]s. Kept free of any App state
//! besides the current [`InputMode`], so the key map is testable without a
//! terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The five screens
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    /// Green tasks
    #[default]
    Tasks,
    /// Achievement badges
    Achievements,
    /// Leaderboard
    Social,
    /// Reward catalog
    Rewards,
    /// Meal analysis
    Analysis,
}

impl Tab {
    /// All tabs in display order
    pub const ALL: [Tab; 5] = [
        Tab::Tasks,
        Tab::Achievements,
        Tab::Social,
        Tab::Rewards,
        Tab::Analysis,
    ];

    /// Tab title
    pub fn title(self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Achievements => "Achievements",
            Tab::Social => "Social",
            Tab::Rewards => "Rewards",
            Tab::Analysis => "Analysis",
        }
    }

    /// Position in [`Tab::ALL`]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Next tab, wrapping
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous tab, wrapping
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Whether keys go to the app or to the path prompt
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation
    #[default]
    Normal,
    /// Typing an image path
    ImagePath(String),
}

/// What a key press means
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Leave the app
    Quit,
    /// Switch tab
    SelectTab(Tab),
    /// Next tab
    NextTab,
    /// Previous tab
    PrevTab,
    /// Move selection up
    Up,
    /// Move selection down
    Down,
    /// Complete the selected task or quote the selected reward
    Activate,
    /// Answer yes to a pending quote
    Confirm,
    /// Answer no to a pending quote
    Decline,
    /// Close the pending quote and the toast
    Dismiss,
    /// Open the image path prompt
    OpenImagePrompt,
    /// Start analysis
    Analyze,
    /// Cancel analysis
    CancelAnalysis,
    /// Prompt: type a character
    PromptChar(char),
    /// Prompt: delete a character
    PromptBackspace,
    /// Prompt: submit the path
    PromptSubmit,
    /// Prompt: close without submitting
    PromptCancel,
    /// Nothing
    Ignore,
}

/// Map a key press to an intent
pub fn map_key(mode: &InputMode, key: KeyEvent) -> Intent {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Intent::Quit;
    }

    if let InputMode::ImagePath(_) = mode {
        return match key.code {
            KeyCode::Enter => Intent::PromptSubmit,
            KeyCode::Esc => Intent::PromptCancel,
            KeyCode::Backspace => Intent::PromptBackspace,
            KeyCode::Char(c) => Intent::PromptChar(c),
            _ => Intent::Ignore,
        };
    }

    match key.code {
        KeyCode::Char('q') => Intent::Quit,
        KeyCode::Esc => Intent::Dismiss,
        KeyCode::Tab => Intent::NextTab,
        KeyCode::BackTab => Intent::PrevTab,
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            Intent::SelectTab(Tab::ALL[index])
        }
        KeyCode::Up | KeyCode::Char('k') => Intent::Up,
        KeyCode::Down | KeyCode::Char('j') => Intent::Down,
        KeyCode::Enter => Intent::Activate,
        KeyCode::Char('y') => Intent::Confirm,
        KeyCode::Char('n') => Intent::Decline,
        KeyCode::Char('o') => Intent::OpenImagePrompt,
        KeyCode::Char('a') => Intent::Analyze,
        KeyCode::Char('c') => Intent::CancelAnalysis,
        _ => Intent::Ignore,
    }
}
