use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use chrono::Utc;
use inquire::{InquireError, Select, Text};
use meteo_core::{Config, Dashboard, HtmlPage, PanelKind, ViewState};

/// Tab as offered in prompts.
#[derive(Debug, Clone, Copy)]
pub struct TabChoice(pub PanelKind);

impl fmt::Display for TabChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ChangeCity,
    SwitchTab,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ChangeCity => "Change city",
            Action::SwitchTab => "Switch tab",
            Action::Quit => "Quit",
        })
    }
}

/// Interactive loop: resolve the default city, then act on the user's picks
/// until they quit.
pub async fn browse(dashboard: &Dashboard, config: &Config, output: Option<&Path>) -> Result<()> {
    let page = HtmlPage::new();
    let mut state = ViewState::with_tab(config.default_tab_kind()?);

    state = dashboard.bootstrap(&page, &state, &config.default_city).await;
    present(&page, output)?;

    loop {
        let actions = vec![Action::ChangeCity, Action::SwitchTab, Action::Quit];
        let Some(action) = cancellable(Select::new("What next?", actions).prompt())? else {
            break;
        };

        match action {
            Action::ChangeCity => {
                let Some(input) = cancellable(Text::new("City:").prompt())? else {
                    continue;
                };
                // Errors are already on the status line.
                if let Ok(next) = dashboard.submit(&page, &state, &input).await {
                    state = next;
                }
            }
            Action::SwitchTab => {
                let tabs: Vec<TabChoice> =
                    PanelKind::all().iter().copied().map(TabChoice).collect();
                let Some(TabChoice(tab)) = cancellable(
                    Select::new("Tab:", tabs)
                        .with_starting_cursor(state.active.index())
                        .prompt(),
                )?
                else {
                    continue;
                };
                state = dashboard.select_tab(&page, &state, tab).await;
            }
            Action::Quit => break,
        }

        present(&page, output)?;
    }

    Ok(())
}

pub fn write_document(page: &HtmlPage, path: &Path) -> Result<()> {
    fs::write(path, page.document(Utc::now()))
        .with_context(|| format!("Failed to write page to {}", path.display()))
}

fn present(page: &HtmlPage, output: Option<&Path>) -> Result<()> {
    println!("\n{}", page.to_text());
    if let Some(path) = output {
        write_document(page, path)?;
    }
    Ok(())
}

/// Escape and Ctrl-C end the current prompt without failing the session.
fn cancellable<T>(answer: Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
