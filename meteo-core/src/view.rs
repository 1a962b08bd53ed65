//! Page surface the controllers write to.
//!
//! [`Page`] is the handle injected into the controllers; [`HtmlPage`] keeps the
//! page in memory and renders it as a standalone HTML document.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::{
    provider::PanelKind,
    render::{Card, escape_html, render_cards},
};

pub trait Page: Send + Sync + Debug {
    fn set_status(&self, message: &str);

    fn set_place(&self, name: &str);

    /// Mark `kind` as the active tab, show its panel and hide the others.
    fn activate(&self, kind: PanelKind);

    /// Replace the contents of one panel's output region.
    fn fill_panel(&self, kind: PanelKind, cards: Vec<Card>);
}

#[derive(Debug, Default)]
struct PageState {
    status: String,
    place: String,
    active: PanelKind,
    panels: [Vec<Card>; 4],
}

#[derive(Debug, Default)]
pub struct HtmlPage {
    state: Mutex<PageState>,
}

impl HtmlPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> String {
        self.state.lock().status.clone()
    }

    pub fn place(&self) -> String {
        self.state.lock().place.clone()
    }

    pub fn active(&self) -> PanelKind {
        self.state.lock().active
    }

    pub fn is_visible(&self, kind: PanelKind) -> bool {
        self.active() == kind
    }

    pub fn visible_panels(&self) -> Vec<PanelKind> {
        let active = self.active();
        PanelKind::all().iter().copied().filter(|k| *k == active).collect()
    }

    pub fn cards(&self, kind: PanelKind) -> Vec<Card> {
        self.state.lock().panels[kind.index()].clone()
    }

    pub fn panel_html(&self, kind: PanelKind) -> String {
        render_cards(&self.state.lock().panels[kind.index()])
    }

    /// Status line, place and the active panel as terminal text.
    pub fn to_text(&self) -> String {
        let state = self.state.lock();
        let mut out = String::new();

        if !state.place.is_empty() {
            out.push_str(&format!("📍 {}\n", state.place));
        }
        out.push_str(&format!("[{}]\n", state.active.title()));
        if !state.status.is_empty() {
            out.push_str(&format!("{}\n", state.status));
        }
        for card in &state.panels[state.active.index()] {
            out.push('\n');
            out.push_str(&card.to_string());
        }
        out
    }

    /// The whole page as an HTML document.
    pub fn document(&self, generated_at: DateTime<Utc>) -> String {
        let state = self.state.lock();

        let tabs: String = PanelKind::all()
            .iter()
            .map(|kind| {
                let class = if *kind == state.active { "tab active" } else { "tab" };
                format!(
                    r#"<button class="{class}" data-tab="{}">{}</button>"#,
                    kind.as_str(),
                    kind.title()
                )
            })
            .collect();

        let panels: String = PanelKind::all()
            .iter()
            .map(|kind| {
                let class = if *kind == state.active { "panel" } else { "panel hidden" };
                format!(
                    r#"<section id="{id}" class="{class}"><div id="{id}-output">{}</div></section>"#,
                    render_cards(&state.panels[kind.index()]),
                    id = kind.panel_id(),
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Weather</title>
<style>
.hidden {{ display: none; }}
.tab.active {{ font-weight: bold; }}
.card {{ border: 1px solid #ccc; border-radius: 6px; margin: 8px 0; padding: 8px; }}
.row {{ display: flex; justify-content: space-between; }}
.big {{ font-size: 2em; }}
</style>
</head>
<body>
<h1 id="place">{place}</h1>
<p id="status">{status}</p>
<nav>{tabs}</nav>
{panels}
<footer>Generated {generated}</footer>
</body>
</html>
"#,
            place = escape_html(&state.place),
            status = escape_html(&state.status),
            generated = generated_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

impl Page for HtmlPage {
    fn set_status(&self, message: &str) {
        self.state.lock().status = message.to_string();
    }

    fn set_place(&self, name: &str) {
        self.state.lock().place = name.to_string();
    }

    fn activate(&self, kind: PanelKind) {
        self.state.lock().active = kind;
    }

    fn fill_panel(&self, kind: PanelKind, cards: Vec<Card>) {
        self.state.lock().panels[kind.index()] = cards;
    }
}
