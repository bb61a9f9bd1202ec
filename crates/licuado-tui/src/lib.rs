// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use licuado_app::{
    AppCommand, AppState, Catalog, Derived, Ingredient, Recipe, autocomplete, normalize_name,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

pub const AUTOCOMPLETE_LIMIT: usize = 10;
pub const EMPTY_STATE_SUGGESTION_LIMIT: usize = 6;

/// Supplies catalogs to the UI. The CLI wires a real HTTP-backed source in;
/// `spawn_load` defaults to a synchronous load so simple sources stay a
/// one-method implementation.
pub trait CatalogSource {
    fn load_catalog(&mut self) -> Result<Catalog>;

    fn spawn_load(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self.load_catalog().map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::LoadFinished { request_id, result })
            .map_err(|_| anyhow::anyhow!("load event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    LoadFinished {
        request_id: u64,
        result: Result<Catalog, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FocusPane {
    #[default]
    Search,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct LoadTracker {
    next_request_id: u64,
    in_flight: Option<u64>,
}

#[derive(Debug, Default)]
struct ViewData {
    derived: Derived,
    search_query: String,
    dropdown_index: usize,
    results_index: usize,
    empty_index: usize,
    focus: FocusPane,
    status_line: Option<String>,
    load: LoadTracker,
}

pub fn run_app<S: CatalogSource>(state: &mut AppState, source: &mut S) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = request_load(state, source, &mut view_data, &internal_tx) {
        state.dispatch(AppCommand::LoadFinished(Err(format!("{error:#}"))));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);
        view_data.derived.refresh(state);
        clamp_cursors(state, &mut view_data);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, source, &mut view_data, &internal_tx, key)? {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Starts a new load. Each load carries a fresh request id; a newer request
/// supersedes any older in-flight one, whose eventual response is dropped.
fn request_load<S: CatalogSource>(
    state: &mut AppState,
    source: &mut S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) -> Result<()> {
    state.dispatch(AppCommand::LoadStarted);
    view_data.load.next_request_id += 1;
    let request_id = view_data.load.next_request_id;
    view_data.load.in_flight = Some(request_id);
    source.spawn_load(request_id, internal_tx.clone())
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::LoadFinished { request_id, result }
                if view_data.load.in_flight == Some(request_id) =>
            {
                view_data.load.in_flight = None;
                state.dispatch(AppCommand::LoadFinished(result));
            }
            // Response from a superseded load; the latest request wins.
            InternalEvent::LoadFinished { .. } => {}
        }
    }
}

fn current_suggestions(state: &AppState, view_data: &ViewData) -> Vec<Ingredient> {
    autocomplete(
        state.ingredients(),
        state.selected_ingredients(),
        &view_data.search_query,
        AUTOCOMPLETE_LIMIT,
    )
}

fn empty_state_suggestions(view_data: &ViewData) -> &[Ingredient] {
    let limit = view_data
        .derived
        .suggested_ingredients
        .len()
        .min(EMPTY_STATE_SUGGESTION_LIMIT);
    &view_data.derived.suggested_ingredients[..limit]
}

fn clamp_cursors(state: &AppState, view_data: &mut ViewData) {
    let suggestions = current_suggestions(state, view_data).len();
    view_data.dropdown_index = view_data.dropdown_index.min(suggestions.saturating_sub(1));

    let results = view_data.derived.filtered_recipes.len();
    view_data.results_index = view_data.results_index.min(results.saturating_sub(1));

    let empty = empty_state_suggestions(view_data).len();
    view_data.empty_index = view_data.empty_index.min(empty.saturating_sub(1));
}

fn set_status(view_data: &mut ViewData, message: impl Into<String>) {
    view_data.status_line = Some(message.into());
}

/// Returns true when the app should quit.
fn handle_key_event<S: CatalogSource>(
    state: &mut AppState,
    source: &mut S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> Result<bool> {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    if state.is_loading() {
        return Ok(false);
    }

    if key.code == KeyCode::Char('u') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if !state.dispatch(AppCommand::ClearIngredients).is_empty() {
            set_status(view_data, "selection cleared");
        }
        return Ok(false);
    }

    if state.error().is_some() {
        if key.code == KeyCode::Char('r') {
            request_load(state, source, view_data, internal_tx)?;
            set_status(view_data, "retrying load");
        }
        return Ok(false);
    }

    if state.selected_recipe().is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            state.dispatch(AppCommand::CloseRecipe);
        }
        return Ok(false);
    }

    if key.code == KeyCode::Tab {
        view_data.focus = match view_data.focus {
            FocusPane::Search => FocusPane::Results,
            FocusPane::Results => FocusPane::Search,
        };
        return Ok(false);
    }

    match view_data.focus {
        FocusPane::Search => handle_search_key(state, view_data, key),
        FocusPane::Results => handle_results_key(state, view_data, key),
    }
    Ok(false)
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            view_data.search_query.push(c);
            view_data.dropdown_index = 0;
        }
        KeyCode::Backspace => {
            if view_data.search_query.pop().is_none() {
                remove_last_selected(state, view_data);
            }
            view_data.dropdown_index = 0;
        }
        KeyCode::Down => {
            let suggestions = current_suggestions(state, view_data).len();
            if suggestions > 0 {
                view_data.dropdown_index = (view_data.dropdown_index + 1) % suggestions;
            }
        }
        KeyCode::Up => {
            let suggestions = current_suggestions(state, view_data).len();
            if suggestions > 0 {
                view_data.dropdown_index =
                    (view_data.dropdown_index + suggestions - 1) % suggestions;
            }
        }
        KeyCode::Enter => {
            let suggestions = current_suggestions(state, view_data);
            let picked = suggestions
                .get(view_data.dropdown_index)
                .cloned()
                .or_else(|| exact_match(state, &view_data.search_query));
            if let Some(ingredient) = picked {
                let name = ingredient.name.clone();
                if !state
                    .dispatch(AppCommand::AddIngredient(ingredient))
                    .is_empty()
                {
                    set_status(view_data, format!("added {name}"));
                }
                view_data.search_query.clear();
                view_data.dropdown_index = 0;
            }
        }
        KeyCode::Esc => {
            view_data.search_query.clear();
            view_data.dropdown_index = 0;
        }
        _ => {}
    }
}

fn handle_results_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    if view_data.derived.filtered_recipes.is_empty() {
        handle_empty_state_key(state, view_data, key);
        return;
    }

    let results = view_data.derived.filtered_recipes.len();
    match key.code {
        KeyCode::Down => {
            view_data.results_index = (view_data.results_index + 1) % results;
        }
        KeyCode::Up => {
            view_data.results_index = (view_data.results_index + results - 1) % results;
        }
        KeyCode::Enter => {
            if let Some(recipe) = view_data
                .derived
                .filtered_recipes
                .get(view_data.results_index)
                .cloned()
            {
                state.dispatch(AppCommand::OpenRecipe(recipe));
            }
        }
        _ => {}
    }
}

fn handle_empty_state_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    let suggestions = empty_state_suggestions(view_data).len();
    match key.code {
        KeyCode::Down if suggestions > 0 => {
            view_data.empty_index = (view_data.empty_index + 1) % suggestions;
        }
        KeyCode::Up if suggestions > 0 => {
            view_data.empty_index = (view_data.empty_index + suggestions - 1) % suggestions;
        }
        KeyCode::Enter => {
            if let Some(ingredient) = empty_state_suggestions(view_data)
                .get(view_data.empty_index)
                .cloned()
            {
                let name = ingredient.name.clone();
                state.dispatch(AppCommand::AddIngredient(ingredient));
                set_status(view_data, format!("added {name}"));
            }
        }
        KeyCode::Char('b') => {
            state.dispatch(AppCommand::ClearIngredients);
            set_status(view_data, "showing all recipes");
        }
        _ => {}
    }
}

fn remove_last_selected(state: &mut AppState, view_data: &mut ViewData) {
    let Some(last) = state.selected_ingredients().last() else {
        return;
    };
    let name = last.name.clone();
    state.dispatch(AppCommand::RemoveIngredient(name.clone()));
    set_status(view_data, format!("removed {name}"));
}

fn exact_match(state: &AppState, query: &str) -> Option<Ingredient> {
    let normalized = normalize_name(query);
    if normalized.is_empty() {
        return None;
    }
    state
        .ingredients()
        .iter()
        .find(|ingredient| {
            ingredient.normalized_name() == normalized && !state.is_selected(&ingredient.name)
        })
        .cloned()
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let title = Paragraph::new("licuado -- find smoothies by what's in your kitchen")
        .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, layout[0]);

    if state.is_loading() {
        let loading = Paragraph::new("loading recipes...")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, layout[2]);
        render_footer(frame, layout[3], state, view_data);
        return;
    }

    if let Some(error) = state.error() {
        let message = format!("something went wrong\n\n{error}\n\npress r to retry");
        let body = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("error"));
        frame.render_widget(body, layout[2]);
        render_footer(frame, layout[3], state, view_data);
        return;
    }

    render_search_bar(frame, layout[1], state, view_data);

    if view_data.derived.filtered_recipes.is_empty() {
        render_empty_state(frame, layout[2], view_data);
    } else {
        render_results(frame, layout[2], view_data);
    }

    render_footer(frame, layout[3], state, view_data);
    render_dropdown(frame, layout[1], state, view_data);

    if let Some(recipe) = state.selected_recipe() {
        render_recipe_modal(frame, recipe);
    }
}

fn render_search_bar(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let mut line = String::new();
    for ingredient in state.selected_ingredients() {
        line.push_str(&format!("[{} {}] ", ingredient.emoji, ingredient.name));
    }
    line.push_str(&view_data.search_query);
    if view_data.focus == FocusPane::Search {
        line.push('▎');
    }
    if state.selected_ingredients().is_empty() && view_data.search_query.is_empty() {
        line = "banana, spinach, mango...".to_owned();
    }

    let style = if view_data.focus == FocusPane::Search {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("ingredients you have")
            .style(style),
    );
    frame.render_widget(search, area);
}

fn render_dropdown(
    frame: &mut ratatui::Frame<'_>,
    search_area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let suggestions = current_suggestions(state, view_data);
    if suggestions.is_empty() || view_data.focus != FocusPane::Search {
        return;
    }

    let height = (suggestions.len() as u16 + 2).min(frame.area().height.saturating_sub(
        search_area.y + search_area.height,
    ));
    if height < 3 {
        return;
    }
    let area = Rect {
        x: search_area.x + 1,
        y: search_area.y + search_area.height,
        width: search_area.width.saturating_sub(2).min(40),
        height,
    };

    frame.render_widget(Clear, area);
    let items: Vec<ListItem> = suggestions
        .iter()
        .map(|ingredient| ListItem::new(format!("{} {}", ingredient.emoji, ingredient.name)))
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(view_data.dropdown_index));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("suggestions"))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_results(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let items: Vec<ListItem> = view_data
        .derived
        .filtered_recipes
        .iter()
        .map(|recipe| ListItem::new(result_row_text(recipe)))
        .collect();

    let style = if view_data.focus == FocusPane::Results {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let mut list_state = ListState::default();
    list_state.select(Some(view_data.results_index));
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("recipes")
                .style(style),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn result_row_text(recipe: &Recipe) -> String {
    let tags = recipe
        .tags
        .iter()
        .map(|tag| format!("[{}]", tag.name))
        .collect::<Vec<String>>()
        .join(" ");
    if tags.is_empty() {
        recipe.name.clone()
    } else {
        format!("{}  {}", recipe.name, tags)
    }
}

fn render_empty_state(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let message = Paragraph::new(
        "no recipes found\nwe couldn't find any smoothie recipes with those ingredients",
    )
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("recipes"));
    frame.render_widget(message, sections[0]);

    let items: Vec<ListItem> = empty_state_suggestions(view_data)
        .iter()
        .map(|ingredient| ListItem::new(format!("{} {}", ingredient.emoji, ingredient.name)))
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(view_data.empty_index));
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("popular ingredients to try (enter adds, b shows all)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, sections[1], &mut list_state);
}

fn render_recipe_modal(frame: &mut ratatui::Frame<'_>, recipe: &Recipe) {
    let area = centered_rect(72, 72, frame.area());
    frame.render_widget(Clear, area);
    let body = Paragraph::new(recipe_detail_text(recipe))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(recipe.name.clone())
                .style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(body, area);
}

fn recipe_detail_text(recipe: &Recipe) -> String {
    let mut out = String::new();
    out.push_str(&recipe.description);
    out.push_str("\n\ningredients:\n");
    for line in &recipe.ingredients {
        out.push_str(&format!(
            "  {} {} {} {}\n",
            line.ingredient.emoji, line.amount, line.unit, line.ingredient.name
        ));
    }
    if !recipe.pro_tips.is_empty() {
        out.push_str("\npro tips:\n");
        for tip in &recipe.pro_tips {
            out.push_str(&format!("  - {tip}\n"));
        }
    }
    if !recipe.tags.is_empty() {
        let tags = recipe
            .tags
            .iter()
            .map(|tag| format!("{} ({})", tag.name, tag.color))
            .collect::<Vec<String>>()
            .join(", ");
        out.push_str(&format!("\ntags: {tags}\n"));
    }
    out.push_str("\npress esc to close");
    out
}

fn render_footer(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let footer = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &view_data.status_line {
        return status.clone();
    }
    if state.is_loading() {
        return "loading...".to_owned();
    }
    if state.error().is_some() {
        return "r retry · ctrl+q quit".to_owned();
    }
    format!(
        "{}/{} recipes · {} selected · tab focus · enter add/open · ctrl+u clear · ctrl+q quit",
        view_data.derived.filtered_recipes.len(),
        state.recipes().len(),
        state.selected_ingredients().len(),
    )
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
