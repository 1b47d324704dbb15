use anyhow::Result;
use chrono::{Days, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

use presta_conta::format::{format_date, format_period, truncate_text};
use presta_conta::{
    ActivitiesView, ActivityStatus, CalendarView, ContentSource, DocumentFilter, DocumentsView,
    GalleryView, MonthYear, Notice, NoticeListView, Portal, StatusFilter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Notices,
    Activities,
    Documents,
    Gallery,
    Calendar,
}

impl Page {
    const ALL: [Page; 5] = [
        Page::Notices,
        Page::Activities,
        Page::Documents,
        Page::Gallery,
        Page::Calendar,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Notices => Page::Activities,
            Page::Activities => Page::Documents,
            Page::Documents => Page::Gallery,
            Page::Gallery => Page::Calendar,
            Page::Calendar => Page::Notices,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Notices => Page::Calendar,
            Page::Activities => Page::Notices,
            Page::Documents => Page::Activities,
            Page::Gallery => Page::Documents,
            Page::Calendar => Page::Gallery,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Notices => "Avisos",
            Page::Activities => "Atividades",
            Page::Documents => "Documentos",
            Page::Gallery => "Galeria",
            Page::Calendar => "Calendário",
        }
    }

    fn searchable(&self) -> bool {
        matches!(self, Page::Notices | Page::Documents)
    }
}

/// One table line, whatever the page
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub group: String,
    pub date: String,
    pub title: String,
    pub extra: String,
    pub color: Color,
}

pub struct App<S: ContentSource> {
    portal: Portal<S>,
    pub today: NaiveDate,
    pub current_page: Page,
    pub state: TableState,
    pub show_detail: bool,
    pub search: String,
    pub searching: bool,
    pub status_filter: StatusFilter,
    pub selected_day: NaiveDate,
    pub notices: NoticeListView,
    pub activities: ActivitiesView,
    pub documents: DocumentsView,
    pub gallery: GalleryView,
    pub calendar: CalendarView,
}

impl<S: ContentSource> App<S> {
    pub fn new(portal: Portal<S>, today: NaiveDate) -> Self {
        let month = MonthYear::from_date(today);
        let mut app = Self {
            notices: portal.notices(""),
            activities: portal.activities(StatusFilter::All),
            documents: portal.documents(&DocumentFilter::default()),
            gallery: portal.gallery(),
            calendar: portal.calendar(month, Some(today), today),
            portal,
            today,
            current_page: Page::Notices,
            state: TableState::default(),
            show_detail: false,
            search: String::new(),
            searching: false,
            status_filter: StatusFilter::All,
            selected_day: today,
        };
        app.reset_selection();
        app
    }

    /// Rebuild every view from the current filters
    pub fn refresh(&mut self) {
        let term = self.search.trim().to_string();
        self.notices = self.portal.notices(&term);
        self.activities = self.portal.activities(self.status_filter);
        self.documents = self.portal.documents(&DocumentFilter {
            term,
            ..Default::default()
        });
        self.gallery = self.portal.gallery();
        self.refresh_calendar();
        self.reset_selection();
    }

    fn refresh_calendar(&mut self) {
        let month = MonthYear::from_date(self.selected_day);
        self.calendar = self.portal.calendar(month, Some(self.selected_day), self.today);
    }

    fn reset_selection(&mut self) {
        if self.rows().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn rows(&self) -> Vec<ListRow> {
        match self.current_page {
            Page::Notices => self
                .notices
                .notices
                .iter()
                .map(|n| ListRow {
                    group: if n.destaque { "★".to_string() } else { String::new() },
                    date: format_date(&n.data_publicacao),
                    title: n.titulo.clone(),
                    extra: truncate_text(&n.conteudo, 40),
                    color: if n.destaque { Color::Yellow } else { Color::White },
                })
                .collect(),
            Page::Activities => self
                .activities
                .groups
                .iter()
                .flat_map(|g| {
                    g.items.iter().map(move |a| ListRow {
                        group: g.label.clone(),
                        date: format_period(&a.data_inicio, &a.data_fim),
                        title: a.titulo.clone(),
                        extra: a.status.label().to_string(),
                        color: status_color(a.status),
                    })
                })
                .collect(),
            Page::Documents => self
                .documents
                .groups
                .iter()
                .flat_map(|g| {
                    g.items.iter().map(move |d| ListRow {
                        group: g.label.clone(),
                        date: d.period_label(),
                        title: d.titulo.clone(),
                        extra: d.type_label(),
                        color: Color::White,
                    })
                })
                .collect(),
            Page::Gallery => self
                .gallery
                .months
                .iter()
                .flat_map(|m| {
                    m.items.iter().map(move |e| ListRow {
                        group: m.label.clone(),
                        date: e.date.clone(),
                        title: e.titulo.clone(),
                        extra: format!("{} fotos", e.photos.len()),
                        color: Color::White,
                    })
                })
                .collect(),
            Page::Calendar => self
                .calendar
                .selected_activities
                .iter()
                .map(|a| ListRow {
                    group: a.local.clone(),
                    date: format_period(&a.data_inicio, &a.data_fim),
                    title: a.titulo.clone(),
                    extra: a.status.label().to_string(),
                    color: status_color(a.status),
                })
                .collect(),
        }
    }

    pub fn empty_message(&self) -> Option<&str> {
        match self.current_page {
            Page::Notices => self.notices.empty_message.as_deref(),
            Page::Activities => self.activities.empty_message.as_deref(),
            Page::Documents => self.documents.empty_message.as_deref(),
            Page::Gallery => self.gallery.empty_message.as_deref(),
            Page::Calendar => None,
        }
    }

    pub fn selected_notice(&self) -> Option<&Notice> {
        if self.current_page != Page::Notices {
            return None;
        }
        self.state.selected().and_then(|i| self.notices.notices.get(i))
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.show_detail = false;
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.show_detail = false;
        self.reset_selection();
    }

    pub fn apply_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.activities = self.portal.activities(filter);
        self.reset_selection();
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.status_filter = StatusFilter::All;
        self.refresh();
    }

    /// Move the selected calendar day; the grid follows into other months.
    pub fn shift_day(&mut self, forward: bool, days: u64) {
        let moved = if forward {
            self.selected_day.checked_add_days(Days::new(days))
        } else {
            self.selected_day.checked_sub_days(Days::new(days))
        };
        if let Some(day) = moved {
            self.selected_day = day;
            self.refresh_calendar();
            self.reset_selection();
        }
    }

    pub fn shift_month(&mut self, forward: bool) {
        let current = self.calendar.month;
        let target = if forward { current.next() } else { current.previous() };
        self.selected_day = target.first_day();
        self.refresh_calendar();
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Returns false when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.searching {
            match key.code {
                KeyCode::Enter => {
                    self.searching = false;
                    self.refresh();
                }
                KeyCode::Esc => {
                    self.searching = false;
                    self.search.clear();
                    self.refresh();
                }
                KeyCode::Backspace => {
                    self.search.pop();
                }
                KeyCode::Char(c) => self.search.push(c),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Char('/') if self.current_page.searchable() => self.searching = true,
            KeyCode::Char('c') => self.clear_filters(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('1') if self.current_page == Page::Activities => {
                self.apply_status_filter(StatusFilter::All)
            }
            KeyCode::Char('2') if self.current_page == Page::Activities => {
                self.apply_status_filter(StatusFilter::Only(ActivityStatus::Scheduled))
            }
            KeyCode::Char('3') if self.current_page == Page::Activities => {
                self.apply_status_filter(StatusFilter::Only(ActivityStatus::Completed))
            }
            KeyCode::Char('4') if self.current_page == Page::Activities => {
                self.apply_status_filter(StatusFilter::Only(ActivityStatus::Cancelled))
            }
            KeyCode::Left | KeyCode::Char('h') if self.current_page == Page::Calendar => {
                self.shift_day(false, 1)
            }
            KeyCode::Right | KeyCode::Char('l') if self.current_page == Page::Calendar => {
                self.shift_day(true, 1)
            }
            KeyCode::Up if self.current_page == Page::Calendar => self.shift_day(false, 7),
            KeyCode::Down if self.current_page == Page::Calendar => self.shift_day(true, 7),
            KeyCode::Char('[') if self.current_page == Page::Calendar => self.shift_month(false),
            KeyCode::Char(']') if self.current_page == Page::Calendar => self.shift_month(true),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Home => self.reset_selection(),
            KeyCode::End => {
                let len = self.rows().len();
                if len > 0 {
                    self.state.select(Some(len - 1));
                }
            }
            _ => {}
        }
        true
    }
}

fn status_color(status: ActivityStatus) -> Color {
    match status {
        ActivityStatus::Scheduled => Color::Cyan,
        ActivityStatus::Completed => Color::Green,
        ActivityStatus::Cancelled => Color::Red,
    }
}

pub fn run_ui<S: ContentSource>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: ContentSource>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(());
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui<S: ContentSource>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.current_page == Page::Calendar {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(chunks[1]);
        render_calendar(f, content_chunks[0], app);
        render_table(f, content_chunks[1], app);
    } else if app.show_detail && app.current_page == Page::Notices {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        render_table(f, content_chunks[0], app);
        render_notice_detail(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header<S: ContentSource>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Hoje: {}", app.today.format("%d/%m/%Y")),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(header, area);
}

fn render_table<S: ContentSource>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let title = match app.current_page {
        Page::Calendar => match &app.calendar.selected_label {
            Some(label) => format!(" {} ", label),
            None => " Atividades do dia ".to_string(),
        },
        page => format!(" {} ", page.title()),
    };

    if let Some(message) = app.empty_message() {
        let empty = Paragraph::new(message.to_string())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["", "Data", "Título", ""].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.rows().into_iter().map(|row| {
        let cells = vec![
            Cell::from(truncate_text(&row.group, 20)),
            Cell::from(row.date),
            Cell::from(truncate_text(&row.title, 40)),
            Cell::from(row.extra).style(Style::default().fg(row.color)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(26),
            Constraint::Length(42),
            Constraint::Min(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_calendar<S: ContentSource>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Dom Seg Ter Qua Qui Sex Sáb",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    for week in &app.calendar.weeks {
        let mut spans = vec![];
        for slot in week {
            match slot {
                Some(cell) => {
                    let mut style = Style::default();
                    if cell.has_activity {
                        style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                    }
                    if cell.is_today {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    if cell.is_selected {
                        style = style.bg(Color::DarkGray);
                    }
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(format!("{:>3}", cell.day.format("%d").to_string()), style));
                }
                None => spans.push(Span::raw("    ")),
            }
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" ■", Style::default().fg(Color::Green)),
        Span::raw(" com atividade"),
    ]));

    let calendar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", app.calendar.label)),
    );
    f.render_widget(calendar, area);
}

fn render_notice_detail<S: ContentSource>(f: &mut Frame, area: Rect, app: &App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Aviso ");

    let Some(notice) = app.selected_notice() else {
        f.render_widget(Paragraph::new("Nenhum aviso selecionado").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut content = vec![
        Line::from(Span::styled(notice.titulo.clone(), label)),
        Line::from(format!("Publicado em {}", format_date(&notice.data_publicacao))),
    ];
    if let Some(period) = &notice.periodo_inscricao {
        content.push(Line::from(vec![
            Span::styled("Inscrições: ", label),
            Span::raw(period.clone()),
        ]));
    }
    for paragraph in notice.paragraphs() {
        content.push(Line::from(""));
        content.push(Line::from(paragraph.to_string()));
    }
    if let Some(file) = &notice.arquivo {
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled("Anexo: ", label),
            Span::raw(format!("{} ({})", file.nome, file.url)),
        ]));
    }

    let detail = Paragraph::new(content).wrap(Wrap { trim: false }).block(block);
    f.render_widget(detail, area);
}

fn render_status_bar<S: ContentSource>(f: &mut Frame, area: Rect, app: &App<S>) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.rows().len();
    let key = Style::default().fg(Color::Yellow);

    let mut status_spans = vec![Span::styled(
        format!(" Item: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if app.searching {
        status_spans.push(Span::raw(" | Busca: "));
        status_spans.push(Span::styled(format!("{}_", app.search), Style::default().fg(Color::Green)));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("Enter", key));
        status_spans.push(Span::raw(" aplicar, "));
        status_spans.push(Span::styled("Esc", key));
        status_spans.push(Span::raw(" cancelar)"));
    } else {
        if !app.search.is_empty() || !app.status_filter.is_all() {
            let mut parts = vec![];
            if !app.search.is_empty() {
                parts.push(format!("\"{}\"", app.search));
            }
            if let StatusFilter::Only(status) = app.status_filter {
                parts.push(status.plural_label().to_string());
            }
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled(
                format!("Filtro: {}", parts.join(" + ")),
                Style::default().fg(Color::Green),
            ));
            status_spans.push(Span::raw(" ("));
            status_spans.push(Span::styled("c", key));
            status_spans.push(Span::raw(" limpar)"));
        }

        status_spans.push(Span::raw(" | "));
        match app.current_page {
            Page::Activities => {
                status_spans.push(Span::styled("1-4", key));
                status_spans.push(Span::raw(" Status | "));
            }
            Page::Calendar => {
                status_spans.push(Span::styled("←/→ ↑/↓", key));
                status_spans.push(Span::raw(" Dia | "));
                status_spans.push(Span::styled("[ ]", key));
                status_spans.push(Span::raw(" Mês | "));
            }
            page if page.searchable() => {
                status_spans.push(Span::styled("/", key));
                status_spans.push(Span::raw(" Buscar | "));
            }
            _ => {}
        }
        status_spans.push(Span::styled("Tab", key));
        status_spans.push(Span::raw(" Página | "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Sair"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use presta_conta::{Collection, MemorySource};

    const AVISOS: &str = r#"[
        {"id": "1", "titulo": "Assembleia geral", "conteudo": "Pauta", "dataPublicacao": "2024-03-01", "destaque": true},
        {"id": "2", "titulo": "Mutirão", "conteudo": "Limpeza da praça", "dataPublicacao": "2024-03-10"}
    ]"#;

    const ATIVIDADES: &str = r#"[
        {"id": "1", "titulo": "Reunião", "dataInicio": "2024-03-05", "dataFim": "2024-03-05", "status": "agendado"},
        {"id": "2", "titulo": "Curso", "dataInicio": "2024-02-28", "dataFim": "2024-03-02", "status": "concluido"}
    ]"#;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App<MemorySource> {
        let source = MemorySource::new()
            .with(Collection::Notices, AVISOS)
            .with(Collection::Activities, ATIVIDADES)
            .with(Collection::Documents, "[]")
            .with(Collection::Photos, "[]");
        App::new(Portal::new(source), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    #[test]
    fn test_pages_cycle() {
        let mut app = app();
        assert_eq!(app.current_page, Page::Notices);
        assert_eq!(app.rows().len(), 2);
        assert_eq!(app.state.selected(), Some(0));

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.current_page, Page::Activities);
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.current_page, Page::Calendar);
    }

    #[test]
    fn test_search_mode() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.searching);
        // Typed text, not a quit
        assert!(app.handle_key(key(KeyCode::Char('q'))));
        app.handle_key(key(KeyCode::Backspace));
        for c in "praça".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(app.handle_key(key(KeyCode::Enter)));
        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.rows()[0].title, "Mutirão");

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.rows().len(), 2);
    }

    #[test]
    fn test_status_filter_keys() {
        let mut app = app();
        app.next_page();
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.status_filter, StatusFilter::Only(ActivityStatus::Completed));
        assert_eq!(app.rows().len(), 1);

        app.handle_key(key(KeyCode::Char('4')));
        assert!(app.rows().is_empty());
        assert_eq!(app.state.selected(), None);
        assert!(app.empty_message().unwrap().contains("Cancelado"));
    }

    #[test]
    fn test_calendar_navigation() {
        let mut app = app();
        app.current_page = Page::Calendar;
        // Mar 1 is inside the two-day course
        assert_eq!(app.rows().len(), 1);

        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.calendar.month, MonthYear::new(2024, 2).unwrap());
        assert_eq!(app.rows().len(), 1);

        app.handle_key(key(KeyCode::Char(']')));
        assert_eq!(app.selected_day, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_day, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert!(app.rows().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
    }
}
