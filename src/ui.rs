pub mod jar;
pub mod labels;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Widget},
};

use crate::{
    app::{App, Field, Mode},
    clock::Clock,
    store::StateStore,
};

const HORIZONTAL_MARGIN: u16 = 2;
const ACCENT: Color = Color::Magenta;
const FIELD_WIDTH: usize = 12;

impl<S: StateStore, C: Clock> Widget for &App<S, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.model.snapshot();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let accent_style = Style::default().fg(ACCENT);
        let accent_bold_style = accent_style.patch(bold_style);
        let focused_style = Style::default()
            .fg(Color::Black)
            .bg(Color::LightMagenta)
            .add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // title bar
                Constraint::Length(3), // greeting
                Constraint::Length(1), // goal
                Constraint::Length(1), // count
                Constraint::Length(1), // days left / deadline
                Constraint::Length(1), // padding
                Constraint::Length(3), // gauge
                Constraint::Length(1), // percent
                Constraint::Length(1), // words per day
                Constraint::Min(0),    // jar
                Constraint::Length(1), // status
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            format!(" {}", self.config.title),
            Style::default().fg(Color::White).bg(ACCENT).patch(bold_style),
        ))
        .style(Style::default().bg(ACCENT));
        title.render(chunks[0], buf);

        let body = |r: Rect| {
            Layout::default()
                .horizontal_margin(HORIZONTAL_MARGIN)
                .constraints([Constraint::Min(0)])
                .split(r)[0]
        };

        Paragraph::new(Span::styled(self.config.greeting.as_str(), accent_bold_style))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(accent_style),
            )
            .render(body(chunks[1]), buf);

        let field_line = |field: Field, value: &str| {
            let style = if self.focus == field && self.mode == Mode::Normal {
                focused_style
            } else {
                accent_style
            };
            Line::from(vec![
                Span::styled(format!("{:>12}: ", field.to_string()), accent_bold_style),
                Span::styled(format!("{:<width$}", value, width = FIELD_WIDTH), style),
            ])
        };

        Paragraph::new(field_line(Field::Goal, &self.goal_input))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        Paragraph::new(field_line(Field::Count, &self.count_input))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let deadline_line = match &self.mode {
            Mode::DeadlinePrompt { input } => Line::from(vec![
                Span::styled("New deadline: ", accent_bold_style),
                Span::styled(format!("{input}_"), focused_style),
                Span::styled("  (YYYY-MM-DD, +days, clear)", dim_style),
            ]),
            Mode::Normal => {
                let deadline = snap
                    .deadline_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "Set Deadline".to_string());
                let mut line = field_line(Field::Deadline, &deadline);
                line.spans.push(Span::styled(
                    format!("  {}", labels::days_left_label(&snap)),
                    accent_style,
                ));
                line
            }
        };
        Paragraph::new(deadline_line)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(accent_style),
            )
            .gauge_style(Style::default().fg(Color::LightMagenta).bg(Color::Reset))
            .ratio(snap.progress_ratio())
            .label("")
            .render(body(chunks[6]), buf);

        Paragraph::new(Span::styled(
            format!(
                "Percent of Goal Achieved: {}",
                labels::format_percent(snap.percent_achieved)
            ),
            accent_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);

        Paragraph::new(Span::styled(
            labels::words_per_day_label(&snap),
            accent_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);

        jar::render_jar(snap.progress_ratio(), chunks[9], buf);

        let status = if let Some(err) = self.model.last_save_error() {
            Span::styled(
                format!("Could not save: {err}"),
                Style::default().fg(Color::Red).patch(bold_style),
            )
        } else if let Some(msg) = &self.message {
            Span::styled(msg.as_str(), Style::default().fg(Color::Yellow))
        } else {
            let help = match (&self.mode, self.focus) {
                (Mode::DeadlinePrompt { .. }, _) => "(enter) confirm / (esc) cancel",
                (Mode::Normal, Field::Deadline) => {
                    "(enter) pick date / (+/-) nudge / (c)lear / (tab) next / (esc)ape"
                }
                (Mode::Normal, _) => "type digits / (tab) next field / (esc)ape",
            };
            Span::styled(help, dim_style.add_modifier(Modifier::ITALIC))
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[10], buf);
    }
}
