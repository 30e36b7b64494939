use crate::app::App;
use crate::constants::colors;
use crate::models::{BlockState, DefragPhase};
use crate::segments::{compress, Segment};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    prelude::*,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

// -- Terminal setup -------------------------------------------------------------

pub struct TuiWrapper {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
}

impl TuiWrapper {
    pub fn new() -> Result<Self, std::io::Error> {
        use crossterm::{
            terminal::{enable_raw_mode, EnterAlternateScreen},
            ExecutableCommand,
        };

        std::io::stdout().execute(EnterAlternateScreen)?;
        enable_raw_mode()?;
        let backend = CrosstermBackend::new(std::io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, f: impl FnOnce(&mut Frame)) -> Result<(), std::io::Error> {
        self.terminal.draw(f).map(|_| ())
    }

    pub fn cleanup(&mut self) -> Result<(), std::io::Error> {
        use crossterm::{
            terminal::{disable_raw_mode, LeaveAlternateScreen},
            ExecutableCommand,
        };

        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(())
    }
}

// -- Screen layout --------------------------------------------------------------

pub fn render_app(app: &App, frame: &mut Frame) {
    frame.render_widget(Block::new().style(Style::new().on_blue()), frame.area());

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(frame.area());

    render_header(frame, main_layout[0]);

    let window = Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(" Disk Defragmenter ")
        .title_alignment(Alignment::Center)
        .style(Style::new().on_blue());
    let inner = window.inner(main_layout[1]);
    frame.render_widget(window, main_layout[1]);

    render_bars(app, frame, inner);
    render_footer(app, frame, main_layout[2]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let keys = " Space=Start/Pause  R=Restart  X=Stop  S=Sound  Q=Quit";
    let padding = (area.width as usize).saturating_sub(keys.len());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(keys, Style::new().black().on_white()),
        Span::styled(" ".repeat(padding), Style::new().black().on_white()),
    ]));
    frame.render_widget(header, area);
}

fn render_bars(app: &App, frame: &mut Frame, area: Rect) {
    // Bar height scales with how many rows the grid needs at this width
    let bar_width = area.width.saturating_sub(2).max(1);
    let bar_rows = (app.initial_grid.len() as u16).div_ceil(bar_width).max(1);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(bar_rows),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(bar_rows),
            Constraint::Min(0),
        ])
        .split(area.inner(Margin::new(1, 0)));

    let label = |text: &str| {
        Paragraph::new(text.to_string()).style(Style::new().white().on_blue())
    };

    frame.render_widget(
        label("Estimated disk usage before defragmentation:"),
        layout[1],
    );
    frame.render_widget(
        BlockBarWidget::new(&app.initial_grid),
        layout[2],
    );
    frame.render_widget(
        label("Estimated disk usage after defragmentation:"),
        layout[4],
    );
    frame.render_widget(
        BlockBarWidget::new(&app.current_grid),
        layout[5],
    );
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let swatch = |color: Color, name: &str| {
        vec![
            Span::styled("  ", Style::new().bg(color)),
            Span::styled(format!(" {}   ", name), Style::new().white().on_blue()),
        ]
    };
    let mut legend = vec![Span::styled(" Legend: ", Style::new().white().on_blue())];
    legend.extend(swatch(colors::FREE, "Free"));
    legend.extend(swatch(colors::FRAGMENTED, "Fragmented"));
    legend.extend(swatch(colors::CONTIGUOUS, "Contiguous"));
    legend.extend(swatch(colors::UNMOVABLE, "Unmovable"));
    frame.render_widget(Paragraph::new(Line::from(legend)), rows[0]);

    let status = format!(
        " {}   (fragmentation: {:.0}%)",
        app.status_text(),
        app.fragmentation_percent()
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::new().white().on_blue()),
        rows[1],
    );

    if app.phase != DefragPhase::Idle {
        frame.render_widget(progress_line(app.progress_percent(), area.width), rows[2]);
    }
}

fn progress_line(percent: f32, width: u16) -> Paragraph<'static> {
    let bar_width = (width as usize).saturating_sub(10).max(10);
    let filled = ((percent / 100.0) * bar_width as f32) as usize;
    let bar = format!(
        " {}{} {:>3.0}%",
        "█".repeat(filled.min(bar_width)),
        "░".repeat(bar_width - filled.min(bar_width)),
        percent
    );
    Paragraph::new(bar).style(Style::new().white().on_blue())
}

// -- Block bar widget -----------------------------------------------------------

/// Paints a grid as its run-length segments, wrapping blocks across rows.
/// Consumes only `compress()` output, never individual grid cells.
pub struct BlockBarWidget {
    segments: Vec<Segment>,
}

impl BlockBarWidget {
    pub fn new(grid: &[BlockState]) -> Self {
        Self {
            segments: compress(grid),
        }
    }
}

impl Widget for BlockBarWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        if width == 0 {
            return;
        }

        for segment in &self.segments {
            for block in segment.offset..segment.offset + segment.len {
                let row = (block / width) as u16;
                let col = (block % width) as u16;
                if row >= area.height {
                    break;
                }
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(" ").set_bg(segment.color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::generate_with;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_block_bar_paints_every_block_once() {
        let grid = generate_with(&mut StdRng::seed_from_u64(13));
        let widget = BlockBarWidget::new(&grid);
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        for (i, &block) in grid.iter().enumerate() {
            let x = (i % 60) as u16;
            let y = (i / 60) as u16;
            let cell = buf.cell((x, y)).unwrap();
            assert_eq!(cell.bg, colors::block_color(block), "block {} miscolored", i);
        }
    }

    #[test]
    fn test_block_bar_clips_to_area() {
        let grid = generate_with(&mut StdRng::seed_from_u64(14));
        let widget = BlockBarWidget::new(&grid);
        // Too small for 290 blocks: must not panic, just clip
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
