use std::io::{self, Write};

use crossterm::{
    QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};

use super::Game;
use crate::board::Direction;

/// Runs the interactive screen until the player quits or the board locks up.
pub fn play(game: &mut Game) -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    loop {
        // Draw board
        stdout.queue(Clear(ClearType::All))?;
        stdout.queue(MoveTo(0, 0))?;

        stdout.queue(Print(format!(
            "round {}   score {}\r\n\r\n",
            game.rounds(),
            game.score()
        )))?;

        for row in game.values().chunks(game.board().size()) {
            for &cell in row {
                stdout.queue(SetForegroundColor(tile_color(cell)))?;

                if cell == 0 {
                    stdout.queue(Print(format!("{:>6}", ".")))?;
                } else {
                    stdout.queue(Print(format!("{cell:>6}")))?;
                }

                stdout.queue(ResetColor)?;
            }

            stdout.queue(Print("\r\n\r\n"))?;
        }

        stdout.queue(Print("arrow keys or l, r, u, d to pack -- q to quit\r\n"))?;
        stdout.flush()?;

        if game.is_terminal() {
            break;
        }

        // Handle input
        let event = event::read()?;
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            let direction = match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Left | KeyCode::Char('l') => Direction::Left,
                KeyCode::Right | KeyCode::Char('r') => Direction::Right,
                KeyCode::Up | KeyCode::Char('u') => Direction::Up,
                KeyCode::Down | KeyCode::Char('d') => Direction::Down,
                _ => continue,
            };

            game.pack(direction);
        }
    }

    execute!(stdout, LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;

    Ok(())
}

fn tile_color(value: u64) -> Color {
    match value {
        0 => Color::DarkGrey,
        2 | 4 => Color::White,
        8 | 16 => Color::Cyan,
        32 | 64 => Color::Green,
        128 | 256 => Color::Yellow,
        512 | 1024 => Color::Magenta,
        _ => Color::Red,
    }
}
