use std::fmt::Write;

use headtotoe_core::{SessionStatus, SessionView, TileView};
use headtotoe_protocol::{BoardFrame, HudFrame, Status, TileFrame};

pub fn status(status: SessionStatus) -> Status {
    match status {
        SessionStatus::Playing => Status::Playing,
        SessionStatus::Failed => Status::Failed,
        SessionStatus::Succeeded => Status::Succeeded,
    }
}

pub fn frame(view: &SessionView) -> BoardFrame {
    BoardFrame {
        level: view.level,
        generation: view.generation,
        rows: view.size.0,
        cols: view.size.1,
        tiles: view
            .tiles
            .iter()
            .map(|tile| TileFrame {
                id: tile.id,
                value: tile.value.clone(),
                flipped: tile.flipped,
                matched: tile.matched,
                hinted_color: tile.hinted_color.as_ref().map(ToString::to_string),
            })
            .collect(),
        hud: HudFrame {
            hint_budget: view.hint_budget,
            countdown: view.countdown,
            status: status(view.status),
            remaining_pairs: view.remaining_pairs,
        },
    }
}

fn label(tile: &TileView) -> String {
    if tile.matched {
        format!("({})", tile.value.to_lowercase())
    } else if tile.flipped && tile.hinted_color.is_some() {
        format!("*{}*", tile.value.to_uppercase())
    } else if tile.flipped {
        tile.value.to_uppercase()
    } else {
        format!("[{:>2}]", tile.id)
    }
}

/// Draws the board as text, face-down tiles show the id to flip them by.
pub fn board(view: &SessionView) -> String {
    let width = view
        .tiles
        .iter()
        .map(|tile| tile.value.len().max(2) + 2)
        .max()
        .unwrap_or(4);

    let hud = match view.status {
        SessionStatus::Playing => format!("time {}s", view.countdown),
        SessionStatus::Failed => "game over".into(),
        SessionStatus::Succeeded => "level cleared!".into(),
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Level {} | hints {} | {} | pairs left {}",
        view.level, view.hint_budget, hud, view.remaining_pairs
    );
    for row in view.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|tile| format!("{:^width$}", label(tile)))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" ").trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use headtotoe_core::*;

    fn view() -> SessionView {
        let config = LevelConfig::new(1, (2, 2), ["eye", "eye", "ear", "ear"]).unwrap();
        let mut session = Session::new(&config, FixedDeckGenerator, Timings::default(), 1).unwrap();
        session.select_tile(0);
        session.select_tile(1);
        session.select_tile(2);
        SessionView::from_session(&session)
    }

    #[test]
    fn draws_each_tile_state() {
        let text = board(&view());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Level 1 | hints 1 | time 9s | pairs left 1");
        assert!(lines[1].contains("(eye)"));
        assert!(lines[2].contains("[ 3]"));
        // tile 2 could not be picked while the match settles
        assert!(lines[2].contains("[ 2]"));
    }

    #[test]
    fn frame_copies_view() {
        let view = view();
        let frame = frame(&view);

        assert_eq!((frame.rows, frame.cols), (2, 2));
        assert_eq!(frame.tiles.len(), 4);
        assert!(frame.tiles[0].matched);
        assert_eq!(frame.hud.remaining_pairs, 1);
        assert_eq!(frame.hud.status, Status::Playing);
    }
}
