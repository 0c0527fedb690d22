//! Game configuration shared by the `play` and `simulate` front ends.
//!
//! The binary turns its command line into a [`GameConfig`]; everything the
//! core needs is derived from it and validated by the core itself.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::core::{Board, BoardConfig, GameSession, LayoutMask, PieceCatalog};
use crate::types::{PieceKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    pub kinds: Vec<PieceKind>,
    pub seed: u32,
    /// Layout mask file, top row first
    pub layout: Option<PathBuf>,
    pub moves: u32,
    pub goal: u32,
    /// Delay between cascade phases in `play`
    pub step_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            kinds: PieceKind::ALL.to_vec(),
            seed: 1,
            layout: None,
            moves: 20,
            goal: 1000,
            step_ms: 120,
        }
    }
}

/// Parse a kind list: letters (`RGB`) or comma-separated names (`red,green,blue`).
pub fn parse_kinds(spec: &str) -> Result<Vec<PieceKind>> {
    let spec = spec.trim();
    let kinds = if spec.contains(',') {
        spec.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| PieceKind::from_str(s).with_context(|| format!("unknown piece kind {s:?}")))
            .collect::<Result<Vec<_>>>()?
    } else {
        spec.chars()
            .map(|c| PieceKind::from_char(c).with_context(|| format!("unknown piece letter {c:?}")))
            .collect::<Result<Vec<_>>>()?
    };
    if kinds.is_empty() {
        bail!("no piece kinds given");
    }
    Ok(kinds)
}

impl GameConfig {
    pub fn load_layout(&self) -> Result<Option<LayoutMask>> {
        let Some(path) = &self.layout else {
            return Ok(None);
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout {}", path.display()))?;
        let mask = LayoutMask::parse(self.width, self.height, &text)
            .with_context(|| format!("invalid layout {}", path.display()))?;
        Ok(Some(mask))
    }

    pub fn board_config(&self) -> Result<BoardConfig> {
        let mut config = BoardConfig::new(self.width, self.height);
        if let Some(mask) = self.load_layout()? {
            config = config.with_layout(mask);
        }
        config.validate().context("invalid board configuration")?;
        Ok(config)
    }

    pub fn catalog(&self) -> Result<PieceCatalog> {
        PieceCatalog::new(&self.kinds, self.seed).context("invalid piece kinds")
    }

    pub fn build_board(&self) -> Result<Board> {
        let board = Board::new(self.board_config()?, self.catalog()?)
            .with_context(|| format!("failed to build a board with seed {}", self.seed))?;
        log::info!(
            "board {}x{} seed {} kinds {:?}",
            self.width,
            self.height,
            self.seed,
            self.kinds
        );
        Ok(board)
    }

    pub fn session(&self) -> GameSession {
        GameSession::new(self.moves, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_from_letters_and_names() {
        assert_eq!(
            parse_kinds("rgb").unwrap(),
            vec![PieceKind::Red, PieceKind::Green, PieceKind::Blue]
        );
        assert_eq!(
            parse_kinds("white, purple,red").unwrap(),
            vec![PieceKind::White, PieceKind::Purple, PieceKind::Red]
        );
        assert!(parse_kinds("rgz").is_err());
        assert!(parse_kinds("").is_err());
    }

    #[test]
    fn too_few_kinds_is_a_config_error() {
        let cfg = GameConfig {
            kinds: vec![PieceKind::Red, PieceKind::Blue],
            ..GameConfig::default()
        };
        let err = cfg.build_board().unwrap_err();
        assert!(format!("{err:#}").contains("distinct piece kinds"));
    }

    #[test]
    fn missing_layout_file_is_reported() {
        let cfg = GameConfig {
            layout: Some(PathBuf::from("/nonexistent/layout.txt")),
            ..GameConfig::default()
        };
        let err = cfg.board_config().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read layout"));
    }

    #[test]
    fn default_config_builds() {
        let cfg = GameConfig::default();
        let mut board = cfg.build_board().unwrap();
        assert!(!board.scan_board());
        assert_eq!(cfg.session().moves_left(), 20);
    }
}
