//! FEN parsing and emission.

use super::error::FenError;
use super::state::{Position, PositionState};
use super::types::{CastlingRights, Color, Piece, Square};

impl Position {
    /// Set the position from a six-field FEN string.
    ///
    /// On any malformed field the position is left untouched and an error
    /// is returned. On success the repetition ring is cleared.
    pub fn set_from_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(FenError::TooFewFields {
                found: fields.len(),
            });
        }

        let mut state = PositionState::empty();

        // Piece placement, rank 8 first
        let mut square_index = 0usize;
        for c in fields[0].chars() {
            match c {
                '/' => {}
                '1'..='8' => square_index += c as usize - '0' as usize,
                _ => {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if square_index >= 64 {
                        return Err(FenError::InvalidPlacement);
                    }
                    state.piece_bitboards[piece.index()].set(Square::from_index(square_index));
                    square_index += 1;
                }
            }
        }
        if square_index != 64 {
            return Err(FenError::InvalidPlacement);
        }

        state.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for c in fields[2].chars() {
            match c {
                'K' => state.castling_rights.set(Color::White, true),
                'Q' => state.castling_rights.set(Color::White, false),
                'k' => state.castling_rights.set(Color::Black, true),
                'q' => state.castling_rights.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        state.en_passant_square = match fields[3] {
            "-" => None,
            notation => Some(notation.parse::<Square>().map_err(|_| {
                FenError::InvalidEnPassant {
                    found: notation.to_string(),
                }
            })?),
        };

        state.halfmove_clock =
            fields[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidCounter {
                    found: fields[4].to_string(),
                })?;
        let fullmove = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidCounter {
                found: fields[5].to_string(),
            })?;
        state.ply = 2 * fullmove.saturating_sub(1) + u32::from(state.side_to_move == Color::Black);

        self.state = state;
        self.generate_occupancies();
        self.state.key = self.generate_key();
        self.repetition.clear();
        Ok(())
    }

    /// The FEN string for the current position
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_squares = 0;
            for file in 0..8 {
                match self.piece_on(Square::from_file_rank(file, rank)) {
                    Some(piece) => {
                        if empty_squares > 0 {
                            fen.push_str(&empty_squares.to_string());
                            empty_squares = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty_squares += 1,
                }
            }
            if empty_squares > 0 {
                fen.push_str(&empty_squares.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.state.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let rights = self.state.castling_rights;
        if rights == CastlingRights::none() {
            fen.push('-');
        } else {
            if rights.has(Color::White, true) {
                fen.push('K');
            }
            if rights.has(Color::White, false) {
                fen.push('Q');
            }
            if rights.has(Color::Black, true) {
                fen.push('k');
            }
            if rights.has(Color::Black, false) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.state.en_passant_square {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(
            " {} {}",
            self.state.halfmove_clock,
            self.state.ply / 2 + 1
        ));
        fen
    }
}
