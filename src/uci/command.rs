//! UCI command parsing.

/// Parameters of a `go` command
#[derive(Default, Debug, Clone)]
pub struct GoParams {
    pub depth: Option<i32>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    pub infinite: bool,
}

/// A parsed UCI command line
#[derive(Debug, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    /// Tokens after `position`
    Position(Vec<String>),
    Go(GoParams),
    /// `name`/`value` pair from `setoption`
    SetOption { name: String, value: String },
    /// Tokens after `perft`
    Perft(Vec<String>),
    Display,
    Eval,
    Stop,
    Quit,
    Unknown(String),
}

/// Parse the next parameter value as type T
#[inline]
fn parse_next<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

#[must_use]
pub fn parse_go_params(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < parts.len() {
        let consumed = match parts[i] {
            "depth" => {
                params.depth = parse_next(parts, i);
                2
            }
            "wtime" => {
                params.wtime = parse_next(parts, i);
                2
            }
            "btime" => {
                params.btime = parse_next(parts, i);
                2
            }
            "winc" => {
                params.winc = parse_next(parts, i);
                2
            }
            "binc" => {
                params.binc = parse_next(parts, i);
                2
            }
            "movestogo" => {
                params.movestogo = parse_next(parts, i);
                2
            }
            "nodes" => {
                params.nodes = parse_next(parts, i);
                2
            }
            "movetime" => {
                params.movetime = parse_next(parts, i);
                2
            }
            "infinite" => {
                params.infinite = true;
                1
            }
            // Unknown token - skip
            _ => 1,
        };
        i += consumed;
    }
    params
}

fn parse_setoption(parts: &[&str]) -> UciCommand {
    let mut name = String::new();
    let mut value = String::new();
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "name" => {
                if let Some(n) = parts.get(i + 1) {
                    name = (*n).to_string();
                }
                i += 2;
            }
            "value" => {
                if let Some(v) = parts.get(i + 1) {
                    value = (*v).to_string();
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    UciCommand::SetOption { name, value }
}

#[must_use]
pub fn parse_uci_command(line: &str) -> Option<UciCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let first = parts.first()?;

    let rest = || {
        parts[1..]
            .iter()
            .map(|p| (*p).to_string())
            .collect::<Vec<String>>()
    };

    let cmd = match *first {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(rest()),
        "go" => UciCommand::Go(parse_go_params(&parts)),
        "setoption" => parse_setoption(&parts),
        "perft" => UciCommand::Perft(rest()),
        "d" => UciCommand::Display,
        "eval" => UciCommand::Eval,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(line.trim().to_string()),
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert!(matches!(parse_uci_command("uci"), Some(UciCommand::Uci)));
        assert!(matches!(
            parse_uci_command("isready"),
            Some(UciCommand::IsReady)
        ));
        assert!(matches!(parse_uci_command("stop"), Some(UciCommand::Stop)));
        assert!(matches!(parse_uci_command("quit"), Some(UciCommand::Quit)));
        assert!(parse_uci_command("   ").is_none());
    }

    #[test]
    fn test_parse_go_params() {
        let params = parse_go_params(&[
            "go", "wtime", "60000", "btime", "55000", "winc", "1000", "binc", "900", "movestogo",
            "20",
        ]);
        assert_eq!(params.wtime, Some(60000));
        assert_eq!(params.btime, Some(55000));
        assert_eq!(params.winc, Some(1000));
        assert_eq!(params.binc, Some(900));
        assert_eq!(params.movestogo, Some(20));
        assert!(!params.infinite);
    }

    #[test]
    fn test_parse_go_depth_and_nodes() {
        let params = parse_go_params(&["go", "depth", "9", "nodes", "100000"]);
        assert_eq!(params.depth, Some(9));
        assert_eq!(params.nodes, Some(100_000));
    }

    #[test]
    fn test_parse_go_bad_integer_is_ignored() {
        let params = parse_go_params(&["go", "depth", "banana"]);
        assert_eq!(params.depth, None);
    }

    #[test]
    fn test_parse_setoption() {
        let Some(UciCommand::SetOption { name, value }) =
            parse_uci_command("setoption name Hash value 256")
        else {
            panic!("expected SetOption");
        };
        assert_eq!(name, "Hash");
        assert_eq!(value, "256");
    }

    #[test]
    fn test_parse_position_tokens() {
        let Some(UciCommand::Position(tokens)) =
            parse_uci_command("position startpos moves e2e4 e7e5")
        else {
            panic!("expected Position");
        };
        assert_eq!(tokens, vec!["startpos", "moves", "e2e4", "e7e5"]);
    }

    #[test]
    fn test_unknown_command() {
        let Some(UciCommand::Unknown(text)) = parse_uci_command("frobnicate now") else {
            panic!("expected Unknown");
        };
        assert_eq!(text, "frobnicate now");
    }
}
