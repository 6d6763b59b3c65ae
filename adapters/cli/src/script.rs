use anyhow::{bail, Result};
use cucumber_world_core::Direction;

/// Single action of a scripted walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Hold the direction for one frame, then wait until the step settles.
    Step(Direction),
    /// Press the interact key for one frame, then release it.
    Interact,
    /// Let one frame pass without input.
    Wait,
}

/// Parses a walk script such as `rrd.i`.
///
/// `u`, `d`, `l` and `r` step in a direction, `i` interacts and `.` waits a
/// frame. Whitespace is ignored.
pub(crate) fn parse(script: &str) -> Result<Vec<Action>> {
    script
        .chars()
        .filter(|symbol| !symbol.is_whitespace())
        .enumerate()
        .map(|(index, symbol)| {
            Ok(match symbol.to_ascii_lowercase() {
                'u' => Action::Step(Direction::Up),
                'd' => Action::Step(Direction::Down),
                'l' => Action::Step(Direction::Left),
                'r' => Action::Step(Direction::Right),
                'i' => Action::Interact,
                '.' => Action::Wait,
                other => bail!("unknown walk action `{other}` at position {index}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action() {
        assert_eq!(
            parse("uD l\nr.i").expect("script parses"),
            vec![
                Action::Step(Direction::Up),
                Action::Step(Direction::Down),
                Action::Step(Direction::Left),
                Action::Step(Direction::Right),
                Action::Wait,
                Action::Interact,
            ]
        );
    }

    #[test]
    fn rejects_unknown_symbols() {
        let error = parse("rrx").expect_err("script is rejected");
        assert!(error.to_string().contains("`x` at position 2"));
    }
}
