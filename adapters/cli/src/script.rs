//! Line-based action scripts.
//!
//! One step per line, `#` starts a comment:
//!
//! ```text
//! plant berry 400 300     # seed type, screen x, screen y
//! settle                  # execute every queued remote call
//! water 1                 # plant ids are service ids, `p0` names a pending plant
//! work
//! tick 25m
//! claim work
//! expect stage 1 1
//! ```

use std::time::Duration;

use pomo_patch_core::{
    Command, PendingId, PlantId, PlantKey, PlantType, Position, SessionMode, Stage,
};

/// Single instruction of a script.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Step {
    Action(Command),
    Settle,
    Offline(bool),
    ExpectMoney(u64),
    ExpectPlants(usize),
    ExpectStage { plant: PlantKey, stage: Stage },
}

/// Step together with the line it came from.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Line {
    pub(crate) number: usize,
    pub(crate) step: Step,
}

#[derive(Debug, thiserror::Error)]
#[error("line {line}: {kind}")]
pub(crate) struct ScriptError {
    line: usize,
    kind: ScriptErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ScriptErrorKind {
    #[error("unknown instruction '{0}'")]
    UnknownInstruction(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("unexpected argument '{0}'")]
    TrailingArgument(String),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("'{0}' is not a plant type")]
    InvalidPlantType(String),
    #[error("'{0}' is not a plant id")]
    InvalidPlant(String),
    #[error("'{0}' is not a duration")]
    InvalidDuration(String),
    #[error("'{0}' is not a stage")]
    InvalidStage(String),
}

/// Parses a whole script, stopping at the first invalid line.
pub(crate) fn parse(text: &str) -> Result<Vec<Line>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let number = index + 1;
        let step = parse_step(content).map_err(|kind| ScriptError { line: number, kind })?;
        lines.push(Line { number, step });
    }
    Ok(lines)
}

fn parse_step(content: &str) -> Result<Step, ScriptErrorKind> {
    let mut words = content.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let step = match verb {
        "plant" => Step::Action(Command::PlaceSeed {
            plant_type: plant_type(next(&mut words, "plant type")?)?,
            position: position(&mut words)?,
        }),
        "pickup" => Step::Action(Command::PickUp {
            plant: plant(next(&mut words, "plant")?)?,
        }),
        "drag" => Step::Action(Command::MoveAttached {
            position: position(&mut words)?,
        }),
        "drop" => Step::Action(Command::DropAttached),
        "sell" => Step::Action(Command::Sell),
        "water" => Step::Action(Command::ApplyWater {
            plant: plant(next(&mut words, "plant")?)?,
        }),
        "fertilize" => Step::Action(Command::ApplyFertilizer {
            plant: plant(next(&mut words, "plant")?)?,
        }),
        "upgrade" => Step::Action(Command::UpgradePlantLimit),
        "work" => Step::Action(Command::StartWorkSession),
        "tick" => Step::Action(Command::Tick {
            dt: duration(next(&mut words, "duration")?)?,
        }),
        "claim" => match mode(next(&mut words, "session mode")?)? {
            SessionMode::Break => Step::Action(Command::ClaimBreakReward),
            SessionMode::Work | SessionMode::Idle => Step::Action(Command::ClaimWorkReward),
        },
        "exit" => Step::Action(Command::ExitSession),
        "resync" => Step::Action(Command::Resync),
        "settle" => Step::Settle,
        "offline" => Step::Offline(toggle(next(&mut words, "on or off")?)?),
        "expect" => expectation(&mut words)?,
        other => return Err(ScriptErrorKind::UnknownInstruction(other.to_owned())),
    };

    match words.next() {
        Some(extra) => Err(ScriptErrorKind::TrailingArgument(extra.to_owned())),
        None => Ok(step),
    }
}

fn expectation<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Step, ScriptErrorKind> {
    match next(words, "expectation")? {
        "money" => Ok(Step::ExpectMoney(number(next(words, "amount")?)?)),
        "plants" => Ok(Step::ExpectPlants(number(next(words, "count")?)?)),
        "stage" => {
            let plant = plant(next(words, "plant")?)?;
            let raw = next(words, "stage")?;
            let stage = number::<u8>(raw)
                .ok()
                .and_then(|ordinal| Stage::try_from(ordinal).ok())
                .ok_or_else(|| ScriptErrorKind::InvalidStage(raw.to_owned()))?;
            Ok(Step::ExpectStage { plant, stage })
        }
        other => Err(ScriptErrorKind::UnknownInstruction(format!("expect {other}"))),
    }
}

fn next<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<&'a str, ScriptErrorKind> {
    words.next().ok_or(ScriptErrorKind::MissingArgument(what))
}

fn number<T: std::str::FromStr>(raw: &str) -> Result<T, ScriptErrorKind> {
    raw.parse()
        .map_err(|_| ScriptErrorKind::InvalidNumber(raw.to_owned()))
}

fn position<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Position, ScriptErrorKind> {
    let x = number(next(words, "x coordinate")?)?;
    let y = number(next(words, "y coordinate")?)?;
    Ok(Position::new(x, y))
}

fn plant_type(raw: &str) -> Result<PlantType, ScriptErrorKind> {
    PlantType::from_name(raw).ok_or_else(|| ScriptErrorKind::InvalidPlantType(raw.to_owned()))
}

fn plant(raw: &str) -> Result<PlantKey, ScriptErrorKind> {
    let invalid = || ScriptErrorKind::InvalidPlant(raw.to_owned());
    match raw.strip_prefix('p') {
        Some(pending) => pending
            .parse()
            .map(|value| PlantKey::Pending(PendingId::new(value)))
            .map_err(|_| invalid()),
        None => raw
            .parse()
            .map(|value| PlantKey::Confirmed(PlantId::new(value)))
            .map_err(|_| invalid()),
    }
}

/// Accepts plain seconds or a number suffixed with `s`, `m` or `h`.
fn duration(raw: &str) -> Result<Duration, ScriptErrorKind> {
    let invalid = || ScriptErrorKind::InvalidDuration(raw.to_owned());
    let (amount, scale) = match raw.char_indices().last() {
        Some((index, 'h')) => (&raw[..index], 3_600),
        Some((index, 'm')) => (&raw[..index], 60),
        Some((index, 's')) => (&raw[..index], 1),
        _ => (raw, 1),
    };
    let amount: u64 = amount.parse().map_err(|_| invalid())?;
    amount
        .checked_mul(scale)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

fn mode(raw: &str) -> Result<SessionMode, ScriptErrorKind> {
    match raw {
        "work" => Ok(SessionMode::Work),
        "break" => Ok(SessionMode::Break),
        other => Err(ScriptErrorKind::UnknownInstruction(format!("claim {other}"))),
    }
}

fn toggle(raw: &str) -> Result<bool, ScriptErrorKind> {
    match raw {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(ScriptErrorKind::UnknownInstruction(format!("offline {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let lines = parse("# header\n\nplant rose 400 300  # first seed\nsettle\n")
            .expect("script parses");

        assert_eq!(
            lines,
            vec![
                Line {
                    number: 3,
                    step: Step::Action(Command::PlaceSeed {
                        plant_type: PlantType::Rose,
                        position: Position::new(400.0, 300.0),
                    }),
                },
                Line {
                    number: 4,
                    step: Step::Settle,
                },
            ]
        );
    }

    #[test]
    fn plant_references_distinguish_pending_ids() {
        assert_eq!(
            plant("p2").expect("pending ref"),
            PlantKey::Pending(PendingId::new(2))
        );
        assert_eq!(
            plant("17").expect("service id"),
            PlantKey::Confirmed(PlantId::new(17))
        );
        assert!(plant("px").is_err());
    }

    #[test]
    fn durations_accept_unit_suffixes() {
        assert_eq!(duration("90").expect("seconds"), Duration::from_secs(90));
        assert_eq!(duration("25m").expect("minutes"), Duration::from_secs(1_500));
        assert_eq!(duration("1h").expect("hours"), Duration::from_secs(3_600));
        assert!(duration("soon").is_err());
    }

    #[test]
    fn errors_name_the_offending_line() {
        let error = parse("settle\nwater\n").expect_err("missing plant");
        assert_eq!(error.to_string(), "line 2: missing plant");

        let error = parse("drop now").expect_err("trailing argument");
        assert_eq!(error.to_string(), "line 1: unexpected argument 'now'");
    }

    #[test]
    fn expectations_parse() {
        let lines = parse("expect money 150\nexpect plants 2\nexpect stage 4 2")
            .expect("expectations parse");
        let steps: Vec<Step> = lines.into_iter().map(|line| line.step).collect();
        assert_eq!(
            steps,
            vec![
                Step::ExpectMoney(150),
                Step::ExpectPlants(2),
                Step::ExpectStage {
                    plant: PlantKey::Confirmed(PlantId::new(4)),
                    stage: Stage::Mature,
                },
            ]
        );
    }
}
