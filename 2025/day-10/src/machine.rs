use bitvec::prelude::*;
use chumsky::prelude::*;
use miette::{Diagnostic, Report, SourceSpan};
use thiserror::Error;

use crate::joltage::{Button, Problem, MAX_COUNTERS};
use crate::lights::LinearSystem;

/// A bit vector backed by `usize` words with Least Significant Bit first ordering.
pub type Row = BitVec<usize, Lsb0>;

/// One line of the machine manual.
#[derive(Debug, Clone)]
pub struct Machine {
    /// 1-based line number in the manual.
    pub line: usize,
    /// Indicator light diagram, `#` = on.
    pub lights: Option<Row>,
    /// Counter indices each button is wired to.
    pub buttons: Vec<Vec<usize>>,
    /// Joltage requirements, one per counter.
    pub joltage: Option<Vec<u16>>,
    span: SourceSpan,
}

impl Machine {
    /// Number of lights (or joltage counters) on the machine.
    pub fn counters(&self) -> usize {
        self.lights
            .as_ref()
            .map(|l| l.len())
            .or_else(|| self.joltage.as_ref().map(Vec::len))
            .unwrap_or_default()
    }

    pub fn lights(&self) -> Result<&Row, MachineError> {
        self.lights.as_ref().ok_or(MachineError::MissingLights {
            line: self.line,
            span: self.span,
        })
    }

    /// Builds the GF(2) toggle equations for the indicator lights.
    pub fn toggle_system(&self) -> Result<LinearSystem, MachineError> {
        Ok(LinearSystem::new(self.lights()?, &self.buttons))
    }

    /// Builds the covering problem for the joltage counters.
    pub fn joltage_problem(&self) -> Result<Problem, MachineError> {
        let targets = self.joltage.as_ref().ok_or(MachineError::MissingJoltage {
            line: self.line,
            span: self.span,
        })?;
        let buttons = self
            .buttons
            .iter()
            .map(|idxs| Button::from_indices(idxs.iter().copied()))
            .collect::<Vec<_>>();
        Ok(Problem::new(targets, buttons)?)
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum MachineError {
    #[error("machine on line {line} has no indicator light diagram")]
    #[diagnostic(
        code(factory::missing_lights),
        help("part 1 needs a `[.##.]` diagram at the start of every line")
    )]
    MissingLights {
        line: usize,
        #[label("this machine")]
        span: SourceSpan,
    },

    #[error("machine on line {line} has no joltage requirements")]
    #[diagnostic(
        code(factory::missing_joltage),
        help("part 2 needs a `{{3,5,4,7}}` block at the end of every line")
    )]
    MissingJoltage {
        line: usize,
        #[label("this machine")]
        span: SourceSpan,
    },

    #[error("machine on line {line} has {lights} lights but {joltage} joltage counters")]
    #[diagnostic(code(factory::length_mismatch))]
    LengthMismatch {
        line: usize,
        lights: usize,
        joltage: usize,
        #[label("lengths disagree")]
        span: SourceSpan,
    },

    #[error("machine on line {line} has {counters} counters, at most {max} are supported", max = MAX_COUNTERS)]
    #[diagnostic(code(factory::too_many_counters))]
    TooManyCounters {
        line: usize,
        counters: usize,
        #[label("too wide")]
        span: SourceSpan,
    },

    #[error("button on line {line} is wired to counter {index}, but the machine only has {counters}")]
    #[diagnostic(code(factory::button_out_of_range))]
    ButtonOutOfRange {
        line: usize,
        index: usize,
        counters: usize,
        #[label("this button")]
        span: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Problem(#[from] crate::joltage::ProblemError),
}

/// Chumsky failure rendered as a diagnostic over the manual text.
#[derive(Debug, Error, Diagnostic)]
#[error("failed to parse machine manual: {reason}")]
#[diagnostic(code(factory::parse))]
pub struct ParseError {
    reason: String,
    #[source_code]
    src: String,
    #[label("here")]
    span: SourceSpan,
}

/// What a record sets out to reach. A record without a diagram must list joltage.
enum Targets {
    Lights(Row, Option<Vec<u16>>),
    Joltage(Vec<u16>),
}

struct RawMachine {
    targets: Targets,
    buttons: Vec<(Vec<usize>, SimpleSpan)>,
    span: SimpleSpan,
}

fn parser<'a>() -> impl Parser<'a, &'a str, Vec<RawMachine>, extra::Err<Rich<'a, char>>> {
    // Custom whitespace parser that excludes newlines
    let hspace = one_of(" \t").repeated();

    let light = choice((just('.').to(false), just('#').to(true)));

    // [.##.]
    let diagram = light
        .repeated()
        .collect::<Vec<bool>>()
        .map(|v| v.into_iter().collect::<Row>())
        .delimited_by(just('['), just(']'));

    let index = text::int(10).try_map(|s: &str, span| {
        s.parse::<usize>()
            .map_err(|e| Rich::custom(span, format!("invalid counter index: {e}")))
    });

    // (0,2,3)
    let button = index
        .separated_by(just(',').padded_by(hspace))
        .collect::<Vec<usize>>()
        .delimited_by(just('('), just(')'))
        .map_with(|idxs, e| (idxs, e.span()));

    let buttons = button.padded_by(hspace).repeated().collect::<Vec<_>>();

    let level = text::int(10).try_map(|s: &str, span| {
        s.parse::<u16>()
            .map_err(|e| Rich::custom(span, format!("invalid joltage level: {e}")))
    });

    // {3,5,4,7}
    let joltage = level
        .separated_by(just(',').padded_by(hspace))
        .at_least(1)
        .collect::<Vec<u16>>()
        .delimited_by(just('{'), just('}'));

    let with_diagram = diagram
        .then_ignore(hspace)
        .then(buttons.clone())
        .then(joltage.clone().or_not())
        .map(|((lights, buttons), joltage)| (Targets::Lights(lights, joltage), buttons));

    let without_diagram = buttons
        .then(joltage)
        .map(|(buttons, joltage)| (Targets::Joltage(joltage), buttons));

    let machine = choice((with_diagram, without_diagram))
        .then_ignore(hspace)
        .map_with(|(targets, buttons), e| RawMachine {
            targets,
            buttons,
            span: e.span(),
        });

    // Blank lines between records may hold stray spaces.
    let separator = text::newline().then(hspace).repeated().at_least(1);

    machine
        .separated_by(separator)
        .allow_trailing()
        .collect()
        .padded()
}

fn to_source_span(span: SimpleSpan) -> SourceSpan {
    (span.start..span.end).into()
}

fn line_of(input: &str, offset: usize) -> usize {
    input[..offset.min(input.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

fn validate(input: &str, raw: RawMachine) -> Result<Machine, MachineError> {
    let span = to_source_span(raw.span);
    let line = line_of(input, raw.span.start);

    let (lights, joltage) = match raw.targets {
        Targets::Lights(lights, Some(joltage)) if lights.len() != joltage.len() => {
            return Err(MachineError::LengthMismatch {
                line,
                lights: lights.len(),
                joltage: joltage.len(),
                span,
            })
        }
        Targets::Lights(lights, joltage) => (Some(lights), joltage),
        Targets::Joltage(joltage) => (None, Some(joltage)),
    };
    let counters = lights
        .as_ref()
        .map(|l| l.len())
        .or_else(|| joltage.as_ref().map(Vec::len))
        .unwrap_or_default();

    if counters > MAX_COUNTERS {
        return Err(MachineError::TooManyCounters {
            line,
            counters,
            span,
        });
    }

    for (idxs, button_span) in &raw.buttons {
        if let Some(&index) = idxs.iter().find(|&&i| i >= counters) {
            return Err(MachineError::ButtonOutOfRange {
                line,
                index,
                counters,
                span: to_source_span(*button_span),
            });
        }
    }

    Ok(Machine {
        line,
        lights,
        buttons: raw.buttons.into_iter().map(|(idxs, _)| idxs).collect(),
        joltage,
        span,
    })
}

/// Parses and validates every machine in the manual.
pub fn parse_machines(input: &str) -> miette::Result<Vec<Machine>> {
    let raw = parser().parse(input).into_result().map_err(|errs| {
        let first = errs.into_iter().next();
        let (reason, span) = match first {
            Some(err) => (err.to_string(), to_source_span(*err.span())),
            None => ("unknown error".to_string(), (0..0).into()),
        };
        ParseError {
            reason,
            src: input.to_string(),
            span,
        }
    })?;

    raw.into_iter()
        .map(|m| validate(input, m))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| Report::new(e).with_source_code(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    const SAMPLE: &str = "[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}";

    #[test]
    fn parses_sample() -> miette::Result<()> {
        let machines = parse_machines(SAMPLE)?;
        assert_eq!(machines.len(), 3);

        let first = &machines[0];
        assert_eq!(first.line, 1);
        assert_eq!(first.counters(), 4);
        assert_eq!(first.lights()?, &bitvec![usize, Lsb0; 0, 1, 1, 0]);
        assert_eq!(first.buttons[1], vec![1, 3]);
        assert_eq!(first.joltage, Some(vec![3, 5, 4, 7]));

        assert_eq!(machines[2].line, 3);
        assert_eq!(machines[2].buttons.len(), 4);
        Ok(())
    }

    #[test]
    fn tolerates_blank_lines_and_crlf() -> miette::Result<()> {
        let input = "\n[#.] (0) (1) {1,0}\r\n\r\n[.#] (0,1) {2,2}\n\n";
        let machines = parse_machines(input)?;
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[1].line, 4);
        Ok(())
    }

    #[test]
    fn blank_lines_may_hold_spaces() -> miette::Result<()> {
        let machines = parse_machines("(0) {1}\n   \n(0) {2}\n \t\n")?;
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[1].line, 3);
        assert_eq!(machines[1].joltage, Some(vec![2]));
        Ok(())
    }

    #[test]
    fn joltage_only_records_are_accepted() -> miette::Result<()> {
        let machines = parse_machines("(0) (0,1) {2,1}")?;
        assert!(machines[0].lights.is_none());
        assert_eq!(machines[0].counters(), 2);

        let problem = machines[0].joltage_problem()?;
        assert_eq!(problem.targets(), &[2, 1]);
        assert_eq!(problem.buttons().len(), 2);
        Ok(())
    }

    #[rstest]
    #[case::missing_close_bracket("[.##. (0) {1,2,3,4}")]
    #[case::missing_close_brace("[.#] (0) {1,2")]
    #[case::missing_close_paren("[.#] (0,1 {1,2}")]
    #[case::non_numeric_target("[.#] (0) {1,x}")]
    #[case::overflowing_target("[.#] (0) {1,70000}")]
    #[case::no_targets_at_all("(0) (1)")]
    fn rejects_malformed_records(#[case] input: &str) {
        assert!(parse_machines(input).is_err());
    }

    #[rstest]
    #[case::index_out_of_range("[.#] (0,2) {1,1}")]
    #[case::length_mismatch("[.#] (0) {1,1,1}")]
    #[case::too_many_counters("[.................] (0)")]
    fn rejects_inconsistent_machines(#[case] input: &str) {
        assert!(parse_machines(input).is_err());
    }

    #[test]
    fn missing_sections_surface_per_part() -> miette::Result<()> {
        let machines = parse_machines("[.#] (0) (1)\n(0) (1) {1,1}")?;
        assert!(matches!(
            machines[0].joltage_problem(),
            Err(MachineError::MissingJoltage { line: 1, .. })
        ));
        assert!(matches!(
            machines[1].lights(),
            Err(MachineError::MissingLights { line: 2, .. })
        ));
        Ok(())
    }
}
