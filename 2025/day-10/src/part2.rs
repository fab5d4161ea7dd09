use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use miette::*;
use rayon::prelude::*;

use crate::joltage::{self, FallbackPolicy, Outcome, Problem, SolveReport, SolverConfig};
use crate::machine::{parse_machines, Machine};

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> Result<String> {
    process_with(input, &SolverConfig::default())
}

#[tracing::instrument(skip(input))]
pub fn process_with(input: &str, config: &SolverConfig) -> Result<String> {
    run(input, config, ProgressBar::hidden())
}

/// Like [`process_with`], drawing a progress bar over the machines on stderr.
pub fn process_with_progress(input: &str, config: &SolverConfig) -> Result<String> {
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} machines [{elapsed_precise}]")
        .into_diagnostic()?;
    run(input, config, ProgressBar::no_length().with_style(style))
}

/// Solves every machine in parallel, keeping input order.
pub fn solve_all(problems: &[Problem], config: &SolverConfig) -> Vec<SolveReport> {
    solve_with_progress(problems, config, ProgressBar::hidden())
}

fn solve_with_progress(
    problems: &[Problem],
    config: &SolverConfig,
    bar: ProgressBar,
) -> Vec<SolveReport> {
    bar.set_length(problems.len() as u64);
    let reports = problems
        .par_iter()
        .progress_with(bar.clone())
        .map(|problem| joltage::solve_machine(problem, config))
        .collect();
    bar.finish();
    reports
}

fn run(input: &str, config: &SolverConfig, bar: ProgressBar) -> Result<String> {
    let machines = parse_machines(input)?;
    let problems = machines
        .iter()
        .map(Machine::joltage_problem)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Report::new(e).with_source_code(input.to_string()))?;

    let reports = solve_with_progress(&problems, config, bar);

    let mut total: u64 = 0;
    for ((machine, problem), report) in machines.iter().zip(&problems).zip(&reports) {
        total += u64::from(presses(machine, problem, report, config.fallback)?);
    }

    let explored: usize = reports.iter().map(|r| r.stats.explored).sum();
    tracing::debug!(machines = machines.len(), explored, total, "all machines solved");

    Ok(total.to_string())
}

/// Press count to add to the total for one machine.
fn presses(
    machine: &Machine,
    problem: &Problem,
    report: &SolveReport,
    fallback: FallbackPolicy,
) -> Result<u32> {
    match (report.outcome, fallback) {
        (Outcome::Optimal(presses), _) => Ok(presses),
        (Outcome::BestEffort(presses), _) => {
            tracing::warn!(
                line = machine.line,
                presses,
                explored = report.stats.explored,
                "search budget ran out, counting an unproven press total"
            );
            Ok(presses)
        }
        (Outcome::Infeasible, FallbackPolicy::Estimate) => {
            let estimate = 2 * problem.total();
            tracing::warn!(
                line = machine.line,
                estimate,
                "no press sequence found, counting an estimate"
            );
            Ok(estimate)
        }
        (Outcome::Infeasible, FallbackPolicy::Reject) if report.stats.budget_exhausted => {
            Err(miette!(
                code = "factory::search_exhausted",
                help = "raise `max_states` or `time_limit` in the solver config",
                "no press sequence for machine on line {} was found within the search budget ({} states explored)",
                machine.line,
                report.stats.explored
            ))
        }
        (Outcome::Infeasible, FallbackPolicy::Reject) => Err(miette!(
            code = "factory::infeasible",
            help = "no combination of button presses reaches these joltage levels exactly",
            "machine on line {} cannot reach its joltage targets",
            machine.line
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn it_works() -> Result<()> {
        let input = "[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}";
        assert_eq!("33", process(input)?);
        Ok(())
    }

    #[test]
    fn reports_keep_input_order() -> Result<()> {
        let input = "(0) {4}\n(0) (1) {1,0}\n(0,1) {2,3}";
        let problems = parse_machines(input)?
            .iter()
            .map(Machine::joltage_problem)
            .collect::<std::result::Result<Vec<_>, _>>()
            .into_diagnostic()?;
        let outcomes = solve_all(&problems, &SolverConfig::default())
            .into_iter()
            .map(|r| r.outcome)
            .collect::<Vec<_>>();
        assert_eq!(
            outcomes,
            vec![Outcome::Optimal(4), Outcome::Optimal(1), Outcome::Infeasible]
        );
        Ok(())
    }

    #[rstest]
    #[case::estimate(FallbackPolicy::Estimate, Some("13"))]
    #[case::reject(FallbackPolicy::Reject, None)]
    fn infeasible_machines_follow_the_policy(
        #[case] fallback: FallbackPolicy,
        #[case] expected: Option<&str>,
    ) {
        // 2 + 3 presses, then an estimate of 2 * (3 + 1) for the second machine.
        let input = "(0) (1) {2,3}\n(0) {3,1}";
        let config = SolverConfig {
            fallback,
            ..Default::default()
        };
        match (process_with(input, &config), expected) {
            (Ok(total), Some(expected)) => assert_eq!(total, expected),
            (Err(err), None) => assert!(err.to_string().contains("line 2")),
            (got, expected) => panic!("expected {expected:?}, got {got:?}"),
        }
    }

    #[test]
    fn rejection_tells_unreachable_from_unfinished() {
        // Greedy strands counter 3, so with no states to spend nothing is found.
        let input = "(0,1,2) (0,1) (2,3) {1,1,1,1}";
        let starved = SolverConfig {
            exact_max_total: 0,
            max_states: Some(0),
            fallback: FallbackPolicy::Reject,
            ..Default::default()
        };
        let err = process_with(input, &starved).unwrap_err().to_string();
        assert!(err.contains("search budget"), "{err}");
        assert!(!err.contains("cannot reach"), "{err}");

        let reject = SolverConfig {
            fallback: FallbackPolicy::Reject,
            ..Default::default()
        };
        let err = process_with("(0,1) {1,2}", &reject).unwrap_err().to_string();
        assert!(err.contains("cannot reach"), "{err}");
    }

    #[test]
    fn best_effort_totals_are_counted() -> Result<()> {
        let input = "(0,1) (0) (1) {40,40}";
        let config = SolverConfig {
            max_states: Some(1),
            ..Default::default()
        };
        assert_eq!("40", process_with(input, &config)?);

        let problem = parse_machines(input)?[0].joltage_problem().into_diagnostic()?;
        let report = &solve_all(&[problem], &config)[0];
        assert_eq!(report.outcome, Outcome::BestEffort(40));
        assert!(report.stats.budget_exhausted);
        Ok(())
    }

    #[test]
    fn missing_joltage_is_an_error() {
        assert!(process("[.#] (0) (1)").is_err());
    }

    #[test]
    fn progress_bar_does_not_change_the_answer() -> Result<()> {
        let input = "(0) (1) (0,1) {2,1}\n(0,1,2) (0,1) (0) {40,30,20}";
        let config = SolverConfig::default();
        assert_eq!(
            process_with(input, &config)?,
            process_with_progress(input, &config)?
        );
        Ok(())
    }
}
