use miette::*;

use crate::machine::parse_machines;

#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> Result<String> {
    let machines = parse_machines(input)?;

    let mut total_presses = 0;
    for machine in &machines {
        let mut system = machine
            .toggle_system()
            .map_err(|e| Report::new(e).with_source_code(input.to_string()))?;
        let presses = system.min_presses().ok_or_else(|| {
            miette!(
                "machine on line {} cannot reach its light pattern",
                machine.line
            )
        })?;
        tracing::debug!(line = machine.line, presses, "lights configured");
        total_presses += presses;
    }

    Ok(total_presses.to_string())
}
