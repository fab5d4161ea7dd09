use miette::*;

use aoc2025_day_10::joltage::SolverConfig;
use aoc2025_day_10::part2;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let input = include_str!("../../input2.txt");
    let result = part2::process_with_progress(input, &SolverConfig::default())?;
    println!("Result: {}", result);
    Ok(())
}
