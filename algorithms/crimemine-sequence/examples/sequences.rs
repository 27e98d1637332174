use crimemine_sequence::{run_sequence_mining, GroupingMethod, SequenceMiningParams};

// Mine crime type sequences per area of the bundled export and print the strongest patterns.
fn main() {
    env_logger::init();

    let table = crimemine_datasets::incidents();
    let params = SequenceMiningParams::new()
        .min_support(0.1)
        .time_window_hours(48.)
        .grouping(GroupingMethod::AreaBased)
        .area_column(Some("area".to_string()))
        .max_patterns(10);
    let result = run_sequence_mining(&table, &params).expect("sequence mining");

    if let Some(message) = &result.message {
        println!("{}", message);
        return;
    }

    println!("Statistics:");
    println!("{:#?}", result.statistics);
    println!("\nTop frequent patterns:");
    for (i, pattern) in result.patterns.iter().enumerate() {
        println!("{:2}. {}", i + 1, pattern.pattern.join(" -> "));
        println!(
            "    support: {} sequences ({}%)",
            pattern.support_count, pattern.support_pct
        );
    }
}
