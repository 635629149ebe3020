use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use titleforge::api::OptimizationReport;
use titleforge::config::Config;
use titleforge::item::ScoredItem;
use titleforge::patterns::{FeatureLift, Pattern};
use titleforge::readability::{CharacterReadability, FleschKincaid, ReadabilityComparison};
use titleforge::stats::PopulationSummary;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, cols: std::ops::RangeInclusive<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

// Follows the thresholds the item was classified with, not fixed cut-offs
fn class_color(s: &ScoredItem) -> Option<Color> {
    if s.is_outlier() {
        Some(Color::Green)
    } else if s.is_underperformer() {
        Some(Color::Red)
    } else {
        None
    }
}

fn sign_color(z: f64) -> Option<Color> {
    if z > 0.0 {
        Some(Color::Green)
    } else if z < 0.0 {
        Some(Color::Red)
    } else {
        None
    }
}

fn colored(cell: Cell, color: Option<Color>) -> Cell {
    match color {
        Some(c) => cell.fg(c),
        None => cell,
    }
}

fn z_cell(z: f64, color: Option<Color>) -> Cell {
    colored(Cell::new(format!("{:+.2}", z)), color)
}

pub fn summary(s: &PopulationSummary, config: &Config) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Velocity (views/day)").add_attribute(Attribute::Bold),
        Cell::new("Items"),
        Cell::new("Mean"),
        Cell::new("StdDev"),
        Cell::new("Median"),
        Cell::new("MAD"),
        Cell::new("Typical").fg(Color::Cyan),
        Cell::new("Log SD"),
    ]);
    align_right(&mut table, 1..=7);

    table.add_row(vec![
        Cell::new(format!("z-method: {}", config.stats.z_method)),
        Cell::new(s.count),
        Cell::new(format!("{:.1}", s.mean)),
        Cell::new(format!("{:.1}", s.std_dev)),
        Cell::new(format!("{:.1}", s.median)),
        Cell::new(format!("{:.1}", s.mad)),
        Cell::new(format!("{:.1}", s.typical)).fg(Color::Cyan),
        Cell::new(format!("{:.3}", s.log_std_dev)),
    ]);
    println!("\n{}", table);
}

pub fn items(items: &[ScoredItem], limit: usize) {
    let mut sorted: Vec<&ScoredItem> = items.iter().collect();
    sorted.sort_by(|a, b| b.z_score().total_cmp(&a.z_score()));

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Views"),
        Cell::new("Age (d)"),
        Cell::new("Velocity"),
        Cell::new("Z").fg(Color::Cyan),
        Cell::new("Class"),
    ]);
    align_right(&mut table, 1..=4);

    for s in sorted.iter().take(limit) {
        let color = class_color(s);
        let label = if s.is_outlier() {
            "outlier"
        } else if s.is_underperformer() {
            "under"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(s.title()),
            Cell::new(format!("{:.0}", s.item.metric_value)),
            Cell::new(format!("{:.1}", s.age_in_days)),
            Cell::new(format!("{:.1}", s.velocity)),
            z_cell(s.z_score(), color),
            colored(Cell::new(label), color),
        ]);
    }
    println!("\n{}", table);
}

pub fn patterns(title: &str, patterns: &[Pattern]) {
    if patterns.is_empty() {
        println!("\n{}: not enough data.", title);
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new(title).add_attribute(Attribute::Bold),
        Cell::new("Prevalence"),
        Cell::new("Avg Z"),
        Cell::new("N"),
        Cell::new("Weight").fg(Color::Cyan),
    ]);
    align_right(&mut table, 1..=4);

    for p in patterns {
        table.add_row(vec![
            Cell::new(p.feature_name),
            Cell::new(format!("{:.0}%", p.prevalence * 100.0)),
            z_cell(p.average_z_score, sign_color(p.average_z_score)),
            Cell::new(p.sample_size),
            Cell::new(format!("{:.0}", p.weight)).fg(Color::Cyan),
        ]);
    }
    println!("\n{}", table);
}

pub fn lifts(lifts: &[FeatureLift]) {
    let mut rows: Vec<&FeatureLift> = lifts.iter().filter(|l| l.with_count > 0).collect();
    rows.sort_by(|a, b| b.lift.lift_ratio.total_cmp(&a.lift.lift_ratio));

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Feature Lift").add_attribute(Attribute::Bold),
        Cell::new("With"),
        Cell::new("Without"),
        Cell::new("Avg With"),
        Cell::new("Avg Without"),
        Cell::new("Lift").fg(Color::Cyan),
        Cell::new("p"),
    ]);
    align_right(&mut table, 1..=6);

    for l in rows {
        let p_cell = Cell::new(format!("{:.3}", l.lift.p_value));
        let p_cell = if l.lift.significant {
            p_cell.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            p_cell
        };
        table.add_row(vec![
            Cell::new(l.feature),
            Cell::new(l.with_count),
            Cell::new(l.without_count),
            Cell::new(format!("{:.1}", l.lift.average_with_feature)),
            Cell::new(format!("{:.1}", l.lift.average_without_feature)),
            Cell::new(format!("{:.2}x", l.lift.lift_ratio)).fg(Color::Cyan),
            p_cell,
        ]);
    }
    println!("\n{}", table);
}

pub fn readability_comparison(r: &ReadabilityComparison) {
    let ci = &r.interval;
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Title Readability").add_attribute(Attribute::Bold),
        Cell::new("Outliers"),
        Cell::new("Others"),
        Cell::new("Diff"),
        Cell::new("CI"),
        Cell::new("Verdict"),
    ]);
    align_right(&mut table, 1..=4);

    let verdict = if !ci.sample_sufficient {
        Cell::new("not enough data").fg(Color::Yellow)
    } else if ci.significant {
        Cell::new("significant").fg(Color::Green)
    } else {
        Cell::new("no clear difference")
    };

    table.add_row(vec![
        Cell::new("character score"),
        Cell::new(format!("{:.1}", r.outlier_mean)),
        Cell::new(format!("{:.1}", r.others_mean)),
        Cell::new(format!("{:+.1}", ci.difference)),
        Cell::new(format!("[{:.1}, {:.1}]", ci.lower_bound, ci.upper_bound)),
        verdict,
    ]);
    println!("\n{}", table);
}

pub fn walk(report: &OptimizationReport) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Candidate").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Pattern"),
        Cell::new("Sat").fg(Color::Red),
        Cell::new("Length"),
        Cell::new("Hook").fg(Color::Green),
        Cell::new("Conf"),
        Cell::new("Step"),
        Cell::new("Move"),
    ]);
    align_right(&mut table, 1..=7);

    for c in &report.walk_path {
        let b = &c.score_breakdown;
        let name = if c.text == report.best_title.text {
            Cell::new(&c.text).fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&c.text)
        };
        table.add_row(vec![
            name,
            Cell::new(format!("{:.1}", c.fitness_score)).fg(Color::Cyan),
            Cell::new(format!("{:.1}", b.pattern_match)),
            Cell::new(format!("{:.1}", b.saturation_penalty)).fg(Color::Red),
            Cell::new(format!("{:.1}", b.length_score)),
            Cell::new(format!("{:.1}", b.hook_bonus)).fg(Color::Green),
            Cell::new(format!("{:.0}%", c.confidence_percent)),
            Cell::new(c.step_index),
            Cell::new(c.mutation.map(|m| m.to_string()).unwrap_or_else(|| "start".to_string())),
        ]);
    }
    println!("\n{}", table);
    println!(
        "Steps: {} accepted | {} rejected | {} skipped (T={:.3})",
        report.steps.accepted, report.steps.rejected, report.steps.skipped, report.final_temperature
    );
}

pub fn text_readability(text: &str, c: &CharacterReadability, fk: &FleschKincaid) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new(text).add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    align_right(&mut table, 1..=1);

    let rows = [
        ("Character score", format!("{:.1}", c.score)),
        ("Words", c.word_count.to_string()),
        ("Avg word length", format!("{:.2}", c.average_word_length)),
        ("Long word ratio", format!("{:.2}", c.long_word_ratio)),
        ("Vowel density", format!("{:.2}", c.vowel_density)),
        ("Punctuation density", format!("{:.2}", c.punctuation_density)),
        ("Reading ease (FK)", format!("{:.1}", fk.reading_ease)),
        ("Grade level (FK)", format!("{:.1}", fk.grade_level)),
        ("Syllables", fk.syllables.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("\n{}", table);
}
